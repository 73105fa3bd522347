use std::collections::HashMap;

use crate::layout::{Cell, Identity};

/// Detached cells kept by identity until something places them.
#[derive(Debug, Default, Clone)]
pub struct SideSet {
    entries: HashMap<Identity, Cell>,
}

impl SideSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `cell` under its identity. An existing entry with the same identity
    /// is replaced and handed back so the caller can tell it happened.
    pub fn stash(&mut self, cell: Cell) -> Option<Cell> {
        self.entries.insert(cell.identity().to_string(), cell)
    }

    /// Take the cell stored under `identity`. `None` means there is nothing to place.
    pub fn consume(&mut self, identity: &str) -> Option<Cell> {
        self.entries.remove(identity)
    }

    pub fn get(&self, identity: &str) -> Option<&Cell> {
        self.entries.get(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
