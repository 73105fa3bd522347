use std::collections::HashMap;

use blake3::Hash;

use crate::error::{LayoutError, Result};
use crate::layout::{Cell, Grid, Identity, PathStep};
use crate::property::PropertyStore;

/// Stable reference to a feature inside a grid tree.
///
/// Valid for the grid the registry was built from until that grid is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureHandle {
    path: Vec<PathStep>,
}

impl FeatureHandle {
    pub fn path(&self) -> &[PathStep] {
        &self.path
    }

    /// Nesting depth; features of the top-level grid are at depth 0.
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    handle: FeatureHandle,
    fingerprint: Hash,
}

/// Identity index over a composed grid, built once so actions resolve
/// features without searching the tree again.
#[derive(Debug, Default, Clone)]
pub struct FeatureRegistry {
    entries: HashMap<Identity, Entry>,
}

impl FeatureRegistry {
    /// Index every non-filler cell of `grid`, nested composites included.
    /// Two features sharing an identity is an error.
    pub fn build(grid: &Grid) -> Result<Self> {
        let mut found: Vec<(Identity, FeatureHandle, Hash)> = Vec::new();
        grid.walk(&mut |path, cell| {
            if !cell.is_filler() {
                found.push((
                    cell.identity().to_string(),
                    FeatureHandle {
                        path: path.to_vec(),
                    },
                    content_fingerprint(cell),
                ));
            }
        });

        let mut entries = HashMap::with_capacity(found.len());
        for (identity, handle, fingerprint) in found {
            if entries.contains_key(&identity) {
                return Err(LayoutError::DuplicateIdentity(identity));
            }
            entries.insert(
                identity,
                Entry {
                    handle,
                    fingerprint,
                },
            );
        }
        Ok(Self { entries })
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

    pub fn handle(&self, identity: &str) -> Option<&FeatureHandle> {
        self.entries.get(identity).map(|entry| &entry.handle)
    }

    pub fn resolve<'g>(&self, grid: &'g Grid, handle: &FeatureHandle) -> Option<&'g Cell> {
        grid.cell_at_path(&handle.path)
    }

    /// Current content of the feature behind `handle`; `None` when there is nothing to read.
    pub fn read_content(&self, grid: &Grid, handle: &FeatureHandle) -> Option<String> {
        self.resolve(grid, handle).and_then(Cell::content)
    }

    /// Like [`FeatureRegistry::read_content`] but by identity; unknown identities are `NotFound`.
    pub fn content_of(&self, grid: &Grid, identity: &str) -> Result<Option<String>> {
        let handle = self
            .handle(identity)
            .ok_or_else(|| LayoutError::NotFound(identity.to_string()))?;
        Ok(self.read_content(grid, handle))
    }

    /// [`FeatureRegistry::content_of`] with property text read from `properties`.
    pub fn resolve_content(
        &self,
        grid: &Grid,
        identity: &str,
        properties: &dyn PropertyStore,
    ) -> Result<Option<String>> {
        let handle = self
            .handle(identity)
            .ok_or_else(|| LayoutError::NotFound(identity.to_string()))?;
        Ok(self
            .resolve(grid, handle)
            .and_then(|cell| cell.resolve_content(properties)))
    }

    /// Identities whose content differs from what was recorded at build or last refresh.
    pub fn changed(&self, grid: &Grid) -> Vec<Identity> {
        let mut changed: Vec<Identity> = self
            .entries
            .iter()
            .filter(|(_, entry)| {
                grid.cell_at_path(&entry.handle.path)
                    .map(content_fingerprint)
                    .map(|current| current != entry.fingerprint)
                    .unwrap_or(true)
            })
            .map(|(identity, _)| identity.clone())
            .collect();
        changed.sort();
        changed
    }

    /// Record the current content of every feature as the new baseline.
    pub fn refresh(&mut self, grid: &Grid) {
        for entry in self.entries.values_mut() {
            if let Some(cell) = grid.cell_at_path(&entry.handle.path) {
                entry.fingerprint = content_fingerprint(cell);
            }
        }
    }
}

fn content_fingerprint(cell: &Cell) -> Hash {
    blake3::hash(cell.content().unwrap_or_default().as_bytes())
}
