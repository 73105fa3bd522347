use serde_json::json;

use crate::error::{LayoutError, Result};
use crate::layout::Cell;
use crate::logging::{LogLevel, Logger, emit, json_kv, json_str};
use crate::metrics::LayoutMetrics;

use super::core::CodeAllocator;
use super::page::Page;

const TARGET: &str = "config_grid::menu";

/// Horizontal weight and vertical span requested for a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Proportion {
    pub horizontal: u32,
    pub vertical: u32,
}

impl Proportion {
    pub fn new(horizontal: u32, vertical: u32) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    /// One tier tall.
    pub fn wide(horizontal: u32) -> Self {
        Self::new(horizontal, 1)
    }
}

impl From<(u32, u32)> for Proportion {
    fn from((horizontal, vertical): (u32, u32)) -> Self {
        Self::new(horizontal, vertical)
    }
}

/// Typed builder over one page of a [`Menu`](super::Menu).
///
/// Every call records placement metrics on the owning menu and logs the
/// outcome through the configured logger.
pub struct FeatureLoader<'a> {
    page: &'a mut Page,
    codes: &'a mut CodeAllocator,
    metrics: &'a mut LayoutMetrics,
    logger: Option<&'a Logger>,
}

impl<'a> FeatureLoader<'a> {
    pub(super) fn new(
        page: &'a mut Page,
        codes: &'a mut CodeAllocator,
        metrics: &'a mut LayoutMetrics,
        logger: Option<&'a Logger>,
    ) -> Self {
        Self {
            page,
            codes,
            metrics,
            logger,
        }
    }

    pub fn page(&self) -> &Page {
        self.page
    }

    /// Place an already built cell.
    pub fn add(&mut self, cell: Cell, row: i64, column: i64) -> Result<()> {
        let identity = cell.identity().to_string();
        let result = self.page.place(cell, row, column);
        self.track("feature_placed", &identity, row, column, result)
    }

    pub fn add_spacing(
        &mut self,
        row: i64,
        column: i64,
        proportion: impl Into<Proportion>,
    ) -> Result<()> {
        let p = proportion.into();
        self.add(Cell::spacing(p.horizontal, p.vertical), row, column)
    }

    pub fn add_basic_text(
        &mut self,
        identity: &str,
        row: i64,
        column: i64,
        proportion: impl Into<Proportion>,
        text: &str,
    ) -> Result<()> {
        let p = proportion.into();
        self.add(
            Cell::text(identity, p.horizontal, p.vertical, text),
            row,
            column,
        )
    }

    pub fn add_property_text(
        &mut self,
        identity: &str,
        row: i64,
        column: i64,
        proportion: impl Into<Proportion>,
        property: &str,
        fallback: &str,
    ) -> Result<()> {
        let p = proportion.into();
        self.add(
            Cell::property_text(identity, p.horizontal, p.vertical, property, fallback),
            row,
            column,
        )
    }

    pub fn add_button(
        &mut self,
        identity: &str,
        row: i64,
        column: i64,
        proportion: impl Into<Proportion>,
        label: &str,
        code: u32,
    ) -> Result<()> {
        let p = proportion.into();
        self.add(
            Cell::button(identity, p.horizontal, p.vertical, label, code),
            row,
            column,
        )
    }

    /// Place a text input and return its trigger code.
    ///
    /// The code is only consumed when the placement succeeds.
    pub fn add_text_input(
        &mut self,
        identity: &str,
        row: i64,
        column: i64,
        proportion: impl Into<Proportion>,
        default_text: &str,
    ) -> Result<u32> {
        let p = proportion.into();
        let code = self.codes.peek();
        let cell = Cell::text_input(identity, p.horizontal, p.vertical, default_text, code);
        self.add(cell, row, column)?;
        Ok(self.codes.allocate())
    }

    /// Build a text input for staging or stashing, allocating its code now.
    pub fn text_input_cell(
        &mut self,
        identity: &str,
        proportion: impl Into<Proportion>,
        default_text: &str,
    ) -> Cell {
        let p = proportion.into();
        Cell::text_input(
            identity,
            p.horizontal,
            p.vertical,
            default_text,
            self.codes.allocate(),
        )
    }

    /// Place `cell` into the page's staging grid.
    pub fn stage(&mut self, cell: Cell, row: i64, column: i64) -> Result<()> {
        let identity = cell.identity().to_string();
        let result = self.page.stage(cell, row, column);
        self.track("feature_staged", &identity, row, column, result)
    }

    /// Seal everything staged so far into a composite named `name` on the page.
    pub fn seal_composite(
        &mut self,
        name: &str,
        row: i64,
        column: i64,
        proportion: impl Into<Proportion>,
    ) -> Result<()> {
        let p = proportion.into();
        let result = self
            .page
            .seal(name, p.horizontal, p.vertical, row, column);
        if result.is_ok() {
            self.metrics.record_seal();
        }
        self.track("composite_placed", name, row, column, result)
    }

    /// Keep `cell` aside; an existing entry of the same identity is replaced.
    pub fn stash(&mut self, cell: Cell) -> Option<Cell> {
        let identity = cell.identity().to_string();
        let displaced = self.page.stash(cell);
        if displaced.is_some() {
            self.metrics.record_stash_overwrite();
            emit(
                self.logger,
                LogLevel::Warn,
                TARGET,
                "stash_overwritten",
                [
                    json_str("page", self.page.title()),
                    json_str("identity", identity),
                ],
            );
        }
        displaced
    }

    pub fn place_stashed(&mut self, identity: &str, row: i64, column: i64) -> Result<bool> {
        match self.page.place_stashed(identity, row, column) {
            Ok(true) => {
                self.track("stashed_placed", identity, row, column, Ok(()))?;
                Ok(true)
            }
            Ok(false) => {
                emit(
                    self.logger,
                    LogLevel::Debug,
                    TARGET,
                    "stash_empty",
                    [
                        json_str("page", self.page.title()),
                        json_str("identity", identity),
                    ],
                );
                Ok(false)
            }
            Err(err) => self
                .track("stashed_placed", identity, row, column, Err(err))
                .map(|_| false),
        }
    }

    fn track(
        &mut self,
        message: &str,
        identity: &str,
        row: i64,
        column: i64,
        result: Result<()>,
    ) -> Result<()> {
        let (level, message) = match &result {
            Ok(()) => {
                self.metrics.record_placement();
                (LogLevel::Debug, message)
            }
            Err(LayoutError::PlacementConflict { .. }) => {
                self.metrics.record_conflict();
                (LogLevel::Warn, "placement_conflict")
            }
            Err(LayoutError::InvalidPosition { .. }) => {
                self.metrics.record_invalid_position();
                (LogLevel::Warn, "invalid_position")
            }
            Err(_) => (LogLevel::Warn, "placement_failed"),
        };
        let mut fields = vec![
            json_str("page", self.page.title()),
            json_str("identity", identity),
            json_kv("row", json!(row)),
            json_kv("column", json!(column)),
        ];
        if let Err(err) = &result {
            fields.push(json_str("reason", err.to_string()));
        }
        emit(self.logger, level, TARGET, message, fields);
        result
    }
}
