use serde_json::json;

use crate::config::SealPolicy;
use crate::error::{LayoutError, Result};
use crate::layout::{Cell, CellKind, Grid};
use crate::logging::{LogLevel, Logger, emit, json_kv, json_str};

const TARGET: &str = "config_grid::compose";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerState {
    Empty,
    Composing,
}

/// Assembles a composite cell in a scratch grid before sealing it into a page.
pub struct Composer {
    staging: Option<Grid>,
    policy: SealPolicy,
    logger: Option<Logger>,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new(SealPolicy::default())
    }
}

impl Composer {
    pub fn new(policy: SealPolicy) -> Self {
        Self {
            staging: None,
            policy,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Option<Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn state(&self) -> ComposerState {
        if self.staging.is_some() {
            ComposerState::Composing
        } else {
            ComposerState::Empty
        }
    }

    pub fn staged(&self) -> Option<&Grid> {
        self.staging.as_ref()
    }

    pub fn policy(&self) -> SealPolicy {
        self.policy
    }

    /// Place `cell` into the staging grid, opening one if none is live.
    pub fn stage(&mut self, cell: Cell, row: i64, column: i64) -> Result<()> {
        let identity = cell.identity().to_string();
        let result = self
            .staging
            .get_or_insert_with(Grid::new)
            .place(cell, row, column);
        if let Err(err) = &result {
            emit(
                self.logger.as_ref(),
                LogLevel::Debug,
                TARGET,
                "stage_rejected",
                [
                    json_str("identity", identity),
                    json_str("reason", err.to_string()),
                ],
            );
        }
        result
    }

    /// Wrap the staged grid into a composite named `name` and place it on `target`.
    ///
    /// The composer always ends up Empty on success. When placement fails the
    /// staged content is dropped or kept according to the [`SealPolicy`].
    pub fn seal(
        &mut self,
        target: &mut Grid,
        name: &str,
        horizontal: u32,
        vertical: u32,
        row: i64,
        column: i64,
    ) -> Result<()> {
        let staged = match self.staging.take() {
            Some(grid) if !grid.is_empty() => grid,
            _ => {
                return Err(LayoutError::StateViolation(
                    "nothing staged to seal".to_string(),
                ));
            }
        };

        let composite = Cell::composite(name, horizontal, vertical, staged);
        if let Err(err) = target.check_placement(&composite, row, column) {
            self.after_failed_seal(composite, name, &err);
            return Err(err);
        }
        target.place(composite, row, column)?;

        emit(
            self.logger.as_ref(),
            LogLevel::Debug,
            TARGET,
            "composite_sealed",
            [
                json_str("identity", name),
                json_kv("row", json!(row)),
                json_kv("column", json!(column)),
            ],
        );
        Ok(())
    }

    /// Drop whatever is staged and return it.
    pub fn discard(&mut self) -> Option<Grid> {
        self.staging.take()
    }

    fn after_failed_seal(&mut self, composite: Cell, name: &str, err: &LayoutError) {
        let restored = self.policy == SealPolicy::Restore;
        if restored {
            if let CellKind::Composite(grid) = composite.into_kind() {
                self.staging = Some(grid);
            }
        }
        emit(
            self.logger.as_ref(),
            LogLevel::Warn,
            TARGET,
            if restored {
                "seal_failed_restored"
            } else {
                "seal_failed_discarded"
            },
            [
                json_str("identity", name),
                json_str("reason", err.to_string()),
            ],
        );
    }
}
