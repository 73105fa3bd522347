use crate::compose::{Composer, ComposerState, SideSet};
use crate::config::SealPolicy;
use crate::error::Result;
use crate::layout::{Cell, Grid};
use crate::logging::Logger;
use crate::registry::FeatureRegistry;

/// One titled screen of a menu: its grid plus the composition state used to build it.
pub struct Page {
    title: String,
    grid: Grid,
    composer: Composer,
    side_set: SideSet,
}

impl Page {
    pub fn new(title: impl Into<String>, policy: SealPolicy, logger: Option<Logger>) -> Self {
        Self {
            title: title.into(),
            grid: Grid::new(),
            composer: Composer::new(policy).with_logger(logger),
            side_set: SideSet::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn composer_state(&self) -> ComposerState {
        self.composer.state()
    }

    pub fn side_set(&self) -> &SideSet {
        &self.side_set
    }

    pub fn place(&mut self, cell: Cell, row: i64, column: i64) -> Result<()> {
        self.grid.place(cell, row, column)
    }

    pub fn stage(&mut self, cell: Cell, row: i64, column: i64) -> Result<()> {
        self.composer.stage(cell, row, column)
    }

    pub fn seal(
        &mut self,
        name: &str,
        horizontal: u32,
        vertical: u32,
        row: i64,
        column: i64,
    ) -> Result<()> {
        self.composer
            .seal(&mut self.grid, name, horizontal, vertical, row, column)
    }

    pub fn discard_staged(&mut self) -> Option<Grid> {
        self.composer.discard()
    }

    /// Keep `cell` aside for later; returns the entry it displaced, if any.
    pub fn stash(&mut self, cell: Cell) -> Option<Cell> {
        self.side_set.stash(cell)
    }

    /// Place a stashed cell. `Ok(false)` when nothing is stashed under `identity`.
    ///
    /// A rejected placement puts the cell back into the side set.
    pub fn place_stashed(&mut self, identity: &str, row: i64, column: i64) -> Result<bool> {
        let Some(cell) = self.side_set.consume(identity) else {
            return Ok(false);
        };
        if let Err(err) = self.grid.check_placement(&cell, row, column) {
            self.side_set.stash(cell);
            return Err(err);
        }
        self.grid.place(cell, row, column)?;
        Ok(true)
    }

    pub fn read_content(&self, identity: &str) -> Option<String> {
        self.grid.read_content(identity)
    }

    pub fn registry(&self) -> Result<FeatureRegistry> {
        FeatureRegistry::build(&self.grid)
    }
}
