//! Layout module orchestrator.
//!
//! Placement lives in `grid`, the cell model in `cell`, and the measurement and
//! draw pass in the private `core` module.

pub mod cell;
mod core;
pub mod grid;

pub use cell::{Cell, CellKind, FIXED_SPACING, Identity, Payload, REMOVABLE_SPACING, Spacing};
pub use core::{DrawContext, SolvedCell};
pub use grid::{Grid, MAX_EXTENT, PathStep, Row};
