//! Incremental composition: staging composites and keeping detached cells.

mod side_set;
mod staging;

pub use side_set::SideSet;
pub use staging::{Composer, ComposerState};
