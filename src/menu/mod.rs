//! Menu module orchestrator.
//!
//! A [`Menu`] owns titled [`Page`]s, the text-input code allocator and the
//! layout counters. Pages are filled through a [`FeatureLoader`].

mod core;
mod loader;
mod page;

pub use core::{CodeAllocator, Menu};
pub use loader::{FeatureLoader, Proportion};
pub use page::Page;
