//! Feature registry built once a page is composed.

mod core;

pub use core::{FeatureHandle, FeatureRegistry};
