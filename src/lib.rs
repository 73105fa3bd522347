//! Proportional feature grid for configuration menus.
//!
//! Features are placed at logical `(row, column)` slots of a [`Grid`]. Each
//! carries a horizontal weight and a vertical span; rows share the available
//! width in proportion to those weights. Gaps become removable filler that later
//! placements may consume, while multi-row features reserve the rows beneath
//! them with fixed filler. Composites nest a whole grid inside one cell.
//!
//! The modules follow a `mod.rs` orchestrator pattern with private `core`
//! implementations re-exported through their parent.

pub mod compose;
pub mod config;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod menu;
pub mod metrics;
pub mod property;
pub mod registry;
pub mod render;
pub mod width;

pub use compose::{Composer, ComposerState, SideSet};
pub use config::{MenuConfig, SealPolicy};
pub use error::{LayoutError, Result};
pub use geometry::Rect;
pub use layout::{Cell, CellKind, DrawContext, Grid, Identity, Payload, Row, SolvedCell, Spacing};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use menu::{CodeAllocator, FeatureLoader, Menu, Page, Proportion};
pub use metrics::{LayoutMetrics, MetricSnapshot};
pub use property::{EmptyPropertyStore, MemoryPropertyStore, PropertyError, PropertyStore};
pub use registry::{FeatureHandle, FeatureRegistry};
pub use render::{AnsiRenderer, DrawList, Element, ElementContent, InputSource, Renderer, RendererSettings};
pub use width::display_width;
