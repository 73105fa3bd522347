use thiserror::Error;

/// Unified result type for the grid engine.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Errors surfaced by placement, composition and lookup.
///
/// Every variant is local to the single operation that produced it; callers
/// decide whether to abort a whole page build or skip one feature.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("invalid position ({row}, {column}): row and column must be non-negative and the feature must end within the grid extent")]
    InvalidPosition { row: i64, column: i64 },
    #[error("placement at ({row}, {column}) overlaps content that cannot be displaced")]
    PlacementConflict { row: usize, column: u32 },
    #[error("feature `{0}` not found")]
    NotFound(String),
    #[error("invalid composer state: {0}")]
    StateViolation(String),
    #[error("identity `{0}` is used by more than one feature")]
    DuplicateIdentity(String),
    #[error("page `{0}` already exists")]
    DuplicatePage(String),
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
