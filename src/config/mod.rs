//! Menu configuration.
//!
//! Hosts either take [`MenuConfig::default`] or hand over a JSON document they
//! loaded themselves; this crate never touches the filesystem.

use serde::Deserialize;

use crate::error::Result;
use crate::logging::Logger;

/// Height granted to one vertical-span tier of a row.
pub const DEFAULT_ROW_UNIT: u16 = 40;

/// First trigger code handed to a text input.
pub const DEFAULT_TEXT_INPUT_CODE_START: u32 = 34523;

/// What happens to staged content when sealing it into a page fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SealPolicy {
    /// Drop the staged composite and start over with an empty buffer.
    #[default]
    Discard,
    /// Keep the staged content so the caller can seal it elsewhere.
    Restore,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub row_unit: u16,
    pub text_input_code_start: u32,
    pub seal_policy: SealPolicy,
    /// Optional structured logger shared by every page of the menu.
    #[serde(skip)]
    pub logger: Option<Logger>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            row_unit: DEFAULT_ROW_UNIT,
            text_input_code_start: DEFAULT_TEXT_INPUT_CODE_START,
            seal_policy: SealPolicy::default(),
            logger: None,
        }
    }
}

impl std::fmt::Debug for MenuConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuConfig")
            .field("row_unit", &self.row_unit)
            .field("text_input_code_start", &self.text_input_code_start)
            .field("seal_policy", &self.seal_policy)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl MenuConfig {
    /// Parse a JSON document; missing keys take their defaults.
    pub fn from_json(source: &str) -> Result<Self> {
        let mut config: MenuConfig = serde_json::from_str(source)?;
        config.row_unit = config.row_unit.max(1);
        Ok(config)
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }
}
