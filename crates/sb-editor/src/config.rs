//! Session configuration.
//!
//! Every field has a default, so hosts only pass what they want to change:
//!
//! ```json
//! { "history": { "coalesceWindowMs": 0 } }
//! ```

use sb_core::DEFAULT_SECTION_NAME;
use serde::Deserialize;
use std::time::Duration;

/// Undo/redo tuning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Oldest entries are dropped past this many undo steps.
    /// Default: `None` (unbounded).
    pub max_depth: Option<usize>,
    /// Same-field edits closer together than this merge into one undo step.
    /// `0` records every edit separately. Default: `500`.
    pub coalesce_window_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            coalesce_window_ms: 500,
        }
    }
}

impl HistoryConfig {
    pub fn coalesce_window(&self) -> Duration {
        Duration::from_millis(self.coalesce_window_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub history: HistoryConfig,
    /// Section name used when the host supplies a blank one.
    /// Default: `"custom-section"`.
    pub default_section_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            default_section_name: DEFAULT_SECTION_NAME.to_string(),
        }
    }
}
