use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::DEFAULT_CATEGORY;

/// Default tracing filter when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// MOS category used when `--category` is not given (default: Heavy)
    #[serde(default)]
    pub default_category: Option<String>,

    /// Replacement scoring tables file; the bundled tables are used when unset
    #[serde(default)]
    pub tables: Option<PathBuf>,

    /// Tracing filter, e.g. "info" or "aft_scorer=debug"
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    pub fn default_category(&self) -> &str {
        self.default_category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
