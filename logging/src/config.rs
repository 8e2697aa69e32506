//! `[log]` configuration section.

use std::path::PathBuf;

use serde::Deserialize;

/// Settings for [`install`](crate::install).
///
/// ```toml
/// [log]
/// filter = "info"
/// file = "app.log"
/// max_file_size = 1000000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `env_logger` filter used when `RUST_LOG` is not set.
    pub filter: String,
    /// Also print records to stderr.
    pub console: bool,
    /// File destination; `None` logs to the console only.
    pub file: Option<PathBuf>,
    /// Characters kept when the file is truncated at startup (0 = never truncate).
    pub max_file_size: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".into(),
            console: true,
            file: None,
            max_file_size: 0,
        }
    }
}
