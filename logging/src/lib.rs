//! # utilkit-log
//!
//! Process logging on top of the `log` facade.
//!
//! - [`LogFile`] - an owned, append-only log file with size-bounded
//!   truncation and a flush-then-read [`send`](LogFile::send)
//! - [`FileLogger`] - `env_logger` console output plus an optional file
//!   destination
//! - [`install`] - registers a [`FileLogger`] built from a [`LogConfig`] and
//!   returns a [`LoggerHandle`] for the file
//!
//! # Example
//!
//! ```ignore
//! let handle = utilkit_log::install(&LogConfig {
//!     file: Some("app.log".into()),
//!     max_file_size: 1_000_000,
//!     ..LogConfig::default()
//! })?;
//!
//! log::info!("started");
//! handle.send_log_file(|path, _bytes, text| attach_to_report(path, text))?;
//! ```

mod config;
mod error;
mod log_file;
mod logger;

pub use config::LogConfig;
pub use error::{LogFileError, LoggerError};
pub use log_file::LogFile;
pub use logger::{FileLogger, LoggerHandle, install};
