use thiserror::Error;

/// Errors that can occur while operating on a log file.
#[derive(Debug, Error)]
pub enum LogFileError {
    /// The file could not be created, opened, written or read back.
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The file contents are not valid UTF-8.
    #[error("{path} is not valid UTF-8")]
    InvalidUtf8 { path: String },
}

impl LogFileError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Errors that can occur while installing the process logger.
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error(transparent)]
    File(#[from] LogFileError),
    /// Another logger was registered with the `log` facade first.
    #[error("a logger is already installed")]
    AlreadyInstalled(#[from] log::SetLoggerError),
}
