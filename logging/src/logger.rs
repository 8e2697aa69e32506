use std::path::Path;
use std::sync::Arc;

use log::Log;
use parking_lot::Mutex;

use crate::config::LogConfig;
use crate::error::{LogFileError, LoggerError};
use crate::log_file::LogFile;

type SharedFile = Arc<Mutex<Option<LogFile>>>;

/// Logger that wraps `env_logger` and appends every record to a [`LogFile`].
pub struct FileLogger {
    inner: env_logger::Logger,
    console: bool,
    file: SharedFile,
}

impl FileLogger {
    /// Builds a logger from `config` without registering it.
    ///
    /// The file, if configured, is truncated to `max_file_size` first and then
    /// opened for appending. The returned handle controls the same file.
    pub fn new(config: &LogConfig) -> Result<(Self, LoggerHandle), LogFileError> {
        let file = match &config.file {
            Some(path) => {
                if config.max_file_size > 0 {
                    LogFile::truncate(path, config.max_file_size)?;
                }
                Some(LogFile::open(path)?)
            }
            None => None,
        };
        let file = Arc::new(Mutex::new(file));

        let inner = env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(config.filter.as_str()),
        )
        .build();

        let logger = Self {
            inner,
            console: config.console,
            file: file.clone(),
        };
        Ok((logger, LoggerHandle { file }))
    }

    /// Most verbose level this logger lets through.
    pub fn max_level(&self) -> log::LevelFilter {
        self.inner.filter()
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record) {
        if !self.inner.enabled(record.metadata()) {
            return;
        }

        if self.console {
            // Prints to stderr.
            self.inner.log(record);
        }

        if let Some(file) = self.file.lock().as_mut() {
            // A failed append has nowhere to be reported; drop the line.
            let _ = file.append(&format_line(record));
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

/// Renders a record as `[LEVEL target] message`.
fn format_line(record: &log::Record) -> String {
    format!(
        "[{:<5} {}] {}",
        record.level(),
        record.target(),
        record.args()
    )
}

/// Controls the file destination of an installed [`FileLogger`].
#[derive(Clone)]
pub struct LoggerHandle {
    file: SharedFile,
}

impl LoggerHandle {
    /// Whether a log file is currently open.
    pub fn has_file(&self) -> bool {
        self.file.lock().is_some()
    }

    /// Flushes the log file, reads it back and passes it to `handler`.
    ///
    /// Returns `Ok(None)` without calling `handler` when no file is open.
    /// The file lock is released before `handler` runs, so it may log.
    pub fn send_log_file<R>(
        &self,
        handler: impl FnOnce(&Path, &[u8], &str) -> R,
    ) -> Result<Option<R>, LogFileError> {
        let (path, text) = {
            let mut guard = self.file.lock();
            let Some(file) = guard.as_mut() else {
                return Ok(None);
            };
            (file.path().to_path_buf(), file.read_back()?)
        };
        Ok(Some(handler(&path, text.as_bytes(), &text)))
    }

    /// Closes the log file; later records go to the console only.
    pub fn close_log_file(&self) -> Result<(), LogFileError> {
        // Closing logs, which locks the file again.
        let file = self.file.lock().take();
        match file {
            Some(file) => file.close(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = self
            .file
            .lock()
            .as_ref()
            .map(|file| file.path().display().to_string());
        f.debug_struct("LoggerHandle").field("file", &path).finish()
    }
}

/// Installs a [`FileLogger`] built from `config` as the process logger.
///
/// Must be called once, before anything logs.
pub fn install(config: &LogConfig) -> Result<LoggerHandle, LoggerError> {
    let (logger, handle) = FileLogger::new(config)?;
    let max_level = logger.max_level();

    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(max_level);
    Ok(handle)
}
