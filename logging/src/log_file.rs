//! Append-only log file destination.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::LogFileError;

/// An open log file.
///
/// The handle is owned by whoever opened it and closed when dropped, so
/// there is no process-wide "current" log file. Lines are written straight
/// to the file without buffering.
///
/// # Example
///
/// ```ignore
/// LogFile::truncate("app.log".as_ref(), 1_000_000)?;
/// let mut file = LogFile::open("app.log")?;
/// file.append("started")?;
/// file.send(|path, _bytes, text| upload(path, text))?;
/// file.close()?;
/// ```
#[derive(Debug)]
pub struct LogFile {
    path: PathBuf,
    file: File,
}

impl LogFile {
    /// Opens `path` for appending, creating the file if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LogFileError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LogFileError::io(&path, e))?;
        log::debug!("Opened log file {}", path.display());
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` followed by a newline.
    pub fn append(&mut self, line: &str) -> Result<(), LogFileError> {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        self.file
            .write_all(&bytes)
            .map_err(|e| LogFileError::io(&self.path, e))
    }

    /// Discards the oldest characters of the file at `path` so that at most
    /// `max_chars` characters remain.
    ///
    /// Does nothing if the file does not exist or is already small enough.
    /// Returns whether the file was rewritten. The rewrite goes through a
    /// temporary sibling file that replaces the original.
    pub fn truncate(path: &Path, max_chars: usize) -> Result<bool, LogFileError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(LogFileError::io(path, e)),
        };
        let text = String::from_utf8(bytes).map_err(|_| LogFileError::InvalidUtf8 {
            path: path.display().to_string(),
        })?;

        let len = text.chars().count();
        if len <= max_chars {
            return Ok(false);
        }

        let start = text
            .char_indices()
            .nth(len - max_chars)
            .map_or(text.len(), |(index, _)| index);

        let mut tmp_name = OsString::from(path.as_os_str());
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, &text[start..]).map_err(|e| LogFileError::io(&tmp_path, e))?;
        fs::rename(&tmp_path, path).map_err(|e| LogFileError::io(path, e))?;

        log::info!(
            "Truncated log file {} from {len} to {max_chars} characters",
            path.display()
        );
        Ok(true)
    }

    /// Flushes pending writes to disk and reads the whole file back.
    pub fn read_back(&mut self) -> Result<String, LogFileError> {
        self.file
            .flush()
            .and_then(|()| self.file.sync_data())
            .map_err(|e| LogFileError::io(&self.path, e))?;

        let bytes = fs::read(&self.path).map_err(|e| LogFileError::io(&self.path, e))?;
        String::from_utf8(bytes).map_err(|_| LogFileError::InvalidUtf8 {
            path: self.path.display().to_string(),
        })
    }

    /// Reads the file back (see [`read_back`](Self::read_back)) and hands its
    /// path, raw bytes and text to `handler`.
    pub fn send<R>(
        &mut self,
        handler: impl FnOnce(&Path, &[u8], &str) -> R,
    ) -> Result<R, LogFileError> {
        let text = self.read_back()?;
        Ok(handler(&self.path, text.as_bytes(), &text))
    }

    /// Flushes and closes the file.
    pub fn close(mut self) -> Result<(), LogFileError> {
        self.file
            .flush()
            .and_then(|()| self.file.sync_all())
            .map_err(|e| LogFileError::io(&self.path, e))?;
        log::debug!("Closed log file {}", self.path.display());
        Ok(())
    }
}
