//! Game log and end-of-game files.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};

use crate::config::ClientConfig;

/// Header written when the log starts.
const PREAMBLE: &str = "<html><body>";

/// Format of the stamp in end-of-game file names.
const STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// HTML log of chat and battle reports.
#[derive(Debug)]
pub struct GameLog {
    path: PathBuf,
    file: Option<File>,
}

impl GameLog {
    /// Log at `path`; nothing is created until [`start`](Self::start).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), file: None }
    }

    /// Log location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncate the log and write the preamble.
    pub fn start(&mut self) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&self.path)?;
        writeln!(file, "{PREAMBLE}")?;
        self.file = Some(file);
        tracing::debug!(path = %self.path.display(), "game log started");
        Ok(())
    }

    /// Append text, reopening the file if this log did not start it.
    pub fn append(&mut self, text: &str) -> io::Result<()> {
        let file = match self.file.take() {
            Some(file) => file,
            None => OpenOptions::new().create(true).append(true).open(&self.path)?,
        };
        let file = self.file.insert(file);
        writeln!(file, "{text}")?;
        file.flush()
    }
}

/// Write the end-of-game entity status to the log directory.
///
/// Returns the file written.
pub fn persist_entity_status(
    config: &ClientConfig,
    status: &str,
    now: DateTime<Local>,
) -> io::Result<PathBuf> {
    let stamp = now.format(STAMP_FORMAT).to_string();
    let path = config.entity_status_path(&stamp);
    fs::create_dir_all(&config.log_dir)?;
    fs::write(&path, status)?;
    tracing::info!(path = %path.display(), "entity status saved");
    Ok(path)
}
