//! File-based data source.
//!
//! Tails a newline-delimited JSON file of recorded messages.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use healthwatch_types::{HealthRecord, InboundMessage};

use super::{accept_frame, RecordSource, SourceStatus};

/// A data source that reads health records from a newline-delimited JSON file.
///
/// The source remembers how far it has read and only returns records from
/// lines appended since the previous poll. A trailing line without a newline
/// is left for a later poll. If the file shrinks it is assumed to have been
/// rewritten and is read again from the start.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    offset: u64,
    last_error: Option<String>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            offset: 0,
            last_error: None,
        }
    }

    /// Returns the path being monitored.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read complete lines appended since the last poll.
    fn read_new_lines(&mut self) -> std::io::Result<Vec<String>> {
        let mut file = File::open(&self.path)?;
        let len = file.metadata()?.len();

        if len < self.offset {
            tracing::info!(path = %self.path.display(), "file truncated, reading from start");
            self.offset = 0;
        }
        if len == self.offset {
            return Ok(Vec::new());
        }

        file.seek(SeekFrom::Start(self.offset))?;
        let mut buf = Vec::with_capacity((len - self.offset) as usize);
        file.take(len - self.offset).read_to_end(&mut buf)?;

        let complete = match buf.iter().rposition(|&b| b == b'\n') {
            Some(pos) => pos + 1,
            None => return Ok(Vec::new()),
        };
        self.offset += complete as u64;

        Ok(String::from_utf8_lossy(&buf[..complete])
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl RecordSource for FileSource {
    fn poll(&mut self) -> Vec<HealthRecord> {
        match self.read_new_lines() {
            Ok(lines) => {
                self.last_error = None;
                lines
                    .iter()
                    .filter_map(|line| accept_frame(InboundMessage::parse(line), &self.description))
                    .collect()
            }
            Err(e) => {
                let message = format!("read error: {}", e);
                if self.last_error.as_deref() != Some(message.as_str()) {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to read file");
                }
                self.last_error = Some(message);
                Vec::new()
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn status(&self) -> SourceStatus {
        match &self.last_error {
            Some(e) => SourceStatus::Error(e.clone()),
            None => SourceStatus::Idle,
        }
    }
}
