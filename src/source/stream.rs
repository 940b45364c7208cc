//! Stream-based data source.
//!
//! Receives health records from an async byte stream. This is useful for
//! piping a recorded session through stdin or reading from a raw TCP
//! connection.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;

use healthwatch_types::{HealthRecord, InboundMessage};

use super::{accept_frame, RecordSource, SourceStatus};

const CHANNEL_CAPACITY: usize = 1024;

/// A data source that receives health records from an async stream.
///
/// This source spawns a background task that reads newline-delimited JSON
/// from the provided async reader and makes records available via `poll()`.
///
/// # Example with a byte stream
///
/// ```
/// use std::io::Cursor;
/// use healthwatch::StreamSource;
///
/// # tokio_test::block_on(async {
/// let data = b"{\"message\":\"pong\"}\n";
/// let stream = Cursor::new(data.to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<HealthRecord>,
    description: String,
    status: Arc<Mutex<SourceStatus>>,
}

impl StreamSource {
    /// Spawn a background task that reads from the given async reader.
    ///
    /// Each line is decoded as one inbound message. Blank lines, control
    /// messages and malformed lines (including invalid UTF-8) are skipped.
    /// Only an I/O error from the reader ends the stream.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let status = Arc::new(Mutex::new(SourceStatus::Connected));
        let status_handle = status.clone();
        let desc = format!("stream: {}", description);
        let origin = desc.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = Vec::new();

            loop {
                line.clear();
                // Raw bytes: a line that is not UTF-8 is a malformed frame, not a read error
                match reader.read_until(b'\n', &mut line).await {
                    Ok(0) => {
                        *status_handle.lock() = SourceStatus::Closed("end of stream".to_string());
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim_ascii();
                        if trimmed.is_empty() {
                            continue;
                        }
                        if let Some(record) = accept_frame(InboundMessage::parse_slice(trimmed), &origin) {
                            if tx.send(record).await.is_err() {
                                // Receiver dropped
                                break;
                            }
                        }
                    }
                    Err(e) => {
                        tracing::warn!(origin = %origin, error = %e, "stream read failed");
                        *status_handle.lock() = SourceStatus::Closed(format!("read error: {}", e));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: desc,
            status,
        }
    }

    /// Create a StreamSource from a raw bytes channel.
    ///
    /// Each message on the channel is one complete JSON frame, as delivered
    /// by a message-oriented transport.
    pub fn from_bytes_channel(mut rx: mpsc::Receiver<Vec<u8>>, description: &str) -> Self {
        let (tx, record_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let status = Arc::new(Mutex::new(SourceStatus::Connected));
        let status_handle = status.clone();
        let desc = format!("stream: {}", description);
        let origin = desc.clone();

        tokio::spawn(async move {
            while let Some(bytes) = rx.recv().await {
                if let Some(record) = accept_frame(InboundMessage::parse_slice(&bytes), &origin) {
                    if tx.send(record).await.is_err() {
                        return;
                    }
                }
            }
            *status_handle.lock() = SourceStatus::Closed("sender dropped".to_string());
        });

        Self {
            receiver: record_rx,
            description: desc,
            status,
        }
    }
}

impl RecordSource for StreamSource {
    fn poll(&mut self) -> Vec<HealthRecord> {
        let mut records = Vec::new();
        while let Ok(record) = self.receiver.try_recv() {
            records.push(record);
        }
        records
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn status(&self) -> SourceStatus {
        self.status.lock().clone()
    }
}
