//! Record source abstraction for receiving streamed observations.
//!
//! This module provides a trait-based abstraction for receiving health
//! records from various sources (WebSocket endpoints, byte streams, files,
//! in-process channels).

mod channel;
mod file;
mod reconnect;
mod stream;
mod websocket;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use reconnect::ReconnectPolicy;
pub use stream::StreamSource;
pub use websocket::{WebSocketOptions, WebSocketSource};

use std::fmt::{self, Debug};
use std::time::Duration;

use healthwatch_types::{HealthRecord, InboundMessage, MessageError};

/// Trait for receiving health records from various sources.
///
/// Implementations deliver records in arrival order. Control messages and
/// malformed frames are filtered out before they reach the caller.
///
/// # Example
///
/// ```
/// use healthwatch::{ChannelSource, RecordSource};
///
/// let (_tx, mut source) = ChannelSource::create("example");
/// let records = source.poll();
/// assert!(records.is_empty());
/// ```
pub trait RecordSource: Send + Debug {
    /// Drain every record received since the last poll, oldest first.
    ///
    /// This method must not block.
    fn poll(&mut self) -> Vec<HealthRecord>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Current connection state.
    fn status(&self) -> SourceStatus;
}

/// Connection state reported by a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    /// Opening the connection.
    Connecting,
    /// Open and delivering records.
    Connected,
    /// Waiting before the next connection attempt.
    Reconnecting { attempt: u32, delay: Duration },
    /// Nothing new to read; the source may still produce more later.
    Idle,
    /// A recoverable error occurred on the last read.
    Error(String),
    /// The source has ended and will not produce more records.
    Closed(String),
}

impl SourceStatus {
    /// Whether the source is still able to deliver records.
    pub fn is_live(&self) -> bool {
        !matches!(self, SourceStatus::Closed(_))
    }
}

impl fmt::Display for SourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceStatus::Connecting => f.write_str("connecting"),
            SourceStatus::Connected => f.write_str("connected"),
            SourceStatus::Reconnecting { attempt, delay } => write!(
                f,
                "reconnecting (attempt {}) in {}",
                attempt,
                crate::data::duration::format_duration(*delay)
            ),
            SourceStatus::Idle => f.write_str("idle"),
            SourceStatus::Error(e) => write!(f, "error: {}", e),
            SourceStatus::Closed(reason) => write!(f, "closed: {}", reason),
        }
    }
}

/// Keep records, log and drop everything else.
pub(crate) fn accept_frame(
    decoded: Result<InboundMessage, MessageError>,
    origin: &str,
) -> Option<HealthRecord> {
    match decoded {
        Ok(InboundMessage::Record(record)) => Some(record),
        Ok(InboundMessage::Control(control)) => {
            tracing::debug!(origin, ?control, "discarding control message");
            None
        }
        Err(error) => {
            tracing::warn!(origin, %error, "dropping malformed message");
            None
        }
    }
}
