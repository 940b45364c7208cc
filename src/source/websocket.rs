//! WebSocket data source.
//!
//! Connects to the observation backend, requests the initial data set and
//! keeps the connection alive with periodic pings. Lost connections are
//! retried according to a [`ReconnectPolicy`].

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use healthwatch_types::{HealthRecord, InboundMessage, OutboundMessage};

use super::{accept_frame, ReconnectPolicy, RecordSource, SourceStatus};

/// Buffered records between the connection task and the UI.
const CHANNEL_CAPACITY: usize = 1024;

/// Connection behaviour for [`WebSocketSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct WebSocketOptions {
    /// Interval between keepalive pings while the connection is open.
    pub ping_interval: Duration,
    /// What to do after the connection is lost.
    pub reconnect: ReconnectPolicy,
}

impl Default for WebSocketOptions {
    fn default() -> Self {
        Self {
            ping_interval: Duration::from_secs(5 * 60),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

/// A data source that receives health records from a WebSocket endpoint.
///
/// A background task owns the connection. Dropping the source aborts the
/// task, which closes the socket.
///
/// # Example
///
/// ```no_run
/// use healthwatch::{ReconnectPolicy, WebSocketOptions, WebSocketSource};
///
/// # tokio_test::block_on(async {
/// let options = WebSocketOptions {
///     reconnect: ReconnectPolicy::never(),
///     ..WebSocketOptions::default()
/// };
/// let source = WebSocketSource::spawn("ws://localhost:8080/stream", options);
/// # });
/// ```
#[derive(Debug)]
pub struct WebSocketSource {
    receiver: mpsc::Receiver<HealthRecord>,
    description: String,
    status: Arc<Mutex<SourceStatus>>,
    task: JoinHandle<()>,
}

impl WebSocketSource {
    /// Spawn the connection task. Must be called within a tokio runtime.
    pub fn spawn(url: &str, options: WebSocketOptions) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let status = Arc::new(Mutex::new(SourceStatus::Connecting));
        let task = tokio::spawn(run(url.to_string(), options, tx, status.clone()));

        Self {
            receiver: rx,
            description: format!("websocket: {}", url),
            status,
            task,
        }
    }
}

impl RecordSource for WebSocketSource {
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

impl Drop for WebSocketSource {
    fn drop(&mut self) {
        self.task.abort();
        tracing::debug!(source = %self.description, "websocket source dropped");
    }
}

/// How a single connection ended.
enum SessionEnd {
    /// The socket closed or failed; the policy decides whether to retry.
    Lost(String),
    /// Nobody is listening any more.
    ReceiverDropped,
}

async fn run(
    url: String,
    options: WebSocketOptions,
    tx: mpsc::Sender<HealthRecord>,
    status: Arc<Mutex<SourceStatus>>,
) {
    let mut attempt: u32 = 0;

    loop {
        *status.lock() = SourceStatus::Connecting;

        let reason = match connect_async(url.as_str()).await {
            Ok((socket, _response)) => {
                tracing::info!(%url, "websocket connection opened");
                attempt = 0;
                *status.lock() = SourceStatus::Connected;

                match session(socket, &url, options.ping_interval, &tx).await {
                    SessionEnd::ReceiverDropped => {
                        tracing::debug!(%url, "receiver dropped, stopping");
                        return;
                    }
                    SessionEnd::Lost(reason) => reason,
                }
            }
            Err(error) => {
                tracing::warn!(%url, %error, "websocket connection failed");
                error.to_string()
            }
        };

        match options.reconnect.next_delay(attempt) {
            Some(delay) => {
                attempt += 1;
                tracing::info!(%url, attempt, ?delay, %reason, "scheduling reconnect");
                *status.lock() = SourceStatus::Reconnecting { attempt, delay };
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = tx.closed() => return,
                }
            }
            None => {
                tracing::warn!(%url, %reason, "websocket closed, not reconnecting");
                *status.lock() = SourceStatus::Closed(reason);
                return;
            }
        }
    }
}

async fn session(
    socket: WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>,
    url: &str,
    ping_interval: Duration,
    tx: &mpsc::Sender<HealthRecord>,
) -> SessionEnd {
    let (mut write, mut read) = socket.split();

    let initial = OutboundMessage::SendInitialData.to_json();
    if let Err(error) = write.send(Message::Text(initial)).await {
        return SessionEnd::Lost(error.to_string());
    }

    let ping_interval = ping_interval.max(Duration::from_millis(1));
    let mut ping = interval_at(Instant::now() + ping_interval, ping_interval);
    ping.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            frame = read.next() => {
                let record = match frame {
                    Some(Ok(Message::Text(text))) => accept_frame(InboundMessage::parse(&text), url),
                    Some(Ok(Message::Binary(bytes))) => {
                        accept_frame(InboundMessage::parse_slice(&bytes), url)
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let reason = frame
                            .map(|f| format!("closed by server ({}): {}", f.code, f.reason))
                            .unwrap_or_else(|| "closed by server".to_string());
                        return SessionEnd::Lost(reason);
                    }
                    // Protocol-level ping/pong is answered by tungstenite
                    Some(Ok(_)) => None,
                    Some(Err(error)) => {
                        tracing::warn!(%url, %error, "websocket error, closing");
                        let _ = write.close().await;
                        return SessionEnd::Lost(error.to_string());
                    }
                    None => return SessionEnd::Lost("connection closed".to_string()),
                };

                if let Some(record) = record {
                    if tx.send(record).await.is_err() {
                        let _ = write.close().await;
                        return SessionEnd::ReceiverDropped;
                    }
                }
            }
            _ = ping.tick() => {
                tracing::trace!(%url, "sending keepalive ping");
                if let Err(error) = write.send(Message::Text(OutboundMessage::ping().to_json())).await {
                    tracing::warn!(%url, %error, "keepalive failed, closing");
                    let _ = write.close().await;
                    return SessionEnd::Lost(error.to_string());
                }
            }
            _ = tx.closed() => {
                let _ = write.close().await;
                return SessionEnd::ReceiverDropped;
            }
        }
    }
}
