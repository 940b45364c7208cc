//! # healthwatch
//!
//! A real-time terminal dashboard and library for streamed health
//! observations.
//!
//! Records arrive over a persistent WebSocket connection (or from stdin, a
//! recorded file, or an in-process channel), accumulate in memory, and are
//! folded into chart-ready summaries: a heatmap of case locations, sick and
//! not-sick counts per age bucket, sex and sickness shares, and the
//! distribution of distance metrics against a reference Gaussian.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │ (folds)  │    │(render) │    │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── WebSocket | Stream | File | Channel         │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, views, map panes and export
//! - **[`source`]**: Record sources behind the [`RecordSource`] trait, with
//!   reconnection for the WebSocket source
//! - **[`data`]**: The record buffer and the pure folds behind every chart
//! - **[`ui`]**: Terminal rendering using ratatui
//! - **[`config`]**: Settings from a TOML file and `HEALTHWATCH_*` variables
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Live stream
//! healthwatch --connect wss://example.org/stream
//!
//! # Replay a recorded session
//! healthwatch --stdin < session.ndjson
//!
//! # Summarize a recording without the UI
//! healthwatch --file session.ndjson --export summary.json
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use healthwatch::{App, ChannelSource, Settings};
//!
//! let (tx, source) = ChannelSource::create("simulator");
//! let app = App::new(Box::new(source), &Settings::default());
//! ```
//!
//! ### Folding records without the UI
//!
//! ```
//! use healthwatch::data::{DashboardData, DensityParams, RecordBuffer};
//! use healthwatch_types::InboundMessage;
//!
//! let mut buffer = RecordBuffer::unbounded();
//! let frame = r#"{"AgeGroup":"42","latitude":37.3,"longitude":-121.9,
//!     "Sex":"male","DistanceMetric":1.8,"Symptoms":["covid"]}"#;
//! if let Ok(InboundMessage::Record(record)) = InboundMessage::parse(frame) {
//!     buffer.push(record);
//! }
//!
//! let data = DashboardData::from_records(&buffer, &DensityParams::default());
//! assert_eq!(data.age.total(), 1);
//! assert_eq!(data.gender.sick_male, 100.0);
//! ```
//!
//! ### Connecting to a WebSocket endpoint
//!
//! ```no_run
//! use healthwatch::{App, Settings, WebSocketSource};
//!
//! # tokio_test::block_on(async {
//! let settings = Settings::default();
//! let source = WebSocketSource::spawn("ws://localhost:8080/stream", settings.websocket_options());
//! let app = App::new(Box::new(source), &settings);
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, View};
pub use config::Settings;
pub use data::{DashboardData, RecordBuffer};
pub use source::{
    ChannelSource, FileSource, ReconnectPolicy, RecordSource, SourceStatus, StreamSource,
    WebSocketOptions, WebSocketSource,
};
pub use ui::MapView;
