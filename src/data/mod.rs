//! Record storage and the folds that turn records into chart data.
//!
//! ## Submodules
//!
//! - [`buffer`]: Ordered record store, optionally bounded ([`RecordBuffer`])
//! - [`aggregate`]: Age/sickness and gender/sickness breakdowns, distance samples
//! - [`density`]: Reference Gaussian, sample markers and their opacity rule
//! - [`heatmap`]: Symptom filters, heat points and the binned heat layer
//! - [`dashboard`]: [`DashboardData`], every summary recomputed from the buffer
//! - [`history`]: Arrival history for the header sparkline and rate
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "5m", "250ms")
//!
//! ## Data Flow
//!
//! ```text
//! HealthRecord (from a RecordSource)
//!        │
//!        ▼
//! RecordBuffer::push()
//!        │
//!        ├──▶ DashboardData::from_records() (age, gender, density markers)
//!        ├──▶ heat_points() per map pane (filtered by SymptomFilter)
//!        └──▶ History::record() (for the sparkline)
//! ```

pub mod aggregate;
pub mod buffer;
pub mod dashboard;
pub mod density;
pub mod duration;
pub mod heatmap;
pub mod history;

pub use aggregate::{
    age_sickness, distance_metrics, gender_sickness, AgeBreakdown, AgeBucketCount, GenderBreakdown,
    GenderCounts, GenderSlice,
};
pub use buffer::RecordBuffer;
pub use dashboard::{DashboardData, DashboardSummary};
pub use density::{bell_curve, gaussian_pdf, marker_opacity, sample_markers, DensityParams, Marker};
pub use heatmap::{heat_points, HeatLayer, HeatPoint, SymptomFilter};
pub use history::History;
