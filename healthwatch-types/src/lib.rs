//! # healthwatch-types
//!
//! Wire types for a stream of health observations. This crate defines the
//! JSON schema exchanged between an observation backend and the healthwatch
//! dashboard.
//!
//! ## Contents
//!
//! - [`HealthRecord`]: one observation (age group, location, sex, symptoms,
//!   distance metric)
//! - [`InboundMessage`]: classification of a raw frame into a control message
//!   or a record
//! - [`OutboundMessage`]: requests the dashboard sends to the backend
//! - [`AgeBucket`]: the seven fixed age ranges used for aggregation
//!
//! ## Example
//!
//! ```rust
//! use healthwatch_types::{InboundMessage, Sex};
//!
//! let frame = r#"{"AgeGroup":"34","latitude":37.3,"longitude":-121.9,
//!     "Sex":"female","DistanceMetric":2.4,"Symptoms":["cold"]}"#;
//!
//! match InboundMessage::parse(frame).unwrap() {
//!     InboundMessage::Record(record) => {
//!         assert_eq!(record.sex, Sex::Female);
//!         assert!(record.is_sick());
//!     }
//!     InboundMessage::Control(_) => unreachable!(),
//! }
//! ```

mod age;
mod error;
mod message;
mod record;

pub use age::*;
pub use error::*;
pub use message::*;
pub use record::*;

/// Symptom tag meaning "not sick".
pub const NO_SYMPTOMS_TAG: &str = "none";
