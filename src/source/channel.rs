//! Channel-based data source.
//!
//! Receives health records pushed from elsewhere in the process. This is
//! useful for embedding the dashboard next to a producer, and for tests.

use tokio::sync::mpsc;

use healthwatch_types::HealthRecord;

use super::{RecordSource, SourceStatus};

/// A data source that receives health records via an unbounded channel.
///
/// # Example
///
/// ```
/// use healthwatch::{ChannelSource, RecordSource};
///
/// let (tx, mut source) = ChannelSource::create("simulator");
/// drop(tx);
/// assert!(source.poll().is_empty());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::UnboundedReceiver<HealthRecord>,
    description: String,
    disconnected: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of an unbounded channel
    /// * `source_description` - A description of where records come from
    pub fn new(receiver: mpsc::UnboundedReceiver<HealthRecord>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
            disconnected: false,
        }
    }

    /// Create a channel pair for sending records to a ChannelSource.
    ///
    /// Returns (sender, source). Dropping every sender closes the source.
    pub fn create(source_description: &str) -> (mpsc::UnboundedSender<HealthRecord>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx, source_description))
    }
}

impl RecordSource for ChannelSource {
    fn poll(&mut self) -> Vec<HealthRecord> {
        let mut records = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(record) => records.push(record),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    break;
                }
            }
        }
        records
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn status(&self) -> SourceStatus {
        if self.disconnected {
            SourceStatus::Closed("sender dropped".to_string())
        } else {
            SourceStatus::Connected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthwatch_types::Sex;

    fn record(metric: f64) -> HealthRecord {
        HealthRecord {
            age_group: Some("25".to_string()),
            latitude: Some(37.3),
            longitude: Some(-121.9),
            sex: Sex::Female,
            distance_metric: Some(metric),
            symptoms: vec!["influenza".to_string()],
        }
    }

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");
        assert!(source.poll().is_empty());

        tx.send(record(1.0)).unwrap();
        tx.send(record(2.0)).unwrap();

        let metrics: Vec<f64> = source.poll().iter().filter_map(|r| r.distance_metric).collect();
        assert_eq!(metrics, vec![1.0, 2.0]);
        assert!(source.poll().is_empty());
        assert_eq!(source.status(), SourceStatus::Connected);
    }

    #[test]
    fn test_channel_source_drains_before_closing() {
        let (tx, mut source) = ChannelSource::create("test");
        tx.send(record(1.0)).unwrap();
        drop(tx);

        assert_eq!(source.poll().len(), 1);
        assert!(source.poll().is_empty());
        assert!(matches!(source.status(), SourceStatus::Closed(_)));
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("simulator");
        assert_eq!(source.description(), "channel: simulator");
    }
}
