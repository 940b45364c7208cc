//! Ordered in-memory store for received records.

use std::collections::vec_deque::{self, VecDeque};

use healthwatch_types::HealthRecord;

/// Records in arrival order, optionally bounded.
///
/// An unbounded buffer grows for the lifetime of the process. A bounded
/// buffer behaves as a ring: once `capacity` is exceeded the oldest records
/// are evicted so the most recent `capacity` records remain.
#[derive(Debug, Clone, Default)]
pub struct RecordBuffer {
    records: VecDeque<HealthRecord>,
    capacity: Option<usize>,
    received: u64,
    evicted: u64,
}

impl RecordBuffer {
    /// Create an unbounded buffer.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Create a buffer with the given capacity (`None` for unbounded).
    ///
    /// A capacity of zero is treated as one so the latest record is always
    /// available.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: capacity.map(|c| c.max(1)),
            received: 0,
            evicted: 0,
        }
    }

    /// Append a record, evicting the oldest if the buffer is full.
    pub fn push(&mut self, record: HealthRecord) {
        self.records.push_back(record);
        self.received += 1;

        if let Some(capacity) = self.capacity {
            while self.records.len() > capacity {
                self.records.pop_front();
                self.evicted += 1;
            }
        }
    }

    /// Append records in order. Returns how many were appended.
    pub fn extend<I>(&mut self, records: I) -> usize
    where
        I: IntoIterator<Item = HealthRecord>,
    {
        let mut count = 0;
        for record in records {
            self.push(record);
            count += 1;
        }
        count
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> vec_deque::Iter<'_, HealthRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Total records ever received, including evicted ones.
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Total records evicted to honour the capacity.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }
}

impl<'a> IntoIterator for &'a RecordBuffer {
    type Item = &'a HealthRecord;
    type IntoIter = vec_deque::Iter<'a, HealthRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
