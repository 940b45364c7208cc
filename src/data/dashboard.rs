//! Derived dashboard state, recomputed from the full record sequence.

use std::time::Instant;

use serde::Serialize;

use healthwatch_types::HealthRecord;

use super::aggregate::{age_sickness, distance_metrics, gender_sickness, AgeBreakdown, GenderBreakdown};
use super::density::{sample_markers, DensityParams, Marker};

/// All chart summaries for one state of the record buffer.
///
/// Nothing here is updated incrementally: every change to the buffer
/// produces a fresh value via [`DashboardData::from_records`].
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub record_count: usize,
    pub sick_count: usize,
    pub age: AgeBreakdown,
    pub gender: GenderBreakdown,
    pub distance_samples: Vec<f64>,
    pub markers: Vec<Marker>,
    pub last_updated: Instant,
}

impl DashboardData {
    /// Fold the record sequence into chart summaries.
    pub fn from_records<'a, I>(records: I, density: &DensityParams) -> Self
    where
        I: IntoIterator<Item = &'a HealthRecord>,
        I::IntoIter: Clone,
    {
        let records = records.into_iter();
        let distance_samples = distance_metrics(records.clone());
        let markers = sample_markers(&distance_samples, density);

        Self {
            record_count: records.clone().count(),
            sick_count: records.clone().filter(|r| r.is_sick()).count(),
            age: age_sickness(records.clone()),
            gender: gender_sickness(records),
            distance_samples,
            markers,
            last_updated: Instant::now(),
        }
    }

    /// Structured defaults for an empty buffer.
    pub fn empty(density: &DensityParams) -> Self {
        Self::from_records(std::iter::empty(), density)
    }

    /// Share of records that are sick, in percent.
    pub fn sick_percent(&self) -> f64 {
        if self.record_count == 0 {
            0.0
        } else {
            self.sick_count as f64 / self.record_count as f64 * 100.0
        }
    }

    /// Serializable summary used by exports.
    pub fn summary(&self) -> DashboardSummary<'_> {
        DashboardSummary {
            records: self.record_count,
            age_groups: &self.age,
            gender: self
                .gender
                .entries()
                .iter()
                .map(|(slice, value)| GenderEntry {
                    name: slice.name(),
                    value: *value,
                })
                .collect(),
            distance_metrics: &self.distance_samples,
        }
    }
}

/// Export shape: `{records, age_groups, gender, distance_metrics}`.
#[derive(Debug, Serialize)]
pub struct DashboardSummary<'a> {
    pub records: usize,
    pub age_groups: &'a AgeBreakdown,
    pub gender: Vec<GenderEntry>,
    pub distance_metrics: &'a [f64],
}

#[derive(Debug, Serialize)]
pub struct GenderEntry {
    pub name: &'static str,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthwatch_types::Sex;

    fn record(age: &str, sex: Sex, symptoms: &[&str], metric: f64) -> HealthRecord {
        HealthRecord {
            age_group: Some(age.to_string()),
            latitude: Some(37.3),
            longitude: Some(-121.9),
            sex,
            distance_metric: Some(metric),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_dashboard() {
        let data = DashboardData::empty(&DensityParams::default());
        assert_eq!(data.record_count, 0);
        assert_eq!(data.age.buckets.len(), 7);
        assert_eq!(data.age.total(), 0);
        assert!(data.gender.entries().iter().all(|(_, v)| *v == 0.0));
        assert!(data.distance_samples.is_empty());
        assert!(data.markers.is_empty());
        assert_eq!(data.sick_percent(), 0.0);
    }

    #[test]
    fn test_from_records() {
        let records = vec![
            record("22", Sex::Male, &["covid"], 1.0),
            record("47", Sex::Female, &["none"], 2.5),
            record("x", Sex::Female, &["cold"], 4.0),
        ];
        let data = DashboardData::from_records(&records, &DensityParams::default());

        assert_eq!(data.record_count, 3);
        assert_eq!(data.sick_count, 2);
        assert_eq!(data.age.total(), 2);
        assert_eq!(data.gender.counts.total(), 3);
        assert_eq!(data.distance_samples, vec![1.0, 2.5, 4.0]);
        assert_eq!(data.markers.last().unwrap().opacity, 1.0);
    }

    #[test]
    fn test_missing_metric_counts_as_record() {
        let mut without_metric = record("52", Sex::Male, &["covid"], 0.0);
        without_metric.distance_metric = None;
        let records = vec![without_metric, record("31", Sex::Female, &["none"], 2.0)];
        let data = DashboardData::from_records(&records, &DensityParams::default());

        assert_eq!(data.record_count, 2);
        assert_eq!(data.sick_percent(), 50.0);
        assert_eq!(data.distance_samples, vec![2.0]);
        assert_eq!(data.markers.len(), 1);
    }

    #[test]
    fn test_summary_serializes() {
        let records = vec![record("35", Sex::Male, &["cold"], 1.5)];
        let data = DashboardData::from_records(&records, &DensityParams::default());
        let json = serde_json::to_value(data.summary()).unwrap();

        assert_eq!(json["records"], 1);
        assert_eq!(json["age_groups"].as_array().unwrap().len(), 7);
        assert_eq!(json["age_groups"][2]["age_group"], "30-40");
        assert_eq!(json["age_groups"][2]["sick"], 1);
        assert_eq!(json["gender"][0]["name"], "Sick Male");
        assert_eq!(json["gender"][0]["value"], 100.0);
        assert_eq!(json["distance_metrics"][0], 1.5);
    }
}
