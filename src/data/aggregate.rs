//! Pure folds from the record sequence into chart-ready summaries.
//!
//! Every function here takes the full sequence and recomputes from scratch.
//! Empty input always produces a fully structured result.

use serde::Serialize;

use healthwatch_types::{AgeBucket, HealthRecord, Sex};

/// Sick / not-sick counts for one age bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeBucketCount {
    #[serde(rename = "age_group")]
    pub bucket: AgeBucket,
    pub sick: u64,
    pub not_sick: u64,
}

/// Counts for all seven age buckets, always in [`AgeBucket::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AgeBreakdown {
    pub buckets: [AgeBucketCount; 7],
}

impl Default for AgeBreakdown {
    fn default() -> Self {
        Self {
            buckets: AgeBucket::ALL.map(|bucket| AgeBucketCount {
                bucket,
                sick: 0,
                not_sick: 0,
            }),
        }
    }
}

impl AgeBreakdown {
    /// Number of records counted (those with a parsable age).
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.sick + b.not_sick).sum()
    }

    /// Largest single count, used to scale bar charts.
    pub fn max_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.sick.max(b.not_sick)).max().unwrap_or(0)
    }

    pub fn get(&self, bucket: AgeBucket) -> &AgeBucketCount {
        &self.buckets[bucket.index()]
    }
}

/// Count sick and not-sick records per age bucket.
///
/// Records whose age is missing or unparsable are skipped entirely.
pub fn age_sickness<'a, I>(records: I) -> AgeBreakdown
where
    I: IntoIterator<Item = &'a HealthRecord>,
{
    let mut breakdown = AgeBreakdown::default();

    for record in records {
        let Some(bucket) = record.age_bucket() else {
            continue;
        };
        let entry = &mut breakdown.buckets[bucket.index()];
        if record.is_sick() {
            entry.sick += 1;
        } else {
            entry.not_sick += 1;
        }
    }

    breakdown
}

/// Raw counts of classified records by sex and sickness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GenderCounts {
    pub sick_male: u64,
    pub not_sick_male: u64,
    pub sick_female: u64,
    pub not_sick_female: u64,
}

impl GenderCounts {
    /// Records with a classified sex.
    pub fn total(&self) -> u64 {
        self.sick_male + self.not_sick_male + self.sick_female + self.not_sick_female
    }
}

/// One of the four pie slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GenderSlice {
    SickMale,
    NotSickMale,
    SickFemale,
    NotSickFemale,
}

impl GenderSlice {
    /// Slices in display order.
    pub const ALL: [GenderSlice; 4] = [
        GenderSlice::SickMale,
        GenderSlice::NotSickMale,
        GenderSlice::SickFemale,
        GenderSlice::NotSickFemale,
    ];

    /// Stable English name, used in exports.
    pub fn name(&self) -> &'static str {
        match self {
            GenderSlice::SickMale => "Sick Male",
            GenderSlice::NotSickMale => "Non-Sick Male",
            GenderSlice::SickFemale => "Sick Female",
            GenderSlice::NotSickFemale => "Non-Sick Female",
        }
    }
}

/// Percentages of classified records in each slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GenderBreakdown {
    pub sick_male: f64,
    pub not_sick_male: f64,
    pub sick_female: f64,
    pub not_sick_female: f64,
    pub counts: GenderCounts,
}

impl GenderBreakdown {
    /// The four slices with their percentages, in display order.
    pub fn entries(&self) -> [(GenderSlice, f64); 4] {
        [
            (GenderSlice::SickMale, self.sick_male),
            (GenderSlice::NotSickMale, self.not_sick_male),
            (GenderSlice::SickFemale, self.sick_female),
            (GenderSlice::NotSickFemale, self.not_sick_female),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.counts.total() == 0
    }
}

/// Percentage breakdown by sex and sickness.
///
/// Only `male` and `female` records are classified. With no classified
/// records every percentage is zero.
pub fn gender_sickness<'a, I>(records: I) -> GenderBreakdown
where
    I: IntoIterator<Item = &'a HealthRecord>,
{
    let mut counts = GenderCounts::default();

    for record in records {
        let sick = record.is_sick();
        match (record.sex, sick) {
            (Sex::Male, true) => counts.sick_male += 1,
            (Sex::Male, false) => counts.not_sick_male += 1,
            (Sex::Female, true) => counts.sick_female += 1,
            (Sex::Female, false) => counts.not_sick_female += 1,
            (Sex::Other, _) => {}
        }
    }

    let total = counts.total();
    if total == 0 {
        return GenderBreakdown::default();
    }

    let percent = |n: u64| n as f64 / total as f64 * 100.0;
    GenderBreakdown {
        sick_male: percent(counts.sick_male),
        not_sick_male: percent(counts.not_sick_male),
        sick_female: percent(counts.sick_female),
        not_sick_female: percent(counts.not_sick_female),
        counts,
    }
}

/// Distance-metric samples in arrival order. Records without a metric are
/// skipped.
pub fn distance_metrics<'a, I>(records: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a HealthRecord>,
{
    records.into_iter().filter_map(|r| r.distance_metric).collect()
}
