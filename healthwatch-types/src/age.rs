//! Fixed age buckets used by the age/sickness breakdown.

use serde::{Deserialize, Serialize};

/// One of seven ordered, non-overlapping age ranges.
///
/// Lower bounds are inclusive and upper bounds exclusive. Ages below 20
/// (including negative values) fall in [`AgeBucket::Under20`]; 80 and above
/// fall in [`AgeBucket::From80`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    #[serde(rename = "<20")]
    Under20,
    #[serde(rename = "20-30")]
    From20To30,
    #[serde(rename = "30-40")]
    From30To40,
    #[serde(rename = "40-50")]
    From40To50,
    #[serde(rename = "50-60")]
    From50To60,
    #[serde(rename = "60-80")]
    From60To80,
    #[serde(rename = "80+")]
    From80,
}

impl AgeBucket {
    /// All buckets in display order.
    pub const ALL: [AgeBucket; 7] = [
        AgeBucket::Under20,
        AgeBucket::From20To30,
        AgeBucket::From30To40,
        AgeBucket::From40To50,
        AgeBucket::From50To60,
        AgeBucket::From60To80,
        AgeBucket::From80,
    ];

    /// Bucket for a numeric age.
    pub fn from_age(age: i64) -> Self {
        match age {
            i64::MIN..=19 => AgeBucket::Under20,
            20..=29 => AgeBucket::From20To30,
            30..=39 => AgeBucket::From30To40,
            40..=49 => AgeBucket::From40To50,
            50..=59 => AgeBucket::From50To60,
            60..=79 => AgeBucket::From60To80,
            _ => AgeBucket::From80,
        }
    }

    /// Axis label.
    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::Under20 => "<20",
            AgeBucket::From20To30 => "20-30",
            AgeBucket::From30To40 => "30-40",
            AgeBucket::From40To50 => "40-50",
            AgeBucket::From50To60 => "50-60",
            AgeBucket::From60To80 => "60-80",
            AgeBucket::From80 => "80+",
        }
    }

    /// Position of this bucket in [`AgeBucket::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl core::fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(AgeBucket::from_age(-5), AgeBucket::Under20);
        assert_eq!(AgeBucket::from_age(19), AgeBucket::Under20);
        assert_eq!(AgeBucket::from_age(20), AgeBucket::From20To30);
        assert_eq!(AgeBucket::from_age(39), AgeBucket::From30To40);
        assert_eq!(AgeBucket::from_age(59), AgeBucket::From50To60);
        assert_eq!(AgeBucket::from_age(60), AgeBucket::From60To80);
        assert_eq!(AgeBucket::from_age(79), AgeBucket::From60To80);
        assert_eq!(AgeBucket::from_age(80), AgeBucket::From80);
        assert_eq!(AgeBucket::from_age(120), AgeBucket::From80);
    }

    #[test]
    fn test_order_matches_index() {
        for (i, bucket) in AgeBucket::ALL.iter().enumerate() {
            assert_eq!(bucket.index(), i);
        }
        let labels: Vec<&str> = AgeBucket::ALL.iter().map(|b| b.label()).collect();
        assert_eq!(labels, ["<20", "20-30", "30-40", "40-50", "50-60", "60-80", "80+"]);
    }
}
