//! Health record - a single streamed observation.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{AgeBucket, NO_SYMPTOMS_TAG};

/// Sex of a participant.
///
/// Only exact `"male"` and `"female"` values are classified; anything else,
/// including a missing field, is [`Sex::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    #[serde(other)]
    Other,
}

/// One streamed observation.
///
/// Field names follow the backend's JSON schema. Decoding never rejects an
/// object over its field types: a field that cannot be interpreted is left
/// empty and the record is excluded only from the summaries that need it.
/// Records are immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Age as sent by the backend. Usually a decimal string; may be absent
    /// or non-numeric.
    #[serde(
        rename = "AgeGroup",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub age_group: Option<String>,

    /// Missing, non-numeric and non-finite coordinates are `None`.
    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(rename = "Sex", default, deserialize_with = "lenient_sex")]
    pub sex: Sex,

    /// Score plotted against the reference distribution.
    #[serde(
        rename = "DistanceMetric",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub distance_metric: Option<f64>,

    /// Symptom tags in the order sent. The tag `"none"` means not sick.
    /// A missing or non-array value is an empty list; non-string entries
    /// are skipped.
    #[serde(rename = "Symptoms", default, deserialize_with = "lenient_symptoms")]
    pub symptoms: Vec<String>,
}

impl HealthRecord {
    /// A record is sick when it has at least one symptom and none of them is
    /// the `"none"` tag.
    pub fn is_sick(&self) -> bool {
        !self.symptoms.is_empty() && !self.has_symptom(NO_SYMPTOMS_TAG)
    }

    /// Whether the symptom list contains `tag` exactly.
    pub fn has_symptom(&self, tag: &str) -> bool {
        self.symptoms.iter().any(|s| s == tag)
    }

    /// Parsed numeric age, if the age field holds one.
    pub fn age(&self) -> Option<i64> {
        self.age_group.as_deref().and_then(parse_age)
    }

    /// Age bucket for this record, or `None` when the age is unparsable.
    pub fn age_bucket(&self) -> Option<AgeBucket> {
        self.age().map(AgeBucket::from_age)
    }

    /// `(latitude, longitude)` when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Parse an age value with leading-integer semantics.
///
/// Leading whitespace and an optional sign are accepted, followed by at least
/// one ASCII digit. Anything after the digits is ignored, so `"42 years"`
/// parses as 42 while `"<20"` and `""` are rejected. Values beyond the `i64`
/// range saturate.
pub fn parse_age(value: &str) -> Option<i64> {
    let trimmed = value.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: Vec<i64> = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .map(|d| i64::from(d - b'0'))
        .collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits
        .iter()
        .fold(0i64, |acc, d| acc.saturating_mul(10).saturating_add(*d));
    Some(if negative { -magnitude } else { magnitude })
}

/// Accept a string, a number or null for the age field.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept a finite number or a numeric string; anything else is `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let number = match value {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()))
}

/// Keep the string entries of an array; any other value is an empty list.
fn lenient_symptoms<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Classify the sex field; null, non-strings and unknown values are `Other`.
fn lenient_sex<'de, D>(deserializer: D) -> Result<Sex, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value.as_ref().and_then(serde_json::Value::as_str) {
        Some("male") => Sex::Male,
        Some("female") => Sex::Female,
        _ => Sex::Other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symptoms: &[&str]) -> HealthRecord {
        HealthRecord {
            age_group: Some("30".to_string()),
            latitude: Some(0.0),
            longitude: Some(0.0),
            sex: Sex::Male,
            distance_metric: Some(1.0),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_sickness_rule() {
        assert!(record(&["cold"]).is_sick());
        assert!(record(&["cold", "covid"]).is_sick());
        assert!(!record(&["none"]).is_sick());
        assert!(!record(&["cold", "none"]).is_sick());
        assert!(!record(&[]).is_sick());
    }

    #[test]
    fn test_parse_age() {
        assert_eq!(parse_age("25"), Some(25));
        assert_eq!(parse_age("  42 years"), Some(42));
        assert_eq!(parse_age("+7"), Some(7));
        assert_eq!(parse_age("-3"), Some(-3));
        assert_eq!(parse_age("<20"), None);
        assert_eq!(parse_age(""), None);
        assert_eq!(parse_age("abc"), None);
        assert_eq!(parse_age("-"), None);
    }

    #[test]
    fn test_parse_age_saturates() {
        assert_eq!(parse_age("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_age("-99999999999999999999"), Some(-i64::MAX));
        assert_eq!(
            AgeBucket::from_age(parse_age("99999999999999999999").unwrap()),
            AgeBucket::From80
        );
    }

    #[test]
    fn test_deserialize_full_record() {
        let json = r#"{"AgeGroup":"55","latitude":37.1,"longitude":-121.5,
            "Sex":"male","DistanceMetric":3.5,"Symptoms":["covid","cold"]}"#;
        let r: HealthRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.age_group.as_deref(), Some("55"));
        assert_eq!(r.sex, Sex::Male);
        assert_eq!(r.symptoms, vec!["covid", "cold"]);
        assert_eq!(r.age_bucket(), Some(AgeBucket::From50To60));
    }

    #[test]
    fn test_deserialize_lenient_fields() {
        let json = r#"{"AgeGroup":61,"latitude":1.0,"longitude":2.0,
            "Sex":"unknown","DistanceMetric":0.5}"#;
        let r: HealthRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.age_group.as_deref(), Some("61"));
        assert_eq!(r.sex, Sex::Other);
        assert!(r.symptoms.is_empty());

        let json = r#"{"AgeGroup":null,"latitude":1.0,"longitude":2.0,"Sex":null,"DistanceMetric":0.5}"#;
        let r: HealthRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.age_group, None);
        assert_eq!(r.sex, Sex::Other);
        assert_eq!(r.age_bucket(), None);
    }

    #[test]
    fn test_wrong_field_types_are_tolerated() {
        let json = r#"{"AgeGroup":"20","latitude":"37.3","longitude":true,
            "Sex":"male","DistanceMetric":"far","Symptoms":null}"#;
        let r: HealthRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.latitude, Some(37.3));
        assert_eq!(r.longitude, None);
        assert_eq!(r.coordinates(), None);
        assert_eq!(r.distance_metric, None);
        assert!(r.symptoms.is_empty());
        assert_eq!(r.age_bucket(), Some(AgeBucket::From20To30));

        let json = r#"{"Sex":"female","Symptoms":["cold",3,null,"covid"]}"#;
        let r: HealthRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.symptoms, vec!["cold", "covid"]);
        assert_eq!(r.latitude, None);
        assert!(r.is_sick());
    }
}
