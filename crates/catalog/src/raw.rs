//! The registrar's per-term JSON export, decoded as leniently as possible.
//!
//! Field presence and types vary record to record, so every scalar is a
//! [`Scalar`] and every nested object or list is wrapped in [`Lenient`]: a
//! value of the wrong shape decodes to `Lenient::Other` instead of failing the
//! record.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::{Number, Value};

/// One term's document: a list of record groups, each a list of raw courses
pub type RawTerm = Vec<Vec<Value>>;

/// A JSON scalar as the registrar emits it
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    Text(String),
    /// Arrays and objects where a scalar was expected
    Other(Value),
}

impl Scalar {
    /// Whether the value counts as present: non-empty text, a non-zero number, or `true`
    pub fn is_present(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
            Self::Text(s) => !s.is_empty(),
            Self::Other(_) => false,
        }
    }

    /// The value as text, if present
    pub fn as_text(&self) -> Option<String> {
        if !self.is_present() {
            return None;
        }

        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::Other(_) => None,
        }
    }

    /// The value as a finite number; numeric text is coerced
    pub fn as_number(&self) -> Option<f64> {
        let value: Option<f64> = match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) | Self::Other(_) => None,
        };

        value.filter(|n| n.is_finite())
    }

    /// The value as a calendar date.
    ///
    /// Accepts RFC 3339 timestamps, ISO dates with or without a time part,
    /// `MM/DD/YYYY`, and numbers as milliseconds since the Unix epoch.
    pub fn as_date(&self) -> Option<NaiveDate> {
        if !self.is_present() {
            return None;
        }

        match self {
            Self::Number(n) => {
                DateTime::from_timestamp_millis(n.as_i64()?).map(|dt| dt.date_naive())
            }
            Self::Text(s) => parse_date(s.trim()),
            Self::Bool(_) | Self::Other(_) => None,
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    // ISO dates, with or without a trailing time part
    if let Some(date) = s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()) {
        return Some(date);
    }

    NaiveDate::parse_from_str(s, "%m/%d/%Y").ok()
}

/// Reads an optional scalar field as present text
pub fn text(field: &Option<Scalar>) -> Option<String> {
    field.as_ref().and_then(Scalar::as_text)
}

/// Reads an optional scalar field as a number
pub fn number(field: &Option<Scalar>) -> Option<f64> {
    field.as_ref().and_then(Scalar::as_number)
}

/// The JSON shape a nested value must have to be decoded.
///
/// Derived struct decoders also accept arrays as positional fields, so
/// decoding alone cannot tell an object from a list.
pub trait Shape {
    fn fits(value: &Value) -> bool;
}

impl<T> Shape for Vec<T> {
    fn fits(value: &Value) -> bool {
        value.is_array()
    }
}

macro_rules! object_shape {
    ($($raw:ty),+) => {
        $(impl Shape for $raw {
            fn fits(value: &Value) -> bool {
                value.is_object()
            }
        })+
    };
}

object_shape!(RawIdentity, RawSupplement, RawFinalExam, RawInstructor, RawMeeting);

/// A nested value that decodes as `T` when it has the right shape
#[derive(Debug, Clone)]
pub enum Lenient<T> {
    Parsed(T),
    Other(Value),
}

impl<'de, T: DeserializeOwned + Shape> Deserialize<'de> for Lenient<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if !T::fits(&value) {
            return Ok(Self::Other(value));
        }

        match T::deserialize(&value) {
            Ok(parsed) => Ok(Self::Parsed(parsed)),
            Err(_) => Ok(Self::Other(value)),
        }
    }
}

impl<T> Lenient<T> {
    pub fn parsed(&self) -> Option<&T> {
        match self {
            Self::Parsed(value) => Some(value),
            Self::Other(_) => None,
        }
    }
}

/// Reads an optional nested field, if it has the expected shape
pub fn nested<T>(field: &Option<Lenient<T>>) -> Option<&T> {
    field.as_ref().and_then(Lenient::parsed)
}

/// A single raw course record
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCourse {
    /// Identity: subject, number, title, units
    pub course: Option<Lenient<RawIdentity>>,
    /// Supplemental catalog text
    pub icms_data: Option<Lenient<RawSupplement>>,
    pub final_exam: Option<Lenient<RawFinalExam>>,
    pub instructor: Option<Lenient<Vec<Lenient<RawInstructor>>>>,
    pub meeting: Option<Lenient<Vec<Lenient<RawMeeting>>>>,
    pub enrollment_status: Option<Scalar>,
    pub current_enrollment: Option<Scalar>,
    pub max_enrollment: Option<Scalar>,
    pub waitlist_count: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawIdentity {
    pub subject_code: Option<Scalar>,
    pub course_num: Option<Scalar>,
    pub title: Option<Scalar>,
    pub units_low: Option<Scalar>,
    pub credit_hours: Option<Scalar>,
    pub subject_desc: Option<Scalar>,
    pub crn: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSupplement {
    pub new_description: Option<Scalar>,
    pub prereq: Option<Scalar>,
    pub ge3: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFinalExam {
    pub exam_date: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawInstructor {
    pub full_name: Option<Scalar>,
    pub instructor_name: Option<Scalar>,
    pub instructor_email: Option<Scalar>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMeeting {
    #[serde(rename = "type")]
    pub meeting_type: Option<Scalar>,
    pub meet_code: Option<Scalar>,
    pub description: Option<Scalar>,
    pub days_string: Option<Scalar>,
    pub start_time: Option<Scalar>,
    pub end_time: Option<Scalar>,
    pub building: Option<Scalar>,
    pub room: Option<Scalar>,
    pub start_date: Option<Scalar>,
    pub end_date: Option<Scalar>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scalar(value: Value) -> Scalar {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_scalar_presence() {
        assert!(scalar(json!("CSE")).is_present());
        assert!(scalar(json!(4)).is_present());
        assert!(!scalar(json!("")).is_present());
        assert!(!scalar(json!(0)).is_present());
        assert!(!scalar(json!(false)).is_present());
        assert!(!scalar(json!({"a": 1})).is_present());
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar(json!(800)).as_text().as_deref(), Some("800"));
        assert_eq!(scalar(json!("1330")).as_text().as_deref(), Some("1330"));
        assert_eq!(scalar(json!("")).as_text(), None);
    }

    #[test]
    fn test_scalar_number() {
        assert_eq!(scalar(json!(4)).as_number(), Some(4.0));
        assert_eq!(scalar(json!(" 2.5 ")).as_number(), Some(2.5));
        assert_eq!(scalar(json!("four")).as_number(), None);
        assert_eq!(scalar(json!(true)).as_number(), None);
    }

    #[test]
    fn test_scalar_date() {
        let jan_6 = NaiveDate::from_ymd_opt(2025, 1, 6);
        assert_eq!(scalar(json!("2025-01-06")).as_date(), jan_6);
        assert_eq!(scalar(json!("2025-01-06T00:00:00")).as_date(), jan_6);
        assert_eq!(scalar(json!("2025-01-06T08:00:00Z")).as_date(), jan_6);
        assert_eq!(scalar(json!("01/06/2025")).as_date(), jan_6);
        assert_eq!(scalar(json!(1736150400000_i64)).as_date(), jan_6);
        assert_eq!(scalar(json!("next week")).as_date(), None);
    }

    #[test]
    fn test_lenient_shapes() {
        let course: RawCourse = serde_json::from_value(json!({
            "course": "not an object",
            "meeting": {"type": "LEC"},
            "instructor": [{"fullName": "Ada Lovelace"}, "oops"],
        }))
        .unwrap();

        assert!(nested(&course.course).is_none());
        assert!(nested(&course.meeting).is_none());

        let instructors = nested(&course.instructor).unwrap();
        assert_eq!(instructors.len(), 2);
        assert!(instructors[0].parsed().is_some());
        assert!(instructors[1].parsed().is_none());
    }

    #[test]
    fn test_lenient_rejects_positional_arrays() {
        let course: RawCourse = serde_json::from_value(json!({
            "course": ["CSE", "120", "Title"],
            "icmsData": [],
            "meeting": [["LEC", "A", "x", "MWF"], {"type": "DIS", "daysString": "R"}],
        }))
        .unwrap();

        assert!(nested(&course.course).is_none());
        assert!(nested(&course.icms_data).is_none());

        let meetings = nested(&course.meeting).unwrap();
        assert!(meetings[0].parsed().is_none());
        assert!(meetings[1].parsed().is_some());
    }
}
