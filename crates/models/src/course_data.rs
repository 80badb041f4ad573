use crate::{
    days::Days,
    numeric::{leading_float, leading_integer},
    time::{MeetingTime, display_date},
    units::Units,
};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Name shown for any instructor the catalog does not name
pub const STAFF: &str = "Staff";

/// Represents an instructor of a course
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instructor {
    pub name: String,
    pub email: String,
}

impl Instructor {
    /// The placeholder instructor for courses with no instructor data
    pub fn staff() -> Self {
        Self {
            name: STAFF.to_owned(),
            email: String::new(),
        }
    }
}

impl Default for Instructor {
    fn default() -> Self {
        Self::staff()
    }
}

/// Seat counts for a section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Enrollment {
    pub current: u32,
    pub max: u32,
    pub waitlist: u32,
}

impl Enrollment {
    pub fn is_open(&self) -> bool {
        self.current < self.max
    }

    pub fn is_closed(&self) -> bool {
        self.current >= self.max
    }

    pub fn has_waitlist(&self) -> bool {
        self.waitlist > 0
    }
}

impl Display for Enrollment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.current, self.max)?;

        if self.has_waitlist() {
            write!(f, " (Waitlist: {})", self.waitlist)?;
        }

        Ok(())
    }
}

/// First and last day a section meets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionDates {
    #[serde(serialize_with = "serialize_date")]
    pub start: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_date")]
    pub end: Option<NaiveDate>,
}

fn serialize_date<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&display_date(*date))
}

/// Represents a single meeting pattern of a course
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Course reference number of the owning course
    pub crn: String,
    /// Meeting type code (e.g., "LEC", "DIS")
    #[serde(rename = "type")]
    pub section_type: String,
    pub meeting_code: String,
    pub description: String,
    /// Days the meeting occurs
    pub days: Days,
    pub start_time: MeetingTime,
    pub end_time: MeetingTime,
    pub building: String,
    pub room: String,
    /// Display name of the first instructor
    pub instructor: String,
    /// Enrollment status as reported by the registrar
    pub status: String,
    pub enrollment: Enrollment,
    pub dates: SectionDates,
}

impl Section {
    /// Start and end in minutes since midnight, if both are known
    pub fn minutes(&self) -> Option<(u32, u32)> {
        Some((self.start_time.minutes()?, self.end_time.minutes()?))
    }
}

/// Represents a course offered in a term
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Subject code (e.g., "CSE")
    pub code: String,
    /// Course number (e.g., "120", "189A")
    pub number: String,
    pub title: String,
    pub units: Units,
    pub description: String,
    pub prerequisites: String,
    /// General-Education and core-literacy codes the course satisfies
    pub ge_codes: String,
    pub department: String,
    pub crn: String,
    pub final_exam: String,
    pub instructors: Vec<Instructor>,
    pub sections: Vec<Section>,
}

impl Course {
    /// The decimal prefix of the course number, used for ordering
    pub fn numeric_number(&self) -> Option<f64> {
        leading_float(&self.number)
    }

    /// The integer prefix of the course number, used for course levels
    pub fn level_number(&self) -> Option<i64> {
        leading_integer(&self.number)
    }

    /// Catalog order: subject code, then course number numerically.
    ///
    /// Numbers without a numeric prefix come after all numeric ones and
    /// compare equal to each other, as do numerically equal prefixes such as
    /// `"-0"` and `"0"`.
    pub fn cmp_catalog(&self, other: &Self) -> Ordering {
        self.code.cmp(&other.code).then_with(|| {
            match (self.numeric_number(), other.numeric_number()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        })
    }
}
