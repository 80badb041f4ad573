use chrono::NaiveTime;
use log::debug;
use models::{
    course_data::{Course, Enrollment},
    days::DaySet,
    time::{MINUTES_PER_DAY, minutes_since_midnight, parse_clock},
    units::Units,
};
use std::fmt::{Display as FmtDisplay, Formatter, Result as FmtResult};
use strum::{Display, EnumString};

/// Course number bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CourseLevel {
    /// 1 through 99
    Lower,
    /// 100 through 199
    Upper,
    /// 200 and up
    Graduate,
}

impl CourseLevel {
    pub fn contains(self, number: i64) -> bool {
        match self {
            Self::Lower => (1..=99).contains(&number),
            Self::Upper => (100..=199).contains(&number),
            Self::Graduate => number >= 200,
        }
    }
}

/// Enrollment states a search can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EnrollmentFilter {
    /// Seats remain
    Open,
    /// At or over capacity
    Closed,
    /// Someone is on the waitlist
    Waitlist,
}

impl EnrollmentFilter {
    pub fn matches(self, enrollment: &Enrollment) -> bool {
        match self {
            Self::Open => enrollment.is_open(),
            Self::Closed => enrollment.is_closed(),
            Self::Waitlist => enrollment.has_waitlist(),
        }
    }
}

/// A course search. Every field is optional; a course must match all the
/// fields that are set, and any one value of a multi-valued field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    /// Case-insensitive text in the code, number, title, or description, or an exact CRN
    pub keyword: Option<String>,
    /// Exact subject code
    pub subject: Option<String>,
    pub course_level: Option<CourseLevel>,
    pub units: Option<Units>,
    /// Days any section meets on
    pub meeting_days: Option<DaySet>,
    /// Earliest edge of the time window (midnight when unset)
    pub start_time: Option<NaiveTime>,
    /// Latest edge of the time window (end of day when unset)
    pub end_time: Option<NaiveTime>,
    /// Exact section type code (e.g., "LEC")
    pub meeting_type: Option<String>,
    pub include_type: Option<EnrollmentFilter>,
    /// GE codes, any of which must appear in the course's GE codes
    pub ge_options: Vec<String>,
    /// Core literacy codes, any of which must appear in the course's GE codes
    pub core_literacies: Vec<String>,
}

/// A search field whose value could not be understood
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaError {
    UnknownCourseLevel(String),
    InvalidUnits(String),
    UnknownDay(String),
    InvalidTime { field: &'static str, value: String },
    UnknownIncludeType(String),
}

impl FmtDisplay for CriteriaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::UnknownCourseLevel(level) => write!(f, "Unknown course level: {level}"),
            Self::InvalidUnits(units) => write!(f, "Invalid unit count: {units}"),
            Self::UnknownDay(day) => write!(f, "Unknown meeting day: {day}"),
            Self::InvalidTime { field, value } => write!(f, "Invalid {field}: {value}"),
            Self::UnknownIncludeType(status) => write!(f, "Unknown enrollment status: {status}"),
        }
    }
}

impl std::error::Error for CriteriaError {}

fn parse_time(field: &'static str, value: &str) -> Result<NaiveTime, CriteriaError> {
    parse_clock(value).ok_or_else(|| CriteriaError::InvalidTime {
        field,
        value: value.to_owned(),
    })
}

impl Criteria {
    /// Builds criteria from search form fields, e.g. `("meetingDays", "mon")`.
    ///
    /// Blank values are skipped, repeated multi-valued fields accumulate, a
    /// repeated single-valued field keeps its last value, and unknown fields
    /// are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, CriteriaError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::default();

        for (key, value) in pairs {
            let key = key.as_ref();
            let value = value.as_ref().trim();

            if value.is_empty() {
                continue;
            }

            match key {
                "keyword" => criteria.keyword = Some(value.to_owned()),
                "subject" => criteria.subject = Some(value.to_owned()),
                "courseLevel" => {
                    let level = value
                        .parse()
                        .map_err(|_| CriteriaError::UnknownCourseLevel(value.to_owned()))?;
                    criteria.course_level = Some(level);
                }
                "units" => {
                    let units = value
                        .parse()
                        .map_err(|_| CriteriaError::InvalidUnits(value.to_owned()))?;
                    criteria.units = Some(units);
                }
                "meetingDays" => {
                    let day = DaySet::from_key(value)
                        .ok_or_else(|| CriteriaError::UnknownDay(value.to_owned()))?;
                    criteria.meeting_days.get_or_insert_default().add(day);
                }
                "startTime" => criteria.start_time = Some(parse_time("start time", value)?),
                "endTime" => criteria.end_time = Some(parse_time("end time", value)?),
                "meetingType" => criteria.meeting_type = Some(value.to_owned()),
                "includeType" => {
                    let status = value
                        .parse()
                        .map_err(|_| CriteriaError::UnknownIncludeType(value.to_owned()))?;
                    criteria.include_type = Some(status);
                }
                "geOptions" => criteria.ge_options.push(value.to_owned()),
                "coreLiteracies" => criteria.core_literacies.push(value.to_owned()),
                _ => debug!("Ignoring unknown search field '{key}'"),
            }
        }

        Ok(criteria)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether a course satisfies every criterion that is set
    pub fn matches(&self, course: &Course) -> bool {
        self.keyword
            .as_deref()
            .is_none_or(|keyword| matches_keyword(course, keyword))
            && self
                .subject
                .as_deref()
                .is_none_or(|subject| course.code == subject)
            && self
                .course_level
                .is_none_or(|level| course.level_number().is_some_and(|n| level.contains(n)))
            && self.units.is_none_or(|units| course.units == units)
            && self
                .meeting_days
                .is_none_or(|days| matches_meeting_days(course, days))
            && (self.start_time.is_none() && self.end_time.is_none()
                || matches_time_range(course, self.start_time, self.end_time))
            && self.meeting_type.as_deref().is_none_or(|section_type| {
                course.sections.iter().any(|s| s.section_type == section_type)
            })
            && self.include_type.is_none_or(|status| {
                course.sections.iter().any(|s| status.matches(&s.enrollment))
            })
            && matches_any_code(course, &self.ge_options)
            && matches_any_code(course, &self.core_literacies)
    }
}

fn matches_keyword(course: &Course, keyword: &str) -> bool {
    let needle = keyword.to_lowercase();

    [&course.code, &course.number, &course.title, &course.description]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
        || course.sections.iter().any(|section| section.crn == keyword)
}

fn matches_meeting_days(course: &Course, days: DaySet) -> bool {
    course
        .sections
        .iter()
        .any(|section| section.days.meets_on_any(days))
}

/// A section matches when it starts inside the window, ends inside it, or
/// spans it. Sections with a TBA start or end never match.
fn matches_time_range(course: &Course, start: Option<NaiveTime>, end: Option<NaiveTime>) -> bool {
    let window_start = start.map_or(0, minutes_since_midnight);
    let window_end = end.map_or(MINUTES_PER_DAY, minutes_since_midnight);

    course.sections.iter().any(|section| {
        let Some((begin, finish)) = section.minutes() else {
            return false;
        };

        (begin >= window_start && begin < window_end)
            || (finish > window_start && finish <= window_end)
            || (begin <= window_start && finish >= window_end)
    })
}

/// No codes means no constraint; otherwise any code may match
fn matches_any_code(course: &Course, codes: &[String]) -> bool {
    codes.is_empty()
        || codes
            .iter()
            .any(|code| course.ge_codes.contains(&code.to_uppercase()))
}

/// Returns the courses matching every set criterion, in their original order
pub fn filter_courses<'a>(courses: &'a [Course], criteria: &Criteria) -> Vec<&'a Course> {
    courses
        .iter()
        .filter(|course| criteria.matches(course))
        .collect()
}
