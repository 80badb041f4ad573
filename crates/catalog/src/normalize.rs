use crate::raw::{
    Lenient, RawCourse, RawIdentity, RawInstructor, RawMeeting, RawTerm, Scalar, nested, number,
    text,
};
use log::{debug, info, warn};
use models::{
    course_data::{Course, Enrollment, Instructor, STAFF, Section, SectionDates},
    days::Days,
    numeric::leading_integer,
    subject::known_department_name,
    time::{MeetingTime, TBA},
    units::Units,
};
use std::collections::{BTreeMap, BTreeSet};

const NO_TITLE: &str = "No Title Available";
const NO_DESCRIPTION: &str = "No description available";
const NO_PREREQUISITES: &str = "None";
const UNKNOWN_DEPARTMENT: &str = "Unknown Department";
const NO_EXAM: &str = "No exam information";
const UNKNOWN_STATUS: &str = "Unknown";
const SECTION_DESCRIPTION: &str = "Section";

/// One term's courses in catalog order, plus what the subject selector needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermCatalog {
    /// Courses sorted by subject code, then numerically by course number
    pub courses: Vec<Course>,
    /// Every subject code seen in the term
    pub subjects: BTreeSet<String>,
    /// Subject code to the department name the data gives for it, when it gives one
    pub departments: BTreeMap<String, String>,
}

impl TermCatalog {
    /// Display name for a subject code: the latest name the data gives, then
    /// the built-in table, then the code itself
    pub fn department_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.departments
            .get(code)
            .map(String::as_str)
            .or_else(|| known_department_name(code))
            .unwrap_or(code)
    }
}

/// Sorts courses into catalog order. The sort is stable, so courses that
/// compare equal keep their original order.
pub fn sort_courses(courses: &mut [Course]) {
    courses.sort_by(Course::cmp_catalog);
}

/// Converts one term's raw document into a [`TermCatalog`].
///
/// Records that cannot be decoded or that lack a subject code are skipped,
/// as are meetings without a type or day string. Nothing here fails the batch.
pub fn normalize(raw: RawTerm) -> TermCatalog {
    let mut catalog = TermCatalog::default();
    let mut skipped = 0;

    for (group_index, group) in raw.into_iter().enumerate() {
        for (index, record) in group.into_iter().enumerate() {
            if !record.is_object() {
                warn!("Skipping course record {group_index}/{index} that is not an object");
                skipped += 1;
                continue;
            }

            let raw_course = match serde_json::from_value::<RawCourse>(record) {
                Ok(raw_course) => raw_course,
                Err(e) => {
                    warn!("Skipping undecodable course record {group_index}/{index}: {e}");
                    skipped += 1;
                    continue;
                }
            };

            let Some(course) = build_course(&raw_course) else {
                debug!("Skipping course record {group_index}/{index} without a subject code");
                skipped += 1;
                continue;
            };

            catalog.subjects.insert(course.code.clone());
            if course.department != UNKNOWN_DEPARTMENT {
                catalog
                    .departments
                    .insert(course.code.clone(), course.department.clone());
            }
            catalog.courses.push(course);
        }
    }

    sort_courses(&mut catalog.courses);

    info!(
        "Normalized {} courses across {} subjects ({skipped} records skipped)",
        catalog.courses.len(),
        catalog.subjects.len()
    );

    catalog
}

/// Builds a course from a raw record, or `None` if it has no subject code
fn build_course(raw: &RawCourse) -> Option<Course> {
    let identity = nested(&raw.course)?;
    let code = text(&identity.subject_code)?;
    let supplement = nested(&raw.icms_data);

    let crn = text(&identity.crn).unwrap_or_default();
    let instructors = build_instructors(raw);

    let sections = build_sections(raw, &crn, &instructors);

    Some(Course {
        code,
        number: text(&identity.course_num).unwrap_or_default(),
        title: text(&identity.title).unwrap_or_else(|| NO_TITLE.to_owned()),
        units: resolve_units(identity),
        description: supplement
            .and_then(|s| text(&s.new_description))
            .unwrap_or_else(|| NO_DESCRIPTION.to_owned()),
        prerequisites: supplement
            .and_then(|s| text(&s.prereq))
            .unwrap_or_else(|| NO_PREREQUISITES.to_owned()),
        ge_codes: supplement.and_then(|s| text(&s.ge3)).unwrap_or_default(),
        department: text(&identity.subject_desc)
            .unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_owned()),
        crn,
        final_exam: nested(&raw.final_exam)
            .and_then(|exam| text(&exam.exam_date))
            .unwrap_or_else(|| NO_EXAM.to_owned()),
        instructors,
        sections,
    })
}

/// Units come from `unitsLow` when it is a non-zero number, then from the
/// integer prefix of `creditHours`; otherwise the course has variable units.
fn resolve_units(identity: &RawIdentity) -> Units {
    if let Some(units) = number(&identity.units_low).filter(|n| *n != 0.0) {
        return Units::Fixed(units as f32);
    }

    text(&identity.credit_hours)
        .and_then(|hours| leading_integer(&hours))
        .map_or(Units::Variable, |hours| Units::Fixed(hours as f32))
}

fn build_instructors(raw: &RawCourse) -> Vec<Instructor> {
    match nested(&raw.instructor) {
        Some(instructors) if !instructors.is_empty() => {
            instructors.iter().map(build_instructor).collect()
        }
        _ => vec![Instructor::staff()],
    }
}

fn build_instructor(raw: &Lenient<RawInstructor>) -> Instructor {
    let Some(raw) = raw.parsed() else {
        return Instructor::staff();
    };

    Instructor {
        name: text(&raw.full_name)
            .or_else(|| text(&raw.instructor_name))
            .unwrap_or_else(|| STAFF.to_owned()),
        email: text(&raw.instructor_email).unwrap_or_default(),
    }
}

/// Seat counts are whole and non-negative; anything else reads as zero
fn count(field: &Option<Scalar>) -> u32 {
    number(field).filter(|n| *n > 0.0).map_or(0, |n| n as u32)
}

fn build_sections(raw: &RawCourse, crn: &str, instructors: &[Instructor]) -> Vec<Section> {
    let Some(meetings) = nested(&raw.meeting) else {
        return Vec::new();
    };

    let instructor = instructors
        .first()
        .map_or_else(|| STAFF.to_owned(), |i| i.name.clone());
    let status = text(&raw.enrollment_status).unwrap_or_else(|| UNKNOWN_STATUS.to_owned());
    let enrollment = Enrollment {
        current: count(&raw.current_enrollment),
        max: count(&raw.max_enrollment),
        waitlist: count(&raw.waitlist_count),
    };

    meetings
        .iter()
        .enumerate()
        .filter_map(|(index, meeting)| {
            let section = meeting.parsed().and_then(|meeting| {
                build_section(meeting, crn, &instructor, &status, enrollment)
            });

            if section.is_none() {
                debug!("Skipping meeting {index} of CRN '{crn}' without a type or days");
            }

            section
        })
        .collect()
}

/// Builds a section from a meeting, or `None` if it has no type or day string
fn build_section(
    meeting: &RawMeeting,
    crn: &str,
    instructor: &str,
    status: &str,
    enrollment: Enrollment,
) -> Option<Section> {
    let section_type = text(&meeting.meeting_type)?;
    let days = text(&meeting.days_string)?;

    let time = |field: &Option<Scalar>| {
        text(field).map_or(MeetingTime::TBA, |t| MeetingTime::from_compact(&t))
    };
    let location = |field: &Option<Scalar>| text(field).unwrap_or_else(|| TBA.to_owned());

    Some(Section {
        crn: crn.to_owned(),
        section_type,
        meeting_code: text(&meeting.meet_code).unwrap_or_default(),
        description: text(&meeting.description)
            .unwrap_or_else(|| SECTION_DESCRIPTION.to_owned()),
        days: Days::from(days),
        start_time: time(&meeting.start_time),
        end_time: time(&meeting.end_time),
        building: location(&meeting.building),
        room: location(&meeting.room),
        instructor: instructor.to_owned(),
        status: status.to_owned(),
        enrollment,
        dates: SectionDates {
            start: meeting.start_date.as_ref().and_then(Scalar::as_date),
            end: meeting.end_date.as_ref().and_then(Scalar::as_date),
        },
    })
}
