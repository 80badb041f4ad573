use models::course_data::Course;
use serde::Serialize;

/// Courses whose subject code starts with the same character
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LetterGroup<'a> {
    pub letter: char,
    pub departments: Vec<DepartmentGroup<'a>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentGroup<'a> {
    pub department: &'a str,
    pub courses: Vec<&'a Course>,
}

/// Groups courses by the first character of their subject code, then by
/// department. Groups appear in the order their first course does, and
/// courses keep their relative order.
pub fn group_by_letter<'a>(courses: &[&'a Course]) -> Vec<LetterGroup<'a>> {
    let mut groups: Vec<LetterGroup<'a>> = Vec::new();

    for &course in courses {
        let Some(letter) = course.code.chars().next() else {
            continue;
        };

        let index = match groups.iter().position(|g| g.letter == letter) {
            Some(index) => index,
            None => {
                groups.push(LetterGroup {
                    letter,
                    departments: Vec::new(),
                });
                groups.len() - 1
            }
        };
        let departments = &mut groups[index].departments;

        match departments
            .iter_mut()
            .find(|d| d.department == course.department)
        {
            Some(group) => group.courses.push(course),
            None => departments.push(DepartmentGroup {
                department: &course.department,
                courses: vec![course],
            }),
        }
    }

    groups
}
