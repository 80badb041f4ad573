use strum::{Display, EnumIter, EnumProperty, EnumString};

/// Subject codes with a department name known ahead of any data load
#[derive(Debug, Clone, Copy, PartialEq, Display, EnumString, EnumIter, EnumProperty)]
pub enum KnownSubject {
    #[strum(props(name = "Biological Sciences"))]
    BIS,
    #[strum(props(name = "Computer Science & Engineering"))]
    CSE,
    #[strum(props(name = "Mathematics"))]
    MAT,
    #[strum(props(name = "Physics"))]
    PHY,
    #[strum(props(name = "Chemical Engineering"))]
    CHE,
    #[strum(props(name = "Engineering Aerospace"))]
    EAE,
    #[strum(props(name = "Economics"))]
    ECN,
    #[strum(props(name = "Political Science"))]
    PSC,
    #[strum(props(name = "Anthropology"))]
    ANT,
    #[strum(props(name = "Psychology"))]
    PSY,
    #[strum(props(name = "Sociology"))]
    SOC,
    #[strum(props(name = "Music"))]
    MUS,
    #[strum(props(name = "Art"))]
    ART,
    #[strum(props(name = "English"))]
    ENG,
    #[strum(props(name = "History"))]
    HIS,
    #[strum(props(name = "Chinese"))]
    CHN,
    #[strum(props(name = "French"))]
    FRE,
    #[strum(props(name = "Spanish"))]
    SPA,
    #[strum(props(name = "Japanese"))]
    JPN,
    #[strum(props(name = "German"))]
    GER,
}

impl KnownSubject {
    pub fn department_name(&self) -> &'static str {
        self.get_str("name").unwrap_or_default()
    }
}

/// Looks up the built-in department name for a subject code
pub fn known_department_name(code: &str) -> Option<&'static str> {
    code.parse::<KnownSubject>()
        .ok()
        .map(|subject| subject.department_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_known_department_name() {
        assert_eq!(
            known_department_name("CSE"),
            Some("Computer Science & Engineering")
        );
        assert_eq!(known_department_name("GER"), Some("German"));
        assert_eq!(known_department_name("ZZZ"), None);
    }

    #[test]
    fn test_every_subject_has_a_name() {
        for subject in KnownSubject::iter() {
            assert!(!subject.department_name().is_empty(), "{subject}");
        }
        assert_eq!(KnownSubject::iter().count(), 20);
    }
}
