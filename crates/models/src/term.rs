use serde::Serialize;
use strum::{Display, EnumIter, EnumProperty, EnumString, IntoEnumIterator};

/// An academic quarter with its own course dataset
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    EnumIter,
    EnumProperty,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Term {
    #[strum(props(file = "ucd_classes_fall_2025.json"))]
    Fall,
    #[default]
    #[strum(props(file = "ucd_classes_winter_2025.json"))]
    Winter,
    #[strum(props(file = "ucd_classes_spring_2025.json"))]
    Spring,
}

impl Term {
    /// Name of the static JSON file holding this term's courses
    pub fn file_name(&self) -> &'static str {
        self.get_str("file").unwrap_or_default()
    }

    pub fn all() -> Vec<Term> {
        Term::iter().collect()
    }
}
