use serde::{Serialize, Serializer};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::{BitAnd, BitOr, BitOrAssign},
    str::FromStr,
};

/// Represents the days of the week a meeting occurs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct DaySet(u8);

impl DaySet {
    // Constants for individual days
    pub const MONDAY: Self = DaySet(1 << 0);
    pub const TUESDAY: Self = DaySet(1 << 1);
    pub const WEDNESDAY: Self = DaySet(1 << 2);
    pub const THURSDAY: Self = DaySet(1 << 3);
    pub const FRIDAY: Self = DaySet(1 << 4);
    pub const SATURDAY: Self = DaySet(1 << 5);
    pub const SUNDAY: Self = DaySet(1 << 6);

    pub const NONE: Self = DaySet(0);

    /// Day-to-char mapping for parsing and display
    const DAY_CHARS: [(Self, char); 7] = [
        (Self::MONDAY, 'M'),
        (Self::TUESDAY, 'T'),
        (Self::WEDNESDAY, 'W'),
        (Self::THURSDAY, 'R'),
        (Self::FRIDAY, 'F'),
        (Self::SATURDAY, 'S'),
        (Self::SUNDAY, 'U'),
    ];

    /// Search form keys for the days a meeting filter can ask for
    const DAY_KEYS: [(&'static str, Self); 6] = [
        ("mon", Self::MONDAY),
        ("tues", Self::TUESDAY),
        ("wed", Self::WEDNESDAY),
        ("thurs", Self::THURSDAY),
        ("fri", Self::FRIDAY),
        ("sat", Self::SATURDAY),
    ];

    /// Looks up a single day by its search form key (e.g. `"mon"`, `"thurs"`)
    pub fn from_key(key: &str) -> Option<Self> {
        Self::DAY_KEYS
            .iter()
            .find(|(day_key, _)| day_key.eq_ignore_ascii_case(key.trim()))
            .map(|&(_, day)| day)
    }

    pub fn contains(self, day: Self) -> bool {
        (self & day) == day
    }

    /// Whether the two sets share at least one day
    pub fn intersects(self, other: Self) -> bool {
        (self & other) != Self::NONE
    }

    pub fn add(&mut self, day: Self) {
        *self = *self | day;
    }
}

impl FromStr for DaySet {
    type Err = ();

    fn from_str(days: &str) -> Result<Self, Self::Err> {
        let mut result = Self::NONE;

        for c in days.chars() {
            for &(day, day_char) in &Self::DAY_CHARS {
                if c == day_char {
                    result |= day;
                    break;
                }
            }
        }

        Ok(result)
    }
}

impl Display for DaySet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut result = String::new();

        for &(day, day_char) in &Self::DAY_CHARS {
            if self.contains(day) {
                result.push(day_char);
            }
        }

        write!(f, "{result}")
    }
}

// Bitwise operators
impl BitOr for DaySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        DaySet(self.0 | rhs.0)
    }
}

impl BitAnd for DaySet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        DaySet(self.0 & rhs.0)
    }
}

impl BitOrAssign for DaySet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Represents when a meeting can occur
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Days {
    /// Specific days
    Days(DaySet),
    #[default]
    /// To be announced
    TBA,
}

impl Days {
    /// Whether the meeting falls on any of the given days. TBA never does.
    pub fn meets_on_any(self, days: DaySet) -> bool {
        match self {
            Self::Days(set) => set.intersects(days),
            Self::TBA => false,
        }
    }
}

impl FromStr for Days {
    type Err = ();

    fn from_str(days: &str) -> Result<Self, Self::Err> {
        if days.contains("TBA") {
            Ok(Self::TBA)
        } else {
            DaySet::from_str(days).map(Self::Days)
        }
    }
}

impl From<String> for Days {
    fn from(days: String) -> Self {
        Self::from_str(&days).unwrap_or_default()
    }
}

impl Display for Days {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Days(days) => write!(f, "{days}"),
            Self::TBA => write!(f, "TBA"),
        }
    }
}

impl Serialize for Days {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
