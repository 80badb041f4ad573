use serde::{Serialize, Serializer};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Custom error type for parsing units
#[derive(Debug, Clone, PartialEq)]
pub enum ParseUnitError {
    EmptyInput,
    NotANumber(String),
}

impl Display for ParseUnitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::EmptyInput => write!(f, "Empty input string"),
            Self::NotANumber(s) => write!(f, "Not a unit count: {s}"),
        }
    }
}

impl std::error::Error for ParseUnitError {}

/// How variable units are written in the catalog and in output
pub const VARIABLE: &str = "Var";

/// Represents how many units a course is worth
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Units {
    /// A fixed number of units
    Fixed(f32),
    /// Variable units, when the catalog gives no usable count
    Variable,
}

impl FromStr for Units {
    type Err = ParseUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(ParseUnitError::EmptyInput);
        }

        if s.eq_ignore_ascii_case(VARIABLE) {
            return Ok(Self::Variable);
        }

        s.parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Self::Fixed)
            .ok_or_else(|| ParseUnitError::NotANumber(s.to_owned()))
    }
}

impl Serialize for Units {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Fixed(value) => serializer.serialize_f32(*value),
            Self::Variable => serializer.serialize_str(VARIABLE),
        }
    }
}
