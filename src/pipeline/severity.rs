use crate::common::error::{CatalogError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static CLASS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z])\s*(\d+(?:\.\d*)?|\.\d+)$").expect("flare class pattern is valid")
});

/// GOES X-ray flare letter classes, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityLetter {
    C,
    M,
    X,
}

impl SeverityLetter {
    /// Each letter is a decade of peak flux
    pub fn power(self) -> f64 {
        match self {
            SeverityLetter::X => 100.0,
            SeverityLetter::M => 10.0,
            SeverityLetter::C => 1.0,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'C' => Some(SeverityLetter::C),
            'M' => Some(SeverityLetter::M),
            'X' => Some(SeverityLetter::X),
            _ => None,
        }
    }
}

impl fmt::Display for SeverityLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            SeverityLetter::C => 'C',
            SeverityLetter::M => 'M',
            SeverityLetter::X => 'X',
        };
        write!(f, "{c}")
    }
}

/// Single comparable magnitude across letter classes: X1 = 100, M5 = 50, C9.9 = 9.9.
pub fn magnitude(letter: SeverityLetter, number: f64) -> f64 {
    letter.power() * number
}

/// A letter class with its level, e.g. `X2.7`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlareClass {
    pub letter: SeverityLetter,
    pub number: f64,
}

impl FlareClass {
    pub fn new(letter: SeverityLetter, number: f64) -> Self {
        Self { letter, number }
    }

    pub fn magnitude(&self) -> f64 {
        magnitude(self.letter, self.number)
    }
}

impl FromStr for FlareClass {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let text = s.trim();
        let invalid = || CatalogError::InvalidFlareClass(text.to_string());

        let captures = CLASS_PATTERN.captures(text).ok_or_else(invalid)?;
        let letter = captures
            .get(1)
            .and_then(|m| m.as_str().chars().next())
            .and_then(SeverityLetter::from_char)
            .ok_or_else(invalid)?;
        let number: f64 = captures
            .get(2)
            .and_then(|m| m.as_str().parse().ok())
            .ok_or_else(invalid)?;

        if !number.is_finite() || number <= 0.0 {
            return Err(invalid());
        }
        Ok(FlareClass { letter, number })
    }
}

impl fmt::Display for FlareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.number)
    }
}

/// Inclusive severity window; both ends are compared by magnitude
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityRange {
    pub min: FlareClass,
    pub max: FlareClass,
}

impl SeverityRange {
    pub fn new(min: FlareClass, max: FlareClass) -> Self {
        Self { min, max }
    }

    pub fn parse(min: &str, max: &str) -> Result<Self> {
        Ok(Self {
            min: min.parse()?,
            max: max.parse()?,
        })
    }

    pub fn low_bound(&self) -> f64 {
        self.min.magnitude()
    }

    pub fn high_bound(&self) -> f64 {
        self.max.magnitude()
    }

    pub fn contains(&self, class: &FlareClass) -> bool {
        let m = class.magnitude();
        self.low_bound() <= m && m <= self.high_bound()
    }

    pub fn is_inverted(&self) -> bool {
        self.low_bound() > self.high_bound()
    }
}
