use crate::common::constants::{CLI_TIME_FORMATS, DISPLAY_TIME_FORMAT, RECORD_TIME_FORMAT};
use crate::common::error::{CatalogError, Result};
use crate::pipeline::severity::FlareClass;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Spatial patch (HARP) number
pub type PatchId = u32;

/// NOAA active region associated with a flare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionId {
    /// The event catalog reports region 0 (or nothing) when no region was associated
    None,
    Noaa(u32),
}

impl RegionId {
    pub fn from_number(number: u32) -> Self {
        if number == 0 {
            RegionId::None
        } else {
            RegionId::Noaa(number)
        }
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionId::None => write!(f, "0"),
            RegionId::Noaa(n) => write!(f, "{n}"),
        }
    }
}

/// A flare as reported by the event catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlareEvent {
    pub class: FlareClass,
    pub peak_time: DateTime<Utc>,
    pub region: RegionId,
}

impl FlareEvent {
    /// Timestamp used to address the coordinate series
    pub fn record_time(&self) -> String {
        self.peak_time.format(RECORD_TIME_FORMAT).to_string()
    }

    pub fn display_time(&self) -> String {
        self.peak_time.format(DISPLAY_TIME_FORMAT).to_string()
    }
}

/// Half-open search window handed to the event source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        let start = parse_cli_time(start)?;
        let end = parse_cli_time(end)?;
        if end <= start {
            return Err(CatalogError::InvalidTimeRange(format!(
                "end {} is not after start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }
}

fn parse_cli_time(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    CLI_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CatalogError::InvalidTimeRange(format!(
                "could not parse '{}', expected e.g. 2014/10/30 04:25",
                text
            ))
        })
}

/// One keyword series returned by the coordinate service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub name: String,
    #[serde(default, deserialize_with = "scalar_strings")]
    pub values: Vec<String>,
}

/// Coordinate service response, keywords in requested order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawCoordinateRecord {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
}

impl RawCoordinateRecord {
    /// First value of the keyword at `index`
    pub fn value(&self, index: usize) -> Option<&str> {
        self.keywords
            .get(index)
            .and_then(|k| k.values.first())
            .map(|v| v.as_str())
    }
}

// The service sends strings; tolerate bare numbers as well.
fn scalar_strings<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|v| match v {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
        .collect())
}

/// Position in the Carrington frame, rounded for display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A fully resolved catalog line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRow {
    pub class: FlareClass,
    pub display_time: String,
    pub coordinate: NormalizedCoordinate,
}

impl OutputRow {
    /// Longitude precedes latitude in the data lines, whatever the header says.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.class.letter,
            format_decimal(self.class.number),
            self.display_time,
            format_decimal(self.coordinate.longitude),
            format_decimal(self.coordinate.latitude)
        )
    }
}

/// Shortest round-trip decimal that always carries a fractional part (`2.0`, `10.123`).
pub fn format_decimal(value: f64) -> String {
    let text = value.to_string();
    if value.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}
