pub mod coordinates;
pub mod driver;
pub mod filter;
pub mod normalize;
pub mod region;
pub mod severity;

use serde::Serialize;
use std::fmt;

/// Why an event produced no catalog line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum SkipReason {
    /// Event catalog reported no active region
    NoRegion,
    /// Region is not listed in the patch catalog
    UnresolvedRegion,
    /// Coordinate service has no record at that time
    NoObservation,
    MissingKeyword,
    /// Fitted coordinates above the sentinel threshold
    SentinelValue,
    MalformedRecord,
    /// HTTP or decoding failure talking to the coordinate service
    Transport,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoRegion => "no_region",
            SkipReason::UnresolvedRegion => "unresolved_region",
            SkipReason::NoObservation => "no_observation",
            SkipReason::MissingKeyword => "missing_keyword",
            SkipReason::SentinelValue => "sentinel_value",
            SkipReason::MalformedRecord => "malformed_record",
            SkipReason::Transport => "transport",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
