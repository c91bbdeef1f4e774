//! Received timestamps as reported by a folder-tree provider

use chrono::{DateTime, NaiveDateTime, Utc};
use std::fmt;

/// Received time of a message as the store reports it
///
/// Stores are not consistent about time zones, and some items carry no usable
/// timestamp at all. Only the first two variants can be placed on the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceivedTime {
    /// A timezone-aware instant
    Instant(DateTime<Utc>),
    /// A wall-clock time without zone information, read as UTC
    Naive(NaiveDateTime),
    /// A value the store produced that cannot be converted to an instant
    Unknown(String),
    /// The store reported nothing
    Missing,
}

impl ReceivedTime {
    /// Normalize to a common instant representation
    ///
    /// Returns `None` when the timestamp lacks instant semantics.
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            ReceivedTime::Instant(at) => Some(*at),
            ReceivedTime::Naive(naive) => Some(naive.and_utc()),
            ReceivedTime::Unknown(_) | ReceivedTime::Missing => None,
        }
    }
}

impl From<DateTime<Utc>> for ReceivedTime {
    fn from(at: DateTime<Utc>) -> Self {
        ReceivedTime::Instant(at)
    }
}

impl From<NaiveDateTime> for ReceivedTime {
    fn from(naive: NaiveDateTime) -> Self {
        ReceivedTime::Naive(naive)
    }
}

impl fmt::Display for ReceivedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReceivedTime::Instant(at) => write!(f, "{}", at.to_rfc3339()),
            ReceivedTime::Naive(naive) => write!(f, "{}", naive.format("%Y-%m-%d %H:%M:%S")),
            ReceivedTime::Unknown(raw) => write!(f, "unknown ({})", raw),
            ReceivedTime::Missing => f.write_str("missing"),
        }
    }
}
