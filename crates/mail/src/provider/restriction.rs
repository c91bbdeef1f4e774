//! Store-native restriction expressions
//!
//! Stores accept a small date predicate of the form
//! `[ReceivedTime] >= 'MM/DD/YYYY HH:MM'`. The expression only has minute
//! precision, so it is a coarse pre-filter and not the final word on
//! inclusion.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};

use crate::models::ReceivedTime;

const FIELD: &str = "[ReceivedTime]";
const DATE_FORMAT: &str = "%m/%d/%Y %H:%M";

/// Errors raised when a provider cannot understand a restriction
#[derive(Debug, thiserror::Error)]
pub enum RestrictionError {
    #[error("Unsupported restriction expression: {0}")]
    Unsupported(String),
    #[error("Invalid date in restriction '{expression}': {source}")]
    InvalidDate {
        expression: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Inclusive lower bound on received time, at minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Restriction {
    since: NaiveDateTime,
}

impl Restriction {
    /// Build a restriction admitting messages received at or after `threshold`
    pub fn received_since(threshold: DateTime<Utc>) -> Self {
        let naive = threshold.naive_utc();
        let since = naive
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(naive);
        Self { since }
    }

    /// Parse a store-native expression
    pub fn parse(expression: &str) -> Result<Self, RestrictionError> {
        let unsupported = || RestrictionError::Unsupported(expression.to_string());

        let value = expression
            .trim()
            .strip_prefix(FIELD)
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix(">="))
            .map(str::trim)
            .and_then(|rest| rest.strip_prefix('\''))
            .and_then(|rest| rest.strip_suffix('\''))
            .ok_or_else(unsupported)?;

        let since = NaiveDateTime::parse_from_str(value, DATE_FORMAT).map_err(|source| {
            RestrictionError::InvalidDate {
                expression: expression.to_string(),
                source,
            }
        })?;
        Ok(Self { since })
    }

    /// Render the store-native expression
    pub fn expression(&self) -> String {
        format!("{} >= '{}'", FIELD, self.since.format(DATE_FORMAT))
    }

    /// Lower bound as an instant
    pub fn since(&self) -> DateTime<Utc> {
        self.since.and_utc()
    }

    /// Whether a store would keep an item with this timestamp
    ///
    /// Timestamps without instant semantics are kept.
    pub fn admits(&self, received: &ReceivedTime) -> bool {
        received.to_instant().is_none_or(|at| at >= self.since())
    }
}
