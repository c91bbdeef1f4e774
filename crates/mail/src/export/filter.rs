//! Minimum-date filtering
//!
//! The threshold is applied twice: once as a store-native restriction on each
//! folder's item collection, and again per message. The restriction syntax is
//! best-effort (minute precision, provider quirks), so the per-message check
//! is the one that decides.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::ReceivedTime;
use crate::provider::Restriction;

/// Inclusive minimum received-date predicate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
    threshold: Option<DateTime<Utc>>,
}

impl DateFilter {
    pub fn new(threshold: Option<DateTime<Utc>>) -> Self {
        Self { threshold }
    }

    /// Filter admitting every message
    pub fn none() -> Self {
        Self::default()
    }

    /// Filter admitting messages received at or after `threshold`
    pub fn since(threshold: DateTime<Utc>) -> Self {
        Self::new(Some(threshold))
    }

    pub fn threshold(&self) -> Option<DateTime<Utc>> {
        self.threshold
    }

    /// Store-native restriction to apply to a folder's items, if any
    pub fn restriction(&self) -> Option<Restriction> {
        self.threshold.map(Restriction::received_since)
    }

    /// Authoritative per-message check
    ///
    /// With a threshold set, timestamps that cannot be converted to an
    /// instant are excluded.
    pub fn admits(&self, received: &ReceivedTime) -> bool {
        match self.threshold {
            None => true,
            Some(threshold) => received.to_instant().is_some_and(|at| at >= threshold),
        }
    }
}

/// Parse a `YYYY-MM-DD` minimum date as midnight UTC
pub fn parse_min_date(value: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid minimum date '{}', expected YYYY-MM-DD", value))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}
