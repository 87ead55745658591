//! Time selector period
//!
//! The charts page shows a from/to range that is validated against the
//! allowed period bounds, persisted per user, and resolved to timestamps.

pub mod parser;

pub use parser::{resolve, validate, RangeTimeError};

use crate::profile::UserProfile;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

/// Default range start when nothing is stored
pub const DEFAULT_FROM: &str = "now-1h";
/// Default range end when nothing is stored
pub const DEFAULT_TO: &str = "now";
/// Shortest displayable period, in seconds
pub const MIN_PERIOD_SECS: i64 = 60;

/// Period bounds a requested range must respect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodLimits {
    pub min_secs: i64,
    /// Relative length such as `2y`, resolved against the request time
    pub max_period: String,
}

impl PeriodLimits {
    /// Build limits, checking that `max_period` is a usable relative length
    pub fn new(min_secs: i64, max_period: &str) -> Result<Self> {
        let limits = Self {
            min_secs,
            max_period: max_period.to_string(),
        };
        limits
            .max_secs(Utc::now())
            .with_context(|| format!("Invalid maximum period \"{}\"", max_period))?;
        Ok(limits)
    }

    /// Longest displayable period ending at `now`, in seconds
    pub fn max_secs(&self, now: DateTime<Utc>) -> Result<i64, RangeTimeError> {
        let start = resolve(&format!("now-{}", self.max_period), true, now)?;
        Ok(1 + now.timestamp() - start.timestamp())
    }
}

impl Default for PeriodLimits {
    fn default() -> Self {
        Self {
            min_secs: MIN_PERIOD_SECS,
            max_period: "2y".to_string(),
        }
    }
}

/// Reasons a requested period is rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodError {
    #[error(transparent)]
    Time(#[from] RangeTimeError),
    #[error("Minimum time period to display is {0} minutes.")]
    TooShort(i64),
    #[error("Maximum time period to display is {0} days.")]
    TooLong(i64),
}

/// Validate a from/to pair when both are given; a missing side means the
/// stored period is used, which is valid by construction.
pub fn validate_period(
    from: Option<&str>,
    to: Option<&str>,
    limits: &PeriodLimits,
    now: DateTime<Utc>,
) -> Result<(), PeriodError> {
    let (Some(from), Some(to)) = (from, to) else {
        return Ok(());
    };

    let from_ts = resolve(from, true, now)?.timestamp();
    let to_ts = resolve(to, false, now)?.timestamp();
    let period = to_ts - from_ts + 1;

    if period < limits.min_secs {
        return Err(PeriodError::TooShort(limits.min_secs / 60));
    }

    let max_secs = limits.max_secs(now)?;
    if period > max_secs {
        return Err(PeriodError::TooLong(max_secs / 86_400));
    }

    Ok(())
}

/// Resolved time selector state, echoed to the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub profile_idx: String,
    pub profile_idx2: u64,
    pub from: String,
    pub to: String,
    #[serde(rename = "from_ts")]
    pub from_ts: i64,
    #[serde(rename = "to_ts")]
    pub to_ts: i64,
}

/// Time selector bound to a profile key prefix (e.g. `web.graphs.filter`)
pub struct TimeSelector<'a> {
    profile: &'a UserProfile<'a>,
    profile_idx: &'a str,
    profile_idx2: u64,
}

impl<'a> TimeSelector<'a> {
    pub fn new(profile: &'a UserProfile<'a>, profile_idx: &'a str, profile_idx2: u64) -> Self {
        Self {
            profile,
            profile_idx,
            profile_idx2,
        }
    }

    fn from_key(&self) -> String {
        format!("{}.from", self.profile_idx)
    }

    fn to_key(&self) -> String {
        format!("{}.to", self.profile_idx)
    }

    /// Persist the requested range when both ends are given
    pub async fn update(&self, from: Option<&str>, to: Option<&str>) -> Result<()> {
        if let (Some(from), Some(to)) = (from, to) {
            self.profile
                .update_str(&self.from_key(), from, self.profile_idx2)
                .await?;
            self.profile
                .update_str(&self.to_key(), to, self.profile_idx2)
                .await?;
        }
        Ok(())
    }

    /// Resolve the effective range: the requested one when both ends are
    /// given, otherwise the stored one (or the defaults).
    pub async fn period(
        &self,
        from: Option<&str>,
        to: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Timeline> {
        let (from, to) = match (from, to) {
            (Some(from), Some(to)) => (from.to_string(), to.to_string()),
            _ => (
                self.profile
                    .get_str(&self.from_key(), DEFAULT_FROM, self.profile_idx2)
                    .await?,
                self.profile
                    .get_str(&self.to_key(), DEFAULT_TO, self.profile_idx2)
                    .await?,
            ),
        };

        let (from, to, from_ts, to_ts) =
            match (resolve(&from, true, now), resolve(&to, false, now)) {
                (Ok(f), Ok(t)) => (from, to, f.timestamp(), t.timestamp()),
                _ => {
                    warn!(
                        user_id = self.profile.user_id(),
                        from = %from,
                        to = %to,
                        "Stored time period is unreadable, using defaults"
                    );
                    let f = resolve(DEFAULT_FROM, true, now)?;
                    let t = resolve(DEFAULT_TO, false, now)?;
                    (
                        DEFAULT_FROM.to_string(),
                        DEFAULT_TO.to_string(),
                        f.timestamp(),
                        t.timestamp(),
                    )
                }
            };

        Ok(Timeline {
            profile_idx: self.profile_idx.to_string(),
            profile_idx2: self.profile_idx2,
            from,
            to,
            from_ts,
            to_ts,
        })
    }
}
