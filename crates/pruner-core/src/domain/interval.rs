//! Pruning interval.
//!
//! Wire form is either an integer number of milliseconds or the keyword
//! `"never"`, which disables automatic ticking for the lifetime of a pruner.

use std::fmt;
use std::num::NonZeroU64;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// How often a pruner's schedule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr", into = "IntervalRepr")]
pub enum PruneInterval {
    /// Fire after the period, then again one period after each tick returns.
    Every(Period),
    /// Never fire on its own.
    Never,
}

/// A validated tick period: at least 1ms, millisecond precision.
///
/// The only constructor is [`Period::new`], so an `Every` interval can never
/// carry a period the wire form could not express.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    millis: NonZeroU64,
}

impl Period {
    const DEFAULT: Self = match NonZeroU64::new(PruneInterval::DEFAULT_PERIOD.as_millis() as u64) {
        Some(millis) => Self { millis },
        None => panic!("default period must be non-zero"),
    };

    /// Sub-millisecond remainders are truncated.
    pub fn new(period: Duration) -> Result<Self, SettingsError> {
        let millis = u64::try_from(period.as_millis()).unwrap_or(u64::MAX);
        NonZeroU64::new(millis)
            .map(|millis| Self { millis })
            .ok_or(SettingsError::IntervalTooShort(period))
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.millis.get())
    }

    pub fn as_millis(self) -> u64 {
        self.millis.get()
    }
}

impl PruneInterval {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(30);

    /// Rejects periods under 1ms, which would turn the schedule into a busy loop.
    pub fn every(period: Duration) -> Result<Self, SettingsError> {
        Period::new(period).map(Self::Every)
    }

    pub fn from_millis(millis: u64) -> Result<Self, SettingsError> {
        Self::every(Duration::from_millis(millis))
    }

    /// `None` for [`PruneInterval::Never`].
    pub fn period(&self) -> Option<Duration> {
        match self {
            Self::Every(period) => Some(period.as_duration()),
            Self::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Self::Never)
    }
}

impl Default for PruneInterval {
    fn default() -> Self {
        Self::Every(Period::DEFAULT)
    }
}

impl fmt::Display for PruneInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Every(period) => write!(f, "every {}ms", period.as_millis()),
            Self::Never => f.write_str("never"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum IntervalRepr {
    Millis(u64),
    Keyword(String),
}

impl TryFrom<IntervalRepr> for PruneInterval {
    type Error = SettingsError;

    fn try_from(repr: IntervalRepr) -> Result<Self, Self::Error> {
        match repr {
            IntervalRepr::Millis(millis) => Self::from_millis(millis),
            IntervalRepr::Keyword(word) if word.eq_ignore_ascii_case("never") => Ok(Self::Never),
            IntervalRepr::Keyword(word) => Err(SettingsError::UnknownKeyword(word)),
        }
    }
}

impl From<PruneInterval> for IntervalRepr {
    fn from(interval: PruneInterval) -> Self {
        match interval {
            PruneInterval::Every(period) => IntervalRepr::Millis(period.as_millis()),
            PruneInterval::Never => IntervalRepr::Keyword("never".to_string()),
        }
    }
}
