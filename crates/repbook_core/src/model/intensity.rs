//! Perceived set intensity.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// How hard a set felt, on a five-level ordered scale.
///
/// The numeric codes are persisted in the `workout_set.intensity` column and
/// exported verbatim in backup documents, so they must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Intensity {
    /// The target muscle did not activate at all.
    NoActivation,
    Easy,
    Normal,
    /// Failed within the last planned reps.
    EarlyFailure,
    /// Stopped because something hurt.
    Pain,
}

impl Intensity {
    /// Stable numeric code used by storage and the backup document.
    pub fn code(self) -> i64 {
        match self {
            Self::NoActivation => 1,
            Self::Easy => 2,
            Self::Normal => 3,
            Self::EarlyFailure => 4,
            Self::Pain => 5,
        }
    }

    /// Parses a stored numeric code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::NoActivation),
            2 => Some(Self::Easy),
            3 => Some(Self::Normal),
            4 => Some(Self::EarlyFailure),
            5 => Some(Self::Pain),
            _ => None,
        }
    }

    /// Whether a set at this intensity counts toward weekly training volume.
    ///
    /// Only the interior of the scale counts: no-activation sets trained
    /// nothing, and pain sets are aborted rather than productive.
    pub fn counts_toward_volume(self) -> bool {
        !matches!(self, Self::NoActivation | Self::Pain)
    }
}

impl Display for Intensity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NoActivation => "no activation",
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::EarlyFailure => "early failure",
            Self::Pain => "pain",
        };
        f.write_str(label)
    }
}

impl From<Intensity> for i64 {
    fn from(value: Intensity) -> Self {
        value.code()
    }
}

impl TryFrom<i64> for Intensity {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_code(value).ok_or_else(|| format!("invalid intensity code `{value}`"))
    }
}
