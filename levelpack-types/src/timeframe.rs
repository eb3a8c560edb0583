//! Dwell-time sampling for content states.

use std::fmt;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::SchemaError;

/// Random distribution a [`TimeFrame`] draws from.
///
/// Serialized as its integer discriminant; decoding also accepts the
/// variant name in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "DistributionRepr", into = "u8")]
pub enum Distribution {
    /// Always exactly the average.
    #[default]
    Constant,
    /// Exponentially distributed with the average as its mean.
    Exponential,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DistributionRepr {
    Index(u8),
    Name(String),
}

impl TryFrom<DistributionRepr> for Distribution {
    type Error = SchemaError;

    fn try_from(repr: DistributionRepr) -> Result<Self, Self::Error> {
        match repr {
            DistributionRepr::Index(0) => Ok(Self::Constant),
            DistributionRepr::Index(1) => Ok(Self::Exponential),
            DistributionRepr::Index(n) => Err(SchemaError::UnknownDistribution(n.to_string())),
            DistributionRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Distribution> for u8 {
    fn from(d: Distribution) -> u8 {
        match d {
            Distribution::Constant => 0,
            Distribution::Exponential => 1,
        }
    }
}

impl std::str::FromStr for Distribution {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "constant" => Ok(Self::Constant),
            "exponential" => Ok(Self::Exponential),
            _ => Err(SchemaError::UnknownDistribution(s.to_string())),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant => f.write_str("constant"),
            Self::Exponential => f.write_str("exponential"),
        }
    }
}

/// How long a state remains displayed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeFrame {
    /// Mean dwell time in seconds. Never negative in a valid level.
    #[serde(rename = "AverageSeconds", alias = "averageSeconds")]
    pub average_seconds: f64,
    #[serde(rename = "Distribution", alias = "distribution", default)]
    pub distribution: Distribution,
}

impl TimeFrame {
    /// A fixed dwell time of `seconds`.
    pub fn constant(seconds: f64) -> Self {
        Self {
            average_seconds: seconds,
            distribution: Distribution::Constant,
        }
    }

    /// An exponentially distributed dwell time with mean `seconds`.
    pub fn exponential(seconds: f64) -> Self {
        Self {
            average_seconds: seconds,
            distribution: Distribution::Exponential,
        }
    }

    /// Draws one dwell time using `rng` as the uniform source.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        match self.distribution {
            Distribution::Constant => seconds_to_duration(self.average_seconds),
            Distribution::Exponential => self.sample_with(rng.gen_range(0.0..1.0)),
        }
    }

    /// Maps a uniform draw `u` in `[0, 1)` to a dwell time.
    ///
    /// Exponential sampling uses the inverse CDF `-mean * ln(1 - u)`.
    /// `u = 0` yields zero, as does a non-positive mean for any draw.
    /// Otherwise draws at or above 1 saturate to [`Duration::MAX`] instead
    /// of taking the log of a non-positive number.
    pub fn sample_with(&self, u: f64) -> Duration {
        match self.distribution {
            Distribution::Constant => seconds_to_duration(self.average_seconds),
            Distribution::Exponential => {
                if !(self.average_seconds > 0.0) {
                    return Duration::ZERO;
                }
                let u = if u.is_nan() { 0.0 } else { u.max(0.0) };
                let tail = 1.0 - u;
                if tail <= 0.0 {
                    return Duration::MAX;
                }
                seconds_to_duration(-self.average_seconds * tail.ln())
            }
        }
    }
}

// Negative, zero and NaN collapse to zero; overflow saturates.
fn seconds_to_duration(secs: f64) -> Duration {
    if !(secs > 0.0) {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
