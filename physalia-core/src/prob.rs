//! Negated-log-space probability scores for numerically stable computation.
//!
//! [`Prob`] represents a probability as `-ln(p)`, so chains of small
//! probabilities compose by addition instead of multiplication and never
//! underflow. The ordering is inverted relative to raw probabilities: a
//! *smaller* stored value means a *more probable* event, and the sentinel
//! [`Prob::MIN`] (the largest finite `f64`) stands for probability zero.
//!
//! The textual form is the one used by profile-model file formats: `"*"`
//! for the sentinel, otherwise a plain floating-point literal.

use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use crate::{PhysaliaError, Result};

/// A transition or emission probability stored as `-ln(p)`.
///
/// Smaller values are more probable; `0.0` is certainty and [`Prob::MIN`]
/// is probability zero (an unreachable state). Scores compose by addition,
/// which is the log-space equivalent of multiplying raw probabilities.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Prob(pub f64);

impl Prob {
    /// The minimum representable probability (probability zero).
    ///
    /// Maximum in negated log space is minimum in probability space.
    pub const MIN: Prob = Prob(f64::MAX);

    /// Create a probability score from a raw negated-log value.
    pub const fn new(score: f64) -> Self {
        Self(score)
    }

    /// True iff `self` represents a *smaller* probability than `other`.
    ///
    /// Note the inversion: in negated log space the numerically greater
    /// value is the less probable one.
    pub fn less(self, other: Prob) -> bool {
        self.0 > other.0
    }

    /// True iff the probability is minimal (the `"*"` sentinel).
    pub fn is_min(self) -> bool {
        self.0 == f64::MAX
    }

    /// The raw probability in `[0, 1]`: `exp(-score)`, with the sentinel
    /// mapping to exactly `0.0`.
    pub fn ratio(self) -> f64 {
        if self.is_min() {
            return 0.0;
        }
        (-self.0).exp()
    }

    /// Absolute distance between two scores.
    pub fn distance(self, other: Prob) -> f64 {
        (self.0 - other.0).abs()
    }
}

impl Add for Prob {
    type Output = Prob;

    fn add(self, rhs: Prob) -> Prob {
        Prob(self.0 + rhs.0)
    }
}

impl AddAssign for Prob {
    fn add_assign(&mut self, rhs: Prob) {
        self.0 += rhs.0;
    }
}

impl FromStr for Prob {
    type Err = PhysaliaError;

    /// Parse a probability from its text form (usually read from an hmm or
    /// hhm file). `"*"` is the minimal-probability sentinel; anything else
    /// must be a floating-point literal.
    ///
    /// # Errors
    ///
    /// Returns [`PhysaliaError::Parse`] naming the offending text when the
    /// input is neither `"*"` nor a parsable float.
    fn from_str(s: &str) -> Result<Self> {
        if s == "*" {
            return Ok(Prob::MIN);
        }
        match s.parse::<f64>() {
            Ok(f) => Ok(Prob(f)),
            Err(err) => Err(PhysaliaError::Parse(format!(
                "could not convert '{s}' to a log probability: {err}"
            ))),
        }
    }
}

impl fmt::Display for Prob {
    /// The exact inverse of parsing: the sentinel prints as `"*"`,
    /// everything else as the floating-point literal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_min() {
            write!(f, "*")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Prob {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Prob {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::Deserialize;

        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
