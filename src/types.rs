use crate::error::EnvfitError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A curve is an ordered sequence of amplitude samples over the normalized
/// time axis [0, 1]. Immutable once generated; candidate curves are transient
/// and recomputed on demand.
pub type Curve = Vec<f64>;

/// A parameter vector for a curve family's generator.
///
/// Length and meaning depend on the family:
/// - ADSR: attack, decay, sustain level, release (4)
/// - Exponential: rate-up, rate-down (2)
/// - Exponential-with-relaxation: rate-up, rate-down, relaxation fraction (3)
pub type ParamVector = Vec<f64>;

/// Which formula the post-relaxation segment of the exponential-with-relaxation
/// family uses. The two are numerically distinct, so the caller must pick one
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelaxationVariant {
    /// Freeze the value at the time value t = c and decay in (t - c).
    TimeValue,
    /// Freeze the value at the integer sample index floor(c * len) and decay
    /// in (t - index). Blows up for large indices; kept for compatibility
    /// with patches produced under this formula.
    SampleIndex,
}

/// Closed set of supported curve families. Each variant determines its
/// generator and parameter arity; dispatch is resolved once at evaluator
/// construction, not per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveFamily {
    Adsr,
    Exponential,
    ExpRelaxation { variant: RelaxationVariant },
}

impl CurveFamily {
    /// Expected parameter vector length for this family.
    pub fn arity(&self) -> usize {
        match self {
            CurveFamily::Adsr => 4,
            CurveFamily::Exponential => 2,
            CurveFamily::ExpRelaxation { .. } => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CurveFamily::Adsr => "ADSR",
            CurveFamily::Exponential => "exp",
            CurveFamily::ExpRelaxation { .. } => "exprel",
        }
    }
}

impl fmt::Display for CurveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveFamily::ExpRelaxation {
                variant: RelaxationVariant::SampleIndex,
            } => write!(f, "exprel-index"),
            other => write!(f, "{}", other.name()),
        }
    }
}

impl FromStr for CurveFamily {
    type Err = EnvfitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADSR" | "adsr" => Ok(CurveFamily::Adsr),
            "exp" => Ok(CurveFamily::Exponential),
            "exprel" => Ok(CurveFamily::ExpRelaxation {
                variant: RelaxationVariant::TimeValue,
            }),
            "exprel-index" => Ok(CurveFamily::ExpRelaxation {
                variant: RelaxationVariant::SampleIndex,
            }),
            other => Err(EnvfitError::UnsupportedFamily(other.to_string())),
        }
    }
}
