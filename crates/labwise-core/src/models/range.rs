use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The acceptance criterion for a test value.
///
/// Exactly one shape exists per test; the enum makes the invariant
/// unrepresentable to violate. Serialized untagged so the stored JSON
/// shapes stay `{"options": [..]}`, `{"threshold": n}`, and
/// `{"min": n, "max": n}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum ReferenceRange {
    Options { options: Vec<String> },
    Threshold { threshold: f64 },
    Numeric {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
}

impl ReferenceRange {
    /// Numeric bounds, either may be absent. Rejects `min > max`.
    pub fn numeric(min: Option<f64>, max: Option<f64>) -> Result<Self, CoreError> {
        if let (Some(lo), Some(hi)) = (min, max)
            && lo > hi
        {
            return Err(CoreError::InvalidRange { min: lo, max: hi });
        }
        Ok(Self::Numeric { min, max })
    }

    pub fn options<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Options {
            options: options.into_iter().map(Into::into).collect(),
        }
    }

    pub fn threshold(threshold: f64) -> Self {
        Self::Threshold { threshold }
    }
}

impl fmt::Display for ReferenceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Options { options } => write!(f, "{}", options.join(" or ")),
            Self::Threshold { threshold } => write!(f, "<= {threshold}"),
            Self::Numeric { min, max } => {
                let lo = min.map(|v| v.to_string()).unwrap_or_default();
                let hi = max.map(|v| v.to_string()).unwrap_or_default();
                write!(f, "{lo}-{hi}")
            }
        }
    }
}
