//! Reference-range evaluator.
//!
//! The single source of truth for status derivation: live-edit
//! reclassification and submission-time classification both call into
//! here, so the two can never diverge.

use crate::models::range::ReferenceRange;
use crate::models::test::{TestResultKind, TestStatus, TestValue};

/// Classification knobs.
///
/// `flag_vocabulary` reproduces a legacy presentation behavior where
/// "Positive" (binary kinds) and "High"/"Moderate" (categorical kinds)
/// always classify abnormal, regardless of the declared range. It
/// disagrees with range-driven classification for tests where those
/// values are the expected result, so it stays off unless a deployment
/// explicitly opts in.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassifyOptions {
    pub flag_vocabulary: bool,
}

/// Classify a value against its reference range with default options.
pub fn classify(
    value: Option<&TestValue>,
    range: &ReferenceRange,
    kind: TestResultKind,
) -> TestStatus {
    classify_with(value, range, kind, &ClassifyOptions::default())
}

/// Classify a value against its reference range.
///
/// Pending means "cannot classify": no value entered yet, a numeric shape
/// with no defined bounds, or a non-numeric value against a numeric shape.
pub fn classify_with(
    value: Option<&TestValue>,
    range: &ReferenceRange,
    kind: TestResultKind,
    opts: &ClassifyOptions,
) -> TestStatus {
    let Some(value) = value else {
        return TestStatus::Pending;
    };

    if opts.flag_vocabulary && vocabulary_flags_abnormal(value, kind) {
        return TestStatus::Abnormal;
    }

    match range {
        ReferenceRange::Numeric { min, max } => {
            if min.is_none() && max.is_none() {
                return TestStatus::Pending;
            }
            let Some(v) = value.as_number() else {
                return TestStatus::Pending;
            };
            let above_min = min.is_none_or(|lo| v >= lo);
            let below_max = max.is_none_or(|hi| v <= hi);
            if above_min && below_max {
                TestStatus::Normal
            } else {
                TestStatus::Abnormal
            }
        }
        ReferenceRange::Options { options } => {
            let needle = value.normalized();
            let member = options
                .iter()
                .any(|opt| opt.trim().eq_ignore_ascii_case(&needle));
            if member {
                TestStatus::Normal
            } else {
                TestStatus::Abnormal
            }
        }
        ReferenceRange::Threshold { threshold } => {
            let Some(v) = value.as_number() else {
                return TestStatus::Pending;
            };
            if v <= *threshold {
                TestStatus::Normal
            } else {
                TestStatus::Abnormal
            }
        }
    }
}

fn vocabulary_flags_abnormal(value: &TestValue, kind: TestResultKind) -> bool {
    let word = value.normalized();
    match kind {
        TestResultKind::Binary => word == "Positive",
        TestResultKind::Categorical => word == "High" || word == "Moderate",
        _ => false,
    }
}
