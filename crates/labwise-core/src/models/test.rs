use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::range::ReferenceRange;
use crate::classify::{self, ClassifyOptions};

/// The fixed value vocabulary accepted alongside free text and numbers.
pub const VALUE_VOCABULARY: &[&str] =
    &["Positive", "Negative", "Trace", "Low", "Moderate", "High"];

/// An entered test value: a number or one of the fixed strings
/// (Positive, Negative, Trace, Low, Moderate, High) or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum TestValue {
    Numeric(f64),
    Text(String),
}

impl TestValue {
    /// Numeric reading of the value, parsing text if it holds a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Numeric(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Canonical form for vocabulary comparison: trimmed, and folded onto
    /// the fixed vocabulary spelling when it matches case-insensitively.
    pub fn normalized(&self) -> String {
        match self {
            Self::Numeric(n) => n.to_string(),
            Self::Text(s) => {
                let trimmed = s.trim();
                VALUE_VOCABULARY
                    .iter()
                    .find(|word| word.eq_ignore_ascii_case(trimmed))
                    .map(|word| word.to_string())
                    .unwrap_or_else(|| trimmed.to_string())
            }
        }
    }
}

impl fmt::Display for TestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for TestValue {
    fn from(n: f64) -> Self {
        Self::Numeric(n)
    }
}

impl From<&str> for TestValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Derived classification of a result against its reference range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TestStatus {
    Normal,
    Abnormal,
    Pending,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Abnormal => write!(f, "abnormal"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TestResultKind {
    Numerical,
    Binary,
    Categorical,
    Quantitative,
    Custom,
}

/// One test entry on an in-progress or assembled report.
///
/// `value` is `None` until the user enters something; numeric zero is a
/// real value, distinct from "not entered".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TestResult {
    pub id: Uuid,
    pub test_name: String,
    pub value: Option<TestValue>,
    pub unit: String,
    pub kind: TestResultKind,
    pub reference_range: ReferenceRange,
    pub status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TestResult {
    /// A blank numerical row, as created when the user adds a test.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            test_name: String::new(),
            value: None,
            unit: String::new(),
            kind: TestResultKind::Numerical,
            reference_range: ReferenceRange::Numeric {
                min: None,
                max: None,
            },
            status: TestStatus::Pending,
            category: None,
        }
    }

    /// Grouping bucket for display; uncategorized rows fall under "Other".
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("Other")
    }

    /// Recompute `status` from the current value and range.
    ///
    /// Called after every edit that touches value or range, and again by
    /// the assembler at submission time, with the same evaluator both times.
    pub fn reclassify(&mut self, opts: &ClassifyOptions) {
        self.status = classify::classify_with(
            self.value.as_ref(),
            &self.reference_range,
            self.kind,
            opts,
        );
    }
}

impl Default for TestResult {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_folds_onto_vocabulary() {
        assert_eq!(TestValue::from("  positive ").normalized(), "Positive");
        assert_eq!(TestValue::from("TRACE").normalized(), "Trace");
        assert_eq!(TestValue::from("clear yellow").normalized(), "clear yellow");
    }

    #[test]
    fn zero_is_a_value_not_an_absence() {
        let mut test = TestResult::new();
        test.reference_range = ReferenceRange::numeric(Some(0.0), Some(5.0)).unwrap();
        test.value = Some(TestValue::Numeric(0.0));
        test.reclassify(&ClassifyOptions::default());
        assert_eq!(test.status, TestStatus::Normal);
    }

    #[test]
    fn new_row_is_pending() {
        let test = TestResult::new();
        assert_eq!(test.status, TestStatus::Pending);
        assert!(test.value.is_none());
    }
}
