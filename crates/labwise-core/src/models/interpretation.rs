use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// AI-generated narrative for one report. At most one exists per report;
/// created lazily on first view and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LabInterpretation {
    pub summary: String,
    pub recommendations: Vec<String>,
    pub interpretation: InterpretationDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InterpretationDetail {
    pub concerning_values: Vec<ConcerningValue>,
    pub normal_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConcerningValue {
    pub test_name: String,
    pub value: String,
    pub implication: String,
}
