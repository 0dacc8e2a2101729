use crate::indicators::Indicator;
use crate::ratios::{RatioKind, RatioResult};
use crate::stability::StabilityScore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSeverity {
    Critical,
    Important,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceStepType {
    MatchIndicator,
    ParseValue,
    ApplyUnit,
    AssumeBillions,
    SumAccounts,
    RatioCompare,
    StabilityScore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    pub step_type: TraceStepType,
    pub message: String,
}

impl TraceStep {
    pub fn new(step_type: TraceStepType, message: impl Into<String>) -> Self {
        TraceStep {
            step_type,
            message: message.into(),
        }
    }
}

/// Where an extracted value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceLocation {
    Cell {
        table_index: usize,
        row_index: usize,
        column: usize,
    },
    Section {
        section: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEntry {
    pub entry_id: String,
    pub indicator: Indicator,
    pub location: TraceLocation,
    pub raw_label: String,
    pub raw_value: String,
    pub value: f64,
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceDecisionTarget {
    Ratio,
    Stability,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceDecision {
    pub decision_id: String,
    pub target: TraceDecisionTarget,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<RatioKind>,
    pub reason: String,
    pub severity: TraceSeverity,
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceWarning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<TraceLocation>,
    pub message: String,
    pub severity: TraceSeverity,
}

impl TraceWarning {
    pub fn info(location: Option<TraceLocation>, message: impl Into<String>) -> Self {
        TraceWarning {
            location,
            message: message.into(),
            severity: TraceSeverity::Info,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceBundle {
    pub trace_schema_version: String,
    pub entries: Vec<TraceEntry>,
    pub decisions: Vec<TraceDecision>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TraceWarning>,
}

impl Default for TraceBundle {
    fn default() -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            entries: Vec::new(),
            decisions: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

pub fn build_ratio_decisions(ratios: &BTreeMap<RatioKind, RatioResult>) -> Vec<TraceDecision> {
    ratios
        .iter()
        .map(|(kind, result)| TraceDecision {
            decision_id: format!("dec_ratio_{}", kind.key()),
            target: TraceDecisionTarget::Ratio,
            ratio: Some(*kind),
            reason: result.interpretation.to_string(),
            severity: if result.interpretation.is_calculable() {
                TraceSeverity::Info
            } else {
                TraceSeverity::Important
            },
            steps: vec![TraceStep::new(
                TraceStepType::RatioCompare,
                format!("{} = {}", kind.key(), result.value),
            )],
        })
        .collect()
}

pub fn build_stability_decision(score: &StabilityScore) -> TraceDecision {
    TraceDecision {
        decision_id: "dec_stability".to_string(),
        target: TraceDecisionTarget::Stability,
        ratio: None,
        reason: score.interpretation.clone(),
        severity: if score.band.is_at_risk() {
            TraceSeverity::Critical
        } else {
            TraceSeverity::Info
        },
        steps: vec![TraceStep::new(
            TraceStepType::StabilityScore,
            format!("Weighted stability score {:.4}", score.score),
        )],
    }
}
