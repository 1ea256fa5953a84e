//! Heuristic metric result types.
//!
//! One [`MetricResult`] is produced per dimension for every evaluation:
//! - Readability
//! - Cognitive load
//! - User stress
//! - Memory load
//! - Empathy alignment

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable key of a heuristic dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricId {
    Readability,
    CognitiveLoad,
    Stress,
    Memory,
    Empathy,
}

impl MetricId {
    pub const ALL: [MetricId; 5] = [
        MetricId::Readability,
        MetricId::CognitiveLoad,
        MetricId::Stress,
        MetricId::Memory,
        MetricId::Empathy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricId::Readability => "readability",
            MetricId::CognitiveLoad => "cognitive-load",
            MetricId::Stress => "stress",
            MetricId::Memory => "memory",
            MetricId::Empathy => "empathy",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricId::Readability => "Readability",
            MetricId::CognitiveLoad => "Cognitive Load",
            MetricId::Stress => "User Stress",
            MetricId::Memory => "Memory Load",
            MetricId::Empathy => "Empathy Alignment",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw signals that produced a score, keyed by signal name.
pub type Evidence = BTreeMap<String, Value>;

/// Score and explanation for one heuristic dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricResult {
    pub id: MetricId,
    pub label: String,
    /// Integer score (0 - 100)
    pub score: u8,
    pub summary: String,
    /// Advisory strings in rule-evaluation order
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub evidence: Evidence,
}

impl MetricResult {
    pub fn new(
        id: MetricId,
        score: u8,
        summary: impl Into<String>,
        recommendations: Vec<String>,
        evidence: Evidence,
    ) -> Self {
        Self {
            id,
            label: id.label().to_string(),
            score,
            summary: summary.into(),
            recommendations,
            evidence,
        }
    }
}
