//! Synthesized recommendation output.

use serde::{Deserialize, Serialize};

use super::visual::lenient_score;

pub const MAX_TOP_ISSUES: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationAnalysis {
    #[serde(deserialize_with = "required_score")]
    pub overall_score: u8,
    #[serde(default)]
    pub top_issues: Vec<TopIssue>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopIssue {
    pub title: String,
    pub severity: Severity,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub impact: Level,
    pub effort: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// Impact or effort band of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

fn required_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    lenient_score(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("overallScore must be a number"))
}
