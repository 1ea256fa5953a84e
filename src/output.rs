use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisPayload;
use crate::error::ErrorPayload;
use crate::ingest::IngestionResult;
use crate::types::MetricResult;

pub const HCA_OUTPUT_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HcaOutput {
    Evaluate(EvaluateOutput),
    Analyze(AnalyzeOutput),
    Ingest(IngestOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateOutput {
    pub version: String,
    pub metrics: Vec<MetricResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeOutput {
    pub version: String,
    #[serde(flatten)]
    pub payload: AnalysisPayload,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestOutput {
    pub version: String,
    #[serde(flatten)]
    pub result: IngestionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    pub error: ErrorPayload,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
