pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod output;
pub mod service;
pub mod synthesis;
pub mod types;
pub mod visual;

pub use analysis::{analyze, AnalysisPayload, AnalysisRequest, Analyzer};
pub use config::{Config, ServiceConfig};
pub use error::{ErrorCategory, ErrorPayload, HcaError, Result};
pub use ingest::{ingest, load_screenshot, IngestError, IngestionResult};
pub use metrics::{clamp_score, compute_metrics, evaluate_heuristics, TypographySignals};
pub use output::{
    AnalyzeOutput, ErrorOutput, EvaluateOutput, HcaOutput, IngestOutput, HCA_OUTPUT_VERSION,
};
pub use service::{ServiceClient, ServiceError};
pub use synthesis::{
    fallback_analysis, generate_recommendation_analysis, SynthesisInput, Synthesizer,
};
pub use types::{
    Level, MetricId, MetricResult, Recommendation, RecommendationAnalysis, Severity, TopIssue,
    VisualAnalysisResult,
};
pub use visual::{analyze_visual, parse_visual_content, VisualInput};
