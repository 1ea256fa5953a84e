//! Data types used throughout the HCA library.
//!
//! This module is organized by pipeline stage:
//! - [`metric_results`] - Heuristic metric results (one per dimension)
//! - [`visual`] - Visual analysis signals from the multimodal service
//! - [`recommendation`] - Synthesized recommendation output

pub mod metric_results;
pub mod recommendation;
pub mod visual;

pub use metric_results::{Evidence, MetricId, MetricResult};

pub use recommendation::{
    Level, Recommendation, RecommendationAnalysis, Severity, TopIssue, MAX_TOP_ISSUES,
};

pub use visual::{ContrastAnalysis, LayoutAnalysis, TextExtraction, VisualAnalysisResult};
