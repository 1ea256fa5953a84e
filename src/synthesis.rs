//! Recommendation synthesizer.
//!
//! Two strategies behind one entry point: the remote LLM service when a
//! credential is configured, and a deterministic local aggregation otherwise.
//! The remote strategy absorbs every failure by delegating to the local one,
//! so synthesis always returns a complete [`RecommendationAnalysis`].

use std::fmt::Write as FmtWrite;

use thiserror::Error;

use crate::metrics::clamp_score;
use crate::service::{truncate_chars, ChatMessage, ContentBlock, ServiceClient, ServiceError};
use crate::types::{
    Level, MetricResult, Recommendation, RecommendationAnalysis, Severity, TopIssue,
    VisualAnalysisResult, MAX_TOP_ISSUES,
};
use crate::visual::{extract_json_object, strip_code_fences};

pub const MAX_FALLBACK_RECOMMENDATIONS: usize = 8;
const ISSUE_THRESHOLD: u8 = 70;
const HIGH_SEVERITY_THRESHOLD: u8 = 50;
const SYNTHESIS_HTML_CHARS: usize = 1500;

const SYNTHESIS_PROMPT: &str = r#"You are a UX advisor focused on human-centered accessibility.
Using the signals below, respond with STRICT JSON only, no prose, using exactly this shape:
{
  "overallScore": <0-100>,
  "topIssues": [{"title": <string>, "severity": "high" | "medium" | "low", "description": <string>}],
  "recommendations": [{"title": <string>, "description": <string>, "impact": "high" | "medium" | "low", "effort": "high" | "medium" | "low"}],
  "summary": <two sentences at most>
}
List at most 3 topIssues, most severe first. Rank recommendations by impact relative to effort."#;

/// Everything the synthesizer may draw on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthesisInput<'a> {
    pub metrics: &'a [MetricResult],
    pub visual: Option<&'a VisualAnalysisResult>,
    pub html: Option<&'a str>,
    pub image_data_url: Option<&'a str>,
}

#[derive(Debug, Error)]
enum SynthesisError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("no JSON object in synthesis response")]
    NoJson,
    #[error("malformed synthesis JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy)]
pub enum Synthesizer<'a> {
    Remote(&'a ServiceClient),
    Local,
}

impl<'a> Synthesizer<'a> {
    /// Remote when the client holds a credential, local otherwise.
    pub fn select(client: &'a ServiceClient) -> Self {
        if client.is_configured() {
            Synthesizer::Remote(client)
        } else {
            Synthesizer::Local
        }
    }

    pub async fn synthesize(&self, input: SynthesisInput<'_>) -> RecommendationAnalysis {
        match self {
            Synthesizer::Local => fallback_analysis(input.metrics, input.visual),
            Synthesizer::Remote(client) => match remote_analysis(client, input).await {
                Ok(analysis) => analysis,
                Err(err) => {
                    tracing::warn!(error = %err, "remote synthesis failed; using local fallback");
                    fallback_analysis(input.metrics, input.visual)
                }
            },
        }
    }
}

/// Synthesize recommendations with whichever strategy the client supports.
pub async fn generate_recommendation_analysis(
    client: &ServiceClient,
    input: SynthesisInput<'_>,
) -> RecommendationAnalysis {
    Synthesizer::select(client).synthesize(input).await
}

async fn remote_analysis(
    client: &ServiceClient,
    input: SynthesisInput<'_>,
) -> Result<RecommendationAnalysis, SynthesisError> {
    let messages = [ChatMessage::user(vec![ContentBlock::text(build_prompt(
        &input,
    ))])];
    let model = client.config().synthesis_model.clone();
    let content = client.complete(&model, &messages).await?;
    let json = extract_json_object(strip_code_fences(&content)).ok_or(SynthesisError::NoJson)?;
    let mut analysis: RecommendationAnalysis = serde_json::from_str(json)?;
    analysis.top_issues.truncate(MAX_TOP_ISSUES);
    Ok(analysis)
}

fn build_prompt(input: &SynthesisInput<'_>) -> String {
    let mut prompt = String::from(SYNTHESIS_PROMPT);
    prompt.push_str("\n\nHeuristic metrics:\n");
    if input.metrics.is_empty() {
        prompt.push_str("- none (no markup supplied)\n");
    }
    for metric in input.metrics {
        writeln!(
            prompt,
            "- {}: {}/100. {}",
            metric.label, metric.score, metric.summary
        )
        .ok();
    }

    if let Some(visual) = input.visual {
        prompt.push_str("\nVisual analysis:\n");
        if let Some(score) = visual.overall_score {
            writeln!(prompt, "- Overall: {score}/100").ok();
        }
        if let Some(score) = visual.contrast.as_ref().and_then(|c| c.score) {
            writeln!(prompt, "- Contrast: {score}/100").ok();
        }
        if let Some(layout) = &visual.layout {
            if let Some(complexity) = layout.complexity {
                writeln!(prompt, "- Layout complexity: {complexity}/100").ok();
            }
            if let Some(focusable) = layout.focusable_elements {
                writeln!(prompt, "- Focusable elements: {focusable}").ok();
            }
            if let Some(hierarchy) = &layout.visual_hierarchy {
                writeln!(prompt, "- Visual hierarchy: {hierarchy}").ok();
            }
        }
        for error in &visual.errors {
            writeln!(prompt, "- Unavailable: {error}").ok();
        }
    }

    writeln!(
        prompt,
        "\nScreenshot provided: {}",
        if input.image_data_url.is_some() { "yes" } else { "no" }
    )
    .ok();
    if let Some(html) = input.html {
        prompt.push_str("Markup excerpt:\n");
        prompt.push_str(truncate_chars(html, SYNTHESIS_HTML_CHARS));
        prompt.push('\n');
    }
    prompt
}

fn impact_for(score: u8) -> Level {
    if score < HIGH_SEVERITY_THRESHOLD {
        Level::High
    } else if score < ISSUE_THRESHOLD {
        Level::Medium
    } else {
        Level::Low
    }
}

/// Deterministic local synthesis from the heuristic metrics.
///
/// With no metrics at all, the overall score comes from the visual analysis
/// when it has one, else 0.
pub fn fallback_analysis(
    metrics: &[MetricResult],
    visual: Option<&VisualAnalysisResult>,
) -> RecommendationAnalysis {
    let overall_score = if metrics.is_empty() {
        visual.and_then(|v| v.overall_score).unwrap_or(0)
    } else {
        let total: f64 = metrics.iter().map(|m| f64::from(m.score)).sum();
        clamp_score(total / metrics.len() as f64)
    };

    let recommendations = metrics
        .iter()
        .flat_map(|metric| {
            metric.recommendations.iter().map(move |text| Recommendation {
                title: format!("{} Improvement", metric.label),
                description: text.clone(),
                impact: impact_for(metric.score),
                effort: Level::Medium,
            })
        })
        .take(MAX_FALLBACK_RECOMMENDATIONS)
        .collect();

    let mut weak: Vec<&MetricResult> = metrics
        .iter()
        .filter(|m| m.score < ISSUE_THRESHOLD)
        .collect();
    weak.sort_by_key(|m| m.score);
    let weak_count = weak.len();
    let top_issues = weak
        .into_iter()
        .take(MAX_TOP_ISSUES)
        .map(|metric| TopIssue {
            title: metric.label.clone(),
            severity: if metric.score < HIGH_SEVERITY_THRESHOLD {
                Severity::High
            } else {
                Severity::Medium
            },
            description: metric.summary.clone(),
        })
        .collect();

    RecommendationAnalysis {
        overall_score,
        top_issues,
        recommendations,
        summary: format!(
            "Overall human-centered score is {overall_score}/100 with {weak_count} metric(s) below {ISSUE_THRESHOLD}."
        ),
    }
}
