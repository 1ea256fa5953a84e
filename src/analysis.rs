//! Full analysis entry point: heuristics, then visual analysis, then
//! synthesis, strictly in that order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::{HcaError, Result};
use crate::metrics::evaluate_heuristics;
use crate::service::ServiceClient;
use crate::synthesis::{generate_recommendation_analysis, SynthesisInput};
use crate::types::{MetricResult, RecommendationAnalysis, VisualAnalysisResult};
use crate::visual::{analyze_visual, VisualInput};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub html: Option<String>,
    pub screenshot_data_url: Option<String>,
    pub source_url: Option<String>,
}

impl AnalysisRequest {
    fn html(&self) -> Option<&str> {
        non_blank(&self.html)
    }

    fn screenshot(&self) -> Option<&str> {
        non_blank(&self.screenshot_data_url)
    }

    fn url(&self) -> Option<&str> {
        non_blank(&self.source_url)
    }

    pub fn is_empty(&self) -> bool {
        self.html().is_none() && self.screenshot().is_none() && self.url().is_none()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub metrics: Vec<MetricResult>,
    #[serde(rename = "greenpt")]
    pub visual: VisualAnalysisResult,
    pub analysis: RecommendationAnalysis,
    pub generated_at: DateTime<Utc>,
}

/// Stateless per request; holds only the configured service client.
#[derive(Debug, Clone)]
pub struct Analyzer {
    client: ServiceClient,
    min_html_length: usize,
    html_prompt_chars: usize,
}

impl Analyzer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            client: ServiceClient::new(config.service.clone())?,
            min_html_length: config.min_html_length,
            html_prompt_chars: config.html_prompt_chars,
        })
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisPayload> {
        if request.is_empty() {
            return Err(HcaError::MissingInput);
        }
        let html = request.html();
        let screenshot = request.screenshot();
        let url = request.url();

        // Present HTML is always length-checked, even when blank.
        let metrics = match request.html.as_deref() {
            Some(markup) => evaluate_heuristics(Some(markup), self.min_html_length)?,
            None => Vec::new(),
        };
        tracing::debug!(metrics = metrics.len(), "heuristic stage finished");

        let visual = analyze_visual(
            &self.client,
            VisualInput {
                image_data_url: screenshot,
                html,
                url,
            },
            self.html_prompt_chars,
        )
        .await;
        if visual.has_errors() {
            tracing::warn!(errors = ?visual.errors, "visual analysis degraded");
        }

        let analysis = generate_recommendation_analysis(
            &self.client,
            SynthesisInput {
                metrics: &metrics,
                visual: Some(&visual),
                html,
                image_data_url: screenshot,
            },
        )
        .await;

        Ok(AnalysisPayload {
            metrics,
            visual,
            analysis,
            generated_at: Utc::now(),
        })
    }
}

/// One-shot full analysis with the given configuration.
pub async fn analyze(config: &Config, request: &AnalysisRequest) -> Result<AnalysisPayload> {
    Analyzer::new(config)?.analyze(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> String {
        let copy = "Thanks for joining. Please choose a plan that suits you. ".repeat(6);
        format!("<main><h1>Plans</h1><h2>Monthly</h2><div>{copy}</div></main>")
    }

    #[tokio::test]
    async fn rejects_request_without_inputs() {
        let request = AnalysisRequest {
            html: Some("   ".to_string()),
            ..Default::default()
        };
        let err = analyze(&Config::default(), &request).await.unwrap_err();
        assert!(matches!(err, HcaError::MissingInput));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn blank_html_beside_a_screenshot_is_still_rejected() {
        let request = AnalysisRequest {
            html: Some("  \n\t ".to_string()),
            screenshot_data_url: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        };
        let err = analyze(&Config::default(), &request).await.unwrap_err();
        assert!(matches!(
            err,
            HcaError::InsufficientContent { length: 0, .. }
        ));
    }

    #[tokio::test]
    async fn short_html_is_a_client_error() {
        let request = AnalysisRequest {
            html: Some("<p>tiny</p>".to_string()),
            ..Default::default()
        };
        let err = analyze(&Config::default(), &request).await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn unconfigured_service_degrades_to_heuristics_only() {
        let request = AnalysisRequest {
            html: Some(page()),
            ..Default::default()
        };
        let payload = analyze(&Config::default(), &request).await.unwrap();
        assert_eq!(payload.metrics.len(), 5);
        assert_eq!(payload.visual, VisualAnalysisResult::default());
        let mean = payload.metrics.iter().map(|m| f64::from(m.score)).sum::<f64>() / 5.0;
        assert_eq!(payload.analysis.overall_score, mean.round() as u8);

        let wire = serde_json::to_value(&payload).unwrap();
        for key in ["metrics", "greenpt", "analysis", "generatedAt"] {
            assert!(wire.get(key).is_some(), "payload missing {key}");
        }
    }

    #[tokio::test]
    async fn url_only_request_is_accepted() {
        let request = AnalysisRequest {
            source_url: Some("https://example.com".to_string()),
            ..Default::default()
        };
        let payload = analyze(&Config::default(), &request).await.unwrap();
        assert!(payload.metrics.is_empty());
        assert_eq!(payload.analysis.overall_score, 0);
    }
}
