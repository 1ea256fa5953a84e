//! Visual analysis adapter.
//!
//! Sends the screenshot (and/or markup and URL) to the multimodal service and
//! turns whatever comes back into a [`VisualAnalysisResult`]. Every failure is
//! folded into the result's `errors` list; nothing propagates to the caller.

use std::sync::LazyLock;

use regex::Regex;

use crate::metrics::clamp_score;
use crate::service::{truncate_chars, ChatMessage, ContentBlock, ServiceClient, ServiceError};
use crate::types::{TextExtraction, VisualAnalysisResult};

pub const SERVICE_UNAVAILABLE: &str = "Visual analysis service unavailable";
pub const STRUCTURED_PARSE_FAILED: &str =
    "Visual analysis response could not be parsed as structured JSON";

static OVERALL_SCORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"?overall[_ ]?score"?\s*[:=]\s*(-?\d+(?:\.\d+)?)"#)
        .unwrap_or_else(|e| panic!("invalid overall score pattern: {e}"))
});

const VISUAL_PROMPT: &str = r#"You are an accessibility and human-factors reviewer.
Assess the interface and respond with STRICT JSON only, no prose, using exactly this shape:
{
  "contrast": {"score": <0-100>, "issues": [<string>]},
  "layout": {"complexity": <0-100, higher is busier>, "focusableElements": <integer>, "visualHierarchy": "clear" | "moderate" | "weak"},
  "textExtraction": {"text": <visible text>, "headings": [<string>], "links": [<string>]},
  "overallScore": <0-100>
}"#;

/// Inputs for one visual analysis call. All optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisualInput<'a> {
    pub image_data_url: Option<&'a str>,
    pub html: Option<&'a str>,
    pub url: Option<&'a str>,
}

/// Run visual analysis. Returns an empty result when the service has no
/// credential.
pub async fn analyze_visual(
    client: &ServiceClient,
    input: VisualInput<'_>,
    html_prompt_chars: usize,
) -> VisualAnalysisResult {
    if !client.is_configured() {
        tracing::debug!("visual analysis skipped: no service credential");
        return VisualAnalysisResult::default();
    }

    let messages = [ChatMessage::user(build_content(input, html_prompt_chars))];
    let model = client.config().vision_model.clone();
    match client.complete(&model, &messages).await {
        Ok(content) => parse_visual_content(&content),
        Err(ServiceError::Status(status)) => {
            tracing::warn!(status, "visual analysis service rejected the request");
            VisualAnalysisResult::failed(format!("Visual analysis service returned {status}"))
        }
        Err(ServiceError::MissingContent) => {
            tracing::warn!("visual analysis response had no message content");
            VisualAnalysisResult::failed(STRUCTURED_PARSE_FAILED)
        }
        Err(err) => {
            tracing::warn!(error = %err, "visual analysis service unavailable");
            VisualAnalysisResult::failed(SERVICE_UNAVAILABLE)
        }
    }
}

fn build_content(input: VisualInput<'_>, html_prompt_chars: usize) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    if let Some(image) = input.image_data_url {
        blocks.push(ContentBlock::image(image));
    }

    let mut prompt = String::from(VISUAL_PROMPT);
    if let Some(url) = input.url {
        prompt.push_str("\n\nSource URL: ");
        prompt.push_str(url);
    }
    if let Some(html) = input.html {
        prompt.push_str("\n\nPage markup (may be truncated):\n");
        prompt.push_str(truncate_chars(html, html_prompt_chars));
    }
    if input.image_data_url.is_none() {
        prompt.push_str("\n\nNo screenshot is attached; infer visual signals from the markup.");
    }
    blocks.push(ContentBlock::text(prompt));
    blocks
}

/// Tolerant parse of the service's message content.
///
/// Tries, in order: the first JSON object (after removing code fences), a
/// bare overall-score number, and finally the raw text with an error note.
pub fn parse_visual_content(content: &str) -> VisualAnalysisResult {
    let unfenced = strip_code_fences(content);
    if let Some(json) = extract_json_object(unfenced) {
        match serde_json::from_str::<VisualAnalysisResult>(json) {
            Ok(parsed) => return parsed,
            Err(err) => tracing::debug!(error = %err, "structured visual parse failed"),
        }
    }

    if let Some(score) = OVERALL_SCORE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        return VisualAnalysisResult {
            overall_score: Some(clamp_score(score)),
            ..Default::default()
        };
    }

    VisualAnalysisResult {
        text_extraction: Some(TextExtraction {
            text: Some(content.to_string()),
            ..Default::default()
        }),
        errors: vec![STRUCTURED_PARSE_FAILED.to_string()],
        ..Default::default()
    }
}

/// Remove a surrounding markdown code fence (with optional language tag).
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.split_once('\n') {
        Some((_lang, body)) => body,
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// The first balanced `{...}` substring, honoring string literals.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    #[test]
    fn parses_fenced_json() {
        let content = "```json\n{\"overallScore\": 81, \"contrast\": {\"score\": 64, \"issues\": [\"faint labels\"]}}\n```";
        let parsed = parse_visual_content(content);
        assert_eq!(parsed.overall_score, Some(81));
        assert_eq!(parsed.contrast.unwrap().issues, vec!["faint labels"]);
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn extracts_object_from_surrounding_prose() {
        let content = "Here you go: {\"overallScore\": 55, \"textExtraction\": {\"text\": \"a } brace\"}} hope it helps {x}";
        assert_eq!(
            extract_json_object(content),
            Some("{\"overallScore\": 55, \"textExtraction\": {\"text\": \"a } brace\"}}")
        );
        assert_eq!(parse_visual_content(content).overall_score, Some(55));
    }

    #[test]
    fn falls_back_to_regex_score() {
        let parsed = parse_visual_content("Overall score: 67.6 (contrast is weak)");
        assert_eq!(parsed.overall_score, Some(68));
        assert!(parsed.errors.is_empty());
        assert!(parsed.text_extraction.is_none());
    }

    #[test]
    fn unparseable_text_is_kept_with_error() {
        let parsed = parse_visual_content("I cannot see the image.");
        assert_eq!(parsed.errors, vec![STRUCTURED_PARSE_FAILED.to_string()]);
        assert_eq!(
            parsed.text_extraction.and_then(|t| t.text).as_deref(),
            Some("I cannot see the image.")
        );
    }

    #[test]
    fn unbalanced_object_is_not_extracted() {
        assert_eq!(extract_json_object("{\"a\": {\"b\": 1}"), None);
        assert_eq!(extract_json_object("no braces"), None);
    }

    #[test]
    fn image_block_precedes_prompt() {
        let blocks = build_content(
            VisualInput {
                image_data_url: Some("data:image/png;base64,AA"),
                html: Some("<h1>Hi</h1>"),
                url: Some("https://example.com"),
            },
            100,
        );
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], ContentBlock::ImageUrl { .. }));
        match &blocks[1] {
            ContentBlock::Text { text } => {
                assert!(text.contains("https://example.com"));
                assert!(text.contains("<h1>Hi</h1>"));
            }
            other => panic!("expected text block, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unconfigured_adapter_returns_empty_result() {
        let client = ServiceClient::new(ServiceConfig::default()).unwrap();
        let result = analyze_visual(&client, VisualInput::default(), 100).await;
        assert_eq!(result, VisualAnalysisResult::default());
    }
}
