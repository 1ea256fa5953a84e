//! Visual analysis types returned by the remote multimodal service.
//!
//! Every field is optional: an absent field means "unknown", never zero.
//! A non-empty `errors` list marks a partial or failed analysis.

use serde::{Deserialize, Deserializer, Serialize};

use crate::metrics::clamp_score;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualAnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contrast: Option<ContrastAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutAnalysis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_extraction: Option<TextExtraction>,
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub overall_score: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl VisualAnalysisResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            errors: vec![message.into()],
            ..Default::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True when no signal at all was obtained.
    pub fn is_empty(&self) -> bool {
        self.contrast.is_none()
            && self.layout.is_none()
            && self.text_extraction.is_none()
            && self.overall_score.is_none()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContrastAnalysis {
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutAnalysis {
    /// Higher means busier (0 - 100)
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub complexity: Option<u8>,
    #[serde(
        default,
        deserialize_with = "lenient_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub focusable_elements: Option<u32>,
    /// Qualitative verdict such as "clear", "moderate" or "weak"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_hierarchy: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextExtraction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headings: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<String>,
}

/// Accepts any JSON number (or null) and normalizes it to an integer score.
pub(crate) fn lenient_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(clamp_score))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite())
        .map(|v| v.round().clamp(0.0, u32::MAX as f64) as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_json_reconstructs_structured_value() {
        let original = VisualAnalysisResult {
            contrast: Some(ContrastAnalysis {
                score: Some(62),
                issues: vec!["Grey helper text on white".to_string()],
            }),
            layout: Some(LayoutAnalysis {
                complexity: Some(40),
                focusable_elements: Some(12),
                visual_hierarchy: Some("clear".to_string()),
            }),
            text_extraction: Some(TextExtraction {
                text: None,
                headings: vec!["Checkout".to_string()],
                links: vec![],
            }),
            overall_score: Some(71),
            errors: vec![],
        };
        let wire = serde_json::to_string(&original).unwrap();
        assert!(wire.contains("\"overallScore\":71"));
        assert!(wire.contains("\"focusableElements\":12"));
        assert!(!wire.contains("errors"), "empty errors are omitted: {wire}");
        let parsed: VisualAnalysisResult = serde_json::from_str(&wire).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn fractional_and_out_of_range_scores_are_normalized() {
        let parsed: VisualAnalysisResult = serde_json::from_str(
            r#"{"overallScore": 72.5, "contrast": {"score": 140}, "layout": {"focusableElements": 7.0}}"#,
        )
        .unwrap();
        assert_eq!(parsed.overall_score, Some(73));
        assert_eq!(parsed.contrast.unwrap().score, Some(100));
        assert_eq!(parsed.layout.unwrap().focusable_elements, Some(7));
    }

    #[test]
    fn absent_fields_stay_unknown() {
        let parsed: VisualAnalysisResult = serde_json::from_str("{}").unwrap();
        assert!(parsed.is_empty());
        assert!(!parsed.has_errors());
        assert_eq!(parsed.overall_score, None);
    }
}
