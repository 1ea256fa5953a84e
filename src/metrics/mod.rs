//! Heuristic metric engine.
//!
//! Pure functions of the markup: no I/O, no randomness. The same input always
//! yields the same five [`MetricResult`]s.

mod patterns;
pub mod scoring;
pub mod typography;

pub use scoring::clamp_score;
pub use typography::{normalize_text, TypographySignals};

use crate::error::{HcaError, Result};
use crate::types::MetricResult;

/// Default minimum trimmed markup length accepted by [`evaluate_heuristics`].
pub const DEFAULT_MIN_HTML_LENGTH: usize = 20;

/// Compute all five metrics. Empty markup yields results from zero-valued
/// signals.
pub fn compute_metrics(markup: &str) -> Vec<MetricResult> {
    let text = normalize_text(markup);
    let typography = TypographySignals::extract(markup, &text);
    tracing::debug!(
        words = typography.word_count,
        sentences = typography.sentence_count,
        headings = typography.heading_count,
        paragraphs = typography.paragraph_count,
        "extracted typography signals"
    );

    vec![
        scoring::readability(&typography),
        scoring::cognitive_load(markup, &typography),
        scoring::stress(markup),
        scoring::memory(markup),
        scoring::empathy(&text, &typography),
    ]
}

/// Heuristic evaluation entry point.
///
/// Absent markup is scored as empty; present markup shorter than
/// `min_length` (after trimming) is rejected as insufficient content.
pub fn evaluate_heuristics(html: Option<&str>, min_length: usize) -> Result<Vec<MetricResult>> {
    let markup = html.unwrap_or_default();
    if html.is_some() {
        let length = markup.trim().chars().count();
        if length < min_length {
            return Err(HcaError::InsufficientContent {
                length,
                minimum: min_length,
            });
        }
    }
    Ok(compute_metrics(markup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MetricId;
    use serde_json::json;

    fn score_of(results: &[MetricResult], id: MetricId) -> u8 {
        results
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.score)
            .expect("metric present")
    }

    fn sample_page() -> String {
        let mut html = String::from(
            r#"<html><body><main class="max-w-3xl"><h1 class="text-2xl font-light">Welcome</h1>"#,
        );
        html.push_str(r#"<p class="text-xs text-gray-400" style="line-height: 1.1;">"#);
        html.push_str(&"Please fill in the form below to continue. ".repeat(6));
        html.push_str("</p><form>");
        html.push_str(&r#"<input type="text"><button class="bg-red-500">Error</button>"#.repeat(9));
        html.push_str("</form></main></body></html>");
        html
    }

    #[test]
    fn results_come_in_fixed_order() {
        let ids: Vec<MetricId> = compute_metrics("").iter().map(|r| r.id).collect();
        assert_eq!(ids, MetricId::ALL.to_vec());
    }

    #[test]
    fn empty_markup_is_well_formed() {
        let results = compute_metrics("");
        assert_eq!(results.len(), 5);
        // 100 - 15 (no headings) - 10 (few words)
        assert_eq!(score_of(&results, MetricId::Readability), 75);
        assert_eq!(score_of(&results, MetricId::CognitiveLoad), 90);
        assert_eq!(score_of(&results, MetricId::Stress), 85);
        assert_eq!(score_of(&results, MetricId::Memory), 95);
        assert_eq!(score_of(&results, MetricId::Empathy), 83);
    }

    #[test]
    fn scores_stay_in_range_for_hostile_markup() {
        let hostile = format!(
            "{}{}{}",
            r#"<p style="color:#ddd; font-size: 9px; line-height: 0.9;" class="font-thin text-red-700">"#
                .repeat(60),
            "ERROR urgent warning alert invalid fatal exception ".repeat(40),
            "<input><select></select><textarea></textarea>".repeat(30)
        );
        for html in [String::new(), sample_page(), hostile] {
            for result in compute_metrics(&html) {
                assert!(result.score <= 100, "{} out of range", result.id);
            }
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let html = sample_page();
        let first = serde_json::to_string(&compute_metrics(&html)).unwrap();
        let second = serde_json::to_string(&compute_metrics(&html)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn word_count_is_shared_and_ignores_unrelated_markup() {
        let html = sample_page();
        let with_button = html.replace("</main>", "<button></button></main>");
        for markup in [&html, &with_button] {
            let results = compute_metrics(markup);
            let counts: Vec<_> = results
                .iter()
                .filter_map(|r| r.evidence.get("wordCount").cloned())
                .collect();
            assert_eq!(counts.len(), 3, "readability, cognitive load and empathy report it");
            assert!(counts.iter().all(|c| *c == counts[0]));
        }
        let before = &compute_metrics(&html)[0].evidence["wordCount"];
        let after = &compute_metrics(&with_button)[0].evidence["wordCount"];
        assert_eq!(before, after);
    }

    #[test]
    fn three_inputs_without_headings() {
        let copy = "Enter your details. We keep them private. ".repeat(9);
        let html = format!(
            r#"<form><div>{copy}</div><input name="a"><input name="b"><input name="c"></form>"#
        );
        let results = compute_metrics(&html);
        assert_eq!(score_of(&results, MetricId::Memory), 95);
        assert_eq!(score_of(&results, MetricId::Readability), 85);
    }

    #[test]
    fn ten_tags_and_ten_interactive_elements() {
        let html = concat!(
            "<html><body><main><nav><ul>",
            "<li><a>1</a></li><li><a>2</a></li><li><a>3</a></li><li><a>4</a></li>",
            "</ul></nav><form>",
            "<button>b</button><button>b</button><button>b</button>",
            "<input><input><input>",
            "</form></main></body></html>"
        );
        let result = compute_metrics(html)
            .into_iter()
            .find(|r| r.id == MetricId::CognitiveLoad)
            .unwrap();
        assert_eq!(result.evidence["uniqueComponents"], json!(10));
        assert_eq!(result.evidence["interactiveElements"], json!(10));
        assert_eq!(result.score, 76);
    }

    #[test]
    fn absent_html_is_scored_and_short_html_is_rejected() {
        assert_eq!(evaluate_heuristics(None, 20).unwrap().len(), 5);
        let err = evaluate_heuristics(Some("  <p>hi</p>  "), 20).unwrap_err();
        assert!(matches!(
            err,
            HcaError::InsufficientContent {
                length: 9,
                minimum: 20
            }
        ));
        assert!(evaluate_heuristics(Some(&sample_page()), 20).is_ok());
    }
}
