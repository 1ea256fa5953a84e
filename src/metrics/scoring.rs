use std::collections::BTreeSet;

use serde_json::{json, Value};

use super::patterns::{self, count};
use super::typography::TypographySignals;
use crate::types::{Evidence, MetricId, MetricResult};

const LONG_SENTENCE_WORDS: f64 = 20.0;
const LONG_PARAGRAPH_WORDS: f64 = 80.0;
const FREE_INTERACTIVE_ELEMENTS: usize = 8;
const FREE_FONT_SIZES: usize = 6;
const FREE_FORM_FIELDS: usize = 6;

/// Round half away from zero, then clamp into [0, 100].
pub fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn evidence<const N: usize>(entries: [(&str, Value); N]) -> Evidence {
    entries
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

fn excess(value: usize, allowance: usize) -> f64 {
    value.saturating_sub(allowance) as f64
}

pub fn readability(t: &TypographySignals) -> MetricResult {
    let mut score = 100.0;
    if t.avg_words_per_sentence > LONG_SENTENCE_WORDS {
        score -= 2.0 * (t.avg_words_per_sentence - LONG_SENTENCE_WORDS);
    }
    if t.heading_count == 0 {
        score -= 15.0;
    }
    if t.word_count < 50 {
        score -= 10.0;
    }
    score -= 4.0 * t.small_text_hits as f64;
    score -= (4.0 * t.low_contrast_hits as f64).min(20.0);
    score -= 3.0 * t.tight_line_height_hits as f64;
    score -= 4.0 * t.light_weight_hits as f64;
    score -= 6.0 * t.wide_block_risk as f64;

    let summary = if t.avg_words_per_sentence > LONG_SENTENCE_WORDS {
        "Copy reads densely; sentences run longer than most readers can scan comfortably."
    } else {
        "Copy is scannable with manageable sentence lengths."
    };

    let mut recommendations = Vec::new();
    if t.avg_words_per_sentence > LONG_SENTENCE_WORDS {
        recommendations.push("Break long sentences into shorter statements of 20 words or fewer.".to_string());
    }
    if t.heading_count < 2 {
        recommendations.push("Add descriptive headings so readers can skim the page structure.".to_string());
    }
    if t.word_count < 80 {
        recommendations.push("Provide enough explanatory copy for users to understand each step.".to_string());
    }
    if t.small_text_hits > 0 {
        recommendations.push("Raise body text to at least 16px; avoid extra-small type for content.".to_string());
    }
    if t.low_contrast_hits > 0 {
        recommendations.push("Darken light grey or translucent text to improve contrast.".to_string());
    }
    if t.tight_line_height_hits > 0 {
        recommendations.push("Loosen line height to around 1.5 for body copy.".to_string());
    }
    if t.wide_block_risk > 0 {
        recommendations.push("Constrain text blocks to roughly 60-80 characters per line.".to_string());
    }
    if t.light_weight_hits > 0 {
        recommendations.push("Avoid thin or light font weights for running text.".to_string());
    }

    MetricResult::new(
        MetricId::Readability,
        clamp_score(score),
        summary,
        recommendations,
        evidence([
            ("wordCount", json!(t.word_count)),
            ("sentenceCount", json!(t.sentence_count)),
            ("avgWordsPerSentence", json!(t.avg_words_per_sentence)),
            ("headingCount", json!(t.heading_count)),
            ("smallTextHits", json!(t.small_text_hits)),
            ("lowContrastHits", json!(t.low_contrast_hits)),
            ("tightLineHeights", json!(t.tight_line_height_hits)),
            ("lightWeightHits", json!(t.light_weight_hits)),
            ("wideBlockRisk", json!(t.wide_block_risk)),
        ]),
    )
}

pub fn cognitive_load(markup: &str, t: &TypographySignals) -> MetricResult {
    let unique_components = patterns::TAG_NAME
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect::<BTreeSet<_>>()
        .len();
    let interactive_elements = count(&patterns::INTERACTIVE, markup);

    let mut score = 90.0 - unique_components as f64;
    score -= 2.0 * excess(interactive_elements, FREE_INTERACTIVE_ELEMENTS);
    score -= 2.0 * excess(t.unique_font_sizes, FREE_FONT_SIZES);
    if t.avg_words_per_paragraph > LONG_PARAGRAPH_WORDS {
        score -= ((t.avg_words_per_paragraph - LONG_PARAGRAPH_WORDS) * 0.5).min(20.0);
    }

    let summary = if interactive_elements > FREE_INTERACTIVE_ELEMENTS {
        "Many competing actions are visible at once, which raises decision effort."
    } else {
        "Interaction density stays within a comfortable range."
    };

    let mut recommendations = Vec::new();
    if unique_components > 30 {
        recommendations.push("Consolidate component types; reuse a smaller set of patterns.".to_string());
    }
    if interactive_elements > FREE_INTERACTIVE_ELEMENTS {
        recommendations.push("Reduce simultaneous calls to action and group secondary actions.".to_string());
    }
    if t.unique_font_sizes > FREE_FONT_SIZES {
        recommendations.push("Limit the type scale to six or fewer font sizes.".to_string());
    }
    if t.avg_words_per_paragraph > LONG_PARAGRAPH_WORDS {
        recommendations.push("Split long paragraphs into smaller chunks or lists.".to_string());
    }

    MetricResult::new(
        MetricId::CognitiveLoad,
        clamp_score(score),
        summary,
        recommendations,
        evidence([
            ("uniqueComponents", json!(unique_components)),
            ("interactiveElements", json!(interactive_elements)),
            ("uniqueFontSizes", json!(t.unique_font_sizes)),
            ("avgWordsPerParagraph", json!(t.avg_words_per_paragraph)),
            ("wordCount", json!(t.word_count)),
        ]),
    )
}

pub fn stress(markup: &str) -> MetricResult {
    let alert_words = count(&patterns::STRESS_KEYWORD, markup);
    let red_patterns = count(&patterns::RED_COLOR, markup);
    let form_fields = count(&patterns::FORM_FIELD, markup);

    let mut score = 85.0;
    score -= 5.0 * alert_words as f64;
    score -= 3.0 * red_patterns as f64;
    score -= 2.0 * excess(form_fields, FREE_FORM_FIELDS);

    let mut concerns = Vec::new();
    if alert_words > 0 {
        concerns.push("alarm-toned wording");
    }
    if red_patterns > 0 {
        concerns.push("heavy use of red");
    }
    if form_fields > FREE_FORM_FIELDS {
        concerns.push("dense input fields");
    }
    let summary = if concerns.is_empty() {
        "Tone and visuals appear calm with few stress triggers.".to_string()
    } else {
        format!("Stress triggers detected: {}.", concerns.join(", "))
    };

    let mut recommendations = Vec::new();
    if alert_words > 0 {
        recommendations.push("Soften alert and error wording; explain what happened and how to recover.".to_string());
    }
    if red_patterns > 0 {
        recommendations.push("Reserve red for genuine errors and pair it with icons or text.".to_string());
    }
    if form_fields > FREE_FORM_FIELDS {
        recommendations.push("Group dense input fields and mark optional ones clearly.".to_string());
    }

    MetricResult::new(
        MetricId::Stress,
        clamp_score(score),
        summary,
        recommendations,
        evidence([
            ("alertWords", json!(alert_words)),
            ("redPatterns", json!(red_patterns)),
            ("formFields", json!(form_fields)),
        ]),
    )
}

pub fn memory(markup: &str) -> MetricResult {
    let form_fields = count(&patterns::FORM_FIELD, markup);
    let step_indicators = count(&patterns::STEP_INDICATOR, markup);

    let mut score = 95.0;
    score -= 4.0 * excess(form_fields, FREE_FORM_FIELDS);
    if step_indicators == 0 && form_fields > 4 {
        score -= 10.0;
    }

    let summary = if form_fields > FREE_FORM_FIELDS {
        "Users must hold many fields in mind at once."
    } else {
        "Memory demands are modest."
    };

    let mut recommendations = Vec::new();
    if form_fields > FREE_FORM_FIELDS {
        recommendations.push("Stage long forms into steps or disclose fields progressively.".to_string());
    }
    if step_indicators == 0 {
        recommendations.push("Show progress or breadcrumbs so users know where they are.".to_string());
    }

    MetricResult::new(
        MetricId::Memory,
        clamp_score(score),
        summary,
        recommendations,
        evidence([
            ("formFields", json!(form_fields)),
            ("stepIndicators", json!(step_indicators)),
        ]),
    )
}

pub fn empathy(text: &str, t: &TypographySignals) -> MetricResult {
    let supportive_words = count(&patterns::SUPPORTIVE_WORD, text);
    let jargon_words = count(&patterns::JARGON_WORD, text);

    let mut score = 70.0 + 5.0 * supportive_words as f64 - 4.0 * jargon_words as f64;
    let legibility_bonus = t.legibility_hits() == 0;
    if legibility_bonus {
        score += 8.0;
    }
    let calm_layout_bonus =
        t.unique_font_sizes <= 5 && t.avg_words_per_paragraph <= LONG_PARAGRAPH_WORDS;
    if calm_layout_bonus {
        score += 5.0;
    }
    let score = clamp_score(score);

    let summary = if score >= 80 {
        "Language feels supportive and respectful of the reader."
    } else if score >= 60 {
        "Tone is neutral; a few more supportive cues would help."
    } else {
        "Language reads as cold or technical for the intended audience."
    };

    let mut recommendations = Vec::new();
    if supportive_words < 2 {
        recommendations.push("Add reassuring, supportive microcopy at key moments.".to_string());
    }
    if jargon_words > 0 {
        recommendations.push("Replace technical jargon with plain language.".to_string());
    }
    if t.legibility_hits() > 0 {
        recommendations.push("Fix small, faint or cramped text so every reader can follow along.".to_string());
    }

    MetricResult::new(
        MetricId::Empathy,
        score,
        summary,
        recommendations,
        evidence([
            ("supportiveWords", json!(supportive_words)),
            ("jargonWords", json!(jargon_words)),
            ("legibilityBonus", json!(legibility_bonus)),
            ("calmLayoutBonus", json!(calm_layout_bonus)),
            ("wordCount", json!(t.word_count)),
        ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::typography::normalize_text;

    fn signals(html: &str) -> TypographySignals {
        TypographySignals::extract(html, &normalize_text(html))
    }

    #[test]
    fn clamp_score_rounds_half_away_from_zero() {
        assert_eq!(clamp_score(72.5), 73);
        assert_eq!(clamp_score(72.4), 72);
        assert_eq!(clamp_score(-12.0), 0);
        assert_eq!(clamp_score(180.0), 100);
        assert_eq!(clamp_score(f64::NAN), 0);
    }

    #[test]
    fn stress_counts_keywords_in_whole_markup() {
        let html = r#"<div role="status">An error occurred. Another error. This is urgent.</div>"#;
        let result = stress(html);
        assert_eq!(result.score, 70);
        assert_eq!(result.evidence["alertWords"], json!(3));
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn stress_counts_plurals_and_class_names() {
        let html = r#"<div class="alerts">2 errors and 3 warnings need attention</div>"#;
        let result = stress(html);
        assert_eq!(result.evidence["alertWords"], json!(3));
        assert_eq!(result.score, 70);
    }

    #[test]
    fn stress_penalizes_red_and_dense_fields() {
        let inputs = "<input>".repeat(8);
        let html = format!(r#"<form class="text-red-600">{inputs}</form>"#);
        // 85 - 3 (red) - 2 * 2 (fields beyond six)
        assert_eq!(stress(&html).score, 78);
    }

    #[test]
    fn memory_without_steps_penalizes_mid_size_forms() {
        let five = "<input>".repeat(5);
        assert_eq!(memory(&five).score, 85);
        let stepped = format!(r#"<ol class="steps"><li>Step 1</li></ol>{five}"#);
        assert_eq!(memory(&stepped).score, 95);
        let nine = "<input>".repeat(9);
        // 95 - 4 * 3 - 10
        assert_eq!(memory(&nine).score, 73);
    }

    #[test]
    fn progressbar_role_counts_as_step_indicator() {
        let html = format!(
            r#"<div role="progressbar" aria-valuenow="2"></div>{}"#,
            "<input>".repeat(5)
        );
        let result = memory(&html);
        assert_eq!(result.score, 95);
        assert_eq!(result.evidence["stepIndicators"], json!(1));
        assert!(result.recommendations.iter().all(|r| !r.contains("progress")));
    }

    #[test]
    fn cognitive_load_caps_paragraph_penalty() {
        let words = "word ".repeat(200);
        let html = format!("<p>{words}</p>");
        let result = cognitive_load(&html, &signals(&html));
        // 90 - 1 unique tag - min(20, (200 - 80) * 0.5)
        assert_eq!(result.score, 69);
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn readability_low_contrast_penalty_is_capped() {
        let html = r#"<h1>T</h1><h2>U</h2><div style="max-width: 600px">"#.to_string()
            + &r#"<span class="text-gray-300">x</span>"#.repeat(8)
            + &"Short line here. ".repeat(20)
            + "</div>";
        let result = readability(&signals(&html));
        assert_eq!(result.evidence["lowContrastHits"], json!(8));
        // 100 - 20 (capped contrast)
        assert_eq!(result.score, 80);
    }

    #[test]
    fn readability_penalizes_long_sentences() {
        let sentence = "word ".repeat(30);
        let sentence = sentence.trim_end();
        let html = format!(
            r#"<h1>A</h1><h2>B</h2><div class="max-w-xl">{sentence}. {sentence}.</div>"#
        );
        let result = readability(&signals(&html));
        // 62 words over 2 sentences = 31 avg -> 100 - 2 * 11
        assert_eq!(result.score, 78);
        assert!(result.summary.contains("densely"));
        assert!(result.recommendations[0].contains("long sentences"));
    }

    #[test]
    fn empathy_rewards_supportive_language() {
        let html = "<p>We are here to help. Thanks for your patience, please reach out anytime.</p>";
        let result = empathy(&normalize_text(html), &signals(html));
        // 70 + 5 * 4 + 8 + 5
        assert_eq!(result.evidence["supportiveWords"], json!(4));
        assert_eq!(result.score, 100);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn empathy_ignores_jargon_inside_markup_attributes() {
        let html = r#"<div data-endpoint="/api" class="robust"><p>Welcome aboard.</p></div>"#;
        let result = empathy(&normalize_text(html), &signals(html));
        assert_eq!(result.evidence["jargonWords"], json!(0));
    }
}
