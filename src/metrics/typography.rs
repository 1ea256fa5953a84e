use std::collections::BTreeSet;

use super::patterns::{self, count};

/// Width above which a text block is considered too wide to read comfortably.
pub const WIDE_BLOCK_THRESHOLD_PX: f64 = 750.0;
const PX_PER_REM: f64 = 16.0;
const PX_PER_CH: f64 = 8.0;

/// Strip script/style contents and tags, then collapse whitespace.
pub fn normalize_text(markup: &str) -> String {
    let without_code = patterns::SCRIPT_OR_STYLE.replace_all(markup, " ");
    let without_tags = patterns::ANY_TAG.replace_all(&without_code, " ");
    patterns::WHITESPACE
        .replace_all(&without_tags, " ")
        .trim()
        .to_string()
}

/// Text and styling counts shared by the readability, cognitive-load and
/// empathy calculators. Computed once per evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypographySignals {
    pub word_count: usize,
    /// At least 1.
    pub sentence_count: usize,
    pub heading_count: usize,
    pub paragraph_count: usize,
    pub avg_words_per_sentence: f64,
    pub avg_words_per_paragraph: f64,
    pub small_text_hits: usize,
    pub low_contrast_hits: usize,
    pub tight_line_height_hits: usize,
    pub light_weight_hits: usize,
    pub unique_font_sizes: usize,
    pub wide_block_risk: usize,
}

impl TypographySignals {
    /// `text` must be the output of [`normalize_text`] for the same markup.
    pub fn extract(markup: &str, text: &str) -> Self {
        let word_count = text.split_whitespace().count();
        let sentence_count = text
            .chars()
            .filter(|c| matches!(c, '.' | '!' | '?'))
            .count()
            .max(1);
        let heading_count = count(&patterns::HEADING, markup);
        let paragraph_count = count(&patterns::PARAGRAPH, markup);

        Self {
            word_count,
            sentence_count,
            heading_count,
            paragraph_count,
            avg_words_per_sentence: average(word_count, sentence_count),
            avg_words_per_paragraph: average(word_count, paragraph_count),
            small_text_hits: count(&patterns::SMALL_TEXT, markup),
            low_contrast_hits: count(&patterns::LOW_CONTRAST, markup),
            tight_line_height_hits: count(&patterns::TIGHT_LINE_HEIGHT, markup),
            light_weight_hits: count(&patterns::LIGHT_WEIGHT, markup),
            unique_font_sizes: unique_font_sizes(markup),
            wide_block_risk: wide_block_risk(markup, paragraph_count),
        }
    }

    /// Small-text, low-contrast and tight-line-height hits combined.
    pub fn legibility_hits(&self) -> usize {
        self.small_text_hits + self.low_contrast_hits + self.tight_line_height_hits
    }
}

fn average(total: usize, divisor: usize) -> f64 {
    if divisor == 0 {
        total as f64
    } else {
        total as f64 / divisor as f64
    }
}

fn unique_font_sizes(markup: &str) -> usize {
    patterns::FONT_SIZE_TOKEN
        .find_iter(markup)
        .map(|m| {
            m.as_str()
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .collect::<BTreeSet<_>>()
        .len()
}

fn wide_block_risk(markup: &str, paragraph_count: usize) -> usize {
    let widths = max_widths_px(markup);
    if widths.is_empty() {
        return usize::from(paragraph_count > 0);
    }
    widths
        .into_iter()
        .filter(|w| *w > WIDE_BLOCK_THRESHOLD_PX)
        .count()
}

/// Every explicit max-width constraint, in px. Unbounded constraints
/// (`max-w-full`, `max-w-none`, percentages) are infinite.
fn max_widths_px(markup: &str) -> Vec<f64> {
    patterns::MAX_WIDTH
        .captures_iter(markup)
        .filter_map(|caps| {
            if let (Some(value), Some(unit)) = (caps.get(1), caps.get(2)) {
                return to_px(value.as_str(), Some(unit.as_str()));
            }
            if let Some(named) = caps.get(3) {
                return Some(named_max_width_px(&named.as_str().to_ascii_lowercase()));
            }
            caps.get(4)
                .and_then(|value| to_px(value.as_str(), caps.get(5).map(|u| u.as_str())))
        })
        .collect()
}

fn to_px(value: &str, unit: Option<&str>) -> Option<f64> {
    let value: f64 = value.parse().ok()?;
    let px = match unit.map(|u| u.to_ascii_lowercase()).as_deref() {
        Some("rem") | Some("em") => value * PX_PER_REM,
        Some("ch") => value * PX_PER_CH,
        Some("%") | Some("vw") => f64::INFINITY,
        _ => value,
    };
    Some(px)
}

fn named_max_width_px(name: &str) -> f64 {
    let rem = match name {
        "xs" => 20.0,
        "sm" => 24.0,
        "md" => 28.0,
        "lg" => 32.0,
        "xl" => 36.0,
        "2xl" => 42.0,
        "3xl" => 48.0,
        "4xl" => 56.0,
        "5xl" => 64.0,
        "6xl" => 72.0,
        "7xl" => 80.0,
        "prose" => 65.0 * PX_PER_CH / PX_PER_REM,
        _ => return f64::INFINITY,
    };
    rem * PX_PER_REM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_scripts_styles_and_tags() {
        let html = "<html><head><style>p { color: red; }</style><script>var x = 1 < 2;</script></head>\
                    <body><h1>Hello</h1>\n\n<p>World   again</p></body></html>";
        assert_eq!(normalize_text(html), "Hello World again");
    }

    #[test]
    fn empty_markup_yields_zero_signals_with_sentence_floor() {
        let signals = TypographySignals::extract("", "");
        assert_eq!(signals.word_count, 0);
        assert_eq!(signals.sentence_count, 1);
        assert_eq!(signals.avg_words_per_sentence, 0.0);
        assert_eq!(signals.avg_words_per_paragraph, 0.0);
        assert_eq!(signals.wide_block_risk, 0);
    }

    #[test]
    fn paragraph_average_falls_back_to_word_count() {
        let html = "<div>One two three. Four five.</div>";
        let signals = TypographySignals::extract(html, &normalize_text(html));
        assert_eq!(signals.word_count, 5);
        assert_eq!(signals.sentence_count, 2);
        assert_eq!(signals.paragraph_count, 0);
        assert_eq!(signals.avg_words_per_paragraph, 5.0);
        assert_eq!(signals.avg_words_per_sentence, 2.5);
    }

    #[test]
    fn paragraphs_without_width_control_are_a_risk() {
        let html = "<p>Some text.</p><p>More text.</p>";
        let signals = TypographySignals::extract(html, &normalize_text(html));
        assert_eq!(signals.wide_block_risk, 1);
    }

    #[test]
    fn explicit_widths_count_only_those_over_threshold() {
        let html = r#"<div class="max-w-prose"><p>a</p></div>
            <div style="max-width: 60rem"><p>b</p></div>
            <div class="max-w-[700px]"><p>c</p></div>
            <div class="max-w-full"><p>d</p></div>"#;
        let signals = TypographySignals::extract(html, &normalize_text(html));
        // 60rem = 960px and max-w-full exceed; prose and 700px do not.
        assert_eq!(signals.wide_block_risk, 2);
    }

    #[test]
    fn font_size_tokens_are_deduplicated() {
        let html = r#"<p class="text-sm">a</p><p class="text-sm">b</p>
            <p style="font-size: 18px">c</p><p style="font-size:18px">d</p><h1 class="text-2xl">e</h1>"#;
        let signals = TypographySignals::extract(html, &normalize_text(html));
        assert_eq!(signals.unique_font_sizes, 3);
    }
}
