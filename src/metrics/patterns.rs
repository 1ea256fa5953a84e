//! Markup patterns behind the heuristic signals.
//!
//! These are deliberately approximate scans over raw markup and utility-class
//! conventions, not a DOM parse.

use std::sync::LazyLock;

use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

pub(crate) static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?is)<script\b[^>]*>.*?</script\s*>|<style\b[^>]*>.*?</style\s*>")
});

pub(crate) static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"<[^>]*>"));

pub(crate) static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| compile(r"\s+"));

pub(crate) static HEADING: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)<h[1-6][\s>/]"));

pub(crate) static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)<p[\s>/]"));

/// Opening tag names; closing tags and doctype/comments never match.
pub(crate) static TAG_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"<([A-Za-z][A-Za-z0-9-]*)"));

pub(crate) static INTERACTIVE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)<(?:button|a|input|select|textarea)\b"));

pub(crate) static FORM_FIELD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)<(?:input|select|textarea)\b"));

pub(crate) static SMALL_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)\btext-xs\b",
        r"|\btext-\[(?:[0-9]|1[0-3])(?:\.\d+)?px\]",
        r"|font-size\s*:\s*(?:[0-9]|1[0-3])(?:\.\d+)?px",
        r"|font-size\s*:\s*0?\.[0-8]\d*rem",
    ))
});

pub(crate) static LOW_CONTRAST: LazyLock<Regex> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)\btext-(?:gray|slate|zinc|neutral|stone)-(?:100|200|300|400)\b",
        r"|(?:^|[^-a-z])color\s*:\s*#(?:[c-f]{3}|(?:[c-f][0-9a-f]){3})\b",
        r"|rgba\(\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*\d{1,3}\s*,\s*0?\.[0-4]\d*\s*\)",
    ))
});

pub(crate) static TIGHT_LINE_HEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)\bleading-(?:none|tight)\b",
        r#"|line-height\s*:\s*(?:0?\.\d+|1(?:\.[0-2]\d*)?)\s*(?:[;"'}]|$)"#,
    ))
});

pub(crate) static LIGHT_WEIGHT: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)\bfont-(?:thin|extralight|light)\b"));

pub(crate) static FONT_SIZE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)\btext-(?:xs|sm|base|lg|xl|[2-9]xl)\b",
        r"|\btext-\[\d+(?:\.\d+)?(?:px|rem|em)\]",
        r"|font-size\s*:\s*[0-9.]+(?:px|rem|em|%)?",
    ))
});

/// Groups: 1-2 bracketed utility value/unit, 3 named utility, 4-5 inline value/unit.
pub(crate) static MAX_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)\bmax-w-\[(\d+(?:\.\d+)?)(px|rem)\]",
        r"|\bmax-w-(xs|sm|md|lg|xl|[2-7]xl|prose|full|none|screen-[a-z0-9]+)\b",
        r"|max-width\s*:\s*(\d+(?:\.\d+)?)\s*(px|rem|em|ch|%|vw)?",
    ))
});

/// Every occurrence counts, inside words and attribute values too.
pub(crate) static STRESS_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)alert|warning|error|urgent"));

pub(crate) static RED_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)\b(?:text|bg|border)-red-\d{2,3}\b",
        r"|#(?:f00|ff0000|e53935|d32f2f|dc2626|ef4444|b91c1c)\b",
        r"|\bcolor\s*:\s*red\b",
    ))
});

/// Substring match, so `progressbar`, `stepper` and `breadcrumbs` all count.
pub(crate) static STEP_INDICATOR: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)step|progress|breadcrumb"));

pub(crate) static SUPPORTIVE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)\b(?:help|helps|helpful|support|please|thank|thanks|welcome",
        r"|together|guide|easy|safe|care|gentle|anytime|here for you)\b",
    ))
});

pub(crate) static JARGON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)\b(?:leverage|synergy|utilize|paradigm|robust|scalable|seamless",
        r"|deprecated|backend|endpoint|parameter|authentication|invalid|fatal",
        r"|exception|abort)\b",
    ))
});

pub(crate) fn count(pattern: &Regex, haystack: &str) -> usize {
    pattern.find_iter(haystack).count()
}
