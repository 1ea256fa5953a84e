use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal, Write as IoWrite};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use hca_lib::{ErrorOutput, HcaError, HcaOutput, MetricResult, HCA_OUTPUT_VERSION};

use crate::cli::OutputFormat;

/// Render `body` in the requested format and send it to `output` or stdout.
pub fn write_output(
    body: &HcaOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> io::Result<()> {
    let to_terminal = output.is_none() && io::stdout().is_terminal();
    let text = render(body, format, to_terminal)?;
    emit(&text, output.as_deref())
}

/// Print the error envelope and return the fatal exit code.
pub fn render_error(err: HcaError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    if matches!(err, HcaError::Internal(_) | HcaError::Serialization(_)) {
        tracing::error!(error = %err, "unexpected internal error");
    }
    let error = err.to_payload();
    let body = HcaOutput::Error(ErrorOutput {
        version: HCA_OUTPUT_VERSION.to_string(),
        message: Some(error.message.clone()),
        error,
    });

    if let Err(write_err) = write_output(&body, format, output) {
        tracing::warn!(error = %write_err, "could not write error envelope to its destination");
        println!(r#"{{"mode":"error"}}"#);
    }
    ExitCode::from(2)
}

/// Human text only for a terminal in pretty mode; pipelines and files get JSON.
fn render(body: &HcaOutput, format: OutputFormat, to_terminal: bool) -> io::Result<String> {
    let text = match format {
        OutputFormat::Pretty if to_terminal => format_pretty(body, true),
        OutputFormat::Pretty => serde_json::to_string_pretty(body)?,
        OutputFormat::Json => serde_json::to_string(body)?,
    };
    Ok(text)
}

fn emit(text: &str, output: Option<&Path>) -> io::Result<()> {
    match output {
        Some(path) => std::fs::write(path, text),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", text.trim_end())
        }
    }
}

fn write_metrics(buf: &mut String, metrics: &[MetricResult], colorize: bool) {
    if metrics.is_empty() {
        return;
    }
    writeln!(buf, "Metrics:").ok();
    for metric in metrics {
        let score = color(
            &format!("{:>3}", metric.score),
            score_color_code(metric.score),
            colorize,
        );
        writeln!(buf, "- {:18} {}  {}", metric.label, score, metric.summary).ok();
    }
}

pub fn format_pretty(body: &HcaOutput, colorize: bool) -> String {
    let mut buf = String::new();
    match body {
        HcaOutput::Evaluate(out) => {
            let header = color("[EVALUATE]", "34", colorize);
            writeln!(buf, "{} Heuristic metrics", header).ok();
            write_metrics(&mut buf, &out.metrics, colorize);
            for metric in &out.metrics {
                for rec in &metric.recommendations {
                    writeln!(buf, "  * [{}] {}", metric.id, rec).ok();
                }
            }
        }
        HcaOutput::Analyze(out) => {
            let analysis = &out.payload.analysis;
            let header = color("[ANALYZE]", "36", colorize);
            let overall = color(
                &analysis.overall_score.to_string(),
                score_color_code(analysis.overall_score),
                colorize,
            );
            writeln!(buf, "{} Overall score {}/100", header, overall).ok();
            writeln!(buf, "{}", analysis.summary).ok();
            write_metrics(&mut buf, &out.payload.metrics, colorize);
            if let Some(score) = out.payload.visual.overall_score {
                writeln!(buf, "Visual analysis: {}/100", score).ok();
            }
            for error in &out.payload.visual.errors {
                writeln!(buf, "Visual analysis unavailable: {}", error).ok();
            }
            if !analysis.top_issues.is_empty() {
                writeln!(buf, "Top issues:").ok();
                for issue in &analysis.top_issues {
                    writeln!(buf, "- [{:?}] {}: {}", issue.severity, issue.title, issue.description)
                        .ok();
                }
            }
            if !analysis.recommendations.is_empty() {
                writeln!(buf, "Recommendations:").ok();
                for rec in &analysis.recommendations {
                    writeln!(
                        buf,
                        "- {} (impact {:?}, effort {:?}): {}",
                        rec.title, rec.impact, rec.effort, rec.description
                    )
                    .ok();
                }
            }
            for warning in &out.warnings {
                writeln!(buf, "Warning: {}", warning).ok();
            }
        }
        HcaOutput::Ingest(out) => {
            let header = color("[INGEST]", "35", colorize);
            let result = &out.result;
            writeln!(buf, "{} Ingestion", header).ok();
            if let Some(url) = &result.metadata.source_url {
                writeln!(buf, "Source URL: {}", url).ok();
            }
            if let Some(html) = &result.fetched_html {
                writeln!(buf, "Fetched HTML: {} bytes", html.len()).ok();
            }
            if let Some(bytes) = result.metadata.screenshot_bytes {
                writeln!(buf, "Screenshot: {} bytes", bytes).ok();
            }
            if let Some(note) = &result.note {
                writeln!(buf, "Note: {}", note).ok();
            }
            for warning in &result.warnings {
                writeln!(buf, "Warning: {}", warning).ok();
            }
        }
        HcaOutput::Error(out) => {
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
        }
    }
    buf
}

fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

fn score_color_code(score: u8) -> &'static str {
    if score >= 80 {
        "32" // green
    } else if score >= 60 {
        "33" // yellow
    } else {
        "31" // red
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hca_lib::{compute_metrics, EvaluateOutput};

    #[test]
    fn score_bands() {
        assert_eq!(score_color_code(80), "32");
        assert_eq!(score_color_code(60), "33");
        assert_eq!(score_color_code(59), "31");
    }

    #[test]
    fn pretty_evaluate_lists_every_metric_without_ansi_when_plain() {
        let body = HcaOutput::Evaluate(EvaluateOutput {
            version: HCA_OUTPUT_VERSION.to_string(),
            metrics: compute_metrics(""),
        });
        let text = format_pretty(&body, false);
        for label in [
            "Readability",
            "Cognitive Load",
            "User Stress",
            "Memory Load",
            "Empathy Alignment",
        ] {
            assert!(text.contains(label), "missing {label}");
        }
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn piped_pretty_output_is_indented_json() {
        let body = HcaOutput::Evaluate(EvaluateOutput {
            version: HCA_OUTPUT_VERSION.to_string(),
            metrics: compute_metrics(""),
        });
        let text = render(&body, OutputFormat::Pretty, false).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed["mode"], "evaluate");
        assert!(text.contains("\n  "));
        assert!(!render(&body, OutputFormat::Json, true).unwrap().contains('\n'));
    }

    #[test]
    fn error_envelope_is_written_to_output_file() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("err.json");
        let code = render_error(HcaError::MissingInput, OutputFormat::Json, Some(path.clone()));
        assert_eq!(code, ExitCode::from(2));
        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).expect("read")).expect("json");
        assert_eq!(written["error"]["category"], "input");
    }

    #[test]
    fn render_error_always_returns_fatal_exit_code() {
        let code = render_error(HcaError::config("boom"), OutputFormat::Json, None);
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn pretty_error_includes_hint() {
        let payload = HcaError::MissingInput.to_payload();
        let body = HcaOutput::Error(ErrorOutput {
            version: HCA_OUTPUT_VERSION.to_string(),
            message: None,
            error: payload,
        });
        let text = format_pretty(&body, false);
        assert!(text.starts_with("[ERROR] Missing input"));
        assert!(text.contains("Hint:"));
    }
}
