use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use hca_lib::output::{EvaluateOutput, HCA_OUTPUT_VERSION};
use hca_lib::{evaluate_heuristics, HcaError, HcaOutput};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{load_config, resolve_min_html_length};

/// Run the heuristic-only evaluate command.
pub async fn run_evaluate(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    html: String,
    min_html_length: usize,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    let min_html_length = resolve_min_html_length(raw_args, min_html_length, &config);

    let markup = match read_markup(&html) {
        Ok(markup) => markup,
        Err(err) => return render_error(err, format, output),
    };
    tracing::debug!(source = %html, chars = markup.chars().count(), "markup loaded");

    let metrics = match evaluate_heuristics(Some(&markup), min_html_length) {
        Ok(metrics) => metrics,
        Err(err) => return render_error(err, format, output),
    };

    let body = HcaOutput::Evaluate(EvaluateOutput {
        version: HCA_OUTPUT_VERSION.to_string(),
        metrics,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(HcaError::internal(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}

/// `-` reads stdin; anything else is a file path.
pub(crate) fn read_markup(source: &str) -> Result<String, HcaError> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    let path = PathBuf::from(source);
    if !path.exists() {
        return Err(HcaError::config(format!(
            "File not found: {}",
            path.display()
        )));
    }
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_markup_reports_missing_file_as_config_error() {
        let err = read_markup("/nonexistent/page.html").unwrap_err();
        assert!(matches!(err, HcaError::Config(ref msg) if msg.contains("File not found")));
    }

    #[test]
    fn read_markup_reads_file() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<p>Hello there</p>").expect("write html");
        let markup = read_markup(path.to_str().expect("utf8 path")).expect("read");
        assert_eq!(markup, "<p>Hello there</p>");
    }
}
