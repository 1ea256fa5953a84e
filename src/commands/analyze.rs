use std::path::PathBuf;
use std::process::ExitCode;

use hca_lib::ingest::{fetch_html, load_screenshot, parse_source_url};
use hca_lib::output::{AnalyzeOutput, HCA_OUTPUT_VERSION};
use hca_lib::{AnalysisRequest, Analyzer, HcaError, HcaOutput};

use super::evaluate::read_markup;
use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::{load_config, resolve_min_html_length};

/// Run the full analysis command.
#[allow(clippy::too_many_arguments)]
pub async fn run_analyze(
    raw_args: &[String],
    config_path: Option<PathBuf>,
    html: Option<PathBuf>,
    screenshot: Option<PathBuf>,
    url: Option<String>,
    min_html_length: usize,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let mut config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    config.min_html_length = resolve_min_html_length(raw_args, min_html_length, &config);
    if !config.service.is_configured() {
        tracing::debug!("no service credential; using local recommendations");
    }

    let analyzer = match Analyzer::new(&config) {
        Ok(analyzer) => analyzer,
        Err(err) => return render_error(err, format, output),
    };

    let mut warnings = Vec::new();
    let mut request = AnalysisRequest::default();

    if let Some(path) = html.as_deref() {
        match read_markup(&path.to_string_lossy()) {
            Ok(markup) => request.html = Some(markup),
            Err(err) => return render_error(err, format, output),
        }
    }

    if let Some(path) = screenshot.as_deref() {
        tracing::debug!(path = %path.display(), "loading screenshot");
        match load_screenshot(path) {
            Ok(shot) => request.screenshot_data_url = Some(shot.data_url),
            Err(err) => return render_error(err.into(), format, output),
        }
    }

    if let Some(raw) = url.as_deref().filter(|u| !u.trim().is_empty()) {
        let parsed = match parse_source_url(raw) {
            Ok(parsed) => parsed,
            Err(err) => return render_error(err.into(), format, output),
        };
        let mut reachable = true;
        if request.html.is_none() {
            match fetch_html(analyzer.client().http(), &parsed).await {
                Ok(page) => {
                    tracing::debug!(url = %page.final_url, bytes = page.html.len(), "fetched page");
                    request.html = Some(page.html);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "page fetch failed");
                    warnings.push(format!("Could not fetch {}: {}", parsed, err));
                    reachable = false;
                }
            }
        }
        if reachable || request.screenshot_data_url.is_some() {
            request.source_url = Some(parsed.to_string());
        }
    }

    let payload = match analyzer.analyze(&request).await {
        Ok(payload) => payload,
        Err(err) => return render_error(err, format, output),
    };

    let body = HcaOutput::Analyze(AnalyzeOutput {
        version: HCA_OUTPUT_VERSION.to_string(),
        payload,
        warnings,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(HcaError::internal(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
