use std::path::PathBuf;
use std::process::ExitCode;

use hca_lib::output::{IngestOutput, HCA_OUTPUT_VERSION};
use hca_lib::{HcaError, HcaOutput, ServiceClient};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};
use crate::settings::load_config;

/// Run the ingestion collaborator on its own.
pub async fn run_ingest(
    config_path: Option<PathBuf>,
    screenshot: Option<PathBuf>,
    url: Option<String>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    if screenshot.is_none() && url.as_deref().map_or(true, |u| u.trim().is_empty()) {
        return render_error(HcaError::MissingInput, format, output);
    }
    let config = match load_config(config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err, format, output),
    };
    let client = match ServiceClient::new(config.service) {
        Ok(client) => client,
        Err(err) => return render_error(err, format, output),
    };

    let result = hca_lib::ingest(client.http(), screenshot.as_deref(), url.as_deref()).await;
    let body = HcaOutput::Ingest(IngestOutput {
        version: HCA_OUTPUT_VERSION.to_string(),
        result,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(HcaError::internal(err.to_string()), format, output);
    }
    ExitCode::SUCCESS
}
