//! Thin ingestion collaborator: screenshot files become data URLs and
//! source URLs become fetched HTML. The analysis core treats both as opaque.

use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Failed to read file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Not a supported image: {0}")]
    NotAnImage(#[from] image::ImageError),
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Fetching the URL returned HTTP {0}")]
    Status(u16),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Screenshot {
    pub data_url: String,
    pub mime_type: &'static str,
    pub byte_len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub html: String,
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_data_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_html: Option<String>,
    pub metadata: IngestionMetadata,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot_mime_type: Option<String>,
}

fn mime_type(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Ico => "image/x-icon",
        ImageFormat::Tiff => "image/tiff",
        _ => "image/octet-stream",
    }
}

/// Encode raw image bytes as a `data:` URL, sniffing the format.
pub fn image_data_url(bytes: &[u8]) -> Result<Screenshot, IngestError> {
    let format = image::guess_format(bytes)?;
    let mime_type = mime_type(format);
    Ok(Screenshot {
        data_url: format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)),
        mime_type,
        byte_len: bytes.len(),
    })
}

pub fn load_screenshot(path: &Path) -> Result<Screenshot, IngestError> {
    if !path.exists() {
        return Err(IngestError::NotFound(path.display().to_string()));
    }
    let bytes = fs::read(path)?;
    image_data_url(&bytes)
}

pub fn parse_source_url(raw: &str) -> Result<Url, IngestError> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(IngestError::UnsupportedScheme(other.to_string())),
    }
}

/// GET the page; redirects are followed by the client.
pub async fn fetch_html(client: &reqwest::Client, url: &Url) -> Result<FetchedPage, IngestError> {
    let response = client.get(url.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(IngestError::Status(status.as_u16()));
    }
    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let html = response.text().await?;
    Ok(FetchedPage {
        html,
        final_url,
        status: status.as_u16(),
        content_type,
    })
}

/// Collect whatever inputs can be obtained. Failures are recorded as
/// warnings; `error` is set only when nothing at all was ingested.
pub async fn ingest(
    client: &reqwest::Client,
    screenshot: Option<&Path>,
    url: Option<&str>,
) -> IngestionResult {
    let mut result = IngestionResult::default();

    if let Some(path) = screenshot {
        match load_screenshot(path) {
            Ok(shot) => {
                result.metadata.screenshot_bytes = Some(shot.byte_len);
                result.metadata.screenshot_mime_type = Some(shot.mime_type.to_string());
                result.screenshot_data_url = Some(shot.data_url);
            }
            Err(err) => result.warnings.push(format!("Screenshot: {err}")),
        }
    }

    if let Some(raw) = url {
        result.metadata.source_url = Some(raw.trim().to_string());
        let fetched = match parse_source_url(raw) {
            Ok(parsed) => fetch_html(client, &parsed).await,
            Err(err) => Err(err),
        };
        match fetched {
            Ok(page) => {
                tracing::debug!(url = %page.final_url, status = page.status, bytes = page.html.len(), "fetched page");
                result.metadata.final_url = Some(page.final_url);
                result.metadata.status = Some(page.status);
                result.metadata.content_type = page.content_type;
                result.fetched_html = Some(page.html);
            }
            Err(err) => {
                tracing::warn!(error = %err, "page fetch failed");
                result.warnings.push(format!("URL: {err}"));
            }
        }
        if screenshot.is_none() {
            result.note = Some(
                "No screenshot was captured for the URL; headless capture is not available."
                    .to_string(),
            );
        }
    }

    if result.screenshot_data_url.is_none()
        && result.fetched_html.is_none()
        && !result.warnings.is_empty()
    {
        result.error = result.warnings.first().cloned();
    }
    result
}
