use crate::ingest::IngestError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum HcaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing input: provide HTML, a screenshot, or a URL to analyze")]
    MissingInput,

    #[error("Not enough content to analyze ({length} characters, minimum {minimum})")]
    InsufficientContent { length: usize, minimum: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HcaError {
    pub fn config(message: impl Into<String>) -> Self {
        HcaError::Config(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        HcaError::Internal(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            HcaError::MissingInput | HcaError::InsufficientContent { .. } => ErrorCategory::Input,
            HcaError::Io(_) | HcaError::InvalidUrl(_) | HcaError::Config(_) => {
                ErrorCategory::Config
            }
            HcaError::Network(_) => ErrorCategory::Network,
            HcaError::Image(_) => ErrorCategory::Image,
            HcaError::Serialization(_) | HcaError::Internal(_) => ErrorCategory::Internal,
        }
    }

    /// Errors the caller can fix by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(self.category(), ErrorCategory::Input)
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            HcaError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            HcaError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            HcaError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify URL/format (e.g., https://example.com).",
            ),
            HcaError::Image(e) => ErrorPayload::new(
                ErrorCategory::Image,
                e.to_string(),
                "Verify the screenshot is a PNG, JPEG, GIF or WebP file.",
            ),
            HcaError::MissingInput => ErrorPayload::new(
                ErrorCategory::Input,
                self.to_string(),
                "Pass --html, --screenshot or --url.",
            ),
            HcaError::InsufficientContent { .. } => ErrorPayload::new(
                ErrorCategory::Input,
                self.to_string(),
                "Provide the full page markup rather than a fragment.",
            ),
            HcaError::Config(msg) => ErrorPayload::new(
                ErrorCategory::Config,
                msg.as_str(),
                "Check flags/paths and the [service] table of the config file.",
            ),
            HcaError::Serialization(_) | HcaError::Internal(_) => ErrorPayload::new(
                ErrorCategory::Internal,
                "Internal error while analyzing input",
                "Re-run with --verbose; file an issue if persistent.",
            ),
        }
    }
}

impl From<IngestError> for HcaError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::NotFound(path) => HcaError::Config(format!("File not found: {}", path)),
            IngestError::Read(e) => HcaError::Io(e),
            IngestError::NotAnImage(e) => HcaError::Image(e),
            IngestError::InvalidUrl(e) => HcaError::InvalidUrl(e),
            IngestError::UnsupportedScheme(scheme) => {
                HcaError::Config(format!("Unsupported URL scheme: {}", scheme))
            }
            IngestError::Fetch(e) => HcaError::Network(e),
            IngestError::Status(status) => {
                HcaError::Config(format!("Fetching the URL returned HTTP {}", status))
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, HcaError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Input,
    Config,
    Network,
    Image,
    Internal,
}

/// Wire form of an error: what went wrong, in which area, and how to fix it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(
        category: ErrorCategory,
        message: impl Into<String>,
        remediation: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            remediation: Some(remediation.into()),
        }
    }
}
