use serde::{Deserialize, Serialize};

/// Body returned by `POST /convert`.
#[derive(Debug, Default, Deserialize)]
pub struct ConvertResponse {
    pub success: Option<bool>,
    pub content: Option<String>,
    pub processing_method: Option<String>,
    pub filename: Option<String>,
    pub error: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionResult {
    pub success: bool,
    pub content: String,
    pub processing_method: String,
    pub filename: String,
    pub note: Option<String>,
}

impl ConversionResult {
    pub fn from_response(response: ConvertResponse) -> Self {
        Self {
            success: true,
            content: response.content.unwrap_or_default(),
            processing_method: response.processing_method.unwrap_or_default(),
            filename: response.filename.unwrap_or_default(),
            note: response.note,
        }
    }
}

/// Body returned by `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Outcome of a health check. Failures are a value here, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy { status: String, message: String },
    Unhealthy { error: String },
}

impl HealthStatus {
    pub fn success(&self) -> bool {
        matches!(self, HealthStatus::Healthy { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            HealthStatus::Healthy { .. } => None,
            HealthStatus::Unhealthy { error } => Some(error),
        }
    }
}

impl From<HealthResponse> for HealthStatus {
    fn from(response: HealthResponse) -> Self {
        HealthStatus::Healthy {
            status: response.status,
            message: response.message,
        }
    }
}
