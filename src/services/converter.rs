use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::{stream, Stream, StreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ConvertError, ConvertResult};
use crate::middleware::RequestHooks;
use crate::models::{
    ConversionResult, ConvertResponse, HealthResponse, HealthStatus, PdfType, SupportedFileType,
    UploadFile, ValidationResult,
};
use crate::services::file_check;

/// Receives upload progress as a whole percentage, 0 to 100.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Client for the remote PDF-to-text conversion service.
///
/// Holds no per-call state, so one instance can drive any number of
/// concurrent conversions.
#[derive(Clone)]
pub struct ConversionClient {
    http: reqwest::Client,
    config: ClientConfig,
    hooks: Option<Arc<dyn RequestHooks>>,
}

impl ConversionClient {
    /// Builds a client after checking `config` with [`ClientConfig::validate`].
    pub fn new(config: ClientConfig) -> ConvertResult<Self> {
        config
            .validate()
            .map_err(|e| ConvertError::config(format!("{:#}", e)))?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            config,
            hooks: None,
        })
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RequestHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Uploads `file` to `POST /convert` and returns the converted text.
    ///
    /// `on_progress` fires as the body is handed to the transport, only for
    /// non-empty files. Every failure is returned as a [`ConvertError`] whose
    /// message is ready to show to a user; nothing is retried.
    pub async fn convert(
        &self,
        file: &UploadFile,
        on_progress: Option<ProgressCallback>,
    ) -> ConvertResult<ConversionResult> {
        let request_id = new_request_id();
        let url = self.config.endpoint("convert");
        let start = Instant::now();

        info!(
            request_id = %request_id,
            file_name = %file.name,
            file_size = file.size(),
            "Starting PDF conversion request"
        );
        self.notify_request(&request_id, "POST", &url);

        let outcome = self
            .post_file(&url, file, on_progress)
            .await
            .and_then(|(status, body)| {
                self.notify_response(&request_id, "POST", &url, status, start.elapsed());
                parse_convert_response(status, &body)
            });

        match outcome {
            Ok(result) => {
                info!(
                    request_id = %request_id,
                    processing_method = %result.processing_method,
                    content_length = result.content.len(),
                    total_time_ms = start.elapsed().as_millis() as u64,
                    "PDF conversion completed successfully"
                );
                Ok(result)
            }
            Err(e) => {
                self.notify_error(&request_id, "POST", &url, &e);
                Err(e)
            }
        }
    }

    /// Pings `GET /` on the service. Failures come back as
    /// [`HealthStatus::Unhealthy`] rather than as an error.
    pub async fn check_health(&self) -> HealthStatus {
        let request_id = new_request_id();
        let url = self.config.endpoint("");
        let start = Instant::now();

        debug!(request_id = %request_id, url = %url, "Health check requested");
        self.notify_request(&request_id, "GET", &url);

        match self.fetch_health(&request_id, &url, start).await {
            Ok(response) => {
                info!(request_id = %request_id, status = %response.status, "Health check completed");
                response.into()
            }
            Err(e) => {
                self.notify_error(&request_id, "GET", &url, &e);
                warn!(request_id = %request_id, error = %e, "Health check failed");
                HealthStatus::Unhealthy {
                    error: e.to_string(),
                }
            }
        }
    }

    pub fn supported_file_types(&self) -> &'static [SupportedFileType] {
        file_check::supported_file_types()
    }

    pub fn validate_file(&self, file: &UploadFile) -> ValidationResult {
        file_check::validate_file(file)
    }

    pub fn estimate_processing_time(&self, file: &UploadFile) -> u64 {
        file_check::estimate_processing_time(file)
    }

    pub fn detect_pdf_type(&self, file: &UploadFile) -> PdfType {
        file_check::detect_pdf_type(file)
    }

    async fn post_file(
        &self,
        url: &str,
        file: &UploadFile,
        on_progress: Option<ProgressCallback>,
    ) -> ConvertResult<(u16, String)> {
        let form = Form::new().part("file", self.file_part(file, on_progress)?);

        let response = self.http.post(url).multipart(form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(url = %url, status = status, body_len = body.len(), "Conversion response received");
        Ok((status, body))
    }

    fn file_part(&self, file: &UploadFile, on_progress: Option<ProgressCallback>) -> ConvertResult<Part> {
        let chunk_size = self.config.upload_chunk_size_kb.max(1).saturating_mul(1024);
        let body = Body::wrap_stream(progress_stream(file.content.clone(), chunk_size, on_progress));

        let part = Part::stream_with_length(body, file.size())
            .file_name(file.name.clone())
            .mime_str(file.mime_type.as_deref().unwrap_or(FALLBACK_MIME_TYPE))?;
        Ok(part)
    }

    async fn fetch_health(&self, request_id: &str, url: &str, start: Instant) -> ConvertResult<HealthResponse> {
        let response = self
            .http
            .get(url)
            .timeout(Duration::from_secs(self.config.health_timeout_seconds))
            .send()
            .await?;

        let status = response.status();
        self.notify_response(request_id, "GET", url, status.as_u16(), start.elapsed());

        if !status.is_success() {
            return Err(ConvertError::RequestFailed {
                status: status.as_u16(),
                message: format!("request failed with status code {}", status.as_u16()),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ConvertError::Rejected {
            message: format!("invalid health response: {}", e),
        })
    }

    fn notify_request(&self, request_id: &str, method: &str, url: &str) {
        if let Some(hooks) = &self.hooks {
            hooks.on_request(request_id, method, url);
        }
    }

    fn notify_response(&self, request_id: &str, method: &str, url: &str, status: u16, elapsed: Duration) {
        if let Some(hooks) = &self.hooks {
            hooks.on_response(request_id, method, url, status, elapsed);
        }
    }

    fn notify_error(&self, request_id: &str, method: &str, url: &str, error: &ConvertError) {
        if let Some(hooks) = &self.hooks {
            hooks.on_error(request_id, method, url, error);
        }
    }
}

/// Turns a `/convert` response into a result. Pure in `(status, body)`.
///
/// A 2xx body that is not JSON, or lacks `success: true`, is a rejection.
pub fn parse_convert_response(status: u16, body: &str) -> ConvertResult<ConversionResult> {
    if !(200..300).contains(&status) {
        return Err(ConvertError::from_status(status, body));
    }

    let response: ConvertResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            warn!(status = status, error = %e, "Conversion response is not valid JSON");
            ConvertResponse::default()
        }
    };

    if response.success == Some(true) {
        Ok(ConversionResult::from_response(response))
    } else {
        Err(ConvertError::rejected(response.error))
    }
}

/// `round(sent * 100 / total)`, or `None` when the total is unknown.
pub fn upload_percent(sent: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let percent = (sent.min(total) as f64 * 100.0 / total as f64).round();
    Some(percent as u8)
}

fn progress_stream(
    content: Bytes,
    chunk_size: usize,
    on_progress: Option<ProgressCallback>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send + Sync + 'static {
    let total = content.len();
    let chunks: Vec<Bytes> = (0..total)
        .step_by(chunk_size)
        .map(|offset| content.slice(offset..offset.saturating_add(chunk_size).min(total)))
        .collect();

    let mut sent: u64 = 0;
    stream::iter(chunks).map(move |chunk| {
        sent += chunk.len() as u64;
        if let (Some(callback), Some(percent)) = (&on_progress, upload_percent(sent, total as u64)) {
            callback(percent);
        }
        Ok(chunk)
    })
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()[..8].to_string()
}
