use std::path::Path;

use bytes::Bytes;

use crate::error::{ConvertError, ConvertResult};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A file the caller wants converted: payload, name and declared MIME type.
///
/// The size is always read from `content`, so the declared upload length
/// cannot disagree with the bytes sent.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content: Bytes,
    pub mime_type: Option<String>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Reads a local file. `.pdf` files are declared as `application/pdf`.
    pub async fn from_path(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ConvertError::request(format!("not a file path: {}", path.display())))?;

        tracing::debug!(file_name = %name, file_size = content.len(), "Read upload file from disk");

        let file = Self::new(name, content);
        if file.name.to_lowercase().ends_with(".pdf") {
            Ok(file.with_mime_type(PDF_MIME_TYPE))
        } else {
            Ok(file)
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn size_mb(&self) -> f64 {
        self.size() as f64 / (1024.0 * 1024.0)
    }
}
