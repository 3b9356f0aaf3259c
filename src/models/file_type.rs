/// A file type the conversion service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedFileType {
    pub mime_type: &'static str,
    pub extension: &'static str,
    pub description: &'static str,
    pub max_size_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub error: Option<String>,
    pub file_type: Option<SupportedFileType>,
}

impl ValidationResult {
    pub fn accepted(file_type: SupportedFileType) -> Self {
        Self {
            valid: true,
            error: None,
            file_type: Some(file_type),
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            file_type: None,
        }
    }
}

/// Rough guess at how a PDF's text is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfType {
    Text,
    Image,
    Unknown,
}

impl PdfType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfType::Text => "text",
            PdfType::Image => "image",
            PdfType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for PdfType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
