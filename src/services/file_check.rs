//! Client-side checks that need no network: type/size validation, size
//! formatting and processing-time estimates.

use crate::models::{PdfType, SupportedFileType, UploadFile, ValidationResult, PDF_MIME_TYPE};

const MB: u64 = 1024 * 1024;

pub const SUPPORTED_FILE_TYPES: &[SupportedFileType] = &[SupportedFileType {
    mime_type: PDF_MIME_TYPE,
    extension: ".pdf",
    description: "PDF document",
    max_size_bytes: 50 * MB,
}];

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

pub fn supported_file_types() -> &'static [SupportedFileType] {
    SUPPORTED_FILE_TYPES
}

/// Accepts the first supported type whose MIME type matches the declared one
/// or whose extension ends the (case-folded) file name.
pub fn validate_file(file: &UploadFile) -> ValidationResult {
    let name = file.name.to_lowercase();
    let matched = supported_file_types().iter().find(|file_type| {
        file.mime_type.as_deref() == Some(file_type.mime_type) || name.ends_with(file_type.extension)
    });

    let Some(file_type) = matched else {
        tracing::debug!(file_name = %file.name, mime_type = ?file.mime_type, "Unsupported file type");
        return ValidationResult::rejected("unsupported file type, choose a PDF file");
    };

    if file.size() > file_type.max_size_bytes {
        tracing::debug!(
            file_name = %file.name,
            file_size = file.size(),
            max_size = file_type.max_size_bytes,
            "File exceeds size limit"
        );
        return ValidationResult::rejected(format!(
            "file too large, choose a file smaller than {}",
            format_file_size(file_type.max_size_bytes)
        ));
    }

    ValidationResult::accepted(*file_type)
}

/// Base-1024 size with at most two decimals, e.g. `1.5 KB`, `50 MB`.
///
/// Sizes of 1024 GB and above stay in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut index = 0;
    let mut scale: u64 = 1;
    while index < SIZE_UNITS.len() - 1 && bytes / scale >= 1024 {
        scale *= 1024;
        index += 1;
    }

    let value = bytes as f64 / scale as f64;
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[index])
}

/// Expected server-side processing time in seconds, stepped by size.
pub fn estimate_processing_time(file: &UploadFile) -> u64 {
    let size_mb = file.size_mb();

    if size_mb < 1.0 {
        10
    } else if size_mb < 5.0 {
        30
    } else if size_mb < 20.0 {
        60
    } else {
        120
    }
}

/// Size-only guess: small PDFs are usually born-digital, large ones scanned.
/// Content is not inspected, so `PdfType::Unknown` is never produced yet.
pub fn detect_pdf_type(file: &UploadFile) -> PdfType {
    if file.size_mb() < 1.0 {
        PdfType::Text
    } else {
        PdfType::Image
    }
}
