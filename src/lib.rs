//! PDF Converter Client
//!
//! Uploads documents to a remote PDF-to-text conversion service, reports
//! upload progress and turns transport failures into user-facing messages.
//! Also ships the client-side file checks the service's uploaders rely on.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::ClientConfig;
pub use error::{ConvertError, ConvertResult};
pub use middleware::{RequestHooks, TracingHooks};
pub use models::{ConversionResult, HealthStatus, PdfType, SupportedFileType, UploadFile, ValidationResult};
pub use services::{
    detect_pdf_type, estimate_processing_time, format_file_size, supported_file_types, validate_file,
    ConversionClient, ProgressCallback,
};
