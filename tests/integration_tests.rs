//! Integration tests for the conversion client against a mock service

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use pdf_converter::config::MAX_UPLOAD_CHUNK_SIZE_KB;
use pdf_converter::{
    ClientConfig, ConversionClient, ConvertError, HealthStatus, ProgressCallback, RequestHooks,
    UploadFile,
};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ConversionClient {
    ConversionClient::new(ClientConfig::new(server.uri())).unwrap()
}

fn sample_pdf() -> UploadFile {
    UploadFile::new("sample.pdf", b"%PDF-1.4 sample document".to_vec()).with_mime_type("application/pdf")
}

/// Base URL of a port nothing listens on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

async fn convert_error_for(template: ResponseTemplate) -> ConvertError {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(template)
        .mount(&server)
        .await;

    client_for(&server)
        .convert(&sample_pdf(), None)
        .await
        .unwrap_err()
}

#[tokio::test]
async fn test_convert_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .and(body_string_contains("name=\"file\"; filename=\"sample.pdf\""))
        .and(body_string_contains("%PDF-1.4 sample document"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "content": "# Sample\n\nExtracted text",
            "processing_method": "text extraction",
            "filename": "sample.pdf",
            "note": "tables converted to markdown"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).convert(&sample_pdf(), None).await.unwrap();

    assert!(result.success);
    assert_eq!(result.content, "# Sample\n\nExtracted text");
    assert_eq!(result.processing_method, "text extraction");
    assert_eq!(result.filename, "sample.pdf");
    assert_eq!(result.note.as_deref(), Some("tables converted to markdown"));
}

#[tokio::test]
async fn test_convert_reports_progress() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "content": "text",
            "processing_method": "OCR",
            "filename": "scan.pdf"
        })))
        .mount(&server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let on_progress: ProgressCallback = {
        let seen = seen.clone();
        Arc::new(move |percent| seen.lock().unwrap().push(percent))
    };

    // 200 KB in 64 KB chunks
    let file = UploadFile::new("scan.pdf", vec![b'x'; 200 * 1024]).with_mime_type("application/pdf");
    client_for(&server).convert(&file, Some(on_progress)).await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*seen.last().unwrap(), 100);
}

#[tokio::test]
async fn test_convert_sends_replaced_content_in_full() {
    let payload = "y".repeat(300);
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .and(body_string_contains(payload.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true, "content": "replaced", "filename": "a.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let on_progress: ProgressCallback = {
        let seen = seen.clone();
        Arc::new(move |percent| seen.lock().unwrap().push(percent))
    };

    let mut file = UploadFile::new("a.pdf", vec![b'x'; 100]).with_mime_type("application/pdf");
    file.content = Bytes::from(payload.clone().into_bytes());

    let result = client_for(&server).convert(&file, Some(on_progress)).await.unwrap();

    assert_eq!(result.content, "replaced");
    assert_eq!(*seen.lock().unwrap(), vec![100]);
}

#[tokio::test]
async fn test_convert_with_largest_chunk_size() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true, "content": "one chunk"
        })))
        .mount(&server)
        .await;

    let config = ClientConfig {
        upload_chunk_size_kb: MAX_UPLOAD_CHUNK_SIZE_KB,
        ..ClientConfig::new(server.uri())
    };
    let seen = Arc::new(Mutex::new(Vec::new()));
    let on_progress: ProgressCallback = {
        let seen = seen.clone();
        Arc::new(move |percent| seen.lock().unwrap().push(percent))
    };

    let client = ConversionClient::new(config).unwrap();
    let result = client.convert(&sample_pdf(), Some(on_progress)).await.unwrap();

    assert_eq!(result.content, "one chunk");
    assert_eq!(*seen.lock().unwrap(), vec![100]);
}

#[test]
fn test_client_rejects_invalid_config() {
    let zero_timeout = ClientConfig::new("http://localhost:5001").with_request_timeout(0);
    let error = ConversionClient::new(zero_timeout).err().unwrap();
    assert_eq!(error.error_code(), "CONFIG_ERROR");
    assert!(error.to_string().contains("REQUEST_TIMEOUT_SECONDS"));

    let huge_chunks = ClientConfig {
        upload_chunk_size_kb: usize::MAX,
        ..ClientConfig::new("http://localhost:5001")
    };
    let error = ConversionClient::new(huge_chunks).err().unwrap();
    assert_eq!(error.error_code(), "CONFIG_ERROR");
    assert!(error.to_string().contains("UPLOAD_CHUNK_SIZE_KB"));
}

#[tokio::test]
async fn test_convert_empty_file_reports_no_progress() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "empty file"
        })))
        .mount(&server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let on_progress: ProgressCallback = {
        let seen = seen.clone();
        Arc::new(move |percent| seen.lock().unwrap().push(percent))
    };

    let file = UploadFile::new("empty.pdf", Vec::new());
    let error = client_for(&server).convert(&file, Some(on_progress)).await.unwrap_err();

    assert_eq!(error.to_string(), "empty file");
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_convert_maps_status_codes() {
    let bad_request = convert_error_for(
        ResponseTemplate::new(400).set_body_json(serde_json::json!({ "error": "no file uploaded" })),
    )
    .await;
    assert_eq!(bad_request.to_string(), "no file uploaded");

    let bad_request_no_body = convert_error_for(ResponseTemplate::new(400)).await;
    assert_eq!(bad_request_no_body.to_string(), "invalid request parameters");

    let too_large = convert_error_for(ResponseTemplate::new(413)).await;
    assert_eq!(too_large.to_string(), "file too large, choose a file under 50MB");

    let server_error = convert_error_for(
        ResponseTemplate::new(500).set_body_json(serde_json::json!({ "error": "processing failed" })),
    )
    .await;
    assert_eq!(server_error.to_string(), "internal server error, retry later");

    let unavailable = convert_error_for(ResponseTemplate::new(503)).await;
    assert_eq!(unavailable.to_string(), "service temporarily unavailable, retry later");

    let teapot = convert_error_for(ResponseTemplate::new(418)).await;
    assert_eq!(teapot.to_string(), "request failed (418)");
    assert_eq!(teapot.status(), Some(418));
}

#[tokio::test]
async fn test_convert_rejected_by_service() {
    let with_message = convert_error_for(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "error": "OCR engine unavailable"
        })),
    )
    .await;
    assert_eq!(with_message.to_string(), "OCR engine unavailable");
    assert_eq!(with_message.error_code(), "CONVERSION_REJECTED");

    let without_message = convert_error_for(
        ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": false })),
    )
    .await;
    assert_eq!(without_message.to_string(), "conversion failed");

    let malformed = convert_error_for(ResponseTemplate::new(200).set_body_string("<html>proxy</html>")).await;
    assert_eq!(malformed.to_string(), "conversion failed");
}

#[tokio::test]
async fn test_convert_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "success": true, "content": "late" }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = ConversionClient::new(ClientConfig::new(server.uri()).with_request_timeout(1)).unwrap();
    let error = client.convert(&sample_pdf(), None).await.unwrap_err();

    assert!(matches!(error, ConvertError::Network { .. }));
    assert_eq!(error.to_string(), "network connection failed, check network settings");
}

#[tokio::test]
async fn test_convert_connection_refused_is_network_error() {
    let client = ConversionClient::new(ClientConfig::new(closed_port_url())).unwrap();
    let error = client.convert(&sample_pdf(), None).await.unwrap_err();

    assert_eq!(error.to_string(), "network connection failed, check network settings");
    assert_eq!(error.status(), None);
}

#[tokio::test]
async fn test_convert_invalid_mime_type_is_request_error() {
    let server = MockServer::start().await;
    let file = UploadFile::new("sample.pdf", b"%PDF".to_vec()).with_mime_type("not a mime type");

    let error = client_for(&server).convert(&file, None).await.unwrap_err();

    assert_eq!(error.error_code(), "REQUEST_ERROR");
    assert!(!error.to_string().is_empty());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_conversions_are_independent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .and(body_string_contains("first.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true, "content": "one", "filename": "first.pdf"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .and(body_string_contains("second.pdf"))
        .respond_with(ResponseTemplate::new(413))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let first = UploadFile::new("first.pdf", b"%PDF-1".to_vec());
    let second = UploadFile::new("second.pdf", b"%PDF-2".to_vec());

    let (a, b) = tokio::join!(client.convert(&first, None), client.convert(&second, None));

    assert_eq!(a.unwrap().content, "one");
    assert_eq!(b.unwrap_err(), ConvertError::FileTooLarge);
}

#[derive(Default)]
struct RecordingHooks {
    events: Mutex<Vec<String>>,
}

impl RequestHooks for RecordingHooks {
    fn on_request(&self, _request_id: &str, method: &str, _url: &str) {
        self.events.lock().unwrap().push(format!("request {}", method));
    }

    fn on_response(&self, _request_id: &str, method: &str, _url: &str, status: u16, _elapsed: Duration) {
        self.events.lock().unwrap().push(format!("response {} {}", method, status));
    }

    fn on_error(&self, _request_id: &str, method: &str, _url: &str, error: &ConvertError) {
        self.events.lock().unwrap().push(format!("error {} {}", method, error.error_code()));
    }
}

#[tokio::test]
async fn test_hooks_observe_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/convert"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok", "message": "ready"
        })))
        .mount(&server)
        .await;

    let hooks = Arc::new(RecordingHooks::default());
    let client = client_for(&server).with_hooks(hooks.clone());

    client.convert(&sample_pdf(), None).await.unwrap_err();
    client.check_health().await;

    let events = hooks.events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            "request POST".to_string(),
            "response POST 503".to_string(),
            "error POST SERVICE_UNAVAILABLE".to_string(),
            "request GET".to_string(),
            "response GET 200".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_check_health_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "API gateway running",
            "message": "upload PDFs to /convert"
        })))
        .mount(&server)
        .await;

    let health = client_for(&server).check_health().await;

    assert!(health.success());
    assert_eq!(
        health,
        HealthStatus::Healthy {
            status: "API gateway running".to_string(),
            message: "upload PDFs to /convert".to_string(),
        }
    );
}

#[tokio::test]
async fn test_check_health_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let health = client_for(&server).check_health().await;

    assert!(!health.success());
    assert_eq!(health.error(), Some("request failed with status code 503"));
}

#[tokio::test]
async fn test_check_health_network_failure() {
    let client = ConversionClient::new(ClientConfig::new(closed_port_url())).unwrap();
    let health = client.check_health().await;

    assert!(!health.success());
    assert!(!health.error().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_file_from_path() {
    let mut temp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    temp.write_all(b"%PDF-1.7 from disk").unwrap();

    let file = UploadFile::from_path(temp.path()).await.unwrap();

    assert!(file.name.ends_with(".pdf"));
    assert_eq!(file.size(), 18);
    assert_eq!(file.mime_type.as_deref(), Some("application/pdf"));
    assert_eq!(&file.content[..], b"%PDF-1.7 from disk");
}

#[tokio::test]
async fn test_upload_file_from_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let error = UploadFile::from_path(dir.path().join("missing.pdf")).await.unwrap_err();

    assert_eq!(error.error_code(), "REQUEST_ERROR");
}
