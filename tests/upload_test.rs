//! Uploads over real HTTP against a local mock host
//!
//! The mock binds 127.0.0.1:0 and records what each route received so the
//! tests can check the wire shape of multipart and raw requests.

use axum::{
    Router,
    body::Bytes,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header},
    routing::{post, put},
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use shareup::catalog::TargetCatalog;
use shareup::desktop::{MemoryClipboard, NotificationKind, RecordingNotifier};
use shareup::job::{JobServices, ShareJob};
use shareup::observability::UploadMetrics;
use shareup::target::{TargetConfig, TargetUploader};
use shareup::transport::{HttpConfig, ReqwestTransport, Transport, TransportError};

/// One multipart part as seen by the host
#[derive(Debug, Clone)]
struct ReceivedPart {
    name: String,
    file_name: Option<String>,
    data: Bytes,
}

/// One request as seen by the host
#[derive(Debug, Clone, Default)]
struct Received {
    user_agent: Option<String>,
    content_type: Option<String>,
    content_length: Option<String>,
    authorization: Option<String>,
    path_name: Option<String>,
    parts: Vec<ReceivedPart>,
    body: Bytes,
}

#[derive(Clone)]
struct MockHost {
    base: String,
    requests: Arc<Mutex<Vec<Received>>>,
}

impl MockHost {
    fn requests(&self) -> Vec<Received> {
        self.requests.lock().unwrap().clone()
    }
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

fn capture(headers: &HeaderMap) -> Received {
    Received {
        user_agent: header_text(headers, header::USER_AGENT),
        content_type: header_text(headers, header::CONTENT_TYPE),
        content_length: header_text(headers, header::CONTENT_LENGTH),
        authorization: header_text(headers, header::AUTHORIZATION),
        ..Received::default()
    }
}

async fn multipart_upload(
    State(host): State<MockHost>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> String {
    let mut received = capture(&headers);
    let mut uploaded = String::new();

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.unwrap();

        if let Some(file_name) = &file_name {
            uploaded = file_name.clone();
        }
        received.parts.push(ReceivedPart {
            name,
            file_name,
            data,
        });
    }

    host.requests.lock().unwrap().push(received);
    format!("{}/cdn/{}\n", host.base, uploaded.replace(' ', "_"))
}

async fn raw_upload(
    State(host): State<MockHost>,
    Path(name): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::Json<Value> {
    let mut received = capture(&headers);
    received.path_name = Some(name.clone());
    received.body = body;
    host.requests.lock().unwrap().push(received);

    axum::Json(json!({
        "status": 200,
        "data": {"link": format!("{}/i/{}", host.base, name)}
    }))
}

async fn failing_upload(State(host): State<MockHost>, headers: HeaderMap) -> StatusCode {
    host.requests.lock().unwrap().push(capture(&headers));
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn chatty_upload(State(host): State<MockHost>, headers: HeaderMap) -> &'static str {
    host.requests.lock().unwrap().push(capture(&headers));
    "<html><body>Your file: <a href=\"https://files.example/x9.png\">here</a></body></html>"
}

async fn start_mock_host() -> MockHost {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    let host = MockHost {
        base: format!("http://{addr}"),
        requests: Arc::new(Mutex::new(Vec::new())),
    };

    let app = Router::new()
        .route("/upload", post(multipart_upload))
        .route("/raw/{name}", put(raw_upload))
        .route("/broken", post(failing_upload))
        .route("/page", post(chatty_upload))
        .with_state(host.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    host
}

/// Read one request: headers, then as many body bytes as Content-Length says
async fn read_request(socket: &mut TcpStream) {
    let mut received = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            return;
        }
        received.extend_from_slice(&buf[..n]);

        let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&received[..end]).to_ascii_lowercase();
        let length = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if received.len() >= end + 4 + length {
            return;
        }
    }
}

/// Host answering with a chunked body: `first`, then one space every
/// `interval`, `ticks` times, then the final chunk
async fn start_trickling_host(first: &'static str, ticks: usize, interval: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        read_request(&mut socket).await;

        let head = concat!(
            "HTTP/1.1 200 OK\r\n",
            "Content-Type: text/plain\r\n",
            "Transfer-Encoding: chunked\r\n\r\n"
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        let chunk = format!("{:x}\r\n{first}\r\n", first.len());
        socket.write_all(chunk.as_bytes()).await.unwrap();

        for _ in 0..ticks {
            tokio::time::sleep(interval).await;
            if socket.write_all(b"1\r\n \r\n").await.is_err() {
                return;
            }
        }
        let _ = socket.write_all(b"0\r\n\r\n").await;
    });

    format!("http://{addr}/up")
}

fn raw_target(url: &str) -> TargetUploader {
    TargetUploader::new(target(json!({
        "id": "trickle",
        "request": {"url": url, "method": "PUT", "type": "raw"},
        "response": {"type": "text_url"}
    })))
}

struct Desk {
    clipboard: Arc<MemoryClipboard>,
    notifier: Arc<RecordingNotifier>,
}

impl Desk {
    fn new() -> Self {
        Self {
            clipboard: Arc::new(MemoryClipboard::new()),
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    fn services(&self) -> JobServices {
        JobServices {
            transport: Arc::new(ReqwestTransport::new(HttpConfig::default()).unwrap()),
            clipboard: self.clipboard.clone(),
            notifier: self.notifier.clone(),
            metrics: Arc::new(UploadMetrics::new()),
        }
    }
}

fn target(value: Value) -> TargetConfig {
    serde_json::from_value(value).unwrap()
}

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_multipart_upload_over_http() {
    let host = start_mock_host().await;
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "shot one.png", b"\x89PNG fake image");
    let desk = Desk::new();

    let config = target(json!({
        "id": "mock",
        "displayName": "Mock",
        "request": {
            "url": format!("{}/upload", host.base),
            "method": "post",
            "type": "multipart",
            "multipart": {
                "fileField": "fileToUpload",
                "fields": {"reqtype": "fileupload"}
            }
        },
        "response": {"type": "text_url"}
    }));

    let job = ShareJob::new(config, json!({ "url": file }), desk.services());
    let output = job.run().await.unwrap();

    let expected = format!("{}/cdn/shot_one.png", host.base);
    assert_eq!(output.url.as_deref(), Some(expected.as_str()));
    assert_eq!(desk.clipboard.text().as_deref(), Some(expected.as_str()));

    let requests = host.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(
        request
            .user_agent
            .as_deref()
            .is_some_and(|ua| ua.starts_with("shareup/"))
    );
    assert!(
        request
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("multipart/form-data"))
    );

    let field = request.parts.iter().find(|p| p.name == "reqtype").unwrap();
    assert_eq!(field.data, Bytes::from_static(b"fileupload"));
    assert_eq!(field.file_name, None);

    let file_part = request
        .parts
        .iter()
        .find(|p| p.name == "fileToUpload")
        .unwrap();
    assert_eq!(file_part.file_name.as_deref(), Some("shot one.png"));
    assert_eq!(file_part.data, Bytes::from_static(b"\x89PNG fake image"));
}

#[tokio::test]
async fn test_raw_put_with_filename_template() {
    let host = start_mock_host().await;
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "my pic.png", b"raw bytes");
    let desk = Desk::new();

    let config = target(json!({
        "id": "rawhost",
        "displayName": "Raw Host",
        "request": {
            "url": format!("{}/raw/${{FILENAME}}", host.base),
            "method": "PUT",
            "type": "raw",
            "contentType": "image/png",
            "headers": {"Authorization": "Bearer static-token"}
        },
        "response": {"type": "json_pointer", "pointer": "/data/link"}
    }));

    let job = ShareJob::new(config, json!({ "urls": [file] }), desk.services());
    let output = job.run().await.unwrap();

    assert_eq!(output.urls, vec![format!("{}/i/my pic.png", host.base)]);

    let requests = host.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path_name.as_deref(), Some("my pic.png"));
    assert_eq!(request.body, Bytes::from_static(b"raw bytes"));
    assert_eq!(request.content_type.as_deref(), Some("image/png"));
    assert_eq!(request.content_length.as_deref(), Some("9"));
    assert_eq!(request.authorization.as_deref(), Some("Bearer static-token"));
}

#[tokio::test]
async fn test_server_error_fails_job() {
    let host = start_mock_host().await;
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "a.png", b"a");
    let desk = Desk::new();

    let config = target(json!({
        "id": "broken",
        "displayName": "Broken",
        "request": {
            "url": format!("{}/broken", host.base),
            "method": "POST",
            "multipart": {"fileField": "file"}
        },
        "response": {"type": "text_url"}
    }));

    let job = ShareJob::new(config, json!({ "urls": [file] }), desk.services());
    let failure = job.run().await.unwrap_err();

    assert_eq!(failure.code, 1);
    assert_eq!(failure.message, "HTTP 500: Internal Server Error");
    assert_eq!(host.requests().len(), 1);

    let notifications = desk.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Error);
    assert_eq!(notifications[0].title, "Broken Upload Failed");
    assert_eq!(notifications[0].text, "HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn test_regex_extracts_url_from_page() {
    let host = start_mock_host().await;
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "x9.png", b"x");
    let desk = Desk::new();

    let config = target(json!({
        "id": "page",
        "request": {
            "url": format!("{}/page", host.base),
            "method": "POST",
            "type": "multipart",
            "multipart": {"fileField": "file"}
        },
        "response": {
            "type": "regex",
            "pattern": "href=\"(https://files\\.example/[^\"]+)\""
        }
    }));

    let job = ShareJob::new(config, json!({ "urls": [file] }), desk.services());
    let output = job.run().await.unwrap();

    assert_eq!(output.url.as_deref(), Some("https://files.example/x9.png"));
    assert_eq!(desk.notifier.notifications()[0].title, "page Upload");
}

#[tokio::test]
async fn test_unreachable_host_is_transport_failure() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "a.png", b"a");
    let desk = Desk::new();

    let config = target(json!({
        "id": "gone",
        "request": {
            "url": format!("http://{addr}/upload"),
            "method": "POST",
            "multipart": {"fileField": "file"}
        },
        "response": {"type": "text_url"}
    }));

    let job = ShareJob::new(config, json!({ "urls": [file] }), desk.services());
    let failure = job.run().await.unwrap_err();

    assert!(
        failure.message.starts_with("HTTP request failed"),
        "unexpected message: {}",
        failure.message
    );
}

#[tokio::test]
async fn test_slow_reply_within_idle_limit_succeeds() {
    // 8 ticks of 250ms keep the exchange busy well past the 1s idle limit
    let url = start_trickling_host("https://cdn/a.png", 8, Duration::from_millis(250)).await;
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "a.png", b"slow");
    let uploader = raw_target(&url);

    let mut request = uploader.upload(std::path::Path::new(&file)).await.unwrap();
    request.timeout = Duration::from_secs(1);

    let transport = ReqwestTransport::new(HttpConfig::default()).unwrap();
    let started = Instant::now();
    let reply = transport.send(request).await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(2));
    assert_eq!(
        uploader.parse_reply(Some(&reply[..])).as_deref(),
        Ok("https://cdn/a.png")
    );
}

#[tokio::test]
async fn test_stalled_reply_times_out() {
    let url = start_trickling_host("https://cdn/a.png", 1, Duration::from_secs(5)).await;
    let dir = TempDir::new().unwrap();
    let file = write_file(&dir, "a.png", b"stall");
    let uploader = raw_target(&url);

    let mut request = uploader.upload(std::path::Path::new(&file)).await.unwrap();
    request.timeout = Duration::from_millis(500);

    let transport = ReqwestTransport::new(HttpConfig::default()).unwrap();
    let started = Instant::now();
    let result = transport.send(request).await;

    assert!(matches!(result, Err(TransportError::Timeout)));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_sample_catalog_is_valid() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/targets.json");
    let catalog = TargetCatalog::load(&path).unwrap();

    assert_eq!(catalog.len(), 4);
    for id in ["catbox", "imgur", "transfer-sh", "0x0"] {
        assert!(catalog.get(id).is_ok(), "missing sample target {id}");
    }
}
