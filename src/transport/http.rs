//! reqwest-backed transport

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures_util::stream;
use reqwest::header::CONTENT_LENGTH;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::time::Instant;
use tracing::debug;

use super::{Result, Transport, TransportError};
use crate::target::{MultipartBody, RequestBody, UploadRequest};

const CHUNK_SIZE: usize = 64 * 1024;

/// HTTP client configuration
///
/// The idle timeout and user agent come from the request itself.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            max_redirects: 10,
        }
    }
}

/// Transport sending uploads with a reqwest [`Client`]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

        Ok(Self { client })
    }

    async fn exchange(&self, builder: RequestBuilder, activity: &Activity) -> Result<Bytes> {
        let mut response = builder.send().await.map_err(map_reqwest_error)?;
        activity.touch();

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let mut body = BytesMut::new();
        while let Some(chunk) = response.chunk().await.map_err(map_body_error)? {
            activity.touch();
            body.extend_from_slice(&chunk);
        }

        Ok(body.freeze())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: UploadRequest) -> Result<Bytes> {
        let UploadRequest {
            method,
            url,
            headers,
            timeout,
            body,
        } = request;

        debug!(%url, ?method, "Sending upload");

        let activity = Activity::new();
        let builder = self
            .client
            .request(method.as_reqwest(), url.clone())
            .headers(headers);

        let builder = match body {
            RequestBody::Raw { file, length } => builder
                .header(CONTENT_LENGTH, length)
                .body(file_body(file, activity.clone())),
            RequestBody::Multipart(multipart) => {
                builder.multipart(into_form(multipart, activity.clone()))
            }
        };

        let bytes = tokio::select! {
            result = self.exchange(builder, &activity) => result?,
            _ = idle_expired(&activity, timeout) => {
                debug!(%url, ?timeout, "Upload stalled");
                return Err(TransportError::Timeout);
            }
        };

        debug!(%url, size = bytes.len(), "Upload reply received");

        Ok(bytes)
    }
}

/// Last moment bytes moved in either direction
#[derive(Debug, Clone)]
struct Activity(Arc<Mutex<Instant>>);

impl Activity {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Instant::now())))
    }

    fn touch(&self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    fn last(&self) -> Instant {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resolves once `limit` has passed without any activity
async fn idle_expired(activity: &Activity, limit: Duration) {
    loop {
        let deadline = activity.last() + limit;
        if Instant::now() >= deadline {
            return;
        }
        tokio::time::sleep_until(deadline).await;
    }
}

/// Stream the file in chunks, recording progress as each chunk is handed over
fn file_body(file: File, activity: Activity) -> Body {
    let chunks = stream::unfold(Some(file), move |file| {
        let activity = activity.clone();
        async move {
            let mut file = file?;
            let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
            match file.read_buf(&mut buf).await {
                Ok(0) => None,
                Ok(_) => {
                    activity.touch();
                    Some((Ok(buf.freeze()), Some(file)))
                }
                Err(e) => Some((Err::<Bytes, std::io::Error>(e), None)),
            }
        }
    });

    Body::wrap_stream(chunks)
}

fn into_form(body: MultipartBody, activity: Activity) -> Form {
    let form = body
        .fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));

    let part = Part::stream_with_length(file_body(body.file, activity), body.length)
        .file_name(body.file_name);

    form.part(body.file_field, part)
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::RequestFailed(e.to_string())
    }
}

fn map_body_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Body(e.to_string())
    }
}
