//! Request builder: turns a [`RequestSpec`] plus a local file into an
//! [`UploadRequest`] ready for a transport.
//!
//! The request owns the opened file. Whoever consumes the request (a
//! transport, or nobody if the request is dropped) releases the handle.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::fs::File;
use tracing::debug;
use url::Url;

use super::models::RequestSpec;
use super::template::{apply_url_template, substitute_env};

/// Inactivity limit of every upload: the exchange is aborted once no bytes
/// have moved in either direction for this long
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every upload request
pub const PRODUCT_USER_AGENT: &str = concat!("shareup/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("not an existing regular file: {0}")]
    NotAFile(PathBuf),

    #[error("request url is not configured")]
    MissingUrl,

    #[error("request method is not configured")]
    MissingMethod,

    #[error("unsupported request type '{0}'")]
    UnsupportedType(String),

    #[error("method {method} is not supported for {kind} uploads")]
    UnsupportedMethod { method: String, kind: RequestKind },

    #[error("multipart file field is not configured")]
    MissingFileField,

    #[error("invalid upload url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// HTTP methods an upload may use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMethod {
    Put,
    Post,
}

impl UploadMethod {
    /// Case-insensitive parse; anything but PUT/POST is rejected
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "PUT" => Some(Self::Put),
            "POST" => Some(Self::Post),
            _ => None,
        }
    }

    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Put => reqwest::Method::PUT,
            Self::Post => reqwest::Method::POST,
        }
    }
}

/// Request body envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Raw,
    Multipart,
}

impl RequestKind {
    /// Empty means multipart
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "" | "multipart" => Some(Self::Multipart),
            "raw" => Some(Self::Raw),
            _ => None,
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => f.write_str("raw"),
            Self::Multipart => f.write_str("multipart"),
        }
    }
}

/// Fully specified upload, owning the open source file
#[derive(Debug)]
pub struct UploadRequest {
    pub method: UploadMethod,
    pub url: Url,
    pub headers: HeaderMap,
    /// Idle limit, not a deadline for the whole exchange
    pub timeout: Duration,
    pub body: RequestBody,
}

#[derive(Debug)]
pub enum RequestBody {
    /// The whole body is the file content
    Raw { file: File, length: u64 },
    Multipart(MultipartBody),
}

/// Form fields followed by one streamed file part
#[derive(Debug)]
pub struct MultipartBody {
    pub fields: BTreeMap<String, String>,
    pub file_field: String,
    pub file_name: String,
    pub file: File,
    pub length: u64,
}

/// Build the request uploading `path` according to `spec`
pub async fn build(spec: &RequestSpec, path: &Path) -> Result<UploadRequest, BuildError> {
    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| BuildError::NotAFile(path.to_path_buf()))?;
    if !metadata.is_file() {
        return Err(BuildError::NotAFile(path.to_path_buf()));
    }

    if spec.url.is_empty() {
        return Err(BuildError::MissingUrl);
    }
    if spec.method.is_empty() {
        return Err(BuildError::MissingMethod);
    }

    let kind = RequestKind::parse(&spec.kind)
        .ok_or_else(|| BuildError::UnsupportedType(spec.kind.clone()))?;
    let method = match (kind, UploadMethod::parse(&spec.method)) {
        (RequestKind::Raw, Some(method)) => method,
        (RequestKind::Multipart, Some(UploadMethod::Post)) => UploadMethod::Post,
        _ => {
            return Err(BuildError::UnsupportedMethod {
                method: spec.method.to_ascii_uppercase(),
                kind,
            });
        }
    };
    if kind == RequestKind::Multipart && spec.multipart.file_field.is_empty() {
        return Err(BuildError::MissingFileField);
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let url = parse_upload_url(&apply_url_template(&spec.url, &file_name))?;

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(PRODUCT_USER_AGENT));
    for (name, template) in &spec.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| BuildError::InvalidHeader(name.clone()))?;
        let value = HeaderValue::from_bytes(substitute_env(template).as_bytes())
            .map_err(|_| BuildError::InvalidHeader(name.to_string()))?;
        headers.insert(name, value);
    }

    let file = File::open(path).await.map_err(|source| BuildError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let length = metadata.len();

    let body = match kind {
        RequestKind::Raw => {
            if !spec.content_type.is_empty() {
                let value = HeaderValue::from_bytes(spec.content_type.as_bytes())
                    .map_err(|_| BuildError::InvalidHeader(CONTENT_TYPE.to_string()))?;
                headers.insert(CONTENT_TYPE, value);
            }
            RequestBody::Raw { file, length }
        }
        RequestKind::Multipart => RequestBody::Multipart(MultipartBody {
            fields: spec.multipart.fields.clone(),
            file_field: spec.multipart.file_field.clone(),
            file_name,
            file,
            length,
        }),
    };

    debug!(%url, ?method, %kind, size = length, "Built upload request");

    Ok(UploadRequest {
        method,
        url,
        headers,
        timeout: UPLOAD_TIMEOUT,
        body,
    })
}

/// Parse the expanded template; an address without a scheme is taken as `http://`
fn parse_upload_url(raw: &str) -> Result<Url, BuildError> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    Url::parse(&candidate).map_err(|source| BuildError::InvalidUrl {
        url: candidate.clone(),
        source,
    })
}
