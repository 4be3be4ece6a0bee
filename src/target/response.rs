//! Extraction of the uploaded URL from a server reply

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use super::models::ResponseSpec;
use super::pointer;

/// Outcome of parsing one reply: the uploaded URL or why there is none
pub type UploadResult = Result<String, ResponseError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResponseError {
    #[error("No reply received from server.")]
    NoReply,

    #[error("Upload failed with an empty response.")]
    Empty,

    /// The server answered with text that is not a URL; shown to the user as-is
    #[error("{0}")]
    Unexpected(String),

    #[error("Upload response was not valid JSON.")]
    InvalidJson,

    #[error("Upload response did not contain a URL.")]
    MissingUrl,

    #[error("Unsupported response parser.")]
    Unsupported,
}

/// Compiled form of a [`ResponseSpec`]
#[derive(Debug, Clone)]
pub enum ResponseStrategy {
    TextUrl,
    /// `group` is `None` for a negative group, which never yields a URL
    Regex { regex: Regex, group: Option<usize> },
    JsonPointer { pointer: String },
    Unsupported,
}

impl ResponseStrategy {
    /// Compile once; bad patterns and empty pointers become [`ResponseStrategy::Unsupported`]
    pub fn compile(spec: &ResponseSpec) -> Self {
        match spec.kind.as_str() {
            "text_url" => Self::TextUrl,
            "regex" => match Regex::new(&spec.pattern) {
                Ok(regex) => Self::Regex {
                    regex,
                    group: usize::try_from(spec.group).ok(),
                },
                Err(e) => {
                    tracing::warn!(pattern = %spec.pattern, error = %e, "Invalid response pattern");
                    Self::Unsupported
                }
            },
            "json_pointer" if !spec.pointer.is_empty() => Self::JsonPointer {
                pointer: spec.pointer.clone(),
            },
            _ => Self::Unsupported,
        }
    }

    /// Extract the URL from a reply body; `None` means no reply arrived
    pub fn parse(&self, reply: Option<&[u8]>) -> UploadResult {
        let body = reply.ok_or(ResponseError::NoReply)?.trim_ascii();
        let text = String::from_utf8_lossy(body);

        match self {
            Self::TextUrl => {
                if text.starts_with("http://") || text.starts_with("https://") {
                    Ok(text.into_owned())
                } else {
                    Err(unexpected(&text))
                }
            }
            Self::Regex { regex, group } => match regex.captures(&text) {
                Some(captures) => group
                    .and_then(|group| captures.get(group))
                    .map(|m| m.as_str().to_string())
                    .ok_or(ResponseError::MissingUrl),
                None => Err(unexpected(&text)),
            },
            Self::JsonPointer { pointer } => {
                let document: Value =
                    serde_json::from_slice(body).map_err(|_| ResponseError::InvalidJson)?;
                if !(document.is_object() || document.is_array()) {
                    return Err(ResponseError::InvalidJson);
                }
                pointer::resolve(&document, pointer)
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or(ResponseError::MissingUrl)
            }
            Self::Unsupported => Err(ResponseError::Unsupported),
        }
    }
}

fn unexpected(text: &str) -> ResponseError {
    if text.is_empty() {
        ResponseError::Empty
    } else {
        ResponseError::Unexpected(text.to_string())
    }
}
