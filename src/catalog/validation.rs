use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;

use super::TargetEntry;
use crate::target::{RequestKind, TargetConfig, UploadMethod};

static TARGET_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").expect("id pattern is valid"));

const RESPONSE_TYPES: &[&str] = &["text_url", "regex", "json_pointer"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Catalog has no targets")]
    NoTargets,

    #[error("Invalid target id '{0}'")]
    InvalidId(String),

    #[error("Duplicate target id '{0}'")]
    DuplicateId(String),

    #[error("Target '{target}': {field} must be a non-empty string")]
    MissingField { target: String, field: &'static str },

    #[error("Target '{target}': request.type must be multipart or raw, got '{kind}'")]
    InvalidRequestType { target: String, kind: String },

    #[error("Target '{target}': request.method must be {expected} for {kind}, got '{method}'")]
    InvalidMethod {
        target: String,
        kind: RequestKind,
        method: String,
        expected: &'static str,
    },

    #[error("Target '{target}': request.contentType '{content_type}' is not a valid MIME type")]
    InvalidContentType { target: String, content_type: String },

    #[error("Target '{target}': response.type must be text_url, regex, or json_pointer, got '{kind}'")]
    InvalidResponseType { target: String, kind: String },

    #[error("Target '{target}': response.pattern does not compile: {reason}")]
    InvalidPattern { target: String, reason: String },

    #[error("Target '{target}': response.group must not be negative, got {group}")]
    InvalidGroup { target: String, group: i64 },
}

/// Validate a whole catalog: non-empty, unique ids, every target well formed
pub fn validate(targets: &[TargetEntry]) -> Result<(), ValidationError> {
    if targets.is_empty() {
        return Err(ValidationError::NoTargets);
    }

    let mut seen = HashSet::new();
    for entry in targets {
        validate_target(&entry.config)?;
        if !seen.insert(entry.config.id.as_str()) {
            return Err(ValidationError::DuplicateId(entry.config.id.clone()));
        }
    }

    Ok(())
}

/// Validate one target document
pub fn validate_target(config: &TargetConfig) -> Result<(), ValidationError> {
    if !TARGET_ID.is_match(&config.id) {
        return Err(ValidationError::InvalidId(config.id.clone()));
    }
    validate_request(config)?;
    validate_response(config)?;
    Ok(())
}

fn validate_request(config: &TargetConfig) -> Result<(), ValidationError> {
    let target = &config.id;
    let request = &config.request;

    if request.url.is_empty() {
        return Err(missing(target, "request.url"));
    }

    let kind = RequestKind::parse(&request.kind).ok_or_else(|| {
        ValidationError::InvalidRequestType {
            target: target.clone(),
            kind: request.kind.clone(),
        }
    })?;
    let method = UploadMethod::parse(&request.method);

    match kind {
        RequestKind::Multipart => {
            if method != Some(UploadMethod::Post) {
                return Err(invalid_method(target, kind, &request.method, "POST"));
            }
            if request.multipart.file_field.is_empty() {
                return Err(missing(target, "request.multipart.fileField"));
            }
        }
        RequestKind::Raw => {
            if method.is_none() {
                return Err(invalid_method(target, kind, &request.method, "POST or PUT"));
            }
            if !request.content_type.is_empty()
                && request.content_type.parse::<mime::Mime>().is_err()
            {
                return Err(ValidationError::InvalidContentType {
                    target: target.clone(),
                    content_type: request.content_type.clone(),
                });
            }
        }
    }

    Ok(())
}

fn validate_response(config: &TargetConfig) -> Result<(), ValidationError> {
    let target = &config.id;
    let response = &config.response;

    if !RESPONSE_TYPES.contains(&response.kind.as_str()) {
        return Err(ValidationError::InvalidResponseType {
            target: target.clone(),
            kind: response.kind.clone(),
        });
    }

    match response.kind.as_str() {
        "regex" => {
            if response.pattern.is_empty() {
                return Err(missing(target, "response.pattern"));
            }
            Regex::new(&response.pattern).map_err(|e| ValidationError::InvalidPattern {
                target: target.clone(),
                reason: e.to_string(),
            })?;
            if response.group < 0 {
                return Err(ValidationError::InvalidGroup {
                    target: target.clone(),
                    group: response.group,
                });
            }
        }
        "json_pointer" if response.pointer.is_empty() => {
            return Err(missing(target, "response.pointer"));
        }
        _ => {}
    }

    Ok(())
}

fn missing(target: &str, field: &'static str) -> ValidationError {
    ValidationError::MissingField {
        target: target.to_string(),
        field,
    }
}

fn invalid_method(
    target: &str,
    kind: RequestKind,
    method: &str,
    expected: &'static str,
) -> ValidationError {
    ValidationError::InvalidMethod {
        target: target.to_string(),
        kind,
        method: method.to_string(),
        expected,
    }
}
