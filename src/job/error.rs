use serde::Serialize;
use thiserror::Error;

use crate::target::ResponseError;
use crate::transport::TransportError;

/// Error code reported to the host for every failed job
pub const JOB_ERROR_CODE: i32 = 1;

/// Everything that can end a share job; all kinds are terminal
#[derive(Debug, Error)]
pub enum ShareError {
    /// No usable files, or no target configuration
    #[error("{0}")]
    Input(String),

    #[error("Failed to start upload for {path}: {reason}")]
    RequestBuild { path: String, reason: String },

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("{0}")]
    ResponseParse(#[from] ResponseError),
}

impl ShareError {
    pub fn no_files() -> Self {
        Self::Input("No local files found to upload.".to_string())
    }

    pub fn missing_target() -> Self {
        Self::Input("Missing upload target configuration.".to_string())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "input",
            Self::RequestBuild { .. } => "request_build",
            Self::Transport(_) => "transport",
            Self::ResponseParse(_) => "response_parse",
        }
    }
}

/// Failure as surfaced to the host: fixed code plus readable text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct JobFailure {
    pub code: i32,
    pub message: String,
}

impl From<&ShareError> for JobFailure {
    fn from(error: &ShareError) -> Self {
        Self {
            code: JOB_ERROR_CODE,
            message: error.to_string(),
        }
    }
}
