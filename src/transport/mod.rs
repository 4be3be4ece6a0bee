//! HTTP transport abstraction
//!
//! The job layer only needs "send this request, give me the reply body".
//! [`ReqwestTransport`] does it over the network; tests plug in scripted
//! implementations.

mod http;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::target::UploadRequest;

pub use http::{HttpConfig, ReqwestTransport};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Upload timed out")]
    Timeout,

    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("Failed to read response body: {0}")]
    Body(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

/// Sends one upload request and returns the reply body
///
/// The request is consumed; its file handle is released once the exchange
/// completes or the returned future is dropped.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: UploadRequest) -> Result<Bytes>;
}
