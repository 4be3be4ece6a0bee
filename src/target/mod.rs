//! Declarative upload targets
//!
//! A target is described entirely by a [`TargetConfig`] document: how to build
//! the HTTP request for a file and how to find the uploaded URL in the reply.
//! No target-specific code exists.
//!
//! ## Example
//!
//! ```rust,ignore
//! use shareup::target::{TargetConfig, TargetUploader};
//!
//! let config = TargetConfig::from_json(br#"{
//!     "id": "example",
//!     "request": {"url": "https://up.example/${FILENAME}", "method": "PUT", "type": "raw"},
//!     "response": {"type": "json_pointer", "pointer": "/data/link"}
//! }"#)?;
//! let uploader = TargetUploader::new(config);
//! let request = uploader.upload(path).await?;
//! ```

mod lenient;
mod models;
pub mod pointer;
mod request;
mod response;
pub mod template;
mod uploader;

pub use models::{MultipartSpec, RequestSpec, ResponseSpec, TargetConfig};
pub use request::{
    BuildError, MultipartBody, PRODUCT_USER_AGENT, RequestBody, RequestKind, UPLOAD_TIMEOUT,
    UploadMethod, UploadRequest, build,
};
pub use response::{ResponseError, ResponseStrategy, UploadResult};
pub use uploader::TargetUploader;
