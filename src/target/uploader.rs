use std::path::Path;

use super::models::TargetConfig;
use super::request::{self, BuildError, UploadRequest};
use super::response::{ResponseStrategy, UploadResult};

/// One configured upload target
///
/// Holds the immutable config and the response strategy compiled from it.
#[derive(Debug, Clone)]
pub struct TargetUploader {
    config: TargetConfig,
    strategy: ResponseStrategy,
}

impl TargetUploader {
    pub fn new(config: TargetConfig) -> Self {
        let strategy = ResponseStrategy::compile(&config.response);
        Self { config, strategy }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Display name, falling back to the id when blank
    pub fn display_name(&self) -> &str {
        self.config.display_name()
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    pub fn strategy(&self) -> &ResponseStrategy {
        &self.strategy
    }

    /// Build the upload request for one file
    pub async fn upload(&self, path: &Path) -> Result<UploadRequest, BuildError> {
        request::build(&self.config.request, path).await
    }

    /// Extract the uploaded URL from a reply body
    pub fn parse_reply(&self, reply: Option<&[u8]>) -> UploadResult {
        self.strategy.parse(reply)
    }
}
