//! Share job: uploads a batch of local files to one target, one at a time
//!
//! ## Flow
//! 1. Resolve the payload into local files ([`collect_file_paths`])
//! 2. Drive the [`BatchState`] machine: build request, send, extract URL
//! 3. On success: publish output, copy URLs to the clipboard, notify
//! 4. On the first failure: notify and report [`JobFailure`] (code 1)
//!
//! Only one request is in flight per job. Dropping the future returned by
//! [`ShareJob::run`] cancels the job: the in-flight request and its file
//! handle are released and no notification fires.

mod error;
mod inputs;
mod state;

use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::desktop::{ClipboardWriter, Notification, NotificationKind, Notifier};
use crate::observability::UploadMetrics;
use crate::target::{TargetConfig, TargetUploader};
use crate::transport::Transport;

pub use error::{JOB_ERROR_CODE, JobFailure, ShareError};
pub use inputs::{collect_file_paths, resolve_local_file};
pub use state::{BatchPhase, BatchState, Effect, JobOutput};

const SUCCESS_ICON: &str = "image-x-generic";
const FAILURE_ICON: &str = "dialog-error";

/// Collaborators a job talks to
#[derive(Clone)]
pub struct JobServices {
    pub transport: Arc<dyn Transport>,
    pub clipboard: Arc<dyn ClipboardWriter>,
    pub notifier: Arc<dyn Notifier>,
    pub metrics: Arc<UploadMetrics>,
}

pub struct ShareJob {
    id: Uuid,
    uploader: TargetUploader,
    data: Value,
    services: JobServices,
}

impl ShareJob {
    /// `data` is the host payload carrying `urls` or `url`
    pub fn new(config: TargetConfig, data: Value, services: JobServices) -> Self {
        Self {
            id: Uuid::now_v7(),
            uploader: TargetUploader::new(config),
            data,
            services,
        }
    }

    /// Like [`ShareJob::new`], parsing the target document first
    ///
    /// An unreadable document counts as an empty configuration, which fails
    /// the job once it runs.
    pub fn from_config_json(config_json: &[u8], data: Value, services: JobServices) -> Self {
        let config = TargetConfig::from_json(config_json).unwrap_or_else(|e| {
            warn!(error = %e, "Target configuration is not valid JSON");
            TargetConfig::default()
        });
        Self::new(config, data, services)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn uploader(&self) -> &TargetUploader {
        &self.uploader
    }

    /// Run the job to completion
    pub async fn run(self) -> Result<JobOutput, JobFailure> {
        let span = info_span!("share_job", job_id = %self.id, target_id = %self.uploader.id());
        self.drive().instrument(span).await
    }

    async fn drive(&self) -> Result<JobOutput, JobFailure> {
        let files = collect_file_paths(&self.data);
        info!(files = files.len(), "Starting share job");

        let mut state = BatchState::new(files);
        let mut effect = state.start(!self.uploader.config().is_empty());

        loop {
            effect = match effect {
                Effect::Upload(path) => {
                    let outcome = self.upload_file(&path).await;
                    state.complete(outcome)
                }
                Effect::Finish(output) => return Ok(self.finish_success(output).await),
                Effect::Fail(error) => return Err(self.finish_error(error).await),
            };
        }
    }

    async fn upload_file(&self, path: &Path) -> Result<String, ShareError> {
        let request = self
            .uploader
            .upload(path)
            .await
            .map_err(|e| ShareError::RequestBuild {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        debug!(path = %path.display(), url = %request.url, "Uploading file");
        self.services.metrics.request_sent();

        let reply = self.services.transport.send(request).await?;
        let url = self.uploader.parse_reply(Some(&reply[..]))?;

        self.services.metrics.file_uploaded();
        info!(path = %path.display(), %url, "File uploaded");
        Ok(url)
    }

    async fn finish_success(&self, output: JobOutput) -> JobOutput {
        let count = output.urls.len();

        if !output.urls.is_empty() {
            let text = output.urls.join("\n");
            if let Err(e) = self.services.clipboard.set_text(&text).await {
                warn!(error = %e, "Failed to copy URLs to clipboard");
            }
        }

        self.notify(Notification {
            kind: NotificationKind::Success,
            title: format!("{} Upload", self.uploader.display_name()),
            text: success_text(count),
            icon: SUCCESS_ICON.to_string(),
        })
        .await;

        self.services.metrics.job_completed();
        info!(uploaded = count, "Share job completed");
        output
    }

    async fn finish_error(&self, error: ShareError) -> JobFailure {
        warn!(kind = error.kind(), error = %error, "Share job failed");
        let failure = JobFailure::from(&error);

        self.notify(Notification {
            kind: NotificationKind::Error,
            title: format!("{} Upload Failed", self.uploader.display_name()),
            text: failure.message.clone(),
            icon: FAILURE_ICON.to_string(),
        })
        .await;

        self.services.metrics.job_failed();
        failure
    }

    async fn notify(&self, notification: Notification) {
        if let Err(e) = self.services.notifier.notify(notification).await {
            warn!(error = %e, "Failed to show notification");
        }
    }
}

/// Body of the success notification
pub fn success_text(count: usize) -> String {
    if count == 1 {
        "Uploaded 1 image. URL copied to clipboard.".to_string()
    } else {
        format!("Uploaded {count} images. URLs copied to clipboard.")
    }
}
