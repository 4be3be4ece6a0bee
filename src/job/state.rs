//! Batch upload state machine
//!
//! ```text
//! Idle --start--> Uploading --complete(ok), more files--> Uploading
//!   |                 |--complete(ok), last file--> Done
//!   |                 `--complete(err)-------------> Failed
//!   `--no files / no target--> Failed
//! ```
//!
//! Transitions are synchronous and do no I/O; they return the [`Effect`] the
//! driver has to perform next.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::error::ShareError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchPhase {
    Idle,
    Uploading,
    Done,
    Failed,
}

/// Aggregate result handed back to the host on success
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutput {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl JobOutput {
    pub fn new(urls: Vec<String>) -> Self {
        let url = urls.first().cloned();
        Self { urls, url }
    }
}

/// What the driver must do after a transition
#[derive(Debug)]
pub enum Effect {
    /// Upload this file, then call [`BatchState::complete`]
    Upload(PathBuf),
    Finish(JobOutput),
    Fail(ShareError),
}

#[derive(Debug)]
pub struct BatchState {
    files: Vec<PathBuf>,
    next_index: usize,
    uploaded_urls: Vec<String>,
    phase: BatchPhase,
}

impl BatchState {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            files,
            next_index: 0,
            uploaded_urls: Vec::new(),
            phase: BatchPhase::Idle,
        }
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn uploaded_urls(&self) -> &[String] {
        &self.uploaded_urls
    }

    /// File currently being uploaded
    pub fn current_file(&self) -> Option<&Path> {
        match self.phase {
            BatchPhase::Uploading => self.files.get(self.next_index).map(PathBuf::as_path),
            _ => None,
        }
    }

    /// Leave `Idle`: check the inputs and schedule the first upload
    ///
    /// Out of phase calls report an error and leave the batch untouched.
    pub fn start(&mut self, target_present: bool) -> Effect {
        if self.phase != BatchPhase::Idle {
            return Effect::Fail(ShareError::Input("Upload batch already started.".to_string()));
        }
        if self.files.is_empty() {
            return self.fail(ShareError::no_files());
        }
        if !target_present {
            return self.fail(ShareError::missing_target());
        }

        self.phase = BatchPhase::Uploading;
        Effect::Upload(self.files[self.next_index].clone())
    }

    /// Feed back the outcome of the current file's upload
    pub fn complete(&mut self, outcome: Result<String, ShareError>) -> Effect {
        if self.phase != BatchPhase::Uploading {
            return Effect::Fail(ShareError::Input("Upload batch is not in progress.".to_string()));
        }

        let url = match outcome {
            Ok(url) => url,
            Err(error) => return self.fail(error),
        };

        self.uploaded_urls.push(url);
        self.next_index += 1;

        match self.files.get(self.next_index) {
            Some(next) => Effect::Upload(next.clone()),
            None => {
                self.phase = BatchPhase::Done;
                Effect::Finish(JobOutput::new(self.uploaded_urls.clone()))
            }
        }
    }

    fn fail(&mut self, error: ShareError) -> Effect {
        self.phase = BatchPhase::Failed;
        Effect::Fail(error)
    }
}
