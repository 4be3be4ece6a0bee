//! Desktop side effects: clipboard and notifications
//!
//! Jobs only see the [`ClipboardWriter`] and [`Notifier`] traits. The command
//! implementations shell out to desktop tools (`wl-copy`, `notify-send`); the
//! memory implementations record calls for tests.

mod command;
mod memory;

use async_trait::async_trait;
use thiserror::Error;

pub use command::{CommandClipboard, CommandNotifier, LogNotifier, NoopClipboard};
pub use memory::{MemoryClipboard, RecordingNotifier};

#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}")]
    Exit { program: String, status: String },

    #[error("no command configured")]
    EmptyCommand,
}

pub type Result<T> = std::result::Result<T, DesktopError>;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub text: String,
    /// Freedesktop icon name
    pub icon: String,
}

/// Writes text to the shared clipboard (last writer wins)
#[async_trait]
pub trait ClipboardWriter: Send + Sync {
    async fn set_text(&self, text: &str) -> Result<()>;
}

/// Raises user-visible notifications
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<()>;
}
