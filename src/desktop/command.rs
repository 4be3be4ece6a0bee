use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{ClipboardWriter, DesktopError, Notification, NotificationKind, Notifier, Result};

/// Clipboard backed by a command reading the text on stdin (e.g. `wl-copy`)
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// `command[0]` is the program, the rest its arguments
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command.split_first().ok_or(DesktopError::EmptyCommand)?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait]
impl ClipboardWriter for CommandClipboard {
    async fn set_text(&self, text: &str) -> Result<()> {
        let spawn_error = |source| DesktopError::Spawn {
            program: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await.map_err(spawn_error)?;
            // closing stdin lets the tool take ownership of the selection
            drop(stdin);
        }

        let status = child.wait().await.map_err(spawn_error)?;
        if !status.success() {
            return Err(DesktopError::Exit {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }

        debug!(program = %self.program, bytes = text.len(), "Clipboard updated");
        Ok(())
    }
}

/// Clipboard that drops everything, for headless hosts
#[derive(Debug, Clone, Default)]
pub struct NoopClipboard;

#[async_trait]
impl ClipboardWriter for NoopClipboard {
    async fn set_text(&self, text: &str) -> Result<()> {
        debug!(bytes = text.len(), "Clipboard disabled, skipping");
        Ok(())
    }
}

/// Notifier invoking `notify-send`-compatible programs
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    program: String,
}

impl CommandNotifier {
    pub fn new(program: impl Into<String>) -> Result<Self> {
        let program = program.into();
        if program.is_empty() {
            return Err(DesktopError::EmptyCommand);
        }
        Ok(Self { program })
    }
}

#[async_trait]
impl Notifier for CommandNotifier {
    async fn notify(&self, notification: Notification) -> Result<()> {
        let urgency = match notification.kind {
            NotificationKind::Success => "normal",
            NotificationKind::Error => "critical",
        };

        let status = Command::new(&self.program)
            .arg("--app-name=shareup")
            .arg(format!("--icon={}", notification.icon))
            .arg(format!("--urgency={urgency}"))
            .arg("--")
            .arg(&notification.title)
            .arg(&notification.text)
            .status()
            .await
            .map_err(|source| DesktopError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DesktopError::Exit {
                program: self.program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Notifier writing to the log only
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: Notification) -> Result<()> {
        match notification.kind {
            NotificationKind::Success => {
                info!(title = %notification.title, "{}", notification.text)
            }
            NotificationKind::Error => {
                warn!(title = %notification.title, "{}", notification.text)
            }
        }
        Ok(())
    }
}
