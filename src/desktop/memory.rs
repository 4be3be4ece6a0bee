use async_trait::async_trait;
use std::sync::Mutex;

use super::{ClipboardWriter, Notification, Notifier, Result};

/// In-memory clipboard for tests
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
    writes: Mutex<usize>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text written, if any
    pub fn text(&self) -> Option<String> {
        self.text.lock().map(|guard| guard.clone()).unwrap_or_default()
    }

    pub fn writes(&self) -> usize {
        self.writes.lock().map(|guard| *guard).unwrap_or_default()
    }
}

#[async_trait]
impl ClipboardWriter for MemoryClipboard {
    async fn set_text(&self, text: &str) -> Result<()> {
        if let Ok(mut guard) = self.text.lock() {
            *guard = Some(text.to_string());
        }
        if let Ok(mut guard) = self.writes.lock() {
            *guard += 1;
        }
        Ok(())
    }
}

/// Notifier recording every notification for tests
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.sent.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> Result<()> {
        if let Ok(mut guard) = self.sent.lock() {
            guard.push(notification);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::NotificationKind;

    #[tokio::test]
    async fn test_memory_clipboard_keeps_last_write() {
        let clipboard = MemoryClipboard::new();
        assert_eq!(clipboard.text(), None);

        clipboard.set_text("one").await.unwrap();
        clipboard.set_text("two").await.unwrap();

        assert_eq!(clipboard.text().as_deref(), Some("two"));
        assert_eq!(clipboard.writes(), 2);
    }

    #[tokio::test]
    async fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier
            .notify(Notification {
                kind: NotificationKind::Error,
                title: "T".to_string(),
                text: "body".to_string(),
                icon: "dialog-error".to_string(),
            })
            .await
            .unwrap();

        let sent = notifier.notifications();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "T");
    }
}
