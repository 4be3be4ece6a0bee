use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub targets: TargetsConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the target catalog lives
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TargetsConfig {
    #[serde(default = "default_targets_path")]
    pub path: PathBuf,
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            path: default_targets_path(),
        }
    }
}

fn default_targets_path() -> PathBuf {
    PathBuf::from("config/targets.json")
}

/// Clipboard integration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClipboardConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Program plus arguments; the text is written to its stdin
    #[serde(default = "default_clipboard_command")]
    pub command: Vec<String>,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_clipboard_command(),
        }
    }
}

fn default_clipboard_command() -> Vec<String> {
    vec!["wl-copy".to_string()]
}

/// Desktop notifications
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// `notify-send` compatible program
    #[serde(default = "default_notify_command")]
    pub command: String,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: default_notify_command(),
        }
    }
}

fn default_notify_command() -> String {
    "notify-send".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
