use super::models::Settings;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Clipboard is enabled but clipboard.command is empty")]
    EmptyClipboardCommand,

    #[error("Notifications are enabled but notifications.command is empty")]
    EmptyNotifyCommand,

    #[error("targets.path must not be empty")]
    EmptyTargetsPath,
}

/// Validate the loaded settings
pub fn validate(settings: &Settings) -> Result<(), ValidationError> {
    if settings.targets.path.as_os_str().is_empty() {
        return Err(ValidationError::EmptyTargetsPath);
    }

    if settings.clipboard.enabled
        && settings
            .clipboard
            .command
            .first()
            .is_none_or(|program| program.is_empty())
    {
        return Err(ValidationError::EmptyClipboardCommand);
    }

    if settings.notifications.enabled && settings.notifications.command.is_empty() {
        return Err(ValidationError::EmptyNotifyCommand);
    }

    Ok(())
}
