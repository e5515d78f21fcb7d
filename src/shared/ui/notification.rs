use serde::Serialize;

use crate::shared::constants::NOTIFICATION_DURATION_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    BottomStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    Success,
    Contrast,
    Error,
}

/// Transient toast; the client removes it after `duration_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub text: String,
    pub duration_ms: u64,
    pub position: Position,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn show(text: impl Into<String>, variant: NotificationVariant) -> Self {
        Self {
            text: text.into(),
            duration_ms: NOTIFICATION_DURATION_MS,
            position: Position::BottomStart,
            variant,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::show(text, NotificationVariant::Success)
    }

    pub fn contrast(text: impl Into<String>) -> Self {
        Self::show(text, NotificationVariant::Contrast)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::show(text, NotificationVariant::Error)
    }
}
