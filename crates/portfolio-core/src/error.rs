use thiserror::Error;

use crate::upload::BindingKind;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Reasons a selected file is refused before any preview work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("declared content type {mime:?} is not an image")]
    InvalidFileType { mime: String },

    #[error("{kind} file of {size} bytes exceeds the {limit}-byte limit")]
    FileTooLarge {
        kind: BindingKind,
        size: u64,
        limit: u64,
    },
}

impl UploadError {
    /// Text shown to the user in the blocking notification.
    #[must_use]
    pub fn alert_message(&self) -> String {
        match self {
            Self::InvalidFileType { .. } => "Please select a valid image file.".to_string(),
            Self::FileTooLarge { kind, limit, .. } => {
                let prefix = match kind {
                    BindingKind::Profile => "File",
                    BindingKind::Logo { .. } => "Logo file",
                };
                format!("{prefix} size must be less than {}.", human_size(*limit))
            }
        }
    }
}

/// Host-supplied configuration that cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

/// `5242880` → `5MB`, `1536` → `1.5KB`.
fn human_size(bytes: u64) -> String {
    const UNITS: [(&str, u64); 3] = [("GB", 1 << 30), ("MB", 1 << 20), ("KB", 1 << 10)];
    for (unit, scale) in UNITS {
        if bytes >= scale {
            let whole = bytes / scale;
            let tenths = (bytes % scale) * 10 / scale;
            return if tenths == 0 {
                format!("{whole}{unit}")
            } else {
                format!("{whole}.{tenths}{unit}")
            };
        }
    }
    format!("{bytes}B")
}
