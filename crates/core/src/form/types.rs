//! Upload form domain types.
//!
//! The form is in one of two input modes and one of three statuses:
//! - Idle → Uploading (file selected)
//! - Uploading → Idle (upload stored)
//! - Uploading → Error (upload rejected)
//! - Error → Idle (mode switched, address submitted, or image cleared)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Graphic shown when the preview image cannot be loaded.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

/// Which input affordance is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Paste an externally hosted address.
    #[default]
    Url,
    /// Pick a local file and upload it.
    File,
}

impl InputMode {
    /// Returns the string representation of the mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::File => "file",
        }
    }
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Upload status of the form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "lowercase")]
pub enum FormStatus {
    /// Nothing in flight.
    #[default]
    Idle,
    /// An upload request is pending.
    Uploading,
    /// The last upload failed with this message.
    Error(String),
}

impl FormStatus {
    /// Returns true while an upload is pending.
    #[must_use]
    pub fn is_uploading(&self) -> bool {
        matches!(self, Self::Uploading)
    }

    /// The error message to display, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            Self::Idle | Self::Uploading => None,
        }
    }
}

/// What the preview area renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    /// Image source to render.
    pub src: String,
    /// Whether `src` is the placeholder standing in for a broken image.
    pub is_placeholder: bool,
}

/// Point-in-time view of the form for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    /// Active input mode.
    pub mode: InputMode,
    /// Upload status.
    pub status: FormStatus,
    /// Current image reference; empty when no image is set.
    pub value: String,
    /// Preview to render, absent when no image is set.
    pub preview: Option<Preview>,
    /// Whether the file picker should be enabled.
    pub file_picker_enabled: bool,
}
