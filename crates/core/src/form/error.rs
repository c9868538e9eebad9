//! Upload form error types.

use thiserror::Error;

use super::types::InputMode;
use crate::media::GatewayError;

/// Errors returned by form actions.
#[derive(Debug, Error)]
pub enum FormError {
    /// Another upload from this form is still pending.
    #[error("an upload is already in progress")]
    UploadInProgress,

    /// The action belongs to the other input mode.
    #[error("action requires {expected} mode, form is in {actual} mode")]
    WrongMode {
        /// Mode the action needs.
        expected: InputMode,
        /// Mode the form is in.
        actual: InputMode,
    },

    /// A blank address was submitted.
    #[error("image address is empty")]
    EmptyUrl,

    /// The gateway rejected the upload.
    #[error("{0}")]
    Upload(#[from] GatewayError),
}
