//! Upload gateway error types.

use quill_shared::AppError;
use thiserror::Error;

use super::types::MEBIBYTE;
use crate::storage::StorageError;

/// Upload gateway errors.
///
/// Display strings are the messages shown to editors.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Declared media type is not an image.
    #[error("El archivo debe ser una imagen")]
    NotAnImage {
        /// The declared MIME type.
        content_type: String,
    },

    /// File exceeds the size ceiling.
    #[error("La imagen no debe superar {}MB", megabytes(.max))]
    FileTooLarge {
        /// Actual file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Address does not point into the image bucket.
    #[error("Formato de URL inválido")]
    InvalidAddress {
        /// The rejected address.
        address: String,
    },

    /// The storage backend rejected a store or delete request.
    #[error("{0}")]
    Storage(#[from] StorageError),

    /// The storage backend could not list a folder.
    #[error("Listado de imágenes no disponible: {0}")]
    ListingUnavailable(#[source] StorageError),
}

impl GatewayError {
    /// Create an invalid address error.
    #[must_use]
    pub fn invalid_address(address: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.into(),
        }
    }

    /// Whether the failure happened before any backend request.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::NotAnImage { .. } | Self::FileTooLarge { .. } | Self::InvalidAddress { .. }
        )
    }
}

/// Size limit in MiB, rounded up to one decimal and without a trailing `.0`.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn megabytes(bytes: &u64) -> String {
    let tenths = bytes.saturating_mul(10).div_ceil(MEBIBYTE);
    match tenths % 10 {
        0 => (tenths / 10).to_string(),
        fraction => format!("{}.{fraction}", tenths / 10),
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        let message = err.to_string();
        match err {
            GatewayError::NotAnImage { .. }
            | GatewayError::FileTooLarge { .. }
            | GatewayError::InvalidAddress { .. } => Self::Validation(message),
            GatewayError::Storage(StorageError::AlreadyExists { .. }) => Self::Conflict(message),
            GatewayError::Storage(StorageError::NotFound { .. }) => Self::NotFound(message),
            GatewayError::Storage(_) => Self::ExternalService(message),
            GatewayError::ListingUnavailable(_) => Self::Unavailable(message),
        }
    }
}
