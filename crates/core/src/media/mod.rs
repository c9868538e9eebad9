//! Upload gateway for blog images.
//!
//! This module provides:
//! - Upload validation (image media type, size ceiling)
//! - Storage key derivation
//! - Store, delete-by-address and listing against the object store

mod error;
mod gateway;
mod key;
mod types;

#[cfg(test)]
mod gateway_props;
#[cfg(test)]
pub(crate) mod testing;

pub use error::GatewayError;
pub use gateway::ImageGateway;
pub use key::SUFFIX_LEN;
pub use types::{
    Folder, ImageFile, MEBIBYTE, StorageKey, StoredImage, UploadPolicy, UploadResult,
};
