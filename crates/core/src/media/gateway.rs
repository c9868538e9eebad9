//! Upload gateway implementation.

use tracing::{error, info, warn};

use super::error::GatewayError;
use super::types::{Folder, ImageFile, StorageKey, StoredImage, UploadPolicy};
use crate::storage::{ObjectStore, PutOptions};

/// Stateless wrapper around the object store for blog images.
///
/// Each operation issues at most one backend request and keeps nothing
/// between calls, so one gateway is built at startup and shared by handle.
pub struct ImageGateway<S: ObjectStore> {
    backend: S,
    policy: UploadPolicy,
}

impl<S: ObjectStore> ImageGateway<S> {
    /// Create a new gateway.
    #[must_use]
    pub fn new(backend: S, policy: UploadPolicy) -> Self {
        Self { backend, policy }
    }

    /// The underlying object store.
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// The limits applied to uploads.
    #[must_use]
    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Check a file against the upload policy.
    ///
    /// The media type is checked before the size.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not an image or is too large.
    pub fn validate(&self, file: &ImageFile) -> Result<(), GatewayError> {
        if !is_image_type(&file.content_type) {
            return Err(GatewayError::NotAnImage {
                content_type: file.content_type.clone(),
            });
        }

        if file.size() > self.policy.max_file_size {
            return Err(GatewayError::FileTooLarge {
                size: file.size(),
                max: self.policy.max_file_size,
            });
        }

        Ok(())
    }

    /// Store an image and resolve its public address.
    ///
    /// Validation failures return before any backend request. The object is
    /// created with if-not-exists semantics and is never retried.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the backend rejects the write.
    pub async fn store(&self, file: ImageFile, folder: Folder) -> Result<StoredImage, GatewayError> {
        if let Err(e) = self.validate(&file) {
            warn!(
                file_name = %file.name,
                content_type = %file.content_type,
                size = file.size(),
                reason = %e,
                "Image rejected"
            );
            return Err(e);
        }

        let key = StorageKey::generate(folder, &file);
        let options = PutOptions {
            content_type: file.content_type.clone(),
            cache_control: self.policy.cache_control.clone(),
        };
        let size = file.size();

        if let Err(e) = self.backend.put_new(key.as_str(), file.data, &options).await {
            error!(key = %key, error = %e, "Failed to store image");
            return Err(GatewayError::from(e));
        }

        let url = self.backend.public_url(key.as_str());
        info!(key = %key, size, "Image stored");

        Ok(StoredImage { key, url })
    }

    /// Recover the storage key behind a public address.
    #[must_use]
    pub fn key_for_address(&self, address: &str) -> Option<StorageKey> {
        StorageKey::from_public_url(address, &self.backend.public_path_marker())
    }

    /// Delete the image behind a public address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not one of ours (no backend request
    /// is made) or if the backend rejects the delete.
    pub async fn try_remove(&self, address: &str) -> Result<StorageKey, GatewayError> {
        let Some(key) = self.key_for_address(address) else {
            warn!(address, "Invalid image address");
            return Err(GatewayError::invalid_address(address));
        };

        if let Err(e) = self.backend.delete(key.as_str()).await {
            error!(key = %key, error = %e, "Failed to delete image");
            return Err(GatewayError::from(e));
        }

        info!(key = %key, "Image deleted");
        Ok(key)
    }

    /// Delete the image behind a public address, reporting only whether it worked.
    pub async fn remove(&self, address: &str) -> bool {
        self.try_remove(address).await.is_ok()
    }

    /// List the newest images in a folder with their public addresses.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ListingUnavailable`] if the backend listing fails.
    pub async fn list(&self, folder: Folder) -> Result<Vec<StoredImage>, GatewayError> {
        let prefix = format!("{}/", folder.as_str());

        let entries = self
            .backend
            .list(&prefix, self.policy.list_limit)
            .await
            .map_err(|e| {
                error!(folder = %folder, error = %e, "Failed to list images");
                GatewayError::ListingUnavailable(e)
            })?;

        Ok(entries
            .into_iter()
            .map(|entry| {
                let url = self.backend.public_url(&entry.key);
                StoredImage {
                    key: StorageKey::from_raw(entry.key),
                    url,
                }
            })
            .collect())
    }
}

/// Whether a declared media type names an image.
fn is_image_type(content_type: &str) -> bool {
    content_type
        .trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}
