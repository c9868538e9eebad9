//! The object store seam the upload gateway talks to.

use std::future::Future;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use super::error::StorageError;

/// Options attached to a create-object request.
#[derive(Debug, Clone)]
pub struct PutOptions {
    /// MIME type recorded with the object.
    pub content_type: String,
    /// `Cache-Control` value recorded with the object.
    pub cache_control: String,
}

/// An object found by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    /// Full storage key, e.g. `covers/1717171717000-k3j9xz.jpg`.
    pub key: String,
    /// Last modification time, when the backend reports it in listings.
    pub last_modified: Option<DateTime<Utc>>,
}

/// Object storage backend.
///
/// Implemented by [`StorageService`](super::StorageService) on top of OpenDAL.
/// Every call is a single independent request.
pub trait ObjectStore: Send + Sync {
    /// Create an object. Fails if the key is already taken.
    fn put_new(
        &self,
        key: &str,
        body: Bytes,
        options: &PutOptions,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Delete an object.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// List up to `limit` objects directly under `prefix`, newest first.
    fn list(
        &self,
        prefix: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<ObjectEntry>, StorageError>> + Send;

    /// Resolve the public address of a key.
    fn public_url(&self, key: &str) -> String;

    /// Path segment that precedes the key in every public address.
    fn public_path_marker(&self) -> String;
}
