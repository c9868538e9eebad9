//! Storage service implementation using Apache OpenDAL.

use std::time::SystemTime;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use opendal::{ErrorKind, Operator, services};
use tracing::debug;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use super::store::{ObjectEntry, ObjectStore, PutOptions};

/// Storage service for blog images.
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(config: &StorageConfig) -> Result<Operator, StorageError> {
        match &config.provider {
            StorageProvider::S3 {
                endpoint,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(&config.bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::Memory => Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish()
                .pipe(Ok),
        }
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        self.operator.exists(key).await.unwrap_or(false)
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the bucket name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }
}

impl ObjectStore for StorageService {
    async fn put_new(
        &self,
        key: &str,
        body: Bytes,
        options: &PutOptions,
    ) -> Result<(), StorageError> {
        let capability = self.operator.info().full_capability();

        // Backends without conditional writes get a stat first; that check is not atomic.
        if !capability.write_with_if_not_exists && self.operator.exists(key).await? {
            return Err(StorageError::already_exists(key));
        }

        let mut write = self.operator.write_with(key, body);
        if capability.write_with_if_not_exists {
            write = write.if_not_exists(true);
        }
        if capability.write_with_content_type {
            write = write.content_type(&options.content_type);
        }
        if capability.write_with_cache_control {
            write = write.cache_control(&options.cache_control);
        }

        write.await.map(|_| ()).map_err(|e| {
            if e.kind() == ErrorKind::ConditionNotMatch {
                StorageError::already_exists(key)
            } else {
                StorageError::from(e)
            }
        })
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<ObjectEntry>, StorageError> {
        let entries = match self.operator.list_with(prefix).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::from(e)),
        };

        let mut objects: Vec<ObjectEntry> = entries
            .into_iter()
            .filter(|entry| !entry.metadata().is_dir())
            .filter(|entry| !is_placeholder(entry.path()))
            .map(|entry| ObjectEntry {
                key: entry.path().trim_start_matches('/').to_string(),
                last_modified: entry
                    .metadata()
                    .last_modified()
                    .map(|ts| DateTime::<Utc>::from(SystemTime::from(ts))),
            })
            .filter(|object| is_direct_child(prefix, &object.key))
            .collect();

        sort_newest_first(&mut objects);
        objects.truncate(limit);

        debug!(prefix, count = objects.len(), "Listed objects");
        Ok(objects)
    }

    fn public_url(&self, key: &str) -> String {
        self.config.public_url(key)
    }

    fn public_path_marker(&self) -> String {
        self.config.public_path_marker()
    }
}

/// Hidden entries such as Supabase's `.emptyFolderPlaceholder`.
fn is_placeholder(path: &str) -> bool {
    path.rsplit('/')
        .next()
        .is_some_and(|name| name.starts_with('.'))
}

/// Whether `key` sits directly under `prefix` rather than in a nested folder.
fn is_direct_child(prefix: &str, key: &str) -> bool {
    key.strip_prefix(prefix.trim_start_matches('/'))
        .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
}

/// Order by modification time, newest first.
///
/// Entries without a time sort after the rest. Ties and missing times fall
/// back to descending key order, which follows the millisecond timestamp our
/// keys start with.
fn sort_newest_first(objects: &mut [ObjectEntry]) {
    objects.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| b.key.cmp(&a.key))
    });
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}
