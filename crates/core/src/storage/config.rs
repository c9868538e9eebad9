//! Storage configuration types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Supabase Storage, Cloudflare R2, AWS S3
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory (tests and demos)
    Memory,
}

impl StorageProvider {
    /// Create S3-compatible provider (Supabase Storage, Cloudflare R2, AWS S3).
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }
}

/// Storage service configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Bucket the images live in.
    pub bucket: String,
    /// Base URL public addresses are built on.
    ///
    /// Addresses take the form `{public_base_url}/object/public/{bucket}/{key}`.
    pub public_base_url: String,
}

impl StorageConfig {
    /// Default bucket for blog images.
    pub const DEFAULT_BUCKET: &'static str = "blog-images";

    /// Create a new storage config using the default bucket.
    #[must_use]
    pub fn new(provider: StorageProvider, public_base_url: impl Into<String>) -> Self {
        Self {
            provider,
            bucket: Self::DEFAULT_BUCKET.to_string(),
            public_base_url: public_base_url.into(),
        }
    }

    /// Set the bucket name.
    #[must_use]
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    /// Path segment that precedes every key in a public address.
    #[must_use]
    pub fn public_path_marker(&self) -> String {
        format!("/object/public/{}/", self.bucket)
    }

    /// Build the public address of a stored key.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}{}{}",
            self.public_base_url.trim_end_matches('/'),
            self.public_path_marker(),
            key.trim_start_matches('/')
        )
    }
}
