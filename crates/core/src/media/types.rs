//! Image upload types and data structures.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One mebibyte.
pub const MEBIBYTE: u64 = 1024 * 1024;

/// Key-prefix category an image is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Folder {
    /// Post cover images.
    Covers,
    /// Images embedded in post bodies.
    #[default]
    Content,
}

impl Folder {
    /// Key prefix for this folder.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Covers => "covers",
            Self::Content => "content",
        }
    }

    /// Parse from a key prefix.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "covers" => Some(Self::Covers),
            "content" => Some(Self::Content),
            _ => None,
        }
    }
}

impl std::fmt::Display for Folder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct ImageFile {
    /// Original file name, e.g. `a.jpg`.
    pub name: String,
    /// Declared MIME type.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

impl ImageFile {
    /// Create a new file.
    #[must_use]
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// File size in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Limits and headers applied to every upload.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Largest accepted file in bytes.
    pub max_file_size: u64,
    /// `Cache-Control` value stored with each object.
    pub cache_control: String,
    /// Maximum entries returned by a listing.
    pub list_limit: usize,
}

impl UploadPolicy {
    /// Default max file size: 5 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * MEBIBYTE;
    /// Default cache control: one hour.
    pub const DEFAULT_CACHE_CONTROL: &'static str = "3600";
    /// Default listing size.
    pub const DEFAULT_LIST_LIMIT: usize = 100;

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set the cache control value.
    #[must_use]
    pub fn with_cache_control(mut self, value: impl Into<String>) -> Self {
        self.cache_control = value.into();
        self
    }

    /// Set the listing size.
    #[must_use]
    pub fn with_list_limit(mut self, limit: usize) -> Self {
        self.list_limit = limit;
        self
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            cache_control: Self::DEFAULT_CACHE_CONTROL.to_string(),
            list_limit: Self::DEFAULT_LIST_LIMIT,
        }
    }
}

/// Path-like identifier of an object within the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Wrap an existing key.
    #[must_use]
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading path segment, if the key has one.
    #[must_use]
    pub fn folder(&self) -> Option<&str> {
        self.0.split_once('/').map(|(folder, _)| folder)
    }

    /// Last path segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An object in the bucket together with its public address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredImage {
    /// Storage key.
    pub key: StorageKey,
    /// Public address.
    pub url: String,
}

/// Outcome of one upload attempt, as handed to the post editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadResult {
    /// Whether the image was stored.
    pub success: bool,
    /// Public address of the stored image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Human-readable failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    /// Successful upload.
    #[must_use]
    pub fn ok(url: impl Into<String>) -> Self {
        Self {
            success: true,
            url: Some(url.into()),
            error: None,
        }
    }

    /// Failed upload.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            url: None,
            error: Some(message.into()),
        }
    }
}
