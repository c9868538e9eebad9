//! Storage key derivation and public address parsing.
//!
//! Keys have the form `{folder}/{millis}-{suffix}.{ext}`. The millisecond
//! timestamp plus a short random suffix make collisions unlikely but not
//! impossible; writes are issued with if-not-exists so a collision fails
//! instead of overwriting.

use chrono::Utc;
use uuid::Uuid;

use super::types::{Folder, ImageFile, StorageKey};

/// Length of the random part of a key.
pub const SUFFIX_LEN: usize = 6;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

impl StorageKey {
    /// Derive a fresh key for an uploaded file.
    #[must_use]
    pub fn generate(folder: Folder, file: &ImageFile) -> Self {
        Self::compose(
            folder,
            Utc::now().timestamp_millis(),
            &random_suffix(),
            &file_extension(&file.name, &file.content_type),
        )
    }

    /// Assemble a key from its parts.
    #[must_use]
    pub fn compose(folder: Folder, timestamp_ms: i64, suffix: &str, extension: &str) -> Self {
        Self::from_raw(format!(
            "{}/{timestamp_ms}-{suffix}.{extension}",
            folder.as_str()
        ))
    }

    /// Recover the key from a public address.
    ///
    /// `marker` is the `/object/public/{bucket}/` segment. Query strings and
    /// fragments are ignored. Returns `None` when the marker is absent, the
    /// key is empty, or the key tries to climb out of the bucket.
    #[must_use]
    pub fn from_public_url(address: &str, marker: &str) -> Option<Self> {
        let (_, rest) = address.split_once(marker)?;
        let key = rest.split(['?', '#']).next().unwrap_or_default();

        if key.is_empty() || key.starts_with('/') || key.split('/').any(|s| s == "..") {
            return None;
        }

        Some(Self::from_raw(key))
    }
}

/// Six lowercase base36 characters taken from a v4 UUID.
fn random_suffix() -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(SUFFIX_LEN);
    for _ in 0..SUFFIX_LEN {
        out.push(char::from(BASE36[(n % 36) as usize]));
        n /= 36;
    }
    out
}

/// Extension for the stored object.
///
/// Taken from the file name when it has one, otherwise from the MIME subtype.
fn file_extension(file_name: &str, content_type: &str) -> String {
    let from_name = file_name
        .rsplit_once('.')
        .map(|(_, ext)| sanitize_extension(ext))
        .unwrap_or_default();
    if !from_name.is_empty() {
        return from_name;
    }

    let subtype = content_type
        .split_once('/')
        .map(|(_, sub)| sub)
        .unwrap_or_default();
    let subtype = subtype.split([';', '+']).next().unwrap_or_default().trim();
    match sanitize_extension(subtype).as_str() {
        "" => "bin".to_string(),
        "jpeg" => "jpg".to_string(),
        other => other.to_string(),
    }
}

/// Lowercase and keep ASCII alphanumerics only.
fn sanitize_extension(ext: &str) -> String {
    ext.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
