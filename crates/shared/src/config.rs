//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Upload limits and object headers.
    #[serde(default)]
    pub upload: UploadSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Which OpenDAL service backs the image store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// S3-compatible endpoint (Supabase Storage, R2, AWS S3).
    S3,
    /// Local filesystem.
    Fs,
    /// Process memory; contents vanish on restart.
    #[default]
    Memory,
}

/// Object storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Storage service to use.
    #[serde(default)]
    pub provider: ProviderKind,
    /// Bucket holding blog images; also part of every public address.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Base of public addresses, e.g. `https://project.supabase.co/storage/v1`.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// S3 endpoint URL.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// S3 region.
    #[serde(default)]
    pub region: Option<String>,
    /// S3 access key ID.
    #[serde(default)]
    pub access_key_id: Option<String>,
    /// S3 secret access key.
    #[serde(default)]
    pub secret_access_key: Option<String>,
    /// Root directory for the filesystem provider.
    #[serde(default)]
    pub root: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            bucket: default_bucket(),
            public_base_url: default_public_base_url(),
            endpoint: None,
            region: None,
            access_key_id: None,
            secret_access_key: None,
            root: None,
        }
    }
}

fn default_bucket() -> String {
    "blog-images".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:8080/storage/v1".to_string()
}

/// Upload limits and object headers.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    /// Largest accepted image in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// `Cache-Control` value written with each object.
    #[serde(default = "default_cache_control")]
    pub cache_control: String,
    /// Maximum number of entries returned by a listing.
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
    /// Largest accepted HTTP request body in bytes.
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            cache_control: default_cache_control(),
            list_limit: default_list_limit(),
            max_request_bytes: default_max_request_bytes(),
        }
    }
}

fn default_max_file_size() -> u64 {
    5 * 1024 * 1024 // 5 MiB
}

fn default_cache_control() -> String {
    "3600".to_string()
}

fn default_list_limit() -> usize {
    100
}

fn default_max_request_bytes() -> usize {
    16 * 1024 * 1024
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            json: false,
        }
    }
}

fn default_log_filter() -> String {
    "quill=info,tower_http=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("QUILL").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        temp_env::with_vars_unset(
            [
                "QUILL__STORAGE__PROVIDER",
                "QUILL__STORAGE__BUCKET",
                "QUILL__SERVER__PORT",
            ],
            || {
                let config = AppConfig::load().expect("config loads");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.storage.provider, ProviderKind::Memory);
                assert_eq!(config.storage.bucket, "blog-images");
                assert_eq!(config.upload.max_file_size, 5 * 1024 * 1024);
                assert_eq!(config.upload.cache_control, "3600");
                assert_eq!(config.upload.list_limit, 100);
                assert!(!config.logging.json);
            },
        );
    }

    #[test]
    fn test_environment_overrides() {
        temp_env::with_vars(
            [
                ("QUILL__STORAGE__PROVIDER", Some("s3")),
                ("QUILL__STORAGE__BUCKET", Some("media")),
                (
                    "QUILL__STORAGE__PUBLIC_BASE_URL",
                    Some("https://abc.supabase.co/storage/v1"),
                ),
                ("QUILL__SERVER__PORT", Some("9090")),
            ],
            || {
                let config = AppConfig::load().expect("config loads");
                assert_eq!(config.storage.provider, ProviderKind::S3);
                assert_eq!(config.storage.bucket, "media");
                assert_eq!(
                    config.storage.public_base_url,
                    "https://abc.supabase.co/storage/v1"
                );
                assert_eq!(config.server.port, 9090);
            },
        );
    }
}
