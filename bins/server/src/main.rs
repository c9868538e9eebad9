//! Quill API Server
//!
//! Main entry point for the blog image upload service.

use std::sync::Arc;

use anyhow::{Context, bail};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use quill_api::{AppState, create_router};
use quill_core::media::{ImageGateway, UploadPolicy};
use quill_core::storage::{StorageConfig, StorageProvider, StorageService};
use quill_shared::{AppConfig, LoggingConfig, ProviderKind, StorageSettings, UploadSettings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("failed to load configuration")?;

    init_tracing(&config.logging);

    // Create storage service and gateway
    let storage = StorageService::from_config(storage_config(&config.storage)?)?;
    info!(
        provider = storage.provider_name(),
        bucket = storage.bucket(),
        "Storage configured"
    );
    let gateway = ImageGateway::new(storage, upload_policy(&config.upload));

    // Create application state
    let state = AppState {
        gateway: Arc::new(gateway),
        max_request_bytes: config.upload.max_request_bytes,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Install the global subscriber; `RUST_LOG` wins over the configured filter.
fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

/// Build the storage configuration from application settings.
fn storage_config(settings: &StorageSettings) -> anyhow::Result<StorageConfig> {
    let provider = match settings.provider {
        ProviderKind::S3 => {
            let (Some(endpoint), Some(key_id), Some(secret)) = (
                settings.endpoint.as_deref(),
                settings.access_key_id.as_deref(),
                settings.secret_access_key.as_deref(),
            ) else {
                bail!("s3 storage needs endpoint, access_key_id and secret_access_key");
            };
            let region = settings.region.as_deref().unwrap_or("us-east-1");
            StorageProvider::s3(endpoint, key_id, secret, region)
        }
        ProviderKind::Fs => {
            let Some(root) = settings.root.as_deref() else {
                bail!("fs storage needs a root directory");
            };
            StorageProvider::local_fs(root)
        }
        ProviderKind::Memory => StorageProvider::Memory,
    };

    Ok(StorageConfig::new(provider, settings.public_base_url.clone()).with_bucket(&settings.bucket))
}

/// Build the upload policy from application settings.
fn upload_policy(settings: &UploadSettings) -> UploadPolicy {
    UploadPolicy::default()
        .with_max_file_size(settings.max_file_size)
        .with_cache_control(&settings.cache_control)
        .with_list_limit(settings.list_limit)
}
