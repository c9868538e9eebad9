//! Object storage for blog images using Apache OpenDAL.
//!
//! This module provides vendor-agnostic object storage with support for:
//! - S3-compatible: Supabase Storage, Cloudflare R2, AWS S3
//! - Local filesystem (development only)
//! - In-memory (tests and demos)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Apache OpenDAL                              │
//! │                   (Unified Storage API)                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ op.write_with("key", data) │ op.list_with("prefix/")            │
//! │ op.delete("key")           │ op.exists("key")                   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Public addresses are not issued by OpenDAL; they are derived from the
//! configured base URL as `{base}/object/public/{bucket}/{key}`.

mod config;
mod error;
mod service;
mod store;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::StorageService;
pub use store::{ObjectEntry, ObjectStore, PutOptions};
