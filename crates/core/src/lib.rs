//! Core image upload logic for Quill.
//!
//! This crate contains the upload gateway and the upload form model with ZERO
//! web dependencies. Storage access goes through Apache OpenDAL.
//!
//! # Modules
//!
//! - `storage` - Object store seam and the OpenDAL-backed service
//! - `media` - Upload gateway: validation, key derivation, store/remove/list
//! - `form` - Upload form state with URL and file input modes

pub mod form;
pub mod media;
pub mod storage;
