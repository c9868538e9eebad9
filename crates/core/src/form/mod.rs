//! Image upload form for the post editor.
//!
//! This module models the form without any rendering:
//! - URL and file input modes
//! - Single in-flight upload guard
//! - Error display and preview with placeholder fallback
//! - Change notifications to the owning editor

mod error;
mod types;
mod upload_form;

#[cfg(test)]
mod upload_form_props;

pub use error::FormError;
pub use types::{FormSnapshot, FormStatus, InputMode, PLACEHOLDER_IMAGE, Preview};
pub use upload_form::{ChangeCallback, UploadForm};
