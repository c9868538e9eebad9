//! Property-based tests for ImageGateway.
//!
//! These tests validate that local validation never reaches the backend and
//! that every accepted upload yields an address in the expected key layout.

use bytes::Bytes;
use futures::executor::block_on;
use proptest::prelude::*;

use crate::media::gateway::ImageGateway;
use crate::media::testing::RecordingStore;
use crate::media::types::{Folder, ImageFile, MEBIBYTE, UploadPolicy};
use crate::media::GatewayError;

const MAX: u64 = 5 * MEBIBYTE;
const PUBLIC_PREFIX: &str = "https://project.supabase.co/storage/v1/object/public/blog-images/";

fn gateway() -> ImageGateway<RecordingStore> {
    ImageGateway::new(RecordingStore::new(), UploadPolicy::default())
}

fn file_of(name: &str, content_type: &str, size: u64) -> ImageFile {
    let len = usize::try_from(size).unwrap_or(usize::MAX);
    ImageFile::new(name, content_type, Bytes::from(vec![0u8; len]))
}

/// Strategy for generating MIME types that are not images.
fn arb_non_image_type() -> impl Strategy<Value = String> {
    prop_oneof![
        "(application|text|video|audio|font)/[a-z0-9.+-]{1,20}",
        Just(String::new()),
        Just("imagepng".to_string()),
    ]
}

/// Strategy for generating image MIME types.
fn arb_image_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("image/png".to_string()),
        Just("image/jpeg".to_string()),
        Just("image/gif".to_string()),
        Just("image/webp".to_string()),
        "image/[a-z]{1,10}",
    ]
}

fn arb_folder() -> impl Strategy<Value = Folder> {
    prop_oneof![Just(Folder::Covers), Just(Folder::Content)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    // =========================================================================
    // Non-image uploads never reach the backend
    // =========================================================================
    #[test]
    fn prop_non_image_rejected_locally(
        content_type in arb_non_image_type(),
        size in 0u64..=(2 * MAX),
        folder in arb_folder(),
    ) {
        let gateway = gateway();
        let result = block_on(gateway.store(file_of("file.bin", &content_type, size), folder));

        let is_not_an_image = matches!(result, Err(GatewayError::NotAnImage { .. }));
        prop_assert!(is_not_an_image);
        prop_assert!(gateway.backend().calls().is_empty());
    }

    // =========================================================================
    // Oversized uploads never reach the backend, whatever their type
    // =========================================================================
    #[test]
    fn prop_oversized_rejected_locally(
        content_type in prop_oneof![arb_image_type(), arb_non_image_type()],
        extra in 1u64..=MEBIBYTE,
        folder in arb_folder(),
    ) {
        let gateway = gateway();
        let result = block_on(gateway.store(file_of("big.png", &content_type, MAX + extra), folder));

        prop_assert!(result.is_err());
        prop_assert!(result.is_err_and(|e| e.is_local()));
        prop_assert!(gateway.backend().calls().is_empty());
    }

    // =========================================================================
    // Valid images are stored under folder/millis-suffix.ext
    // =========================================================================
    #[test]
    fn prop_valid_image_stored(
        content_type in arb_image_type(),
        stem in "[a-zA-Z0-9_-]{1,12}",
        ext in "(jpg|png|gif|webp)",
        size in 1u64..=MAX,
        folder in arb_folder(),
    ) {
        let gateway = gateway();
        let name = format!("{stem}.{ext}");
        let stored = block_on(gateway.store(file_of(&name, &content_type, size), folder))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let key = stored
            .url
            .strip_prefix(PUBLIC_PREFIX)
            .ok_or_else(|| TestCaseError::fail("unexpected address prefix"))?;
        let (key_folder, file_name) = key
            .split_once('/')
            .ok_or_else(|| TestCaseError::fail("missing folder"))?;
        prop_assert_eq!(key_folder, folder.as_str());

        let (stem_part, stored_ext) = file_name
            .rsplit_once('.')
            .ok_or_else(|| TestCaseError::fail("missing extension"))?;
        prop_assert_eq!(stored_ext, ext.as_str());
        let (millis, suffix) = stem_part
            .split_once('-')
            .ok_or_else(|| TestCaseError::fail("missing suffix"))?;
        prop_assert!(millis.parse::<i64>().is_ok());
        prop_assert_eq!(suffix.len(), 6);
        prop_assert_eq!(gateway.backend().calls().len(), 1);
    }

    // =========================================================================
    // Addresses outside the bucket are refused without a backend call
    // =========================================================================
    #[test]
    fn prop_foreign_address_not_removed(
        host in "[a-z]{1,10}",
        path in "[a-z0-9/]{0,30}",
    ) {
        let gateway = gateway();
        let address = format!("https://{host}.com/{path}");

        prop_assert!(!block_on(gateway.remove(&address)));
        prop_assert!(gateway.backend().calls().is_empty());
    }

    // =========================================================================
    // Listing failures surface as ListingUnavailable, never a panic
    // =========================================================================
    #[test]
    fn prop_listing_failure_surfaced(message in "[a-zA-Z ]{1,30}", folder in arb_folder()) {
        let gateway = ImageGateway::new(RecordingStore::failing(&message), UploadPolicy::default());
        let result = block_on(gateway.list(folder));

        let unavailable = matches!(result, Err(GatewayError::ListingUnavailable(_)));
        prop_assert!(unavailable);
    }
}
