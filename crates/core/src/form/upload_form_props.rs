//! Property-based tests for UploadForm.
//!
//! URL mode never touches the backend, and every accepted change reaches the
//! owning editor exactly once.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;

use crate::form::{InputMode, UploadForm};
use crate::media::testing::RecordingStore;
use crate::media::{Folder, ImageGateway, UploadPolicy};

fn form() -> (UploadForm<RecordingStore>, Arc<Mutex<Vec<String>>>) {
    let changes = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&changes);
    let gateway = Arc::new(ImageGateway::new(RecordingStore::new(), UploadPolicy::default()));
    let form = UploadForm::new(
        gateway,
        Folder::Content,
        "",
        Box::new(move |value: &str| sink.lock().unwrap().push(value.to_string())),
    );
    (form, changes)
}

/// Strategy for generating pasted addresses, padded with stray whitespace.
fn arb_pasted_address() -> impl Strategy<Value = String> {
    (
        "[ \t]{0,3}",
        "https://[a-z]{1,12}\\.(com|org|net)/[a-z0-9/_-]{1,24}\\.(jpg|png|webp)",
        "[ \t\n]{0,3}",
    )
        .prop_map(|(lead, url, trail)| format!("{lead}{url}{trail}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_pasted_address_becomes_value(pasted in arb_pasted_address()) {
        let (form, changes) = form();

        prop_assert!(form.submit_url(&pasted).is_ok());

        let expected = pasted.trim().to_string();
        prop_assert_eq!(form.value(), expected.clone());
        prop_assert_eq!(changes.lock().unwrap().clone(), vec![expected]);
        prop_assert!(form.snapshot().preview.is_some());
    }

    #[test]
    fn prop_url_mode_never_calls_backend(
        inputs in prop::collection::vec(prop_oneof![arb_pasted_address(), "[ \t]{0,4}"], 1..8),
    ) {
        let (form, _) = form();
        form.set_mode(InputMode::Url);

        for input in &inputs {
            let _ = form.submit_url(input);
        }
        form.clear();

        prop_assert!(form.snapshot().value.is_empty());
        prop_assert!(form.gateway().backend().calls().is_empty());
    }
}
