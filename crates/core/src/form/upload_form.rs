//! Image field of the post editor.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::error::FormError;
use super::types::{FormSnapshot, FormStatus, InputMode, PLACEHOLDER_IMAGE, Preview};
use crate::media::{Folder, ImageFile, ImageGateway};
use crate::storage::ObjectStore;

/// Callback receiving the new image reference; `""` means the image was cleared.
pub type ChangeCallback = Box<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Default)]
struct FormState {
    mode: InputMode,
    status: FormStatus,
    value: String,
    preview_failed: bool,
    /// Bumped whenever the value is replaced by anything but an upload.
    revision: u64,
}

/// Clears the in-flight flag if an upload is dropped before it completes.
struct InFlight<'a> {
    state: &'a Mutex<FormState>,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.status.is_uploading() {
            state.status = FormStatus::Idle;
        }
    }
}

/// Headless model of the image upload form.
///
/// Holds one image reference, offers URL and file input modes, and allows a
/// single upload in flight. The guard is checked and set under the state lock
/// at the moment the store request is issued; the lock is never held across
/// the request itself. Dropping a pending upload releases the guard.
pub struct UploadForm<S: ObjectStore> {
    gateway: Arc<ImageGateway<S>>,
    folder: Folder,
    state: Mutex<FormState>,
    on_change: ChangeCallback,
}

impl<S: ObjectStore> UploadForm<S> {
    /// Create a form showing `initial_value`, uploading into `folder`.
    #[must_use]
    pub fn new(
        gateway: Arc<ImageGateway<S>>,
        folder: Folder,
        initial_value: impl Into<String>,
        on_change: ChangeCallback,
    ) -> Self {
        Self {
            gateway,
            folder,
            state: Mutex::new(FormState {
                value: initial_value.into(),
                ..FormState::default()
            }),
            on_change,
        }
    }

    /// The gateway uploads go through.
    #[must_use]
    pub fn gateway(&self) -> &Arc<ImageGateway<S>> {
        &self.gateway
    }

    /// Folder uploads are filed under.
    #[must_use]
    pub fn folder(&self) -> Folder {
        self.folder
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Switch the active input affordance. A displayed error is dismissed.
    pub fn set_mode(&self, mode: InputMode) {
        let mut state = self.lock();
        state.mode = mode;
        if state.status.error_message().is_some() {
            state.status = FormStatus::Idle;
        }
    }

    /// Use a pasted address as the image, with no backend involvement.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is in file mode or the text is blank.
    pub fn submit_url(&self, text: &str) -> Result<(), FormError> {
        let address = text.trim();
        {
            let mut state = self.lock();
            if state.mode != InputMode::Url {
                return Err(FormError::WrongMode {
                    expected: InputMode::Url,
                    actual: state.mode,
                });
            }
            if address.is_empty() {
                return Err(FormError::EmptyUrl);
            }
            address.clone_into(&mut state.value);
            state.preview_failed = false;
            state.revision += 1;
            if !state.status.is_uploading() {
                state.status = FormStatus::Idle;
            }
        }

        (self.on_change)(address);
        Ok(())
    }

    /// Upload a picked file and adopt its public address.
    ///
    /// On failure the message is shown and the value is left unchanged. If the
    /// image was cleared or replaced while the upload was pending, the stored
    /// address is returned but not adopted and the parent is not notified.
    ///
    /// # Errors
    ///
    /// Returns an error if the form is in URL mode, another upload is pending,
    /// or the gateway rejects the file.
    pub async fn select_file(&self, file: ImageFile) -> Result<String, FormError> {
        let (in_flight, revision) = {
            let mut state = self.lock();
            if state.mode != InputMode::File {
                return Err(FormError::WrongMode {
                    expected: InputMode::File,
                    actual: state.mode,
                });
            }
            if state.status.is_uploading() {
                debug!(file_name = %file.name, "Upload refused, another one is pending");
                return Err(FormError::UploadInProgress);
            }
            state.status = FormStatus::Uploading;
            let in_flight = InFlight {
                state: &self.state,
                armed: true,
            };
            (in_flight, state.revision)
        };

        let outcome = self.gateway.store(file, self.folder).await;
        in_flight.disarm();

        match outcome {
            Ok(image) => {
                let adopted = {
                    let mut state = self.lock();
                    state.status = FormStatus::Idle;
                    let unchanged = state.revision == revision;
                    if unchanged {
                        state.value.clone_from(&image.url);
                        state.preview_failed = false;
                    }
                    unchanged
                };
                if adopted {
                    (self.on_change)(&image.url);
                } else {
                    debug!(url = %image.url, "Upload finished after the image was replaced");
                }
                Ok(image.url)
            }
            Err(e) => {
                self.lock().status = FormStatus::Error(e.to_string());
                Err(FormError::Upload(e))
            }
        }
    }

    /// Remove the image and tell the parent it is gone.
    pub fn clear(&self) {
        {
            let mut state = self.lock();
            state.value.clear();
            state.preview_failed = false;
            state.revision += 1;
            if !state.status.is_uploading() {
                state.status = FormStatus::Idle;
            }
        }
        (self.on_change)("");
    }

    /// Record that the preview image failed to load.
    pub fn image_failed(&self) {
        let mut state = self.lock();
        if !state.value.is_empty() {
            state.preview_failed = true;
        }
    }

    /// Current image reference.
    #[must_use]
    pub fn value(&self) -> String {
        self.lock().value.clone()
    }

    /// Point-in-time view for rendering.
    #[must_use]
    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.lock();
        let preview = (!state.value.is_empty()).then(|| {
            if state.preview_failed {
                Preview {
                    src: PLACEHOLDER_IMAGE.to_string(),
                    is_placeholder: true,
                }
            } else {
                Preview {
                    src: state.value.clone(),
                    is_placeholder: false,
                }
            }
        });

        FormSnapshot {
            mode: state.mode,
            status: state.status.clone(),
            value: state.value.clone(),
            preview,
            file_picker_enabled: state.mode == InputMode::File && !state.status.is_uploading(),
        }
    }
}
