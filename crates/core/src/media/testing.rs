//! In-memory object store that records every backend call.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tokio::sync::Notify;

use crate::storage::{
    ObjectEntry, ObjectStore, PutOptions, StorageConfig, StorageError, StorageProvider,
};

/// Backend call observed by [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Put { key: String, cache_control: String },
    Delete(String),
    List(String),
}

/// Mock store for testing.
pub struct RecordingStore {
    config: StorageConfig,
    objects: Mutex<BTreeMap<String, Bytes>>,
    calls: Mutex<Vec<Call>>,
    failure: Option<String>,
    gate: Option<Arc<Notify>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            config: StorageConfig::new(
                StorageProvider::Memory,
                "https://project.supabase.co/storage/v1",
            ),
            objects: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            failure: None,
            gate: None,
        }
    }

    /// Every request fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new()
        }
    }

    /// Writes wait until `gate` is notified.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn insert(&self, key: &str) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), Bytes::new());
    }

    fn check_failure(&self) -> Result<(), StorageError> {
        match &self.failure {
            Some(message) => Err(StorageError::operation(message.clone())),
            None => Ok(()),
        }
    }
}

impl ObjectStore for RecordingStore {
    async fn put_new(
        &self,
        key: &str,
        body: Bytes,
        options: &PutOptions,
    ) -> Result<(), StorageError> {
        self.calls.lock().unwrap().push(Call::Put {
            key: key.to_string(),
            cache_control: options.cache_control.clone(),
        });
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.check_failure()?;

        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(key) {
            return Err(StorageError::already_exists(key));
        }
        objects.insert(key.to_string(), body);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.calls.lock().unwrap().push(Call::Delete(key.to_string()));
        self.check_failure()?;
        self.objects.lock().unwrap().remove(key);
        Ok(())
    }

    async fn list(&self, prefix: &str, limit: usize) -> Result<Vec<ObjectEntry>, StorageError> {
        self.calls.lock().unwrap().push(Call::List(prefix.to_string()));
        self.check_failure()?;
        Ok(self
            .objects
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|(key, _)| {
                key.strip_prefix(prefix)
                    .is_some_and(|rest| !rest.contains('/'))
            })
            .take(limit)
            .map(|(key, _)| ObjectEntry {
                key: key.clone(),
                last_modified: None,
            })
            .collect())
    }

    fn public_url(&self, key: &str) -> String {
        self.config.public_url(key)
    }

    fn public_path_marker(&self) -> String {
        self.config.public_path_marker()
    }
}
