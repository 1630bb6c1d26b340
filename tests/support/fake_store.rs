// ABOUTME: In-memory object store with injectable failures.
// ABOUTME: Implements delimiter grouping and continuation paging like S3.

use async_trait::async_trait;
use bytes::Bytes;
use edgeship::provider::{
    DeleteFailure, ListPage, ListRequest, ObjectStore, ObjectSummary, PutObject, StorageError,
};
use edgeship::types::BucketName;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
    pub cache_control: String,
    pub content_encoding: Option<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    /// Keys whose upload fails.
    failing_puts: Mutex<BTreeSet<String>>,
    /// Keys the batch delete reports as not deleted.
    failing_deletes: Mutex<BTreeSet<String>>,
    unavailable: Mutex<bool>,
    page_size: Mutex<Option<usize>>,
    puts: Mutex<usize>,
    delete_calls: Mutex<Vec<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one small object for each of the given keys.
    pub fn with_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let store = Self::new();
        for key in keys {
            store.insert(key, "x");
        }
        store
    }

    pub fn insert(&self, key: &str, body: &str) {
        self.objects.lock().insert(
            key.to_string(),
            StoredObject {
                body: Bytes::from(body.to_string()),
                content_type: None,
                cache_control: String::new(),
                content_encoding: None,
            },
        );
    }

    pub fn fail_put(&self, key: &str) {
        self.failing_puts.lock().insert(key.to_string());
    }

    pub fn fail_delete(&self, key: &str) {
        self.failing_deletes.lock().insert(key.to_string());
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock() = unavailable;
    }

    /// Limit list pages to force continuation handling.
    pub fn set_page_size(&self, size: usize) {
        *self.page_size.lock() = Some(size);
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().keys().cloned().collect()
    }

    pub fn keys_under(&self, prefix: &str) -> Vec<String> {
        self.keys()
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect()
    }

    pub fn put_count(&self) -> usize {
        *self.puts.lock()
    }

    /// Size of every batch passed to `delete_batch`.
    pub fn delete_batches(&self) -> Vec<usize> {
        self.delete_calls.lock().clone()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if *self.unavailable.lock() {
            Err(StorageError::Unavailable("connection reset".to_string()))
        } else {
            Ok(())
        }
    }
}

enum Entry {
    Prefix(String),
    Object(ObjectSummary),
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(
        &self,
        _bucket: &BucketName,
        request: &ListRequest,
    ) -> Result<ListPage, StorageError> {
        self.check_available()?;

        let objects = self.objects.lock();
        let mut entries = Vec::new();
        let mut seen_prefixes = BTreeSet::new();

        for (key, object) in objects.iter() {
            let Some(rest) = key.strip_prefix(request.prefix.as_str()) else {
                continue;
            };

            if let Some(delimiter) = &request.delimiter
                && let Some(pos) = rest.find(delimiter.as_str())
            {
                let common = format!("{}{}", request.prefix, &rest[..pos + delimiter.len()]);
                if seen_prefixes.insert(common.clone()) {
                    entries.push(Entry::Prefix(common));
                }
                continue;
            }

            entries.push(Entry::Object(ObjectSummary {
                key: key.clone(),
                size: object.body.len() as i64,
                last_modified: None,
            }));
        }

        let start: usize = request
            .continuation
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(0);
        let limit = request
            .max_keys
            .map(|m| m as usize)
            .into_iter()
            .chain(*self.page_size.lock())
            .min()
            .unwrap_or(usize::MAX);

        let end = start.saturating_add(limit).min(entries.len());
        let mut page = ListPage {
            next_continuation: (end < entries.len()).then(|| end.to_string()),
            ..Default::default()
        };
        for entry in entries.drain(..).skip(start).take(end - start) {
            match entry {
                Entry::Prefix(p) => page.common_prefixes.push(p),
                Entry::Object(o) => page.objects.push(o),
            }
        }

        Ok(page)
    }

    async fn put(&self, _bucket: &BucketName, object: PutObject) -> Result<(), StorageError> {
        self.check_available()?;
        if self.failing_puts.lock().contains(&object.key) {
            return Err(StorageError::Unavailable(format!("put {} failed", object.key)));
        }

        *self.puts.lock() += 1;
        self.objects.lock().insert(
            object.key,
            StoredObject {
                body: object.body,
                content_type: object.content_type,
                cache_control: object.cache_control,
                content_encoding: object.content_encoding,
            },
        );
        Ok(())
    }

    async fn delete_batch(
        &self,
        _bucket: &BucketName,
        keys: &[String],
    ) -> Result<Vec<DeleteFailure>, StorageError> {
        self.check_available()?;
        self.delete_calls.lock().push(keys.len());

        let failing = self.failing_deletes.lock();
        let mut objects = self.objects.lock();
        let mut failures = Vec::new();

        for key in keys {
            if failing.contains(key) {
                failures.push(DeleteFailure {
                    key: key.clone(),
                    message: "AccessDenied".to_string(),
                });
            } else {
                objects.remove(key);
            }
        }

        Ok(failures)
    }
}
