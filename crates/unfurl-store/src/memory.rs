use async_trait::async_trait;
use dashmap::DashMap;
use unfurl_core::store::Result;
use unfurl_core::{LinkRecord, LinkStore, MediaDescriptor, ShortId, StorageError};

/// In-memory implementation of the [`LinkStore`] trait using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. Expired entries are filtered on read and
/// reaped lazily.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLinkStore {
    storage: DashMap<String, LinkRecord>,
}

impl InMemoryLinkStore {
    /// Creates a new in-memory link store.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates a new in-memory link store with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn insert(&self, id: &ShortId, record: LinkRecord) -> Result<()> {
        let key = id.as_str().to_owned();

        // Check-and-insert: reject if the id is already taken (and not expired).
        let existing = self.storage.get(&key);
        if let Some(ref e) = existing {
            if !e.is_expired() {
                return Err(StorageError::Conflict(id.to_string()));
            }
            // Expired entry: drop the read guard, then overwrite below.
            drop(existing);
        }

        self.storage.insert(key, record);
        Ok(())
    }

    async fn get(&self, id: &ShortId) -> Result<Option<LinkRecord>> {
        let key = id.as_str();

        let Some(record) = self.storage.get(key) else {
            return Ok(None);
        };

        if record.is_expired() {
            drop(record);
            self.storage.remove(key);
            return Ok(None);
        }

        Ok(Some(record.clone()))
    }

    async fn exists(&self, id: &ShortId) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    async fn refresh(&self, id: &ShortId, descriptor: MediaDescriptor) -> Result<()> {
        let Some(mut record) = self.storage.get_mut(id.as_str()) else {
            return Err(StorageError::NotFound(id.to_string()));
        };

        if record.is_expired() {
            drop(record);
            self.storage.remove(id.as_str());
            return Err(StorageError::NotFound(id.to_string()));
        }

        record.descriptor = Some(descriptor);
        Ok(())
    }

    async fn delete(&self, id: &ShortId) -> Result<bool> {
        Ok(self.storage.remove(id.as_str()).is_some())
    }
}
