use crate::descriptor::MediaDescriptor;
use crate::error::StorageError;
use crate::platform::Platform;
use crate::short_id::ShortId;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored short-link record.
///
/// `source_url` and the id it is stored under are immutable once written;
/// only the descriptor is replaced on refresh. A record may legitimately
/// carry no descriptor between creation and the first successful
/// resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// The original platform URL submitted by a client.
    pub source_url: String,
    /// The platform the source URL was detected as.
    pub platform: Platform,
    /// The last successfully resolved media descriptor, if any.
    pub descriptor: Option<MediaDescriptor>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record expires and may be reaped.
    pub expire_at: Timestamp,
}

impl LinkRecord {
    pub fn is_expired(&self) -> bool {
        Timestamp::now() >= self.expire_at
    }
}

/// Time-bounded key-value persistence for [`LinkRecord`]s.
///
/// Implementations are bounded caches of recent resolutions, not
/// permanent indexes: every record expires after its retention window,
/// and callers must tolerate `None` for any previously issued short id.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    /// Inserts a new record. Returns `Err(Conflict)` if a live record
    /// with this id already exists.
    async fn insert(&self, id: &ShortId, record: LinkRecord) -> Result<()>;

    /// Retrieves the record for a short id.
    /// Returns `None` if the id does not exist or has expired.
    async fn get(&self, id: &ShortId) -> Result<Option<LinkRecord>>;

    /// Checks whether a live record exists for the short id.
    async fn exists(&self, id: &ShortId) -> Result<bool>;

    /// Replaces the stored descriptor in place, leaving `source_url`,
    /// platform, and timestamps untouched. Returns `Err(NotFound)` if
    /// the record is absent or expired.
    async fn refresh(&self, id: &ShortId, descriptor: MediaDescriptor) -> Result<()>;

    /// Deletes the record for a short id.
    /// Returns `true` if the record existed and was removed.
    async fn delete(&self, id: &ShortId) -> Result<bool>;
}
