use async_trait::async_trait;
use jiff::Timestamp;
use redis::AsyncCommands;
use tracing::{debug, trace, warn};
use unfurl_core::store::Result;
use unfurl_core::{LinkRecord, LinkStore, MediaDescriptor, ShortId, StorageError};

/// A Redis-backed implementation of [`LinkStore`].
///
/// Records are stored as JSON strings under a configurable key prefix.
/// The retention window maps directly onto the key TTL, so expiry is
/// enforced by Redis itself rather than a reaper task.
#[derive(Debug, Clone)]
pub struct RedisLinkStore {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        StorageError::Unavailable(message)
    } else {
        StorageError::Operation(message)
    }
}

impl RedisLinkStore {
    /// Creates a new Redis link store.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: "uf:link:".to_string(),
        }
    }

    /// Creates a new Redis link store with a custom key prefix.
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
        }
    }

    fn store_key(&self, id: &ShortId) -> String {
        format!("{}{}", self.key_prefix, id.as_str())
    }

    fn encode(record: &LinkRecord) -> Result<String> {
        serde_json::to_string(record)
            .map_err(|e| StorageError::Serialization(format!("failed to serialize record: {e}")))
    }

    fn decode(key: &str, raw: &str) -> Result<LinkRecord> {
        serde_json::from_str(raw).map_err(|e| {
            StorageError::Serialization(format!("invalid stored value for key '{key}': {e}"))
        })
    }

    /// Remaining seconds until `expire_at`, clamped to at least one
    /// second so a freshly written key never outlives its record.
    fn remaining_ttl_secs(record: &LinkRecord) -> i64 {
        let remaining = record.expire_at.as_second() - Timestamp::now().as_second();
        remaining.max(1)
    }

    async fn fetch(&self, id: &ShortId) -> Result<Option<LinkRecord>> {
        let key = self.store_key(id);
        let mut conn = self.conn.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(raw)) => {
                let record = Self::decode(&key, &raw)?;
                // Redis TTL normally reaps first; the record-level check
                // covers clock skew between writer and server.
                if record.is_expired() {
                    trace!(id = %id, "stored record past its expiry");
                    return Ok(None);
                }
                Ok(Some(record))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(id = %id, error = %e, "redis error on get");
                Err(map_redis_error("failed to fetch record from redis", e))
            }
        }
    }
}

#[async_trait]
impl LinkStore for RedisLinkStore {
    async fn insert(&self, id: &ShortId, record: LinkRecord) -> Result<()> {
        let key = self.store_key(id);
        let json = Self::encode(&record)?;
        let ttl = Self::remaining_ttl_secs(&record);
        let mut conn = self.conn.clone();

        trace!(id = %id, ttl_secs = ttl, "inserting record into redis");

        // SET NX EX: the write and the uniqueness check are one command.
        let outcome: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&json)
            .arg("NX")
            .arg("EX")
            .arg(ttl)
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to write record to redis", e))?;

        match outcome {
            Some(_) => {
                debug!(id = %id, "stored record in redis");
                Ok(())
            }
            None => Err(StorageError::Conflict(id.to_string())),
        }
    }

    async fn get(&self, id: &ShortId) -> Result<Option<LinkRecord>> {
        self.fetch(id).await
    }

    async fn exists(&self, id: &ShortId) -> Result<bool> {
        Ok(self.fetch(id).await?.is_some())
    }

    async fn refresh(&self, id: &ShortId, descriptor: MediaDescriptor) -> Result<()> {
        let Some(mut record) = self.fetch(id).await? else {
            return Err(StorageError::NotFound(id.to_string()));
        };

        record.descriptor = Some(descriptor);
        let key = self.store_key(id);
        let json = Self::encode(&record)?;
        let mut conn = self.conn.clone();

        // XX KEEPTTL: only overwrite a live key, keep the original
        // retention clock running.
        let outcome: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&json)
            .arg("XX")
            .arg("KEEPTTL")
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to refresh record in redis", e))?;

        match outcome {
            Some(_) => {
                debug!(id = %id, "refreshed descriptor in redis");
                Ok(())
            }
            // Key expired between the fetch and the write.
            None => Err(StorageError::NotFound(id.to_string())),
        }
    }

    async fn delete(&self, id: &ShortId) -> Result<bool> {
        let key = self.store_key(id);
        let mut conn = self.conn.clone();

        let removed: u64 = conn
            .del(&key)
            .await
            .map_err(|e| map_redis_error("failed to delete record from redis", e))?;
        Ok(removed > 0)
    }
}
