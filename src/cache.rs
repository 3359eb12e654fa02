//! Time-boxed cache for pipeline results, keyed by the identity of the input
//! snapshots. The pipelines themselves hold no state.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Identity of one set of input snapshots plus the base year.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotKey {
    digest: String,
    base_year: Option<i32>,
}

impl SnapshotKey {
    /// SHA-256 over every snapshot, each prefixed with its length so that
    /// moving bytes between snapshots changes the key.
    pub fn new<I, B>(snapshots: I, base_year: Option<i32>) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut hasher = Sha256::new();
        for snapshot in snapshots {
            let bytes = snapshot.as_ref();
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        SnapshotKey {
            digest: hex::encode(hasher.finalize()),
            base_year,
        }
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }
}

struct Entry<V> {
    stored_at: Instant,
    value: Arc<V>,
}

pub struct PipelineCache<V> {
    ttl: Duration,
    entries: HashMap<SnapshotKey, Entry<V>>,
}

impl<V> PipelineCache<V> {
    pub fn new(ttl: Duration) -> Self {
        PipelineCache {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Cached value for `key`, or the result of `compute` when absent or expired.
    /// Errors are returned and not cached. Storing a new value drops every
    /// expired entry.
    pub fn get_or_try_insert_with<E, F>(&mut self, key: SnapshotKey, compute: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(&key) {
            if now.duration_since(entry.stored_at) < self.ttl {
                log::debug!("Cache hit {}", key.digest);
                return Ok(Arc::clone(&entry.value));
            }
            log::debug!("Cache entry expired {}", key.digest);
        }
        let value = Arc::new(compute()?);
        self.purge_expired();
        self.entries.insert(
            key,
            Entry {
                stored_at: now,
                value: Arc::clone(&value),
            },
        );
        Ok(value)
    }

    /// Drops expired entries.
    pub fn purge_expired(&mut self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
