use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use crate::ClientResult;
use crate::dataset::{Dataset, normalize};
use crate::store::RecordStore;

#[derive(Debug, Clone)]
struct CachedDataset {
    loaded_at: Instant,
    dataset: Arc<Dataset>,
}

/// Time-bounded read-through cache of the normalized dataset.
///
/// Readers share one immutable snapshot until the TTL elapses or
/// [`DatasetCache::invalidate`] is called; the next read then re-fetches from
/// the store. A reader racing an invalidation sees either the old or the new
/// snapshot, never a partial one.
#[derive(Debug)]
pub struct DatasetCache {
    ttl: Duration,
    slot: RwLock<Option<CachedDataset>>,
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: RwLock::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get_or_load(&self, store: &dyn RecordStore) -> ClientResult<Arc<Dataset>> {
        if let Some(dataset) = self.fresh_snapshot() {
            tracing::debug!("dataset cache hit");
            return Ok(dataset);
        }

        tracing::debug!("dataset cache miss, fetching sheet");
        let dataset = Arc::new(normalize(store.fetch_all()?));
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(CachedDataset {
            loaded_at: Instant::now(),
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    pub fn invalidate(&self) {
        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        if slot.take().is_some() {
            tracing::info!("dataset cache invalidated");
        }
    }

    fn fresh_snapshot(&self) -> Option<Arc<Dataset>> {
        let slot = self.slot.read().unwrap_or_else(PoisonError::into_inner);
        let cached = slot.as_ref()?;
        if cached.loaded_at.elapsed() >= self.ttl {
            return None;
        }
        Some(Arc::clone(&cached.dataset))
    }
}
