use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::ClientResult;
use crate::dataset::{Dataset, DatasetCache, Transaction};
use crate::setup::{SetupContext, resolve, resolve_at};
use crate::store::{CsvSheetStore, RecordStore};

/// A record store paired with its dataset cache.
///
/// Every command reads through one session. Appends go through
/// [`Session::append`] so the cache is invalidated before the next read.
pub struct Session {
    source: String,
    store: Box<dyn RecordStore>,
    cache: DatasetCache,
}

impl Session {
    pub fn open() -> ClientResult<Self> {
        Ok(Self::from_setup(&resolve()?))
    }

    pub fn open_at(home: &Path) -> ClientResult<Self> {
        Ok(Self::from_setup(&resolve_at(home)?))
    }

    pub fn open_with_home_override(home_override: Option<&Path>) -> ClientResult<Self> {
        match home_override {
            Some(home) => Self::open_at(home),
            None => Self::open(),
        }
    }

    pub fn from_setup(setup: &SetupContext) -> Self {
        Self::with_store(
            Box::new(CsvSheetStore::new(setup.sheet_path.clone())),
            setup.cache_ttl,
            &setup.sheet_path.display().to_string(),
        )
    }

    pub fn with_store(store: Box<dyn RecordStore>, cache_ttl: Duration, source: &str) -> Self {
        Self {
            source: source.to_string(),
            store,
            cache: DatasetCache::new(cache_ttl),
        }
    }

    /// Human-readable location of the backing sheet.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn dataset(&self) -> ClientResult<Arc<Dataset>> {
        self.cache.get_or_load(self.store.as_ref())
    }

    pub fn append(&self, rows: &[Transaction]) -> ClientResult<usize> {
        let written = self.store.append(rows)?;
        self.cache.invalidate();
        Ok(written)
    }

    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("source", &self.source)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
