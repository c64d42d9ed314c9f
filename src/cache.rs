//! Memoized dataset loads, keyed by input path.
//!
//! Built once at startup and handed to consumers by reference. The entry map
//! stays locked while a load runs, so each key has a single writer and is
//! loaded at most once. Failed loads are not stored.

use crate::model::Dataset;
use crate::table::LoadError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: Mutex<HashMap<PathBuf, Arc<Dataset>>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached dataset for `path`, loading it on first request.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Dataset>, LoadError> {
        self.get_or_load_with(path, Dataset::load)
    }

    pub fn get_or_load_with<F>(&self, path: &Path, load: F) -> Result<Arc<Dataset>, LoadError>
    where
        F: FnOnce(&Path) -> Result<Dataset, LoadError>,
    {
        let key = cache_key(path);
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(hit) = entries.get(&key) {
            debug!(path = %key.display(), "dataset cache hit");
            return Ok(Arc::clone(hit));
        }

        debug!(path = %key.display(), "dataset cache miss");
        let dataset = Arc::new(load(path)?);
        entries.insert(key, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Same file under different spellings shares one entry.
fn cache_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize;
    use crate::schema::ColumnMapping;
    use crate::table::{Cell, RawTable};
    use std::cell::Cell as Counter;

    fn tiny_dataset(_: &Path) -> Result<Dataset, LoadError> {
        let raw = RawTable::from_rows(vec!["UF".into()], vec![vec![Cell::Text("SP".into())]]);
        let mapping = ColumnMapping::build(&raw.column_names());
        Ok(Dataset {
            table: normalize(raw, &mapping),
            mapping,
        })
    }

    #[test]
    fn loads_each_key_once() {
        let cache = DatasetCache::new();
        let calls = Counter::new(0);
        let load = |p: &Path| {
            calls.set(calls.get() + 1);
            tiny_dataset(p)
        };

        let a = cache.get_or_load_with(Path::new("painel.csv"), load).unwrap();
        let b = cache.get_or_load_with(Path::new("painel.csv"), load).unwrap();
        let _ = cache.get_or_load_with(Path::new("outro.csv"), load).unwrap();

        assert_eq!(calls.get(), 2);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_load_is_not_cached() {
        let cache = DatasetCache::new();
        let missing = Path::new("/nonexistent/sisdepen.xlsx");

        let err = cache.get_or_load(missing).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
        assert_eq!(cache.len(), 0);

        // A later successful load for the same key is stored.
        cache.get_or_load_with(missing, tiny_dataset).unwrap();
        assert_eq!(cache.len(), 1);
    }
}
