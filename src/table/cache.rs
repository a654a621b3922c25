//! Loaded call sheets keyed by source identity.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use crate::error::PipelineError;
use crate::table::loader::CallTable;

/// One entry per source; a session rarely sees more than a handful.
const MAX_SOURCES: u64 = 16;

/// Shared handles to immutable tables.
///
/// Concurrent misses on the same key share a single load. Invalidating or
/// replacing an entry never touches tables already handed out.
#[derive(Clone)]
pub struct TableCache {
    tables: Cache<String, Arc<CallTable>>,
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TableCache {
    /// Entries live until invalidated or evicted.
    pub fn new() -> Self {
        TableCache {
            tables: Cache::builder().max_capacity(MAX_SOURCES).build(),
        }
    }

    /// Entries expire `max_age` after they were loaded.
    pub fn with_max_age(max_age: Duration) -> Self {
        TableCache {
            tables: Cache::builder()
                .max_capacity(MAX_SOURCES)
                .time_to_live(max_age)
                .build(),
        }
    }

    pub async fn get(&self, key: &str) -> Option<Arc<CallTable>> {
        self.tables.get(key).await
    }

    /// Stores `table` under `key`, replacing any previous entry, and returns the shared handle.
    pub async fn insert(&self, key: &str, table: CallTable) -> Arc<CallTable> {
        let table = Arc::new(table);
        self.tables.insert(key.to_string(), Arc::clone(&table)).await;
        table
    }

    /// Returns the cached table for `key`, running `load` on a miss.
    ///
    /// Callers racing on the same missing key wait for one `load`. A failed
    /// load is not cached.
    #[instrument(skip(self, load))]
    pub async fn get_or_load<F>(&self, key: &str, load: F) -> Result<Arc<CallTable>, PipelineError>
    where
        F: Future<Output = Result<CallTable, PipelineError>>,
    {
        self.tables
            .try_get_with(key.to_string(), async move {
                debug!("Cache miss, loading call sheet");
                load.await.map(Arc::new)
            })
            .await
            .map_err(Arc::unwrap_or_clone)
    }

    /// Drops the entry for `key`. Returns whether a live one was present.
    pub async fn invalidate(&self, key: &str) -> bool {
        let present = self.tables.contains_key(key);
        self.tables.invalidate(key).await;
        present
    }

    pub fn clear(&self) {
        self.tables.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::record::{CallRecord, CountField};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn table_with(rows: usize) -> CallTable {
        let records = (0..rows)
            .map(|_| CallRecord::new(None, None, [Some(0.0); CountField::COUNT]))
            .collect();
        CallTable::from_records(records)
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = TableCache::new();
        assert!(cache.get("sheet").await.is_none());
    }

    #[tokio::test]
    async fn test_insert_then_get_shares_table() {
        let cache = TableCache::new();
        let inserted = cache.insert("sheet", table_with(2)).await;
        let fetched = cache.get("sheet").await.unwrap();

        assert!(Arc::ptr_eq(&inserted, &fetched));
        assert_eq!(fetched.len(), 2);
    }

    #[tokio::test]
    async fn test_replace_leaves_old_handle_intact() {
        let cache = TableCache::new();
        let old = cache.insert("sheet", table_with(1)).await;
        cache.insert("sheet", table_with(3)).await;

        assert_eq!(old.len(), 1);
        assert_eq!(cache.get("sheet").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let cache = TableCache::new();
        cache.insert("sheet", table_with(1)).await;

        assert!(cache.invalidate("sheet").await);
        assert!(!cache.invalidate("sheet").await);
        assert!(cache.get("sheet").await.is_none());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = TableCache::new();
        cache.insert("a", table_with(1)).await;
        cache.insert("b", table_with(2)).await;
        cache.invalidate("a").await;

        assert!(cache.get("a").await.is_none());
        assert_eq!(cache.get("b").await.unwrap().len(), 2);

        cache.clear();
        assert!(cache.get("b").await.is_none());
    }

    #[tokio::test]
    async fn test_entries_expire_after_max_age() {
        let cache = TableCache::with_max_age(Duration::from_millis(50));
        cache.insert("sheet", table_with(1)).await;
        assert!(cache.get("sheet").await.is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.get("sheet").await.is_none());
    }

    #[tokio::test]
    async fn test_get_or_load_runs_loader_once() {
        let cache = TableCache::new();
        let loads = AtomicUsize::new(0);
        let counter = &loads;
        let loader = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, PipelineError>(table_with(2))
        };

        let (a, b) = tokio::join!(
            cache.get_or_load("sheet", loader()),
            cache.get_or_load("sheet", loader())
        );
        let c = cache.get_or_load("sheet", loader()).await.unwrap();

        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(c.len(), 2);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let cache = TableCache::new();
        let err = cache
            .get_or_load("sheet", async {
                Err(PipelineError::source_unavailable("sheet", "offline"))
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));

        let table = cache
            .get_or_load("sheet", async { Ok(table_with(1)) })
            .await
            .unwrap();
        assert_eq!(table.len(), 1);
    }
}
