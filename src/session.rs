//! Host-owned context tying a source, an HTTP client and a table cache together.

use std::sync::Arc;

use tracing::info;

use crate::error::PipelineError;
use crate::fetch::{BasicClient, HttpClient, Source};
use crate::metrics::{FilterOptions, FilterSelection, MetricsBundle, aggregate};
use crate::table::{CallTable, TableCache, load};

pub struct Session<C = BasicClient> {
    source: Source,
    client: C,
    cache: TableCache,
}

impl<C: HttpClient> Session<C> {
    pub fn new(source: Source, client: C, cache: TableCache) -> Self {
        Session {
            source,
            client,
            cache,
        }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// The cached table for this session's source, loading it on first use.
    ///
    /// Concurrent callers that miss the cache share one fetch.
    pub async fn table(&self) -> Result<Arc<CallTable>, PipelineError> {
        self.cache
            .get_or_load(&self.source.id(), load(&self.client, &self.source))
            .await
    }

    /// Drops the cached table and loads a fresh one.
    ///
    /// On failure the cache is left empty, so the next [`Session::table`] retries the fetch.
    pub async fn refresh(&self) -> Result<Arc<CallTable>, PipelineError> {
        if self.cache.invalidate(&self.source.id()).await {
            info!(source = %self.source, "Cached call sheet invalidated");
        }
        self.table().await
    }

    pub async fn options(&self) -> Result<FilterOptions, PipelineError> {
        Ok(FilterOptions::from_table(&*self.table().await?))
    }

    pub async fn metrics(&self, selection: &FilterSelection) -> Result<MetricsBundle, PipelineError> {
        Ok(aggregate(&*self.table().await?, selection))
    }
}
