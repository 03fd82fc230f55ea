//! Instrumented store for service tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{InMemoryStore, MetadataStore, StoreError, StoreResult};
use crate::models::MetadataItem;

/// Wraps [`InMemoryStore`], counting calls and optionally failing or
/// slowing down reads.
#[derive(Clone, Default)]
pub(crate) struct CountingStore {
    inner: InMemoryStore,
    type_queries: Arc<AtomicUsize>,
    value_queries: Arc<AtomicUsize>,
    updates: Arc<Mutex<Vec<MetadataItem>>>,
    fail_reads: Arc<AtomicBool>,
    read_delay: Option<Duration>,
}

impl CountingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_read_delay(delay: Duration) -> Self {
        Self {
            read_delay: Some(delay),
            ..Self::default()
        }
    }

    pub(crate) fn inner(&self) -> &InMemoryStore {
        &self.inner
    }

    pub(crate) fn type_queries(&self) -> usize {
        self.type_queries.load(Ordering::SeqCst)
    }

    pub(crate) fn value_queries(&self) -> usize {
        self.value_queries.load(Ordering::SeqCst)
    }

    pub(crate) fn updates(&self) -> Vec<MetadataItem> {
        self.updates.lock().unwrap().clone()
    }

    pub(crate) fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    async fn before_read(&self) -> StoreResult<()> {
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        Ok(())
    }
}

impl MetadataStore for CountingStore {
    async fn query_by_type(&self, metadata_type: &str) -> StoreResult<Vec<MetadataItem>> {
        self.type_queries.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        self.inner.query_by_type(metadata_type).await
    }

    async fn query_by_type_and_value(
        &self,
        metadata_type: &str,
        value: &str,
    ) -> StoreResult<Option<MetadataItem>> {
        self.value_queries.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        self.inner
            .query_by_type_and_value(metadata_type, value)
            .await
    }

    async fn exists_valid(&self, metadata_type: &str, value: &str) -> StoreResult<bool> {
        self.value_queries.fetch_add(1, Ordering::SeqCst);
        self.before_read().await?;
        self.inner.exists_valid(metadata_type, value).await
    }

    async fn create(&self, item: MetadataItem) -> StoreResult<MetadataItem> {
        self.inner.create(item).await
    }

    async fn update(&self, item: MetadataItem) -> StoreResult<bool> {
        self.updates.lock().unwrap().push(item.clone());
        self.inner.update(item).await
    }

    async fn delete(&self, id: &str, metadata_type: &str) -> StoreResult<bool> {
        self.inner.delete(id, metadata_type).await
    }
}
