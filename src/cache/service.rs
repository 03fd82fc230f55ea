//! Metadata Service Module
//!
//! Cache-aware access to metadata collections. Reads are served from an
//! in-memory map keyed by (type, record shape); writes go straight to the
//! store and the caller decides when to refresh.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::cache::{CacheCounters, CacheKey, CacheStats};
use crate::error::{AppError, Result};
use crate::models::{
    AttendanceModeDefinition, EventStatusDefinition, MetadataItem, MetadataRecord,
    ATTENDANCE_MODE_TYPE, EVENT_STATUS_TYPE,
};
use crate::store::MetadataStore;

/// A cached `Vec<T>` for the record type recorded in its key.
type CachedCollection = Arc<dyn Any + Send + Sync>;

// == Metadata Service ==
pub struct MetadataService<S> {
    store: S,
    /// Cached collections
    entries: RwLock<HashMap<CacheKey, CachedCollection>>,
    /// Held across a miss's store fetch and during refreshes, so concurrent
    /// misses collapse into one fetch and a refresh never interleaves with
    /// a population.
    populate: Mutex<()>,
    counters: CacheCounters,
}

impl<S: MetadataStore> MetadataService<S> {
    // == Constructor ==
    pub fn new(store: S) -> Self {
        Self {
            store,
            entries: RwLock::new(HashMap::new()),
            populate: Mutex::new(()),
            counters: CacheCounters::new(),
        }
    }

    /// Borrows the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn cached<T: MetadataRecord>(&self, key: &CacheKey) -> Option<Vec<T>> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .and_then(|collection| (**collection).downcast_ref::<Vec<T>>())
            .cloned()
    }

    // == Get Items ==
    /// Returns every active item of `metadata_type` as records of shape `T`.
    ///
    /// The first call per (type, shape) fetches from the store and caches the
    /// full list, even when empty. Store failures propagate and leave the
    /// key unpopulated.
    pub async fn get_items<T: MetadataRecord>(&self, metadata_type: &str) -> Result<Vec<T>> {
        let key = CacheKey::of::<T>(metadata_type);

        if let Some(items) = self.cached::<T>(&key).await {
            self.counters.record_hit();
            return Ok(items);
        }

        let _populating = self.populate.lock().await;

        // Another caller may have filled the key while we waited
        if let Some(items) = self.cached::<T>(&key).await {
            self.counters.record_hit();
            return Ok(items);
        }

        self.counters.record_miss();
        self.counters.record_fetch();
        let items: Vec<T> = self
            .store
            .query_by_type(metadata_type)
            .await?
            .into_iter()
            .map(T::from_item)
            .collect();

        debug!(
            metadata_type,
            shape = ?T::SHAPE,
            count = items.len(),
            "metadata cache populated"
        );
        self.entries
            .write()
            .await
            .insert(key, Arc::new(items.clone()));

        Ok(items)
    }

    // == Get Item By Value ==
    /// First item of `metadata_type` whose value matches, read through the cache.
    pub async fn get_item_by_value<T: MetadataRecord>(
        &self,
        metadata_type: &str,
        value: &str,
    ) -> Result<Option<T>> {
        let items = self.get_items::<T>(metadata_type).await?;
        Ok(items.into_iter().find(|item| item.value() == value))
    }

    // == Is Valid Value ==
    /// True iff an active item with exactly this type and value is cached.
    pub async fn is_valid_value(&self, metadata_type: &str, value: &str) -> Result<bool> {
        let items = self.get_items::<MetadataItem>(metadata_type).await?;
        Ok(items
            .iter()
            .any(|item| item.value == value && item.is_active))
    }

    // == Typed Accessors ==
    pub async fn event_statuses(&self) -> Result<Vec<EventStatusDefinition>> {
        self.get_items(EVENT_STATUS_TYPE).await
    }

    pub async fn attendance_modes(&self) -> Result<Vec<AttendanceModeDefinition>> {
        self.get_items(ATTENDANCE_MODE_TYPE).await
    }

    /// Warms the cache with the vocabularies every meeting page needs.
    pub async fn preload_common(&self) -> Result<()> {
        let statuses = self.event_statuses().await?;
        let modes = self.attendance_modes().await?;
        info!(
            event_statuses = statuses.len(),
            attendance_modes = modes.len(),
            "metadata cache preloaded"
        );
        Ok(())
    }

    // == Writes ==
    /// Persists a new item. The cache is not touched.
    pub async fn create_item(&self, item: MetadataItem) -> Result<MetadataItem> {
        let created = self.store.create(item).await?;
        info!(id = %created.id, metadata_type = %created.metadata_type, "metadata item created");
        Ok(created)
    }

    /// Replaces an existing item. The cache is not touched.
    ///
    /// Values must be alphanumeric; anything else is rejected before the
    /// store is called. Returns false when no item has this id and type.
    pub async fn update_item(&self, item: MetadataItem) -> Result<bool> {
        if !item.value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::Validation(
                "Metadata value contains invalid characters. Only alphanumeric characters are allowed."
                    .to_string(),
            ));
        }

        let id = item.id.clone();
        let updated = self.store.update(item).await?;
        debug!(id = %id, updated, "metadata item update");
        Ok(updated)
    }

    /// Removes an item. The cache is not touched.
    pub async fn delete_item(&self, id: &str, metadata_type: &str) -> Result<bool> {
        let deleted = self.store.delete(id, metadata_type).await?;
        debug!(id, metadata_type, deleted, "metadata item delete");
        Ok(deleted)
    }

    // == Refresh ==
    /// Drops every cached shape of `metadata_type`, or the whole cache when
    /// no type is given. Refreshing an uncached type is a no-op.
    pub async fn refresh_cache(&self, metadata_type: Option<&str>) {
        let _populating = self.populate.lock().await;
        let mut entries = self.entries.write().await;

        let before = entries.len();
        match metadata_type {
            Some(metadata_type) => entries.retain(|key, _| !key.belongs_to(metadata_type)),
            None => entries.clear(),
        }
        self.counters.record_invalidation();

        debug!(
            metadata_type = metadata_type.unwrap_or("*"),
            dropped = before - entries.len(),
            "metadata cache refreshed"
        );
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        let cached_keys = self.entries.read().await.len();
        self.counters.snapshot(cached_keys)
    }

    /// True when a collection for (type, shape of `T`) is cached.
    pub async fn is_cached<T: MetadataRecord>(&self, metadata_type: &str) -> bool {
        let key = CacheKey::of::<T>(metadata_type);
        self.entries.read().await.contains_key(&key)
    }
}
