//! In-memory document store
//!
//! Default backend when no database URL is configured. Also used by the
//! tests as a fast, isolated store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::{assign_id, MeetingStore, MetadataStore, StoreError, StoreResult};
use crate::models::{Meeting, MetadataItem, MEETING_TYPE};

/// Metadata documents keyed by (type, id).
type MetadataDocuments = HashMap<(String, String), MetadataItem>;

// == In-Memory Store ==
#[derive(Clone, Default)]
pub struct InMemoryStore {
    metadata: Arc<RwLock<MetadataDocuments>>,
    meetings: Arc<RwLock<HashMap<String, Meeting>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of metadata documents, active or not.
    pub async fn metadata_len(&self) -> usize {
        self.metadata.read().await.len()
    }
}

/// Rejects `item` when it is active and another active document of its type
/// already uses its value.
fn check_active_value(documents: &MetadataDocuments, item: &MetadataItem) -> StoreResult<()> {
    let taken = item.is_active
        && documents.values().any(|other| {
            other.is_active
                && other.id != item.id
                && other.metadata_type == item.metadata_type
                && other.value == item.value
        });
    if taken {
        return Err(StoreError::Conflict(format!(
            "{}/{}",
            item.metadata_type, item.value
        )));
    }
    Ok(())
}

impl MetadataStore for InMemoryStore {
    async fn query_by_type(&self, metadata_type: &str) -> StoreResult<Vec<MetadataItem>> {
        let documents = self.metadata.read().await;
        let mut items: Vec<MetadataItem> = documents
            .values()
            .filter(|item| item.metadata_type == metadata_type && item.is_active)
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.value.cmp(&b.value))
        });
        Ok(items)
    }

    async fn query_by_type_and_value(
        &self,
        metadata_type: &str,
        value: &str,
    ) -> StoreResult<Option<MetadataItem>> {
        let documents = self.metadata.read().await;
        Ok(documents
            .values()
            .find(|item| {
                item.metadata_type == metadata_type && item.value == value && item.is_active
            })
            .cloned())
    }

    async fn exists_valid(&self, metadata_type: &str, value: &str) -> StoreResult<bool> {
        Ok(self
            .query_by_type_and_value(metadata_type, value)
            .await?
            .is_some())
    }

    async fn create(&self, mut item: MetadataItem) -> StoreResult<MetadataItem> {
        item.id = assign_id(&item.id);

        let mut documents = self.metadata.write().await;
        let key = (item.metadata_type.clone(), item.id.clone());
        if documents.contains_key(&key) {
            return Err(StoreError::Conflict(item.id));
        }
        check_active_value(&documents, &item)?;

        debug!(id = %item.id, metadata_type = %item.metadata_type, "metadata document created");
        documents.insert(key, item.clone());
        Ok(item)
    }

    async fn update(&self, item: MetadataItem) -> StoreResult<bool> {
        let mut documents = self.metadata.write().await;
        if !documents.contains_key(&(item.metadata_type.clone(), item.id.clone())) {
            return Ok(false);
        }
        check_active_value(&documents, &item)?;

        match documents.get_mut(&(item.metadata_type.clone(), item.id.clone())) {
            Some(existing) => {
                *existing = item;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str, metadata_type: &str) -> StoreResult<bool> {
        let mut documents = self.metadata.write().await;
        Ok(documents
            .remove(&(metadata_type.to_string(), id.to_string()))
            .is_some())
    }
}

impl MeetingStore for InMemoryStore {
    async fn list_meetings(&self) -> StoreResult<Vec<Meeting>> {
        let meetings = self.meetings.read().await;
        let mut all: Vec<Meeting> = meetings.values().cloned().collect();
        all.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn get_meeting(&self, id: &str) -> StoreResult<Option<Meeting>> {
        Ok(self.meetings.read().await.get(id).cloned())
    }

    async fn create_meeting(&self, mut meeting: Meeting) -> StoreResult<Meeting> {
        meeting.id = assign_id(&meeting.id);
        meeting.meeting_type = MEETING_TYPE.to_string();

        let mut meetings = self.meetings.write().await;
        if meetings.contains_key(&meeting.id) {
            return Err(StoreError::Conflict(meeting.id));
        }
        meetings.insert(meeting.id.clone(), meeting.clone());
        Ok(meeting)
    }

    async fn update_meeting(&self, meeting: Meeting) -> StoreResult<Option<Meeting>> {
        let mut meetings = self.meetings.write().await;
        match meetings.get_mut(&meeting.id) {
            Some(existing) => {
                *existing = meeting.clone();
                Ok(Some(meeting))
            }
            None => Ok(None),
        }
    }
}
