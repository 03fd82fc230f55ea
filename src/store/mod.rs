//! Store Module
//!
//! Document storage boundary for metadata items and meetings. The cache
//! service and the HTTP layer only see the [`MetadataStore`] and
//! [`MeetingStore`] traits; [`DocumentStore`] picks the backend at startup.

mod memory;
pub mod seed;
mod sqlite;

#[cfg(test)]
pub(crate) mod testing;

use std::future::Future;

use thiserror::Error;

use crate::models::{Meeting, MetadataItem};

pub use memory::InMemoryStore;
pub use sqlite::SqliteStore;

// == Store Error ==
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document with the same key already exists
    #[error("document `{0}` already exists")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Metadata Store ==
/// Backing store for metadata documents, partitioned by `type`.
pub trait MetadataStore: Send + Sync + 'static {
    /// Active items of a category ordered by sort order ascending.
    fn query_by_type(
        &self,
        metadata_type: &str,
    ) -> impl Future<Output = StoreResult<Vec<MetadataItem>>> + Send;

    /// The active item with this category and value, if any.
    fn query_by_type_and_value(
        &self,
        metadata_type: &str,
        value: &str,
    ) -> impl Future<Output = StoreResult<Option<MetadataItem>>> + Send;

    fn exists_valid(
        &self,
        metadata_type: &str,
        value: &str,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Persists a new item, assigning an id when blank.
    fn create(&self, item: MetadataItem)
        -> impl Future<Output = StoreResult<MetadataItem>> + Send;

    /// Replaces the item with the same id and type. Returns false when absent.
    fn update(&self, item: MetadataItem) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Physically removes an item. Returns false when absent.
    fn delete(&self, id: &str, metadata_type: &str)
        -> impl Future<Output = StoreResult<bool>> + Send;
}

// == Meeting Store ==
pub trait MeetingStore: Send + Sync + 'static {
    /// All meetings ordered by start time.
    fn list_meetings(&self) -> impl Future<Output = StoreResult<Vec<Meeting>>> + Send;

    fn get_meeting(&self, id: &str) -> impl Future<Output = StoreResult<Option<Meeting>>> + Send;

    /// Persists a new meeting, assigning an id when blank.
    fn create_meeting(&self, meeting: Meeting)
        -> impl Future<Output = StoreResult<Meeting>> + Send;

    /// Replaces an existing meeting. Returns None when absent.
    fn update_meeting(
        &self,
        meeting: Meeting,
    ) -> impl Future<Output = StoreResult<Option<Meeting>>> + Send;
}

/// Returns the given id, or a fresh UUID when it is blank.
pub(crate) fn assign_id(id: &str) -> String {
    if id.trim().is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        id.to_string()
    }
}

// == Document Store ==
/// Backend selected from configuration.
#[derive(Clone)]
pub enum DocumentStore {
    Memory(InMemoryStore),
    Sqlite(SqliteStore),
}

impl DocumentStore {
    /// Opens the SQLite store when a URL is given, otherwise an empty
    /// in-memory store.
    pub async fn open(database_url: Option<&str>) -> StoreResult<Self> {
        match database_url {
            Some(url) => Ok(Self::Sqlite(SqliteStore::connect(url).await?)),
            None => Ok(Self::Memory(InMemoryStore::new())),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

impl MetadataStore for DocumentStore {
    async fn query_by_type(&self, metadata_type: &str) -> StoreResult<Vec<MetadataItem>> {
        match self {
            Self::Memory(s) => s.query_by_type(metadata_type).await,
            Self::Sqlite(s) => s.query_by_type(metadata_type).await,
        }
    }

    async fn query_by_type_and_value(
        &self,
        metadata_type: &str,
        value: &str,
    ) -> StoreResult<Option<MetadataItem>> {
        match self {
            Self::Memory(s) => s.query_by_type_and_value(metadata_type, value).await,
            Self::Sqlite(s) => s.query_by_type_and_value(metadata_type, value).await,
        }
    }

    async fn exists_valid(&self, metadata_type: &str, value: &str) -> StoreResult<bool> {
        match self {
            Self::Memory(s) => s.exists_valid(metadata_type, value).await,
            Self::Sqlite(s) => s.exists_valid(metadata_type, value).await,
        }
    }

    async fn create(&self, item: MetadataItem) -> StoreResult<MetadataItem> {
        match self {
            Self::Memory(s) => MetadataStore::create(s, item).await,
            Self::Sqlite(s) => MetadataStore::create(s, item).await,
        }
    }

    async fn update(&self, item: MetadataItem) -> StoreResult<bool> {
        match self {
            Self::Memory(s) => MetadataStore::update(s, item).await,
            Self::Sqlite(s) => MetadataStore::update(s, item).await,
        }
    }

    async fn delete(&self, id: &str, metadata_type: &str) -> StoreResult<bool> {
        match self {
            Self::Memory(s) => MetadataStore::delete(s, id, metadata_type).await,
            Self::Sqlite(s) => MetadataStore::delete(s, id, metadata_type).await,
        }
    }
}

impl MeetingStore for DocumentStore {
    async fn list_meetings(&self) -> StoreResult<Vec<Meeting>> {
        match self {
            Self::Memory(s) => s.list_meetings().await,
            Self::Sqlite(s) => s.list_meetings().await,
        }
    }

    async fn get_meeting(&self, id: &str) -> StoreResult<Option<Meeting>> {
        match self {
            Self::Memory(s) => s.get_meeting(id).await,
            Self::Sqlite(s) => s.get_meeting(id).await,
        }
    }

    async fn create_meeting(&self, meeting: Meeting) -> StoreResult<Meeting> {
        match self {
            Self::Memory(s) => s.create_meeting(meeting).await,
            Self::Sqlite(s) => s.create_meeting(meeting).await,
        }
    }

    async fn update_meeting(&self, meeting: Meeting) -> StoreResult<Option<Meeting>> {
        match self {
            Self::Memory(s) => s.update_meeting(meeting).await,
            Self::Sqlite(s) => s.update_meeting(meeting).await,
        }
    }
}
