//! Cache Key Module
//!
//! Structured key for cached metadata collections.

use std::any::TypeId;

use crate::models::{MetadataRecord, RecordShape};

// == Cache Key ==
/// Identifies one cached collection: a category read through one record
/// type. The same category read as generic items and as typed definitions
/// lives under two keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub metadata_type: String,
    pub shape: RecordShape,
    /// Concrete record type the collection was built as
    record: TypeId,
}

impl CacheKey {
    /// Key for `metadata_type` read as records of type `T`.
    pub fn of<T: MetadataRecord>(metadata_type: impl Into<String>) -> Self {
        Self {
            metadata_type: metadata_type.into(),
            shape: T::SHAPE,
            record: TypeId::of::<T>(),
        }
    }

    /// True when this key belongs to `metadata_type`, whatever the shape.
    pub fn belongs_to(&self, metadata_type: &str) -> bool {
        self.metadata_type == metadata_type
    }
}
