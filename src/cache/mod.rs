//! Cache Module
//!
//! In-memory metadata cache layered over a [`MetadataStore`](crate::store::MetadataStore).

mod key;
mod service;
mod stats;


// Re-export public types
pub use key::CacheKey;
pub use service::MetadataService;
pub use stats::{CacheCounters, CacheStats};
