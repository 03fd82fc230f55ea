//! Orbital - A meetings event-listing service
//!
//! Serves meetings and the controlled vocabularies they reference, with a
//! single-flight metadata cache in front of a document store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::AppState;
pub use cache::MetadataService;
pub use config::Config;
pub use store::DocumentStore;
