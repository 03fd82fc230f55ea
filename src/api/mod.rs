//! API Module
//!
//! HTTP handlers and routing for the meetings service REST API.
//!
//! # Endpoints
//! - `GET /api/metadata/eventStatuses` - Event status vocabulary
//! - `GET /api/metadata/attendanceModes` - Attendance mode vocabulary
//! - `GET /api/metadata/:type` - Any metadata category
//! - `POST|PUT /api/metadata`, `DELETE /api/metadata/:type/:id`,
//!   `POST /api/metadata/refresh` - Admin metadata maintenance
//! - `GET|POST /api/meetings`, `GET|PUT /api/meetings/:id` - Meetings
//! - `GET /stats` - Metadata cache statistics
//! - `GET /health` - Health check endpoint

pub mod auth;
pub mod handlers;
pub mod meetings;
pub mod metadata;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
