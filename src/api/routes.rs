//! API Routes
//!
//! Configures the Axum router with all meetings service endpoints.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::auth::require_admin;
use super::handlers::{health_handler, stats_handler, AppState};
use super::meetings::{create_meeting, get_meeting, list_meetings, update_meeting};
use super::metadata::{
    create_metadata_item, delete_metadata_item, get_attendance_modes, get_event_statuses,
    get_metadata_by_type, refresh_metadata_cache, update_metadata_item,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - Admin guard: bearer token on metadata writes when configured
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Metadata writes sit behind the admin guard
    let admin = Router::new()
        .route(
            "/api/metadata",
            post(create_metadata_item).put(update_metadata_item),
        )
        .route("/api/metadata/refresh", post(refresh_metadata_cache))
        .route("/api/metadata/:type/:id", delete(delete_metadata_item))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/api/metadata/eventStatuses", get(get_event_statuses))
        .route("/api/metadata/attendanceModes", get(get_attendance_modes))
        .route("/api/metadata/:type", get(get_metadata_by_type))
        .route("/api/meetings", get(list_meetings).post(create_meeting))
        .route("/api/meetings/:id", get(get_meeting).put(update_meeting))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .merge(admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{seed, DocumentStore, InMemoryStore};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    async fn create_test_app(admin_token: Option<&str>) -> Router {
        let store = InMemoryStore::new();
        seed::seed_metadata(&store).await.unwrap();
        let state = AppState::new(DocumentStore::Memory(store));
        let state = match admin_token {
            Some(token) => state.with_admin_token(token),
            None => state,
        };
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app(None).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app(None).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_static_routes_win_over_type_param() {
        let app = create_test_app(None).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/metadata/eventStatuses")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_refresh_is_post_only() {
        let app = create_test_app(None).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/metadata/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_admin_route_requires_token() {
        let app = create_test_app(Some("secret")).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/metadata/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/metadata/refresh")
                    .header("authorization", "Bearer secret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_read_routes_ignore_admin_token() {
        let app = create_test_app(Some("secret")).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/metadata/attendanceModes")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_meeting_not_found() {
        let app = create_test_app(None).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/meetings/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
