//! Admin Guard
//!
//! Middleware for routes that change metadata.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::AppState;
use crate::error::{AppError, Result};

/// Rejects requests without `Authorization: Bearer <admin token>`.
///
/// Passes everything through when no admin token is configured.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if let Some(expected) = state.admin_token.as_deref() {
        let authorized = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .is_some_and(|provided| constant_time_eq(provided, expected));

        if !authorized {
            warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "rejected admin request"
            );
            return Err(AppError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}

/// Constant-time string comparison so token checks do not leak a prefix match
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
