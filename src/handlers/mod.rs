use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;

pub mod accounts;
pub mod health;
pub mod shares;

/// Header carrying the id of the user the request acts for.
pub const USER_ID_HEADER: &str = "x-user-id";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route(
            "/api/v1/accounts",
            post(accounts::create_account).get(accounts::list_accounts),
        )
        .route(
            "/api/v1/accounts/{id}",
            get(accounts::get_account)
                .put(accounts::update_account)
                .delete(accounts::delete_account),
        )
        .route("/api/v1/shares/applied", get(shares::list_applied_shares))
        .route("/api/v1/shares/applied/{id}", get(shares::get_applied_share))
        .route("/api/v1/shares/errors", get(shares::list_applied_share_errors))
        .route("/api/v1/shares/errors/seen", post(shares::mark_errors_seen))
        .with_state(state)
}

/// Resolve the calling user from the `X-User-Id` header.
fn require_user(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| {
            tracing::warn!("Missing or invalid user id header");
            ApiError::Unauthorized("Missing or invalid user id".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_require_user() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(require_user(&headers).unwrap(), id);

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(matches!(require_user(&headers), Err(ApiError::Unauthorized(_))));

        assert!(require_user(&HeaderMap::new()).is_err());
    }
}
