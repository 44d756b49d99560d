//! Credentials login endpoint; issues the signed session cookie.

use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::session::{self, SessionConfig};
use crate::store::{StoreError, User, UserStore};

use super::session::session_cookie;
use super::types::{ErrorResponse, LoginRequest, SessionResponse};
use super::{error_message, INVALID_CREDENTIALS_MESSAGE};

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; session cookie set", body = SessionResponse),
        (status = 400, description = "Missing payload", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Credential store failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    store: Extension<Arc<UserStore>>,
    config: Extension<Arc<SessionConfig>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return error_message(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let user = match authorize(&store, &request.email, &request.password).await {
        Ok(Some(user)) => user,
        // One opaque refusal for both unknown email and wrong password.
        Ok(None) => return error_message(StatusCode::UNAUTHORIZED, INVALID_CREDENTIALS_MESSAGE),
        Err(err) => {
            error!("Login lookup failed: {err}");
            return error_message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let public = user.to_public();
    let token = match session::issue(&config, &public) {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to issue session token: {err}");
            return error_message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let mut headers = HeaderMap::new();
    match session_cookie(&config, &token) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return error_message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    }

    info!(user.id = %public.id, "login succeeded");
    (StatusCode::OK, headers, Json(SessionResponse { user: public })).into_response()
}

/// Check credentials against the store.
///
/// `None` when either field is empty or nothing matches; the caller must not
/// distinguish the two.
///
/// # Errors
/// Returns an I/O or corruption error from the store.
pub(crate) async fn authorize(
    store: &UserStore,
    email: &str,
    password: &str,
) -> Result<Option<User>, StoreError> {
    if email.is_empty() || password.is_empty() {
        return Ok(None);
    }
    store.find_by_credentials(email, password).await
}
