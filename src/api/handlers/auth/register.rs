//! Registration endpoint for the storefront.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::store::{password, NewUser, StoreError, UserStore};

use super::error_message;
use super::types::{ErrorResponse, RegisterRequest, RegisterResponse};
use super::utils::{avatar_url, valid_email};

const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: name, email, or password";

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Missing fields or invalid email", body = ErrorResponse),
        (status = 409, description = "A user with this email already exists", body = ErrorResponse),
        (status = 500, description = "Credential store failure", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    store: Extension<Arc<UserStore>>,
    payload: Option<Json<RegisterRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return error_message(StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE);
    };
    if request.name.is_empty() || request.email.is_empty() || request.password.is_empty() {
        return error_message(StatusCode::BAD_REQUEST, MISSING_FIELDS_MESSAGE);
    }
    // Format check runs before the store is touched.
    if !valid_email(&request.email) {
        return error_message(StatusCode::BAD_REQUEST, "Invalid email format");
    }

    let password_hash = match password::hash(&request.password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Failed to hash password: {err}");
            return error_message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let new_user = NewUser {
        image: avatar_url(&request.name),
        name: request.name,
        email: request.email,
        password_hash,
    };

    match store.insert(new_user).await {
        Ok(user) => {
            info!(user.id = %user.id, "registered new user");
            (
                StatusCode::CREATED,
                Json(RegisterResponse {
                    message: "User registered successfully".to_string(),
                    user: user.to_public(),
                }),
            )
                .into_response()
        }
        Err(StoreError::EmailExists) => {
            error_message(StatusCode::CONFLICT, "User with this email already exists")
        }
        Err(err) => {
            error!("Registration failed: {err}");
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}
