//! OpenAPI documentation for the JSON endpoints.

use axum::Json;
use utoipa::OpenApi;

use super::handlers;
use crate::api::handlers::auth::types::{
    ErrorResponse, LoginRequest, RegisterRequest, RegisterResponse, SessionResponse,
};
use crate::api::handlers::health::Health;
use crate::store::PublicUser;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register::register,
        handlers::auth::login::login,
        handlers::auth::session::session,
        handlers::auth::session::logout,
        handlers::health::health,
    ),
    components(schemas(
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        SessionResponse,
        ErrorResponse,
        PublicUser,
        Health,
    )),
    tags(
        (name = "auth", description = "Registration, login, and session endpoints"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
