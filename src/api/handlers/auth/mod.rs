//! Registration, login, and session handlers.

pub mod login;
pub mod register;
pub mod session;
pub mod types;

mod utils;

#[cfg(test)]
mod tests;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use types::ErrorResponse;

/// Opaque login failure message. Never distinguishes an unknown email from a
/// wrong password, so the response shape cannot be used for enumeration.
pub(crate) const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

pub(crate) fn error_message(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
        }),
    )
        .into_response()
}
