//! Minimal page stubs.
//!
//! The storefront's real pages (catalog, reviews, checkout UI) are rendered
//! by the frontend and are not part of this service; these handlers exist so
//! the route guard has concrete pages to protect and redirect between.

use axum::{http::StatusCode, response::Html};

pub async fn home() -> Html<&'static str> {
    Html("<h1>Game Top-Up Store</h1>")
}

pub async fn login() -> Html<&'static str> {
    Html("<h1>Sign in</h1>")
}

pub async fn register() -> Html<&'static str> {
    Html("<h1>Create an account</h1>")
}

pub async fn forgot_password() -> Html<&'static str> {
    Html("<h1>Reset your password</h1>")
}

pub async fn profile() -> Html<&'static str> {
    Html("<h1>Your profile</h1>")
}

pub async fn not_found() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html("<h1>Page not found</h1>"))
}
