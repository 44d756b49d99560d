//! Route guard middleware.
//!
//! Classifies each request as authenticated or unauthenticated by verifying
//! the session token, then applies the public-route allow-list. Cookie
//! presence alone is never trusted; only a token that verifies counts.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;

use crate::api::handlers::auth::session::extract_session_token;
use crate::session::{self, SessionConfig};

/// Paths reachable without a valid session.
pub const PUBLIC_ROUTES: &[&str] = &["/", "/login", "/register", "/forgot-password"];

/// Pages that only make sense for signed-out visitors.
const AUTH_ROUTES: &[&str] = &["/login", "/register"];

/// Namespaces the guard never inspects: the API itself, service endpoints,
/// and static image assets.
const EXEMPT_PREFIXES: &[&str] = &["/api/", "/health", "/openapi.json", "/favicon.ico"];

const IMAGE_EXTENSIONS: &[&str] = &[".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

pub async fn guard(
    State(config): State<Arc<SessionConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if is_exempt(&path) {
        return next.run(request).await;
    }

    let authenticated = extract_session_token(request.headers())
        .and_then(|token| session::verify(&config, &token))
        .is_some();

    if authenticated && AUTH_ROUTES.contains(&path.as_str()) {
        return Redirect::temporary("/").into_response();
    }
    if !authenticated && !PUBLIC_ROUTES.contains(&path.as_str()) {
        return Redirect::temporary("/login").into_response();
    }
    next.run(request).await
}

fn is_exempt(path: &str) -> bool {
    EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
        || IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
