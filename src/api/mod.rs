//! HTTP server assembly: routes, layers, and lifecycle.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;

use crate::{session::SessionConfig, store::UserStore};

pub mod guard;
pub mod handlers;
mod openapi;

pub use openapi::ApiDoc;

/// Start the server.
///
/// # Errors
/// Returns an error if the credential store cannot be initialized or the
/// listener fails.
pub async fn new(port: u16, store: Arc<UserStore>, session: Arc<SessionConfig>) -> Result<()> {
    store
        .initialize()
        .await
        .context("Failed to initialize the credential store")?;

    let app = router(store, session);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

/// Build the full router. Shared with the handler tests so they exercise the
/// same layer stack the server runs.
#[must_use]
pub fn router(store: Arc<UserStore>, session: Arc<SessionConfig>) -> Router {
    Router::new()
        .route("/", get(handlers::pages::home))
        .route("/login", get(handlers::pages::login))
        .route("/register", get(handlers::pages::register))
        .route("/forgot-password", get(handlers::pages::forgot_password))
        .route("/profile", get(handlers::pages::profile))
        .route("/health", get(handlers::health::health))
        .route("/openapi.json", get(openapi::openapi_json))
        .route("/api/auth/register", post(handlers::auth::register::register))
        .route("/api/auth/login", post(handlers::auth::login::login))
        .route("/api/auth/session", get(handlers::auth::session::session))
        .route("/api/auth/logout", post(handlers::auth::session::logout))
        .fallback(handlers::pages::not_found)
        .layer(middleware::from_fn_with_state(session.clone(), guard::guard))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &Request<Body>| {
                        HeaderValue::from_str(Ulid::new().to_string().as_str()).ok()
                    },
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(store))
                .layer(Extension(session)),
        )
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
