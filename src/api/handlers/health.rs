//! Service health endpoint.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::store::UserStore;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    pub name: String,
    pub version: String,
    pub store: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Credential store is readable", body = Health),
        (status = 503, description = "Credential store is unreadable", body = Health)
    ),
    tag = "health"
)]
pub async fn health(store: Extension<Arc<UserStore>>) -> Response {
    let store_status = match store.load_all().await {
        Ok(_) => "ok",
        Err(err) => {
            error!("Credential store health check failed: {err}");
            "error"
        }
    };

    let health = Health {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store_status.to_string(),
    };

    let status = if store_status == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(health)).into_response()
}
