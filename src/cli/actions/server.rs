//! Server action: assemble the store and session state, then serve.

use crate::{api, session::SessionConfig, store::UserStore};
use anyhow::Result;
use secrecy::SecretString;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub store_path: String,
    pub session_secret: Option<String>,
    pub session_ttl_seconds: i64,
    pub cookie_secure: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the credential store cannot be initialized or the
/// server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let session = match args.session_secret {
        Some(secret) => SessionConfig::new(SecretString::from(secret)),
        None => SessionConfig::with_insecure_dev_secret(),
    }
    .with_ttl_seconds(args.session_ttl_seconds)
    .with_cookie_secure(args.cookie_secure);

    if session.uses_insecure_dev_secret() {
        warn!(
            "TOPUP_AUTH_SESSION_SECRET is not set; session tokens are signed with the insecure development fallback"
        );
    }

    let store = Arc::new(UserStore::new(args.store_path));

    api::new(args.port, store, Arc::new(session)).await
}
