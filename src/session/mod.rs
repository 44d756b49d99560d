//! Signed session tokens.
//!
//! A successful login is wrapped into an HS256 token carrying the
//! password-free identity (`sub` = user id, plus `name`, `email`, `image`).
//! Later requests rebuild the session view from the verified claims alone;
//! the credential store is never re-read for it.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::PublicUser;

/// Cookie carrying the session token.
pub const SESSION_COOKIE_NAME: &str = "auth_token";

/// Development fallback used when no signing secret is configured.
/// Deployments must set their own secret; the server logs a warning whenever
/// this value is in use.
pub const INSECURE_DEV_SECRET: &str = "default_secret_key_for_development";

const DEFAULT_SESSION_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Signing secret and cookie parameters for issued sessions.
pub struct SessionConfig {
    secret: SecretString,
    ttl_seconds: i64,
    cookie_secure: bool,
}

impl SessionConfig {
    #[must_use]
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            cookie_secure: false,
        }
    }

    /// Config signed with [`INSECURE_DEV_SECRET`], for when no secret is set.
    #[must_use]
    pub fn with_insecure_dev_secret() -> Self {
        Self::new(SecretString::from(INSECURE_DEV_SECRET.to_string()))
    }

    #[must_use]
    pub fn with_ttl_seconds(mut self, seconds: i64) -> Self {
        self.ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// True when tokens are signed with the hardcoded development fallback.
    #[must_use]
    pub fn uses_insecure_dev_secret(&self) -> bool {
        self.secret.expose_secret() == INSECURE_DEV_SECRET
    }

    fn key_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}

/// Claim set carried in the session token.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionClaims {
    /// User id.
    pub sub: String,
    pub name: String,
    pub email: String,
    pub image: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Rebuild the public identity from verified claims.
    #[must_use]
    pub fn to_public_user(&self) -> PublicUser {
        PublicUser {
            id: self.sub.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
        }
    }
}

/// Sign a session token for an authenticated user.
///
/// # Errors
/// Returns an error if token encoding fails.
pub fn issue(
    config: &SessionConfig,
    user: &PublicUser,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = SessionClaims {
        sub: user.id.clone(),
        name: user.name.clone(),
        email: user.email.clone(),
        image: user.image.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(config.ttl_seconds)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.key_bytes()),
    )
}

/// Decode and verify a session token.
///
/// Absent, tampered, or expired evidence all come back as `None`; the guard
/// treats every one of them as an unauthenticated request.
#[must_use]
pub fn verify(config: &SessionConfig, token: &str) -> Option<SessionClaims> {
    match decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.key_bytes()),
        &Validation::default(),
    ) {
        Ok(data) => Some(data.claims),
        Err(err) => {
            debug!("session token rejected: {err}");
            None
        }
    }
}
