//! Handler tests exercising the full router, layer stack included.
//!
//! Each test builds a fresh router over a temp-dir store, so the scenarios
//! start from an empty credential file unless they register users first.

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, StatusCode,
    },
    Router,
};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::{
    api,
    session::{self, SessionConfig},
    store::UserStore,
};

const TEST_SECRET: &str = "handler-test-secret";

struct TestApp {
    router: Router,
    store: Arc<UserStore>,
    session: Arc<SessionConfig>,
    _dir: TempDir,
}

fn test_app() -> Result<TestApp> {
    let dir = tempfile::tempdir()?;
    let store = Arc::new(UserStore::new(dir.path().join("users.json")));
    let session = Arc::new(SessionConfig::new(SecretString::from(
        TEST_SECRET.to_string(),
    )));
    let router = api::router(store.clone(), session.clone());
    Ok(TestApp {
        router,
        store,
        session,
        _dir: dir,
    })
}

async fn post_json(
    app: &TestApp,
    uri: &str,
    body: Value,
) -> Result<(StatusCode, Value, Option<String>)> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))?;
    let response = app.router.clone().oneshot(request).await?;

    let status = response.status();
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, value, set_cookie))
}

async fn get_page(
    app: &TestApp,
    uri: &str,
    cookie: Option<&str>,
) -> Result<(StatusCode, Option<String>)> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let response = app.router.clone().oneshot(builder.body(Body::empty())?).await?;

    let status = response.status();
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    Ok((status, location))
}

fn ann() -> Value {
    json!({"name": "Ann Lee", "email": "ann@x.com", "password": "p1!aaaaaa"})
}

/// Register Ann, log her in, and return the `auth_token=<jwt>` cookie pair.
async fn register_and_login(app: &TestApp) -> Result<String> {
    let (status, _, _) = post_json(app, "/api/auth/register", ann()).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, set_cookie) = post_json(
        app,
        "/api/auth/login",
        json!({"email": "ann@x.com", "password": "p1!aaaaaa"}),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);

    let set_cookie = set_cookie.context("login should set a cookie")?;
    let pair = set_cookie
        .split(';')
        .next()
        .context("cookie pair missing")?
        .to_string();
    assert!(pair.starts_with("auth_token="));
    Ok(pair)
}

#[tokio::test]
async fn register_creates_user_and_never_returns_password() -> Result<()> {
    let app = test_app()?;
    let (status, body, _) = post_json(&app, "/api/auth/register", ann()).await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["id"], "1");
    assert_eq!(body["user"]["name"], "Ann Lee");
    assert_eq!(body["user"]["email"], "ann@x.com");
    assert!(body["user"]["image"]
        .as_str()
        .context("image missing")?
        .contains("AL"));
    assert!(body["user"].get("password").is_none());
    assert!(!body.to_string().contains("p1!aaaaaa"));

    // The stored record carries a hash, not the plaintext.
    let users = app.store.load_all().await?;
    assert_eq!(users.len(), 1);
    assert!(users[0].password_hash.starts_with("$argon2id$"));
    Ok(())
}

#[tokio::test]
async fn register_rejects_missing_fields() -> Result<()> {
    let app = test_app()?;

    let (status, body, _) = post_json(
        &app,
        "/api/auth/register",
        json!({"email": "ann@x.com", "password": "p1!aaaaaa"}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Missing required fields: name, email, or password"
    );

    let (status, _, _) = post_json(
        &app,
        "/api/auth/register",
        json!({"name": "Ann Lee", "email": "ann@x.com", "password": ""}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn register_rejects_invalid_email_before_touching_the_store() -> Result<()> {
    let app = test_app()?;
    let (status, body, _) = post_json(
        &app,
        "/api/auth/register",
        json!({"name": "Ann Lee", "email": "not-an-email", "password": "p1!aaaaaa"}),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid email format");
    assert!(!app.store.path().exists());
    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_email_regardless_of_other_fields() -> Result<()> {
    let app = test_app()?;
    let (status, _, _) = post_json(&app, "/api/auth/register", ann()).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body, _) = post_json(
        &app,
        "/api/auth/register",
        json!({"name": "Different Name", "email": "ann@x.com", "password": "other9!pw"}),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "User with this email already exists");
    Ok(())
}

#[tokio::test]
async fn registered_ids_are_strictly_increasing() -> Result<()> {
    let app = test_app()?;
    let (_, body, _) = post_json(&app, "/api/auth/register", ann()).await?;
    assert_eq!(body["user"]["id"], "1");

    let (_, body, _) = post_json(
        &app,
        "/api/auth/register",
        json!({"name": "Bo", "email": "bo@x.com", "password": "p2!bbbbbb"}),
    )
    .await?;
    assert_eq!(body["user"]["id"], "2");
    Ok(())
}

#[tokio::test]
async fn login_sets_a_verifiable_session_cookie() -> Result<()> {
    let app = test_app()?;
    let cookie = register_and_login(&app).await?;

    let token = cookie
        .strip_prefix("auth_token=")
        .context("cookie should carry the token")?;
    let claims = session::verify(&app.session, token).context("token should verify")?;
    assert_eq!(claims.sub, "1");
    assert_eq!(claims.email, "ann@x.com");
    assert!(claims.image.contains("AL"));
    Ok(())
}

#[tokio::test]
async fn login_failure_is_opaque() -> Result<()> {
    let app = test_app()?;
    let (status, _, _) = post_json(&app, "/api/auth/register", ann()).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (wrong_password_status, wrong_password_body, cookie) = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "ann@x.com", "password": "wrong-pass"}),
    )
    .await?;
    assert_eq!(wrong_password_status, StatusCode::UNAUTHORIZED);
    assert!(cookie.is_none());

    let (unknown_email_status, unknown_email_body, _) = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "nobody@x.com", "password": "p1!aaaaaa"}),
    )
    .await?;
    assert_eq!(unknown_email_status, StatusCode::UNAUTHORIZED);

    // The response never says which field was wrong.
    assert_eq!(wrong_password_body, unknown_email_body);
    assert_eq!(wrong_password_body["message"], "Invalid email or password");
    Ok(())
}

#[tokio::test]
async fn login_with_empty_fields_is_refused() -> Result<()> {
    let app = test_app()?;
    let (status, body, _) = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "", "password": ""}),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
    Ok(())
}

#[tokio::test]
async fn session_view_is_rebuilt_from_claims_alone() -> Result<()> {
    let app = test_app()?;
    let cookie = register_and_login(&app).await?;

    // Removing the store file proves the view never re-reads it.
    std::fs::remove_file(app.store.path())?;

    let request = Request::builder()
        .method("GET")
        .uri("/api/auth/session")
        .header(COOKIE, cookie.as_str())
        .body(Body::empty())?;
    let response = app.router.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["user"]["id"], "1");
    assert_eq!(body["user"]["name"], "Ann Lee");
    assert!(body["user"].get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn session_view_is_empty_without_a_cookie() -> Result<()> {
    let app = test_app()?;
    let (status, _) = get_page(&app, "/api/auth/session", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn logout_clears_the_cookie() -> Result<()> {
    let app = test_app()?;
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .body(Body::empty())?;
    let response = app.router.clone().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .context("logout should clear the cookie")?;
    assert!(set_cookie.starts_with("auth_token=;"));
    assert!(set_cookie.contains("Max-Age=0"));
    Ok(())
}

#[tokio::test]
async fn guard_redirects_unauthenticated_visitors_to_login() -> Result<()> {
    let app = test_app()?;

    let (status, location) = get_page(&app, "/profile", None).await?;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location.as_deref(), Some("/login"));

    // Unknown protected paths redirect too; the allow-list is what counts.
    let (status, location) = get_page(&app, "/checkout", None).await?;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location.as_deref(), Some("/login"));
    Ok(())
}

#[tokio::test]
async fn guard_allows_public_routes_unauthenticated() -> Result<()> {
    let app = test_app()?;
    for path in ["/", "/login", "/register", "/forgot-password"] {
        let (status, _) = get_page(&app, path, None).await?;
        assert_eq!(status, StatusCode::OK, "expected {path} to be public");
    }
    Ok(())
}

#[tokio::test]
async fn guard_redirects_authenticated_visitors_off_auth_pages() -> Result<()> {
    let app = test_app()?;
    let cookie = register_and_login(&app).await?;

    for path in ["/login", "/register"] {
        let (status, location) = get_page(&app, path, Some(&cookie)).await?;
        assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location.as_deref(), Some("/"));
    }

    // The home page stays reachable when signed in.
    let (status, _) = get_page(&app, "/", Some(&cookie)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn guard_passes_authenticated_requests_through() -> Result<()> {
    let app = test_app()?;
    let cookie = register_and_login(&app).await?;

    let (status, location) = get_page(&app, "/profile", Some(&cookie)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(location, None);
    Ok(())
}

#[tokio::test]
async fn guard_never_trusts_an_unverified_cookie() -> Result<()> {
    let app = test_app()?;

    let (status, location) =
        get_page(&app, "/profile", Some("auth_token=forged-token")).await?;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location.as_deref(), Some("/login"));

    // A token signed with a different secret is just as worthless.
    let other = SessionConfig::new(SecretString::from("other-secret".to_string()));
    let forged = session::issue(
        &other,
        &crate::store::PublicUser {
            id: "1".to_string(),
            name: "Ann Lee".to_string(),
            email: "ann@x.com".to_string(),
            image: String::new(),
        },
    )?;
    let cookie = format!("auth_token={forged}");
    let (status, location) = get_page(&app, "/profile", Some(&cookie)).await?;
    assert_eq!(status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location.as_deref(), Some("/login"));
    Ok(())
}

#[tokio::test]
async fn guard_exempts_api_and_static_assets() -> Result<()> {
    let app = test_app()?;

    // API routes answer for themselves rather than redirecting.
    let (status, location) = get_page(&app, "/api/auth/session", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(location, None);

    let (status, _) = get_page(&app, "/health", None).await?;
    assert_eq!(status, StatusCode::OK);

    // Static images fall through to the 404 fallback, not to /login.
    let (status, location) = get_page(&app, "/logo.png", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(location, None);
    Ok(())
}
