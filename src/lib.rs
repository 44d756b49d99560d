//! # Top-Up Auth (Storefront Credential & Session Service)
//!
//! `topup-auth` is the authentication subsystem of a demo game top-up
//! storefront: user registration, a credentials login flow, signed session
//! cookies, and route protection for the storefront's pages.
//!
//! ## Credential store
//!
//! Registered users live in a single JSON file. Every mutation rewrites the
//! whole file under one async mutex, so concurrent registrations serialize
//! instead of losing updates, and writes are renamed into place so an
//! interrupted write cannot truncate the store. Passwords are stored as
//! Argon2id hashes; the plaintext never reaches the file.
//!
//! ## Sessions
//!
//! A successful login issues an HS256 token carrying the password-free
//! identity (`id`, `name`, `email`, `image`) in an `HttpOnly` cookie. Later
//! requests rebuild the session view from the verified claims alone.
//!
//! ## Route guard
//!
//! Middleware classifies each request by verifying the session token (cookie
//! presence alone is never trusted) and applies a fixed public-route
//! allow-list: signed-in visitors are bounced off `/login` and `/register`,
//! signed-out visitors are redirected to `/login` from everything
//! non-public. The API namespace, service endpoints, and static image assets
//! are exempt.

pub mod api;
pub mod cli;
pub mod session;
pub mod store;
