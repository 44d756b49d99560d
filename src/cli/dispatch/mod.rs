//! Command-line argument dispatch.
//!
//! Maps validated CLI matches to the action to execute, currently only the
//! API server with its store and session configuration.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{session, store};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(3000);
    let store_opts = store::Options::parse(matches)?;
    let session_opts = session::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        store_path: store_opts.path,
        session_secret: session_opts.secret,
        session_ttl_seconds: session_opts.ttl_seconds,
        cookie_secure: session_opts.cookie_secure,
    }))
}
