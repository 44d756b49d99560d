use anyhow::Result;
use clap::{Arg, ArgAction, Command};

pub const ARG_SESSION_SECRET: &str = "session-secret";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";
pub const ARG_COOKIE_SECURE: &str = "cookie-secure";

const DEFAULT_SESSION_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_SECRET)
                .long("session-secret")
                .help("Session token signing secret (an insecure development fallback is used when unset)")
                .env("TOPUP_AUTH_SESSION_SECRET"),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long("session-ttl-seconds")
                .help("Lifetime of issued session tokens in seconds")
                .default_value("2592000")
                .env("TOPUP_AUTH_SESSION_TTL_SECONDS")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_COOKIE_SECURE)
                .long("cookie-secure")
                .help("Mark the session cookie Secure (HTTPS-only deployments)")
                .env("TOPUP_AUTH_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
}

pub struct Options {
    pub secret: Option<String>,
    pub ttl_seconds: i64,
    pub cookie_secure: bool,
}

impl Options {
    /// # Errors
    /// Currently infallible; kept fallible for parity with the other command
    /// groups.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let secret = matches.get_one::<String>(ARG_SESSION_SECRET).cloned();
        let ttl_seconds = matches
            .get_one::<i64>(ARG_SESSION_TTL_SECONDS)
            .copied()
            .unwrap_or(DEFAULT_SESSION_TTL_SECONDS);
        let cookie_secure = matches.get_flag(ARG_COOKIE_SECURE);
        Ok(Self {
            secret,
            ttl_seconds,
            cookie_secure,
        })
    }
}
