use anyhow::{Context, Result};
use clap::{Arg, Command};

pub const ARG_STORE_PATH: &str = "store-path";

pub const DEFAULT_STORE_PATH: &str = "data/users.json";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_STORE_PATH)
            .long("store-path")
            .help("Path to the JSON credential store file")
            .default_value(DEFAULT_STORE_PATH)
            .env("TOPUP_AUTH_STORE_PATH"),
    )
}

pub struct Options {
    pub path: String,
}

impl Options {
    /// # Errors
    /// Returns an error if the store path argument is missing.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        let path = matches
            .get_one::<String>(ARG_STORE_PATH)
            .cloned()
            .context("missing required argument: --store-path")?;
        Ok(Self { path })
    }
}
