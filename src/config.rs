//! Environment configuration.
//!
//! One switch matters here: `DATABASE_URL`. When it is present the Postgres
//! storage backend is used for the lifetime of the process; when it is
//! absent the in-memory backend is used instead. There is no runtime
//! switch-over.

use std::env;

/// Environment variable holding the Postgres connection string.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Runtime configuration resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind: String,
    /// Postgres connection string; `None` selects the in-memory backend.
    pub database_url: Option<String>,
}

impl Config {
    /// Resolve configuration from the environment.
    ///
    /// An empty or whitespace-only `DATABASE_URL` is treated as unset.
    #[must_use]
    pub fn from_env(bind: String) -> Self {
        let database_url = env::var(DATABASE_URL_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self { bind, database_url }
    }
}
