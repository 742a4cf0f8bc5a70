use std::env;

use dotenvy::dotenv;

pub const DEFAULT_DATABASE_URL: &str = "app.db";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5555";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// SQLite database path, `DATABASE_URL` or else `DB_URI`
    pub database_url: String,
    /// Socket address the HTTP server binds to, `LISTEN_ADDR`
    pub listen_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            database_url: database_url(
                env::var("DATABASE_URL").ok(),
                env::var("DB_URI").ok(),
            ),
            listen_addr: env::var("LISTEN_ADDR")
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string()),
        }
    }
}

/// `DB_URI` may be written as `sqlite:///path/to/app.db`; diesel wants the bare path.
fn database_url(database_url: Option<String>, db_uri: Option<String>) -> String {
    database_url
        .or_else(|| {
            db_uri.map(|uri| match uri.strip_prefix("sqlite:///") {
                Some(path) => path.to_string(),
                None => uri,
            })
        })
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string())
}
