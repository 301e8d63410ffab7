//! Application configuration management

use std::env;

use anyhow::Result;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (for generating URLs)
    pub host: Option<String>,

    /// Server port
    pub port: u16,

    /// Database path (SQLite file) or `sqlite::memory:`
    pub database_url: String,

    /// Name of the session cookie
    pub cookie_name: String,

    /// Session lifetime in seconds (default: 24 hours)
    pub session_ttl_secs: i64,

    /// Bcrypt cost factor for password hashing
    pub bcrypt_cost: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_PATH")
            .or_else(|_| env::var("DATABASE_URL"))
            .unwrap_or_else(|_| "./data/palaver.db".to_string());

        Ok(Self {
            host: env::var("HOST").ok(),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            database_url,
            cookie_name: env::var("COOKIE_NAME").unwrap_or_else(|_| "palaver.sid".to_string()),
            session_ttl_secs: env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24 * 60 * 60),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        })
    }
}
