use anyhow::{anyhow, Context, Result};
use std::env;

/// Runtime configuration, read once at startup and shared with handlers.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub session_ttl_hours: i64,
    pub geo_api_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5678,
            database_url: "memory://".to_string(),
            database_name: "serviceHunt".to_string(),
            cors_origins: vec!["http://localhost:3000".to_string()],
            jwt_secret: "default-secret-change-me".to_string(),
            session_ttl_hours: 24,
            geo_api_url: "https://ipapi.co".to_string(),
        }
    }
}

impl Config {
    /// Reads the process environment. `MONGO_URL` (or `DATABASE_URL`) is
    /// required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("MONGO_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .filter(|url| !url.trim().is_empty())
            .context("MONGO_URL (or DATABASE_URL) must be set")?;

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", raw))?,
            None => defaults.port,
        };

        let session_ttl_hours = match lookup("SESSION_TTL_HOURS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|h| *h > 0)
                .ok_or_else(|| anyhow!("SESSION_TTL_HOURS must be a positive integer, got '{}'", raw))?,
            None => defaults.session_ttl_hours,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);

        if lookup("JWT_SECRET").is_none() {
            log::warn!("⚠️  JWT_SECRET not set, using the built-in development secret");
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            database_url,
            database_name: lookup("DATABASE_NAME").unwrap_or(defaults.database_name),
            cors_origins,
            jwt_secret: lookup("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            session_ttl_hours,
            geo_api_url: lookup("GEO_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.geo_api_url),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
