//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use movie_core::MovieServiceConfig;
use movie_infra::JwtConfig;

#[cfg(feature = "postgres")]
use movie_infra::database::DatabaseConfig;
#[cfg(feature = "redis")]
use movie_infra::RedisConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs on the in-memory store.
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    /// `None` runs on the in-memory cache.
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
    pub movies: MovieServiceConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let movies = MovieServiceConfig {
            cache_ttl: Duration::from_secs(parse_or("MOVIES_CACHE_TTL_SECS", 60 * 60 * 24)),
            store_timeout: Duration::from_millis(parse_or("STORE_TIMEOUT_MS", 5000)),
            cache_timeout: Duration::from_millis(parse_or("CACHE_TIMEOUT_MS", 1000)),
        };

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 3000),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env(),
            movies,
            jwt: JwtConfig::from_env(),
        }
    }
}

/// Parse `key`, falling back to `default` when unset or malformed.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparseable setting");
            default
        }),
        Err(_) => default,
    }
}
