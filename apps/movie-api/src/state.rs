//! Application state - shared across all handlers.

use std::sync::Arc;

use movie_core::ports::{Cache, MovieRepository, TokenService};
use movie_core::{MovieService, MovieServiceConfig};
use movie_infra::{InMemoryCache, InMemoryMovieRepository, JwtTokenService};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<MovieService>,
    pub tokens: Arc<dyn TokenService>,
}

/// Failures that prevent the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("database unavailable: {0}")]
    Database(String),

    #[error("cache unavailable: {0}")]
    Cache(String),
}

impl AppState {
    /// Build the application state with the configured backends.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let repository = build_repository(config).await?;
        let cache = build_cache(config).await?;
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        tracing::info!("Application state initialized");

        Ok(Self::from_parts(
            repository,
            cache,
            tokens,
            config.movies.clone(),
        ))
    }

    /// Assemble state from already-built adapters.
    pub fn from_parts(
        repository: Arc<dyn MovieRepository>,
        cache: Arc<dyn Cache>,
        tokens: Arc<dyn TokenService>,
        movies: MovieServiceConfig,
    ) -> Self {
        Self {
            movies: Arc::new(MovieService::new(repository, cache, movies)),
            tokens,
        }
    }
}

#[cfg(feature = "postgres")]
async fn build_repository(config: &AppConfig) -> Result<Arc<dyn MovieRepository>, StartupError> {
    use movie_infra::PostgresMovieRepository;
    use movie_infra::database::{connect, ensure_schema};

    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return Ok(Arc::new(InMemoryMovieRepository::new()));
    };

    let db = connect(db_config)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    ensure_schema(&db)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;

    Ok(Arc::new(PostgresMovieRepository::new(db)))
}

#[cfg(not(feature = "postgres"))]
async fn build_repository(_config: &AppConfig) -> Result<Arc<dyn MovieRepository>, StartupError> {
    tracing::info!("Running without postgres feature - using in-memory repository");
    Ok(Arc::new(InMemoryMovieRepository::new()))
}

#[cfg(feature = "redis")]
async fn build_cache(config: &AppConfig) -> Result<Arc<dyn Cache>, StartupError> {
    use movie_infra::RedisCache;

    let Some(redis_config) = &config.redis else {
        tracing::info!("REDIS_URL not set. Using in-memory cache.");
        return Ok(Arc::new(InMemoryCache::new()));
    };

    match RedisCache::new(redis_config).await {
        Ok(cache) => Ok(Arc::new(cache)),
        Err(e) if redis_config.fallback_to_memory => {
            tracing::error!(
                "Failed to connect to Redis: {}. Using in-memory cache fallback.",
                e
            );
            Ok(Arc::new(InMemoryCache::new()))
        }
        Err(e) => Err(StartupError::Cache(e.to_string())),
    }
}

#[cfg(not(feature = "redis"))]
async fn build_cache(_config: &AppConfig) -> Result<Arc<dyn Cache>, StartupError> {
    tracing::info!("Running without redis feature - using in-memory cache");
    Ok(Arc::new(InMemoryCache::new()))
}
