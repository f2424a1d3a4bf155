//! Movie service: store + list cache with optimistic concurrency.
//!
//! Reads are cache-first over a single `"movies"` entry holding the whole
//! list. Every successful mutation deletes that entry; it is never patched
//! in place. A reader that races a writer may repopulate the entry with the
//! pre-write list, which is tolerated until the TTL expires.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::{Movie, MoviePatch, NewMovie};
use crate::error::{DomainError, RepoError};
use crate::ports::{Cache, CacheError, MovieRepository};

/// Cache key of the list snapshot.
pub const MOVIES_CACHE_KEY: &str = "movies";

/// Tunables for [`MovieService`].
#[derive(Debug, Clone)]
pub struct MovieServiceConfig {
    /// Lifetime of the cached list.
    pub cache_ttl: Duration,
    /// Upper bound on a single store call.
    pub store_timeout: Duration,
    /// Upper bound on a single cache call.
    pub cache_timeout: Duration,
}

impl Default for MovieServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(60 * 60 * 24),
            store_timeout: Duration::from_secs(5),
            cache_timeout: Duration::from_secs(1),
        }
    }
}

/// Create, list, update and delete movies.
pub struct MovieService {
    movies: Arc<dyn MovieRepository>,
    cache: Arc<dyn Cache>,
    config: MovieServiceConfig,
}

impl MovieService {
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        cache: Arc<dyn Cache>,
        config: MovieServiceConfig,
    ) -> Self {
        Self {
            movies,
            cache,
            config,
        }
    }

    /// Validate and persist a new movie at version 0.
    pub async fn create(&self, input: NewMovie) -> Result<Movie, DomainError> {
        let movie = input.validate()?;
        let created = self.bounded_store(self.movies.insert(movie)).await?;

        tracing::info!(movie_id = %created.id, "Movie created");
        self.invalidate().await;

        Ok(created)
    }

    /// All movies, from the cache when present.
    pub async fn list(&self) -> Result<Vec<Movie>, DomainError> {
        if let Some(movies) = self.cached_list().await {
            return Ok(movies);
        }

        let movies = self.bounded_store(self.movies.find_all()).await?;
        self.populate(&movies).await;

        Ok(movies)
    }

    /// Patch a movie, guarded by the version observed when it was read.
    ///
    /// A concurrent update that commits first makes this call fail with
    /// [`DomainError::Conflict`]; nothing is written in that case.
    pub async fn update(&self, id: Uuid, patch: MoviePatch) -> Result<Movie, DomainError> {
        patch.validate()?;

        let current = self
            .bounded_store(self.movies.find_by_id(id))
            .await
            .map_err(|e| e.for_movie(id))?
            .ok_or_else(|| DomainError::movie_not_found(id))?;

        if patch.is_empty() {
            return Ok(current);
        }

        let updated = self
            .bounded_store(self.movies.update_if_version(id, current.version, &patch))
            .await
            .map_err(|e| {
                if matches!(e, RepoError::VersionConflict { .. }) {
                    tracing::warn!(
                        movie_id = %id,
                        expected_version = current.version,
                        "Update lost a version race"
                    );
                }
                e.for_movie(id)
            })?;

        tracing::info!(movie_id = %id, version = updated.version, "Movie updated");
        self.invalidate().await;

        Ok(updated)
    }

    /// Remove a movie and return its last state.
    pub async fn delete(&self, id: Uuid) -> Result<Movie, DomainError> {
        let deleted = self
            .bounded_store(self.movies.delete(id))
            .await
            .map_err(|e| e.for_movie(id))?;

        tracing::info!(movie_id = %id, "Movie deleted");
        self.invalidate().await;

        Ok(deleted)
    }

    /// Bound a store call by the configured timeout.
    async fn bounded_store<T, F>(&self, op: F) -> Result<T, RepoError>
    where
        F: Future<Output = Result<T, RepoError>>,
    {
        let limit = self.config.store_timeout;
        tokio::time::timeout(limit, op)
            .await
            .map_err(|_| RepoError::Timeout(limit))?
    }

    /// Bound a cache call by the configured timeout.
    async fn bounded_cache<T, F>(&self, op: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        let limit = self.config.cache_timeout;
        tokio::time::timeout(limit, op)
            .await
            .map_err(|_| CacheError::Timeout(limit))?
    }

    async fn cached_list(&self) -> Option<Vec<Movie>> {
        match self.bounded_cache(self.cache.get(MOVIES_CACHE_KEY)).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Movie>>(&raw) {
                Ok(movies) => {
                    tracing::debug!(count = movies.len(), "Movies served from cache");
                    Some(movies)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding undecodable movies cache entry");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("Movies cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cache read failed, falling back to store");
                None
            }
        }
    }

    async fn populate(&self, movies: &[Movie]) {
        let raw = match serde_json::to_string(movies) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Could not serialize movies for cache");
                return;
            }
        };

        let ttl = Some(self.config.cache_ttl);
        if let Err(e) = self.bounded_cache(self.cache.set(MOVIES_CACHE_KEY, &raw, ttl)).await {
            tracing::warn!(error = %e, "Cache write failed");
        }
    }

    async fn invalidate(&self) {
        if let Err(e) = self.bounded_cache(self.cache.delete(MOVIES_CACHE_KEY)).await {
            tracing::warn!(error = %e, "Cache invalidation failed; list may be stale until TTL");
        }
    }
}
