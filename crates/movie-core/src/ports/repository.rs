use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Movie, MoviePatch};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, returning what was removed.
    ///
    /// Fails with [`RepoError::NotFound`] when nothing was deleted, so of two
    /// concurrent deletes only one succeeds.
    async fn delete(&self, id: ID) -> Result<T, RepoError>;
}

/// Movie repository with optimistic concurrency.
#[async_trait]
pub trait MovieRepository: BaseRepository<Movie, Uuid> {
    /// Every movie, oldest first.
    async fn find_all(&self) -> Result<Vec<Movie>, RepoError>;

    /// Apply `patch` to the movie `id` only if it is still at
    /// `expected_version`, bumping the version by one.
    ///
    /// Read, check and write happen in one transaction; on any failure
    /// nothing is written.
    async fn update_if_version(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &MoviePatch,
    ) -> Result<Movie, RepoError>;
}
