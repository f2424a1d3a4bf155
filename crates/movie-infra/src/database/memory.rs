//! In-memory movie repository - used when no database is configured.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use movie_core::domain::{Movie, MoviePatch};
use movie_core::error::RepoError;
use movie_core::ports::{BaseRepository, MovieRepository};

/// Movies kept in insertion order behind an async RwLock.
///
/// Every mutation runs under the write lock, which makes the version check
/// and the write of `update_if_version` a single atomic step.
/// Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryMovieRepository {
    movies: RwLock<Vec<Movie>>,
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Movie, Uuid> for InMemoryMovieRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, RepoError> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.id == id).cloned())
    }

    async fn insert(&self, movie: Movie) -> Result<Movie, RepoError> {
        let mut movies = self.movies.write().await;

        if movies.iter().any(|m| m.id == movie.id) {
            return Err(RepoError::Query(format!("duplicate movie id {}", movie.id)));
        }

        movies.push(movie.clone());
        Ok(movie)
    }

    async fn delete(&self, id: Uuid) -> Result<Movie, RepoError> {
        let mut movies = self.movies.write().await;

        let index = movies
            .iter()
            .position(|m| m.id == id)
            .ok_or(RepoError::NotFound)?;

        Ok(movies.remove(index))
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn find_all(&self) -> Result<Vec<Movie>, RepoError> {
        Ok(self.movies.read().await.clone())
    }

    async fn update_if_version(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &MoviePatch,
    ) -> Result<Movie, RepoError> {
        let mut movies = self.movies.write().await;

        let movie = movies
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(RepoError::NotFound)?;

        if movie.version != expected_version {
            return Err(RepoError::VersionConflict {
                expected: expected_version,
            });
        }

        movie.apply(patch);
        Ok(movie.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inception() -> Movie {
        Movie::new("Inception".into(), "Sci-Fi".into(), Some(2010))
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryMovieRepository::new();
        let movie = repo.insert(inception()).await.unwrap();

        let found = repo.find_by_id(movie.id).await.unwrap();
        assert_eq!(found, Some(movie));
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let repo = InMemoryMovieRepository::new();
        let first = repo.insert(inception()).await.unwrap();
        let second = repo
            .insert(Movie::new("Heat".into(), "Crime".into(), None))
            .await
            .unwrap();

        let ids: Vec<Uuid> = repo.find_all().await.unwrap().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_stale_version_rejected() {
        let repo = InMemoryMovieRepository::new();
        let movie = repo.insert(inception()).await.unwrap();
        let patch = MoviePatch {
            year: Some(2021),
            ..Default::default()
        };

        let first = repo.update_if_version(movie.id, 0, &patch).await.unwrap();
        assert_eq!(first.version, 1);

        let second = repo.update_if_version(movie.id, 0, &patch).await;
        assert!(matches!(
            second,
            Err(RepoError::VersionConflict { expected: 0 })
        ));

        // Loser left no trace
        let stored = repo.find_by_id(movie.id).await.unwrap().unwrap();
        assert_eq!(stored.version, 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryMovieRepository::new();

        let result = repo
            .update_if_version(Uuid::new_v4(), 0, &MoviePatch::default())
            .await;

        assert!(matches!(result, Err(RepoError::NotFound)));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_second_delete_is_not_found() {
        let repo = InMemoryMovieRepository::new();
        let movie = repo.insert(inception()).await.unwrap();

        let deleted = repo.delete(movie.id).await.unwrap();
        assert_eq!(deleted.id, movie.id);

        assert!(matches!(repo.delete(movie.id).await, Err(RepoError::NotFound)));
    }
}
