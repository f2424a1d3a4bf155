//! PostgreSQL movie repository.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
    prelude::DateTimeWithTimeZone,
};
use uuid::Uuid;

use movie_core::domain::{Movie, MoviePatch};
use movie_core::error::RepoError;
use movie_core::ports::MovieRepository;

use super::entity::movie::{self, Entity as MovieEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL movie repository.
pub type PostgresMovieRepository = PostgresBaseRepository<MovieEntity>;

#[async_trait]
impl MovieRepository for PostgresMovieRepository {
    async fn find_all(&self) -> Result<Vec<Movie>, RepoError> {
        let result = MovieEntity::find()
            .order_by_asc(movie::Column::CreatedAt)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn update_if_version(
        &self,
        id: Uuid,
        expected_version: i64,
        patch: &MoviePatch,
    ) -> Result<Movie, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        // Dropping `txn` without commit rolls back
        let mut movie: Movie = MovieEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?
            .into();

        if movie.version != expected_version {
            tracing::debug!(
                movie_id = %id,
                expected_version,
                actual_version = movie.version,
                "Stale version on read"
            );
            return Err(RepoError::VersionConflict {
                expected: expected_version,
            });
        }

        movie.apply(patch);

        // The version predicate makes the write a compare-and-swap: a writer
        // that committed after our read leaves zero matching rows.
        let result = MovieEntity::update_many()
            .col_expr(movie::Column::Title, Expr::value(movie.title.clone()))
            .col_expr(movie::Column::Genre, Expr::value(movie.genre.clone()))
            .col_expr(movie::Column::Year, Expr::value(movie.year))
            .col_expr(movie::Column::Version, Expr::value(movie.version))
            .col_expr(
                movie::Column::UpdatedAt,
                Expr::value(DateTimeWithTimeZone::from(movie.updated_at)),
            )
            .filter(movie::Column::Id.eq(id))
            .filter(movie::Column::Version.eq(expected_version))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            tracing::debug!(movie_id = %id, expected_version, "Stale version on write");
            return Err(RepoError::VersionConflict {
                expected: expected_version,
            });
        }

        txn.commit().await.map_err(map_db_err)?;

        Ok(movie)
    }
}
