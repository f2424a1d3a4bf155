//! Movie entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
    pub title: String,
    #[sea_orm(indexed)]
    pub genre: String,
    #[sea_orm(indexed)]
    pub year: Option<i32>,
    pub version: i64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Movie.
impl From<Model> for movie_core::domain::Movie {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            genre: model.genre,
            year: model.year,
            version: model.version,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain Movie to SeaORM ActiveModel.
impl From<movie_core::domain::Movie> for ActiveModel {
    fn from(movie: movie_core::domain::Movie) -> Self {
        Self {
            id: Set(movie.id),
            title: Set(movie.title),
            genre: Set(movie.genre),
            year: Set(movie.year),
            version: Set(movie.version),
            created_at: Set(movie.created_at.into()),
            updated_at: Set(movie.updated_at.into()),
        }
    }
}
