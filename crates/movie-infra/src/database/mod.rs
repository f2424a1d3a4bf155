//! Record stores - PostgreSQL via SeaORM and an in-memory fallback.

mod memory;

pub use memory::InMemoryMovieRepository;

#[cfg(feature = "postgres")]
mod connections;
#[cfg(feature = "postgres")]
mod postgres_base;
#[cfg(feature = "postgres")]
mod postgres_repo;

#[cfg(feature = "postgres")]
pub mod entity;

#[cfg(feature = "postgres")]
pub use connections::{DatabaseConfig, connect, ensure_schema};

#[cfg(feature = "postgres")]
pub use postgres_repo::PostgresMovieRepository;
