//! SeaORM entities.

pub mod movie;
