//! Domain entities - the core business objects.

mod movie;

pub use movie::{Movie, MoviePatch, NewMovie};
