//! Application services - orchestration of ports around domain rules.

mod movies;

pub use movies::{MOVIES_CACHE_KEY, MovieService, MovieServiceConfig};
