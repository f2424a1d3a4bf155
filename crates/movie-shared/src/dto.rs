//! Data Transfer Objects - request bodies accepted by the API.

use serde::{Deserialize, Serialize};

/// Request to create a movie.
///
/// `title` and `genre` are optional here so that a missing field reaches the
/// domain validation and produces the documented `BAD_REQUEST` body instead
/// of a deserializer error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateMovieRequest {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

/// Partial update of a movie. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}
