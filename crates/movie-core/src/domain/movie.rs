use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Message returned when a create request lacks a title or genre.
pub const MISSING_FIELDS: &str = "title or genre is missing!";

/// Movie entity.
///
/// `version` starts at 0 and is bumped by exactly one on every committed
/// update; it is the token used for optimistic concurrency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub genre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Movie {
    /// Create a new movie with generated ID, version 0 and timestamps.
    pub fn new(title: String, genre: String, year: Option<i32>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            genre,
            year,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a patch and advance the version.
    ///
    /// Callers must have checked that `self.version` is the version the patch
    /// was issued against.
    pub fn apply(&mut self, patch: &MoviePatch) {
        if let Some(title) = &patch.title {
            self.title = title.trim().to_string();
        }
        if let Some(genre) = &patch.genre {
            self.genre = genre.trim().to_string();
        }
        if let Some(year) = patch.year {
            self.year = Some(year);
        }
        self.version += 1;
        self.updated_at = Utc::now();
    }
}

/// Unvalidated create input.
#[derive(Debug, Clone, Default)]
pub struct NewMovie {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

impl NewMovie {
    /// Check required fields and build the entity to persist.
    pub fn validate(self) -> Result<Movie, DomainError> {
        let title = non_blank(self.title);
        let genre = non_blank(self.genre);

        match (title, genre) {
            (Some(title), Some(genre)) => Ok(Movie::new(title, genre, self.year)),
            _ => Err(DomainError::Validation(MISSING_FIELDS.to_string())),
        }
    }
}

/// Partial update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

impl MoviePatch {
    /// Reject patches that would blank out a required field.
    pub fn validate(&self) -> Result<(), DomainError> {
        let blanks_title = self.title.as_deref().is_some_and(|t| t.trim().is_empty());
        let blanks_genre = self.genre.as_deref().is_some_and(|g| g.trim().is_empty());

        if blanks_title || blanks_genre {
            return Err(DomainError::Validation(
                "title or genre cannot be empty!".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.genre.is_none() && self.year.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
