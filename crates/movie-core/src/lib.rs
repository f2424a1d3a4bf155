//! # Movie Core
//!
//! The domain layer of the movie management service.
//! Business rules live here; storage and caching are reached only through
//! the traits in [`ports`].

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::{MovieService, MovieServiceConfig};
