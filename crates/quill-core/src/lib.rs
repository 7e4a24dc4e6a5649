//! # Quill Core
//!
//! The domain layer of the Quill blog engine: the article lifecycle, the
//! auto-publication scheduler and the admin update service.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod publication;
pub mod updater;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{DomainError, RepoError, SchedulingError};
pub use updater::ArticleUpdater;
