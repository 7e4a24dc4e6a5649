//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the article stores and the timer facility.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external database, in-memory only
//! - `postgres` - PostgreSQL database support via SeaORM

pub mod database;
pub mod scheduling;

pub use database::{DatabaseConfig, InMemoryArticleRepository};
pub use scheduling::{CronTaskScheduler, SchedulerConfig};

#[cfg(feature = "postgres")]
pub use database::{PostgresArticleRepository, connect};
