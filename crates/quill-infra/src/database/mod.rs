//! Article storage - PostgreSQL via SeaORM and an in-memory fallback.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
pub mod postgres_repo;

#[cfg(feature = "postgres")]
pub use connections::connect;
pub use connections::DatabaseConfig;
pub use memory::InMemoryArticleRepository;

#[cfg(feature = "postgres")]
pub use postgres_repo::PostgresArticleRepository;

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
