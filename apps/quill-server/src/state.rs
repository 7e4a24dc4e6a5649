//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ArticleUpdater;
use quill_core::ports::{ArticleRepository, Clock, TaskScheduler};
use quill_core::publication::{
    AutoPublicationScheduler, AutoPublicationTaskFactory, AutoPublicationTrigger,
};
use quill_infra::{DatabaseConfig, InMemoryArticleRepository};

#[cfg(feature = "postgres")]
use quill_infra::{PostgresArticleRepository, connect};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub articles: Arc<ArticleUpdater>,
    pub scheduler: Arc<AutoPublicationScheduler>,
}

impl AppState {
    /// Wire the auto-publication scheduler and the admin updater around one
    /// article store.
    pub fn new(
        repository: Arc<dyn ArticleRepository>,
        timers: Arc<dyn TaskScheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let scheduler = Arc::new(AutoPublicationScheduler::new(
            AutoPublicationTrigger::new(repository.clone()),
            AutoPublicationTaskFactory::new(repository.clone(), clock.clone()),
            timers,
        ));
        let articles = Arc::new(ArticleUpdater::new(repository, scheduler.clone(), clock));

        tracing::info!("Application state initialized");

        Self {
            articles,
            scheduler,
        }
    }
}

/// Pick the article store: PostgreSQL when configured and reachable,
/// in-memory otherwise.
pub async fn article_repository(db_config: Option<&DatabaseConfig>) -> Arc<dyn ArticleRepository> {
    #[cfg(feature = "postgres")]
    {
        if let Some(config) = db_config {
            match connect(config).await {
                Ok(conn) => return Arc::new(PostgresArticleRepository::new(conn)),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    return Arc::new(InMemoryArticleRepository::new());
                }
            }
        }
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
    }

    #[cfg(not(feature = "postgres"))]
    {
        let _ = db_config;
        tracing::info!("Running without postgres feature - using in-memory repository");
    }

    Arc::new(InMemoryArticleRepository::new())
}
