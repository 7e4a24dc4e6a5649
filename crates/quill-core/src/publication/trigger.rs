use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::RepoError;
use crate::ports::ArticleRepository;

/// Computes when the next auto-publication task should run.
#[derive(Clone)]
pub struct AutoPublicationTrigger {
    repository: Arc<dyn ArticleRepository>,
}

impl AutoPublicationTrigger {
    pub fn new(repository: Arc<dyn ArticleRepository>) -> Self {
        Self { repository }
    }

    /// Earliest scheduled publication timestamp, or `None` when nothing is
    /// scheduled.
    pub async fn next_execution_time(&self) -> Result<Option<DateTime<Utc>>, RepoError> {
        let next = self
            .repository
            .find_next_scheduled_publication_time()
            .await?;

        match next {
            Some(at) => tracing::info!(next_run = %at, "Next auto-publication scheduled"),
            None => tracing::info!("No article scheduled for auto-publication"),
        }

        Ok(next)
    }
}
