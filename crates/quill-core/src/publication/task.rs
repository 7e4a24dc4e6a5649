use std::sync::Arc;

use crate::domain::{Article, ArticleStatus};
use crate::error::RepoError;
use crate::ports::{ArticleRepository, Clock};

/// Result of a single publication attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Published,
    /// Lost a version race against a concurrent edit; left scheduled.
    Postponed,
    Failed,
}

/// Summary of one task execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicationReport {
    pub published: usize,
    pub postponed: usize,
    pub failed: usize,
    /// Attempts made a minute or more after the scheduled time.
    pub delayed: usize,
}

impl PublicationReport {
    pub fn attempted(&self) -> usize {
        self.published + self.postponed + self.failed
    }

    fn record(&mut self, outcome: PublishOutcome) {
        match outcome {
            PublishOutcome::Published => self.published += 1,
            PublishOutcome::Postponed => self.postponed += 1,
            PublishOutcome::Failed => self.failed += 1,
        }
    }
}

/// Publishes every scheduled article whose publication time has come.
pub struct AutoPublicationTask {
    repository: Arc<dyn ArticleRepository>,
    clock: Arc<dyn Clock>,
}

impl AutoPublicationTask {
    pub fn new(repository: Arc<dyn ArticleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Publish all due articles, each with its own write.
    ///
    /// Only the initial query can fail the run; per-article failures are
    /// logged and counted in the report.
    pub async fn run(&self) -> Result<PublicationReport, RepoError> {
        tracing::info!("Executing scheduled automatic publication task");

        let due = self
            .repository
            .find_due_for_publication(self.clock.now())
            .await?;

        let mut report = PublicationReport::default();
        if due.is_empty() {
            tracing::warn!("No articles to publish");
            return Ok(report);
        }

        for article in due {
            let (outcome, delayed) = self.publish(article).await;
            report.record(outcome);
            if delayed {
                report.delayed += 1;
            }
        }

        tracing::info!(
            published = report.published,
            postponed = report.postponed,
            failed = report.failed,
            "Automatic publication task finished"
        );
        Ok(report)
    }

    /// Returns the outcome and whether the attempt ran late.
    async fn publish(&self, mut article: Article) -> (PublishOutcome, bool) {
        let now = self.clock.now();
        let scheduled_at = article.publication_timestamp();
        let label = article.to_string();

        let outcome = match article.set_status(ArticleStatus::Published, now) {
            Err(violation) => {
                tracing::error!(article = %label, error = %violation, "Cannot publish article");
                PublishOutcome::Failed
            }
            Ok(()) => match self.repository.save(article).await {
                Ok(saved) => {
                    tracing::info!(article = %saved, "Completed auto-publication");
                    PublishOutcome::Published
                }
                Err(e) if e.is_version_conflict() => {
                    tracing::info!(
                        article = %label,
                        "Postponing auto-publication due to a concurrent update"
                    );
                    PublishOutcome::Postponed
                }
                Err(e) => {
                    tracing::error!(article = %label, error = %e, "Auto-publication failed");
                    PublishOutcome::Failed
                }
            },
        };

        // Lateness is reported, never corrected.
        let late_by = scheduled_at
            .map(|at| self.clock.now() - at)
            .filter(|delay| delay.num_minutes() >= 1);
        if let Some(delay) = late_by {
            tracing::warn!(
                article = %label,
                delay_secs = delay.num_seconds(),
                "The auto-publication attempt was executed late"
            );
        }

        (outcome, late_by.is_some())
    }
}

/// Builds a fresh task for every arming of the timer.
#[derive(Clone)]
pub struct AutoPublicationTaskFactory {
    repository: Arc<dyn ArticleRepository>,
    clock: Arc<dyn Clock>,
}

impl AutoPublicationTaskFactory {
    pub fn new(repository: Arc<dyn ArticleRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    pub fn create(&self) -> AutoPublicationTask {
        AutoPublicationTask::new(self.repository.clone(), self.clock.clone())
    }
}
