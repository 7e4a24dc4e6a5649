//! Admin-facing article mutations.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Article, ArticleForm, ArticleStatus};
use crate::error::{DomainError, RepoError};
use crate::ports::{ArticleRepository, Clock};
use crate::publication::AutoPublicationScheduler;

/// Saves and deletes articles on behalf of administrators and keeps the
/// auto-publication schedule in line with the result.
pub struct ArticleUpdater {
    repository: Arc<dyn ArticleRepository>,
    scheduler: Arc<AutoPublicationScheduler>,
    clock: Arc<dyn Clock>,
}

impl ArticleUpdater {
    pub fn new(
        repository: Arc<dyn ArticleRepository>,
        scheduler: Arc<AutoPublicationScheduler>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            scheduler,
            clock,
        }
    }

    pub async fn find(&self, id: i64) -> Result<Article, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Article",
                id,
            })
    }

    /// Create an article from submitted form data.
    pub async fn create(&self, form: &ArticleForm) -> Result<Article, DomainError> {
        let mut article = Article::new(form.title.clone(), form.content.clone());
        form.apply_to(&mut article, self.clock.now())?;

        let saved = self.repository.save(article).await?;
        tracing::info!(article = %saved, "Article created");

        if saved.is_scheduled_for_publication() {
            tracing::info!(
                article = %saved,
                "Article scheduled for auto-publication, rescheduling"
            );
            self.scheduler.schedule_new().await;
        }
        Ok(saved)
    }

    /// Apply submitted form data to an existing article.
    pub async fn update(&self, id: i64, form: &ArticleForm) -> Result<Article, DomainError> {
        let mut article = self.find(id).await?;
        let previous = (article.status(), article.publication_timestamp());

        form.apply_to(&mut article, self.clock.now())?;
        let saved = self.save(article).await?;

        if let Some(reason) = rescheduling_reason(previous, &saved) {
            tracing::info!(article = %saved, %reason, "Rescheduling auto-publication");
            self.scheduler.schedule_new().await;
        }
        Ok(saved)
    }

    /// Persist an edited article, merging with a concurrent auto-publication.
    ///
    /// The only writer besides administrators is the publication task, so on a
    /// version conflict the stored article is assumed to differ only by its
    /// status: the admin-editable fields are copied onto it and written once
    /// more. A second conflict is reported to the caller.
    pub async fn save(&self, article: Article) -> Result<Article, DomainError> {
        tracing::info!(article = %article, "Attempting to save an article");

        let id = match article.id() {
            Some(id) => id,
            None => return Ok(self.repository.save(article).await?),
        };

        match self.repository.save(article.clone()).await {
            Ok(saved) => {
                tracing::info!(article = %saved, "Article saved");
                Ok(saved)
            }
            Err(e) if e.is_version_conflict() => {
                tracing::info!(
                    article = %article,
                    "Article edited concurrently, merging on the assumption that \
                     the concurrent edit was an automatic publication"
                );
                let mut latest = self.find(id).await?;
                latest.apply_admin_edits(&article);

                self.repository.save(latest).await.map_err(|e| match e {
                    RepoError::VersionConflict { .. } => DomainError::Conflict(format!(
                        "article {id} was modified again while merging changes"
                    )),
                    other => other.into(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an article, returning its last stored state.
    pub async fn delete(&self, id: i64) -> Result<Article, DomainError> {
        let article = self.find(id).await?;
        self.repository.delete(id).await?;
        tracing::info!(article = %article, "Article deleted");

        if article.is_scheduled_for_publication() {
            self.scheduler.schedule_new().await;
        }
        Ok(article)
    }
}

/// Why the schedule must be recomputed after an update, if it must.
fn rescheduling_reason(
    previous: (ArticleStatus, Option<DateTime<Utc>>),
    saved: &Article,
) -> Option<String> {
    let (previous_status, previous_timestamp) = previous;
    let was_scheduled = previous_status == ArticleStatus::ScheduledForPublication;

    if was_scheduled != saved.is_scheduled_for_publication() {
        return Some(format!("new status for the article: {}", saved.status()));
    }
    if saved.is_scheduled_for_publication() && previous_timestamp != saved.publication_timestamp()
    {
        let at = saved
            .publication_timestamp()
            .map(|ts| ts.to_rfc3339())
            .unwrap_or_default();
        return Some(format!("new publication time: {at}"));
    }
    None
}
