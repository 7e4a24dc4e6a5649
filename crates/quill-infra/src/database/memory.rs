//! In-memory article repository - used when no database is configured and in tests.
//!
//! Follows the same optimistic-concurrency contract as the PostgreSQL
//! repository. Note: Data is lost on process restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use quill_core::domain::Article;
use quill_core::error::RepoError;
use quill_core::ports::{ArticleRepository, BaseRepository};

#[derive(Default)]
struct Rows {
    next_id: i64,
    articles: BTreeMap<i64, Article>,
}

/// In-memory article repository using a BTreeMap behind an async RwLock.
#[derive(Default)]
pub struct InMemoryArticleRepository {
    rows: RwLock<Rows>,
}

impl InMemoryArticleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn scheduled(rows: &Rows) -> impl Iterator<Item = &Article> {
        rows.articles
            .values()
            .filter(|a| a.is_scheduled_for_publication())
    }

    fn sorted_by_publication(mut articles: Vec<Article>) -> Vec<Article> {
        articles.sort_by_key(|a| a.publication_timestamp());
        articles
    }
}

#[async_trait]
impl BaseRepository<Article, i64> for InMemoryArticleRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Article>, RepoError> {
        Ok(self.rows.read().await.articles.get(&id).cloned())
    }

    async fn save(&self, article: Article) -> Result<Article, RepoError> {
        let mut rows = self.rows.write().await;
        let now = Utc::now();

        let saved = match article.id() {
            None => {
                rows.next_id += 1;
                let mut saved = article.persisted_as(rows.next_id, 0);
                saved.created_at = now;
                saved.updated_at = now;
                saved
            }
            Some(id) => {
                let stored = rows.articles.get(&id).ok_or(RepoError::NotFound)?;
                let expected = article.version();
                if stored.version() != expected {
                    return Err(RepoError::VersionConflict { id, expected });
                }
                let created_at = stored.created_at;
                let mut saved = article.persisted_as(id, expected + 1);
                saved.created_at = created_at;
                saved.updated_at = now;
                saved
            }
        };

        if let Some(id) = saved.id() {
            rows.articles.insert(id, saved.clone());
        }
        Ok(saved)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.rows
            .write()
            .await
            .articles
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleRepository {
    async fn find_all_scheduled(&self) -> Result<Vec<Article>, RepoError> {
        let rows = self.rows.read().await;
        let scheduled = Self::scheduled(&rows).cloned().collect();
        Ok(Self::sorted_by_publication(scheduled))
    }

    async fn find_next_scheduled_publication_time(
        &self,
    ) -> Result<Option<DateTime<Utc>>, RepoError> {
        let rows = self.rows.read().await;
        Ok(Self::scheduled(&rows)
            .filter_map(|a| a.publication_timestamp())
            .min())
    }

    async fn find_due_for_publication(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Article>, RepoError> {
        let rows = self.rows.read().await;
        let due = Self::scheduled(&rows)
            .filter(|a| a.publication_timestamp().is_some_and(|ts| ts <= now))
            .cloned()
            .collect();
        Ok(Self::sorted_by_publication(due))
    }
}
