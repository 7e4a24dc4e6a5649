//! PostgreSQL repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use quill_core::domain::Article;
use quill_core::error::RepoError;
use quill_core::ports::{ArticleRepository, BaseRepository};

use super::entity::article::{self, Entity as ArticleEntity, Status};

/// PostgreSQL article repository with version-checked updates.
pub struct PostgresArticleRepository {
    pub(crate) db: DbConn,
}

impl PostgresArticleRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn insert(&self, article: Article) -> Result<Article, RepoError> {
        let now = Utc::now();
        let mut model = article::ActiveModel::from(&article);
        model.id = NotSet;
        model.version = Set(0);
        model.created_at = Set(now.into());
        model.updated_at = Set(now.into());

        let inserted = model.insert(&self.db).await.map_err(write_error)?;
        tracing::debug!(article_id = inserted.id, "Article inserted");
        Ok(inserted.into())
    }

    /// `UPDATE ... WHERE id = ? AND version = ?`, bumping the version.
    async fn update_versioned(&self, id: i64, article: Article) -> Result<Article, RepoError> {
        let expected = article.version();
        let now = Utc::now();

        let mut model = article::ActiveModel::from(&article);
        model.id = NotSet;
        model.created_at = NotSet;
        model.version = Set(expected + 1);
        model.updated_at = Set(now.into());

        let result = ArticleEntity::update_many()
            .set(model)
            .filter(article::Column::Id.eq(id))
            .filter(article::Column::Version.eq(expected))
            .exec(&self.db)
            .await
            .map_err(write_error)?;

        if result.rows_affected == 0 {
            // Either someone else bumped the version or the row is gone.
            return Err(match self.find_by_id(id).await? {
                Some(_) => RepoError::VersionConflict { id, expected },
                None => RepoError::NotFound,
            });
        }

        let mut saved = article.persisted_as(id, expected + 1);
        saved.updated_at = now;
        Ok(saved)
    }
}

fn query_error(e: DbErr) -> RepoError {
    match e {
        DbErr::Conn(err) => RepoError::Connection(err.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

fn write_error(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Article already exists".to_string())
    } else {
        query_error(e)
    }
}

#[async_trait]
impl BaseRepository<Article, i64> for PostgresArticleRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Article>, RepoError> {
        let result = ArticleEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn save(&self, article: Article) -> Result<Article, RepoError> {
        match article.id() {
            None => self.insert(article).await,
            Some(id) => self.update_versioned(id, article).await,
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = ArticleEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl ArticleRepository for PostgresArticleRepository {
    async fn find_all_scheduled(&self) -> Result<Vec<Article>, RepoError> {
        let result = ArticleEntity::find()
            .filter(article::Column::Status.eq(Status::ScheduledForPublication))
            .order_by_asc(article::Column::PublicationTimestamp)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_next_scheduled_publication_time(
        &self,
    ) -> Result<Option<DateTime<Utc>>, RepoError> {
        let earliest = ArticleEntity::find()
            .filter(article::Column::Status.eq(Status::ScheduledForPublication))
            .filter(article::Column::PublicationTimestamp.is_not_null())
            .order_by_asc(article::Column::PublicationTimestamp)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(earliest
            .and_then(|model| model.publication_timestamp)
            .map(Into::into))
    }

    async fn find_due_for_publication(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Article>, RepoError> {
        tracing::debug!(%now, "Finding articles due for publication");

        let result = ArticleEntity::find()
            .filter(article::Column::Status.eq(Status::ScheduledForPublication))
            .filter(article::Column::PublicationTimestamp.lte(now.fixed_offset()))
            .order_by_asc(article::Column::PublicationTimestamp)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
