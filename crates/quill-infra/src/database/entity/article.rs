//! Article entity for SeaORM.

use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::entity::prelude::*;

use quill_core::domain::{Article, ArticleStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "articles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub introduction: Option<String>,
    pub is_blog_post: bool,
    pub status: Status,
    pub publication_timestamp: Option<DateTimeWithTimeZone>,
    pub version: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

/// Article status as stored in the `status` column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Status {
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "SCHEDULED_FOR_PUBLICATION")]
    ScheduledForPublication,
    #[sea_orm(string_value = "PUBLISHED")]
    Published,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Status> for ArticleStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => ArticleStatus::Draft,
            Status::ScheduledForPublication => ArticleStatus::ScheduledForPublication,
            Status::Published => ArticleStatus::Published,
        }
    }
}

impl From<ArticleStatus> for Status {
    fn from(status: ArticleStatus) -> Self {
        match status {
            ArticleStatus::Draft => Status::Draft,
            ArticleStatus::ScheduledForPublication => Status::ScheduledForPublication,
            ArticleStatus::Published => Status::Published,
        }
    }
}

/// Conversion from SeaORM Model to Domain Article.
impl From<Model> for Article {
    fn from(model: Model) -> Self {
        let mut article = Article::new(model.title, model.content);
        article.slug = model.slug;
        article.introduction = model.introduction;
        article.post = model.is_blog_post;
        article.created_at = model.created_at.into();
        article.updated_at = model.updated_at.into();

        article
            .persisted_as(model.id, model.version)
            .with_restored_status(
                model.status.into(),
                model.publication_timestamp.map(Into::into),
            )
    }
}

/// Conversion from Domain Article to SeaORM ActiveModel.
impl From<&Article> for ActiveModel {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id().map_or(NotSet, Set),
            title: Set(article.title.clone()),
            slug: Set(article.slug.clone()),
            content: Set(article.content.clone()),
            introduction: Set(article.introduction.clone()),
            is_blog_post: Set(article.post),
            status: Set(article.status().into()),
            publication_timestamp: Set(article.publication_timestamp().map(Into::into)),
            version: Set(article.version()),
            created_at: Set(article.created_at.into()),
            updated_at: Set(article.updated_at.into()),
        }
    }
}
