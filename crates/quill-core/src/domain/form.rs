use chrono::{DateTime, Utc};

use super::{Article, ArticleStatus, StatusViolation};

/// Data submitted through the admin article editor.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleForm {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub introduction: Option<String>,
    pub post: bool,
    pub status: ArticleStatus,
    pub publication_timestamp: Option<DateTime<Utc>>,
}

impl ArticleForm {
    /// Write the form onto an article. The timestamp is assigned before the
    /// status so the status check sees the submitted value.
    pub fn apply_to(&self, article: &mut Article, now: DateTime<Utc>) -> Result<(), StatusViolation> {
        article.title = self.title.clone();
        article.slug = self.slug.clone();
        article.content = self.content.clone();
        article.introduction = self.introduction.clone();
        article.post = self.post;
        article.set_publication_timestamp(self.publication_timestamp);
        article.set_status(self.status, now)?;
        if let Some(violation) = super::rules::content_violation(self.status, &self.content) {
            return Err(violation);
        }
        Ok(())
    }
}
