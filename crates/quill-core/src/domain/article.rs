use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::rules::{self, StatusViolation};

/// Life cycle stages of an article.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArticleStatus {
    #[default]
    Draft,
    ScheduledForPublication,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "DRAFT",
            ArticleStatus::ScheduledForPublication => "SCHEDULED_FOR_PUBLICATION",
            ArticleStatus::Published => "PUBLISHED",
        }
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(ArticleStatus::Draft),
            "SCHEDULED_FOR_PUBLICATION" => Ok(ArticleStatus::ScheduledForPublication),
            "PUBLISHED" => Ok(ArticleStatus::Published),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown article status: {0}")]
pub struct UnknownStatus(pub String);

/// Drop seconds and sub-second precision.
pub fn truncate_to_minute(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(instant)
}

/// Article entity - a blog post or a standalone page.
///
/// `status` and `publication_timestamp` are only reachable through the
/// state machine methods; `id` and `version` are owned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub content: String,
    /// Custom introduction shown on listings instead of the content head.
    pub introduction: Option<String>,
    /// Listed posts appear on the blog index; the rest are standalone pages.
    pub post: bool,
    status: ArticleStatus,
    publication_timestamp: Option<DateTime<Utc>>,
    version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    /// Create a new, not yet persisted draft.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title: title.into(),
            slug: String::new(),
            content: content.into(),
            introduction: None,
            post: true,
            status: ArticleStatus::Draft,
            publication_timestamp: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn status(&self) -> ArticleStatus {
        self.status
    }

    pub fn publication_timestamp(&self) -> Option<DateTime<Utc>> {
        self.publication_timestamp
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn is_scheduled_for_publication(&self) -> bool {
        self.status == ArticleStatus::ScheduledForPublication
    }

    /// Assign a new status, checking it against the current publication timestamp.
    ///
    /// Publishing an article without a timestamp stamps it with `now`. On
    /// failure the article is left untouched.
    pub fn set_status(
        &mut self,
        status: ArticleStatus,
        now: DateTime<Utc>,
    ) -> Result<(), StatusViolation> {
        if status == ArticleStatus::Published && self.publication_timestamp.is_none() {
            self.publication_timestamp = Some(truncate_to_minute(now));
        } else if let Some(violation) =
            rules::status_violation(status, self.publication_timestamp, now)
        {
            return Err(violation);
        }
        self.status = status;
        Ok(())
    }

    /// Consistency with the status is checked at the next `set_status` call.
    pub fn set_publication_timestamp(&mut self, timestamp: Option<DateTime<Utc>>) {
        self.publication_timestamp = timestamp.map(truncate_to_minute);
    }

    /// All status constraints the article currently breaks.
    pub fn violations(&self, now: DateTime<Utc>) -> Vec<StatusViolation> {
        [
            rules::status_violation(self.status, self.publication_timestamp, now),
            rules::content_violation(self.status, &self.content),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Copy the fields an administrator edits, leaving lifecycle state alone.
    pub fn apply_admin_edits(&mut self, edited: &Article) {
        self.title = edited.title.clone();
        self.slug = edited.slug.clone();
        self.content = edited.content.clone();
        self.introduction = edited.introduction.clone();
        self.post = edited.post;
    }

    /// Stamp store-assigned identity. Storage adapters only.
    pub fn persisted_as(mut self, id: i64, version: i32) -> Self {
        self.id = Some(id);
        self.version = version;
        self
    }

    /// Rebuild lifecycle state read back from storage, bypassing the checks
    /// that applied when it was first assigned. Storage adapters only.
    pub fn with_restored_status(
        mut self,
        status: ArticleStatus,
        publication_timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        self.status = status;
        self.publication_timestamp = publication_timestamp;
        self
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Article [")?;
        if let Some(id) = self.id {
            write!(f, "id={id}, ")?;
        }
        write!(f, "title={:?}, status={}", self.title, self.status)?;
        if let Some(ts) = self.publication_timestamp {
            write!(f, ", publication_timestamp={}", ts.to_rfc3339())?;
        }
        write!(f, ", post={}]", self.post)
    }
}
