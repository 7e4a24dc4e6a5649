//! Data Transfer Objects - request/response types for the admin API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article editor submission, used for both create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleRequest {
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(default)]
    pub introduction: Option<String>,
    /// Blog post (`true`) or standalone page.
    #[serde(default)]
    pub post: bool,
    /// `DRAFT`, `SCHEDULED_FOR_PUBLICATION` or `PUBLISHED`.
    pub status: String,
    #[serde(default)]
    pub publication_timestamp: Option<DateTime<Utc>>,
}

/// An article as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub introduction: Option<String>,
    pub post: bool,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publication_timestamp: Option<String>,
    pub version: i32,
    pub created_at: String,
    pub updated_at: String,
}
