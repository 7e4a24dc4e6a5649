//! Status constraints shared by the article state machine and form validation.
//!
//! | Status                    | Publication timestamp | Content       |
//! |---------------------------|-----------------------|---------------|
//! | `Draft`                   | anything              | anything      |
//! | `ScheduledForPublication` | set, after `now`      | not blank     |
//! | `Published`               | set, at or before now | not blank     |

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::ArticleStatus;

/// A broken status constraint, carrying the message shown to the administrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatusViolation {
    #[error("publication timestamp must be future for scheduling")]
    TimestampNotFuture,

    #[error("publication timestamp must be present or past for publication")]
    TimestampNotPresentOrPast,

    #[error("content must not be blank for scheduled publication")]
    BlankContentForScheduling,

    #[error("content must not be blank for publication")]
    BlankContentForPublication,
}

impl StatusViolation {
    /// Name of the article field the violation is reported against.
    pub fn field(&self) -> &'static str {
        match self {
            StatusViolation::TimestampNotFuture | StatusViolation::TimestampNotPresentOrPast => {
                "publication_timestamp"
            }
            StatusViolation::BlankContentForScheduling
            | StatusViolation::BlankContentForPublication => "content",
        }
    }
}

/// Check the publication timestamp against the status it is paired with.
pub fn status_violation(
    status: ArticleStatus,
    timestamp: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<StatusViolation> {
    match status {
        ArticleStatus::Draft => None,
        ArticleStatus::ScheduledForPublication => match timestamp {
            Some(ts) if ts > now => None,
            _ => Some(StatusViolation::TimestampNotFuture),
        },
        ArticleStatus::Published => match timestamp {
            Some(ts) if ts <= now => None,
            _ => Some(StatusViolation::TimestampNotPresentOrPast),
        },
    }
}

pub fn is_timestamp_legal_for_status(
    status: ArticleStatus,
    timestamp: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    status_violation(status, timestamp, now).is_none()
}

/// Articles leaving the draft stage must have some content.
pub fn content_violation(status: ArticleStatus, content: &str) -> Option<StatusViolation> {
    if !content.trim().is_empty() {
        return None;
    }
    match status {
        ArticleStatus::Draft => None,
        ArticleStatus::ScheduledForPublication => Some(StatusViolation::BlankContentForScheduling),
        ArticleStatus::Published => Some(StatusViolation::BlankContentForPublication),
    }
}
