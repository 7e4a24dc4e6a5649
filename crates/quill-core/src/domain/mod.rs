//! Domain entities - the core business objects.

mod article;
mod form;
pub mod rules;

pub use article::{Article, ArticleStatus, UnknownStatus, truncate_to_minute};
pub use form::ArticleForm;
pub use rules::{StatusViolation, content_violation, is_timestamp_legal_for_status, status_violation};
