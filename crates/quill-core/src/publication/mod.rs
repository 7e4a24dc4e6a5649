//! Automatic publication of scheduled articles.
//!
//! The [`AutoPublicationScheduler`] arms one timer for the instant reported by
//! the [`AutoPublicationTrigger`]; when it fires, an [`AutoPublicationTask`]
//! moves every due article from `ScheduledForPublication` to `Published`.

mod scheduler;
mod task;
mod trigger;

pub use scheduler::AutoPublicationScheduler;
pub use task::{AutoPublicationTask, AutoPublicationTaskFactory, PublicationReport, PublishOutcome};
pub use trigger::AutoPublicationTrigger;
