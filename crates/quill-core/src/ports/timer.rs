//! Timer port - one-shot execution of a task at a given instant.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::SchedulingError;

/// Work armed on a timer. Not polled until the timer fires.
pub type ScheduledTask = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Identifies one armed timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub Uuid);

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Timer facility trait - abstraction over the scheduling backend.
#[async_trait]
pub trait TaskScheduler: Send + Sync {
    /// Arm a timer running `task` at `at`. Instants in the past fire as soon
    /// as possible.
    async fn schedule_at(
        &self,
        at: DateTime<Utc>,
        task: ScheduledTask,
    ) -> Result<TimerHandle, SchedulingError>;

    /// Prevent a future fire. Unknown, fired and already cancelled handles
    /// are ignored; a task that already started keeps running.
    async fn cancel(&self, handle: TimerHandle);
}
