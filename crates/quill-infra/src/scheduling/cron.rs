//! Timer facility backed by tokio-cron-scheduler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use quill_core::error::SchedulingError;
use quill_core::ports::{Clock, ScheduledTask, TaskScheduler, TimerHandle};

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Enable scheduler. A disabled scheduler accepts timers but never fires them.
    pub enabled: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var("SCHEDULER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        }
    }
}

/// One-shot timers on a [`JobScheduler`].
pub struct CronTaskScheduler {
    inner: JobScheduler,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
}

impl CronTaskScheduler {
    /// Create a new scheduler.
    pub async fn new(
        config: SchedulerConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SchedulingError> {
        let inner = JobScheduler::new().await.map_err(backend_error)?;
        Ok(Self {
            inner,
            clock,
            config,
        })
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), SchedulingError> {
        if !self.config.enabled {
            tracing::info!("Scheduler disabled");
            return Ok(());
        }

        self.inner.start().await.map_err(backend_error)?;
        tracing::info!("Scheduler started");
        Ok(())
    }

    /// Stop the scheduler. Timers that have not fired are dropped.
    pub async fn shutdown(&self) -> Result<(), SchedulingError> {
        let mut inner = self.inner.clone();
        inner.shutdown().await.map_err(backend_error)?;
        tracing::info!("Scheduler stopped");
        Ok(())
    }

    fn delay_until(&self, at: DateTime<Utc>) -> Duration {
        (at - self.clock.now()).to_std().unwrap_or(Duration::ZERO)
    }
}

fn backend_error(e: JobSchedulerError) -> SchedulingError {
    SchedulingError::Backend(e.to_string())
}

#[async_trait]
impl TaskScheduler for CronTaskScheduler {
    async fn schedule_at(
        &self,
        at: DateTime<Utc>,
        task: ScheduledTask,
    ) -> Result<TimerHandle, SchedulingError> {
        let delay = self.delay_until(at);
        let task = Arc::new(tokio::sync::Mutex::new(Some(task)));

        let job = Job::new_one_shot_async(delay, move |_uuid, _lock| {
            let task = task.clone();
            Box::pin(async move {
                let pending = task.lock().await.take();
                if let Some(t) = pending {
                    t.await;
                }
            })
        })
        .map_err(backend_error)?;

        let id = self.inner.add(job).await.map_err(backend_error)?;
        tracing::debug!(%at, delay_secs = delay.as_secs(), job_id = %id, "One-shot timer armed");
        Ok(TimerHandle(id))
    }

    async fn cancel(&self, handle: TimerHandle) {
        match self.inner.remove(&handle.0).await {
            Ok(()) => tracing::debug!(job_id = %handle, "Timer cancelled"),
            Err(e) => tracing::debug!(job_id = %handle, error = %e, "Timer already gone"),
        }
    }
}
