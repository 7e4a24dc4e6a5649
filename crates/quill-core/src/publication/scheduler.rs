use std::sync::{Arc, OnceLock};

use tokio::sync::Mutex;

use crate::ports::{TaskScheduler, TimerHandle};

use super::task::AutoPublicationTaskFactory;
use super::trigger::AutoPublicationTrigger;

/// Keeps at most one auto-publication task armed, aimed at the earliest
/// scheduled article.
///
/// Constructed once at startup and shared; every mutation that may change
/// what is due next calls [`schedule_new`](Self::schedule_new), which always
/// recomputes from the store instead of adjusting the existing timer.
pub struct AutoPublicationScheduler {
    trigger: AutoPublicationTrigger,
    tasks: AutoPublicationTaskFactory,
    timers: Arc<dyn TaskScheduler>,
    current: Arc<Mutex<Option<TimerHandle>>>,
}

impl AutoPublicationScheduler {
    pub fn new(
        trigger: AutoPublicationTrigger,
        tasks: AutoPublicationTaskFactory,
        timers: Arc<dyn TaskScheduler>,
    ) -> Self {
        Self {
            trigger,
            tasks,
            timers,
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// Cancel the pending task (if any) and arm a fresh one for the next
    /// scheduled publication time.
    ///
    /// Failures are logged; afterwards no timer is armed until the next call.
    pub async fn schedule_new(&self) {
        // Held across the whole swap so concurrent callers cannot leak a timer.
        let mut current = self.current.lock().await;

        if let Some(handle) = current.take() {
            self.timers.cancel(handle).await;
            tracing::debug!(timer = %handle, "Cancelled pending auto-publication task");
        }

        let task = self.tasks.create();

        let next = match self.trigger.next_execution_time().await {
            Ok(Some(at)) => at,
            Ok(None) => return,
            Err(e) => {
                tracing::error!(error = %e, "Failed to compute next auto-publication time");
                return;
            }
        };

        // Set once armed; the finished job clears the slot only if it still
        // holds this handle.
        let own_handle = Arc::new(OnceLock::new());
        let job = {
            let own_handle = own_handle.clone();
            let slot = self.current.clone();
            Box::pin(async move {
                if let Err(e) = task.run().await {
                    tracing::error!(error = %e, "Auto-publication task failed");
                }
                if let Some(handle) = own_handle.get() {
                    let mut current = slot.lock().await;
                    if current.as_ref() == Some(handle) {
                        *current = None;
                    }
                }
            })
        };

        match self.timers.schedule_at(next, job).await {
            Ok(handle) => {
                let _ = own_handle.set(handle);
                tracing::info!(timer = %handle, run_at = %next, "Auto-publication task armed");
                *current = Some(handle);
            }
            Err(e) => {
                tracing::error!(error = %e, run_at = %next, "Failed to arm auto-publication task");
            }
        }
    }

    /// Handle of the armed timer, `None` once its task has completed.
    pub async fn pending_timer(&self) -> Option<TimerHandle> {
        *self.current.lock().await
    }

    /// Cancel the pending task. Called once at process shutdown.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.current.lock().await.take() {
            self.timers.cancel(handle).await;
            tracing::info!(timer = %handle, "Auto-publication scheduler stopped");
        }
    }
}
