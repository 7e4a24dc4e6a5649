//! Deterministic stand-ins for the clock and timer ports.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::SchedulingError;
use crate::ports::{Clock, ScheduledTask, TaskScheduler, TimerHandle};

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock().unwrap() = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Default)]
struct Timers {
    armed: Vec<(TimerHandle, DateTime<Utc>)>,
    cancelled: Vec<TimerHandle>,
    pending: HashMap<TimerHandle, (DateTime<Utc>, ScheduledTask)>,
}

/// Timer facility that records every call and fires only on demand.
#[derive(Default)]
pub struct RecordingTaskScheduler {
    timers: Mutex<Timers>,
}

impl RecordingTaskScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every timer ever armed, in arming order.
    pub fn armed(&self) -> Vec<(TimerHandle, DateTime<Utc>)> {
        self.timers.lock().unwrap().armed.clone()
    }

    /// Timers cancelled before they fired.
    pub fn cancelled(&self) -> Vec<TimerHandle> {
        self.timers.lock().unwrap().cancelled.clone()
    }

    /// Timers neither fired nor cancelled, with their fire instants.
    pub fn pending(&self) -> Vec<(TimerHandle, DateTime<Utc>)> {
        let timers = self.timers.lock().unwrap();
        let mut pending: Vec<_> = timers
            .pending
            .iter()
            .map(|(handle, (at, _))| (*handle, *at))
            .collect();
        pending.sort_by_key(|(_, at)| *at);
        pending
    }

    /// Run the task behind `handle` to completion. Returns `false` when the
    /// timer was cancelled or already fired.
    pub async fn fire(&self, handle: TimerHandle) -> bool {
        let task = self.timers.lock().unwrap().pending.remove(&handle);
        match task {
            Some((_, task)) => {
                task.await;
                true
            }
            None => false,
        }
    }

    /// Fire every pending timer, earliest first. Returns how many ran.
    pub async fn fire_all(&self) -> usize {
        let mut fired = 0;
        for (handle, _) in self.pending() {
            if self.fire(handle).await {
                fired += 1;
            }
        }
        fired
    }
}

#[async_trait]
impl TaskScheduler for RecordingTaskScheduler {
    async fn schedule_at(
        &self,
        at: DateTime<Utc>,
        task: ScheduledTask,
    ) -> Result<TimerHandle, SchedulingError> {
        let handle = TimerHandle(Uuid::new_v4());
        let mut timers = self.timers.lock().unwrap();
        timers.armed.push((handle, at));
        timers.pending.insert(handle, (at, task));
        Ok(handle)
    }

    async fn cancel(&self, handle: TimerHandle) {
        let mut timers = self.timers.lock().unwrap();
        if timers.pending.remove(&handle).is_some() {
            timers.cancelled.push(handle);
        }
    }
}
