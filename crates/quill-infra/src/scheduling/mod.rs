//! Timer facility implementations.

mod cron;

pub use cron::{CronTaskScheduler, SchedulerConfig};
