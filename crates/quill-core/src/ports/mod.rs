//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod repository;
mod timer;

pub use clock::{Clock, SystemClock};
pub use repository::{ArticleRepository, BaseRepository};
pub use timer::{ScheduledTask, TaskScheduler, TimerHandle};
