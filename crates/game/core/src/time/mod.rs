//! Time-block scheduler.
//!
//! The scheduler owns a calendar [`Clock`] and the day's [`TimeBlock`]s. Time
//! only moves through [`TimeScheduler::advance`], which cascades hour → day →
//! week/month → year rollovers.
//!
//! Blocks are half-open hour ranges (`[start, end)`) that can each be reserved
//! for one activity per day. Activities may declare a time cost in hours;
//! [`TimeScheduler::has_time_for`] checks whether enough free, not-yet-started
//! block time remains today.

mod block;
mod clock;
mod error;
mod scheduler;

pub use block::{TimeBlock, TimeBlockTemplate};
pub use clock::{Clock, DayOfWeek};
pub use error::AllocationError;
pub use scheduler::{ScheduleState, TimeConfig, TimeScheduler, TimeSnapshot};
