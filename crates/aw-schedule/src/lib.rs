//! Scheduler/trigger lowerer (spec §4.5, component C5): compiles fuzzy
//! schedule expressions and `stop-after:` deltas into deterministic cron
//! strings and absolute instants.

mod error;
mod fuzzy;
mod lower;
mod stop_after;

pub use error::ScheduleError;
pub use fuzzy::{resolve_schedule, resolve_with_seed};
pub use lower::lower_schedules;
pub use stop_after::resolve_stop_after;
