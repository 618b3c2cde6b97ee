//! Day-boundary rules: task rollover, qaza eligibility, prayer toggles and scores.
//!
//! Nothing here touches storage; [`crate::session`] feeds these functions with
//! what it loaded and persists what they return.

pub mod clock;
pub mod qaza;
pub mod rollover;
pub mod score;
pub mod toggle;

pub use clock::{advance_day_boundary, Clock, DayWatcher, SystemClock};
pub use qaza::compute_prayer_qaza;
pub use rollover::{compute_task_rollover, TaskRollover};
pub use score::{average, growth_scores, percent};
pub use toggle::toggle_outcome;
