//! SimQuake uploader.
//!
//! The loop that feeds the Pages dashboard: generate a synthetic event,
//! rewrite the JSON feed file, commit and push it, sleep, repeat.

pub mod config;
pub mod publisher;
pub mod scheduler;

pub use config::UploaderConfig;
pub use publisher::{PublishError, Publisher, PushMode};
pub use scheduler::{compute_sleep, Scheduler, SchedulerState, SleepPolicy};
