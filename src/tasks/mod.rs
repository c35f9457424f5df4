//! Scheduled work
//!
//! # Tasks
//! - Debounce: collapses bursts of calls into one delayed invocation
//! - Dashboard refresh: reloads dashboard metrics at a fixed interval

mod debounce;
mod refresh;

pub use debounce::{debounce, Debounced};
pub use refresh::spawn_refresh_task;
