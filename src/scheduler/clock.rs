//! Wall-clock source for session timestamps.

use std::fmt::Debug;

use chrono::{DateTime, Local};

/// Supplies the wall-clock time stamped on checks and history entries.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Local>;
}

/// The system's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
