//! Time sources for `Created`, `LastEdited` and archived reads.

use chrono::{NaiveDateTime, SubsecRound, TimeDelta, Utc};
use std::{
    fmt::Debug,
    sync::{Mutex, PoisonError},
};

pub trait Clock: Debug + Send + Sync + 'static {
    /// The current time in UTC, truncated to whole seconds.
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc().trunc_subsecs(0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    pub fn new(now: NaiveDateTime) -> ManualClock {
        ManualClock {
            now: Mutex::new(now.trunc_subsecs(0)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now.trunc_subsecs(0);
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
