//! Lock-guarded calendar handle for multi-caller hosts.
//!
//! # Invariants
//! - At most one caller mutates the wrapped calendar at a time.
//! - A poisoned lock is recovered: calendar operations validate before they
//!   mutate, so a panicking caller cannot leave a half-applied change.

use crate::service::calendar::Calendar;
use crate::service::id_gen::{EventIdGenerator, UuidEventIdGenerator};
use log::warn;
use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable handle sharing one calendar behind a mutex.
pub struct SharedCalendar<G: EventIdGenerator = UuidEventIdGenerator> {
    inner: Arc<Mutex<Calendar<G>>>,
}

impl<G: EventIdGenerator> SharedCalendar<G> {
    pub fn new(calendar: Calendar<G>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(calendar)),
        }
    }

    /// Runs `f` with exclusive access to the calendar.
    pub fn with<T>(&self, f: impl FnOnce(&mut Calendar<G>) -> T) -> T {
        let mut guard = self.inner.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("event=lock_recovered module=calendar status=degraded");
            poisoned.into_inner()
        });
        f(&mut guard)
    }
}

impl<G: EventIdGenerator> Clone for SharedCalendar<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Default for SharedCalendar {
    fn default() -> Self {
        Self::new(Calendar::new())
    }
}
