//! Core domain logic for the personal calendar.
//! This crate is the single source of truth for scheduling invariants.

pub mod logging;
pub mod model;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::day::{Day, Slot, SlotError, SlotRange, SLOTS_PER_DAY, SLOT_MINUTES};
pub use model::event::{Event, EventError, EventId};
pub use model::reminder::{Reminder, ReminderKind};
pub use service::calendar::{Calendar, CalendarError, CalendarResult, EventChanges, NewEvent};
pub use service::id_gen::{EventIdGenerator, SequentialEventIdGenerator, UuidEventIdGenerator};
pub use service::shared::SharedCalendar;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
