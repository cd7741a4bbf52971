//! Event domain model.
//!
//! # Responsibility
//! - Define the calendar item scheduled on one date.
//! - Own the ordered reminder list of that item.
//!
//! # Invariants
//! - `id` is stable and never reused for another event.
//! - Reminders keep call order, not `fire_at` order.
//! - `start_time < end_time` on the slot grid; checked by `slot_range()` and
//!   enforced by the calendar before an event is registered.

use crate::model::day::{SlotError, SlotRange};
use crate::model::reminder::{Reminder, ReminderKind};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of an event.
///
/// Produced by an `EventIdGenerator` unless the caller supplies one.
pub type EventId = String;

/// Errors raised by event-local operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventError {
    /// Reminder index is outside the current list.
    ReminderNotFound { index: usize, len: usize },
}

impl Display for EventError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReminderNotFound { index, len } => {
                write!(f, "reminder not found: index {index} (event has {len})")
            }
        }
    }
}

impl Error for EventError {}

/// Calendar item with a time range on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// Exclusive end; `00:00` means the end of the day.
    pub end_time: NaiveTime,
    reminders: Vec<Reminder>,
}

impl Event {
    /// Creates an event without reminders.
    ///
    /// The time range is not validated here; see `slot_range()`.
    pub fn new(
        id: impl Into<EventId>,
        title: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            date,
            start_time,
            end_time,
            reminders: Vec::new(),
        }
    }

    /// Appends a reminder to the end of the list.
    pub fn add_reminder(&mut self, fire_at: NaiveDateTime, kind: ReminderKind) {
        self.reminders.push(Reminder::new(fire_at, kind));
    }

    /// Removes and returns the reminder at `index`.
    ///
    /// Reminders after `index` shift down by one position.
    ///
    /// # Errors
    /// - `ReminderNotFound` when `index` is out of bounds; the list is unchanged.
    pub fn delete_reminder(&mut self, index: usize) -> Result<Reminder, EventError> {
        if index >= self.reminders.len() {
            return Err(EventError::ReminderNotFound {
                index,
                len: self.reminders.len(),
            });
        }
        Ok(self.reminders.remove(index))
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    /// Resolves the slot range this event occupies on its date.
    pub fn slot_range(&self) -> Result<SlotRange, SlotError> {
        SlotRange::from_times(self.start_time, self.end_time)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Event title: {}", self.title)?;
        writeln!(f, "Description: {}", self.description)?;
        write!(
            f,
            "Time: {} {} - {}",
            self.date,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}
