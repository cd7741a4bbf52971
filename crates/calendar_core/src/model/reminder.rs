//! Reminder value model.
//!
//! # Responsibility
//! - Define the timestamped notice attached to one event.
//!
//! # Invariants
//! - A reminder is immutable after construction.
//! - A reminder has no identity beyond its position in the owning event list.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Delivery channel tag for a reminder.
///
/// Reminders are only stored; delivery is handled outside core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderKind {
    /// Delivered by email.
    #[default]
    Email,
    /// Delivered by the host system notification center.
    System,
}

impl ReminderKind {
    /// Returns the stable lowercase tag used in display and wire output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::System => "system",
        }
    }
}

impl Display for ReminderKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamped notice owned by an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    /// Local wall-clock time the reminder should fire at.
    pub fire_at: NaiveDateTime,
    pub kind: ReminderKind,
}

impl Reminder {
    pub fn new(fire_at: NaiveDateTime, kind: ReminderKind) -> Self {
        Self { fire_at, kind }
    }

    /// Creates a reminder with the default `Email` kind.
    pub fn email(fire_at: NaiveDateTime) -> Self {
        Self::new(fire_at, ReminderKind::default())
    }
}

impl Display for Reminder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Reminder on {} of type {}", self.fire_at, self.kind)
    }
}
