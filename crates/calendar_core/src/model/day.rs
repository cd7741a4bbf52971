//! Per-date slot grid model.
//!
//! # Responsibility
//! - Represent one calendar date as a fixed grid of 15-minute slots.
//! - Reserve, release and move contiguous slot ranges for event ids.
//!
//! # Invariants
//! - The grid always holds exactly `SLOTS_PER_DAY` slots in chronological order.
//! - Every mutating operation is all-or-nothing: a failed call leaves the grid
//!   unchanged.
//! - One slot is held by at most one event id.

use crate::model::event::EventId;
use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Scheduling granularity in minutes.
pub const SLOT_MINUTES: u32 = 15;
/// Number of slots in one day (00:00 through 23:45 inclusive).
pub const SLOTS_PER_DAY: usize = (24 * 60 / SLOT_MINUTES) as usize;

const SLOT_SECONDS: u32 = SLOT_MINUTES * 60;

/// Errors raised by slot grid operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// Requested range overlaps a reservation held by another event.
    SlotNotAvailable { slot: NaiveTime, holder: EventId },
    /// No slot on this day is held by the event.
    EventNotScheduled(EventId),
    /// Range start is not strictly before range end.
    InvalidRange { start: NaiveTime, end: NaiveTime },
    /// Time is not on a slot boundary.
    MisalignedTime(NaiveTime),
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SlotNotAvailable { slot, holder } => write!(
                f,
                "slot {} is not available: held by event {holder}",
                slot.format("%H:%M")
            ),
            Self::EventNotScheduled(event_id) => {
                write!(f, "event not scheduled on this day: {event_id}")
            }
            Self::InvalidRange { start, end } => write!(
                f,
                "invalid time range: start {} must be before end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
            Self::MisalignedTime(time) => write!(
                f,
                "time {} is not on a {SLOT_MINUTES}-minute boundary",
                time.format("%H:%M:%S")
            ),
        }
    }
}

impl Error for SlotError {}

/// One 15-minute interval of a day, identified by its position in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(usize);

impl Slot {
    /// Resolves the slot starting at `time`.
    ///
    /// # Errors
    /// - Returns `MisalignedTime` when `time` is not on a slot boundary.
    pub fn from_time(time: NaiveTime) -> Result<Self, SlotError> {
        let seconds = time.num_seconds_from_midnight();
        if seconds % SLOT_SECONDS != 0 || time.nanosecond() != 0 {
            return Err(SlotError::MisalignedTime(time));
        }
        Ok(Self((seconds / SLOT_SECONDS) as usize))
    }

    /// Zero-based grid position.
    pub fn index(self) -> usize {
        self.0
    }

    /// Time-of-day this slot starts at.
    pub fn start_time(self) -> NaiveTime {
        slot_boundary(self.0)
    }

    /// All slots of a day in chronological order.
    pub fn all() -> impl Iterator<Item = Slot> {
        (0..SLOTS_PER_DAY).map(Slot)
    }
}

/// Contiguous half-open slot range `[start, end)`.
///
/// `end` may equal `SLOTS_PER_DAY`, i.e. the range runs to the end of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRange {
    start: usize,
    end: usize,
}

impl SlotRange {
    /// Builds a range from wall-clock boundaries.
    ///
    /// An `end` of `00:00` denotes the end of the day (24:00), so the last
    /// slot (23:45) is reachable.
    ///
    /// # Errors
    /// - `MisalignedTime` when either boundary is off the slot grid.
    /// - `InvalidRange` when the range is empty or reversed.
    pub fn from_times(start: NaiveTime, end: NaiveTime) -> Result<Self, SlotError> {
        let start_index = Slot::from_time(start)?.index();
        let end_index = match Slot::from_time(end)?.index() {
            0 => SLOTS_PER_DAY,
            index => index,
        };
        if start_index >= end_index {
            return Err(SlotError::InvalidRange { start, end });
        }
        Ok(Self {
            start: start_index,
            end: end_index,
        })
    }

    pub fn start_time(&self) -> NaiveTime {
        slot_boundary(self.start)
    }

    /// Exclusive end boundary; `00:00` when the range runs to the end of day.
    pub fn end_time(&self) -> NaiveTime {
        slot_boundary(self.end % SLOTS_PER_DAY)
    }

    /// Number of slots covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Companion to `len()`. Construction rejects empty ranges, so every
    /// range built by `from_times` reports `false`.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, slot: Slot) -> bool {
        (self.start..self.end).contains(&slot.0)
    }

    /// Covered slots in chronological order.
    pub fn slots(&self) -> impl Iterator<Item = Slot> {
        (self.start..self.end).map(Slot)
    }
}

/// Slot grid for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    date: NaiveDate,
    slots: Vec<Option<EventId>>,
}

impl Day {
    /// Creates a day with every slot free.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            slots: vec![None; SLOTS_PER_DAY],
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Reserves `range` for `event_id`.
    ///
    /// # Errors
    /// - `SlotNotAvailable` when any slot in `range` is already held, even by
    ///   `event_id` itself. No slot is marked in that case.
    pub fn add_event(&mut self, event_id: &str, range: SlotRange) -> Result<(), SlotError> {
        self.ensure_available(range, None)?;
        self.mark(event_id, range);
        Ok(())
    }

    /// Releases every slot held by `event_id`.
    ///
    /// Returns the number of released slots.
    ///
    /// # Errors
    /// - `EventNotScheduled` when no slot was held by `event_id`.
    pub fn delete_event(&mut self, event_id: &str) -> Result<usize, SlotError> {
        let released = self.clear(event_id);
        if released == 0 {
            return Err(SlotError::EventNotScheduled(event_id.to_string()));
        }
        Ok(released)
    }

    /// Moves the reservation of `event_id` to `range`.
    ///
    /// Slots in `range` may already be held by `event_id`. Validation happens
    /// before any slot is released, so a failure keeps the old reservation.
    ///
    /// # Errors
    /// - `SlotNotAvailable` when a slot in `range` is held by another event.
    pub fn update_event(&mut self, event_id: &str, range: SlotRange) -> Result<(), SlotError> {
        self.ensure_available(range, Some(event_id))?;
        self.clear(event_id);
        self.mark(event_id, range);
        Ok(())
    }

    /// Checks that every slot in `range` is free or held by `owner`.
    ///
    /// # Errors
    /// - `SlotNotAvailable` naming the first conflicting slot.
    pub fn ensure_available(
        &self,
        range: SlotRange,
        owner: Option<&str>,
    ) -> Result<(), SlotError> {
        for slot in range.slots() {
            if let Some(holder) = &self.slots[slot.index()] {
                if owner != Some(holder.as_str()) {
                    return Err(SlotError::SlotNotAvailable {
                        slot: slot.start_time(),
                        holder: holder.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Event id holding `slot`, if any.
    pub fn holder(&self, slot: Slot) -> Option<&str> {
        self.slots[slot.index()].as_deref()
    }

    /// Every slot with its holder, in chronological order.
    pub fn slots(&self) -> impl Iterator<Item = (Slot, Option<&str>)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(index, holder)| (Slot(index), holder.as_deref()))
    }

    /// Start times of free slots in chronological order.
    pub fn available_slots(&self) -> Vec<NaiveTime> {
        self.slots()
            .filter(|(_, holder)| holder.is_none())
            .map(|(slot, _)| slot.start_time())
            .collect()
    }

    /// Range currently held by `event_id`.
    ///
    /// Reservations are contiguous, so the first and last held slot bound it.
    pub fn reserved_range(&self, event_id: &str) -> Option<SlotRange> {
        let mut held = self
            .slots()
            .filter(|(_, holder)| *holder == Some(event_id))
            .map(|(slot, _)| slot.index());
        let start = held.next()?;
        let last = held.last().unwrap_or(start);
        Some(SlotRange {
            start,
            end: last + 1,
        })
    }

    pub fn holds(&self, event_id: &str) -> bool {
        self.slots
            .iter()
            .any(|holder| holder.as_deref() == Some(event_id))
    }

    /// Returns whether no slot is reserved.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    fn mark(&mut self, event_id: &str, range: SlotRange) {
        for slot in range.slots() {
            self.slots[slot.index()] = Some(event_id.to_string());
        }
    }

    fn clear(&mut self, event_id: &str) -> usize {
        let mut released = 0;
        for holder in &mut self.slots {
            if holder.as_deref() == Some(event_id) {
                *holder = None;
                released += 1;
            }
        }
        released
    }
}

fn slot_boundary(index: usize) -> NaiveTime {
    NaiveTime::default() + Duration::minutes((index as u32 * SLOT_MINUTES) as i64)
}
