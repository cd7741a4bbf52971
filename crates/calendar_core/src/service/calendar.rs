//! Calendar aggregate service.
//!
//! # Responsibility
//! - Own every event (by id) and every day grid (by date).
//! - Keep event time ranges and day reservations consistent across
//!   create, update and delete flows.
//!
//! # Invariants
//! - For every event, the slots holding its id across all days equal exactly
//!   its `[start_time, end_time)` range on its date.
//! - Every operation validates and looks up before it mutates; a failed call
//!   leaves events and days unchanged.
//! - Days are created lazily and never pruned, even when emptied.

use crate::model::day::{Day, SlotError, SlotRange};
use crate::model::event::{Event, EventError, EventId};
use crate::model::reminder::{Reminder, ReminderKind};
use crate::service::id_gen::{EventIdGenerator, UuidEventIdGenerator};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CalendarResult<T> = Result<T, CalendarError>;

/// Error for calendar use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Target event does not exist.
    EventNotFound(EventId),
    /// Caller-provided id is already registered.
    DuplicateEvent(EventId),
    /// Reminder index is outside the event's reminder list.
    ReminderNotFound {
        event_id: EventId,
        index: usize,
        len: usize,
    },
    /// Requested range overlaps another event's reservation.
    SlotNotAvailable { slot: NaiveTime, holder: EventId },
    /// Start is not strictly before end.
    InvalidRange { start: NaiveTime, end: NaiveTime },
    /// Time is not on a slot boundary.
    MisalignedTime(NaiveTime),
    /// Event store and day grids disagree.
    InconsistentState(&'static str),
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::DuplicateEvent(id) => write!(f, "event already exists: {id}"),
            Self::ReminderNotFound {
                event_id,
                index,
                len,
            } => write!(
                f,
                "reminder not found: index {index} on event {event_id} (event has {len})"
            ),
            Self::SlotNotAvailable { slot, holder } => write!(
                f,
                "slot {} is not available: held by event {holder}",
                slot.format("%H:%M")
            ),
            Self::InvalidRange { start, end } => write!(
                f,
                "invalid time range: start {} must be before end {}",
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
            Self::MisalignedTime(time) => {
                write!(f, "time {} is not on a slot boundary", time.format("%H:%M:%S"))
            }
            Self::InconsistentState(details) => write!(f, "inconsistent calendar state: {details}"),
        }
    }
}

impl Error for CalendarError {}

impl From<SlotError> for CalendarError {
    fn from(value: SlotError) -> Self {
        match value {
            SlotError::SlotNotAvailable { slot, holder } => Self::SlotNotAvailable { slot, holder },
            SlotError::InvalidRange { start, end } => Self::InvalidRange { start, end },
            SlotError::MisalignedTime(time) => Self::MisalignedTime(time),
            SlotError::EventNotScheduled(_) => {
                Self::InconsistentState("event holds no slots on its day")
            }
        }
    }
}

/// Request model for scheduling a new event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Caller-provided id; a fresh one is generated when `None`.
    pub id: Option<EventId>,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// Exclusive end; `00:00` means the end of the day.
    pub end_time: NaiveTime,
}

impl NewEvent {
    /// Builds a request with a generated id and empty description.
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: String::new(),
            date,
            start_time,
            end_time,
        }
    }

    pub fn with_id(mut self, id: impl Into<EventId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Full replacement of an event's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventChanges {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl EventChanges {
    /// Starts from the current field values of `event`.
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_times(mut self, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Aggregate root owning events and day grids.
pub struct Calendar<G: EventIdGenerator = UuidEventIdGenerator> {
    events: HashMap<EventId, Event>,
    /// Registration order of live event ids.
    order: Vec<EventId>,
    days: BTreeMap<NaiveDate, Day>,
    ids: G,
}

impl Calendar {
    /// Creates an empty calendar issuing UUID v4 event ids.
    pub fn new() -> Self {
        Self::with_id_generator(UuidEventIdGenerator)
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: EventIdGenerator> Calendar<G> {
    /// Creates an empty calendar using the provided id generator.
    pub fn with_id_generator(ids: G) -> Self {
        Self {
            events: HashMap::new(),
            order: Vec::new(),
            days: BTreeMap::new(),
            ids,
        }
    }

    /// Schedules a new event and reserves its slots.
    ///
    /// # Contract
    /// - The day for `request.date` is created when absent.
    /// - Returns the registered event id.
    ///
    /// # Errors
    /// - `InvalidRange` / `MisalignedTime` for a bad time range.
    /// - `DuplicateEvent` when a caller-provided id is taken.
    /// - `SlotNotAvailable` when the range overlaps another event; nothing is
    ///   registered in that case.
    pub fn add_event(&mut self, request: NewEvent) -> CalendarResult<EventId> {
        let range = SlotRange::from_times(request.start_time, request.end_time)?;
        let id = match request.id {
            Some(id) => id,
            None => self.ids.next_id(),
        };
        if self.events.contains_key(&id) {
            return Err(CalendarError::DuplicateEvent(id));
        }

        self.reserve_new(&id, request.date, range)?;
        self.register(Event::new(
            id.clone(),
            request.title,
            request.description,
            request.date,
            request.start_time,
            request.end_time,
        ));
        info!(
            "event=calendar_add module=calendar status=ok event_id={} date={} slots={}",
            id,
            request.date,
            range.len()
        );
        Ok(id)
    }

    /// Appends a reminder to an event.
    pub fn add_reminder(
        &mut self,
        event_id: &str,
        fire_at: NaiveDateTime,
        kind: ReminderKind,
    ) -> CalendarResult<()> {
        let event = self.event_mut(event_id)?;
        event.add_reminder(fire_at, kind);
        debug!(
            "event=reminder_add module=calendar status=ok event_id={} kind={} count={}",
            event_id,
            kind,
            event.reminders().len()
        );
        Ok(())
    }

    /// Lists free slot start times on `date` in chronological order.
    ///
    /// A date without a day grid yields an empty list: no grid means no known
    /// slots, not a fully free day. Use `ensure_day` to materialize one.
    pub fn find_available_slots(&self, date: NaiveDate) -> Vec<NaiveTime> {
        self.days
            .get(&date)
            .map(Day::available_slots)
            .unwrap_or_default()
    }

    /// Replaces an event's fields and moves its reservation.
    ///
    /// # Contract
    /// - Same date: the event is updated in place and keeps its reminders.
    /// - New date: the event is rebuilt under the same id on the new date
    ///   without reminders; the old day releases its slots.
    ///
    /// # Errors
    /// - `EventNotFound` when `event_id` is unknown.
    /// - `InvalidRange` / `MisalignedTime` for a bad time range.
    /// - `SlotNotAvailable` when the new range overlaps another event.
    ///
    /// Every error leaves the calendar unchanged.
    pub fn update_event(&mut self, event_id: &str, changes: EventChanges) -> CalendarResult<()> {
        let current_date = self
            .events
            .get(event_id)
            .ok_or_else(|| CalendarError::EventNotFound(event_id.to_string()))?
            .date;
        let range = SlotRange::from_times(changes.start_time, changes.end_time)?;

        if current_date != changes.date {
            if let Some(target) = self.days.get(&changes.date) {
                target.ensure_available(range, None)?;
            }
            self.delete_event(event_id)?;
            self.reserve_new(event_id, changes.date, range)?;
            self.register(Event::new(
                event_id,
                changes.title,
                changes.description,
                changes.date,
                changes.start_time,
                changes.end_time,
            ));
            info!(
                "event=calendar_move module=calendar status=ok event_id={} from={} to={}",
                event_id, current_date, changes.date
            );
            return Ok(());
        }

        self.days
            .entry(current_date)
            .or_insert_with(|| Day::new(current_date))
            .update_event(event_id, range)
            .inspect_err(|err| {
                warn!(
                    "event=calendar_update module=calendar status=rejected event_id={} reason=\"{}\"",
                    event_id, err
                );
            })?;

        let event = self.event_mut(event_id)?;
        event.title = changes.title;
        event.description = changes.description;
        event.start_time = changes.start_time;
        event.end_time = changes.end_time;
        info!(
            "event=calendar_update module=calendar status=ok event_id={} date={} slots={}",
            event_id,
            current_date,
            range.len()
        );
        Ok(())
    }

    /// Removes an event and releases its slots.
    ///
    /// Returns the removed event snapshot.
    pub fn delete_event(&mut self, event_id: &str) -> CalendarResult<Event> {
        let date = self
            .events
            .get(event_id)
            .ok_or_else(|| CalendarError::EventNotFound(event_id.to_string()))?
            .date;

        match self.days.get_mut(&date).map(|day| day.delete_event(event_id)) {
            Some(Ok(released)) => debug!(
                "event=slots_release module=calendar status=ok event_id={} date={} slots={}",
                event_id, date, released
            ),
            Some(Err(err)) => warn!(
                "event=slots_release module=calendar status=missing event_id={} date={} reason=\"{}\"",
                event_id, date, err
            ),
            None => warn!(
                "event=slots_release module=calendar status=missing event_id={} date={} reason=\"no day\"",
                event_id, date
            ),
        }

        self.order.retain(|id| id != event_id);
        let event = self
            .events
            .remove(event_id)
            .ok_or(CalendarError::InconsistentState("event vanished during delete"))?;
        info!(
            "event=calendar_delete module=calendar status=ok event_id={} date={}",
            event_id, date
        );
        Ok(event)
    }

    /// Groups events dated within `[start_date, end_date]` by date.
    ///
    /// Within one date, events keep registration order.
    pub fn find_events(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> BTreeMap<NaiveDate, Vec<Event>> {
        let mut grouped: BTreeMap<NaiveDate, Vec<Event>> = BTreeMap::new();
        for event in self.events() {
            if (start_date..=end_date).contains(&event.date) {
                grouped.entry(event.date).or_default().push(event.clone());
            }
        }
        grouped
    }

    /// Removes and returns the reminder at `index` on an event.
    pub fn delete_reminder(&mut self, event_id: &str, index: usize) -> CalendarResult<Reminder> {
        let event = self.event_mut(event_id)?;
        event.delete_reminder(index).map_err(|err| match err {
            EventError::ReminderNotFound { index, len } => CalendarError::ReminderNotFound {
                event_id: event_id.to_string(),
                index,
                len,
            },
        })
    }

    /// Returns an event's reminders in insertion order.
    pub fn list_reminders(&self, event_id: &str) -> CalendarResult<&[Reminder]> {
        self.events
            .get(event_id)
            .map(Event::reminders)
            .ok_or_else(|| CalendarError::EventNotFound(event_id.to_string()))
    }

    pub fn get_event(&self, event_id: &str) -> Option<&Event> {
        self.events.get(event_id)
    }

    /// Live events in registration order.
    ///
    /// An event moved to another date counts as newly registered.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.order.iter().filter_map(|id| self.events.get(id))
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        self.days.get(&date)
    }

    /// Returns the day grid for `date`, creating an empty one when absent.
    pub fn ensure_day(&mut self, date: NaiveDate) -> &Day {
        self.days.entry(date).or_insert_with(|| Day::new(date))
    }

    /// Known day grids in date order, including emptied ones.
    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.days.values()
    }

    fn reserve_new(
        &mut self,
        event_id: &str,
        date: NaiveDate,
        range: SlotRange,
    ) -> CalendarResult<()> {
        self.days
            .entry(date)
            .or_insert_with(|| Day::new(date))
            .add_event(event_id, range)
            .map_err(|err| {
                warn!(
                    "event=slots_reserve module=calendar status=rejected event_id={} date={} reason=\"{}\"",
                    event_id, date, err
                );
                CalendarError::from(err)
            })
    }

    fn register(&mut self, event: Event) {
        self.order.push(event.id.clone());
        self.events.insert(event.id.clone(), event);
    }

    fn event_mut(&mut self, event_id: &str) -> CalendarResult<&mut Event> {
        self.events
            .get_mut(event_id)
            .ok_or_else(|| CalendarError::EventNotFound(event_id.to_string()))
    }
}
