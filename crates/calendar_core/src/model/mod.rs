//! Calendar domain model.
//!
//! # Responsibility
//! - Define the value and entity types the calendar aggregate coordinates.
//! - Keep slot-grid rules local to `Day` so the aggregate only orchestrates.
//!
//! # Invariants
//! - Every event is identified by a stable `EventId`.
//! - A reserved slot range is contiguous and held by exactly one event.

pub mod day;
pub mod event;
pub mod reminder;
