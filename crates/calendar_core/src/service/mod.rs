//! Calendar use-case services.
//!
//! # Responsibility
//! - Coordinate event store and day grids behind one aggregate API.
//! - Keep id generation and locking concerns out of the domain model.

pub mod calendar;
pub mod id_gen;
pub mod shared;
