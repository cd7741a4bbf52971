//! Event id generation contracts.
//!
//! # Invariants
//! - Every generator yields ids unique for the lifetime of the process.

use crate::model::event::EventId;
use uuid::Uuid;

/// Source of fresh event ids.
pub trait EventIdGenerator {
    fn next_id(&mut self) -> EventId;
}

/// Random UUID v4 ids in hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidEventIdGenerator;

impl EventIdGenerator for UuidEventIdGenerator {
    fn next_id(&mut self) -> EventId {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-<n>` ids starting at 1.
///
/// Used by smoke runs and tests where stable ids make output comparable.
#[derive(Debug, Clone)]
pub struct SequentialEventIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialEventIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl EventIdGenerator for SequentialEventIdGenerator {
    fn next_id(&mut self) -> EventId {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
