//! Ingestion statistics tracking.
//!
//! This module provides thread-safe counters for what happened to each
//! journey record on its way to storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::IngestEvent;

/// Thread-safe ingestion statistics tracker.
///
/// Every `IngestEvent` variant is initialized to zero on creation, so the
/// counters can be shared across the reader, the queue consumer and the
/// reporting code through an `Arc`.
pub struct IngestStats {
    events: HashMap<IngestEvent, AtomicUsize>,
}

impl IngestStats {
    pub fn new() -> Self {
        let mut events = HashMap::new();
        for event in IngestEvent::iter() {
            events.insert(event, AtomicUsize::new(0));
        }
        IngestStats { events }
    }

    /// Increment an event counter.
    pub fn increment(&self, event: IngestEvent) {
        self.add(event, 1);
    }

    /// Add `count` occurrences of an event.
    pub fn add(&self, event: IngestEvent, count: usize) {
        if let Some(counter) = self.events.get(&event) {
            counter.fetch_add(count, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment counter for {:?} which is not in the map. \
                 This indicates a bug in IngestStats initialization.",
                event
            );
        }
    }

    pub fn get(&self, event: IngestEvent) -> usize {
        self.events
            .get(&event)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Sum of all events that mean a journey did not reach the saver or storage.
    pub fn total_rejected(&self) -> usize {
        IngestEvent::iter()
            .filter(|e| e.is_rejection())
            .map(|e| self.get(e))
            .sum()
    }
}

impl Default for IngestStats {
    fn default() -> Self {
        Self::new()
    }
}
