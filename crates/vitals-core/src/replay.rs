//! In-memory performance source
//!
//! Batches are delivered synchronously, in the order they are handed to
//! [`ReplaySource::deliver`], so windowing behaviour can be reproduced
//! exactly from a fixed sequence of synthetic entries.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

use crate::error::{Result, VitalsError};
use crate::source::{BatchListener, EntryBatch, ObserveRequest, Observation, PerformanceSource};
use crate::types::EntryType;

struct Slot {
    id: u64,
    entry_type: EntryType,
    listener: Rc<RefCell<BatchListener>>,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    slots: Vec<Slot>,
    unsupported: HashSet<EntryType>,
}

impl Registry {
    fn is_live(&self, id: u64) -> bool {
        self.slots.iter().any(|slot| slot.id == id)
    }
}

/// Replayable source. Clones share the same listener registry.
#[derive(Clone, Default)]
pub struct ReplaySource {
    registry: Rc<RefCell<Registry>>,
}

impl ReplaySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make future `observe` calls for `entry_type` fail
    pub fn mark_unsupported(&self, entry_type: EntryType) {
        self.registry.borrow_mut().unsupported.insert(entry_type);
    }

    /// Number of live listeners registered for `entry_type`
    pub fn listener_count(&self, entry_type: EntryType) -> usize {
        self.registry
            .borrow()
            .slots
            .iter()
            .filter(|slot| slot.entry_type == entry_type)
            .count()
    }

    /// Push a batch to every live listener of its stream.
    ///
    /// Returns the number of listeners that received it. A listener that is
    /// still running an outer delivery is skipped rather than re-entered.
    pub fn deliver(&self, batch: EntryBatch) -> usize {
        let entry_type = batch.entry_type();
        let targets: Vec<(u64, Rc<RefCell<BatchListener>>)> = self
            .registry
            .borrow()
            .slots
            .iter()
            .filter(|slot| slot.entry_type == entry_type)
            .map(|slot| (slot.id, Rc::clone(&slot.listener)))
            .collect();

        let mut delivered = 0;
        for (id, listener) in targets {
            // An earlier listener may have disconnected this one
            if !self.registry.borrow().is_live(id) {
                continue;
            }
            let Ok(mut listener) = listener.try_borrow_mut() else {
                warn!(%entry_type, "Skipping listener busy with an outer delivery");
                continue;
            };
            (*listener)(batch.clone());
            delivered += 1;
        }

        trace!(%entry_type, entries = batch.len(), delivered, "Replayed batch");
        delivered
    }
}

impl PerformanceSource for ReplaySource {
    fn observe(
        &self,
        request: ObserveRequest,
        listener: BatchListener,
    ) -> Result<Box<dyn Observation>> {
        let mut registry = self.registry.borrow_mut();
        if registry.unsupported.contains(&request.entry_type) {
            return Err(VitalsError::unsupported(
                request.entry_type,
                "entry type not supported by replay source",
            ));
        }

        let id = registry.next_id;
        registry.next_id += 1;
        registry.slots.push(Slot {
            id,
            entry_type: request.entry_type,
            listener: Rc::new(RefCell::new(listener)),
        });

        Ok(Box::new(ReplayObservation {
            id,
            registry: Rc::downgrade(&self.registry),
        }))
    }
}

struct ReplayObservation {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Observation for ReplayObservation {
    fn disconnect(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().slots.retain(|slot| slot.id != self.id);
        }
    }
}
