//! Host performance-event source abstraction
//!
//! A source pushes batches of entries for each registered stream. The
//! browser implementation lives in the wasm bindings; [`crate::replay`]
//! provides an in-memory one for tests and trace replay.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{EntryType, FirstInputEntry, LayoutShiftEvent, LcpEntry};

/// One delivery from a host stream, entries in occurrence order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "entries", rename_all = "kebab-case")]
pub enum EntryBatch {
    LayoutShift(Vec<LayoutShiftEvent>),
    LargestContentfulPaint(Vec<LcpEntry>),
    FirstInput(Vec<FirstInputEntry>),
}

impl EntryBatch {
    pub fn entry_type(&self) -> EntryType {
        match self {
            EntryBatch::LayoutShift(_) => EntryType::LayoutShift,
            EntryBatch::LargestContentfulPaint(_) => EntryType::LargestContentfulPaint,
            EntryBatch::FirstInput(_) => EntryType::FirstInput,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            EntryBatch::LayoutShift(entries) => entries.len(),
            EntryBatch::LargestContentfulPaint(entries) => entries.len(),
            EntryBatch::FirstInput(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parameters for registering a single stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserveRequest {
    pub entry_type: EntryType,
    /// Also deliver entries recorded before registration
    pub buffered: bool,
}

/// Callback invoked by a source for every delivered batch
pub type BatchListener = Box<dyn FnMut(EntryBatch)>;

/// A live registration against a source
pub trait Observation {
    /// Stop delivery. Calling this more than once is a no-op.
    fn disconnect(&mut self);
}

/// Push-based producer of performance entries
pub trait PerformanceSource {
    /// Register `listener` for one stream.
    ///
    /// Returns [`crate::VitalsError::ObservationUnsupported`] when the host
    /// cannot observe the requested entry type.
    fn observe(
        &self,
        request: ObserveRequest,
        listener: BatchListener,
    ) -> Result<Box<dyn Observation>>;
}
