//! Recorded trace format
//!
//! ```json
//! {
//!   "unsupported": ["first-input"],
//!   "steps": [
//!     { "type": "layout-shift", "entries": [{ "value": 0.05, "startTime": 0 }] },
//!     { "type": "reset-cls" }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use vitals_core::{EntryBatch, EntryType, FirstInputEntry, LayoutShiftEvent, LcpEntry};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Trace {
    /// Streams the simulated host refuses to observe
    #[serde(default)]
    pub unsupported: Vec<EntryType>,
    pub steps: Vec<TraceStep>,
}

/// One replayed delivery or user action
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum TraceStep {
    LayoutShift { entries: Vec<LayoutShiftEvent> },
    LargestContentfulPaint { entries: Vec<LcpEntry> },
    FirstInput { entries: Vec<FirstInputEntry> },
    ResetCls,
}

impl TraceStep {
    /// The batch to deliver, or `None` for user actions
    pub fn to_batch(&self) -> Option<EntryBatch> {
        match self {
            TraceStep::LayoutShift { entries } => Some(EntryBatch::LayoutShift(entries.clone())),
            TraceStep::LargestContentfulPaint { entries } => {
                Some(EntryBatch::LargestContentfulPaint(entries.clone()))
            }
            TraceStep::FirstInput { entries } => Some(EntryBatch::FirstInput(entries.clone())),
            TraceStep::ResetCls => None,
        }
    }
}

impl Trace {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace file: {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("Failed to parse trace JSON")
    }
}
