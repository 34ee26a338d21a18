//! Deterministic replay of recorded performance traces
//!
//! Feeds every step of a [`Trace`] through a [`VitalsMonitor`] backed by a
//! [`ReplaySource`] and reports the resulting board.

pub mod report;
pub mod trace;

use std::cell::Cell;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info};
use vitals_core::{MetricsBoard, MonitorConfig, ReplaySource, VitalsMonitor};

pub use report::{OutputFormat, Reporter};
pub use trace::{Trace, TraceStep};

/// Result of replaying a whole trace
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutcome {
    pub steps: usize,
    /// Metric updates published during the replay
    pub updates: usize,
    /// Streams that could not be observed
    pub failures: Vec<String>,
    pub board: MetricsBoard,
}

pub fn replay(trace: &Trace, config: &MonitorConfig) -> ReplayOutcome {
    let source = ReplaySource::new();
    for entry_type in &trace.unsupported {
        source.mark_unsupported(*entry_type);
    }

    let updates = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&updates);

    let mut monitor = VitalsMonitor::new(config.clone());
    monitor.start(&source, move |_board| counter.set(counter.get() + 1));
    let failures = monitor.failures().iter().map(|e| e.to_string()).collect();

    for (index, step) in trace.steps.iter().enumerate() {
        match step.to_batch() {
            Some(batch) => {
                let delivered = source.deliver(batch);
                debug!(step = index, delivered, "Delivered batch");
            }
            None => {
                monitor.reset_cls();
            }
        }
    }

    let board = monitor.snapshot();
    monitor.stop();

    info!(steps = trace.steps.len(), updates = updates.get(), "Replay finished");

    ReplayOutcome {
        steps: trace.steps.len(),
        updates: updates.get(),
        failures,
        board,
    }
}
