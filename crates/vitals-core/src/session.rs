//! Cumulative Layout Shift session windowing
//!
//! Shifts are grouped into a single running session. An event joins the
//! current session when it starts less than [`SESSION_GAP_MS`] after the
//! session's *first* entry; otherwise it opens a new session and the score
//! restarts from that event's value. Events with `had_recent_input` set are
//! never scored.
//!
//! This is a deliberate simplification of the 5s window / 1s gap rule used
//! by the web-vitals library.

use tracing::{debug, trace};

use crate::types::{sanitize_field, LayoutShiftEvent, MetricName, MetricSample};

/// Distance from the session's first entry at which a new session starts
pub const SESSION_GAP_MS: f64 = 500.0;

/// Mutable aggregation state for the current CLS session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClsSession {
    entries: Vec<LayoutShiftEvent>,
    running_score: f64,
}

impl ClsSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scored entries of the current session, in arrival order
    pub fn entries(&self) -> &[LayoutShiftEvent] {
        &self.entries
    }

    pub fn running_score(&self) -> f64 {
        self.running_score
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The CLS sample for the current running score
    pub fn sample(&self) -> MetricSample {
        MetricSample::new(MetricName::Cls, self.running_score)
    }

    /// Score a single event.
    ///
    /// Returns the updated sample, or `None` when the event was skipped
    /// because it followed recent user input. A non-finite or negative
    /// `value` or `start_time` is scored as 0.
    pub fn record(&mut self, event: &LayoutShiftEvent) -> Option<MetricSample> {
        if event.had_recent_input {
            trace!(start_time = event.start_time, "Skipping input-driven layout shift");
            return None;
        }

        let event = LayoutShiftEvent {
            value: sanitize_field("value", event.value),
            start_time: sanitize_field("startTime", event.start_time),
            had_recent_input: false,
        };

        let joins_current = match self.entries.first() {
            None => true,
            Some(first) => event.start_time - first.start_time < SESSION_GAP_MS,
        };

        if joins_current {
            self.entries.push(event);
            self.running_score += event.value;
        } else {
            debug!(
                start_time = event.start_time,
                previous_score = self.running_score,
                "Starting new CLS session"
            );
            self.entries.clear();
            self.entries.push(event);
            self.running_score = event.value;
        }

        Some(self.sample())
    }

    /// Clear the session and return the zeroed sample
    pub fn reset(&mut self) -> MetricSample {
        self.entries.clear();
        self.running_score = 0.0;
        self.sample()
    }
}

/// Fold a batch of events into `session` in delivery order.
///
/// The returned sample reflects the session after the last event.
pub fn ingest(mut session: ClsSession, events: &[LayoutShiftEvent]) -> (ClsSession, MetricSample) {
    for event in events {
        session.record(event);
    }
    let sample = session.sample();
    (session, sample)
}

/// Produce a fresh empty session and its `{0, good}` sample
pub fn reset(mut session: ClsSession) -> (ClsSession, MetricSample) {
    let sample = session.reset();
    (session, sample)
}
