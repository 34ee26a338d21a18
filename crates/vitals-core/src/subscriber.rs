//! Performance signal subscriber
//!
//! Registers one observation per configured stream against a
//! [`PerformanceSource`], normalizes each delivered batch into
//! [`MetricSample`] updates and owns the CLS session for the lifetime of
//! the subscription.
//!
//! Registration failures are isolated per stream: an unsupported entry type
//! is logged and recorded on the handle while the remaining streams keep
//! reporting. All observations are released together by
//! [`SubscriptionHandle::stop`] or when the handle is dropped.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, info, warn};

use crate::config::MonitorConfig;
use crate::error::VitalsError;
use crate::session::ClsSession;
use crate::source::{EntryBatch, ObserveRequest, Observation, PerformanceSource};
use crate::types::{
    sanitize_field, EntryType, FirstInputEntry, LcpEntry, MetricName, MetricSample,
};

/// Receives every metric update
pub type UpdateCallback = Box<dyn FnMut(MetricSample)>;

/// LCP from a delivered batch: the last entry's paint time
pub fn normalize_lcp(entries: &[LcpEntry]) -> Option<MetricSample> {
    let last = entries.last()?;
    let value = sanitize_field("lcp", last.paint_time());
    Some(MetricSample::new(MetricName::Lcp, value))
}

/// FID from a delivered batch: the first entry's input delay, rest ignored
pub fn normalize_fid(entries: &[FirstInputEntry]) -> Option<MetricSample> {
    let first = entries.first()?;
    if entries.len() > 1 {
        debug!(ignored = entries.len() - 1, "Ignoring extra first-input entries");
    }
    let value = sanitize_field("inputDelay", first.input_delay());
    Some(MetricSample::new(MetricName::Fid, value))
}

/// State shared between the stream listeners and the handle
struct Shared {
    session: RefCell<ClsSession>,
    on_update: RefCell<UpdateCallback>,
}

impl Shared {
    fn emit(&self, sample: MetricSample) {
        debug!(metric = %sample.name(), value = sample.value(), rating = %sample.rating(), "Metric updated");
        match self.on_update.try_borrow_mut() {
            Ok(mut on_update) => (*on_update)(sample),
            Err(_) => warn!(metric = %sample.name(), "Dropping re-entrant metric update"),
        }
    }

    fn dispatch(&self, batch: EntryBatch) {
        match batch {
            EntryBatch::LargestContentfulPaint(entries) => {
                if let Some(sample) = normalize_lcp(&entries) {
                    self.emit(sample);
                }
            }
            EntryBatch::FirstInput(entries) => {
                if let Some(sample) = normalize_fid(&entries) {
                    self.emit(sample);
                }
            }
            EntryBatch::LayoutShift(entries) => {
                for event in &entries {
                    // Release the session before calling out
                    let update = self.session.borrow_mut().record(&event);
                    if let Some(sample) = update {
                        self.emit(sample);
                    }
                }
            }
        }
    }
}

/// Live subscription to the host performance streams
pub struct SubscriptionHandle {
    shared: Rc<Shared>,
    observations: Vec<(EntryType, Box<dyn Observation>)>,
    failures: Vec<VitalsError>,
    stopped: bool,
}

impl SubscriptionHandle {
    /// Begin observing every stream enabled in `config`.
    ///
    /// Never fails: unsupported streams are logged and listed in
    /// [`SubscriptionHandle::failures`].
    pub fn start<S, F>(source: &S, config: &MonitorConfig, on_update: F) -> Self
    where
        S: PerformanceSource + ?Sized,
        F: FnMut(MetricSample) + 'static,
    {
        let shared = Rc::new(Shared {
            session: RefCell::new(ClsSession::new()),
            on_update: RefCell::new(Box::new(on_update)),
        });

        let mut observations = Vec::new();
        let mut failures = Vec::new();

        for entry_type in EntryType::ALL {
            if !config.observes(entry_type) {
                debug!(%entry_type, "Stream disabled by configuration");
                continue;
            }

            let request = ObserveRequest {
                entry_type,
                buffered: config.buffered,
            };
            let listener_state = Rc::clone(&shared);
            let listener = Box::new(move |batch: EntryBatch| listener_state.dispatch(batch));

            match source.observe(request, listener) {
                Ok(observation) => observations.push((entry_type, observation)),
                Err(e) => {
                    error!(%entry_type, error = %e, "Performance measurement not supported");
                    failures.push(e);
                }
            }
        }

        info!(
            active = observations.len(),
            failed = failures.len(),
            "Performance observers started"
        );

        Self {
            shared,
            observations,
            failures,
            stopped: false,
        }
    }

    /// Streams that registered successfully and are still connected
    pub fn active_streams(&self) -> Vec<EntryType> {
        self.observations.iter().map(|(t, _)| *t).collect()
    }

    /// Registration errors collected at start
    pub fn failures(&self) -> &[VitalsError] {
        &self.failures
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Current CLS running score
    pub fn cls_running_score(&self) -> f64 {
        self.shared.session.borrow().running_score()
    }

    /// Clear the CLS session and publish the zeroed sample.
    ///
    /// After [`SubscriptionHandle::stop`] nothing is published.
    pub fn reset_cls(&self) -> MetricSample {
        let sample = self.shared.session.borrow_mut().reset();
        info!("CLS session reset");
        if !self.stopped {
            self.shared.emit(sample);
        }
        sample
    }

    /// Disconnect every observation. Safe to call any number of times.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;

        for (entry_type, mut observation) in self.observations.drain(..) {
            observation.disconnect();
            debug!(%entry_type, "Observer disconnected");
        }
        self.shared.session.borrow_mut().reset();
        info!("Performance observers stopped");
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
