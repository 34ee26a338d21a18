//! Live metrics board and the monitor that feeds it
//!
//! [`MetricsBoard`] is what a host view renders: the latest sample per
//! metric (absent until measured) plus the live CLS running score.
//! [`VitalsMonitor`] ties a board to a [`SubscriptionHandle`].

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

use crate::config::MonitorConfig;
use crate::error::VitalsError;
use crate::format::{describe, format_sample, status_tone};
use crate::session::ClsSession;
use crate::source::PerformanceSource;
use crate::subscriber::SubscriptionHandle;
use crate::types::{MetricName, MetricSample};

/// Latest known value of every metric
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsBoard {
    metrics: BoardMetrics,
    cls_running_score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
struct BoardMetrics {
    #[serde(rename = "LCP")]
    lcp: Option<MetricSample>,
    #[serde(rename = "FID")]
    fid: Option<MetricSample>,
    #[serde(rename = "CLS")]
    cls: Option<MetricSample>,
}

/// Display-ready view of one metric
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRow {
    pub name: MetricName,
    pub description: &'static str,
    pub display: String,
    pub tone: &'static str,
}

impl MetricsBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored sample for the sample's metric
    pub fn apply(&mut self, sample: MetricSample) {
        match sample.name() {
            MetricName::Lcp => self.metrics.lcp = Some(sample),
            MetricName::Fid => self.metrics.fid = Some(sample),
            MetricName::Cls => {
                self.metrics.cls = Some(sample);
                self.cls_running_score = sample.value();
            }
        }
    }

    pub fn get(&self, name: MetricName) -> Option<&MetricSample> {
        match name {
            MetricName::Lcp => self.metrics.lcp.as_ref(),
            MetricName::Fid => self.metrics.fid.as_ref(),
            MetricName::Cls => self.metrics.cls.as_ref(),
        }
    }

    pub fn cls_running_score(&self) -> f64 {
        self.cls_running_score
    }

    pub fn rows(&self) -> Vec<MetricRow> {
        MetricName::ALL
            .into_iter()
            .map(|name| {
                let sample = self.get(name);
                MetricRow {
                    name,
                    description: describe(name),
                    display: format_sample(name, sample),
                    tone: status_tone(sample.map(|s| s.rating())),
                }
            })
            .collect()
    }
}

/// Subscription plus the board it keeps current
pub struct VitalsMonitor {
    config: MonitorConfig,
    board: Rc<RefCell<MetricsBoard>>,
    handle: Option<SubscriptionHandle>,
}

impl VitalsMonitor {
    pub fn new(config: MonitorConfig) -> Self {
        Self {
            config,
            board: Rc::new(RefCell::new(MetricsBoard::new())),
            handle: None,
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Start observing `source`; `on_change` gets the board after every update.
    ///
    /// Restarting drops the previous subscription and clears the board.
    pub fn start<S, F>(&mut self, source: &S, mut on_change: F)
    where
        S: PerformanceSource + ?Sized,
        F: FnMut(&MetricsBoard) + 'static,
    {
        self.stop();
        *self.board.borrow_mut() = MetricsBoard::new();

        let board = Rc::clone(&self.board);
        let handle = SubscriptionHandle::start(source, &self.config, move |sample| {
            let snapshot = {
                let mut board = board.borrow_mut();
                board.apply(sample);
                board.clone()
            };
            on_change(&snapshot);
        });
        self.handle = Some(handle);
    }

    /// Disconnect all streams. No-op when not running.
    pub fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            handle.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_stopped())
    }

    /// Clear the CLS session; the board shows `{0, good}` afterwards.
    ///
    /// The board is updated directly so a reset issued from inside
    /// `on_change` still lands, even though that update is not republished.
    pub fn reset_cls(&mut self) -> MetricSample {
        let sample = match &self.handle {
            Some(handle) => handle.reset_cls(),
            None => ClsSession::new().sample(),
        };
        self.board.borrow_mut().apply(sample);
        sample
    }

    pub fn snapshot(&self) -> MetricsBoard {
        self.board.borrow().clone()
    }

    /// Streams that could not be observed on the last start
    pub fn failures(&self) -> &[VitalsError] {
        match &self.handle {
            Some(handle) => handle.failures(),
            None => &[],
        }
    }
}
