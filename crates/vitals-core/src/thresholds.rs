//! Rating thresholds and the metric classifier
//!
//! The table is a compile-time constant with no interior mutability, so no
//! call site can change it at runtime.

use serde::Serialize;

use crate::types::{MetricName, Rating};

/// Rating boundaries for one metric (both inclusive)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Thresholds {
    pub good: f64,
    pub needs_improvement: f64,
}

impl Thresholds {
    pub const fn new(good: f64, needs_improvement: f64) -> Self {
        Self {
            good,
            needs_improvement,
        }
    }

    pub fn rate(&self, value: f64) -> Rating {
        if value <= self.good {
            Rating::Good
        } else if value <= self.needs_improvement {
            Rating::NeedsImprovement
        } else {
            Rating::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdTable {
    lcp: Thresholds,
    fid: Thresholds,
    cls: Thresholds,
}

impl ThresholdTable {
    pub fn get(&self, name: MetricName) -> Thresholds {
        match name {
            MetricName::Lcp => self.lcp,
            MetricName::Fid => self.fid,
            MetricName::Cls => self.cls,
        }
    }
}

pub const THRESHOLDS: ThresholdTable = ThresholdTable {
    lcp: Thresholds::new(2500.0, 4000.0),
    fid: Thresholds::new(100.0, 300.0),
    cls: Thresholds::new(0.1, 0.25),
};

/// Rate a raw metric value against the fixed threshold table
pub fn classify(name: MetricName, value: f64) -> Rating {
    THRESHOLDS.get(name).rate(value)
}
