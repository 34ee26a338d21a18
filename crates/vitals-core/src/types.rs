//! Metric and performance-entry types
//!
//! Raw entry structs mirror the fields the host delivers (camelCase on the
//! wire). Missing numeric fields deserialize to 0 and a missing
//! `hadRecentInput` to `false`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::thresholds::classify;

/// The three Core Web Vitals tracked by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MetricName {
    /// Largest Contentful Paint (milliseconds)
    Lcp,
    /// First Input Delay (milliseconds)
    Fid,
    /// Cumulative Layout Shift (unitless)
    Cls,
}

impl MetricName {
    pub const ALL: [MetricName; 3] = [MetricName::Lcp, MetricName::Fid, MetricName::Cls];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::Lcp => "LCP",
            MetricName::Fid => "FID",
            MetricName::Cls => "CLS",
        }
    }

    /// Parse a metric name, ignoring ASCII case
    pub fn parse(name: &str) -> Option<Self> {
        MetricName::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative rating of a metric value, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Good => "good",
            Rating::NeedsImprovement => "needs-improvement",
            Rating::Poor => "poor",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One measured value for a named metric.
///
/// The rating is computed from the value at construction and there is no
/// way to set it separately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSample {
    name: MetricName,
    value: f64,
    rating: Rating,
}

impl MetricSample {
    pub fn new(name: MetricName, value: f64) -> Self {
        Self {
            name,
            value,
            rating: classify(name, value),
        }
    }

    pub fn name(&self) -> MetricName {
        self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn rating(&self) -> Rating {
        self.rating
    }
}

/// Host performance-entry stream identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryType {
    LayoutShift,
    LargestContentfulPaint,
    FirstInput,
}

impl EntryType {
    pub const ALL: [EntryType; 3] = [
        EntryType::LayoutShift,
        EntryType::LargestContentfulPaint,
        EntryType::FirstInput,
    ];

    /// The entry type string understood by `PerformanceObserver`
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::LayoutShift => "layout-shift",
            EntryType::LargestContentfulPaint => "largest-contentful-paint",
            EntryType::FirstInput => "first-input",
        }
    }

    /// The metric this stream feeds
    pub fn metric(&self) -> MetricName {
        match self {
            EntryType::LayoutShift => MetricName::Cls,
            EntryType::LargestContentfulPaint => MetricName::Lcp,
            EntryType::FirstInput => MetricName::Fid,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `layout-shift` entry
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutShiftEvent {
    /// Shift contribution, non-negative
    pub value: f64,
    /// Monotonic timestamp in milliseconds
    pub start_time: f64,
    /// User-initiated shifts are never scored
    pub had_recent_input: bool,
}

impl LayoutShiftEvent {
    pub fn new(start_time: f64, value: f64) -> Self {
        Self {
            value,
            start_time,
            had_recent_input: false,
        }
    }

    pub fn with_recent_input(mut self) -> Self {
        self.had_recent_input = true;
        self
    }
}

/// A single `largest-contentful-paint` candidate
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LcpEntry {
    pub render_time: f64,
    pub load_time: f64,
}

impl LcpEntry {
    /// `renderTime` when present and nonzero, `loadTime` otherwise
    pub fn paint_time(&self) -> f64 {
        if self.render_time > 0.0 {
            self.render_time
        } else {
            self.load_time
        }
    }
}

/// A single `first-input` entry
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirstInputEntry {
    pub start_time: f64,
    pub processing_start: f64,
}

impl FirstInputEntry {
    pub fn input_delay(&self) -> f64 {
        self.processing_start - self.start_time
    }
}

/// Normalize a numeric field read from the host.
///
/// Non-finite and negative values become 0.
pub fn sanitize_field(field: &str, raw: f64) -> f64 {
    if raw.is_finite() && raw >= 0.0 {
        raw
    } else {
        tracing::warn!(field, raw, "Malformed performance entry field, treating as 0");
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_rating_follows_value() {
        let sample = MetricSample::new(MetricName::Fid, 50.0);
        assert_eq!(sample.rating(), Rating::Good);

        let sample = MetricSample::new(MetricName::Fid, 301.0);
        assert_eq!(sample.rating(), Rating::Poor);
    }

    #[test]
    fn test_lcp_paint_time_fallback() {
        let entry = LcpEntry {
            render_time: 0.0,
            load_time: 2600.0,
        };
        assert_eq!(entry.paint_time(), 2600.0);

        let entry = LcpEntry {
            render_time: 1800.0,
            load_time: 2600.0,
        };
        assert_eq!(entry.paint_time(), 1800.0);
    }

    #[test]
    fn test_input_delay() {
        let entry = FirstInputEntry {
            start_time: 1000.0,
            processing_start: 1050.0,
        };
        assert_eq!(entry.input_delay(), 50.0);
    }

    #[test]
    fn test_entry_deserialization_defaults() {
        let event: LayoutShiftEvent = serde_json::from_str(r#"{"startTime": 12.5}"#).unwrap();
        assert_eq!(event.value, 0.0);
        assert_eq!(event.start_time, 12.5);
        assert!(!event.had_recent_input);

        let entry: LcpEntry = serde_json::from_str(r#"{"loadTime": 900}"#).unwrap();
        assert_eq!(entry.paint_time(), 900.0);
    }

    #[test]
    fn test_sample_serialization() {
        let sample = MetricSample::new(MetricName::Lcp, 2600.0);
        let json = serde_json::to_value(sample).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "LCP", "value": 2600.0, "rating": "needs-improvement"})
        );
    }

    #[test]
    fn test_metric_name_parse() {
        assert_eq!(MetricName::parse("cls"), Some(MetricName::Cls));
        assert_eq!(MetricName::parse(" LCP "), Some(MetricName::Lcp));
        assert_eq!(MetricName::parse("INP"), None);
    }

    #[test]
    fn test_sanitize_field() {
        assert_eq!(sanitize_field("value", 0.2), 0.2);
        assert_eq!(sanitize_field("value", f64::NAN), 0.0);
        assert_eq!(sanitize_field("value", -1.0), 0.0);
        assert_eq!(sanitize_field("value", f64::INFINITY), 0.0);
    }
}
