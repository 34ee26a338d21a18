//! Real-time Core Web Vitals engine
//!
//! Turns host performance-entry streams (`layout-shift`,
//! `largest-contentful-paint`, `first-input`) into rated LCP, FID and CLS
//! samples.
//!
//! The engine is host-agnostic: anything implementing
//! [`PerformanceSource`] can drive it. The wasm bindings provide a
//! `PerformanceObserver`-backed source; [`ReplaySource`] replays recorded
//! or synthetic batches.
//!
//! # Example
//!
//! ```
//! use vitals_core::{
//!     EntryBatch, LayoutShiftEvent, MetricName, MonitorConfig, Rating, ReplaySource,
//!     VitalsMonitor,
//! };
//!
//! let source = ReplaySource::new();
//! let mut monitor = VitalsMonitor::new(MonitorConfig::default());
//! monitor.start(&source, |_board| {});
//!
//! source.deliver(EntryBatch::LayoutShift(vec![
//!     LayoutShiftEvent::new(0.0, 0.05),
//!     LayoutShiftEvent::new(100.0, 0.03),
//! ]));
//!
//! let cls = *monitor.snapshot().get(MetricName::Cls).unwrap();
//! assert!((cls.value() - 0.08).abs() < 1e-9);
//! assert_eq!(cls.rating(), Rating::Good);
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod monitor;
pub mod replay;
pub mod session;
pub mod source;
pub mod subscriber;
pub mod thresholds;
pub mod types;

pub use config::MonitorConfig;
pub use error::VitalsError;
pub use monitor::{MetricRow, MetricsBoard, VitalsMonitor};
pub use replay::ReplaySource;
pub use session::{ingest, reset, ClsSession, SESSION_GAP_MS};
pub use source::{BatchListener, EntryBatch, ObserveRequest, Observation, PerformanceSource};
pub use subscriber::SubscriptionHandle;
pub use thresholds::{classify, Thresholds, THRESHOLDS};
pub use types::{
    EntryType, FirstInputEntry, LayoutShiftEvent, LcpEntry, MetricName, MetricSample, Rating,
};
