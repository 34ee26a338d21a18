//! WASM bindings for the Core Web Vitals monitor
//!
//! All measurement state lives in Rust. JavaScript creates a monitor,
//! renders the board it is handed and forwards user actions.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WebVitalsMonitor, formatMetric } from './pkg/vitals_wasm.js';
//!
//! await init();
//!
//! const monitor = new WebVitalsMonitor({ buffered: true, log_filter: "vitals_core=debug" });
//! const unsupported = monitor.start((board) => render(board));
//! unsupported.forEach((msg) => console.warn(msg));
//!
//! resetButton.onclick = () => monitor.resetCls();
//! window.addEventListener('pagehide', () => monitor.stop());
//! ```

pub mod browser_source;
pub mod logging;
pub mod monitor;

use vitals_core::format::{describe, format_value, status_tone};
use vitals_core::{classify, MetricName};
use wasm_bindgen::prelude::*;

pub use browser_source::BrowserPerformanceSource;
pub use monitor::WebVitalsMonitor;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn metric_name(name: &str) -> Result<MetricName, String> {
    MetricName::parse(name).ok_or_else(|| format!("Unknown metric: {}", name))
}

/// Rate a value: "good", "needs-improvement" or "poor"
#[wasm_bindgen(js_name = rateMetric)]
pub fn rate_metric(name: &str, value: f64) -> Result<String, JsValue> {
    let name = metric_name(name).map_err(|e| JsValue::from_str(&e))?;
    Ok(classify(name, value).to_string())
}

/// Format a value the way the monitor displays it ("0.080", "2600ms")
#[wasm_bindgen(js_name = formatMetric)]
pub fn format_metric(name: &str, value: f64) -> Result<String, JsValue> {
    let name = metric_name(name).map_err(|e| JsValue::from_str(&e))?;
    Ok(format_value(name, value))
}

#[wasm_bindgen(js_name = describeMetric)]
pub fn describe_metric(name: &str) -> Result<String, JsValue> {
    let name = metric_name(name).map_err(|e| JsValue::from_str(&e))?;
    Ok(describe(name).to_string())
}

/// Badge tone for a value: "success", "warning" or "error"
#[wasm_bindgen(js_name = metricTone)]
pub fn metric_tone(name: &str, value: f64) -> Result<String, JsValue> {
    let name = metric_name(name).map_err(|e| JsValue::from_str(&e))?;
    Ok(status_tone(Some(classify(name, value))).to_string())
}
