//! JavaScript-facing monitor
//!
//! Holds the subscription and the metrics board in Rust; JavaScript only
//! renders what it is handed and forwards the "reset CLS" action.

use serde::Serialize;
use vitals_core::{MetricsBoard, MonitorConfig, VitalsMonitor};
use wasm_bindgen::prelude::*;

use crate::browser_source::BrowserPerformanceSource;
use crate::logging;

/// Serialize with `null` for absent metrics and plain objects for maps
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

fn parse_config(config: JsValue) -> Result<MonitorConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(MonitorConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid monitor configuration: {}", e)))
}

fn publish(callback: &js_sys::Function, board: &MetricsBoard) {
    let value = match to_js(board) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to serialize metrics board");
            return;
        }
    };
    if let Err(e) = callback.call1(&JsValue::NULL, &value) {
        tracing::warn!(error = ?e, "Metrics callback threw");
    }
}

/// Core Web Vitals monitor bound to the page's performance timeline
#[wasm_bindgen]
pub struct WebVitalsMonitor {
    inner: VitalsMonitor,
}

#[wasm_bindgen]
impl WebVitalsMonitor {
    /// Create a monitor. `config` may be omitted for defaults:
    /// `{ buffered: true, streams: [...], log_filter: "info" }`
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WebVitalsMonitor, JsValue> {
        let config = parse_config(config)?;
        logging::init(&config.log_filter);
        Ok(Self {
            inner: VitalsMonitor::new(config),
        })
    }

    /// Start observing. `callback(board)` runs after every metric update.
    ///
    /// Returns the messages of streams that could not be observed.
    pub fn start(&mut self, callback: js_sys::Function) -> js_sys::Array {
        let source = BrowserPerformanceSource::new();
        self.inner
            .start(&source, move |board| publish(&callback, board));
        self.inner
            .failures()
            .iter()
            .map(|e| JsValue::from_str(&e.to_string()))
            .collect()
    }

    /// Disconnect every observer; safe to call repeatedly
    pub fn stop(&mut self) {
        self.inner.stop();
    }

    /// Clear the CLS session and return the zeroed CLS sample
    #[wasm_bindgen(js_name = resetCls)]
    pub fn reset_cls(&mut self) -> Result<JsValue, JsValue> {
        let sample = self.inner.reset_cls();
        to_js(&sample)
    }

    /// Current board: `{ metrics: { LCP, FID, CLS }, clsRunningScore }`
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.snapshot())
    }

    /// Display rows with description, formatted value and status tone
    pub fn rows(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.snapshot().rows())
    }

    #[wasm_bindgen(getter, js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.inner.is_running()
    }

    #[wasm_bindgen(getter, js_name = clsRunningScore)]
    pub fn cls_running_score(&self) -> f64 {
        self.inner.snapshot().cls_running_score()
    }
}
