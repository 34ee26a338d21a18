//! `PerformanceObserver`-backed event source
//!
//! One observer is created per stream. Entry fields are read with
//! `Reflect` so that missing or non-numeric fields come through as 0
//! (and `hadRecentInput` as false) instead of failing the batch.

use js_sys::{Array, Function, Object, Reflect};
use vitals_core::source::{BatchListener, EntryBatch, ObserveRequest, Observation, PerformanceSource};
use vitals_core::types::{EntryType, FirstInputEntry, LayoutShiftEvent, LcpEntry};
use vitals_core::VitalsError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{PerformanceObserver, PerformanceObserverEntryList};

type ObserverCallback = Closure<dyn FnMut(PerformanceObserverEntryList)>;

/// Event source for the current browsing context
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserPerformanceSource;

impl BrowserPerformanceSource {
    pub fn new() -> Self {
        Self
    }

    /// Check the host for `PerformanceObserver` and the requested entry type
    fn check_support(entry_type: EntryType) -> Result<(), VitalsError> {
        let global = js_sys::global();
        let constructor = Reflect::get(&global, &JsValue::from_str("PerformanceObserver"))
            .unwrap_or(JsValue::UNDEFINED);
        if constructor.is_undefined() {
            return Err(VitalsError::unsupported(
                entry_type,
                "PerformanceObserver is not available",
            ));
        }

        // Engines without supportedEntryTypes get a chance at observe()
        let supported = Reflect::get(&constructor, &JsValue::from_str("supportedEntryTypes"))
            .unwrap_or(JsValue::UNDEFINED);
        if let Some(supported) = supported.dyn_ref::<Array>() {
            let wanted = JsValue::from_str(entry_type.as_str());
            if !supported.includes(&wanted, 0) {
                return Err(VitalsError::unsupported(
                    entry_type,
                    "entry type missing from PerformanceObserver.supportedEntryTypes",
                ));
            }
        }

        Ok(())
    }
}

fn describe_js_error(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            err.dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", err))
}

fn observe_options(request: &ObserveRequest) -> Result<Object, JsValue> {
    let options = Object::new();
    Reflect::set(
        &options,
        &JsValue::from_str("type"),
        &JsValue::from_str(request.entry_type.as_str()),
    )?;
    Reflect::set(
        &options,
        &JsValue::from_str("buffered"),
        &JsValue::from_bool(request.buffered),
    )?;
    Ok(options)
}

fn number_field(entry: &JsValue, field: &str) -> f64 {
    Reflect::get(entry, &JsValue::from_str(field))
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

fn bool_field(entry: &JsValue, field: &str) -> bool {
    Reflect::get(entry, &JsValue::from_str(field))
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// Convert a delivered entry list into a typed batch
pub(crate) fn to_batch(entry_type: EntryType, entries: &Array) -> EntryBatch {
    match entry_type {
        EntryType::LayoutShift => EntryBatch::LayoutShift(
            entries
                .iter()
                .map(|e| LayoutShiftEvent {
                    value: number_field(&e, "value"),
                    start_time: number_field(&e, "startTime"),
                    had_recent_input: bool_field(&e, "hadRecentInput"),
                })
                .collect(),
        ),
        EntryType::LargestContentfulPaint => EntryBatch::LargestContentfulPaint(
            entries
                .iter()
                .map(|e| LcpEntry {
                    render_time: number_field(&e, "renderTime"),
                    load_time: number_field(&e, "loadTime"),
                })
                .collect(),
        ),
        EntryType::FirstInput => EntryBatch::FirstInput(
            entries
                .iter()
                .map(|e| FirstInputEntry {
                    start_time: number_field(&e, "startTime"),
                    processing_start: number_field(&e, "processingStart"),
                })
                .collect(),
        ),
    }
}

impl PerformanceSource for BrowserPerformanceSource {
    fn observe(
        &self,
        request: ObserveRequest,
        mut listener: BatchListener,
    ) -> Result<Box<dyn Observation>, VitalsError> {
        let entry_type = request.entry_type;
        Self::check_support(entry_type)?;

        let callback: ObserverCallback =
            Closure::wrap(Box::new(move |list: PerformanceObserverEntryList| {
                let batch = to_batch(entry_type, &list.get_entries());
                listener(batch);
            }) as Box<dyn FnMut(PerformanceObserverEntryList)>);

        let observer = PerformanceObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| VitalsError::unsupported(entry_type, describe_js_error(&e)))?;

        let options = observe_options(&request)
            .map_err(|e| VitalsError::unsupported(entry_type, describe_js_error(&e)))?;

        // observe() throws for unknown types in some engines; calling it
        // through Function surfaces that as a Result
        let observe = Reflect::get(&observer, &JsValue::from_str("observe"))
            .ok()
            .and_then(|f| f.dyn_into::<Function>().ok())
            .ok_or_else(|| VitalsError::unsupported(entry_type, "observe() is not callable"))?;
        observe
            .call1(&observer, &options)
            .map_err(|e| VitalsError::unsupported(entry_type, describe_js_error(&e)))?;

        tracing::debug!(%entry_type, buffered = request.buffered, "PerformanceObserver registered");

        Ok(Box::new(BrowserObservation {
            observer,
            _callback: callback,
            connected: true,
        }))
    }
}

struct BrowserObservation {
    observer: PerformanceObserver,
    // Must outlive the observer registration
    _callback: ObserverCallback,
    connected: bool,
}

impl Observation for BrowserObservation {
    fn disconnect(&mut self) {
        if self.connected {
            self.observer.disconnect();
            self.connected = false;
        }
    }
}

impl Drop for BrowserObservation {
    fn drop(&mut self) {
        self.disconnect();
    }
}
