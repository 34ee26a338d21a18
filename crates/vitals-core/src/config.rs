//! Monitor configuration
//!
//! Thresholds and the session gap are fixed; only the observation setup and
//! log verbosity are configurable.
//!
//! ```toml
//! buffered = true
//! streams = ["layout-shift", "largest-contentful-paint", "first-input"]
//! log_filter = "vitals_core=debug"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, VitalsError};
use crate::types::EntryType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Ask the host for entries recorded before registration
    pub buffered: bool,
    /// Streams to register; anything not listed is never observed
    pub streams: Vec<EntryType>,
    /// Tracing filter directive used by the host bindings
    pub log_filter: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            buffered: true,
            streams: EntryType::ALL.to_vec(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl MonitorConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| VitalsError::Config(e.to_string()))
    }

    pub fn observes(&self, entry_type: EntryType) -> bool {
        self.streams.contains(&entry_type)
    }
}
