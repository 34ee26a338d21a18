use thiserror::Error;

use crate::types::EntryType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VitalsError {
    /// The host cannot observe this entry type. Recoverable: the stream is
    /// simply never started.
    #[error("Performance measurement not supported for '{entry_type}': {reason}")]
    ObservationUnsupported { entry_type: EntryType, reason: String },

    #[error("Invalid monitor configuration: {0}")]
    Config(String),
}

impl VitalsError {
    pub fn unsupported(entry_type: EntryType, reason: impl Into<String>) -> Self {
        VitalsError::ObservationUnsupported {
            entry_type,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VitalsError>;
