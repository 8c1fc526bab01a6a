// src/error.rs - Error taxonomy for the board simulation
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("pin {0} is not connected to any peripheral")]
    UnassignedPin(u8),
    #[error("pin {0} is out of range (board has {pins} pins)", pins = crate::board::PIN_COUNT)]
    PinOutOfRange(u8),
    #[error("board is sealed: peripherals can only be connected before the sketch starts")]
    BoardSealed,
    #[error("missing asset: {}", path.display())]
    MissingAsset { path: PathBuf },
    #[error("invalid asset {}: {reason}", path.display())]
    InvalidAsset { path: PathBuf, reason: String },
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Platform error: {0}")]
    Platform(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Wiring/setup mistakes in the simulated program. These are never
    /// recovered from by the legacy API.
    pub fn is_configuration_fault(&self) -> bool {
        matches!(
            self,
            SimError::UnassignedPin(_)
                | SimError::PinOutOfRange(_)
                | SimError::BoardSealed
                | SimError::MissingAsset { .. }
                | SimError::InvalidAsset { .. }
        )
    }
}

pub type SimResult<T> = Result<T, SimError>;
