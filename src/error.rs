//! # Error Types
//!
//! This module defines the error type used throughout the struk library.
//!
//! Every failure is returned to the immediate caller. Nothing is retried
//! automatically; retry is a human decision (press connect/print again).

use thiserror::Error;

/// Main error type for struk operations
#[derive(Debug, Error)]
pub enum StrukError {
    /// The host has no Bluetooth support (or no adapter is present)
    #[error("Bluetooth is not supported on this host")]
    BluetoothUnavailable,

    /// Device selection was dismissed or no matching printer was chosen
    #[error("No printer was selected")]
    Cancelled,

    /// GATT connection could not be established
    #[error("Failed to connect to printer: {0}")]
    Gatt(String),

    /// GATT connected but no known service exposed a writable characteristic
    #[error("Could not find a writable printer characteristic")]
    NoWritableCharacteristic,

    /// A chunk write failed mid-stream; the paper may hold a partial receipt
    #[error("Failed to send data to printer: {0}")]
    Write(String),

    /// Print requested without an active session
    #[error("Printer is not connected")]
    NotConnected,

    /// Connect requested while a session is already active
    #[error("Printer is already connected; disconnect first")]
    AlreadyConnected,

    /// Receipt document failed an upstream consistency check
    #[error("Invalid receipt: {0}")]
    InvalidReceipt(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Receipt JSON could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StrukError {
    /// Whether re-invoking the same operation can reasonably succeed.
    ///
    /// A missing Bluetooth capability needs different hardware; everything
    /// transport-related may work on the next attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StrukError::Cancelled
                | StrukError::Gatt(_)
                | StrukError::NoWritableCharacteristic
                | StrukError::Write(_)
                | StrukError::NotConnected
        )
    }
}

pub type Result<T> = std::result::Result<T, StrukError>;
