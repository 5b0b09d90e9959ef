//! # Printer Module
//!
//! Printer-specific configuration.
//!
//! ## Modules
//!
//! - [`config`]: Printer profiles and the Bluetooth discovery filter

pub mod config;

pub use config::{DeviceFilter, PrinterProfile};
