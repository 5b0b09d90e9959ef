//! # Printer Transport Layer
//!
//! Moves encoded receipts onto a BLE thermal printer.
//!
//! ## Layers
//!
//! - [`gatt`]: platform seam ([`BluetoothBackend`], [`GattDevice`])
//! - [`negotiate`]: ordered search for a writable characteristic
//! - [`chunked`]: bounded, paced writes
//! - [`session`]: connection lifecycle, liveness and printing
//!
//! ## Available Backends
//!
//! - [`memory`]: simulated printer for tests and dry runs
//! - `ble`: btleplug, behind the `ble` feature

pub mod chunked;
pub mod gatt;
pub mod memory;
pub mod negotiate;
pub mod session;

#[cfg(feature = "ble")]
pub mod ble;

pub use gatt::{BluetoothBackend, CharProperties, Characteristic, GattDevice, GattService, WriteKind};
pub use memory::{MemoryBackend, MemoryPrinter};
pub use session::{ConnectionState, PrinterManager, PrinterSession};

#[cfg(feature = "ble")]
pub use ble::BleBackend;
