//! # Struk - POS Receipt Printing Library
//!
//! Struk prints sales receipts on cheap 58mm ESC/POS thermal printers over
//! Bluetooth Low Energy. It provides:
//!
//! - **Receipt composition**: fixed-width 32-column layout of a sale
//! - **Protocol implementation**: ESC/POS command builders and ASCII encoding
//! - **Intermediate representation**: an inspectable printer instruction stream
//! - **Transport**: GATT negotiation, chunked writes and connection lifecycle
//!
//! ## Quick Start
//!
//! ```
//! use struk::{PrinterProfile, receipt};
//!
//! let doc = receipt::cash_receipt();
//!
//! // Build the instruction stream, then encode it
//! let program = receipt::compose(&doc, &PrinterProfile::MP58);
//! let bytes = program.to_bytes();
//!
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]); // ESC @
//! assert!(bytes.iter().all(|b| b.is_ascii()));
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! ReceiptDocument ──compose──▶ Program (IR) ──to_bytes──▶ ESC/POS bytes
//!                                   │                          │
//!                             preview::render_lines    PrinterManager::print_bytes
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`receipt`] | Receipt model, composer and samples |
//! | [`ir`] | Printer instruction stream and encoder |
//! | [`protocol`] | ESC/POS command builders |
//! | [`preview`] | Plain-text rendering of an instruction stream |
//! | [`transport`] | BLE session management |
//! | [`printer`] | Printer profiles and discovery filters |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Generic 58mm BLE receipt printers advertising as `MP-58*`, `Printer*`,
//! `BT*` and similar. 80mm printers work with [`PrinterProfile::MP80`].

pub mod error;
pub mod ir;
pub mod preview;
pub mod printer;
pub mod protocol;
pub mod receipt;
pub mod transport;

// Re-exports for convenience
pub use error::StrukError;
pub use ir::Program;
pub use printer::{DeviceFilter, PrinterProfile};
pub use receipt::ReceiptDocument;
pub use transport::{ConnectionState, PrinterManager};
