//! # Intermediate Representation (IR)
//!
//! The IR is the printer instruction stream that sits between the receipt
//! composer and raw ESC/POS bytes.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────┐     ┌───────────┐
//! │  Composer   │ ──► │     IR      │ ──► │ Codegen  │ ──► │ Transport │
//! │ (receipt)   │     │  (Vec<Op>)  │     │ (bytes)  │     │   (BLE)   │
//! └─────────────┘     └─────────────┘     └──────────┘     └───────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use struk::ir::{Op, Program};
//! use struk::protocol::text::Alignment;
//!
//! let mut program = Program::with_init();
//! program.push(Op::SetAlign(Alignment::Center));
//! program.push(Op::SetBold(true));
//! program.line("HELLO");
//! program.push(Op::Cut { partial: true });
//!
//! // Inspect the IR
//! println!("{:#?}", program);
//!
//! let bytes = program.to_bytes();
//! assert_eq!(&bytes[..2], &[0x1B, 0x40]);
//! ```

mod codegen;
mod ops;

// Re-export the ops types (codegen adds methods to Program via impl)
pub use ops::*;
