//! # ESC/POS Protocol Implementation
//!
//! Low-level command builders for the ESC/POS control-code language spoken
//! by 58mm Bluetooth thermal printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Printer control (init, feed, cut)
//! - [`text`]: Text styling (alignment, bold, character size)
//! - [`ascii`]: 7-bit text encoding with `?` substitution
//!
//! ## Usage Example
//!
//! ```
//! use struk::protocol::{ascii, commands, text};
//! use struk::protocol::text::Alignment;
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align(Alignment::Center));
//! data.extend(text::bold_on());
//! data.extend(ascii::encode("RECEIPT"));
//! data.push(commands::LF);
//! data.extend(text::bold_off());
//! data.extend(commands::feed_lines(4));
//! data.extend(commands::cut_partial());
//! ```

pub mod ascii;
pub mod commands;
pub mod text;
