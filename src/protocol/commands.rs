//! # ESC/POS Printer Commands
//!
//! This module implements the subset of the ESC/POS command protocol used by
//! 58mm portable thermal printers (VSC MP-58C and compatible clones).
//!
//! ## Protocol Overview
//!
//! ESC/POS commands are short byte sequences introduced by a prefix byte:
//!
//! - `ESC` (0x1B) for printer control, styling and paper feed
//! - `GS` (0x1D) for character size and the cutter
//!
//! Everything that is not a command is printed as text. `LF` prints the
//! line buffer and advances one line.
//!
//! ## Command Table
//!
//! | Command      | Bytes         |
//! |--------------|---------------|
//! | Initialize   | `1B 40`       |
//! | Feed n lines | `1B 64 n`     |
//! | Full cut     | `1D 56 01`    |
//! | Partial cut  | `1D 56 42 00` |
//!
//! Styling commands (bold, alignment, size) live in [`super::text`].

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for character size (`GS !`) and the cutter (`GS V`).
pub const GS: u8 = 0x1D;

/// LF (Line Feed) - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// Clears the print buffer and resets styling (bold, size, alignment) to the
/// power-on defaults. Sent once at the start of every receipt.
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// ```
/// use struk::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// PAPER FEED
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
///
/// Prints the line buffer and advances the paper by `n` text lines.
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC d n  |
/// | Hex     | 1B 64 n  |
///
/// Receipts end with a 4-line feed so the last printed line clears the
/// tear bar before cutting.
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

// ============================================================================
// CUTTER CONTROL
// ============================================================================

/// # Full Cut (GS V 1)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS V 1   |
/// | Hex     | 1D 56 01 |
///
/// Printers without a cutter ignore this command.
#[inline]
pub fn cut_full() -> Vec<u8> {
    vec![GS, b'V', 0x01]
}

/// # Feed and Partial Cut (GS V B 0)
///
/// Function B form of the cut command: feeds to the cutter position and
/// performs a partial cut, leaving a small hinge so the receipt does not
/// fall. The trailing `0` is the extra feed amount.
///
/// | Format  | Bytes       |
/// |---------|-------------|
/// | ASCII   | GS V B 0    |
/// | Hex     | 1D 56 42 00 |
#[inline]
pub fn cut_partial() -> Vec<u8> {
    vec![GS, b'V', b'B', 0x00]
}

// ============================================================================
// TESTS
// ============================================================================
