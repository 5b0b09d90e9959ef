//! # ESC/POS Text Styling Commands
//!
//! Text formatting commands for 58mm ESC/POS printers.
//!
//! ## Styling Overview
//!
//! | Style     | Command    | Hex            |
//! |-----------|------------|----------------|
//! | Bold      | `ESC E n`  | `1B 45 00/01`  |
//! | Alignment | `ESC a n`  | `1B 61 00..02` |
//! | Size      | `GS ! n`   | `1D 21 n`      |
//!
//! ## Text Alignment
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! Right aligned             |      RIGHT TEXT
//! ```
//!
//! Alignment takes effect at the start of the next line; the printer pads
//! the line itself, so right-aligned text needs no leading spaces.

use serde::{Deserialize, Serialize};

use super::commands::{ESC, GS};

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// # Select Justification (ESC a n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC a n  |
/// | Hex     | 1B 61 n  |
///
/// - `n = 0`: Left (default)
/// - `n = 1`: Center
/// - `n = 2`: Right
///
/// ```
/// use struk::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// TEXT EMPHASIS (BOLD)
// ============================================================================

/// # Turn Emphasized Mode On (ESC E 1)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | ESC E 1  |
/// | Hex     | 1B 45 01 |
///
/// ```
/// use struk::protocol::text::{bold_on, bold_off};
///
/// let mut data = Vec::new();
/// data.extend(bold_on());
/// data.extend(b"TOTAL");
/// data.extend(bold_off());
/// ```
#[inline]
pub fn bold_on() -> Vec<u8> {
    vec![ESC, b'E', 0x01]
}

/// # Turn Emphasized Mode Off (ESC E 0)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | Hex     | 1B 45 00 |
#[inline]
pub fn bold_off() -> Vec<u8> {
    vec![ESC, b'E', 0x00]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// Character size modes supported by the `GS !` command.
///
/// The parameter byte packs the width multiplier in the high nibble and the
/// height multiplier in the low nibble; these printers only honour 1x and 2x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharSize {
    #[default]
    Normal,
    DoubleWidth,
    DoubleHeight,
    Double,
}

impl CharSize {
    /// The `GS !` parameter byte for this size.
    pub const fn param(self) -> u8 {
        match self {
            CharSize::Normal => 0x00,
            CharSize::DoubleWidth => 0x10,
            CharSize::DoubleHeight => 0x01,
            CharSize::Double => 0x11,
        }
    }

    /// How many paper columns one glyph occupies.
    pub const fn column_width(self) -> usize {
        match self {
            CharSize::DoubleWidth | CharSize::Double => 2,
            CharSize::Normal | CharSize::DoubleHeight => 1,
        }
    }
}

/// # Select Character Size (GS ! n)
///
/// | Format  | Bytes    |
/// |---------|----------|
/// | ASCII   | GS ! n   |
/// | Hex     | 1D 21 n  |
///
/// ## Size Table
///
/// | Mode          | n    |
/// |---------------|------|
/// | Normal        | 0x00 |
/// | Double width  | 0x10 |
/// | Double height | 0x01 |
/// | Double        | 0x11 |
///
/// ```
/// use struk::protocol::text::{size, CharSize};
///
/// assert_eq!(size(CharSize::Double), vec![0x1D, 0x21, 0x11]);
/// ```
pub fn size(size: CharSize) -> Vec<u8> {
    vec![GS, b'!', size.param()]
}

// ============================================================================
// TESTS
// ============================================================================
