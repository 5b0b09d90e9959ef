//! # IR Opcodes
//!
//! This module defines the intermediate representation (IR) for receipt
//! printing: an ordered sequence of printer instructions that the composer
//! produces and the encoder consumes exactly once, in order.
//!
//! ```text
//! ReceiptDocument → compose → Program (inspectable) → Codegen → Bytes
//! ```
//!
//! Each opcode represents a single, atomic operation. Style changes are
//! individual ops so the stream reads like what the printer will do.

use crate::protocol::text::{Alignment, CharSize};
use serde::{Deserialize, Serialize};

/// Style state tracked while replaying a program.
///
/// Mirrors the printer's own state after each styling command; `Init` resets
/// it to the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleState {
    pub alignment: Alignment,
    pub bold: bool,
    pub size: CharSize,
}

impl StyleState {
    /// Apply a styling op. Non-styling ops leave the state unchanged.
    pub fn apply(&mut self, op: &Op) {
        match op {
            Op::Init => *self = Self::default(),
            Op::SetAlign(alignment) => self.alignment = *alignment,
            Op::SetBold(bold) => self.bold = *bold,
            Op::SetSize(size) => self.size = *size,
            Op::Text(_) | Op::Newline | Op::Feed { .. } | Op::Cut { .. } => {}
        }
    }
}

/// IR opcodes - the "bytecode" for receipt printing.
///
/// Each variant maps to one fixed command sequence, except `Text` which maps
/// one byte per character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    // ========== Printer Control ==========
    /// Initialize printer (ESC @). Resets to default state.
    Init,

    /// Cut paper. `partial: true` leaves a small hinge.
    Cut { partial: bool },

    /// Print and feed `lines` text lines (ESC d n).
    Feed { lines: u8 },

    // ========== Style Changes ==========
    /// Set text alignment.
    SetAlign(Alignment),

    /// Enable/disable bold.
    SetBold(bool),

    /// Set character size.
    SetSize(CharSize),

    // ========== Content ==========
    /// Logical text (no trailing newline). Non-ASCII is substituted at
    /// encoding time, not here.
    Text(String),

    /// Line feed (newline).
    Newline,
}

/// A printer instruction stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub ops: Vec<Op>,
}

impl Program {
    /// Create an empty program.
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Create a program with an initial Init op.
    pub fn with_init() -> Self {
        Self {
            ops: vec![Op::Init],
        }
    }

    /// Add an op to the program.
    pub fn push(&mut self, op: Op) {
        self.ops.push(op);
    }

    /// Add multiple ops to the program.
    pub fn extend(&mut self, ops: impl IntoIterator<Item = Op>) {
        self.ops.extend(ops);
    }

    /// Push a text run followed by a newline. An empty string yields a
    /// bare newline (blank line).
    pub fn line(&mut self, text: impl Into<String>) {
        let text = text.into();
        if !text.is_empty() {
            self.ops.push(Op::Text(text));
        }
        self.ops.push(Op::Newline);
    }

    /// Get the number of ops in the program.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if the program is empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Iterate over ops.
    pub fn iter(&self) -> impl Iterator<Item = &Op> {
        self.ops.iter()
    }

    /// All text runs in order, for inspection.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            Op::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

impl FromIterator<Op> for Program {
    fn from_iter<T: IntoIterator<Item = Op>>(iter: T) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Program {
    type Item = Op;
    type IntoIter = std::vec::IntoIter<Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Op;
    type IntoIter = std::slice::Iter<'a, Op>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_new() {
        let program = Program::new();
        assert!(program.is_empty());
    }

    #[test]
    fn test_program_with_init() {
        let program = Program::with_init();
        assert_eq!(program.len(), 1);
        assert_eq!(program.ops[0], Op::Init);
    }

    #[test]
    fn test_line_pushes_text_and_newline() {
        let mut program = Program::new();
        program.line("Hello");
        program.line("");
        assert_eq!(
            program.ops,
            vec![Op::Text("Hello".into()), Op::Newline, Op::Newline]
        );
    }

    #[test]
    fn test_style_state_tracks_ops() {
        let mut state = StyleState::default();
        state.apply(&Op::SetAlign(Alignment::Center));
        state.apply(&Op::SetBold(true));
        state.apply(&Op::SetSize(CharSize::Double));
        assert_eq!(state.alignment, Alignment::Center);
        assert!(state.bold);
        assert_eq!(state.size, CharSize::Double);

        state.apply(&Op::Init);
        assert_eq!(state, StyleState::default());
    }

    #[test]
    fn test_texts() {
        let program: Program = vec![
            Op::Init,
            Op::Text("a".into()),
            Op::Newline,
            Op::Text("b".into()),
        ]
        .into_iter()
        .collect();
        assert_eq!(program.texts().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
