//! # IR to Text Preview
//!
//! Replays an instruction stream the way a character-mode printer would and
//! returns the paper as plain text lines.
//!
//! ```text
//! Program (IR) → replay ops → Vec<String>
//!                   ↓
//!             - Track style state (align, size)
//!             - Wrap lines wider than the paper
//!             - Pad for center/right alignment
//!             - Substitute unprintable characters with '?'
//! ```
//!
//! Double-width glyphs are shown letter-spaced (`T O K O`) so that column
//! positions match the paper. Bold has no plain-text form and is dropped.

use crate::ir::{Op, Program, StyleState};
use crate::protocol::text::Alignment;

/// Marker line for a paper cut.
pub fn cut_marker(columns: usize) -> String {
    format!("{:-^width$}", " cut ", width = columns)
}

/// Render a program to the lines the paper would show.
pub fn render_lines(program: &Program, columns: usize) -> Vec<String> {
    let mut renderer = TextRenderer::new(columns);
    for op in program {
        renderer.apply(op);
    }
    renderer.finish()
}

/// Line-buffer state machine. Each buffered glyph is stored already expanded
/// to its column width.
struct TextRenderer {
    columns: usize,
    style: StyleState,
    buffer: Vec<String>,
    used: usize,
    lines: Vec<String>,
}

impl TextRenderer {
    fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
            style: StyleState::default(),
            buffer: Vec::new(),
            used: 0,
            lines: Vec::new(),
        }
    }

    fn apply(&mut self, op: &Op) {
        match op {
            Op::Text(s) => self.push_text(s),
            Op::Newline => self.flush(),
            Op::Feed { lines } => {
                if !self.buffer.is_empty() {
                    self.flush();
                }
                for _ in 0..*lines {
                    self.lines.push(String::new());
                }
            }
            Op::Cut { .. } => {
                if !self.buffer.is_empty() {
                    self.flush();
                }
                self.lines.push(cut_marker(self.columns));
            }
            Op::Init | Op::SetAlign(_) | Op::SetBold(_) | Op::SetSize(_) => {
                self.style.apply(op);
            }
        }
    }

    fn push_text(&mut self, s: &str) {
        let glyph_width = self.style.size.column_width();
        for ch in s.chars() {
            let ch = if ch.is_ascii() { ch } else { '?' };
            if self.used + glyph_width > self.columns {
                // The printer wraps instead of clipping
                self.flush();
            }
            let glyph = if glyph_width == 2 {
                format!("{} ", ch)
            } else {
                ch.to_string()
            };
            self.buffer.push(glyph);
            self.used += glyph_width;
        }
    }

    fn flush(&mut self) {
        let content: String = self.buffer.concat();
        let content = if self.style.size.column_width() == 2 {
            content.trim_end().to_string()
        } else {
            content
        };
        if content.is_empty() {
            self.lines.push(String::new());
            self.buffer.clear();
            self.used = 0;
            return;
        }
        let width = content.chars().count();
        let slack = self.columns.saturating_sub(width);
        let line = match self.style.alignment {
            Alignment::Left => content,
            Alignment::Center => format!("{}{}", " ".repeat(slack / 2), content),
            Alignment::Right => format!("{}{}", " ".repeat(slack), content),
        };
        self.lines.push(line);
        self.buffer.clear();
        self.used = 0;
    }

    fn finish(mut self) -> Vec<String> {
        if !self.buffer.is_empty() {
            self.flush();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::text::CharSize;

    #[test]
    fn test_alignment_padding() {
        let mut program = Program::with_init();
        program.line("left");
        program.push(Op::SetAlign(Alignment::Center));
        program.line("mid");
        program.push(Op::SetAlign(Alignment::Right));
        program.line("end");

        assert_eq!(
            render_lines(&program, 10),
            vec!["left", "   mid", "       end"]
        );
    }

    #[test]
    fn test_double_width_letter_spaced() {
        let mut program = Program::new();
        program.push(Op::SetAlign(Alignment::Center));
        program.push(Op::SetSize(CharSize::Double));
        program.line("AB");
        assert_eq!(render_lines(&program, 8), vec!["  A B"]);
    }

    #[test]
    fn test_wraps_overlong_lines() {
        let mut program = Program::new();
        program.line("abcdefgh");
        assert_eq!(render_lines(&program, 5), vec!["abcde", "fgh"]);
    }

    #[test]
    fn test_feed_and_cut() {
        let mut program = Program::new();
        program.line("x");
        program.push(Op::Feed { lines: 2 });
        program.push(Op::Cut { partial: true });
        assert_eq!(
            render_lines(&program, 11),
            vec!["x", "", "", "--- cut ---"]
        );
    }

    #[test]
    fn test_non_ascii_shown_as_placeholder() {
        let mut program = Program::new();
        program.line("Café");
        assert_eq!(render_lines(&program, 32), vec!["Caf?"]);
    }

    #[test]
    fn test_blank_line_not_padded() {
        let mut program = Program::new();
        program.push(Op::SetAlign(Alignment::Center));
        program.line("");
        assert_eq!(render_lines(&program, 32), vec![""]);
    }
}
