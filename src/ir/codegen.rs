//! # Code Generation
//!
//! Converts IR programs to ESC/POS protocol bytes.
//!
//! Every op is emitted in order into a single growing buffer: no reordering,
//! batching or elision.

use super::ops::{Op, Program};
use crate::protocol::{ascii, commands, text};

impl Program {
    /// Compile the IR program to ESC/POS bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.estimated_len());

        for op in &self.ops {
            match op {
                // ===== Printer Control =====
                Op::Init => {
                    out.extend(commands::init());
                }
                Op::Cut { partial } => {
                    if *partial {
                        out.extend(commands::cut_partial());
                    } else {
                        out.extend(commands::cut_full());
                    }
                }
                Op::Feed { lines } => {
                    out.extend(commands::feed_lines(*lines));
                }

                // ===== Style Changes =====
                Op::SetAlign(align) => {
                    out.extend(text::align(*align));
                }
                Op::SetBold(enabled) => {
                    if *enabled {
                        out.extend(text::bold_on());
                    } else {
                        out.extend(text::bold_off());
                    }
                }
                Op::SetSize(size) => {
                    out.extend(text::size(*size));
                }

                // ===== Content =====
                Op::Text(s) => {
                    ascii::encode_into(s, &mut out);
                }
                Op::Newline => {
                    out.push(commands::LF);
                }
            }
        }

        out
    }

    /// Upper bound on the encoded size: 4 bytes per command, one per char.
    fn estimated_len(&self) -> usize {
        self.ops
            .iter()
            .map(|op| match op {
                Op::Text(s) => s.len(),
                _ => 4,
            })
            .sum()
    }
}
