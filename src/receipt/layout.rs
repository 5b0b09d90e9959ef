//! # Fixed-Width Layout Helpers
//!
//! Text layout for monospaced receipt paper. Widths are counted in
//! characters, one column each at normal size.

/// Format an amount as Indonesian rupiah: `Rp` prefix, `.` as thousands
/// separator, no decimals.
///
/// ```
/// use struk::receipt::layout::rupiah;
///
/// assert_eq!(rupiah(89_000), "Rp89.000");
/// assert_eq!(rupiah(1_250_500), "Rp1.250.500");
/// assert_eq!(rupiah(0), "Rp0");
/// ```
pub fn rupiah(amount: u64) -> String {
    rupiah_wide(u128::from(amount))
}

/// [`rupiah`] for amounts past `u64`, such as an unchecked line subtotal.
pub fn rupiah_wide(amount: u128) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    out.push_str("Rp");
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Character count (display columns at normal size).
#[inline]
pub fn width(text: &str) -> usize {
    text.chars().count()
}

/// Keep at most `max` characters.
pub fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Left-justify into exactly `len` columns, truncating if longer.
pub fn pad_right(text: &str, len: usize) -> String {
    let w = width(text);
    if w >= len {
        truncate(text, len)
    } else {
        format!("{}{}", text, " ".repeat(len - w))
    }
}

/// Right-justify into exactly `len` columns, truncating if longer.
pub fn pad_left(text: &str, len: usize) -> String {
    let w = width(text);
    if w >= len {
        truncate(text, len)
    } else {
        format!("{}{}", " ".repeat(len - w), text)
    }
}

/// A full-width rule of `ch`.
pub fn separator(ch: char, columns: usize) -> String {
    std::iter::repeat_n(ch, columns).collect()
}

/// `left` and `right` on one line with `right` flush to the edge, or `None`
/// when they cannot be separated by at least one space.
pub fn spread(left: &str, right: &str, columns: usize) -> Option<String> {
    let used = width(left) + width(right);
    if used < columns {
        Some(format!("{}{}{}", left, " ".repeat(columns - used), right))
    } else {
        None
    }
}

/// Like [`spread`] but never fails: at least one space, even if the line
/// then overflows. Neither side is truncated.
pub fn spread_min_gap(left: &str, right: &str, columns: usize) -> String {
    let gap = columns.saturating_sub(width(left) + width(right)).max(1);
    format!("{}{}{}", left, " ".repeat(gap), right)
}

/// Label padded to fill whatever the value leaves, value flush right. The
/// label is truncated first; the value never is.
pub fn amount_row(label: &str, value: &str, columns: usize) -> String {
    let label_len = columns.saturating_sub(width(value));
    format!("{}{}", pad_right(label, label_len), value)
}

/// Two equal halves: left-justified label, right-justified value.
pub fn halves(left: &str, right: &str, columns: usize) -> String {
    let half = columns / 2;
    format!("{}{}", pad_right(left, half), pad_left(right, columns - half))
}
