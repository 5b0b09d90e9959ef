//! # 7-bit Text Encoding
//!
//! Converts Unicode strings to the single-byte text these printers accept.
//!
//! The supported printers have no Unicode or code-page support worth relying
//! on: ASCII (U+0000–U+007F) passes through unchanged and every other
//! character becomes exactly one `?` byte (0x3F).

/// Placeholder byte for characters outside 7-bit ASCII.
pub const PLACEHOLDER: u8 = b'?';

/// Encode a Unicode string as printer bytes.
///
/// One output byte per `char`, so the encoded length always equals
/// `s.chars().count()`.
///
/// ```
/// use struk::protocol::ascii;
///
/// assert_eq!(ascii::encode("Kopi"), b"Kopi".to_vec());
/// assert_eq!(ascii::encode("Café"), b"Caf?".to_vec());
/// ```
pub fn encode(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    encode_into(s, &mut out);
    out
}

/// Encode into an existing buffer, appending.
pub fn encode_into(s: &str, out: &mut Vec<u8>) {
    for ch in s.chars() {
        if ch.is_ascii() {
            out.push(ch as u8);
        } else {
            tracing::debug!(
                "unprintable character '{}' (U+{:04X}), replacing with '?'",
                ch,
                ch as u32
            );
            out.push(PLACEHOLDER);
        }
    }
}
