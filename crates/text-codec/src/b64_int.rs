//! Base64 digit strings read as big-endian integers (6 bits per character).

use crate::constants::{ALPHABET_URL_BYTES, INVALID, URL_TABLE};
use crate::CodecError;

/// Widest digit string whose value always fits in a `u64`.
pub const MAX_INT_DIGITS: usize = 10;

/// Reads `text` as base64 digits, most significant first.
///
/// An empty digit string is zero.
///
/// ```
/// use cesr_text_codec::value_to_int;
///
/// assert_eq!(value_to_int(b"AB").unwrap(), 1);
/// assert_eq!(value_to_int(b"BA").unwrap(), 64);
/// assert_eq!(value_to_int(b"__").unwrap(), 4095);
/// ```
pub fn value_to_int(text: &[u8]) -> Result<u64, CodecError> {
    if text.len() > MAX_INT_DIGITS {
        return Err(CodecError::InvalidLength { length: text.len() });
    }
    let mut value = 0u64;
    for (index, &c) in text.iter().enumerate() {
        let sextet = URL_TABLE[c as usize];
        if sextet == INVALID {
            return Err(CodecError::InvalidCharacter {
                ch: c as char,
                index,
            });
        }
        value = (value << 6) | sextet as u64;
    }
    Ok(value)
}

/// Writes `value` as exactly `width` base64 digits, left padded with `A`.
///
/// ```
/// use cesr_text_codec::int_to_b64;
///
/// assert_eq!(int_to_b64(1, 2).unwrap(), "AB");
/// assert_eq!(int_to_b64(0, 0).unwrap(), "");
/// ```
pub fn int_to_b64(value: u64, width: usize) -> Result<String, CodecError> {
    let fits = match width {
        0 => value == 0,
        w if w >= MAX_INT_DIGITS + 1 => true,
        w => value >> (6 * w) == 0,
    };
    if !fits {
        return Err(CodecError::ValueTooLarge { value, width });
    }
    let mut out = vec![b'A'; width];
    let mut rest = value;
    for slot in out.iter_mut().rev() {
        *slot = ALPHABET_URL_BYTES[(rest & 0x3f) as usize];
        rest >>= 6;
    }
    Ok(out.into_iter().map(char::from).collect())
}
