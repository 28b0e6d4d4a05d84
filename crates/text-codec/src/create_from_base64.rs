//! Factory function for creating base64 decoders with custom alphabets.

use crate::constants::{reverse_table, ALPHABET_URL_BYTES, INVALID, PAD};
use crate::CodecError;

/// Creates a base64 decoder function with a custom alphabet.
///
/// The decoder accepts both padded and unpadded input: a missing tail is
/// treated as if it were padded out to the next 4-character boundary. Trailing
/// `=` characters are only recognised on inputs whose length is already a
/// multiple of 4.
///
/// # Arguments
///
/// * `chars` - The 64-character alphabet. Defaults to the URL-safe alphabet.
///
/// # Example
///
/// ```
/// use cesr_text_codec::create_from_base64;
///
/// let decode = create_from_base64(None);
/// assert_eq!(decode(b"aGVsbG8").unwrap(), b"hello");
/// assert_eq!(decode(b"aGVsbG8=").unwrap(), b"hello");
/// ```
pub fn create_from_base64(
    chars: Option<&[u8; 64]>,
) -> impl Fn(&[u8]) -> Result<Vec<u8>, CodecError> {
    let table = reverse_table(chars.unwrap_or(ALPHABET_URL_BYTES));

    move |encoded: &[u8]| -> Result<Vec<u8>, CodecError> {
        let mut length = encoded.len();
        if length > 0 && length % 4 == 0 && encoded[length - 1] == PAD {
            length -= 1;
            if encoded[length - 1] == PAD {
                length -= 1;
            }
        }
        let encoded = &encoded[..length];

        let tail = length % 4;
        if tail == 1 {
            return Err(CodecError::InvalidLength { length });
        }
        let main_length = length - tail;

        let sextet = |i: usize| -> Result<u8, CodecError> {
            let c = encoded[i];
            match table[c as usize] {
                INVALID => Err(CodecError::InvalidCharacter {
                    ch: c as char,
                    index: i,
                }),
                v => Ok(v),
            }
        };

        let mut buf = Vec::with_capacity((length / 4) * 3 + tail);
        let mut i = 0;
        while i < main_length {
            let s0 = sextet(i)?;
            let s1 = sextet(i + 1)?;
            let s2 = sextet(i + 2)?;
            let s3 = sextet(i + 3)?;
            buf.push((s0 << 2) | (s1 >> 4));
            buf.push((s1 << 4) | (s2 >> 2));
            buf.push((s2 << 6) | s3);
            i += 4;
        }

        if tail == 2 {
            let s0 = sextet(main_length)?;
            let s1 = sextet(main_length + 1)?;
            buf.push((s0 << 2) | (s1 >> 4));
        } else if tail == 3 {
            let s0 = sextet(main_length)?;
            let s1 = sextet(main_length + 1)?;
            let s2 = sextet(main_length + 2)?;
            buf.push((s0 << 2) | (s1 >> 4));
            buf.push((s1 << 4) | (s2 >> 2));
        }

        Ok(buf)
    }
}
