//! UTF-8 text.
//!
//! Malformed byte sequences are rejected rather than replaced, so offsets
//! reported by the decoder always line up with the text shown to the user.

use crate::CodecError;

/// Encodes text as UTF-8 bytes.
pub fn encode(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Decodes UTF-8 bytes to text.
///
/// # Errors
///
/// [`CodecError::InvalidUtf8`] carrying the length of the valid prefix.
pub fn decode(bytes: &[u8]) -> Result<String, CodecError> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| CodecError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_multibyte_text() {
        let text = "seal → 👏";
        assert_eq!(decode(&encode(text)).unwrap(), text);
    }

    #[test]
    fn rejects_truncated_sequence() {
        let mut bytes = encode("ab€");
        bytes.pop();
        assert_eq!(decode(&bytes), Err(CodecError::InvalidUtf8 { valid_up_to: 2 }));
    }
}
