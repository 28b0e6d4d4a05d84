//! Lowercase hexadecimal text.

use crate::CodecError;

/// Encodes bytes as lowercase hex, two digits per byte.
///
/// ```
/// assert_eq!(cesr_text_codec::hex::encode(&[0x0f, 0xa0]), "0fa0");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}

/// Decodes hex text, each successive character pair giving one byte.
///
/// Upper and lower case digits are both accepted.
///
/// ```
/// use cesr_text_codec::{hex, CodecError};
///
/// assert_eq!(hex::decode("0f").unwrap(), vec![0x0f]);
/// assert!(matches!(hex::decode("abc"), Err(CodecError::InvalidLength { .. })));
/// ```
pub fn decode(text: &str) -> Result<Vec<u8>, CodecError> {
    ::hex::decode(text).map_err(|e| match e {
        ::hex::FromHexError::InvalidHexCharacter { c, index } => {
            CodecError::InvalidCharacter { ch: c, index }
        }
        ::hex::FromHexError::OddLength | ::hex::FromHexError::InvalidStringLength => {
            CodecError::InvalidLength { length: text.len() }
        }
    })
}

/// Decodes hex digits as a big-endian unsigned integer.
pub fn decode_uint(text: &str) -> Result<u64, CodecError> {
    let bytes = decode(text)?;
    if bytes.len() > 8 {
        return Err(CodecError::InvalidLength { length: text.len() });
    }
    Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
}
