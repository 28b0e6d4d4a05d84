//! URL-safe base64 decoding function.

use crate::create_from_base64;
use crate::CodecError;

/// Decodes URL-safe base64 text (padded or unpadded) to bytes.
///
/// # Errors
///
/// * [`CodecError::InvalidCharacter`] for a byte outside `A-Z a-z 0-9 - _`.
/// * [`CodecError::InvalidLength`] when the unpadded length is `1 (mod 4)`.
///
/// # Example
///
/// ```
/// use cesr_text_codec::from_base64_url;
///
/// assert_eq!(from_base64_url(b"aGVsbG8gd29ybGQ").unwrap(), b"hello world");
/// ```
pub fn from_base64_url(encoded: &[u8]) -> Result<Vec<u8>, CodecError> {
    let decoder = create_from_base64(None);
    decoder(encoded)
}
