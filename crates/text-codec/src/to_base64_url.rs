//! URL-safe base64 encoding function.

use crate::create_to_base64;

/// Encodes a byte slice to a URL-safe base64 string.
///
/// # Example
///
/// ```
/// use cesr_text_codec::to_base64_url;
///
/// assert_eq!(to_base64_url(b"hello world", true), "aGVsbG8gd29ybGQ");
/// assert_eq!(to_base64_url(b"hello world", false), "aGVsbG8gd29ybGQ=");
/// ```
pub fn to_base64_url(uint8: &[u8], strip_padding: bool) -> String {
    let encoder = create_to_base64(None, strip_padding);
    encoder(uint8)
}
