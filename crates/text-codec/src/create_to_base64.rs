//! Factory function for creating base64 encoders with custom alphabets.

use crate::constants::{ALPHABET_URL_BYTES, PAD};

/// Creates a base64 encoder function with a custom alphabet.
///
/// # Arguments
///
/// * `chars` - The 64-character alphabet. Defaults to the URL-safe alphabet.
/// * `strip_padding` - If true, the trailing `=` characters are omitted.
///
/// # Example
///
/// ```
/// use cesr_text_codec::create_to_base64;
///
/// let encode = create_to_base64(None, false);
/// assert_eq!(encode(b"hello"), "aGVsbG8=");
/// ```
pub fn create_to_base64(chars: Option<&[u8; 64]>, strip_padding: bool) -> impl Fn(&[u8]) -> String {
    let table = *chars.unwrap_or(ALPHABET_URL_BYTES);

    move |uint8: &[u8]| -> String {
        let extra_length = uint8.len() % 3;
        let base_length = uint8.len() - extra_length;
        let mut out = Vec::with_capacity(uint8.len().div_ceil(3) * 4);

        let mut i = 0;
        while i < base_length {
            let o1 = uint8[i];
            let o2 = uint8[i + 1];
            let o3 = uint8[i + 2];
            out.push(table[(o1 >> 2) as usize]);
            out.push(table[(((o1 & 0x03) << 4) | (o2 >> 4)) as usize]);
            out.push(table[(((o2 & 0x0f) << 2) | (o3 >> 6)) as usize]);
            out.push(table[(o3 & 0x3f) as usize]);
            i += 3;
        }

        if extra_length == 1 {
            let o1 = uint8[base_length];
            out.push(table[(o1 >> 2) as usize]);
            out.push(table[((o1 & 0x03) << 4) as usize]);
            if !strip_padding {
                out.push(PAD);
                out.push(PAD);
            }
        } else if extra_length == 2 {
            let o1 = uint8[base_length];
            let o2 = uint8[base_length + 1];
            out.push(table[(o1 >> 2) as usize]);
            out.push(table[(((o1 & 0x03) << 4) | (o2 >> 4)) as usize]);
            out.push(table[((o2 & 0x0f) << 2) as usize]);
            if !strip_padding {
                out.push(PAD);
            }
        }

        // Every byte pushed comes from the ASCII alphabet or PAD.
        out.into_iter().map(char::from).collect()
    }
}
