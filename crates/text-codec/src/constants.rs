/// URL-safe base64 alphabet (uses - and _ instead of + and /).
pub const ALPHABET_URL: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// URL-safe base64 alphabet as a byte array, indexed by sextet value.
pub const ALPHABET_URL_BYTES: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Padding character.
pub const PAD: u8 = b'=';

/// Marker for bytes outside the alphabet in reverse lookup tables.
pub(crate) const INVALID: u8 = 0xff;

/// Builds the character -> sextet reverse lookup table for `chars`.
pub(crate) const fn reverse_table(chars: &[u8; 64]) -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 64 {
        table[chars[i] as usize] = i as u8;
        i += 1;
    }
    table
}

/// Reverse lookup for [`ALPHABET_URL_BYTES`].
pub(crate) const URL_TABLE: [u8; 256] = reverse_table(ALPHABET_URL_BYTES);
