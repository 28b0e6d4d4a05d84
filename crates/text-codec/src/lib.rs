//! Byte and text codecs for CESR streams.
//!
//! This crate provides:
//! - URL-safe base64 (`A-Z a-z 0-9 - _`) with optional padding
//! - base64 digit strings read as integers, as used by derivation codes
//! - lowercase hexadecimal
//! - strict UTF-8
//!
//! # Example
//!
//! ```
//! use cesr_text_codec::{from_base64_url, to_base64_url};
//!
//! let data = b"hello world";
//! let encoded = to_base64_url(data, true);
//! let decoded = from_base64_url(encoded.as_bytes()).unwrap();
//! assert_eq!(decoded.as_slice(), data);
//! ```

mod b64_int;
mod constants;
mod create_from_base64;
mod create_to_base64;
mod from_base64_url;
mod to_base64_url;

pub mod hex;
pub mod utf8;

pub use b64_int::{int_to_b64, value_to_int, MAX_INT_DIGITS};
pub use constants::{ALPHABET_URL, ALPHABET_URL_BYTES, PAD};
pub use create_from_base64::create_from_base64;
pub use create_to_base64::create_to_base64;
pub use from_base64_url::from_base64_url;
pub use to_base64_url::to_base64_url;

use thiserror::Error;

/// Error type for codec operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input contains a character outside the codec's alphabet.
    #[error("invalid character {ch:?} at offset {index}")]
    InvalidCharacter { ch: char, index: usize },
    /// The input length cannot be decoded by this codec.
    #[error("invalid input length {length}")]
    InvalidLength { length: usize },
    /// The input bytes are not well-formed UTF-8.
    #[error("invalid utf-8 after {valid_up_to} bytes")]
    InvalidUtf8 { valid_up_to: usize },
    /// The integer needs more digits than requested.
    #[error("value {value} does not fit in {width} base64 digits")]
    ValueTooLarge { value: u64, width: usize },
}
