//! Failure kinds for a decode attempt.
//!
//! Every variant is fatal to the decode in progress and carries enough context
//! (offending code, expected and available lengths) to be shown to a user as is.

use cesr_text_codec::CodecError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CesrError {
    /// `need` more bytes are required than the `have` available.
    #[error("shortage: need {need} more bytes, have {have}")]
    Shortage { have: usize, need: usize },
    #[error("unknown code {code:?} ({context})")]
    UnknownCode { context: String, code: String },
    #[error("unexpected count code start {code:?}")]
    UnexpectedCountCodeStart { code: String },
    #[error("unexpected op code start {code:?}")]
    UnexpectedOpCodeStart { code: String },
    #[error("unexpected code start {code:?}")]
    UnexpectedCode { code: String },
    #[error("non-zero pad bits in {code:?}")]
    NonZeroPadBits { code: String },
    #[error("non-zero lead bytes in {code:?}")]
    NonZeroLeadBytes { code: String },
    #[error("conversion error in {code:?}: expected {expected} raw bytes, got {actual}")]
    Conversion {
        code: String,
        expected: usize,
        actual: usize,
    },
    #[error("unsupported cold start 0b{tritet:03b}")]
    UnsupportedColdStart { tritet: u8 },
    #[error("unsupported serialization {kind:?}")]
    UnsupportedSerialization { kind: String },
    #[error("unsupported header {header:?}")]
    UnsupportedHeader { header: String },
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
    /// A frame ran out while group repetitions were still pending.
    #[error("frame ended with {remaining} grouped values outstanding")]
    UnclosedGroup { remaining: usize },
    #[error("cannot pop the root frame")]
    FrameUnderflow,
    #[error("invalid code table: {reason}")]
    Table { reason: String },
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl CesrError {
    pub(crate) fn shortage(have: usize, want: usize) -> Self {
        CesrError::Shortage {
            have,
            need: want - have,
        }
    }

    pub(crate) fn unknown_code(context: impl Into<String>, code: impl Into<String>) -> Self {
        CesrError::UnknownCode {
            context: context.into(),
            code: code.into(),
        }
    }

    pub(crate) fn table(reason: impl Into<String>) -> Self {
        CesrError::Table {
            reason: reason.into(),
        }
    }
}

/// Text of `bytes` for error messages, lossy on the (already invalid) non-UTF-8 case.
pub(crate) fn code_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
