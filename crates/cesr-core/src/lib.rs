//! CESR stream decoding.
//!
//! A CESR stream interleaves derivation-coded primitives, counters and
//! structured serializations (JSON) without external length prefixes. This
//! crate frames such a stream value by value:
//!
//! - [`registry`]: code tables behind the [`Registry`] trait, with the bundled
//!   KERI v1 tables in [`CodeTable`]
//! - [`matter`]: primitive and counter extraction with pad/lead validation
//! - [`sniff`]: cold-start classification and version-string framing
//! - [`decoder`]: the lazy [`CesrDecoder`] over frame and group stacks
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use cesr_core::{decode, CodeTable, Header};
//!
//! let registry = Arc::new(CodeTable::keri_v1().unwrap());
//! let stream = format!("-CAB{}{}", format!("B{}", "A".repeat(43)), format!("0B{}", "A".repeat(86)));
//! let values: Vec<_> = decode(stream.as_str(), registry).collect::<Result<_, _>>().unwrap();
//! assert_eq!(values.len(), 3);
//! assert!(matches!(&values[0].header, Header::Code(code) if code.count == Some(2)));
//! ```

pub mod decoder;
pub mod error;
pub mod header;
pub mod hooks;
pub mod input;
pub mod matter;
pub mod registry;
pub mod sniff;
pub mod state;

pub use decoder::{decode, decode_with, CesrDecoder};
pub use error::CesrError;
pub use header::{DecodedValue, DerivationCode, Header, VersionHeader};
pub use hooks::{HookContext, MapHooks, ValueKind};
pub use input::{Input, OwnedInput};
pub use matter::{encode_primitive, extract_counter, extract_primitive, Primitive};
pub use registry::{CodeKind, CodeTable, Descriptor, PrimitiveTable, Registry};
pub use sniff::sniff;
pub use state::{DecoderState, Frame, FrameMode, Group};
