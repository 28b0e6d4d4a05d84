//! Code table registry.
//!
//! A [`Registry`] answers two questions about the leading characters of a coded
//! value: how long is the hard selector, and which [`Descriptor`] governs it.
//! Everything else (typed header fields, total lengths, frame/group
//! classification) is derived from the descriptor by the provided methods, so a
//! table implementation only supplies lookups.

mod code_table;

pub use code_table::{CodeTable, PrimitiveTable};

use std::sync::Arc;

use cesr_text_codec::value_to_int;
use serde::Serialize;

use crate::error::{code_text, CesrError};
use crate::header::DerivationCode;

/// Which sizing rule a descriptor follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeKind {
    FixedSize,
    VariableSize,
    Indexer,
    Counter,
    Version,
}

/// Multiplier turning a counter's digits into a number of grouped values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Twice,
    Thrice,
    Fourfold,
    TwicePlusOne,
}

impl Repeat {
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "x1" => Some(Repeat::Once),
            "x2" => Some(Repeat::Twice),
            "x3" => Some(Repeat::Thrice),
            "x4" => Some(Repeat::Fourfold),
            "x2+1" => Some(Repeat::TwicePlusOne),
            _ => None,
        }
    }

    pub fn apply(self, n: usize) -> usize {
        match self {
            Repeat::Once => n,
            Repeat::Twice => n * 2,
            Repeat::Thrice => n * 3,
            Repeat::Fourfold => n * 4,
            Repeat::TwicePlusOne => n * 2 + 1,
        }
    }
}

/// One code table entry. Immutable once its table is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Hard part of the code, `hs` characters.
    pub selector: String,
    pub name: Option<String>,
    pub kind: CodeKind,
    pub hs: usize,
    pub ss: usize,
    /// Width of the "other index" inside the soft digits (indexers only).
    pub os: usize,
    pub fs: Option<usize>,
    pub ls: usize,
    /// Raw multiplier text from the table; validated when a header is mapped.
    pub repeat: Option<String>,
    pub frame: bool,
    pub context: Option<String>,
}

impl Descriptor {
    /// Code size `hs + ss`.
    pub fn cs(&self) -> usize {
        self.hs + self.ss
    }
}

/// Capability interface over a set of code tables.
///
/// Implementations must be immutable after construction; a registry is shared
/// read-only between independent decode sessions.
pub trait Registry: Send + Sync {
    /// Label used in diagnostics.
    fn name(&self) -> &str;

    /// Hard size of a primitive code starting with `first`.
    fn primitive_hard_size(&self, first: u8) -> Option<usize>;

    /// Hard size of a counter code starting with the two bytes `first_two`.
    fn counter_hard_size(&self, first_two: &[u8]) -> Option<usize>;

    fn lookup(&self, selector: &str) -> Result<Arc<Descriptor>, CesrError>;

    /// Resolves a named sub-context (another table view or sub-protocol).
    fn context(&self, name: &str) -> Result<Arc<dyn Registry>, CesrError> {
        Err(CesrError::unknown_code(
            format!("{} has no contexts", self.name()),
            name,
        ))
    }

    /// Hard size of the selector at the start of `candidate`.
    fn selector_size(&self, candidate: &[u8]) -> Result<usize, CesrError> {
        let first = *candidate.first().ok_or(CesrError::Shortage { have: 0, need: 1 })?;
        match first {
            b'-' => {
                if candidate.len() < 2 {
                    return Err(CesrError::shortage(candidate.len(), 2));
                }
                self.counter_hard_size(&candidate[..2]).ok_or_else(|| {
                    CesrError::unknown_code("counter hard size", code_text(&candidate[..2]))
                })
            }
            b'_' => Err(CesrError::UnexpectedOpCodeStart {
                code: code_text(&candidate[..1]),
            }),
            _ => self
                .primitive_hard_size(first)
                .ok_or_else(|| CesrError::UnexpectedCode {
                    code: code_text(&candidate[..1]),
                }),
        }
    }

    /// Parses `text` (the `cs` code characters) into typed header fields.
    fn map_header(&self, descriptor: &Arc<Descriptor>, text: &str) -> Result<DerivationCode, CesrError> {
        let cs = descriptor.cs();
        if !text.is_ascii() {
            return Err(CesrError::UnexpectedCode {
                code: text.to_string(),
            });
        }
        if text.len() < cs {
            return Err(CesrError::shortage(text.len(), cs));
        }
        let digits = &text[descriptor.hs..cs];
        let mut header = DerivationCode::new(Arc::clone(descriptor), digits);

        match descriptor.kind {
            CodeKind::FixedSize => {
                header.lead_bytes = Some(descriptor.ls);
            }
            CodeKind::VariableSize => {
                header.lead_bytes = Some(descriptor.ls);
                header.size = Some(value_to_int(digits.as_bytes())? as usize);
            }
            CodeKind::Counter => {
                let n = value_to_int(digits.as_bytes())? as usize;
                match &descriptor.repeat {
                    Some(text) => {
                        let repeat = Repeat::parse(text).ok_or_else(|| {
                            CesrError::unknown_code(
                                format!("repeat multiplier {text:?}"),
                                &descriptor.selector,
                            )
                        })?;
                        header.count = Some(repeat.apply(n));
                    }
                    None => {
                        header.quadlets = Some(n);
                        header.count = Some(n);
                    }
                }
            }
            CodeKind::Indexer => {
                header.lead_bytes = Some(descriptor.ls);
                let os = descriptor.os;
                if os > 0 && os <= digits.len() {
                    header.index = Some(value_to_int(digits[..os].as_bytes())? as usize);
                    header.ondex = Some(value_to_int(digits[os..].as_bytes())? as usize);
                } else {
                    header.index = Some(value_to_int(digits.as_bytes())? as usize);
                }
            }
            CodeKind::Version => {
                header.version = Some(digits.to_string());
            }
        }

        Ok(header)
    }

    /// Total characters covered by a value with this header, code included.
    fn total_length(&self, header: &DerivationCode) -> Result<usize, CesrError> {
        let fixed = || {
            header
                .descriptor
                .fs
                .ok_or_else(|| CesrError::unknown_code("no fixed size", &header.selector))
        };
        match header.kind {
            CodeKind::FixedSize | CodeKind::Indexer | CodeKind::Version => fixed(),
            CodeKind::VariableSize => match header.size {
                Some(size) => Ok(header.code_length + 4 * size),
                None => Err(CesrError::unknown_code("no size digits", &header.selector)),
            },
            CodeKind::Counter => match header.quadlets {
                Some(quadlets) => Ok(header.code_length + 4 * quadlets),
                None => fixed(),
            },
        }
    }

    /// Counter whose body is a nested stream of its own.
    fn is_frame(&self, header: &DerivationCode) -> bool {
        header.kind == CodeKind::Counter
            && header.descriptor.repeat.is_none()
            && header.descriptor.frame
    }

    /// Counter announcing `count` repetitions of grouped values.
    fn is_group(&self, header: &DerivationCode) -> bool {
        header.kind == CodeKind::Counter && header.descriptor.repeat.is_some()
    }

    fn has_context(&self, header: &DerivationCode) -> bool {
        header.descriptor.context.is_some()
    }

    fn get_context(&self, header: &DerivationCode) -> Result<Arc<dyn Registry>, CesrError> {
        match &header.descriptor.context {
            Some(name) => self.context(name),
            None => Err(CesrError::unknown_code("no context", &header.selector)),
        }
    }
}
