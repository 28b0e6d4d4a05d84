//! Decoded headers and the byte spans they cover.

use std::sync::Arc;

use serde::Serialize;

use crate::registry::{CodeKind, Descriptor};

/// Version string of a structured-serialization frame, e.g. `KERI10JSON0000fc_`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionHeader {
    /// Protocol and version digits, e.g. `KERI10`.
    pub protocol: String,
    /// Serialization kind, e.g. `JSON`.
    pub kind: String,
    /// Size digits as they appear in the version string.
    pub digits: String,
    /// Total frame length in bytes.
    pub size: usize,
}

/// Selector plus digits of a coded value, split into typed fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivationCode {
    pub selector: String,
    #[serde(skip)]
    pub descriptor: Arc<Descriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: CodeKind,
    pub digits: String,
    /// `cs`, the number of code characters.
    pub code_length: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quadlets: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ondex: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl DerivationCode {
    pub(crate) fn new(descriptor: Arc<Descriptor>, digits: &str) -> Self {
        Self {
            selector: descriptor.selector.clone(),
            name: descriptor.name.clone(),
            kind: descriptor.kind,
            digits: digits.to_string(),
            code_length: descriptor.cs(),
            descriptor,
            lead_bytes: None,
            size: None,
            quadlets: None,
            count: None,
            index: None,
            ondex: None,
            version: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Header {
    Version(VersionHeader),
    Code(DerivationCode),
}

impl Header {
    pub fn as_code(&self) -> Option<&DerivationCode> {
        match self {
            Header::Code(code) => Some(code),
            Header::Version(_) => None,
        }
    }

    pub fn as_version(&self) -> Option<&VersionHeader> {
        match self {
            Header::Version(version) => Some(version),
            Header::Code(_) => None,
        }
    }
}

/// A header and the span `start..start + length` of the input it covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedValue {
    pub header: Header,
    pub start: usize,
    pub length: usize,
}

impl DecodedValue {
    pub(crate) fn new(header: Header, length: usize) -> Self {
        Self {
            header,
            start: 0,
            length,
        }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// The covered bytes of `input`, which must be the decoded input.
    pub fn bytes<'a>(&self, input: &'a [u8]) -> &'a [u8] {
        input.get(self.start..self.end()).unwrap_or_default()
    }

    pub(crate) fn shifted(mut self, offset: usize) -> Self {
        self.start += offset;
        self
    }
}
