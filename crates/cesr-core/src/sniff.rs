//! Cold-start classification and single-value framing.

use regex::Regex;

use cesr_text_codec::hex;

use crate::error::{code_text, CesrError};
use crate::header::{DecodedValue, Header, VersionHeader};
use crate::matter::{extract_primitive, extract_seal_source_triples};
use crate::registry::Registry;

/// Bytes of the `{"v":"PPPPvvKKKKhhhhhh_"` window read ahead of a serialization body.
pub const VERSION_WINDOW: usize = 24;

const SEAL_SOURCE_TRIPLES: &str = "SealSourceTriples";

/// Stream class announced by the top three bits of the first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColdCode {
    /// Annotated Base64.
    Annotated,
    /// Counter code text, `-`.
    CountText,
    /// Op code text, `_`.
    OpText,
    Json,
    MsgPack1,
    Cbor,
    MsgPack2,
    /// Counter/op code in binary domain.
    CountBinary,
}

const COLD_CODES: [ColdCode; 8] = [
    ColdCode::Annotated,
    ColdCode::CountText,
    ColdCode::OpText,
    ColdCode::Json,
    ColdCode::MsgPack1,
    ColdCode::Cbor,
    ColdCode::MsgPack2,
    ColdCode::CountBinary,
];

impl ColdCode {
    pub fn from_byte(byte: u8) -> Self {
        COLD_CODES[(byte >> 5) as usize]
    }

    pub fn tritet(self) -> u8 {
        self as u8
    }
}

/// Decodes the value at the start of a cold-start span.
pub fn sniff(registry: &dyn Registry, input: &[u8]) -> Result<DecodedValue, CesrError> {
    let first = *input.first().ok_or(CesrError::Shortage { have: 0, need: 1 })?;
    match ColdCode::from_byte(first) {
        ColdCode::CountText => text_frame(registry, input),
        ColdCode::Json => version_frame(input),
        other => Err(CesrError::UnsupportedColdStart {
            tritet: other.tritet(),
        }),
    }
}

/// Decodes one derivation-coded value (counter or primitive) at the start of `input`.
pub fn text_frame(registry: &dyn Registry, input: &[u8]) -> Result<DecodedValue, CesrError> {
    if input.first() != Some(&b'-') {
        let primitive = extract_primitive(input, registry)?;
        let descriptor = registry.lookup(&primitive.selector)?;
        let header = registry.map_header(&descriptor, &primitive.code)?;
        return Ok(DecodedValue::new(Header::Code(header), primitive.total_length));
    }

    let hs = registry.selector_size(input)?;
    if input.len() < hs {
        return Err(CesrError::shortage(input.len(), hs));
    }
    let selector = std::str::from_utf8(&input[..hs]).map_err(|_| CesrError::UnexpectedCode {
        code: code_text(&input[..hs]),
    })?;
    let descriptor = registry.lookup(selector)?;
    let cs = descriptor.cs();
    if input.len() < cs {
        return Err(CesrError::shortage(input.len(), cs));
    }
    let text = std::str::from_utf8(&input[..cs]).map_err(|_| CesrError::UnexpectedCode {
        code: code_text(&input[..cs]),
    })?;
    let header = registry.map_header(&descriptor, text)?;

    let length = if descriptor.name.as_deref() == Some(SEAL_SOURCE_TRIPLES) {
        extract_seal_source_triples(input, registry)
            .map_err(|err| match err {
                CesrError::Shortage { need, .. } => CesrError::Shortage {
                    have: input.len(),
                    need,
                },
                other => other,
            })?
            .length
    } else {
        registry.total_length(&header)?
    };
    if input.len() < length {
        return Err(CesrError::shortage(input.len(), length));
    }
    Ok(DecodedValue::new(Header::Code(header), length))
}

fn version_regex() -> &'static Regex {
    use std::sync::OnceLock;
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^\{"[a-z]":"([A-Z]{4}[0-9a-f]{2})([A-Z]{4})([0-9a-f]{6})_""#).unwrap()
    })
}

/// Reads the version string of a structured serialization at the start of `input`.
pub fn parse_version(input: &[u8]) -> Result<VersionHeader, CesrError> {
    if input.len() < VERSION_WINDOW {
        return Err(CesrError::shortage(input.len(), VERSION_WINDOW));
    }
    let window = &input[..VERSION_WINDOW];
    let unsupported = || CesrError::UnsupportedHeader {
        header: code_text(window),
    };
    let text = std::str::from_utf8(window).map_err(|_| unsupported())?;
    let captures = version_regex().captures(text).ok_or_else(unsupported)?;

    let kind = &captures[2];
    match kind {
        "JSON" => {}
        _ => {
            return Err(CesrError::UnsupportedSerialization {
                kind: kind.to_string(),
            })
        }
    }
    let digits = &captures[3];
    let size = hex::decode_uint(digits)? as usize;
    if size < VERSION_WINDOW {
        return Err(unsupported());
    }

    Ok(VersionHeader {
        protocol: captures[1].to_string(),
        kind: kind.to_string(),
        digits: digits.to_string(),
        size,
    })
}

/// Frames a structured-serialization body by its version string.
pub fn version_frame(input: &[u8]) -> Result<DecodedValue, CesrError> {
    let version = parse_version(input)?;
    if input.len() < version.size {
        return Err(CesrError::shortage(input.len(), version.size));
    }
    let size = version.size;
    Ok(DecodedValue::new(Header::Version(version), size))
}
