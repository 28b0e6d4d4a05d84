//! Qualified primitive ("matter") and counter extraction.

use std::str;
use std::sync::Arc;

use cesr_text_codec::{from_base64_url, to_base64_url, value_to_int};

use crate::error::{code_text, CesrError};
use crate::registry::{CodeKind, Descriptor, Registry};

/// A decoded primitive: its code, the characters it spans and its raw payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Primitive {
    /// Hard part of the code.
    pub selector: String,
    /// Full code text, `cs` characters.
    pub code: String,
    pub total_length: usize,
    pub raw: Vec<u8>,
}

fn ascii<'a>(input: &'a [u8]) -> Result<&'a str, CesrError> {
    match str::from_utf8(input) {
        Ok(text) if text.is_ascii() => Ok(text),
        _ => Err(CesrError::UnexpectedCode {
            code: code_text(input),
        }),
    }
}

fn ensure(input: &[u8], want: usize) -> Result<(), CesrError> {
    if input.len() < want {
        return Err(CesrError::shortage(input.len(), want));
    }
    Ok(())
}

/// Decodes the primitive at the start of `input`.
pub fn extract_primitive(input: &[u8], registry: &dyn Registry) -> Result<Primitive, CesrError> {
    let first = *input.first().ok_or(CesrError::Shortage { have: 0, need: 1 })?;
    match first {
        b'-' => {
            return Err(CesrError::UnexpectedCountCodeStart {
                code: code_text(&input[..1]),
            })
        }
        b'_' => {
            return Err(CesrError::UnexpectedOpCodeStart {
                code: code_text(&input[..1]),
            })
        }
        _ => {}
    }
    let hs = registry
        .primitive_hard_size(first)
        .ok_or_else(|| CesrError::UnexpectedCode {
            code: code_text(&input[..1]),
        })?;
    ensure(input, hs)?;
    let selector = ascii(&input[..hs])?;
    let descriptor = registry.lookup(selector)?;
    if let Some(fs) = descriptor.fs {
        ensure(input, fs)?;
    }

    let cs = descriptor.cs();
    ensure(input, cs)?;
    let code = ascii(&input[..cs])?;
    let fs = match descriptor.fs {
        Some(fs) => fs,
        None => value_to_int(&input[hs..cs])? as usize * 4 + cs,
    };
    ensure(input, fs)?;

    let raw = decode_body(&descriptor, code, &input[cs..fs])?;
    Ok(Primitive {
        selector: selector.to_string(),
        code: code.to_string(),
        total_length: fs,
        raw,
    })
}

/// Strips code-side pad bytes and lead bytes from the Base64 body after `code`.
fn decode_body(descriptor: &Descriptor, code: &str, body: &[u8]) -> Result<Vec<u8>, CesrError> {
    let cs = code.len();
    let ps = cs % 4;
    let ls = descriptor.ls;

    let mut text = Vec::with_capacity(ps + body.len());
    text.resize(ps, b'A');
    text.extend_from_slice(body);
    let decoded = from_base64_url(&text)?;

    if decoded.len() < ps + ls {
        return Err(CesrError::Conversion {
            code: code.to_string(),
            expected: ps + ls,
            actual: decoded.len(),
        });
    }
    if decoded[..ps].iter().any(|&b| b != 0) {
        return Err(CesrError::NonZeroPadBits {
            code: code.to_string(),
        });
    }
    if decoded[ps..ps + ls].iter().any(|&b| b != 0) {
        return Err(CesrError::NonZeroLeadBytes {
            code: code.to_string(),
        });
    }

    let raw = decoded[ps + ls..].to_vec();
    let expected = (body.len() * 3 / 4).saturating_sub(ls);
    if raw.len() != expected {
        return Err(CesrError::Conversion {
            code: code.to_string(),
            expected,
            actual: raw.len(),
        });
    }
    Ok(raw)
}

/// Encodes `raw` under the fixed-size, soft-less code `code`.
pub fn encode_primitive(raw: &[u8], code: &str, registry: &dyn Registry) -> Result<String, CesrError> {
    let descriptor = registry.lookup(code)?;
    let fs = match (descriptor.kind, descriptor.ss, descriptor.fs) {
        (CodeKind::FixedSize, 0, Some(fs)) => fs,
        _ => {
            return Err(CesrError::InvalidArgument {
                reason: format!("{code:?} is not a fixed-size code without soft digits"),
            })
        }
    };
    let cs = descriptor.cs();
    let ls = descriptor.ls;

    let expected = ((fs - cs) * 3 / 4).saturating_sub(ls);
    if raw.len() != expected {
        return Err(CesrError::Conversion {
            code: code.to_string(),
            expected,
            actual: raw.len(),
        });
    }
    let ps = (3 - (raw.len() + ls) % 3) % 3;
    if cs % 4 != ps {
        return Err(CesrError::InvalidArgument {
            reason: format!("code size {cs} of {code:?} does not align {ps} pad bytes"),
        });
    }

    let mut padded = vec![0u8; ps + ls];
    padded.extend_from_slice(raw);
    let text = to_base64_url(&padded, true);
    Ok(format!("{code}{}", &text[ps..]))
}

/// A counter code and its undoubled count digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterCode {
    pub selector: String,
    pub code: String,
    pub count: usize,
    pub code_length: usize,
    pub descriptor: Arc<Descriptor>,
}

/// Decodes the counter code at the start of `input`.
pub fn extract_counter(input: &[u8], registry: &dyn Registry) -> Result<CounterCode, CesrError> {
    let first = *input.first().ok_or(CesrError::Shortage { have: 0, need: 1 })?;
    match first {
        b'-' => {}
        b'_' => {
            return Err(CesrError::UnexpectedOpCodeStart {
                code: code_text(&input[..1]),
            })
        }
        _ => {
            return Err(CesrError::UnexpectedCode {
                code: code_text(&input[..1]),
            })
        }
    }
    ensure(input, 2)?;
    let hs = registry
        .counter_hard_size(&input[..2])
        .ok_or_else(|| CesrError::unknown_code("counter hard size", code_text(&input[..2])))?;
    ensure(input, hs)?;
    let selector = ascii(&input[..hs])?;
    let descriptor = registry.lookup(selector)?;
    let cs = descriptor.cs();
    ensure(input, cs)?;
    let code = ascii(&input[..cs])?;
    let count = value_to_int(&input[hs..cs])? as usize;

    Ok(CounterCode {
        selector: selector.to_string(),
        code: code.to_string(),
        count,
        code_length: cs,
        descriptor,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealSourceTriple {
    pub prefix: Primitive,
    pub sequence: Primitive,
    pub digest: Primitive,
}

/// A counted run of (prefix, sequence number, digest) triples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealSourceTriples {
    pub counter: CounterCode,
    pub triples: Vec<SealSourceTriple>,
    /// Characters covered by the counter and every triple.
    pub length: usize,
}

pub fn extract_seal_source_triples(
    input: &[u8],
    registry: &dyn Registry,
) -> Result<SealSourceTriples, CesrError> {
    let counter = extract_counter(input, registry)?;
    let mut offset = counter.code_length;
    let next = |offset: &mut usize| -> Result<Primitive, CesrError> {
        let primitive = extract_primitive(&input[*offset..], registry)?;
        *offset += primitive.total_length;
        Ok(primitive)
    };

    let mut triples = Vec::new();
    for _ in 0..counter.count {
        let prefix = next(&mut offset)?;
        let sequence = next(&mut offset)?;
        let digest = next(&mut offset)?;
        triples.push(SealSourceTriple {
            prefix,
            sequence,
            digest,
        });
    }

    Ok(SealSourceTriples {
        counter,
        triples,
        length: offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CodeTable;

    fn keri() -> CodeTable {
        CodeTable::keri_v1().unwrap()
    }

    #[test]
    fn extracts_fixed_digest() {
        let text = format!("E{}", "A".repeat(43));
        let primitive = extract_primitive(text.as_bytes(), &keri()).unwrap();
        assert_eq!(primitive.selector, "E");
        assert_eq!(primitive.total_length, 44);
        assert_eq!(primitive.raw, vec![0u8; 32]);
    }

    #[test]
    fn extracts_variable_with_lead_byte() {
        // 5A: one lead byte, one quadlet of body.
        let primitive = extract_primitive(b"5AABAGFi", &keri()).unwrap();
        assert_eq!(primitive.code, "5AAB");
        assert_eq!(primitive.total_length, 8);
        assert_eq!(primitive.raw, b"ab");
    }

    #[test]
    fn label_round_trips_through_pad_and_lead() {
        let table = keri();
        let text = encode_primitive(b"z", "V", &table).unwrap();
        assert_eq!(text.len(), 4);
        assert_eq!(extract_primitive(text.as_bytes(), &table).unwrap().raw, b"z");
    }

    #[test]
    fn non_zero_pad_bits() {
        let text = format!("E_{}", "A".repeat(42));
        assert_eq!(
            extract_primitive(text.as_bytes(), &keri()),
            Err(CesrError::NonZeroPadBits {
                code: "E".to_string()
            })
        );
    }

    #[test]
    fn non_zero_lead_bytes() {
        assert_eq!(
            extract_primitive(b"VBAA", &keri()),
            Err(CesrError::NonZeroLeadBytes {
                code: "V".to_string()
            })
        );
        assert_eq!(
            extract_primitive(b"5AAB_AAA", &keri()),
            Err(CesrError::NonZeroLeadBytes {
                code: "5AAB".to_string()
            })
        );
    }

    #[test]
    fn wrong_code_space() {
        let table = keri();
        assert!(matches!(
            extract_primitive(b"-AAB", &table),
            Err(CesrError::UnexpectedCountCodeStart { .. })
        ));
        assert!(matches!(
            extract_primitive(b"_AAB", &table),
            Err(CesrError::UnexpectedOpCodeStart { .. })
        ));
        assert!(matches!(
            extract_primitive(b"2AAB", &table),
            Err(CesrError::UnexpectedCode { .. })
        ));
    }

    #[test]
    fn shortage_reports_missing_bytes() {
        let text = format!("E{}", "A".repeat(40));
        assert_eq!(
            extract_primitive(text.as_bytes(), &keri()),
            Err(CesrError::Shortage { have: 41, need: 3 })
        );
        assert_eq!(
            extract_primitive(b"1A", &keri()),
            Err(CesrError::Shortage { have: 2, need: 2 })
        );
    }

    #[test]
    fn encode_rejects_soft_and_variable_codes() {
        let table = keri();
        assert!(matches!(
            encode_primitive(b"", "X", &table),
            Err(CesrError::InvalidArgument { .. })
        ));
        assert!(matches!(
            encode_primitive(b"abc", "4A", &table),
            Err(CesrError::InvalidArgument { .. })
        ));
        assert_eq!(
            encode_primitive(&[0u8; 31], "E", &table),
            Err(CesrError::Conversion {
                code: "E".to_string(),
                expected: 32,
                actual: 31
            })
        );
    }

    #[test]
    fn counter_count_is_raw_digits() {
        let counter = extract_counter(b"-CAC", &keri()).unwrap();
        assert_eq!(counter.selector, "-C");
        assert_eq!(counter.count, 2);
        assert_eq!(counter.code_length, 4);
        assert!(matches!(
            extract_counter(b"EAAA", &keri()),
            Err(CesrError::UnexpectedCode { .. })
        ));
    }

    #[test]
    fn seal_source_triples_sum_their_primitives() {
        let digest = format!("E{}", "A".repeat(43));
        let sequence = format!("0A{}", "A".repeat(22));
        let triple = format!("{digest}{sequence}{digest}");
        let text = format!("-IAB{triple}");
        let triples = extract_seal_source_triples(text.as_bytes(), &keri()).unwrap();
        assert_eq!(triples.counter.count, 1);
        assert_eq!(triples.triples.len(), 1);
        assert_eq!(triples.triples[0].sequence.raw, vec![0u8; 16]);
        assert_eq!(triples.length, 4 + 44 + 24 + 44);
    }
}
