//! Primitive encoding round trips and header sizing rules.

use cesr_core::registry::{CodeKind, PrimitiveTable};
use cesr_core::{encode_primitive, extract_primitive, CesrError, CodeTable, Registry};
use cesr_text_codec::ALPHABET_URL_BYTES;
use proptest::prelude::*;

/// Fixed-size matter codes without soft digits.
const FIXED_CODES: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "0A", "0B", "0C", "0G", "0H", "0I", "1AAA", "1AAB", "1AAC", "1AAE",
    "1AAF", "1AAG", "1AAH", "1AAK",
];

fn raw_size(table: &CodeTable, code: &str) -> usize {
    let descriptor = table.lookup(code).unwrap();
    (descriptor.fs.unwrap() - descriptor.cs()) * 3 / 4 - descriptor.ls
}

proptest! {
    #[test]
    fn fixed_matter_round_trips(
        code_index in 0..FIXED_CODES.len(),
        seed in prop::collection::vec(any::<u8>(), 120),
    ) {
        let table = CodeTable::keri_v1().unwrap();
        let code = FIXED_CODES[code_index];
        let raw = &seed[..raw_size(&table, code)];

        let text = encode_primitive(raw, code, &table).unwrap();
        prop_assert_eq!(text.len(), table.lookup(code).unwrap().fs.unwrap());

        let primitive = extract_primitive(text.as_bytes(), &table).unwrap();
        prop_assert_eq!(primitive.selector.as_str(), code);
        prop_assert_eq!(primitive.raw.as_slice(), raw);
    }

    #[test]
    fn total_length_covers_code(
        digits in prop::collection::vec(prop::sample::select(ALPHABET_URL_BYTES.to_vec()), 8),
        indexer in any::<bool>(),
    ) {
        let primitives = if indexer { PrimitiveTable::Indexer } else { PrimitiveTable::Matter };
        let table = CodeTable::keri_v1().unwrap().with_primitives(primitives);
        for descriptor in table.descriptors() {
            let mut text = descriptor.selector.clone().into_bytes();
            text.extend_from_slice(&digits[..descriptor.ss]);
            let text = String::from_utf8(text).unwrap();

            let header = match table.map_header(descriptor, &text) {
                Ok(header) => header,
                // Unknown repeat multipliers are the only table-driven failure.
                Err(err) => {
                    let unknown = matches!(err, CesrError::UnknownCode { .. });
                    prop_assert!(unknown, "unexpected error {:?}", err);
                    continue;
                }
            };
            let total = table.total_length(&header).unwrap();
            prop_assert!(total >= header.code_length);
            if header.kind == CodeKind::VariableSize {
                prop_assert_eq!((total - header.code_length) % 4, 0);
            }
        }
    }
}

#[test]
fn every_listed_code_is_fixed_and_softless() {
    let table = CodeTable::keri_v1().unwrap();
    for code in FIXED_CODES {
        let descriptor = table.lookup(code).unwrap();
        assert_eq!(descriptor.kind, CodeKind::FixedSize, "{code}");
        assert_eq!(descriptor.ss, 0, "{code}");
    }
}

#[test]
fn variable_size_counts_quadlets() {
    let table = CodeTable::keri_v1().unwrap();
    let text = format!("4AAC{}", "A".repeat(8));
    let primitive = extract_primitive(text.as_bytes(), &table).unwrap();
    assert_eq!(primitive.total_length, 12);
    assert_eq!(primitive.raw, vec![0u8; 6]);

    let header = table
        .map_header(&table.lookup("7AAA").unwrap(), "7AAAAAAB")
        .unwrap();
    assert_eq!(header.size, Some(1));
    assert_eq!(table.total_length(&header).unwrap(), 12);
}

#[test]
fn indexer_splits_other_index() {
    let table = CodeTable::keri_v1().unwrap().with_primitives(PrimitiveTable::Indexer);
    let descriptor = table.lookup("2A").unwrap();
    assert_eq!(descriptor.os, 2);
    let header = table.map_header(&descriptor, "2AABAC").unwrap();
    assert_eq!(header.index, Some(1));
    assert_eq!(header.ondex, Some(2));
}

#[test]
fn unknown_repeat_multiplier_is_unknown_code() {
    let sizes = r#"{"Counter": {"-X": {"hs": 2, "ss": 2, "fs": 4, "ls": 0}}}"#;
    let counter = r#"{"Counter": {"-X": {"name": "Odd", "repeat": "x5"}}}"#;
    let table = CodeTable::from_json(sizes, "{}", counter).unwrap();
    let descriptor = table.lookup("-X").unwrap();
    assert!(matches!(
        table.map_header(&descriptor, "-XAB"),
        Err(CesrError::UnknownCode { code, .. }) if code == "-X"
    ));
}

#[test]
fn version_code_keeps_digits() {
    let table = CodeTable::keri_v1().unwrap();
    let descriptor = table.lookup("-_AAA").unwrap();
    let header = table.map_header(&descriptor, "-_AAABAA").unwrap();
    assert_eq!(header.kind, CodeKind::Version);
    assert_eq!(header.version.as_deref(), Some("BAA"));
    assert_eq!(table.total_length(&header).unwrap(), 8);
}
