//! Truncated streams fail with the exact number of missing bytes.

use std::sync::Arc;

use cesr_core::{decode, CesrError, CodeTable, Registry};

fn registry() -> Arc<dyn Registry> {
    Arc::new(CodeTable::keri_v1().unwrap())
}

fn last_error(stream: &[u8]) -> CesrError {
    decode(stream, registry())
        .find_map(Result::err)
        .expect("truncated stream must fail")
}

#[test]
fn truncated_signature_group() {
    let stream = format!("-AAB{}", "A".repeat(88));
    let stream = stream.as_bytes();
    assert_eq!(stream.len(), 92);

    for cut in 2..4 {
        assert_eq!(
            last_error(&stream[..cut]),
            CesrError::Shortage {
                have: cut,
                need: 4 - cut
            },
            "cut at {cut}"
        );
    }
    for cut in 5..stream.len() {
        assert_eq!(
            last_error(&stream[..cut]),
            CesrError::Shortage {
                have: cut - 4,
                need: 92 - cut
            },
            "cut at {cut}"
        );
    }
}

#[test]
fn cut_after_counter_leaves_group_open() {
    let stream = format!("-AAB{}", "A".repeat(88));
    assert_eq!(
        last_error(&stream.as_bytes()[..4]),
        CesrError::UnclosedGroup { remaining: 1 }
    );
}

#[test]
fn truncated_json_event() {
    let head = r#"{"v":"KERI10JSON000040_","t":"icp","d":""#;
    let stream = format!("{head}{}\"}}", "E".repeat(64 - head.len() - 2));
    assert_eq!(stream.len(), 64);
    for cut in 24..64 {
        assert_eq!(
            last_error(&stream.as_bytes()[..cut]),
            CesrError::Shortage {
                have: cut,
                need: 64 - cut
            }
        );
    }
}

#[test]
fn truncated_attached_material() {
    let stream = b"-VACABCDEFGH";
    for cut in 4..stream.len() {
        assert_eq!(
            last_error(&stream[..cut]),
            CesrError::Shortage {
                have: cut,
                need: 12 - cut
            }
        );
    }
}

#[test]
fn truncated_nested_frame_body() {
    let stream = format!("-LALE{}", "A".repeat(43));
    for cut in 4..stream.len() {
        assert_eq!(
            last_error(&stream.as_bytes()[..cut]),
            CesrError::Shortage {
                have: cut,
                need: 48 - cut
            }
        );
    }
}
