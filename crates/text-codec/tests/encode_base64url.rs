//! Tests for URL-safe base64 encoding (to_base64_url).

use cesr_text_codec::to_base64_url;
use rand::Rng;

fn generate_blob() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let length = rng.gen_range(1..=100);
    (0..length).map(|_| rng.gen::<u8>()).collect()
}

#[test]
fn works() {
    for _ in 0..100 {
        let blob = generate_blob();
        let stripped = to_base64_url(&blob, true);

        assert!(!stripped.contains('+'));
        assert!(!stripped.contains('/'));
        assert!(!stripped.contains('='));
        assert_eq!(stripped.len(), (blob.len() * 4).div_ceil(3));

        let padded = to_base64_url(&blob, false);
        assert_eq!(padded.len() % 4, 0);
        assert!(padded.starts_with(&stripped));
    }
}

#[test]
fn empty_input() {
    assert_eq!(to_base64_url(b"", true), "");
    assert_eq!(to_base64_url(b"", false), "");
}

#[test]
fn single_byte() {
    assert_eq!(to_base64_url(b"f", true), "Zg");
    assert_eq!(to_base64_url(b"f", false), "Zg==");
}

#[test]
fn two_bytes() {
    assert_eq!(to_base64_url(b"fo", true), "Zm8");
    assert_eq!(to_base64_url(b"fo", false), "Zm8=");
}

#[test]
fn three_bytes() {
    assert_eq!(to_base64_url(b"foo", true), "Zm9v");
    assert_eq!(to_base64_url(b"foo", false), "Zm9v");
}

#[test]
fn uses_url_safe_alphabet() {
    assert_eq!(to_base64_url(&[0xfb, 0xff], true), "-_8");
}

#[test]
fn zero_bytes_are_a_runs() {
    assert_eq!(to_base64_url(&[0u8; 33], true), "A".repeat(44));
}
