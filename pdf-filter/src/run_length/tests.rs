use super::*;
use test_case::test_case;

#[test_case(&[5, b'a', b'b', b'c', b'd', b'e', b'f'], b"abcdef"; "literal run")]
#[test_case(&[0, b'q'], b"q"; "single literal")]
#[test_case(&[255, b'X'], b"XX"; "replicate twice")]
#[test_case(&[129, b'Y'], &[b'Y'; 128]; "replicate 128 times")]
#[test_case(&[128, 1, 2, 3], b""; "eod stops decoding")]
#[test_case(&[1, b'h', b'i', 128, 99], b"hi"; "eod after literal")]
#[test_case(&[254, b'a', 2, b'x', b'y', b'z'], b"aaaxyz"; "mixed runs")]
#[test_case(&[], b""; "empty")]
fn decode_ok(buf: &[u8], exp: &[u8]) {
    assert_eq!(exp, &decode(buf).unwrap()[..]);
}

#[test_case(&[5, b'a']; "truncated literal run")]
#[test_case(&[200]; "truncated replicate run")]
fn decode_err(buf: &[u8]) {
    assert!(matches!(decode(buf), Err(Error::ValueOutOfRange)));
}
