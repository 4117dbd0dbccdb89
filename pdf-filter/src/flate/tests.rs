use super::*;
use std::collections::HashMap;
use test_case::test_case;

fn encode(data: &[u8], chunk: usize) -> Vec<u8> {
    let mut sink = Vec::new();
    let mut f = FlateFilter::default();
    f.begin_encode(&mut sink).unwrap();
    for c in data.chunks(chunk) {
        f.encode_block(c).unwrap();
    }
    f.end_encode().unwrap();
    sink
}

#[test_case(1)]
#[test_case(16)]
#[test_case(4096)]
fn round_trip(chunk: usize) {
    let data: Vec<u8> = (0..20000usize).map(|i| (i % 251) as u8).collect();
    assert_eq!(data, decode(&encode(&data, chunk), None).unwrap());
}

#[test]
fn round_trip_empty() {
    assert_eq!(Vec::<u8>::new(), decode(&encode(&[], 16), None).unwrap());
}

#[test]
fn decode_raw_deflate_fallback() {
    use flate2::bufread::DeflateEncoder;
    let data = b"raw deflate stream without zlib header";
    let mut encoded = Vec::new();
    DeflateEncoder::new(&data[..], flate2::Compression::default())
        .read_to_end(&mut encoded)
        .unwrap();
    assert_eq!(&data[..], &decode(&encoded, None).unwrap()[..]);
}

#[test]
fn decode_corrupt_stream() {
    assert!(matches!(
        decode(b"not a flate stream", None),
        Err(Error::Decompress(_))
    ));
}

#[test]
fn default_params_are_identity() {
    let data = b"predictor one is a no-op";
    let params = HashMap::new();
    assert_eq!(
        &data[..],
        &decode(&encode(data, 8), Some(&params as &dyn ParamSource)).unwrap()[..]
    );
}

#[test]
fn decode_with_up_predictor() {
    // two rows of two columns, png Up tag on each row
    let raw = [2u8, 1, 2, 2, 1, 2];
    let mut params = HashMap::new();
    params.insert("Predictor".to_owned(), 12);
    params.insert("Columns".to_owned(), 2);
    assert_eq!(
        vec![1, 2, 2, 4],
        decode(&encode(&raw, 3), Some(&params as &dyn ParamSource)).unwrap()
    );
}

#[test]
fn decode_with_tiff_predictor_unsupported() {
    let mut params = HashMap::new();
    params.insert("Predictor".to_owned(), 2);
    assert!(matches!(
        decode(&encode(b"x", 1), Some(&params as &dyn ParamSource)),
        Err(Error::UnsupportedPredictor(2))
    ));
}

struct FailSink;

impl Sink for FailSink {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "sink full"))
    }
}

#[test]
fn sink_failure_unbinds_session() {
    let mut bad = FailSink;
    let mut f = FlateFilter::default();
    f.begin_encode(&mut bad).unwrap();
    let data = vec![7u8; 100_000];
    let mut r = f.encode_block(&data);
    if r.is_ok() {
        // small inputs may stay buffered in the compressor until finish
        r = f.end_encode();
    }
    assert!(matches!(r, Err(Error::IOError(_))));

    // the sink was unbound, a new session can start
    let mut sink = Vec::new();
    f.begin_encode(&mut sink).unwrap();
    f.encode_block(b"recovered").unwrap();
    f.end_encode().unwrap();
    assert_eq!(&b"recovered"[..], &decode(&sink, None).unwrap()[..]);
}
