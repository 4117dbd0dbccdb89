use std::{collections::HashMap, io};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid encode state: {0}")]
    InvalidState(&'static str),
    #[error("value out of range in encoded data")]
    ValueOutOfRange,
    #[error("unknown png predictor tag: {0}")]
    InvalidPredictor(u8),
    #[error("unsupported predictor: {0}")]
    UnsupportedPredictor(i32),
    #[error("operation not supported by this filter")]
    Unsupported,
    #[error("decompress error: {0}")]
    Decompress(String),
    #[error("IOError: {0}")]
    IOError(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) const ENCODE_ACTIVE: &str =
    "begin_encode already has a sink. Did you forget to call end_encode()?";
pub(crate) const ENCODE_INACTIVE: &str =
    "begin_encode was not yet called or end_encode was called before this method";

/// Append-only byte consumer fed by the streaming encoders.
///
/// Write failures propagate to the caller after the encoder unbinds the
/// sink, so a later `begin_encode` is not blocked by a dead session.
pub trait Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<()>;
}

impl Sink for Vec<u8> {
    fn write(&mut self, buf: &[u8]) -> io::Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

/// Read-only lookup supplying decode parameters, normally backed by the
/// stream dictionary's `DecodeParms` entry.
pub trait ParamSource {
    fn get_int(&self, key: &str, default: i32) -> i32;
}

impl ParamSource for HashMap<String, i32> {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get(key).copied().unwrap_or(default)
    }
}

/// Common surface of all stream filters: a streaming encode session and a
/// one-shot decode.
///
/// A session is inactive until `begin_encode` binds a sink, and
/// `encode_block`/`end_encode` fail with [`Error::InvalidState`] outside an
/// active session. `end_encode` flushes buffered partial data and unbinds.
/// Filters that cannot encode return [`Error::Unsupported`] from all three
/// session methods.
pub trait Filter<'a> {
    fn begin_encode(&mut self, sink: &'a mut dyn Sink) -> Result<()>;

    fn encode_block(&mut self, buf: &[u8]) -> Result<()>;

    fn end_encode(&mut self) -> Result<()>;

    /// One-shot encode of `buf`: a complete begin/encode_block/end session.
    fn encode(&mut self, buf: &[u8], sink: &'a mut dyn Sink) -> Result<()> {
        self.begin_encode(sink)?;
        self.encode_block(buf)?;
        self.end_encode()
    }

    fn decode(&self, buf: &[u8], params: Option<&dyn ParamSource>) -> Result<Vec<u8>>;
}

pub(crate) fn is_whitespace(b: u8) -> bool {
    matches!(b, b'\0' | b'\t' | b'\n' | b'\x0c' | b'\r' | b' ')
}
