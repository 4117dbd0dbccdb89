use crate::{
    filter::{Error, Filter, ParamSource, Result, Sink},
    predictor::{self, PredictorParams},
};
use bitstream_io::{read::BitRead, BigEndian, BitReader};
use log::error;
use std::io::ErrorKind;

const CLEAR: u16 = 256; // reset table
const EOD: u16 = 257; // end of data
const TABLE_BASE: usize = 258;
const TABLE_MAX: usize = 4096;
const MIN_CODE_LEN: u32 = 9;
const MAX_CODE_LEN: u32 = 12;

/// LZWDecode: decode only, msb-first codes of 9 to 12 bits over an
/// adaptive dictionary.
#[derive(Default)]
pub struct LzwFilter;

impl<'a> Filter<'a> for LzwFilter {
    fn begin_encode(&mut self, _sink: &'a mut dyn Sink) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn encode_block(&mut self, _buf: &[u8]) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn end_encode(&mut self) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn decode(&self, buf: &[u8], params: Option<&dyn ParamSource>) -> Result<Vec<u8>> {
        decode(buf, params)
    }
}

pub fn decode(data: &[u8], params: Option<&dyn ParamSource>) -> Result<Vec<u8>> {
    let params = params.map(PredictorParams::new);
    let early_change = params.as_ref().map_or(true, |p| p.early_change == 1);
    let out = Decoder::new(early_change).decode_all(data)?;
    match params {
        Some(p) => predictor::revert(out, &p),
        None => Ok(out),
    }
}

struct Decoder {
    table: Vec<Vec<u8>>,
    code_len: u32,
    prev: Option<u16>,
    early_change: bool,
}

impl Decoder {
    fn new(early_change: bool) -> Self {
        let mut table = Vec::with_capacity(TABLE_MAX);
        table.extend((0..=255u8).map(|b| vec![b]));
        // placeholders so that learned entries start at 258
        table.push(Vec::new());
        table.push(Vec::new());
        Self {
            table,
            code_len: MIN_CODE_LEN,
            prev: None,
            early_change,
        }
    }

    fn clear_table(&mut self) {
        self.table.truncate(TABLE_BASE);
        self.code_len = MIN_CODE_LEN;
        self.prev = None;
    }

    fn decode_all(mut self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 2);
        let mut reader = BitReader::endian(data, BigEndian);
        loop {
            let code: u16 = match reader.read(self.code_len) {
                Ok(code) => code,
                // input exhausted mid-code ends the stream
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(e.into()),
            };
            match code {
                CLEAR => self.clear_table(),
                EOD => break,
                _ => self.process(code, &mut out)?,
            }
        }
        Ok(out)
    }

    fn process(&mut self, code: u16, out: &mut Vec<u8>) -> Result<()> {
        let idx = code as usize;
        let seq = match self.prev {
            // first code after start or clear must be a literal entry;
            // nothing is learned from it
            None => self
                .table
                .get(idx)
                .cloned()
                .ok_or_else(|| {
                    error!("lzw code {} has no dictionary entry", code);
                    Error::ValueOutOfRange
                })?,
            Some(prev) => {
                let prev_seq = self
                    .table
                    .get(prev as usize)
                    .cloned()
                    .ok_or(Error::ValueOutOfRange)?;
                let seq = if idx < self.table.len() {
                    self.table[idx].clone()
                } else if idx == self.table.len() {
                    // code for the entry about to be defined: previous
                    // sequence plus its own first byte
                    let first = *prev_seq.first().ok_or(Error::ValueOutOfRange)?;
                    let mut seq = prev_seq.clone();
                    seq.push(first);
                    seq
                } else {
                    error!("lzw code {} exceeds table size {}", code, self.table.len());
                    return Err(Error::ValueOutOfRange);
                };

                if self.table.len() < TABLE_MAX {
                    let first = *seq.first().ok_or(Error::ValueOutOfRange)?;
                    let mut entry = prev_seq;
                    entry.push(first);
                    self.table.push(entry);
                    self.widen_code();
                }
                seq
            }
        };

        out.extend_from_slice(&seq);
        self.prev = Some(code);
        Ok(())
    }

    /// Widen when the next code no longer fits: at 511/1023/2047 entries,
    /// or one entry later without early change.
    fn widen_code(&mut self) {
        let limit = (1usize << self.code_len) - usize::from(self.early_change);
        if self.table.len() >= limit && self.code_len < MAX_CODE_LEN {
            self.code_len += 1;
        }
    }
}
