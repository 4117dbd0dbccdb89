use crate::filter::{Error, Filter, ParamSource, Result, Sink};
use std::iter::repeat;

/// RunLengthDecode: decode only.
#[derive(Default)]
pub struct RunLengthFilter;

impl<'a> Filter<'a> for RunLengthFilter {
    fn begin_encode(&mut self, _sink: &'a mut dyn Sink) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn encode_block(&mut self, _buf: &[u8]) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn end_encode(&mut self) -> Result<()> {
        Err(Error::Unsupported)
    }

    fn decode(&self, buf: &[u8], _params: Option<&dyn ParamSource>) -> Result<Vec<u8>> {
        decode(buf)
    }
}

/// Control byte 0-127 copies the following `control + 1` bytes, 129-255
/// repeats the following byte `257 - control` times, 128 is end of data.
/// A run truncated by end of input is `ValueOutOfRange`.
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    let mut pos = 0;

    while pos < data.len() {
        let control = data[pos];
        pos += 1;

        if control == 128 {
            // EOD, even if input remains
            break;
        } else if control < 128 {
            let len = control as usize + 1;
            let literal = data
                .get(pos..pos + len)
                .ok_or(Error::ValueOutOfRange)?;
            out.extend_from_slice(literal);
            pos += len;
        } else {
            let b = *data.get(pos).ok_or(Error::ValueOutOfRange)?;
            pos += 1;
            out.extend(repeat(b).take(257 - control as usize));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests;
