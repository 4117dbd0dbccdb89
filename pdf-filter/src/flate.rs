use crate::{
    filter::{Error, Filter, ParamSource, Result, Sink, ENCODE_ACTIVE, ENCODE_INACTIVE},
    predictor::{self, PredictorParams},
};
use flate2::{
    bufread::{DeflateDecoder, ZlibDecoder},
    Compress, Compression, FlushCompress, Status,
};
use log::error;
use std::io::Read;

const CHUNK: usize = 16384;

/// FlateDecode: streaming zlib compression, one-shot inflate with
/// optional predictor reversal.
#[derive(Default)]
pub struct FlateFilter<'a> {
    output: Option<&'a mut dyn Sink>,
    compress: Option<Compress>,
    chunk: Vec<u8>,
}

impl FlateFilter<'_> {
    /// Feed `buf` through the compressor, forwarding every staged chunk to
    /// the sink, looping while the staging buffer fills completely.
    fn drive(&mut self, mut buf: &[u8], flush: FlushCompress) -> Result<()> {
        let Self {
            output,
            compress,
            chunk,
        } = self;
        let sink = output.as_deref_mut().ok_or(Error::InvalidState(ENCODE_INACTIVE))?;
        let compress = compress.as_mut().ok_or(Error::InvalidState(ENCODE_INACTIVE))?;

        loop {
            let in_before = compress.total_in();
            let out_before = compress.total_out();
            let status = compress
                .compress(buf, chunk, flush)
                .map_err(|e| Error::Decompress(e.to_string()))?;
            let consumed = (compress.total_in() - in_before) as usize;
            let produced = (compress.total_out() - out_before) as usize;
            buf = &buf[consumed..];
            sink.write(&chunk[..produced])?;

            match status {
                Status::StreamEnd => break,
                _ if buf.is_empty() && produced < chunk.len() => break,
                Status::BufError => {
                    error!("deflate made no progress");
                    return Err(Error::Decompress("deflate made no progress".into()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.output = None;
        self.compress = None;
        self.chunk = Vec::new();
    }
}

impl<'a> Filter<'a> for FlateFilter<'a> {
    fn begin_encode(&mut self, sink: &'a mut dyn Sink) -> Result<()> {
        if self.output.is_some() {
            return Err(Error::InvalidState(ENCODE_ACTIVE));
        }
        self.compress = Some(Compress::new(Compression::default(), true));
        self.chunk = vec![0; CHUNK];
        self.output = Some(sink);
        Ok(())
    }

    fn encode_block(&mut self, buf: &[u8]) -> Result<()> {
        if self.output.is_none() {
            return Err(Error::InvalidState(ENCODE_INACTIVE));
        }
        let r = self.drive(buf, FlushCompress::None);
        if r.is_err() {
            self.reset();
        }
        r
    }

    fn end_encode(&mut self) -> Result<()> {
        if self.output.is_none() {
            return Err(Error::InvalidState(ENCODE_INACTIVE));
        }
        let r = self.drive(&[], FlushCompress::Finish);
        self.reset();
        r
    }

    fn decode(&self, buf: &[u8], params: Option<&dyn ParamSource>) -> Result<Vec<u8>> {
        decode(buf, params)
    }
}

/// Inflate the whole input; zlib first, raw deflate as fallback. With
/// params present the result passes through predictor reversal.
pub fn decode(data: &[u8], params: Option<&dyn ParamSource>) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len() * 2);
    if let Err(zlib_err) = ZlibDecoder::new(data).read_to_end(&mut out) {
        out.clear();
        DeflateDecoder::new(data).read_to_end(&mut out).map_err(|e| {
            error!("flate decode failed: {} (zlib), {} (raw)", zlib_err, e);
            Error::Decompress(e.to_string())
        })?;
    }

    match params {
        Some(p) => predictor::revert(out, &PredictorParams::new(p)),
        None => Ok(out),
    }
}

#[cfg(test)]
mod tests;
