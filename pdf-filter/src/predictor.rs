use crate::filter::{Error, ParamSource, Result};
use log::error;

/// Predictor configuration read from `DecodeParms`, shared by the Flate
/// and LZW decoders.
pub(crate) struct PredictorParams {
    pub predictor: i32,
    pub colors: i32,
    pub bits_per_component: i32,
    pub columns: i32,
    pub early_change: i32,
}

impl PredictorParams {
    pub fn new(d: &dyn ParamSource) -> Self {
        Self {
            predictor: d.get_int("Predictor", 1),
            colors: d.get_int("Colors", 1),
            bits_per_component: d.get_int("BitsPerComponent", 8),
            columns: d.get_int("Columns", 1),
            early_change: d.get_int("EarlyChange", 1),
        }
    }

    fn row_bytes(&self) -> usize {
        let bits =
            i64::from(self.columns) * i64::from(self.colors) * i64::from(self.bits_per_component);
        ((bits + 7) / 8).max(0) as usize
    }

    fn bytes_per_pixel(&self) -> usize {
        let bits = i64::from(self.colors) * i64::from(self.bits_per_component);
        ((bits + 7) / 8).max(1) as usize
    }
}

/// Restore data processed by a predictor. Predictor 1 passes through,
/// >= 10 is a png predictor with a per-row tag byte.
pub(crate) fn revert(buf: Vec<u8>, params: &PredictorParams) -> Result<Vec<u8>> {
    match params.predictor {
        1 => Ok(buf),
        10..=15 => png_predictor(&buf, params.row_bytes(), params.bytes_per_pixel()),
        p => {
            error!("unsupported predictor: {}", p);
            Err(Error::UnsupportedPredictor(p))
        }
    }
}

/// Paeth, returns a, b, or c, whichever is closest to a + b - c
fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let aa = i16::from(a);
    let bb = i16::from(b);
    let cc = i16::from(c);

    let p = aa + bb - cc;

    let da = (p - aa).abs();
    let db = (p - bb).abs();
    let dc = (p - cc).abs();

    if da <= db && da <= dc {
        a
    } else if db <= dc {
        b
    } else {
        c
    }
}

/// Each input row is a tag byte (0 None, 1 Sub, 2 Up, 3 Average, 4 Paeth)
/// followed by up to `row_bytes` filtered bytes. The previous reconstructed
/// row is zero-seeded; all additions are mod 256. A short final row is
/// reconstructed for the bytes present.
fn png_predictor(buf: &[u8], row_bytes: usize, bpp: usize) -> Result<Vec<u8>> {
    let mut prev = vec![0u8; row_bytes];
    let mut out = Vec::with_capacity(buf.len() / (row_bytes + 1) * row_bytes + row_bytes);

    for row in buf.chunks(row_bytes + 1) {
        let Some((&tag, raw)) = row.split_first() else {
            break;
        };
        let mut cur = vec![0u8; raw.len()];
        match tag {
            0 => cur.copy_from_slice(raw),
            1 => {
                // left
                for i in 0..raw.len() {
                    let left = if i >= bpp { cur[i - bpp] } else { 0 };
                    cur[i] = raw[i].wrapping_add(left);
                }
            }
            2 => {
                // up
                for (dest, (&up, &b)) in cur.iter_mut().zip(prev.iter().zip(raw)) {
                    *dest = b.wrapping_add(up);
                }
            }
            3 => {
                // average of left and up
                for i in 0..raw.len() {
                    let left = if i >= bpp { cur[i - bpp] } else { 0 };
                    let up = prev[i];
                    cur[i] = raw[i].wrapping_add(((u16::from(left) + u16::from(up)) / 2) as u8);
                }
            }
            4 => {
                // paeth of left, up and upper left
                for i in 0..raw.len() {
                    let (left, up_left) = if i >= bpp {
                        (cur[i - bpp], prev[i - bpp])
                    } else {
                        (0, 0)
                    };
                    cur[i] = raw[i].wrapping_add(paeth(left, prev[i], up_left));
                }
            }
            _ => {
                error!("unknown png predictor tag: {}", tag);
                return Err(Error::InvalidPredictor(tag));
            }
        }
        prev[..cur.len()].copy_from_slice(&cur);
        out.extend_from_slice(&cur);
    }
    Ok(out)
}
