#![deny(clippy::dbg_macro)]
pub mod ascii85;
mod filter;
pub mod flate;
pub mod hex;
pub mod lzw;
mod predictor;
pub mod run_length;

pub use filter::{Error, Filter, ParamSource, Result, Sink};
