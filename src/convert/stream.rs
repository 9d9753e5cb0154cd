//! Reader-based conversion.

use std::io::{BufReader, Read, Write};

use crate::{
    decode::{Error, Transcoder},
    options::Options,
};

/// Decode every record read from `src`, writing each as a line of JSON to
/// `dst`.
///
/// The input is not classified first; it must be binary. Decoding stops
/// cleanly at the end of the input.
///
/// On error, every record decoded before the fault has already been written
/// to `dst`, followed by whatever part of the failing record was rendered.
///
/// This method is also re-exported as `cborlog::convert::decode_stream`.
pub fn decode(src: impl Read, dst: impl Write, options: &Options) -> Result<(), Error> {
    Transcoder::new(BufReader::new(src), dst, options).decode_all()
}
