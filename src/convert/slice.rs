//! Slice-based conversion.

use std::borrow::Cow;

use thiserror::Error;

use crate::{
    decode::{Error, Transcoder},
    options::Options,
};

use super::is_binary;

/// A conversion of several records that failed partway through its input.
///
/// Every record decoded in full before the fault is kept in `output`, one
/// per line. The rendering of the failing record is dropped, so the output
/// is always whole lines.
#[derive(Debug, Error)]
#[error("{error} ({} bytes of complete records kept)", .output.len())]
pub struct PartialDecode {
    pub output: Vec<u8>,
    pub error: Error,
}

impl PartialDecode {
    /// The records kept, as text (lossily converted, should they not be
    /// UTF-8).
    pub fn into_text(self) -> String {
        into_text(self.output).into_owned()
    }
}

/// Decode every record in a buffer to JSON text, one record per line.
///
/// Input that is not binary is returned unchanged (lossily converted, should
/// it not be UTF-8).
///
/// On error, the records preceding the fault are still available from the
/// returned [`PartialDecode`].
pub fn decode_if_binary_to_string<'a>(
    input: &'a [u8],
    options: &Options,
) -> Result<Cow<'a, str>, PartialDecode> {
    if !is_binary(input) {
        return Ok(String::from_utf8_lossy(input));
    }

    Ok(into_text(transcode_all(input, options)?))
}

/// Decode a single item from a buffer to JSON text, without a trailing
/// newline.
///
/// Bytes after the first item are ignored. Input that is not binary is
/// returned unchanged (lossily converted, should it not be UTF-8).
pub fn decode_object_to_string<'a>(
    input: &'a [u8],
    options: &Options,
) -> Result<Cow<'a, str>, Error> {
    if !is_binary(input) {
        return Ok(String::from_utf8_lossy(input));
    }

    let mut t = Transcoder::new(input, Vec::with_capacity(input.len() * 2), options);
    t.decode_object()?;

    Ok(into_text(t.into_writer()))
}

/// Decode every record in a buffer to JSON text bytes, one record per line.
///
/// Input that is not binary is returned unchanged.
///
/// On error, the records preceding the fault are still available from the
/// returned [`PartialDecode`].
pub fn decode_if_binary_to_bytes<'a>(
    input: &'a [u8],
    options: &Options,
) -> Result<Cow<'a, [u8]>, PartialDecode> {
    if !is_binary(input) {
        return Ok(Cow::Borrowed(input));
    }

    Ok(Cow::Owned(transcode_all(input, options)?))
}

fn transcode_all(input: &[u8], options: &Options) -> Result<Vec<u8>, PartialDecode> {
    let mut t = Transcoder::new(input, Vec::with_capacity(input.len() * 2), options);
    let mut complete = 0;

    let error = loop {
        match t.has_more() {
            Ok(true) => {}
            Ok(false) => return Ok(t.into_writer()),
            Err(e) => break e,
        }

        if let Err(e) = t.decode_record() {
            break e;
        }

        complete = t.get_ref().len();
    };

    log::debug!(
        "failed to decode buffer at offset {}, keeping {complete} bytes of output: {error}",
        t.position()
    );

    let mut output = t.into_writer();
    output.truncate(complete);

    Err(PartialDecode { output, error })
}

/// Raw byte strings and embedded JSON are copied without validation, so the
/// output is not guaranteed to be UTF-8.
fn into_text(out: Vec<u8>) -> Cow<'static, str> {
    match String::from_utf8(out) {
        Ok(s) => Cow::Owned(s),
        Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
    }
}
