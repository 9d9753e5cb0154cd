//! Single-pass transcoder from the binary record format to JSON text.
//!
//! This module exposes the decoder's internals for applications that need to
//! drive it directly. See [`crate::convert`] for the usual entry points.
//!
//! # Architecture
//!
//! Decoding is recursive descent over a [`Cursor`]: the dispatcher in
//! [`Transcoder::decode_object`] peeks at the next leading byte and hands the
//! item to the decoder for its major type, which consumes it and writes its
//! JSON rendering straight to the output sink. Arrays and maps recurse back
//! through the dispatcher for their elements. No document tree is built; the
//! only state retained is the nesting depth.
//!
//! # Errors
//!
//! Bad input surfaces as an [`Error`] from the first decoder to reject a byte,
//! with no attempt to recover the rest of the item. Whatever was written to
//! the sink before that point stays there.
//!
//! A defect in the decoder itself, as opposed to its input, panics instead.

pub mod composite;
pub mod cursor;
pub mod header;
pub mod primitive;
pub mod tag;

use std::io::{BufRead, Write};

use thiserror::Error;

use crate::options::Options;

use self::{
    cursor::Cursor,
    header::{InitialByte, MajorType},
    primitive::{
        decode_byte_string, decode_integer, decode_utf8_string, transcode_simple,
        write_json_string,
    },
};

/// Errors occurring while transcoding.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied input source or output sink.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Unexpectedly reached the end of the input.
    #[error("Unexpectedly reached the end of the input.")]
    EndOfInput,
    /// Found an item of the wrong major type.
    #[error("Found {found:?} where {expected} was expected.")]
    InvalidMajorType {
        found: MajorType,
        expected: &'static str,
    },
    /// Found additional info with no meaning for its major type.
    #[error("Unsupported additional info ({additional}) for {major:?}.")]
    UnsupportedAdditionalType { major: MajorType, additional: u8 },
    /// Found a tag outside the supported set.
    #[error("Unsupported tag code ({0}).")]
    UnsupportedTagCode(u64),
    /// Found a network address of a length other than 4, 6 or 16 bytes.
    #[error("Unexpected network address length ({0}, expected 4, 6 or 16).")]
    InvalidNetworkAddressLength(usize),
    /// Found a timestamp that is not a representable integer or float.
    #[error("Timestamp is neither a representable integer nor float.")]
    InvalidTimestampEncoding,
    /// Found a network prefix that is not a one-entry map of address to
    /// prefix length.
    #[error("Network prefix is not a one-entry map of address to prefix length.")]
    InvalidNetworkPrefixStructure,
    /// Arrays and maps are nested deeper than allowed.
    #[error("Arrays and maps are nested deeper than {limit}.")]
    DepthLimitExceeded { limit: usize },
}

impl Error {
    /// Whether this error was caused by the input bytes, rather than by the
    /// input source or output sink failing.
    pub fn is_malformed_input(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

/// Decoder state for one input: a cursor, an output sink, options and the
/// current nesting depth.
///
/// A transcoder must not be reused after it returns an error; the cursor is
/// left partway through the failed item.
#[derive(Debug)]
pub struct Transcoder<'a, R, W> {
    c: Cursor<R>,
    o: W,
    options: &'a Options,
    depth: usize,
}

impl<'a, R: BufRead, W: Write> Transcoder<'a, R, W> {
    pub fn new(r: R, o: W, options: &'a Options) -> Self {
        Self {
            c: Cursor::new(r),
            o,
            options,
            depth: 0,
        }
    }

    /// Number of input bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.c.position()
    }

    pub fn get_ref(&self) -> &W {
        &self.o
    }

    pub fn into_writer(self) -> W {
        self.o
    }

    /// Whether any input remains.
    pub fn has_more(&mut self) -> Result<bool, Error> {
        self.c.has_more()
    }

    /// Decode one item and write it as JSON.
    pub fn decode_object(&mut self) -> Result<(), Error> {
        match InitialByte::new(self.c.peek_byte()?).major {
            MajorType::UnsignedInt | MajorType::NegativeInt => {
                let n = decode_integer(&mut self.c)?;
                write!(self.o, "{n}")?;
            }
            MajorType::ByteString => {
                let s = decode_byte_string(&mut self.c)?;
                self.o.write_all(b"\"")?;
                self.o.write_all(&s)?;
                self.o.write_all(b"\"")?;
            }
            MajorType::Utf8String => {
                let s = decode_utf8_string(&mut self.c)?;
                write_json_string(&mut self.o, &s)?;
            }
            MajorType::Array => self.transcode_array()?,
            MajorType::Map => self.transcode_map()?,
            MajorType::Tag => self.transcode_tag()?,
            MajorType::SimpleOrFloat => transcode_simple(&mut self.c, &mut self.o)?,
        }

        Ok(())
    }

    /// Decode one item as a record, followed by a newline.
    pub fn decode_record(&mut self) -> Result<(), Error> {
        self.decode_object()?;
        self.o.write_all(b"\n")?;

        Ok(())
    }

    /// Decode items until the input is exhausted, writing a newline after
    /// each.
    ///
    /// On error, the records already decoded remain in the sink, along with
    /// the partial rendering of the one that failed.
    pub fn decode_all(&mut self) -> Result<(), Error> {
        let mut records = 0u64;

        while self.c.has_more()? {
            let start = self.position();

            if let Err(e) = self.decode_record() {
                log::debug!(
                    "failed to decode record {records} at offset {} (record began at {start}): {e}",
                    self.position()
                );
                return Err(e);
            }

            records += 1;

            log::trace!("decoded record {records} spanning bytes {start}..{}", self.position());
        }

        Ok(())
    }
}
