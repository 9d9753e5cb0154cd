//! Writer adapter converting binary records on their way to a text sink.

use std::io::{self, ErrorKind, Write};

use crate::{decode::Error, options::Options};

use super::slice::{PartialDecode, decode_if_binary_to_bytes};

/// Wraps a text sink (a console, file or syslog writer), converting each
/// binary buffer written to it into JSON lines. Text buffers pass through
/// untouched.
///
/// Every call to `write` must carry whole records, as log writers hand them
/// over. When a buffer fails to decode, the records preceding the fault are
/// still forwarded, and the write then fails with an
/// [`ErrorKind::InvalidData`] error wrapping the decode [`Error`].
#[derive(Debug)]
pub struct DecodingWriter<W> {
    inner: W,
    options: Options,
}

impl<W: Write> DecodingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self::with_options(inner, Options::default())
    }

    pub fn with_options(inner: W, options: Options) -> Self {
        Self { inner, options }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for DecodingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match decode_if_binary_to_bytes(buf, &self.options) {
            Ok(text) => {
                self.inner.write_all(&text)?;
                Ok(buf.len())
            }
            Err(PartialDecode { output, error }) => {
                log::warn!(
                    "undecodable {}-byte log buffer, forwarding {} bytes of complete records: {error}",
                    buf.len(),
                    output.len()
                );

                self.inner.write_all(&output)?;

                Err(match error {
                    Error::Io(e) => e,
                    e => io::Error::new(ErrorKind::InvalidData, e),
                })
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
