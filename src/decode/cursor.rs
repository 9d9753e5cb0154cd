//! Buffered, forward-only reading over an input source.

use std::io::{self, BufRead, ErrorKind, Read};

use super::Error;

/// A forward-only reader able to give back the last byte it read.
///
/// All reads are all-or-nothing: a read that runs out of input fails with
/// [`Error::EndOfInput`] and never returns a partial result.
#[derive(Debug)]
pub struct Cursor<R> {
    inner: R,
    last: Option<u8>,
    unread: bool,
    position: u64,
}

impl<R: BufRead> Cursor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            last: None,
            unread: false,
            position: 0,
        }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read a single byte.
    pub fn read_byte(&mut self) -> Result<u8, Error> {
        if self.unread {
            self.unread = false;
            self.position += 1;
            return Ok(self.given_back());
        }

        let b = self.peek_inner()?.ok_or(Error::EndOfInput)?;
        self.inner.consume(1);
        self.last = Some(b);
        self.position += 1;

        Ok(b)
    }

    /// Read exactly `N` bytes.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut buf = [0; N];
        let mut filled = 0;

        if N > 0 && self.unread {
            buf[0] = self.read_byte()?;
            filled = 1;
        }

        match self.inner.read_exact(&mut buf[filled..]) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(Error::EndOfInput)?,
            Err(e) => Err(e)?,
        }

        self.position += (N - filled) as u64;
        if N > 0 {
            self.last = Some(buf[N - 1]);
        }

        Ok(buf)
    }

    /// Read exactly `n` bytes.
    ///
    /// The buffer grows with the bytes actually available, so an announced
    /// length far beyond the end of the input fails without allocating it.
    pub fn read_n(&mut self, n: u64) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        let mut remaining = n;

        if remaining > 0 && self.unread {
            buf.push(self.read_byte()?);
            remaining -= 1;
        }

        let got = (&mut self.inner).take(remaining).read_to_end(&mut buf)? as u64;
        self.position += got;

        if got < remaining {
            Err(Error::EndOfInput)?;
        }

        if let Some(&b) = buf.last() {
            self.last = Some(b);
        }

        Ok(buf)
    }

    /// Look at the next byte without consuming it.
    pub fn peek_byte(&mut self) -> Result<u8, Error> {
        if self.unread {
            return Ok(self.given_back());
        }

        self.peek_inner()?.ok_or(Error::EndOfInput)
    }

    /// Whether at least one more byte can be read.
    pub fn has_more(&mut self) -> Result<bool, Error> {
        Ok(self.unread || self.peek_inner()?.is_some())
    }

    /// Push the last byte read back onto the input.
    ///
    /// # Panics
    ///
    /// Panics if no byte has been read yet, or if the last byte was already
    /// given back. Either is a defect in the decoder, not in its input.
    pub fn unread_byte(&mut self) {
        assert!(
            self.last.is_some() && !self.unread,
            "cursor can only give back the single byte it last read"
        );

        self.unread = true;
        self.position -= 1;
    }

    fn given_back(&self) -> u8 {
        match self.last {
            Some(b) => b,
            None => unreachable!("a byte was given back before any was read"),
        }
    }

    fn peek_inner(&mut self) -> io::Result<Option<u8>> {
        loop {
            match self.inner.fill_buf() {
                Ok(buf) => return Ok(buf.first().copied()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
