//! Decoders for arrays and maps.
//!
//! Both recurse through [`Transcoder::decode_object`] for their elements and
//! accept either an explicit count or a break-terminated run.

use std::io::{BufRead, Write};

use super::{
    Error, Transcoder,
    header::{ADDITIONAL_INDEFINITE, BREAK, InitialByte, Length, MajorType},
    primitive::{decode_argument, expect_major},
};

impl<R: BufRead, W: Write> Transcoder<'_, R, W> {
    /// Decode an array, writing it as a JSON array.
    pub(super) fn transcode_array(&mut self) -> Result<(), Error> {
        let initial = expect_major(&mut self.c, MajorType::Array)?;
        let len = self.decode_length(initial)?;

        self.enter()?;
        self.o.write_all(b"[")?;

        match len {
            Length::Indefinite => loop {
                if self.take_break()? {
                    break;
                }

                self.decode_object()?;

                if self.c.peek_byte()? != BREAK {
                    self.o.write_all(b",")?;
                }
            },
            Length::Definite(n) => {
                for i in 0..n {
                    self.decode_object()?;

                    if i + 1 < n {
                        self.o.write_all(b",")?;
                    }
                }
            }
        }

        self.o.write_all(b"]")?;
        self.leave();

        Ok(())
    }

    /// Decode a map, writing it as a JSON object.
    ///
    /// Keys are written as whatever they decode to; the paired encoder only
    /// ever produces string keys.
    ///
    /// A definite length counts key/value pairs, so a header of `N` is
    /// followed by `2N` items.
    pub(super) fn transcode_map(&mut self) -> Result<(), Error> {
        let initial = expect_major(&mut self.c, MajorType::Map)?;
        let len = self.decode_length(initial)?;

        self.enter()?;
        self.o.write_all(b"{")?;

        match len {
            Length::Indefinite => {
                let mut i = 0u64;

                loop {
                    // A break is only accepted where a key would start.
                    if i % 2 == 0 && self.take_break()? {
                        break;
                    }

                    self.decode_object()?;

                    if i % 2 == 0 {
                        self.o.write_all(b":")?;
                    } else if self.c.peek_byte()? != BREAK {
                        self.o.write_all(b",")?;
                    }

                    i += 1;
                }
            }
            Length::Definite(pairs) => {
                let items = pairs.saturating_mul(2);

                for i in 0..items {
                    self.decode_object()?;

                    if i % 2 == 0 {
                        self.o.write_all(b":")?;
                    } else if i + 1 < items {
                        self.o.write_all(b",")?;
                    }
                }
            }
        }

        self.o.write_all(b"}")?;
        self.leave();

        Ok(())
    }

    fn decode_length(&mut self, initial: InitialByte) -> Result<Length, Error> {
        Ok(if initial.additional == ADDITIONAL_INDEFINITE {
            Length::Indefinite
        } else {
            Length::Definite(decode_argument(&mut self.c, initial)?)
        })
    }

    /// Consume a break byte if one is next.
    fn take_break(&mut self) -> Result<bool, Error> {
        if self.c.peek_byte()? == BREAK {
            self.c.read_byte()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn enter(&mut self) -> Result<(), Error> {
        if self.depth >= self.options.max_depth {
            Err(Error::DepthLimitExceeded {
                limit: self.options.max_depth,
            })?;
        }

        self.depth += 1;

        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}
