//! Decoders for integers, floats, simple values and strings.
//!
//! Each decoder consumes exactly one item from the cursor, starting at its
//! leading byte, and fails on the first byte it cannot accept.

use std::io::{BufRead, Write};

use either::Either::{self, Left, Right};
use zerocopy::byteorder::big_endian;

use super::{
    Error,
    cursor::Cursor,
    header::{
        ADDITIONAL_UINT8, ADDITIONAL_UINT16, ADDITIONAL_UINT32, ADDITIONAL_UINT64, FLOAT16,
        FLOAT32, FLOAT32_NAN, FLOAT32_NEG_INFINITY, FLOAT32_POS_INFINITY, FLOAT64, FLOAT64_NAN,
        FLOAT64_NEG_INFINITY, FLOAT64_POS_INFINITY, InitialByte, MAX_IMMEDIATE, MajorType,
        SIMPLE_FALSE, SIMPLE_NULL, SIMPLE_TRUE,
    },
};

/// Decode the value carried by a leading byte's additional info, reading its
/// big-endian extension if there is one.
pub fn decode_argument<R: BufRead>(c: &mut Cursor<R>, initial: InitialByte) -> Result<u64, Error> {
    let value = match initial.additional {
        a if a <= MAX_IMMEDIATE => a as u64,
        ADDITIONAL_UINT8 => c.read_byte()? as u64,
        ADDITIONAL_UINT16 => {
            let r = c.read_array::<2>()?;
            let v: big_endian::U16 = zerocopy::transmute!(r);
            v.get() as u64
        }
        ADDITIONAL_UINT32 => {
            let r = c.read_array::<4>()?;
            let v: big_endian::U32 = zerocopy::transmute!(r);
            v.get() as u64
        }
        ADDITIONAL_UINT64 => {
            let r = c.read_array::<8>()?;
            let v: big_endian::U64 = zerocopy::transmute!(r);
            v.get()
        }
        additional => Err(Error::UnsupportedAdditionalType {
            major: initial.major,
            additional,
        })?,
    };

    Ok(value)
}

/// Read a leading byte, failing unless it has the expected major type.
pub fn expect_major<R: BufRead>(
    c: &mut Cursor<R>,
    expected: MajorType,
) -> Result<InitialByte, Error> {
    let initial = InitialByte::new(c.read_byte()?);

    if initial.major != expected {
        Err(Error::InvalidMajorType {
            found: initial.major,
            expected: describe(expected),
        })?;
    }

    Ok(initial)
}

fn describe(major: MajorType) -> &'static str {
    match major {
        MajorType::UnsignedInt | MajorType::NegativeInt => "an integer",
        MajorType::ByteString => "a byte string",
        MajorType::Utf8String => "a UTF-8 string",
        MajorType::Array => "an array",
        MajorType::Map => "a map",
        MajorType::Tag => "a tag",
        MajorType::SimpleOrFloat => "a simple value or float",
    }
}

/// Decode a signed or unsigned integer.
///
/// The result covers the full encodable range, `-2^64..2^64`.
pub fn decode_integer<R: BufRead>(c: &mut Cursor<R>) -> Result<i128, Error> {
    let initial = InitialByte::new(c.read_byte()?);

    let negative = match initial.major {
        MajorType::UnsignedInt => false,
        MajorType::NegativeInt => true,
        found => Err(Error::InvalidMajorType {
            found,
            expected: "an integer",
        })?,
    };

    let value = decode_argument(c, initial)? as i128;

    Ok(if negative { -1 - value } else { value })
}

/// Decode a 32- or 64-bit float, keeping its width.
pub fn decode_float<R: BufRead>(c: &mut Cursor<R>) -> Result<Either<f32, f64>, Error> {
    let initial = expect_major(c, MajorType::SimpleOrFloat)?;

    match initial.additional {
        FLOAT32 => {
            let r = c.read_array::<4>()?;
            Ok(Left(match r {
                FLOAT32_NAN => f32::NAN,
                FLOAT32_POS_INFINITY => f32::INFINITY,
                FLOAT32_NEG_INFINITY => f32::NEG_INFINITY,
                _ => {
                    let v: big_endian::F32 = zerocopy::transmute!(r);
                    v.get()
                }
            }))
        }
        FLOAT64 => {
            let r = c.read_array::<8>()?;
            Ok(Right(match r {
                FLOAT64_NAN => f64::NAN,
                FLOAT64_POS_INFINITY => f64::INFINITY,
                FLOAT64_NEG_INFINITY => f64::NEG_INFINITY,
                _ => {
                    let v: big_endian::F64 = zerocopy::transmute!(r);
                    v.get()
                }
            }))
        }
        // Half precision is never produced by the paired encoder.
        additional => Err(Error::UnsupportedAdditionalType {
            major: MajorType::SimpleOrFloat,
            additional,
        }),
    }
}

/// Write a float as the shortest decimal that reads back at its own width.
///
/// Non-finite values have no JSON literal and are written as the quoted
/// strings `"NaN"`, `"+Inf"` and `"-Inf"`.
pub fn write_float(o: &mut impl Write, v: Either<f32, f64>) -> Result<(), Error> {
    let (nan, infinite, positive) = either::for_both!(v, f => {
        (f.is_nan(), f.is_infinite(), f.is_sign_positive())
    });

    match (nan, infinite, positive) {
        (true, _, _) => o.write_all(b"\"NaN\"")?,
        (_, true, true) => o.write_all(b"\"+Inf\"")?,
        (_, true, false) => o.write_all(b"\"-Inf\"")?,
        // `Display` for floats never switches to exponent notation.
        _ => either::for_both!(v, f => write!(o, "{f}"))?,
    }

    Ok(())
}

/// Decode and write a boolean, null or float.
pub fn transcode_simple<R: BufRead>(c: &mut Cursor<R>, o: &mut impl Write) -> Result<(), Error> {
    let initial = expect_major(c, MajorType::SimpleOrFloat)?;

    match initial.additional {
        SIMPLE_FALSE => o.write_all(b"false")?,
        SIMPLE_TRUE => o.write_all(b"true")?,
        SIMPLE_NULL => o.write_all(b"null")?,
        FLOAT16 | FLOAT32 | FLOAT64 => {
            c.unread_byte();
            write_float(o, decode_float(c)?)?;
        }
        additional => Err(Error::UnsupportedAdditionalType {
            major: MajorType::SimpleOrFloat,
            additional,
        })?,
    }

    Ok(())
}

/// Decode a byte string, returning its raw payload.
pub fn decode_byte_string<R: BufRead>(c: &mut Cursor<R>) -> Result<Vec<u8>, Error> {
    let initial = expect_major(c, MajorType::ByteString)?;
    let len = decode_argument(c, initial)?;
    c.read_n(len)
}

/// Decode a UTF-8 string, returning its raw (unvalidated) payload.
pub fn decode_utf8_string<R: BufRead>(c: &mut Cursor<R>) -> Result<Vec<u8>, Error> {
    let initial = expect_major(c, MajorType::Utf8String)?;
    let len = decode_argument(c, initial)?;
    c.read_n(len)
}

/// Write bytes as a quoted JSON string, escaping as needed.
///
/// Printable ASCII other than `"` and `\` is copied verbatim. Anything after
/// the first byte needing attention goes through [`write_escaped_tail`].
pub fn write_json_string(o: &mut impl Write, s: &[u8]) -> Result<(), Error> {
    o.write_all(b"\"")?;

    match s.iter().position(|&b| needs_escape(b)) {
        None => o.write_all(s)?,
        Some(i) => {
            o.write_all(&s[..i])?;
            write_escaped_tail(o, &s[i..])?;
        }
    }

    o.write_all(b"\"")?;

    Ok(())
}

fn needs_escape(b: u8) -> bool {
    !(0x20..=0x7e).contains(&b) || b == b'"' || b == b'\\'
}

/// Escape a byte sequence rune by rune.
///
/// Each byte of an invalid UTF-8 sequence becomes one `\ufffd`, matching an
/// encoder that decodes runes and advances a single byte past each invalid
/// one.
fn write_escaped_tail(o: &mut impl Write, s: &[u8]) -> Result<(), Error> {
    for chunk in s.utf8_chunks() {
        let valid = chunk.valid().as_bytes();
        let mut start = 0;

        for (i, &b) in valid.iter().enumerate() {
            // Multi-byte runes are copied as they are.
            if b >= 0x80 || !needs_escape(b) {
                continue;
            }

            o.write_all(&valid[start..i])?;

            match b {
                b'"' | b'\\' => o.write_all(&[b'\\', b])?,
                0x08 => o.write_all(b"\\b")?,
                0x0c => o.write_all(b"\\f")?,
                b'\n' => o.write_all(b"\\n")?,
                b'\r' => o.write_all(b"\\r")?,
                b'\t' => o.write_all(b"\\t")?,
                _ => write!(o, "\\u00{b:02x}")?,
            }

            start = i + 1;
        }

        o.write_all(&valid[start..])?;

        for _ in chunk.invalid() {
            o.write_all(b"\\ufffd")?;
        }
    }

    Ok(())
}
