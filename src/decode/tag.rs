//! Decoder for tagged values.
//!
//! The set of understood tags is closed: epoch timestamps, network addresses
//! and prefixes, embedded JSON and hex strings. Any other tag is an error.

use std::{
    io::{BufRead, Write},
    net::{IpAddr, Ipv6Addr},
};

use chrono::{DateTime, Utc};

use super::{
    Error, Transcoder,
    header::{
        InitialByte, MajorType, TAG_EMBEDDED_JSON, TAG_HEX_STRING, TAG_NETWORK_ADDRESS,
        TAG_NETWORK_PREFIX, TAG_TIMESTAMP,
    },
    primitive::{decode_argument, decode_byte_string, decode_float, decode_integer, expect_major},
};

impl<R: BufRead, W: Write> Transcoder<'_, R, W> {
    /// Decode a tag and the value it annotates, writing its JSON rendering.
    pub(super) fn transcode_tag(&mut self) -> Result<(), Error> {
        let initial = expect_major(&mut self.c, MajorType::Tag)?;

        match decode_argument(&mut self.c, initial)? {
            TAG_TIMESTAMP => self.transcode_timestamp(),
            TAG_NETWORK_ADDRESS => self.transcode_network_address(),
            TAG_NETWORK_PREFIX => self.transcode_network_prefix(),
            TAG_EMBEDDED_JSON => {
                // Already JSON text; written as it is.
                let json = decode_byte_string(&mut self.c)?;
                self.o.write_all(&json)?;
                Ok(())
            }
            TAG_HEX_STRING => {
                let octets = decode_byte_string(&mut self.c)?;
                write!(self.o, "\"{}\"", hex::encode(octets))?;
                Ok(())
            }
            code => Err(Error::UnsupportedTagCode(code)),
        }
    }

    /// An integer timestamp is written at second granularity, a float one
    /// with its fractional part.
    fn transcode_timestamp(&mut self) -> Result<(), Error> {
        let options = self.options;

        let (instant, format) = match InitialByte::new(self.c.peek_byte()?).major {
            MajorType::UnsignedInt | MajorType::NegativeInt => {
                let secs = i64::try_from(decode_integer(&mut self.c)?)
                    .map_err(|_| Error::InvalidTimestampEncoding)?;
                (
                    DateTime::from_timestamp(secs, 0),
                    &options.integer_time_format,
                )
            }
            MajorType::SimpleOrFloat => {
                let secs = either::for_both!(decode_float(&mut self.c)?, f => f as f64);
                (from_float_secs(secs), &options.nano_time_format)
            }
            _ => Err(Error::InvalidTimestampEncoding)?,
        };

        let instant = instant
            .ok_or(Error::InvalidTimestampEncoding)?
            .with_timezone(&options.time_zone);

        self.o.write_all(b"\"")?;
        format.write(&mut self.o, &instant)?;
        self.o.write_all(b"\"")?;

        Ok(())
    }

    fn transcode_network_address(&mut self) -> Result<(), Error> {
        let octets = decode_byte_string(&mut self.c)?;

        if octets.len() == 6 {
            self.o.write_all(b"\"")?;
            for (i, b) in octets.iter().enumerate() {
                if i > 0 {
                    self.o.write_all(b":")?;
                }
                write!(self.o, "{b:02x}")?;
            }
            self.o.write_all(b"\"")?;

            return Ok(());
        }

        let addr = ip_addr(&octets).ok_or(Error::InvalidNetworkAddressLength(octets.len()))?;
        write!(self.o, "\"{addr}\"")?;

        Ok(())
    }

    /// A prefix is a one-entry map from the address octets to the prefix
    /// length, written in CIDR notation.
    fn transcode_network_prefix(&mut self) -> Result<(), Error> {
        if self.c.read_byte()? != MajorType::Map.with(1) {
            Err(Error::InvalidNetworkPrefixStructure)?;
        }

        let octets = decode_byte_string(&mut self.c)?;
        let prefix_len = decode_integer(&mut self.c)?;

        let addr = ip_addr(&octets).ok_or(Error::InvalidNetworkAddressLength(octets.len()))?;
        let bits = if octets.len() == 4 { 32 } else { 128 };

        let prefix_len = u8::try_from(prefix_len)
            .ok()
            .filter(|&l| l <= bits)
            .ok_or(Error::InvalidNetworkPrefixStructure)?;

        // Mapped IPv4 addresses are shown in IPv4 form, so the prefix is
        // measured within the last 32 bits.
        let prefix_len = match addr {
            IpAddr::V4(_) if bits == 128 => prefix_len.saturating_sub(96),
            _ => prefix_len,
        };

        write!(self.o, "\"{addr}/{prefix_len}\"")?;

        Ok(())
    }
}

/// An IPv4 or IPv6 address from its octets.
fn ip_addr(octets: &[u8]) -> Option<IpAddr> {
    if let Ok(v4) = <[u8; 4]>::try_from(octets) {
        return Some(IpAddr::from(v4));
    }

    let v6 = Ipv6Addr::from(<[u8; 16]>::try_from(octets).ok()?);

    Some(match v6.to_ipv4_mapped() {
        Some(v4) => IpAddr::V4(v4),
        None => IpAddr::V6(v6),
    })
}

/// Split fractional epoch seconds into an instant.
///
/// Whole seconds truncate toward zero; a negative fraction borrows a second.
fn from_float_secs(v: f64) -> Option<DateTime<Utc>> {
    if !v.is_finite() {
        return None;
    }

    let mut secs = v.trunc() as i64;
    let mut nanos = ((v - v.trunc()) * 1e9) as i64;

    if nanos < 0 {
        secs = secs.checked_sub(1)?;
        nanos += 1_000_000_000;
    }

    DateTime::from_timestamp(secs, nanos as u32)
}
