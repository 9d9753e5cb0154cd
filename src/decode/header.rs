//! Leading bytes, major types and the constants of the wire format.

use tartan_bitfield::bitfield;

/// Additional info values at or below this are immediate.
pub const MAX_IMMEDIATE: u8 = 23;

/// Additional info selecting a 1-byte extension.
pub const ADDITIONAL_UINT8: u8 = 24;
/// Additional info selecting a 2-byte extension.
pub const ADDITIONAL_UINT16: u8 = 25;
/// Additional info selecting a 4-byte extension.
pub const ADDITIONAL_UINT32: u8 = 26;
/// Additional info selecting an 8-byte extension.
pub const ADDITIONAL_UINT64: u8 = 27;
/// Additional info marking an indefinite-length array or map.
pub const ADDITIONAL_INDEFINITE: u8 = 31;

pub const SIMPLE_FALSE: u8 = 20;
pub const SIMPLE_TRUE: u8 = 21;
pub const SIMPLE_NULL: u8 = 22;
pub const FLOAT16: u8 = 25;
pub const FLOAT32: u8 = 26;
pub const FLOAT64: u8 = 27;

/// The byte terminating an indefinite-length array or map.
pub const BREAK: u8 = 0xff;

/// Tag code (immediate) of an epoch timestamp.
pub const TAG_TIMESTAMP: u64 = 1;
/// Tag code of a MAC, IPv4 or IPv6 address.
pub const TAG_NETWORK_ADDRESS: u64 = 260;
/// Tag code of an IPv4 or IPv6 prefix.
pub const TAG_NETWORK_PREFIX: u64 = 261;
/// Tag code of a byte string holding JSON text.
pub const TAG_EMBEDDED_JSON: u64 = 262;
/// Tag code of a byte string rendered as hex.
pub const TAG_HEX_STRING: u64 = 263;

/// Canonical encodings of the non-finite floats.
pub const FLOAT32_NAN: [u8; 4] = [0x7f, 0xc0, 0x00, 0x00];
pub const FLOAT32_POS_INFINITY: [u8; 4] = [0x7f, 0x80, 0x00, 0x00];
pub const FLOAT32_NEG_INFINITY: [u8; 4] = [0xff, 0x80, 0x00, 0x00];
pub const FLOAT64_NAN: [u8; 8] = [0x7f, 0xf8, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
pub const FLOAT64_POS_INFINITY: [u8; 8] = [0x7f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
pub const FLOAT64_NEG_INFINITY: [u8; 8] = [0xff, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// The category of an encoded item, held in the top three bits of its leading
/// byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorType {
    UnsignedInt,
    NegativeInt,
    ByteString,
    Utf8String,
    Array,
    Map,
    Tag,
    SimpleOrFloat,
}

impl MajorType {
    /// The leading byte of an item of this type with the given additional
    /// info.
    pub const fn with(self, additional: u8) -> u8 {
        (self as u8) << 5 | (additional & 0x1f)
    }
}

/// A leading byte split into its major type and additional info.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialByte {
    pub major: MajorType,
    pub additional: u8,
}

impl InitialByte {
    /// Split a leading byte.
    pub fn new(r: u8) -> Self {
        bitfield! {
            struct Split(u8) {
                [0..5] additional: u8,
                [5..8] major: u8,
            }
        }

        let split = Split(r);

        let major = match split.major() {
            0 => MajorType::UnsignedInt,
            1 => MajorType::NegativeInt,
            2 => MajorType::ByteString,
            3 => MajorType::Utf8String,
            4 => MajorType::Array,
            5 => MajorType::Map,
            6 => MajorType::Tag,
            7 => MajorType::SimpleOrFloat,
            m => unreachable!("a three-bit field held {m}"),
        };

        Self {
            major,
            additional: split.additional(),
        }
    }
}

/// The length announced by an array or map header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Definite(u64),
    /// Terminated by [`BREAK`].
    Indefinite,
}
