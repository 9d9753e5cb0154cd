//! Convenience interfaces for common conversion patterns.
//!
//! The functions in this module classify their input before decoding. Binary
//! records always begin with a byte above `0x7F`, while JSON text and other
//! log output always begin with a printable ASCII byte. Input that is not
//! binary is handed back unchanged.

pub mod slice;
pub mod stream;
pub mod writer;

pub use slice::{
    PartialDecode, decode_if_binary_to_bytes, decode_if_binary_to_string, decode_object_to_string,
};
pub use stream::decode as decode_stream;
pub use writer::DecodingWriter;

/// Whether input should be decoded as binary records, judging only by its
/// first byte.
pub fn is_binary(input: &[u8]) -> bool {
    input.first().is_some_and(|&b| b > 0x7f)
}
