//! A streaming transcoder from binary structured-log records to JSON text.
//!
//! For throughput, log records can be written in a compact binary format (a
//! subset of CBOR) rather than as JSON. Cborlog turns those records back into
//! the JSON text a JSON encoder would have produced directly, in a single pass
//! and without building a document tree, so memory use is bounded by nesting
//! depth rather than record size.
//!
//! Most users should begin with the functions in the [`convert`] module, which
//! pass text input through untouched and decode binary input. The decoder
//! itself is exposed in the [`decode`] module, and its behaviour (timestamp
//! rendering, nesting limit) is configured with [`Options`].
//!
//! ```
//! let record = [0xbf, 0x61, b'a', 0x64, b't', b'e', b's', b't', 0xff];
//! let options = cborlog::Options::default();
//! let text = cborlog::decode_object_to_string(&record, &options)?;
//! assert_eq!(text, r#"{"a":"test"}"#);
//! ```
//!
//! ## Supported encoding
//!
//! Only what the paired encoder produces is understood: integers, 32- and
//! 64-bit floats, booleans, null, byte and UTF-8 strings, definite and
//! indefinite arrays and maps, and six tags (integer and float timestamps,
//! network addresses and prefixes, embedded JSON and hex strings). Anything
//! else is an error rather than skipped.

pub mod convert;
pub mod decode;
pub mod options;

pub use convert::{
    PartialDecode, decode_if_binary_to_bytes, decode_if_binary_to_string, decode_object_to_string,
    decode_stream,
};
pub use decode::Error;
pub use options::{Options, TimeFormat};
