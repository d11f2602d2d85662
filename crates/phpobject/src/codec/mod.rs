//! Text encoding/decoding for the serialize format.
//!
//! Every value starts with a one-byte type tag; strings, arrays and objects
//! carry explicit lengths, so no schema is needed to decode.

pub mod document;
pub mod object;
pub mod primitives;
pub mod value;

pub use document::{
    serialize, serialize_to, unserialize, unserialize_from, unserialize_from_with_options,
    unserialize_with_options, DecodeOptions,
};
pub use object::demangle;
pub use primitives::{IoReader, Reader, Source, Writer};
pub use value::{decode_value, encode_value};
