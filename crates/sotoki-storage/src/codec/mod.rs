//! Value and key codecs.
//!
//! - `value`: typed values to and from their ordered byte form
//! - `keys`: composite keys of the primary relation and the secondary index
//! - `error`: `DecodeError`

mod error;
mod keys;
mod value;

pub use error::DecodeError;
pub use keys::{IndexKey, IndexPrefix, PrimaryKey};
pub use value::{decode_row_value, encode_row_value, pack, unpack, PackedValue};
