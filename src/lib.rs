//! bertlv is a codec for BER-TLV, the nested Tag-Length-Value encoding used
//! by ISO 7816 smart cards and EMV payment data.
//!
//! Bytes are parsed into a tree of [`Item`]s and item trees are serialized
//! back into bytes. Parsing is best-effort on request: [`parse_verbose`]
//! returns every item decoded before an error together with that error, so
//! truncated card responses can still be inspected.
//!
//! # Examples
//!
//! ```
//! use bertlv::{constructed_item, parse, primitive_item, serialize};
//!
//! let items = parse("E0089A02AABB9B02DDFF").unwrap();
//! assert_eq!(items.len(), 1);
//! assert_eq!(items[0].tag().to_string(), "E0");
//!
//! let built = constructed_item(
//!     "E0",
//!     [
//!         primitive_item("9A", "AABB").unwrap(),
//!         primitive_item("9B", "DDFF").unwrap(),
//!     ],
//! )
//! .unwrap();
//! assert_eq!(built, items[0]);
//! assert_eq!(
//!     serialize(&built).unwrap(),
//!     vec![0xE0, 0x08, 0x9A, 0x02, 0xAA, 0xBB, 0x9B, 0x02, 0xDD, 0xFF]
//! );
//! ```

mod buf;
mod error;
pub mod hex;
mod item;
mod parse;
mod traits;
mod types;
mod write;

pub use crate::buf::ByteCursor;
pub use crate::error::{
    InputError, InputErrorKind, InputResult, LengthError, ParseError, ParseErrorKind,
    ParseResult, ReadKind, WriteError, WriteErrorKind, WriteResult,
};
pub use crate::item::{Input, Item, constructed_item, primitive_item};
pub use crate::parse::{
    DEFAULT_MAX_DEPTH, ParseOptions, ParseOutcome, Parser, parse, parse_verbose,
    parse_verbose_with, parse_with,
};
pub use crate::traits::ToTlv;
pub use crate::types::{
    MAX_LENGTH, Tag, TagClass, TagType, decode_length, encode_length, write_length,
};
pub use crate::write::{serialize, serialize_item, serialize_items};
