use thiserror::Error;

use crate::item::Item;
use crate::types::{MAX_LENGTH, Tag, TagType};

/// Specific kinds of errors that can occur when normalizing caller-supplied
/// tags, values and hex input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputErrorKind {
    #[error("tag is empty")]
    TagEmpty,

    #[error("tag hex string has an odd number of characters: {0}")]
    TagUnevenBytes(usize),

    #[error("tag contains a non-hex character: {0:?}")]
    TagContainsNonHex(char),

    #[error("hex data has an odd number of characters: {0}")]
    DataUnevenBytes(usize),

    #[error("hex data contains a non-hex character: {0:?}")]
    DataContainsNonHex(char),

    #[error("tag {tag} is not {expected:?}")]
    TypeMismatch { tag: Tag, expected: TagType },

    #[error("tag {0} starts with the 00 padding byte")]
    TagStartsWithPadding(Tag),
}

/// Error type returned when building items from caller input fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("input error: {kind}")]
pub struct InputError {
    kind: InputErrorKind,
}

impl InputError {
    /// Creates a new InputError with the given kind.
    pub const fn new(kind: InputErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the specific kind of input error that occurred.
    pub fn kind(&self) -> &InputErrorKind {
        &self.kind
    }
}

/// Result type for item construction.
pub type InputResult<T> = Result<T, InputError>;

/// Which cursor read ran out of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadKind {
    U8,
    U16,
    U24,
    U32,
    Buffer,
}

/// Failures of the context-free length decoder. The parser lifts these into
/// [`ParseErrorKind`] variants that name the tag being decoded.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthError {
    #[error("length field is missing {missing} bytes")]
    Insufficient { missing: usize },

    #[error("length field declares {given} length bytes (at most 4 supported)")]
    TooBig { given: usize },
}

/// Specific kinds of parsing errors that can occur when decoding BER-TLV
/// data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("insufficient data for {kind:?} read: missing {missing} bytes")]
    InsufficientData { kind: ReadKind, missing: usize },

    #[error("data ends inside a tag: {}", crate::hex::encode(.partial))]
    InsufficientTagData { partial: Vec<u8> },

    #[error("data ends inside the length of tag {tag}: missing {missing} bytes")]
    InsufficientLengthData { tag: Tag, missing: usize },

    #[error("length of tag {tag} uses {given} bytes (at most 4 supported)")]
    LengthTooBig { tag: Tag, given: usize },

    #[error("value of tag {tag} is truncated: missing {missing} bytes")]
    InsufficientValueData { tag: Tag, missing: usize },

    #[error("constructed tag {tag} is nested deeper than {max_depth} levels")]
    NestingTooDeep { tag: Tag, max_depth: usize },

    #[error("invalid input: {0}")]
    InvalidInput(InputErrorKind),
}

/// Error type returned when parsing BER-TLV data fails.
///
/// Besides the kind of failure, a parse error carries the deepest item that
/// could be partially built before decoding stopped: a primitive item with a
/// truncated value, or a constructed item holding the children decoded so
/// far.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parse error: {kind}")]
pub struct ParseError {
    /// The specific kind of parse error that occurred.
    kind: ParseErrorKind,
    partial: Option<Box<Item>>,
}

impl ParseError {
    /// Creates a new ParseError with the given kind.
    pub const fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            partial: None,
        }
    }

    pub(crate) fn with_partial(mut self, item: Item) -> Self {
        self.partial = Some(Box::new(item));
        self
    }

    /// Returns the specific kind of parse error that occurred.
    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Returns the item that was being decoded when the error occurred, as
    /// far as it could be built.
    ///
    /// A truncated primitive value yields a primitive item holding the bytes
    /// that arrived. A truncated or failing constructed value does NOT yield
    /// a primitive item wrapping its raw bytes: it yields a constructed item
    /// with the children decoded so far, the last of which may itself be
    /// partial. A constructed item rejected with
    /// [`ParseErrorKind::NestingTooDeep`] has no children.
    pub fn partial_item(&self) -> Option<&Item> {
        self.partial.as_deref()
    }

    pub(crate) fn without_partial(mut self) -> Self {
        self.partial = None;
        self
    }

    pub(crate) fn take_partial(&mut self) -> Option<Item> {
        self.partial.take().map(|item| *item)
    }
}

impl From<InputError> for ParseError {
    fn from(err: InputError) -> Self {
        ParseError::new(ParseErrorKind::InvalidInput(err.kind))
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Specific kinds of writing errors that can occur when serializing items.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteErrorKind {
    #[error("payload of {requested} bytes{} exceeds maximum length {max}", for_tag(.tag), max = MAX_LENGTH)]
    PayloadTooBig { tag: Option<Tag>, requested: u64 },
}

fn for_tag(tag: &Option<Tag>) -> String {
    match tag {
        Some(tag) => format!(" for tag {tag}"),
        None => String::new(),
    }
}

/// Error type returned when serializing to BER-TLV fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("write error: {kind}")]
pub struct WriteError {
    /// The specific kind of write error that occurred.
    kind: WriteErrorKind,
}

impl WriteError {
    /// Creates a new WriteError with the given kind.
    pub fn new(kind: WriteErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the specific kind of write error that occurred.
    pub fn kind(&self) -> &WriteErrorKind {
        &self.kind
    }
}

/// Result type for writing operations.
pub type WriteResult<T> = Result<T, WriteError>;
