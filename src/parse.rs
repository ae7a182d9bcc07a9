use bytes::Bytes;
use log::{debug, trace};
use smallvec::{SmallVec, smallvec};

use crate::buf::ByteCursor;
use crate::error::LengthError;
use crate::item::{Input, Item};
use crate::types::{Tag, TagType, decode_length};
use crate::{ParseError, ParseErrorKind, ParseResult};

const SUBSEQUENT_TAG_BYTES: u8 = 0x1F;
const MORE_TAG_BYTES: u8 = 0x80;

/// Default limit on nested constructed items.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    skip_zero_padding: bool,
    max_depth: usize,
}

impl ParseOptions {
    pub const fn new() -> Self {
        ParseOptions {
            skip_zero_padding: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Whether `0x00` filler bytes in front of an item are skipped instead of
    /// being read as a tag. Applies at every nesting level. Defaults to
    /// `true`.
    pub const fn skip_zero_padding(mut self, skip: bool) -> Self {
        self.skip_zero_padding = skip;
        self
    }

    pub fn skips_zero_padding(&self) -> bool {
        self.skip_zero_padding
    }

    /// How many constructed items may enclose one another. A top-level
    /// constructed item is at depth 1; one nested deeper than `max_depth`
    /// fails with [`ParseErrorKind::NestingTooDeep`].
    pub const fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions::new()
    }
}

/// The best-effort result of parsing a sequence of items.
///
/// `items` holds every item decoded completely before the first error. The
/// item that was being decoded when the error occurred is not among them; it
/// is available as [`ParseError::partial_item`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub items: Vec<Item>,
    pub error: Option<ParseError>,
}

impl ParseOutcome {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Converts to all-or-nothing form, dropping any partial data.
    pub fn into_result(self) -> ParseResult<Vec<Item>> {
        match self.error {
            None => Ok(self.items),
            Some(err) => Err(err.without_partial()),
        }
    }
}

/// Parse a sequence of items from raw bytes or hex, failing on the first
/// structural error.
pub fn parse<'a>(input: impl Into<Input<'a>>) -> ParseResult<Vec<Item>> {
    parse_with(input, ParseOptions::default())
}

pub fn parse_with<'a>(
    input: impl Into<Input<'a>>,
    options: ParseOptions,
) -> ParseResult<Vec<Item>> {
    parse_verbose_with(input, options).into_result()
}

/// Parse a sequence of items, returning everything decoded before the first
/// error alongside that error.
pub fn parse_verbose<'a>(input: impl Into<Input<'a>>) -> ParseOutcome {
    parse_verbose_with(input, ParseOptions::default())
}

pub fn parse_verbose_with<'a>(input: impl Into<Input<'a>>, options: ParseOptions) -> ParseOutcome {
    let input: Input = input.into();
    let data = match input.to_data() {
        Ok(data) => data,
        Err(err) => {
            return ParseOutcome {
                items: Vec::new(),
                error: Some(err.into()),
            };
        }
    };
    let mut cursor = ByteCursor::new(data.into_owned());
    Parser::new(options).parse_items(&mut cursor)
}

/// Recursive BER-TLV decoder over a [`ByteCursor`].
///
/// Every stage stops at the first error and hands back whatever it managed
/// to decode: partial tag bytes inside the error kind, or a partial item via
/// [`ParseError::partial_item`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Parser { options }
    }

    pub fn parse_tag(&self, cursor: &mut ByteCursor) -> ParseResult<Tag> {
        let first = cursor
            .read_u8()
            .map_err(|_| insufficient_tag_data(&[]))?;
        let mut bytes: SmallVec<[u8; 4]> = smallvec![first];

        if first & SUBSEQUENT_TAG_BYTES == SUBSEQUENT_TAG_BYTES {
            loop {
                let b = cursor
                    .read_u8()
                    .map_err(|_| insufficient_tag_data(&bytes))?;
                bytes.push(b);
                if b & MORE_TAG_BYTES == 0 {
                    break;
                }
            }
        }

        Ok(Tag::from_parsed(bytes))
    }

    pub fn parse_length(&self, cursor: &mut ByteCursor, tag: &Tag) -> ParseResult<u32> {
        decode_length(cursor).map_err(|e| {
            ParseError::new(match e {
                LengthError::Insufficient { missing } => ParseErrorKind::InsufficientLengthData {
                    tag: tag.clone(),
                    missing,
                },
                LengthError::TooBig { given } => ParseErrorKind::LengthTooBig {
                    tag: tag.clone(),
                    given,
                },
            })
        })
    }

    /// Reads `length` value bytes. When fewer remain, they are consumed anyway
    /// and returned inside the error as a partial item.
    pub fn parse_value(
        &self,
        cursor: &mut ByteCursor,
        length: u32,
        tag: &Tag,
    ) -> ParseResult<Bytes> {
        self.read_value(cursor, length, tag, 0)
    }

    pub fn parse_item(&self, cursor: &mut ByteCursor) -> ParseResult<Item> {
        self.read_item(cursor, 0)
    }

    pub fn parse_items(&self, cursor: &mut ByteCursor) -> ParseOutcome {
        self.read_items(cursor, 0)
    }

    /// `depth` counts the constructed items enclosing the cursor's data.
    fn read_value(
        &self,
        cursor: &mut ByteCursor,
        length: u32,
        tag: &Tag,
        depth: usize,
    ) -> ParseResult<Bytes> {
        let length = length as usize;
        if cursor.remaining() < length {
            let missing = length - cursor.remaining();
            let partial = cursor.read_remaining();
            let err = ParseError::new(ParseErrorKind::InsufficientValueData {
                tag: tag.clone(),
                missing,
            });
            let item = match tag.tag_type() {
                TagType::Primitive => Item::primitive_unchecked(tag.clone(), partial),
                TagType::Constructed => self.build_constructed(tag.clone(), partial, depth + 1).0,
            };
            return Err(err.with_partial(item));
        }
        cursor.read_buffer(length)
    }

    fn read_item(&self, cursor: &mut ByteCursor, depth: usize) -> ParseResult<Item> {
        let tag = self.parse_tag(cursor)?;
        let length = self.parse_length(cursor, &tag)?;
        trace!("tag {} with {} value bytes", tag, length);
        let value = self.read_value(cursor, length, &tag, depth)?;

        match tag.tag_type() {
            TagType::Primitive => Ok(Item::primitive_unchecked(tag, value)),
            TagType::Constructed => match self.build_constructed(tag, value, depth + 1) {
                (item, None) => Ok(item),
                (item, Some(err)) => Err(err.with_partial(item)),
            },
        }
    }

    fn read_items(&self, cursor: &mut ByteCursor, depth: usize) -> ParseOutcome {
        let mut items = Vec::new();
        while !cursor.is_empty() {
            if self.options.skip_zero_padding {
                let skipped = skip_zero_padding(cursor);
                if skipped > 0 {
                    debug!(
                        "skipped {} padding bytes at offset {}",
                        skipped,
                        cursor.position() - skipped
                    );
                    continue;
                }
            }

            match self.read_item(cursor, depth) {
                Ok(item) => items.push(item),
                Err(err) => {
                    debug!("stopped after {} items: {}", items.len(), err);
                    return ParseOutcome {
                        items,
                        error: Some(err),
                    };
                }
            }
        }

        ParseOutcome { items, error: None }
    }

    /// Decodes `value` as the children of a constructed item sitting at
    /// `depth`. On failure the item holds the children decoded so far,
    /// followed by the failing child's own partial item.
    fn build_constructed(
        &self,
        tag: Tag,
        value: Bytes,
        depth: usize,
    ) -> (Item, Option<ParseError>) {
        if depth > self.options.max_depth {
            debug!("tag {} at depth {} exceeds the nesting limit", tag, depth);
            let err = ParseError::new(ParseErrorKind::NestingTooDeep {
                tag: tag.clone(),
                max_depth: self.options.max_depth,
            });
            return (Item::constructed_unchecked(tag, Vec::new()), Some(err));
        }

        let mut inner = ByteCursor::from(value);
        let ParseOutcome { mut items, error } = self.read_items(&mut inner, depth);
        let error = error.map(|mut err| {
            if let Some(partial) = err.take_partial() {
                items.push(partial);
            }
            err
        });
        (Item::constructed_unchecked(tag, items), error)
    }
}

fn insufficient_tag_data(partial: &[u8]) -> ParseError {
    ParseError::new(ParseErrorKind::InsufficientTagData {
        partial: partial.to_vec(),
    })
}

fn skip_zero_padding(cursor: &mut ByteCursor) -> usize {
    let mut skipped = 0;
    while cursor.peek() == Some(0x00) && cursor.read_u8().is_ok() {
        skipped += 1;
    }
    skipped
}
