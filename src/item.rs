use std::borrow::Cow;
use std::fmt;

use bytes::Bytes;

use crate::hex::HexError;
use crate::types::{Tag, TagClass, TagType};
use crate::{InputError, InputErrorKind, InputResult};

/// Caller-supplied tag, value or parse input.
///
/// Hex strings may use either case. `Absent` stands for "not given": it is an
/// empty value, an empty parse input, and an invalid tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Input<'a> {
    Bytes(&'a [u8]),
    Hex(&'a str),
    #[default]
    Absent,
}

impl<'a> Input<'a> {
    pub(crate) fn to_tag(self) -> InputResult<Tag> {
        match self {
            Input::Bytes(bytes) => Tag::from_bytes(bytes),
            Input::Hex(s) => Tag::from_hex(s),
            Input::Absent => Err(InputError::new(InputErrorKind::TagEmpty)),
        }
    }

    pub(crate) fn to_data(self) -> InputResult<Cow<'a, [u8]>> {
        match self {
            Input::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            Input::Hex(s) => crate::hex::decode(s).map(Cow::Owned).map_err(|e| {
                InputError::new(match e {
                    HexError::Uneven(len) => InputErrorKind::DataUnevenBytes(len),
                    HexError::NonHex(c) => InputErrorKind::DataContainsNonHex(c),
                })
            }),
            Input::Absent => Ok(Cow::Borrowed(&[])),
        }
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a Bytes> for Input<'a> {
    fn from(bytes: &'a Bytes) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(s: &'a str) -> Self {
        Input::Hex(s)
    }
}

impl<'a> From<&'a String> for Input<'a> {
    fn from(s: &'a String) -> Self {
        Input::Hex(s)
    }
}

impl<'a> From<&'a Tag> for Input<'a> {
    fn from(tag: &'a Tag) -> Self {
        Input::Bytes(tag.as_bytes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Content {
    Primitive(Bytes),
    Constructed(Vec<Item>),
}

/// A single BER-TLV node.
///
/// The payload kind always agrees with the tag: a primitive tag carries a
/// value, a constructed tag carries child items. Items are immutable once
/// built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Item {
    tag: Tag,
    content: Content,
}

impl Item {
    /// Builds a primitive item, failing if `tag` has the constructed bit set
    /// or starts with the `00` padding byte.
    pub fn primitive(tag: Tag, value: impl Into<Bytes>) -> InputResult<Self> {
        let tag = check_tag(tag, TagType::Primitive)?;
        Ok(Item::primitive_unchecked(tag, value.into()))
    }

    /// Builds a constructed item, failing if `tag` lacks the constructed bit.
    pub fn constructed(tag: Tag, items: Vec<Item>) -> InputResult<Self> {
        let tag = check_tag(tag, TagType::Constructed)?;
        Ok(Item::constructed_unchecked(tag, items))
    }

    pub(crate) fn primitive_unchecked(tag: Tag, value: Bytes) -> Self {
        debug_assert_eq!(tag.tag_type(), TagType::Primitive);
        Item {
            tag,
            content: Content::Primitive(value),
        }
    }

    pub(crate) fn constructed_unchecked(tag: Tag, items: Vec<Item>) -> Self {
        debug_assert_eq!(tag.tag_type(), TagType::Constructed);
        Item {
            tag,
            content: Content::Constructed(items),
        }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn tag_type(&self) -> TagType {
        self.tag.tag_type()
    }

    pub fn class(&self) -> TagClass {
        self.tag.class()
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.content, Content::Primitive(_))
    }

    pub fn is_constructed(&self) -> bool {
        matches!(self.content, Content::Constructed(_))
    }

    /// The raw payload, present only for primitive items.
    pub fn value(&self) -> Option<&Bytes> {
        match &self.content {
            Content::Primitive(value) => Some(value),
            Content::Constructed(_) => None,
        }
    }

    /// The child items, present only for constructed items.
    pub fn items(&self) -> Option<&[Item]> {
        match &self.content {
            Content::Primitive(_) => None,
            Content::Constructed(items) => Some(items),
        }
    }

    /// Finds the first item with the given tag, searching depth-first and
    /// starting with `self`.
    pub fn find(&self, tag: &Tag) -> Option<&Item> {
        if &self.tag == tag {
            return Some(self);
        }
        self.items()?.iter().find_map(|child| child.find(tag))
    }
}

/// A leading `00` is read back as padding by the default parser, so items
/// built here never carry one.
fn check_tag(tag: Tag, expected: TagType) -> InputResult<Tag> {
    if tag.as_bytes().first() == Some(&0x00) {
        return Err(InputError::new(InputErrorKind::TagStartsWithPadding(tag)));
    }
    if tag.tag_type() != expected {
        return Err(InputError::new(InputErrorKind::TypeMismatch { tag, expected }));
    }
    Ok(tag)
}

/// Compact single-line notation: `5A[2020]` for primitive items and
/// `E0{9A[AABB] 9B[DDFF]}` for constructed ones.
impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content {
            Content::Primitive(value) => {
                write!(f, "{}[{}]", self.tag, crate::hex::encode(value))
            }
            Content::Constructed(items) => {
                write!(f, "{}{{", self.tag)?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Builds a primitive item from a tag and an optional value, each given as
/// raw bytes or hex. An absent value becomes an empty payload.
pub fn primitive_item<'t, 'v>(
    tag: impl Into<Input<'t>>,
    value: impl Into<Input<'v>>,
) -> InputResult<Item> {
    let tag: Input = tag.into();
    let value: Input = value.into();
    let tag = tag.to_tag()?;
    let value = value.to_data()?;
    Item::primitive(tag, Bytes::copy_from_slice(&value))
}

/// Builds a constructed item from a tag, given as raw bytes or hex, and its
/// children in order.
pub fn constructed_item<'t>(
    tag: impl Into<Input<'t>>,
    items: impl IntoIterator<Item = Item>,
) -> InputResult<Item> {
    let tag: Input = tag.into();
    let tag = tag.to_tag()?;
    Item::constructed(tag, items.into_iter().collect())
}
