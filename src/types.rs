use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use crate::buf::ByteCursor;
use crate::error::LengthError;
use crate::{InputError, InputErrorKind, WriteError, WriteErrorKind, WriteResult};

/// Largest payload length the 4-byte long form can express.
pub const MAX_LENGTH: u64 = 0xFFFF_FFFF;

const CONSTRUCTED_BIT: u8 = 0x20;
const CLASS_MASK: u8 = 0xC0;
const TAG_NUMBER_MASK: u8 = 0x1F;

/// Whether an item carries raw bytes or nested items, from the 0x20 bit of
/// the first tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    Primitive,
    Constructed,
}

impl TagType {
    pub const fn from_byte(first: u8) -> Self {
        if first & CONSTRUCTED_BIT == CONSTRUCTED_BIT {
            TagType::Constructed
        } else {
            TagType::Primitive
        }
    }
}

/// Tag class, from the top two bits of the first tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagClass {
    Universal = 0x00,
    Application = 0x40,
    ContextSpecific = 0x80,
    Private = 0xC0,
}

impl TagClass {
    pub const fn from_byte(first: u8) -> Self {
        match first & CLASS_MASK {
            0x00 => TagClass::Universal,
            0x40 => TagClass::Application,
            0x80 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        }
    }
}

impl From<TagClass> for u8 {
    fn from(class: TagClass) -> u8 {
        class as u8
    }
}

/// A BER tag: one or more raw bytes, never empty.
///
/// Tags compare and hash by their bytes and display as uppercase hex.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(SmallVec<[u8; 4]>);

impl Tag {
    /// Builds a tag from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, InputError> {
        if bytes.is_empty() {
            return Err(InputError::new(InputErrorKind::TagEmpty));
        }
        Ok(Tag(SmallVec::from_slice(bytes)))
    }

    /// Builds a tag from a hex string of either case.
    pub fn from_hex(s: &str) -> Result<Self, InputError> {
        if s.is_empty() {
            return Err(InputError::new(InputErrorKind::TagEmpty));
        }
        let bytes = crate::hex::decode(s).map_err(|e| {
            InputError::new(match e {
                crate::hex::HexError::Uneven(len) => InputErrorKind::TagUnevenBytes(len),
                crate::hex::HexError::NonHex(c) => InputErrorKind::TagContainsNonHex(c),
            })
        })?;
        Ok(Tag(SmallVec::from_vec(bytes)))
    }

    pub(crate) fn from_parsed(bytes: SmallVec<[u8; 4]>) -> Self {
        debug_assert!(!bytes.is_empty());
        Tag(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn first(&self) -> u8 {
        self.0[0]
    }

    pub fn tag_type(&self) -> TagType {
        TagType::from_byte(self.first())
    }

    pub fn class(&self) -> TagClass {
        TagClass::from_byte(self.first())
    }

    pub fn is_constructed(&self) -> bool {
        self.tag_type() == TagType::Constructed
    }

    /// The tag number: the low five bits of a single-byte tag, or the
    /// base-128 value carried by the subsequent bytes of a multi-byte tag.
    ///
    /// Returns `None` when the number does not fit in a `u32`.
    pub fn number(&self) -> Option<u32> {
        let low = self.first() & TAG_NUMBER_MASK;
        if low != TAG_NUMBER_MASK || self.0.len() == 1 {
            return Some(low as u32);
        }
        self.0[1..].iter().try_fold(0u32, |acc, b| {
            acc.checked_mul(128)
                .and_then(|acc| acc.checked_add((b & 0x7F) as u32))
        })
    }

    pub fn to_hex(&self) -> String {
        crate::hex::encode(&self.0)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}

impl FromStr for Tag {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::from_hex(s)
    }
}

impl TryFrom<&[u8]> for Tag {
    type Error = InputError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Tag::from_bytes(bytes)
    }
}

/// Number of bytes needed to express `length` in the long form, or 0 for
/// the short form.
fn long_form_size(length: u64) -> usize {
    match length {
        0..0x80 => 0,
        0x80..=0xFF => 1,
        0x100..=0xFFFF => 2,
        0x1_0000..=0xFF_FFFF => 3,
        _ => 4,
    }
}

/// Writes a BER length field at the cursor position.
pub fn write_length(cursor: &mut ByteCursor, length: u64) -> WriteResult<()> {
    if length > MAX_LENGTH {
        return Err(WriteError::new(WriteErrorKind::PayloadTooBig {
            tag: None,
            requested: length,
        }));
    }

    let size = long_form_size(length);
    if size == 0 {
        cursor.write_u8(length as u8);
        return Ok(());
    }

    cursor.write_u8(0x80 | size as u8);
    match size {
        1 => cursor.write_u8(length as u8),
        2 => cursor.write_u16(length as u16),
        3 => cursor.write_u24(length as u32),
        _ => cursor.write_u32(length as u32),
    }
    Ok(())
}

/// Encodes a BER length field: a single byte below 0x80, otherwise `0x80 | k`
/// followed by the length in `k` big-endian bytes.
pub fn encode_length(length: u64) -> WriteResult<Vec<u8>> {
    let mut cursor = ByteCursor::default();
    write_length(&mut cursor, length)?;
    Ok(cursor.into_inner())
}

/// Reads a BER length field from the cursor.
pub fn decode_length(cursor: &mut ByteCursor) -> Result<u32, LengthError> {
    let first = cursor
        .read_u8()
        .map_err(|_| LengthError::Insufficient { missing: 1 })?;
    if first & 0x80 == 0 {
        return Ok(first as u32);
    }

    let count = (first & 0x7F) as usize;
    if count > 4 {
        return Err(LengthError::TooBig { given: count });
    }
    if cursor.remaining() < count {
        return Err(LengthError::Insufficient {
            missing: count - cursor.remaining(),
        });
    }

    // Bounds were checked above, so the reads below cannot fail.
    let length = match count {
        0 => Ok(0),
        1 => cursor.read_u8().map(u32::from),
        2 => cursor.read_u16().map(u32::from),
        3 => cursor.read_u24(),
        _ => cursor.read_u32(),
    };
    length.map_err(|_| LengthError::Insufficient { missing: count })
}
