use log::trace;

use crate::buf::ByteCursor;
use crate::traits::ToTlv;
use crate::types::write_length;
use crate::{Item, WriteError, WriteErrorKind, WriteResult};

/// Serialize an item or a sequence of items to BER-TLV as a Vec<u8>.
pub fn serialize<T: ToTlv + ?Sized>(value: &T) -> WriteResult<Vec<u8>> {
    let mut cursor = ByteCursor::default();
    value.write_tlv(&mut cursor)?;
    Ok(cursor.into_inner())
}

pub fn serialize_item(item: &Item) -> WriteResult<Vec<u8>> {
    serialize(item)
}

pub fn serialize_items(items: &[Item]) -> WriteResult<Vec<u8>> {
    serialize(items)
}

pub(crate) fn write_item(cursor: &mut ByteCursor, item: &Item) -> WriteResult<()> {
    match item.items() {
        Some(children) => write_constructed(cursor, item, children),
        None => write_primitive(cursor, item),
    }
}

fn write_primitive(cursor: &mut ByteCursor, item: &Item) -> WriteResult<()> {
    let value = item.value().map(|v| &v[..]).unwrap_or_default();
    write_header(cursor, item, value.len() as u64)?;
    cursor.write_buffer(value);
    Ok(())
}

/// The length always comes from the children as serialized here.
fn write_constructed(
    cursor: &mut ByteCursor,
    item: &Item,
    children: &[Item],
) -> WriteResult<()> {
    let mut inner = ByteCursor::default();
    children.write_tlv(&mut inner)?;
    let child_bytes = inner.into_inner();

    write_header(cursor, item, child_bytes.len() as u64)?;
    cursor.write_buffer(&child_bytes);
    Ok(())
}

fn write_header(cursor: &mut ByteCursor, item: &Item, length: u64) -> WriteResult<()> {
    trace!("writing tag {} with {} value bytes", item.tag(), length);
    cursor.write_buffer(item.tag().as_bytes());
    write_length(cursor, length).map_err(|_| {
        WriteError::new(WriteErrorKind::PayloadTooBig {
            tag: Some(item.tag().clone()),
            requested: length,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::{serialize, serialize_item, serialize_items, write_header};
    use crate::buf::ByteCursor;
    use crate::{
        Input, MAX_LENGTH, WriteError, WriteErrorKind, constructed_item, primitive_item,
    };

    #[test]
    fn test_serialize_primitive() {
        let item = primitive_item("9F02", "000000001000").unwrap();
        assert_eq!(
            serialize_item(&item),
            Ok(vec![0x9F, 0x02, 0x06, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00])
        );

        let empty = primitive_item("12", Input::Absent).unwrap();
        assert_eq!(serialize(&empty), Ok(vec![0x12, 0x00]));
    }

    #[test]
    fn test_serialize_constructed() {
        let item = constructed_item(
            "E0",
            [
                primitive_item("9A", "AABB").unwrap(),
                primitive_item("9B", "DDFF").unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(
            serialize_item(&item),
            Ok(vec![0xE0, 0x08, 0x9A, 0x02, 0xAA, 0xBB, 0x9B, 0x02, 0xDD, 0xFF])
        );

        let empty = constructed_item("70", []).unwrap();
        assert_eq!(serialize_item(&empty), Ok(vec![0x70, 0x00]));
    }

    #[test]
    fn test_long_form_length() {
        let value = vec![0xABu8; 0x1234];
        let item = primitive_item("DF01", &value).unwrap();
        let encoded = serialize(&item).unwrap();
        assert_eq!(&encoded[..5], &[0xDF, 0x01, 0x82, 0x12, 0x34]);
        assert_eq!(encoded.len(), 5 + 0x1234);

        let outer = constructed_item("70", [item]).unwrap();
        let encoded = serialize(&outer).unwrap();
        assert_eq!(&encoded[..7], &[0x70, 0x82, 0x12, 0x39, 0xDF, 0x01, 0x82]);
    }

    #[test]
    fn test_serialize_items() {
        let items = vec![
            primitive_item("5A", "01").unwrap(),
            constructed_item("A5", [primitive_item("88", "02").unwrap()]).unwrap(),
        ];
        assert_eq!(
            serialize_items(&items),
            Ok(vec![0x5A, 0x01, 0x01, 0xA5, 0x03, 0x88, 0x01, 0x02])
        );
        assert_eq!(serialize(&items), serialize_items(&items));
        assert_eq!(serialize_items(&[]), Ok(vec![]));
    }

    #[test]
    fn test_oversized_payload_names_the_tag() {
        let item = primitive_item("9F02", Input::Absent).unwrap();
        let mut cursor = ByteCursor::default();
        let err = write_header(&mut cursor, &item, MAX_LENGTH + 1).unwrap_err();
        assert_eq!(
            err,
            WriteError::new(WriteErrorKind::PayloadTooBig {
                tag: Some("9F02".parse().unwrap()),
                requested: MAX_LENGTH + 1,
            })
        );
        assert_eq!(
            err.to_string(),
            "write error: payload of 4294967296 bytes for tag 9F02 exceeds maximum length 4294967295"
        );

        let mut cursor = ByteCursor::default();
        assert_eq!(write_header(&mut cursor, &item, MAX_LENGTH), Ok(()));
        assert_eq!(cursor.into_inner(), vec![0x9F, 0x02, 0x84, 0xFF, 0xFF, 0xFF, 0xFF]);
    }
}
