use crate::Item;
use crate::buf::ByteCursor;

/// Types that can be written out as BER-TLV: a single item or an ordered
/// sequence of items.
pub trait ToTlv {
    /// Write the encoding at the cursor position.
    fn write_tlv(&self, cursor: &mut ByteCursor) -> crate::WriteResult<()>;
}

impl ToTlv for Item {
    fn write_tlv(&self, cursor: &mut ByteCursor) -> crate::WriteResult<()> {
        crate::write::write_item(cursor, self)
    }
}

impl ToTlv for [Item] {
    fn write_tlv(&self, cursor: &mut ByteCursor) -> crate::WriteResult<()> {
        self.iter().try_for_each(|item| item.write_tlv(cursor))
    }
}

impl ToTlv for Vec<Item> {
    fn write_tlv(&self, cursor: &mut ByteCursor) -> crate::WriteResult<()> {
        self.as_slice().write_tlv(cursor)
    }
}

impl<T: ToTlv + ?Sized> ToTlv for &T {
    fn write_tlv(&self, cursor: &mut ByteCursor) -> crate::WriteResult<()> {
        (**self).write_tlv(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::ToTlv;
    use crate::buf::ByteCursor;
    use crate::primitive_item;

    #[test]
    fn test_sequence_writes_in_order() {
        let items = vec![
            primitive_item("5A", "01").unwrap(),
            primitive_item("5F20", "").unwrap(),
        ];
        let mut cursor = ByteCursor::default();
        items.write_tlv(&mut cursor).unwrap();
        (&items[..1]).write_tlv(&mut cursor).unwrap();
        assert_eq!(
            cursor.into_inner(),
            vec![0x5A, 0x01, 0x01, 0x5F, 0x20, 0x00, 0x5A, 0x01, 0x01]
        );
    }
}
