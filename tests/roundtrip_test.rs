use bertlv::{Item, Tag, TagClass, TagType, parse, parse_verbose, serialize};
use proptest::prelude::*;

/// Well-formed tags with the requested type bit.
fn arb_tag(constructed: bool) -> impl Strategy<Value = Tag> {
    (
        any::<u8>(),
        any::<bool>(),
        prop::collection::vec(0x80u8..=0xFF, 0..2),
        0x00u8..=0x7F,
    )
        .prop_filter_map("not a single-byte tag", move |(first, multi, middle, last)| {
            let first = if constructed { first | 0x20 } else { first & !0x20 };
            let mut bytes = Vec::new();
            if multi {
                bytes.push(first | 0x1F);
                bytes.extend(middle);
                bytes.push(last);
            } else if first & 0x1F != 0x1F {
                bytes.push(first);
            } else {
                return None;
            }
            Tag::from_bytes(&bytes).ok()
        })
}

fn arb_item(max_value: usize) -> impl Strategy<Value = Item> {
    // Keeps every tree the factory accepts.
    let leaf = (
        arb_tag(false),
        prop::collection::vec(any::<u8>(), 0..max_value),
    )
        .prop_filter_map("rejected by the factory", |(tag, value)| {
            Item::primitive(tag, value).ok()
        });
    leaf.prop_recursive(4, 64, 6, |inner| {
        (arb_tag(true), prop::collection::vec(inner, 0..6))
            .prop_filter_map("rejected by the factory", |(tag, items)| {
                Item::constructed(tag, items).ok()
            })
    })
}

proptest! {
    #[test]
    fn items_round_trip(items in prop::collection::vec(arb_item(300), 0..4)) {
        let encoded = serialize(&items).unwrap();
        prop_assert_eq!(parse(&encoded), Ok(items.clone()));
        prop_assert_eq!(serialize(&parse(&encoded).unwrap()), Ok(encoded));
    }

    #[test]
    fn classification_depends_only_on_first_byte(
        first in any::<u8>(),
        rest in prop::collection::vec(any::<u8>(), 0..4),
    ) {
        let mut bytes = vec![first];
        bytes.extend(rest);
        let tag = Tag::from_bytes(&bytes).unwrap();

        let class = match first & 0xC0 {
            0x00 => TagClass::Universal,
            0x40 => TagClass::Application,
            0x80 => TagClass::ContextSpecific,
            _ => TagClass::Private,
        };
        let tag_type = if first & 0x20 != 0 { TagType::Constructed } else { TagType::Primitive };
        prop_assert_eq!(tag.class(), class);
        prop_assert_eq!(tag.tag_type(), tag_type);
    }

    #[test]
    fn truncation_keeps_complete_items(items in prop::collection::vec(arb_item(20), 1..4)) {
        let mut boundaries = vec![0];
        for item in &items {
            let end = boundaries.last().unwrap() + serialize(item).unwrap().len();
            boundaries.push(end);
        }
        let encoded = serialize(&items).unwrap();

        for cut in 0..encoded.len() {
            let outcome = parse_verbose(&encoded[..cut]);
            let complete = boundaries.iter().filter(|&&b| b > 0 && b <= cut).count();
            prop_assert_eq!(&outcome.items[..], &items[..complete]);
            prop_assert_eq!(outcome.error.is_some(), !boundaries.contains(&cut));
        }
    }
}
