//! bertlv_ascii provides a human-readable ASCII format for BER-TLV data.
//!
//! This crate is primarily used as a binary (`tlv2ascii`) for pretty-printing
//! card responses and other TLV dumps without knowing what the tags mean.
//! Truncated or malformed input is printed as far as it could be decoded,
//! followed by the error.
//!
//! This is inspired by Google's der-ascii project for DER/BER encodings.

mod format;

use bertlv::ParseOutcome;

pub use crate::format::{outcome_to_ascii, to_ascii};

/// Parses a dump as far as possible. With `hex` set the dump is read as hex
/// text in which ASCII whitespace is ignored; otherwise it is raw BER-TLV.
pub fn parse_dump(data: &[u8], hex: bool) -> ParseOutcome {
    if !hex {
        return bertlv::parse_verbose(data);
    }
    let compact: String = String::from_utf8_lossy(data)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    bertlv::parse_verbose(&compact)
}

/// Parses raw BER-TLV bytes and formats them as ASCII.
pub fn tlv2ascii(data: &[u8]) -> String {
    outcome_to_ascii(&parse_dump(data, false))
}

/// Parses hex-encoded BER-TLV and formats it as ASCII.
pub fn hex2ascii(text: &str) -> String {
    outcome_to_ascii(&parse_dump(text.as_bytes(), true))
}

#[cfg(test)]
mod tests {
    use bertlv::{constructed_item, primitive_item, serialize};

    use crate::{hex2ascii, tlv2ascii};

    #[test]
    fn test_card_response() {
        // A READ RECORD response template.
        let record = constructed_item(
            "70",
            [
                primitive_item("5A", "4111111111111111").unwrap(),
                primitive_item("5F24", "251231").unwrap(),
                primitive_item("5F20", "4A4F484E20444F45").unwrap(),
            ],
        )
        .unwrap();
        let serialized = serialize(&record).unwrap();
        assert_eq!(
            tlv2ascii(&serialized),
            "[70] {\n  [5A] 4111111111111111\n  [5F24] 251231\n  [5F20] 4A4F484E20444F45\n}\n"
        );
    }

    #[test]
    fn test_hex_input() {
        assert_eq!(
            hex2ascii("E0 08\n9A 02 AA BB\n9B 02 DD FF\n"),
            "[E0] {\n  [9A] AABB\n  [9B] DDFF\n}\n"
        );
    }

    #[test]
    fn test_padding_is_skipped() {
        assert_eq!(tlv2ascii(&[0x00, 0x5A, 0x01, 0x41, 0x00]), "[5A] 41\n");
    }

    #[test]
    fn test_invalid_hex() {
        assert_eq!(
            hex2ascii("5A0"),
            "# parse error: invalid input: hex data has an odd number of characters: 3\n"
        );
    }

    #[test]
    fn test_truncated_constructed() {
        assert_eq!(
            hex2ascii("E00A9A02AABB9B04DD"),
            "# parse error: value of tag E0 is truncated: missing 3 bytes\n\
             # partial:\n\
             [E0] {\n  [9A] AABB\n  [9B] DD\n}\n"
        );
    }
}
