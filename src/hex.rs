//! Strict hexadecimal conversion for tags, values and parse input.

use std::fmt::Write;

/// Why a hex string could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HexError {
    Uneven(usize),
    NonHex(char),
}

/// Formats bytes as uppercase hex without separators.
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 2);
    for b in data {
        write!(out, "{:02X}", b).unwrap();
    }
    out
}

/// Decodes a hex string of either case. Whitespace is not accepted.
pub(crate) fn decode(s: &str) -> Result<Vec<u8>, HexError> {
    if let Some(c) = s.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(HexError::NonHex(c));
    }
    if s.len() % 2 != 0 {
        return Err(HexError::Uneven(s.len()));
    }
    Ok(s.as_bytes()
        .chunks_exact(2)
        .map(|pair| (nibble(pair[0]) << 4) | nibble(pair[1]))
        .collect())
}

fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => c - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::{HexError, decode, encode};

    #[test]
    fn test_encode_uppercase() {
        assert_eq!(encode(&[0x9F, 0x02, 0x0a]), "9F020A");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_decode_mixed_case() {
        assert_eq!(decode("dfAE03"), Ok(vec![0xDF, 0xAE, 0x03]));
        assert_eq!(decode(""), Ok(vec![]));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode("9F0"), Err(HexError::Uneven(3)));
        assert_eq!(decode("9G"), Err(HexError::NonHex('G')));
        assert_eq!(decode("5A 02"), Err(HexError::NonHex(' ')));
    }
}
