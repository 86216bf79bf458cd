use crate::error::{Error, Result};

const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~')
}

/// Percent-encodes `input` for use in a URL query: every byte outside the unreserved set
/// becomes `%XX` and space becomes `+`.
pub fn query_escape(input: &[u8]) -> String {
    log::debug!("{:?}", String::from_utf8_lossy(input));

    let mut out = String::with_capacity(input.len());
    for &byte in input {
        match byte {
            b' ' => out.push('+'),
            b if is_unreserved(b) => out.push(b as char),
            b => {
                out.push('%');
                out.push(UPPER_HEX[(b >> 4) as usize] as char);
                out.push(UPPER_HEX[(b & 0x0F) as usize] as char);
            }
        }
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Reverses [`query_escape`]: `%XX` becomes the byte it names and `+` becomes a space.
///
/// A `%` that is not followed by two hex digits is an [`Error::InvalidEscape`] carrying the
/// offending sequence.
pub fn query_unescape(input: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;
    while i < input.len() {
        match input[i] {
            b'%' => {
                let high = input.get(i + 1).copied().and_then(hex_value);
                let low = input.get(i + 2).copied().and_then(hex_value);
                match (high, low) {
                    (Some(high), Some(low)) => out.push((high << 4) | low),
                    _ => {
                        let end = (i + 3).min(input.len());
                        let sequence = String::from_utf8_lossy(&input[i..end]).into_owned();
                        return Err(Error::InvalidEscape(sequence));
                    }
                }
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_escape_cyrillic_and_reserved() {
        assert_eq!(
            query_escape("абвгд / abcde".as_bytes()),
            "%D0%B0%D0%B1%D0%B2%D0%B3%D0%B4+%2F+abcde"
        );
        assert_eq!(query_escape(b"a=1&b=2?"), "a%3D1%26b%3D2%3F");
        assert_eq!(query_escape(b"-_.~"), "-_.~");
        assert_eq!(query_escape(b"100%+*"), "100%25%2B%2A");
    }

    #[test]
    fn test_query_unescape() {
        assert_eq!(
            query_unescape(b"%D0%B0%D0%B1%D0%B2%D0%B3%D0%B4+%2F+abcde").unwrap(),
            "абвгд / abcde".as_bytes()
        );
        assert_eq!(query_unescape(b"%2f%2F").unwrap(), b"//");
        assert_eq!(query_unescape(b"already plain").unwrap(), b"already plain");
        assert_eq!(query_unescape(b"%FF%00").unwrap(), vec![0xFF, 0x00]);
    }

    #[test]
    fn test_query_unescape_invalid_escape() {
        match query_unescape(b"abc%zzdef") {
            Err(Error::InvalidEscape(sequence)) => assert_eq!(sequence, "%zz"),
            other => panic!("expected InvalidEscape, got {:?}", other),
        }
        match query_unescape(b"trailing%4") {
            Err(Error::InvalidEscape(sequence)) => assert_eq!(sequence, "%4"),
            other => panic!("expected InvalidEscape, got {:?}", other),
        }
        assert!(matches!(query_unescape(b"%"), Err(Error::InvalidEscape(_))));
        assert_eq!(
            query_unescape(b"%G1").unwrap_err().to_string(),
            "invalid URL escape \"%G1\""
        );
    }

    #[test]
    fn test_round_trip() {
        let inputs: [&[u8]; 4] = [b"", b"a\0b c", "日本語 & more".as_bytes(), &[0xC3, 0x28]];
        for input in inputs {
            assert_eq!(query_unescape(query_escape(input).as_bytes()).unwrap(), input);
        }
    }
}
