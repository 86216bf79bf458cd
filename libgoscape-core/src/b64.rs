use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, PAD};
use base64::Engine as _;

use crate::error::Result;

/// Standard alphabet with padding. Non-zero trailing bits in the last quantum are accepted.
const STANDARD: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, PAD.with_decode_allow_trailing_bits(true));

pub fn encode(input: &[u8]) -> String {
    STANDARD.encode(input)
}

/// Decodes standard, padded Base64. Line breaks (`\r`, `\n`) anywhere in the input are skipped;
/// any other character outside the alphabet is an error.
pub fn decode(input: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = input
        .iter()
        .copied()
        .filter(|b| !matches!(b, b'\r' | b'\n'))
        .collect();
    Ok(STANDARD.decode(cleaned)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_encode() {
        assert_eq!(encode(br#"{"foo": "bar"}"#), "eyJmb28iOiAiYmFyIn0=");
        assert_eq!(encode(b""), "");
        assert_eq!(encode(&[0xFF, 0xFE, 0x00]), "//4A");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode(b"eyJmb28iOiAiYmFyIn0=").unwrap(), br#"{"foo": "bar"}"#);
        assert_eq!(decode(b"eyJmb28iOiAi\r\nYmFyIn0=\n").unwrap(), br#"{"foo": "bar"}"#);
        assert_eq!(decode(b"//4A").unwrap(), vec![0xFF, 0xFE, 0x00]);
    }

    #[test]
    fn test_decode_invalid() {
        assert!(matches!(decode(b"!!!"), Err(Error::InvalidEncoding(_))));
        assert!(matches!(decode(b"Zm9v YmFy"), Err(Error::InvalidEncoding(_))));
        // missing padding
        assert!(matches!(decode(b"Zm8"), Err(Error::InvalidEncoding(_))));
    }

    #[test]
    fn test_round_trip() {
        let inputs: [&[u8]; 4] = [b"", b"a\0b", "абвгд".as_bytes(), &[0x80, 0x81, 0xFF]];
        for input in inputs {
            assert_eq!(decode(encode(input).as_bytes()).unwrap(), input);
        }
    }
}
