use crate::error::{Error, Result};
use crate::{b64, html, url, Command, EntityType};

/// Encode and decode functions for one entity type.
pub struct Codec {
    pub entity: EntityType,
    pub encode: fn(&[u8]) -> Result<Vec<u8>>,
    pub decode: fn(&[u8]) -> Result<Vec<u8>>,
}

pub static CODECS: &[Codec] = &[
    Codec {
        entity: EntityType::Html,
        encode: |input| Ok(html::escape(input)),
        decode: |input| Ok(html::unescape(input)),
    },
    Codec {
        entity: EntityType::Url,
        encode: |input| Ok(url::query_escape(input).into_bytes()),
        decode: url::query_unescape,
    },
    Codec {
        entity: EntityType::Base64,
        encode: |input| Ok(b64::encode(input).into_bytes()),
        decode: b64::decode,
    },
    #[cfg(feature = "json")]
    Codec {
        entity: EntityType::Json,
        encode: |input| Ok(crate::json::quote(&String::from_utf8_lossy(input))?.into_bytes()),
        decode: |input| Ok(crate::json::unquote(&String::from_utf8_lossy(input))?.into_bytes()),
    },
];

/// Finds the codec registered for `entity`.
pub fn codec(entity: EntityType) -> Result<&'static Codec> {
    CODECS
        .iter()
        .find(|codec| codec.entity == entity)
        .ok_or(Error::UnknownType(entity))
}

/// Runs `command` for `entity` over the whole of `input`.
pub fn transform(command: Command, entity: EntityType, input: &[u8]) -> Result<Vec<u8>> {
    let codec = codec(entity)?;
    log::debug!("{} {}: {} bytes in", command, entity, input.len());

    let output = match command {
        Command::Encode => (codec.encode)(input)?,
        Command::Decode => (codec.decode)(input)?,
    };

    log::debug!("{} {}: {} bytes out", command, entity, output.len());
    Ok(output)
}

pub fn encode(input: &[u8], entity: EntityType) -> Result<Vec<u8>> {
    transform(Command::Encode, entity, input)
}

pub fn decode(input: &[u8], entity: EntityType) -> Result<Vec<u8>> {
    transform(Command::Decode, entity, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_str(input: &str, entity: EntityType) -> String {
        String::from_utf8(encode(input.as_bytes(), entity).unwrap()).unwrap()
    }

    #[test]
    fn test_encode_known_values() {
        assert_eq!(
            encode_str("<text>foo&bar</text>", EntityType::Html),
            "&lt;text&gt;foo&amp;bar&lt;/text&gt;"
        );
        assert_eq!(
            encode_str("абвгд / abcde", EntityType::Url),
            "%D0%B0%D0%B1%D0%B2%D0%B3%D0%B4+%2F+abcde"
        );
        assert_eq!(
            encode_str(r#"{"foo": "bar"}"#, EntityType::Base64),
            "eyJmb28iOiAiYmFyIn0="
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_round_trip_all_entities() {
        let inputs = [
            "",
            "plain",
            "with\0nul",
            "абвгд / abcde",
            "<text>foo&bar</text>",
            r#"{"foo": "bar"}"#,
            "tabs\tand\nnewlines",
        ];
        for &(_, entity) in crate::ENTITY_TYPES {
            for input in inputs {
                let encoded = encode(input.as_bytes(), entity).unwrap();
                let decoded = decode(&encoded, entity).unwrap();
                assert_eq!(decoded, input.as_bytes(), "{} round trip of {:?}", entity, input);
            }
        }
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode(b"!!!", EntityType::Base64),
            Err(Error::InvalidEncoding(_))
        ));
        assert!(matches!(
            decode(b"%zz", EntityType::Url),
            Err(Error::InvalidEscape(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_input_is_accepted() {
        assert_eq!(encode(b"\xff<", EntityType::Html).unwrap(), b"\xff&lt;");
        assert_eq!(decode(b"\xff&lt;", EntityType::Html).unwrap(), b"\xff<");
        assert_eq!(encode(&[0xFF, 0xFE], EntityType::Url).unwrap(), b"%FF%FE");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_json_entity() {
        assert_eq!(encode_str("a\"b", EntityType::Json), r#""a\"b""#);
        assert!(matches!(
            decode(br#""\x""#, EntityType::Json),
            Err(Error::InvalidJson(_))
        ));
        // Bytes that are not UTF-8 become U+FFFD.
        assert_eq!(
            encode(b"a\xffb", EntityType::Json).unwrap(),
            "\"a\u{FFFD}b\"".as_bytes()
        );
        assert_eq!(
            decode(b"\"a\xffb\"", EntityType::Json).unwrap(),
            "a\u{FFFD}b".as_bytes()
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_every_entity_has_a_codec() {
        for &(_, entity) in crate::ENTITY_TYPES {
            assert!(codec(entity).is_ok(), "no codec for {}", entity);
        }
    }

    #[cfg(not(feature = "json"))]
    #[test]
    fn test_json_without_codec_is_unknown_type() {
        match encode(b"x", EntityType::Json) {
            Err(Error::UnknownType(entity)) => assert_eq!(entity, EntityType::Json),
            other => panic!("expected UnknownType, got {:?}", other),
        }
    }
}
