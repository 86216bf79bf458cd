use serde::Serialize;
use serde_json::ser::{CharEscape, Formatter, Serializer};
use std::io;

use crate::error::Result;

/// Compact JSON formatter that also escapes `<`, `>`, `&`, U+2028 and U+2029, so the
/// produced literal is safe to embed in HTML and JavaScript.
struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (idx, c) in fragment.char_indices() {
            let escaped: &[u8] = match c {
                '<' => b"\\u003c",
                '>' => b"\\u003e",
                '&' => b"\\u0026",
                '\u{2028}' => b"\\u2028",
                '\u{2029}' => b"\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..idx].as_bytes())?;
            writer.write_all(escaped)?;
            start = idx + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }

    fn write_char_escape<W>(&mut self, writer: &mut W, char_escape: CharEscape) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

        let short: &[u8] = match char_escape {
            CharEscape::Quote => b"\\\"",
            CharEscape::ReverseSolidus => b"\\\\",
            CharEscape::Solidus => b"\\/",
            CharEscape::LineFeed => b"\\n",
            CharEscape::CarriageReturn => b"\\r",
            CharEscape::Tab => b"\\t",
            CharEscape::Backspace => b"\\u0008",
            CharEscape::FormFeed => b"\\u000c",
            CharEscape::AsciiControl(byte) => {
                let escape = [
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    HEX_DIGITS[(byte >> 4) as usize],
                    HEX_DIGITS[(byte & 0x0F) as usize],
                ];
                return writer.write_all(&escape);
            }
        };
        writer.write_all(short)
    }
}

/// Renders `input` as a JSON string literal, surrounding quotes included.
pub fn quote(input: &str) -> Result<String> {
    let mut buf = Vec::with_capacity(input.len() + 2);
    let mut serializer = Serializer::with_formatter(&mut buf, HtmlSafeFormatter);
    input.serialize(&mut serializer)?;
    // The serializer only ever writes valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parses a JSON string literal and returns its contents.
///
/// Surrounding whitespace is ignored and a missing opening or closing quote is added, so
/// both `"a\nb"` and `a\nb` decode to the same text.
pub fn unquote(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let mut literal = String::with_capacity(trimmed.len() + 2);
    if !trimmed.starts_with('"') {
        literal.push('"');
    }
    literal.push_str(trimmed);
    if !trimmed.ends_with('"') {
        literal.push('"');
    }
    Ok(serde_json::from_str(&literal)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_quote() {
        assert_eq!(quote(r#"{"foo": "bar"}"#).unwrap(), r#""{\"foo\": \"bar\"}""#);
        assert_eq!(quote("line\nbreak\ttab\\").unwrap(), r#""line\nbreak\ttab\\""#);
        assert_eq!(quote("").unwrap(), r#""""#);
        assert_eq!(quote("абв").unwrap(), "\"абв\"");
    }

    #[test]
    fn test_quote_html_and_control_characters() {
        assert_eq!(
            quote("<a>&</a>").unwrap(),
            r#""\u003ca\u003e\u0026\u003c/a\u003e""#
        );
        assert_eq!(quote("\u{2028}\u{2029}").unwrap(), r#""\u2028\u2029""#);
        assert_eq!(quote("\0\x08\x0c\x1f").unwrap(), r#""\u0000\u0008\u000c\u001f""#);
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote(r#""a\nb""#).unwrap(), "a\nb");
        assert_eq!(unquote(r#"a\nb"#).unwrap(), "a\nb");
        assert_eq!(unquote(r#""open"#).unwrap(), "open");
        assert_eq!(unquote(r#"close""#).unwrap(), "close");
        assert_eq!(unquote("  \"padded\"\n").unwrap(), "padded");
        assert_eq!(unquote(r#"\u0436\u003c"#).unwrap(), "ж<");
        assert_eq!(unquote("").unwrap(), "");
    }

    #[test]
    fn test_unquote_invalid() {
        assert!(matches!(unquote(r#"bad \q escape"#), Err(Error::InvalidJson(_))));
        assert!(matches!(unquote(r#""a"b""#), Err(Error::InvalidJson(_))));
        assert!(matches!(unquote(r#"\u12"#), Err(Error::InvalidJson(_))));
    }

    #[test]
    fn test_round_trip() {
        for input in ["", "a\0b", " spaced ", "\"quoted\"", "日本 <&> \u{2028}"] {
            assert_eq!(unquote(&quote(input).unwrap()).unwrap(), input);
        }
    }
}
