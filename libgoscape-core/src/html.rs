use regex::bytes::{Captures, Regex};
use std::sync::OnceLock;

use crate::entities;

/// Windows-1252 characters substituted for numeric references in 0x80..=0x9F.
static C1_REPLACEMENTS: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

fn reference_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(?:#(?:([0-9]+)|[xX]([0-9A-Fa-f]+))|([A-Za-z0-9]+))(;?)")
            .expect("character reference pattern is valid")
    })
}

/// Escapes the five HTML-significant characters: `&`, `'`, `<`, `>` and `"`.
///
/// All other bytes are copied as-is, so input that is not valid UTF-8 survives unchanged.
pub fn escape(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    for &byte in input {
        match byte {
            b'&' => out.extend_from_slice(b"&amp;"),
            b'\'' => out.extend_from_slice(b"&#39;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            b'"' => out.extend_from_slice(b"&#34;"),
            _ => out.push(byte),
        }
    }
    out
}

/// Replaces named and numeric character references with the characters they stand for.
///
/// References that cannot be resolved are left untouched. Legacy named references such as
/// `&amp` are recognized without their trailing `;`, including as a prefix (`&ampx` becomes
/// `&x`).
pub fn unescape(input: &[u8]) -> Vec<u8> {
    if !input.contains(&b'&') {
        return input.to_vec();
    }

    reference_regex()
        .replace_all(input, |caps: &Captures| {
            let whole = caps.get(0).map_or(&b""[..], |m| m.as_bytes());
            let semicolon = caps.get(4).map_or(false, |m| !m.as_bytes().is_empty());

            if let Some(digits) = caps.get(1) {
                return numeric_reference(digits.as_bytes(), 10).to_string().into_bytes();
            }
            if let Some(digits) = caps.get(2) {
                return numeric_reference(digits.as_bytes(), 16).to_string().into_bytes();
            }

            let name = caps.get(3).map_or(&b""[..], |m| m.as_bytes());
            named_reference(name, semicolon).unwrap_or_else(|| whole.to_vec())
        })
        .into_owned()
}

fn numeric_reference(digits: &[u8], radix: u32) -> char {
    // The pattern only captures ASCII digits here.
    let code = std::str::from_utf8(digits)
        .ok()
        .and_then(|digits| u32::from_str_radix(digits, radix).ok());
    let code = match code {
        Some(code) => code,
        None => return char::REPLACEMENT_CHARACTER,
    };
    if (0x80..=0x9F).contains(&code) {
        return C1_REPLACEMENTS[(code - 0x80) as usize];
    }
    if code == 0 {
        return char::REPLACEMENT_CHARACTER;
    }
    // Surrogates and out-of-range values are rejected by from_u32.
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

fn named_reference(name: &[u8], semicolon: bool) -> Option<Vec<u8>> {
    if let Some((replacement, legacy)) = entities::lookup(name) {
        if semicolon || legacy {
            return Some(replacement.as_bytes().to_vec());
        }
    }

    // Longest legacy prefix wins; the rest of the name, and its `;`, is kept as text.
    let searchable = if semicolon { name.len() } else { name.len() - 1 };
    (2..=searchable.min(entities::LONGEST_LEGACY))
        .rev()
        .find_map(|len| {
            let (prefix, rest) = name.split_at(len);
            match entities::lookup(prefix) {
                Some((replacement, true)) => {
                    let mut out = replacement.as_bytes().to_vec();
                    out.extend_from_slice(rest);
                    if semicolon {
                        out.push(b';');
                    }
                    Some(out)
                }
                _ => None,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escape_str(input: &str) -> String {
        String::from_utf8(escape(input.as_bytes())).unwrap()
    }

    fn unescape_str(input: &str) -> String {
        String::from_utf8(unescape(input.as_bytes())).unwrap()
    }

    #[test]
    fn test_escape_significant_characters() {
        assert_eq!(
            escape_str("<text>foo&bar</text>"),
            "&lt;text&gt;foo&amp;bar&lt;/text&gt;"
        );
        assert_eq!(escape_str(r#"it's "quoted""#), "it&#39;s &#34;quoted&#34;");
        assert_eq!(escape_str("plain text, ünïcödé"), "plain text, ünïcödé");
    }

    #[test]
    fn test_escape_keeps_invalid_utf8() {
        assert_eq!(escape(b"\xff<"), b"\xff&lt;");
        assert_eq!(unescape(b"\xfe&amp;\xff"), b"\xfe&\xff");
    }

    #[test]
    fn test_unescape_named() {
        assert_eq!(
            unescape_str("&lt;text&gt;foo&amp;bar&lt;/text&gt;"),
            "<text>foo&bar</text>"
        );
        assert_eq!(unescape_str("&quot;&apos;&copy;&eacute;"), "\"'©é");
        assert_eq!(unescape_str("&alpha;&rarr;&hearts;"), "α→♥");
    }

    #[test]
    fn test_unescape_html5_names() {
        assert_eq!(
            unescape_str("&check;&NotEqualTilde;&hellip;&lsquo;"),
            "\u{2713}\u{2242}\u{338}\u{2026}\u{2018}"
        );
        assert_eq!(unescape_str("&CounterClockwiseContourIntegral;"), "\u{2233}");
        assert_eq!(unescape_str("&fjlig;"), "fj");
    }

    #[test]
    fn test_unescape_numeric() {
        assert_eq!(unescape_str("&#39;&#34;"), "'\"");
        assert_eq!(unescape_str("&#x41;&#X42;&#x1F600;"), "AB😀");
        assert_eq!(unescape_str("&#65"), "A");
        assert_eq!(unescape_str("&#128;"), "€");
        assert_eq!(
            unescape_str("&#0;&#xD800;&#x110000;"),
            "\u{FFFD}\u{FFFD}\u{FFFD}"
        );
        assert_eq!(unescape_str("&#99999999999;"), "\u{FFFD}");
    }

    #[test]
    fn test_unescape_legacy_without_semicolon() {
        assert_eq!(unescape_str("&amp &lt"), "& <");
        assert_eq!(unescape_str("&ampfoo"), "&foo");
        assert_eq!(unescape_str("&notit"), "¬it");
        // alpha is not a legacy reference
        assert_eq!(unescape_str("&alpha"), "&alpha");
    }

    #[test]
    fn test_unescape_legacy_prefix_with_semicolon() {
        assert_eq!(unescape_str("&ampfoo;"), "&foo;");
        assert_eq!(unescape_str("&notit;"), "¬it;");
        assert_eq!(unescape_str("&notin;"), "∉");
        assert_eq!(unescape_str("&alphax;"), "&alphax;");
    }

    #[test]
    fn test_unescape_malformed_passes_through() {
        assert_eq!(unescape_str("fish & chips"), "fish & chips");
        assert_eq!(unescape_str("&unknown;"), "&unknown;");
        assert_eq!(unescape_str("&#;&#x;"), "&#;&#x;");
        assert_eq!(unescape_str("trailing &"), "trailing &");
    }

    #[test]
    fn test_round_trip() {
        for input in ["", "a\0b", "<a href=\"x\">'&'</a>", "абвгд &amp; 日本"] {
            assert_eq!(unescape_str(&escape_str(input)), input);
        }
        assert_eq!(unescape(&escape(&[0xC3, 0x28, b'&'])), vec![0xC3, 0x28, b'&']);
    }
}
