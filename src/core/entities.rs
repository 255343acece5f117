//! XML Entity Decoding
//!
//! Handles decoding of XML entities:
//! - Built-in entities: &lt; &gt; &amp; &quot; &apos;
//! - Numeric character references: &#123; &#x7B;
//!
//! Unknown named entities are kept literally and reported back so the
//! dispatcher can raise a warning. Uses Cow for zero-copy when no entities
//! are present.

use memchr::memchr;
use std::borrow::Cow;

/// Result of decoding one run of text or one attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<'a> {
    pub text: Cow<'a, str>,
    /// Names of entities that were left undecoded
    pub unknown: Vec<String>,
}

/// Decode entity references in `input`.
///
/// Returns Err for a malformed or out-of-range numeric character reference.
/// A bare `&` that does not start a reference is kept as-is.
pub fn decode_text(input: &str) -> Result<Decoded<'_>, String> {
    // Fast path: check if there are any entities using SIMD
    if memchr(b'&', input.as_bytes()).is_none() {
        return Ok(Decoded {
            text: Cow::Borrowed(input),
            unknown: Vec::new(),
        });
    }

    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut unknown = Vec::new();
    let mut pos = 0;

    while let Some(offset) = memchr(b'&', &bytes[pos..]) {
        let amp = pos + offset;
        result.push_str(&input[pos..amp]);

        let Some(len) = reference_len(&bytes[amp + 1..]) else {
            result.push('&');
            pos = amp + 1;
            continue;
        };

        let entity = &input[amp + 1..amp + 1 + len];
        match decode_entity(entity)? {
            Some(c) => result.push(c),
            None => {
                result.push('&');
                result.push_str(entity);
                result.push(';');
                unknown.push(entity.to_string());
            }
        }
        pos = amp + len + 2;
    }
    result.push_str(&input[pos..]);

    Ok(Decoded {
        text: Cow::Owned(result),
        unknown,
    })
}

/// Length of the reference body after `&`, if it is terminated by `;`
fn reference_len(rest: &[u8]) -> Option<usize> {
    let len = rest
        .iter()
        .position(|&b| !(b.is_ascii_alphanumeric() || matches!(b, b'#' | b'_' | b'-' | b'.' | b':') || b >= 0x80))
        .unwrap_or(rest.len());
    (len > 0 && rest.get(len) == Some(&b';')).then_some(len)
}

/// Decode a single entity body (without & and ;)
fn decode_entity(entity: &str) -> Result<Option<char>, String> {
    if let Some(numeric) = entity.strip_prefix('#') {
        return decode_numeric_entity(numeric)
            .map(Some)
            .ok_or_else(|| format!("Invalid character reference: &{entity};"));
    }

    Ok(match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    })
}

/// Decode a numeric character reference
fn decode_numeric_entity(entity: &str) -> Option<char> {
    let codepoint = match entity.strip_prefix(['x', 'X']) {
        // Hexadecimal: &#xHHHH;
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        // Decimal: &#DDDD;
        None => entity.parse::<u32>().ok()?,
    };

    if !is_valid_xml_char(codepoint) {
        return None;
    }
    char::from_u32(codepoint)
}

/// Check if a code point is a valid XML 1.0 Char
/// Char ::= #x9 | #xA | #xD | [#x20-#xD7FF] | [#xE000-#xFFFD] | [#x10000-#x10FFFF]
#[inline]
pub fn is_valid_xml_char(codepoint: u32) -> bool {
    matches!(codepoint,
        0x9 | 0xA | 0xD |
        0x20..=0xD7FF |
        0xE000..=0xFFFD |
        0x10000..=0x10FFFF
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_entities() {
        let result = decode_text("Hello, World!").unwrap();
        assert!(matches!(result.text, Cow::Borrowed(_)));
        assert_eq!(result.text, "Hello, World!");
    }

    #[test]
    fn test_basic_entities() {
        let result = decode_text("&lt;hello&gt; &amp; &quot;world&quot; &apos;").unwrap();
        assert_eq!(result.text, "<hello> & \"world\" '");
        assert!(result.unknown.is_empty());
    }

    #[test]
    fn test_numeric_decimal_and_hex() {
        assert_eq!(decode_text("&#65;&#66;&#x43;").unwrap().text, "ABC");
        assert_eq!(decode_text("&#x1F600;").unwrap().text, "😀");
    }

    #[test]
    fn test_unknown_entity_is_kept_and_reported() {
        let result = decode_text("a &nbsp; b").unwrap();
        assert_eq!(result.text, "a &nbsp; b");
        assert_eq!(result.unknown, vec!["nbsp".to_string()]);
    }

    #[test]
    fn test_bare_ampersand() {
        let result = decode_text("fish & chips").unwrap();
        assert_eq!(result.text, "fish & chips");
        assert!(result.unknown.is_empty());
    }

    #[test]
    fn test_invalid_char_reference() {
        assert!(decode_text("&#0;").is_err());
        assert!(decode_text("&#xZZ;").is_err());
    }
}
