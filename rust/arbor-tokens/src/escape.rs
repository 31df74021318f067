//! Restricted percent-escaping for base64 signature tokens.
//!
//! A base64 token travels inside URLs and header values, where exactly
//! three of its symbols are unsafe. This is a closed three-symbol
//! substitution, not general percent-encoding: no other byte value is ever
//! escaped, and the inverse only recognizes the same three escapes.

/// Escape `/`, `+`, and `=` in a base64 string as `%2f`, `%2b`, and `%3d`.
///
/// The output is assembled back-to-front over a buffer sized to the
/// worst case (three bytes per input byte), so the finished string occupies
/// a contiguous suffix and every unescaped byte is copied exactly once.
/// Empty input returns an empty string without allocating.
pub fn url_escape_base64(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let bytes = input.as_bytes();
    let mut buffer = vec![0u8; bytes.len() * 3];
    let mut write = buffer.len();

    for &byte in bytes.iter().rev() {
        let escape: &[u8] = match byte {
            b'/' => b"%2f",
            b'+' => b"%2b",
            b'=' => b"%3d",
            _ => {
                write -= 1;
                buffer[write] = byte;
                continue;
            }
        };
        write -= escape.len();
        buffer[write..write + escape.len()].copy_from_slice(escape);
    }

    let escaped = buffer.split_off(write);
    // Escapes are ASCII and other bytes are copied verbatim, so UTF-8
    // sequences survive intact.
    String::from_utf8(escaped).expect("escaping preserves UTF-8")
}

/// Reverse [`url_escape_base64`]: rewrite `%2f`, `%2b`, and `%3d` (either
/// hex case) back to their symbols, leaving every other byte untouched.
pub fn url_unescape_base64(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut unescaped = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'%' && index + 2 < bytes.len() {
            let symbol = match (
                bytes[index + 1].to_ascii_lowercase(),
                bytes[index + 2].to_ascii_lowercase(),
            ) {
                (b'2', b'f') => Some(b'/'),
                (b'2', b'b') => Some(b'+'),
                (b'3', b'd') => Some(b'='),
                _ => None,
            };
            if let Some(symbol) = symbol {
                unescaped.push(symbol);
                index += 3;
                continue;
            }
        }
        unescaped.push(bytes[index]);
        index += 1;
    }

    String::from_utf8(unescaped).expect("unescaping preserves UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn it_escapes_only_the_three_reserved_symbols() {
        assert_eq!(url_escape_base64("ab/cd+ef="), "ab%2fcd%2bef%3d");
        assert_eq!(url_escape_base64("AbCd1234"), "AbCd1234");
        assert_eq!(url_escape_base64("//"), "%2f%2f");
        assert_eq!(url_escape_base64("=="), "%3d%3d");
    }

    #[test]
    fn it_returns_empty_output_for_empty_input() {
        assert_eq!(url_escape_base64(""), "");
        assert_eq!(url_unescape_base64(""), "");
    }

    #[test]
    fn it_uses_lowercase_hex() {
        assert_eq!(url_escape_base64("/"), "%2f");
        assert_eq!(url_escape_base64("+"), "%2b");
        assert_eq!(url_escape_base64("="), "%3d");
    }

    #[test]
    fn it_unescapes_either_hex_case() {
        assert_eq!(url_unescape_base64("%2F%2B%3D"), "/+=");
        assert_eq!(url_unescape_base64("%2f%2b%3d"), "/+=");
    }

    #[test]
    fn it_leaves_unrecognized_escapes_alone() {
        assert_eq!(url_unescape_base64("%20%2c%3"), "%20%2c%3");
    }

    proptest! {
        #[test]
        fn it_roundtrips_arbitrary_base64_alphabet_input(input in "[A-Za-z0-9+/=]{0,256}") {
            prop_assert_eq!(url_unescape_base64(&url_escape_base64(&input)), input);
        }
    }
}
