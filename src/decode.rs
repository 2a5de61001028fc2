//! Quoted-printable decoding for free-text form fields

use crate::error::DecodeError;
use regex::Regex;

/// `=` at the end of a line or of the input, padding allowed before the break
static SOFT_BREAK_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"=[ \t]*(?:\r?\n|$)").unwrap());

/// Decode a quoted-printable field into readable text.
///
/// Soft line breaks are removed first, then every `=XX` escape is decoded.
/// An `=` that does not start an escape is kept as typed, so plain text such
/// as `2+2=4` passes through. Bytes that are not valid UTF-8 are replaced
/// rather than rejected.
pub fn decode_field(input: &str) -> Result<String, DecodeError> {
    let joined = SOFT_BREAK_REGEX.replace_all(input, "");
    let bytes = decode_escapes(joined.as_bytes())?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn decode_escapes(input: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while let Some(&byte) = input.get(pos) {
        pos += 1;
        if byte != b'=' {
            result.push(byte);
            continue;
        }

        match input.get(pos..pos + 2) {
            Some(&[high, low]) => {
                if let (Some(h), Some(l)) = (hex_value(high), hex_value(low)) {
                    result.push((h << 4) | l);
                    pos += 2;
                    continue;
                }
            }
            _ if pos == input.len() => continue,
            _ => {}
        }

        // A line break can only follow `=` here when it is a bare CR
        if matches!(input[pos], b'\r' | b'\n') {
            return Err(DecodeError(format!(
                "line break after '=' at byte {}: {:?}",
                pos - 1,
                String::from_utf8_lossy(&input[pos - 1..input.len().min(pos + 2)])
            )));
        }
        result.push(b'=');
    }

    Ok(result)
}

/// Lowercase digits are accepted; some senders emit them.
const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(decode_field("Hi there").unwrap(), "Hi there");
    }

    #[test]
    fn soft_breaks_are_joined() {
        assert_eq!(
            decode_field("See you at the st=\nart line").unwrap(),
            "See you at the start line"
        );
        assert_eq!(decode_field("ab=\r\ncd").unwrap(), "abcd");
        assert_eq!(decode_field("ab= \t\ncd").unwrap(), "abcd");
    }

    #[test]
    fn trailing_equals_is_a_soft_break() {
        assert_eq!(decode_field("ends with =").unwrap(), "ends with ");
        assert_eq!(decode_field("ends with =  ").unwrap(), "ends with ");
    }

    #[test]
    fn escapes_decode_to_utf8() {
        assert_eq!(decode_field("Z=C3=BCrich").unwrap(), "Zürich");
        assert_eq!(decode_field("a =3D b").unwrap(), "a = b");
        assert_eq!(decode_field("caf=c3=a9").unwrap(), "café");
    }

    #[test]
    fn non_ascii_input_is_preserved() {
        assert_eq!(decode_field("Łódź").unwrap(), "Łódź");
    }

    #[test]
    fn stray_equals_is_kept_literally() {
        assert_eq!(decode_field("2+2=4, see you").unwrap(), "2+2=4, see you");
        assert_eq!(decode_field("Bike = fixie").unwrap(), "Bike = fixie");
        assert_eq!(decode_field("broken =ZZ escape").unwrap(), "broken =ZZ escape");
        assert_eq!(decode_field("ends with =4").unwrap(), "ends with =4");
        assert_eq!(decode_field("x==3D").unwrap(), "x==");
    }

    #[test]
    fn bare_carriage_return_after_equals_is_an_error() {
        let err = decode_field("broken =\rline").unwrap_err();
        assert!(err.0.contains("byte 7"), "{}", err.0);
    }
}
