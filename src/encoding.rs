//! Base64 `atob`/`btoa` over binary strings.
//!
//! A binary string is a `str` whose every char is at most U+00FF; each char
//! stands for one byte. Encoding and decoding go through the `base64`
//! crate's standard padded alphabet.

use base64::DecodeError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};

/// Encode a binary string as padded base64.
///
/// Fails with [`Error::NonLatin1Char`] when a char above U+00FF appears.
pub fn btoa(binary: &str) -> Result<String> {
    let bytes = binary_to_bytes(binary)?;
    Ok(STANDARD.encode(bytes))
}

/// Decode padded base64 into a binary string.
///
/// The input length must be a multiple of four; any character outside the
/// base64 alphabet is rejected with its offset.
pub fn atob(encoded: &str) -> Result<String> {
    if let Some((offset, ch)) = encoded.char_indices().find(|(_, ch)| !ch.is_ascii()) {
        return Err(Error::InvalidBase64Char { offset, ch });
    }
    if encoded.len() % 4 != 0 {
        return Err(Error::InvalidBase64Length(encoded.len()));
    }
    let bytes = STANDARD.decode(encoded).map_err(|err| decode_error(encoded, err))?;
    Ok(bytes_to_binary(&bytes))
}

/// Map each char of a binary string to its byte.
pub fn binary_to_bytes(binary: &str) -> Result<Vec<u8>> {
    binary
        .chars()
        .enumerate()
        .map(|(offset, ch)| {
            u8::try_from(u32::from(ch)).map_err(|_| Error::NonLatin1Char { offset, ch })
        })
        .collect()
}

/// Map each byte to the char with the same code point.
#[must_use]
pub fn bytes_to_binary(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}

fn decode_error(encoded: &str, err: DecodeError) -> Error {
    match err {
        DecodeError::InvalidByte(offset, byte) | DecodeError::InvalidLastSymbol(offset, byte) => {
            if byte == b'=' {
                Error::InvalidBase64Padding
            } else {
                Error::InvalidBase64Char {
                    offset,
                    ch: char::from(byte),
                }
            }
        }
        DecodeError::InvalidLength(_) => Error::InvalidBase64Length(encoded.len()),
        DecodeError::InvalidPadding => Error::InvalidBase64Padding,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_vectors() {
        assert_eq!(btoa("").unwrap(), "");
        assert_eq!(btoa("f").unwrap(), "Zg==");
        assert_eq!(btoa("fo").unwrap(), "Zm8=");
        assert_eq!(btoa("foo").unwrap(), "Zm9v");
        assert_eq!(btoa("foobar").unwrap(), "Zm9vYmFy");
    }

    #[test]
    fn high_latin1_chars_are_single_bytes() {
        assert_eq!(btoa("\u{ff}\u{fe}").unwrap(), "//4=");
        assert_eq!(atob("//4=").unwrap(), "\u{ff}\u{fe}");
    }

    #[test]
    fn round_trips_padded_input() {
        for encoded in ["Zg==", "Zm8=", "Zm9v", "AAECAwQF", "iVBORw0KGgo="] {
            let binary = atob(encoded).unwrap();
            assert_eq!(btoa(&binary).unwrap(), encoded);
        }
    }

    #[test]
    fn rejects_length_not_multiple_of_four() {
        assert!(matches!(atob("Zm9"), Err(Error::InvalidBase64Length(3))));
        assert!(matches!(atob("Zm9vY"), Err(Error::InvalidBase64Length(5))));
    }

    #[test]
    fn rejects_chars_outside_alphabet() {
        match atob("Zm9*") {
            Err(Error::InvalidBase64Char { offset, ch }) => {
                assert_eq!(offset, 3);
                assert_eq!(ch, '*');
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(matches!(
            atob("Zm\u{e9}v"),
            Err(Error::InvalidBase64Char { ch: '\u{e9}', .. })
        ));
    }

    #[test]
    fn rejects_wide_chars_in_binary_string() {
        assert!(matches!(
            btoa("ok\u{100}"),
            Err(Error::NonLatin1Char { offset: 2, .. })
        ));
    }
}
