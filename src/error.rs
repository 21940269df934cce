//! Error types for lexcolor.

use std::fmt;
use std::io;

/// Result type alias for lexcolor operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for lexcolor operations.
///
/// Contract violations (out-of-range machine states, empty paint spans,
/// `min`/`max` on an empty set) panic instead of surfacing here.
#[derive(Debug)]
pub enum Error {
    /// I/O error while loading document text.
    Io(io::Error),
    /// No language registered under this id.
    UnknownLanguage(String),
    /// No language registered for this file extension.
    UnknownExtension(String),
    /// A language embeds itself, directly or through another language.
    EmbeddingCycle(String),
    /// Document handle that is not open in the session.
    UnknownDocument(u64),
    /// Syntax category name that does not exist.
    UnknownSyntax(String),
    /// Base64 input whose length is not a multiple of four.
    InvalidBase64Length(usize),
    /// Character outside the base64 alphabet.
    InvalidBase64Char { offset: usize, ch: char },
    /// Misplaced or malformed `=` padding.
    InvalidBase64Padding,
    /// Binary strings only hold code points up to U+00FF.
    NonLatin1Char { offset: usize, ch: char },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnknownLanguage(id) => write!(f, "no highlighter for language: {id}"),
            Self::UnknownExtension(ext) => write!(f, "no highlighter for extension: {ext}"),
            Self::EmbeddingCycle(id) => write!(f, "language {id} embeds itself"),
            Self::UnknownDocument(id) => write!(f, "no open document #{id}"),
            Self::UnknownSyntax(name) => write!(f, "unknown syntax category: {name}"),
            Self::InvalidBase64Length(len) => {
                write!(f, "base64 length {len} is not a multiple of 4")
            }
            Self::InvalidBase64Char { offset, ch } => {
                write!(f, "invalid base64 character {ch:?} at offset {offset}")
            }
            Self::InvalidBase64Padding => write!(f, "invalid base64 padding"),
            Self::NonLatin1Char { offset, ch } => {
                write!(f, "character {ch:?} at offset {offset} is outside Latin-1")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownLanguage("cobol".to_string());
        assert_eq!(err.to_string(), "no highlighter for language: cobol");

        let err = Error::InvalidBase64Length(5);
        assert!(err.to_string().contains("length 5"));

        let err = Error::InvalidBase64Char { offset: 3, ch: '!' };
        assert!(err.to_string().contains("'!' at offset 3"));

        let err = Error::NonLatin1Char {
            offset: 0,
            ch: '\u{3042}',
        };
        assert!(err.to_string().contains("outside Latin-1"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.source().is_some());
        assert!(Error::InvalidBase64Padding.source().is_none());
    }
}
