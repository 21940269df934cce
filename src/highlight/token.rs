//! Syntax categories and tokens.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::Error;

/// Category written onto document characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// Not colored yet.
    #[default]
    None,
    Normal,
    Whitespace,
    Comment,
    StringLiteral,
    NumberLiteral,
    Identifier,
    Keyword,
    Operator,
    Label,

    // Markup
    Content,
    StartTag,
    EndTag,
    Cdata,
    Pi,
    ScriptBody,
    StyleBody,
    HtmlElementName,
    HtmlAttributeName,
    HtmlAttributeValue,
}

impl Syntax {
    pub const ALL: [Self; 20] = [
        Self::None,
        Self::Normal,
        Self::Whitespace,
        Self::Comment,
        Self::StringLiteral,
        Self::NumberLiteral,
        Self::Identifier,
        Self::Keyword,
        Self::Operator,
        Self::Label,
        Self::Content,
        Self::StartTag,
        Self::EndTag,
        Self::Cdata,
        Self::Pi,
        Self::ScriptBody,
        Self::StyleBody,
        Self::HtmlElementName,
        Self::HtmlAttributeName,
        Self::HtmlAttributeValue,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Normal => "normal",
            Self::Whitespace => "whitespace",
            Self::Comment => "comment",
            Self::StringLiteral => "string_literal",
            Self::NumberLiteral => "number_literal",
            Self::Identifier => "identifier",
            Self::Keyword => "keyword",
            Self::Operator => "operator",
            Self::Label => "label",
            Self::Content => "content",
            Self::StartTag => "startTag",
            Self::EndTag => "endTag",
            Self::Cdata => "cdata",
            Self::Pi => "pi",
            Self::ScriptBody => "scriptBody",
            Self::StyleBody => "styleBody",
            Self::HtmlElementName => "html_element_name",
            Self::HtmlAttributeName => "html_attribute_name",
            Self::HtmlAttributeValue => "html_attribute_value",
        }
    }

    /// One-letter code used by token dumps and tests.
    #[must_use]
    pub fn letter(self) -> char {
        match self {
            Self::None => '?',
            Self::Normal => '_',
            Self::HtmlAttributeName => 'a',
            Self::HtmlAttributeValue => 'v',
            Self::HtmlElementName => 'e',
            other => other.as_str().chars().next().unwrap_or('?'),
        }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Syntax {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|syntax| syntax.as_str() == s)
            .ok_or_else(|| Error::UnknownSyntax(s.to_string()))
    }
}

/// A span of characters scanned as one unit by a tokenizer.
///
/// `end_state` is the machine state after the last character, or 0 when an
/// acceptable state completed the token. A non-zero `end_state` means the
/// token may still grow if the text after it changes.
///
/// `start_state` is the machine state just before the first character was
/// fed. Scanning text that reaches `start` in that same state produces this
/// token and everything after it again.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub syntax: Syntax,
    pub start_state: u16,
    pub end_state: u16,
    /// Set while the token's category is still undecided.
    pub provisional: bool,
}

impl Token {
    #[must_use]
    pub fn new(start: usize, end: usize, syntax: Syntax) -> Self {
        debug_assert!(start <= end, "token range must be start <= end");
        Self {
            start,
            end,
            syntax,
            start_state: 0,
            end_state: 0,
            provisional: false,
        }
    }

    /// Search key for ordering by start offset.
    #[must_use]
    pub fn key(start: usize) -> Self {
        Self::new(start, start, Syntax::None)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.end_state == 0
    }

    /// Move the token by `delta` chars.
    #[must_use]
    pub fn shifted(self, delta: isize) -> Self {
        Self {
            start: self.start.saturating_add_signed(delta),
            end: self.end.saturating_add_signed(delta),
            ..self
        }
    }
}
