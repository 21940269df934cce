//! Shared state table for C-family languages.
//!
//! Each language picks its comment, quote and `#` conventions through
//! [`CLikeOptions`]; the token shapes are otherwise the same.

use crate::highlight::state_machine::{CharClass, GROUND, StateId, StateTable, StateTableBuilder};
use crate::highlight::token::Syntax;

const OPERATORS: &[u8] = b"!%&()*+,-./:;<=>?@[\\]^{|}~";

/// Meaning of `#` outside strings and comments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashMode {
    /// `#` plus blanks plus a word is one preprocessor identifier.
    Preprocessor,
    /// `#` starts a comment running to the end of the line.
    LineComment,
    Operator,
}

#[derive(Clone, Copy, Debug)]
pub struct CLikeOptions {
    pub hash: HashMode,
    pub slash_comments: bool,
    pub quotes: &'static [u8],
    /// Quotes whose strings may span lines.
    pub multiline_quotes: &'static [u8],
    /// Python-style `"""` and `'''` strings.
    pub triple_quotes: bool,
    /// `$` is a word character.
    pub dollar: bool,
    /// `a.b.c` is one word.
    pub dotted_words: bool,
}

impl Default for CLikeOptions {
    fn default() -> Self {
        Self {
            hash: HashMode::Operator,
            slash_comments: true,
            quotes: b"\"'",
            multiline_quotes: b"",
            triple_quotes: false,
            dollar: false,
            dotted_words: false,
        }
    }
}

impl CLikeOptions {
    #[must_use]
    pub fn with_hash(mut self, hash: HashMode) -> Self {
        self.hash = hash;
        self
    }

    #[must_use]
    pub fn without_slash_comments(mut self) -> Self {
        self.slash_comments = false;
        self
    }

    #[must_use]
    pub fn with_quotes(mut self, quotes: &'static [u8]) -> Self {
        self.quotes = quotes;
        self
    }

    #[must_use]
    pub fn with_multiline_quotes(mut self, quotes: &'static [u8]) -> Self {
        self.multiline_quotes = quotes;
        self
    }

    #[must_use]
    pub fn with_triple_quotes(mut self) -> Self {
        self.triple_quotes = true;
        self
    }

    #[must_use]
    pub fn with_dollar(mut self) -> Self {
        self.dollar = true;
        self
    }

    #[must_use]
    pub fn with_dotted_words(mut self) -> Self {
        self.dotted_words = true;
        self
    }
}

/// Build the table for one C-family language.
#[must_use]
pub fn table(name: &'static str, options: CLikeOptions) -> StateTable {
    let mut b = StateTableBuilder::new(name);

    let space = b.state("space", Syntax::Whitespace);
    b.on(GROUND, CharClass::Blank, space)
        .on(GROUND, CharClass::Char(b'\n'), space)
        .on(space, CharClass::Blank, space)
        .on(space, CharClass::Char(b'\n'), space);

    for &quote in options.quotes {
        let multiline = options.multiline_quotes.contains(&quote);
        let open = string_states(&mut b, quote, multiline, options.triple_quotes);
        b.on(GROUND, CharClass::Char(quote), open);
    }

    if options.slash_comments {
        let slash = b.state("slash", Syntax::Operator);
        b.provisional(slash);
        b.on(GROUND, CharClass::Char(b'/'), slash);
        let block = block_comment_states(&mut b);
        let line = line_comment_states(&mut b);
        b.on(slash, CharClass::Char(b'*'), block)
            .on(slash, CharClass::Char(b'/'), line);
    }

    match options.hash {
        HashMode::Preprocessor => {
            let hash = b.state("hash", Syntax::Operator);
            let directive = b.state("directive", Syntax::Identifier);
            b.provisional(hash);
            b.on(GROUND, CharClass::Char(b'#'), hash)
                .on(hash, CharClass::Blank, hash)
                .on(hash, CharClass::Alpha, directive)
                .on(hash, CharClass::Char(b'_'), directive)
                .on(directive, CharClass::Word, directive);
        }
        HashMode::LineComment => {
            let line = line_comment_states(&mut b);
            b.on(GROUND, CharClass::Char(b'#'), line);
        }
        HashMode::Operator => {}
    }

    let word = b.state("word", Syntax::Identifier);
    b.on(GROUND, CharClass::Alpha, word)
        .on(GROUND, CharClass::Char(b'_'), word)
        .on(word, CharClass::Word, word);
    if options.dollar {
        b.on(GROUND, CharClass::Char(b'$'), word)
            .on(word, CharClass::Char(b'$'), word);
    }
    if options.dotted_words {
        let dot = b.state("word_dot", Syntax::Identifier);
        b.on(word, CharClass::Char(b'.'), dot)
            .on(dot, CharClass::Alpha, word)
            .on(dot, CharClass::Char(b'_'), word);
        if options.dollar {
            b.on(dot, CharClass::Char(b'$'), word);
        }
    }

    let number = b.state("number", Syntax::NumberLiteral);
    b.on(GROUND, CharClass::Digit, number)
        .on(number, CharClass::Word, number)
        .on(number, CharClass::Char(b'.'), number);

    let operator = b.state("operator", Syntax::Operator);
    b.on(GROUND, CharClass::Chars(OPERATORS), operator)
        .on(GROUND, CharClass::Chars(b"#$`"), operator);

    let other = b.state("other", Syntax::Normal);
    b.otherwise(GROUND, other);
    b.build()
}

/// States for one quote char. Returns the state entered on the opening quote.
pub(super) fn string_states(
    b: &mut StateTableBuilder,
    quote: u8,
    multiline: bool,
    triple: bool,
) -> StateId {
    let body = b.state("string", Syntax::StringLiteral);
    let escape = b.state("string_escape", Syntax::StringLiteral);
    let end = b.state("string_end", Syntax::StringLiteral);
    b.acceptable(end);
    b.on(body, CharClass::Char(quote), end)
        .on(body, CharClass::Char(b'\\'), escape);
    if !multiline {
        b.on(body, CharClass::Char(b'\n'), GROUND);
    }
    b.otherwise(body, body).otherwise(escape, body);
    if !triple {
        return body;
    }

    // `"` then `""` is either an empty string or the start of `"""`.
    let open = b.state("string_open", Syntax::StringLiteral);
    let empty = b.state("string_empty", Syntax::StringLiteral);
    b.on(open, CharClass::Char(quote), empty)
        .on(open, CharClass::Char(b'\\'), escape)
        .on(open, CharClass::Char(b'\n'), GROUND)
        .otherwise(open, body);

    let long = b.state("long_string", Syntax::StringLiteral);
    let long_escape = b.state("long_string_escape", Syntax::StringLiteral);
    let quote1 = b.state("long_string_quote", Syntax::StringLiteral);
    let quote2 = b.state("long_string_quote2", Syntax::StringLiteral);
    let long_end = b.state("long_string_end", Syntax::StringLiteral);
    b.acceptable(long_end);
    b.on(empty, CharClass::Char(quote), long);
    for state in [long, quote1] {
        let next = if state == long { quote1 } else { quote2 };
        b.on(state, CharClass::Char(quote), next)
            .on(state, CharClass::Char(b'\\'), long_escape)
            .otherwise(state, long);
    }
    b.on(quote2, CharClass::Char(quote), long_end)
        .on(quote2, CharClass::Char(b'\\'), long_escape)
        .otherwise(quote2, long)
        .otherwise(long_escape, long);
    open
}

pub(super) fn block_comment_states(b: &mut StateTableBuilder) -> StateId {
    let block = b.state("block_comment", Syntax::Comment);
    let star = b.state("block_comment_star", Syntax::Comment);
    let end = b.state("block_comment_end", Syntax::Comment);
    b.acceptable(end);
    b.on(block, CharClass::Char(b'*'), star)
        .otherwise(block, block)
        .on(star, CharClass::Char(b'*'), star)
        .on(star, CharClass::Char(b'/'), end)
        .otherwise(star, block);
    block
}

/// A comment to the end of the line; a backslash continues it.
pub(super) fn line_comment_states(b: &mut StateTableBuilder) -> StateId {
    let line = b.state("line_comment", Syntax::Comment);
    let escape = b.state("line_comment_escape", Syntax::Comment);
    b.on(line, CharClass::Char(b'\\'), escape)
        .on(line, CharClass::Char(b'\n'), GROUND)
        .otherwise(line, line)
        .otherwise(escape, line);
    line
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::highlight::state_machine::TokenStateMachine;

    fn scan(options: CLikeOptions, text: &str) -> String {
        let mut machine = TokenStateMachine::new(Arc::new(table("test", options)));
        machine
            .scan(text)
            .iter()
            .map(|lexeme| format!("{}{}", lexeme.syntax.letter(), lexeme.range.len()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn operators_are_single_chars() {
        assert_eq!(scan(CLikeOptions::default(), "a+=b"), "i1 o1 o1 i1");
        assert_eq!(scan(CLikeOptions::default(), "x::y"), "i1 o1 o1 i1");
    }

    #[test]
    fn slash_becomes_comment() {
        let options = CLikeOptions::default();
        assert_eq!(scan(options, "a/b"), "i1 o1 i1");
        assert_eq!(scan(options, "/* x */y"), "c7 i1");
        assert_eq!(scan(options, "// x\ny"), "c4 w1 i1");
    }

    #[test]
    fn hash_modes() {
        let preprocessor = CLikeOptions::default().with_hash(HashMode::Preprocessor);
        assert_eq!(scan(preprocessor, "# define X"), "i8 w1 i1");
        let comment = CLikeOptions::default().with_hash(HashMode::LineComment);
        assert_eq!(scan(comment, "x # y\nz"), "i1 w1 c3 w1 i1");
        assert_eq!(scan(CLikeOptions::default(), "#x"), "o1 i1");
    }

    #[test]
    fn strings_stop_at_newline_unless_multiline() {
        let options = CLikeOptions::default();
        assert_eq!(scan(options, "\"a\\\"b\" c"), "s6 w1 i1");
        assert_eq!(scan(options, "'ab\ncd"), "s3 w1 i2");
        let template = CLikeOptions::default().with_multiline_quotes(b"`").with_quotes(b"\"'`");
        assert_eq!(scan(template, "`ab\ncd`"), "s7");
    }

    #[test]
    fn triple_quoted_strings() {
        let python = CLikeOptions::default()
            .with_hash(HashMode::LineComment)
            .without_slash_comments()
            .with_triple_quotes();
        assert_eq!(scan(python, "\"\"\"a\n\"b\"\"\"x"), "s10 i1");
        assert_eq!(scan(python, "'' x"), "s2 w1 i1");
        assert_eq!(scan(python, "'a' x"), "s3 w1 i1");
    }

    #[test]
    fn dotted_words_and_dollar() {
        let js = CLikeOptions::default().with_dollar().with_dotted_words();
        assert_eq!(scan(js, "$a.b_c.d"), "i8");
        assert_eq!(scan(js, "a. b"), "i2 w1 i1");
        assert_eq!(scan(CLikeOptions::default(), "a.b"), "i1 o1 i1");
    }

    #[test]
    fn numbers() {
        assert_eq!(scan(CLikeOptions::default(), "0x1F 3.25e5"), "n4 w1 n6");
    }
}
