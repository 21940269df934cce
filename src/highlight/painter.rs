//! Painters turn raw tokens into final syntax categories on the document.
//!
//! Every painter writes every character of the token it is handed. Some
//! painters also repaint earlier tokens (qualified names, labels); those
//! repaints only reach back through the chain of tokens that ends at the
//! token being painted.

use std::ops::Range;

use tracing::debug;

use super::keywords::KeywordSet;
use super::markup_painter::MarkupPainter;
use super::token::{Syntax, Token};
use super::tokenizer::{TokenIndex, Tokenizer};
use crate::text::{TextChange, TextDocument};

/// Tag `start..end`.
///
/// # Panics
///
/// Panics on an empty or reversed span.
pub fn set_syntax<D: TextDocument + ?Sized>(
    doc: &mut D,
    start: usize,
    end: usize,
    syntax: Syntax,
) {
    assert!(start < end, "empty paint span {start}..{end} for {syntax}");
    doc.set_syntax(start, end, syntax);
}

/// Paint a token with its raw category.
pub fn paint_token<D: TextDocument + ?Sized>(doc: &mut D, token: &Token) {
    set_syntax(doc, token.start, token.end, token.syntax);
}

/// How a language refines raw tokens. Registered alongside its table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaintRule {
    Plain,
    Keyword {
        /// Qualified names split at the last occurrence of this char.
        delimiter: Option<char>,
        /// Look words up in lower case.
        fold_case: bool,
    },
    /// `::` qualified names and `name:` labels.
    Scoped,
    /// XML-style tags.
    Markup,
    /// Markup whose raw-text elements hold other languages.
    Composite { embedded: Vec<EmbeddedRule> },
}

/// A raw-text element highlighted by another language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmbeddedRule {
    /// Category the host table gives the element body.
    pub syntax: Syntax,
    /// Element name closing the body, such as `script`.
    pub tag: &'static str,
    /// Language id of the embedded tokenizer.
    pub language: &'static str,
}

#[derive(Debug)]
pub enum Painter {
    Plain,
    Keyword(KeywordPainter),
    Scoped(ScopedPainter),
    Markup(MarkupPainter),
    Composite(Box<CompositePainter>),
}

impl Painter {
    pub fn paint<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        tokens: &TokenIndex,
        token: &Token,
    ) {
        match self {
            Self::Plain => paint_token(doc, token),
            Self::Keyword(painter) => painter.paint(doc, token),
            Self::Scoped(painter) => painter.paint(doc, tokens, token),
            Self::Markup(painter) => painter.paint(doc, token),
            Self::Composite(painter) => painter.paint(doc, token),
        }
    }

    /// False when painting `token` reads or rewrites earlier tokens, so a
    /// token kept across an edit must be painted again once its
    /// predecessors change.
    #[must_use]
    pub fn paints_independently<D: TextDocument + ?Sized>(&self, doc: &D, token: &Token) -> bool {
        match self {
            Self::Scoped(_) => {
                !ScopedPainter::is_colon(doc, token) && !ScopedPainter::is_name(doc, token)
            }
            _ => true,
        }
    }

    pub fn did_change(&mut self, change: TextChange) {
        if let Self::Composite(painter) = self {
            painter.did_change(change);
        }
    }

    pub fn did_load(&mut self) {
        if let Self::Composite(painter) = self {
            painter.did_load();
        }
    }

    pub fn set_verbose(&mut self, level: u8) {
        if let Self::Composite(painter) = self {
            painter.set_verbose(level);
        }
    }

    #[must_use]
    pub fn keywords(&self) -> Option<&KeywordSet> {
        match self {
            Self::Plain => None,
            Self::Keyword(painter) => Some(&painter.keywords),
            Self::Scoped(painter) => Some(&painter.keywords),
            Self::Markup(painter) => Some(painter.keywords()),
            Self::Composite(painter) => Some(painter.host.keywords()),
        }
    }
}

/// Drop blanks after a leading `#`, so `#  if` looks up as `#if`.
fn directive_key(text: &str) -> Option<String> {
    text.starts_with('#')
        .then(|| text.chars().filter(|c| !matches!(c, ' ' | '\t')).collect())
}

/// Classifies identifiers by keyword lookup, splitting dotted names.
#[derive(Debug)]
pub struct KeywordPainter {
    keywords: KeywordSet,
    delimiter: Option<char>,
    fold_case: bool,
}

impl KeywordPainter {
    #[must_use]
    pub fn new(keywords: KeywordSet, delimiter: Option<char>, fold_case: bool) -> Self {
        Self {
            keywords,
            delimiter,
            fold_case,
        }
    }

    fn is_keyword(&self, word: &str) -> bool {
        !word.is_empty() && self.keywords.contains(word)
    }

    pub fn paint<D: TextDocument + ?Sized>(&self, doc: &mut D, token: &Token) {
        if token.syntax != Syntax::Identifier || token.len() == 1 {
            return paint_token(doc, token);
        }
        let text = doc.slice(token.start, token.end);
        let key = match directive_key(&text) {
            Some(key) => key,
            None if self.fold_case => text.to_lowercase(),
            None => text,
        };
        if self.is_keyword(&key) {
            return set_syntax(doc, token.start, token.end, Syntax::Keyword);
        }

        let split = self
            .delimiter
            .filter(|_| key.chars().count() == token.len())
            .and_then(|delimiter| key.rfind(delimiter).map(|at| (delimiter, at)));
        let Some((delimiter, at)) = split else {
            return set_syntax(doc, token.start, token.end, Syntax::Identifier);
        };

        let head = &key[..at];
        let tail = &key[at + delimiter.len_utf8()..];
        let head_end = token.start + head.chars().count();
        let tail_start = head_end + 1;
        if self.is_keyword(tail) || (!tail.is_empty() && self.is_keyword(&key[at..])) {
            if head_end > token.start {
                let syntax = if self.is_keyword(head) {
                    Syntax::Keyword
                } else {
                    Syntax::Identifier
                };
                set_syntax(doc, token.start, head_end, syntax);
            }
            set_syntax(doc, head_end, tail_start, Syntax::Operator);
            set_syntax(doc, tail_start, token.end, Syntax::Keyword);
        } else if self.is_keyword(head) {
            set_syntax(doc, token.start, head_end, Syntax::Keyword);
            set_syntax(doc, head_end, token.end, Syntax::Identifier);
        } else {
            set_syntax(doc, token.start, token.end, Syntax::Identifier);
        }
    }
}

/// C++-style painting: `::` qualified names, labels and directives.
#[derive(Debug)]
pub struct ScopedPainter {
    keywords: KeywordSet,
}

impl ScopedPainter {
    #[must_use]
    pub fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    fn is_colon<D: TextDocument + ?Sized>(doc: &D, token: &Token) -> bool {
        token.syntax == Syntax::Operator
            && token.len() == 1
            && doc.char_code_at(token.start) == u32::from(':')
    }

    fn is_name<D: TextDocument + ?Sized>(doc: &D, token: &Token) -> bool {
        token.syntax == Syntax::Identifier && doc.char_code_at(token.start) != u32::from('#')
    }

    /// Start of the qualified name ending with `name`, including a leading
    /// `::` with no namespace before it.
    fn scope_start<D: TextDocument + ?Sized>(doc: &D, tokens: &TokenIndex, name: &Token) -> usize {
        let mut start = name.start;
        loop {
            let Some(second) = tokens.before(start).filter(|t| Self::is_colon(doc, t)) else {
                return start;
            };
            let Some(first) = tokens.before(second.start).filter(|t| Self::is_colon(doc, t)) else {
                return start;
            };
            match tokens.before(first.start).filter(|t| Self::is_name(doc, t)) {
                Some(namespace) => start = namespace.start,
                None => return first.start,
            }
        }
    }

    fn keyword_or(&self, word: &str, fallback: Syntax) -> Syntax {
        if self.keywords.contains(word) {
            Syntax::Keyword
        } else {
            fallback
        }
    }

    pub fn paint<D: TextDocument + ?Sized>(&self, doc: &mut D, tokens: &TokenIndex, token: &Token) {
        if Self::is_colon(doc, token) {
            return self.paint_colon(doc, tokens, token);
        }
        if token.syntax != Syntax::Identifier {
            return paint_token(doc, token);
        }

        let text = doc.slice(token.start, token.end);
        if let Some(key) = directive_key(&text) {
            let syntax = self.keyword_or(&key, Syntax::Identifier);
            return set_syntax(doc, token.start, token.end, syntax);
        }

        let start = Self::scope_start(doc, tokens, token);
        if start < token.start {
            let qualified = doc.slice(start, token.end);
            if self.keywords.contains(&qualified) {
                return set_syntax(doc, start, token.end, Syntax::Keyword);
            }
            set_syntax(doc, start, token.start, Syntax::Identifier);
        }
        let syntax = self.keyword_or(&text, Syntax::Identifier);
        set_syntax(doc, token.start, token.end, syntax);
    }

    fn paint_colon<D: TextDocument + ?Sized>(
        &self,
        doc: &mut D,
        tokens: &TokenIndex,
        colon: &Token,
    ) {
        match tokens.before(colon.start).copied() {
            Some(name) if Self::is_name(doc, &name) => {
                // name ':' is a label, or a keyword such as `default:`.
                let start = Self::scope_start(doc, tokens, &name);
                let label = format!("{}:", doc.slice(start, name.end));
                let syntax = self.keyword_or(&label, Syntax::Label);
                set_syntax(doc, start, name.end, syntax);
            }
            Some(previous) if Self::is_colon(doc, &previous) => {
                // name '::' stays part of the name.
                if let Some(name) = tokens
                    .before(previous.start)
                    .copied()
                    .filter(|t| Self::is_name(&*doc, t))
                {
                    let start = Self::scope_start(doc, tokens, &name);
                    return set_syntax(doc, start, colon.end, Syntax::Identifier);
                }
                paint_token(doc, &previous);
            }
            _ => {}
        }
        paint_token(doc, colon);
    }
}

/// Markup painting that hands raw-text element bodies to other tokenizers.
#[derive(Debug)]
pub struct CompositePainter {
    host: MarkupPainter,
    embedded: Vec<Embedded>,
}

#[derive(Debug)]
struct Embedded {
    rule: EmbeddedRule,
    tokenizer: Tokenizer,
}

impl CompositePainter {
    #[must_use]
    pub fn new(host: MarkupPainter) -> Self {
        Self {
            host,
            embedded: Vec::new(),
        }
    }

    pub fn embed(&mut self, rule: EmbeddedRule, tokenizer: Tokenizer) {
        self.embedded.push(Embedded { rule, tokenizer });
    }

    /// Embedded tokenizer for bodies of category `syntax`.
    #[must_use]
    pub fn embedded(&self, syntax: Syntax) -> Option<&Tokenizer> {
        self.embedded
            .iter()
            .find(|embedded| embedded.rule.syntax == syntax)
            .map(|embedded| &embedded.tokenizer)
    }

    pub fn paint<D: TextDocument + ?Sized>(&mut self, doc: &mut D, token: &Token) {
        let Some(embedded) = self
            .embedded
            .iter_mut()
            .find(|embedded| embedded.rule.syntax == token.syntax)
        else {
            return self.host.paint(doc, token);
        };

        let text: Vec<char> = doc.slice(token.start, token.end).chars().collect();
        let suffix = raw_text_suffix_len(&text, embedded.rule.tag);
        let body_end = token.end - suffix;
        if body_end > token.start {
            embedded.tokenizer.process(doc, token.start..body_end);
        }
        if suffix > 0 {
            paint_end_tag_suffix(doc, &text[text.len() - suffix..], body_end);
        }
    }

    /// Embedded tokens are dropped from the change onward; bodies are
    /// processed again whenever the host repaints them.
    pub fn did_change(&mut self, change: TextChange) {
        let change = TextChange {
            tail_count: 0,
            ..change
        };
        for embedded in &mut self.embedded {
            embedded.tokenizer.did_change_text_document(change);
        }
    }

    pub fn did_load(&mut self) {
        for embedded in &mut self.embedded {
            embedded.tokenizer.did_load_text_document();
        }
    }

    pub fn set_verbose(&mut self, level: u8) {
        for embedded in &mut self.embedded {
            if level > 0 {
                debug!(language = embedded.rule.language, level, "embedded verbose");
            }
            embedded.tokenizer.set_verbose(level);
        }
    }
}

fn is_tag_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0b' | '\x0c')
}

/// Length of the trailing `</tag ... >` text, complete or partial, that
/// closes a raw-text body.
fn raw_text_suffix_len(text: &[char], tag: &str) -> usize {
    if text.last() == Some(&'<') {
        return 1;
    }
    let Some(at) = text.windows(2).rposition(|pair| pair == ['<', '/']) else {
        return 0;
    };
    let rest = &text[at + 2..];
    let matched = rest
        .iter()
        .zip(tag.chars())
        .take_while(|(c, t)| c.eq_ignore_ascii_case(t))
        .count();
    let remainder = &rest[matched..];
    if remainder.is_empty() {
        return text.len() - at;
    }
    if matched < tag.len() {
        return 0;
    }
    let blanks = remainder.iter().take_while(|c| is_tag_blank(**c)).count();
    match &remainder[blanks..] {
        [] | ['>'] => text.len() - at,
        _ => 0,
    }
}

fn paint_end_tag_suffix<D: TextDocument + ?Sized>(doc: &mut D, suffix: &[char], start: usize) {
    let mut runs: Vec<(Syntax, Range<usize>)> = Vec::new();
    for (index, &c) in suffix.iter().enumerate() {
        let syntax = if index < 2 || c == '>' {
            Syntax::Keyword
        } else if is_tag_blank(c) {
            Syntax::Normal
        } else {
            Syntax::HtmlElementName
        };
        let offset = start + index;
        match runs.last_mut() {
            Some((last, range)) if *last == syntax => range.end = offset + 1,
            _ => runs.push((syntax, offset..offset + 1)),
        }
    }
    for (syntax, range) in runs {
        set_syntax(doc, range.start, range.end, syntax);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::highlight::LanguageRegistry;
    use crate::highlight::languages::markup;
    use crate::text::SyntaxDocument;

    fn chars(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn repainting_gives_the_same_categories() {
        let registry = LanguageRegistry::with_builtins();
        let cases = [
            (
                "cpp",
                "std::vector<int> v; foo::bar: x\n#  include <a>",
                Painter::Scoped(ScopedPainter::new(registry.keywords_for("cpp").unwrap())),
            ),
            (
                "python",
                "import os.path\nos.path.join(a, b.keys())",
                Painter::Keyword(KeywordPainter::new(
                    registry.keywords_for("python").unwrap(),
                    Some('.'),
                    false,
                )),
            ),
            (
                "xml",
                "<x:a b='c' d=\"e>f</x:a><?pi?>",
                Painter::Markup(MarkupPainter::new(
                    registry.keywords_for("xml").unwrap(),
                    Arc::new(markup::tag_table()),
                )),
            ),
        ];
        for (language, text, mut painter) in cases {
            let mut tokenizer = registry.create_tokenizer(language).unwrap();
            let mut doc = SyntaxDocument::with_text(text);
            tokenizer.do_color(&mut doc, usize::MAX);
            let first = doc.syntax_summary();
            for _ in 0..2 {
                for token in tokenizer.tokens().iter() {
                    painter.paint(&mut doc, tokenizer.tokens(), token);
                }
                assert_eq!(doc.syntax_summary(), first, "{language}");
            }
        }
    }

    #[test]
    fn suffix_of_complete_end_tag() {
        assert_eq!(raw_text_suffix_len(&chars("a()</script>"), "script"), 9);
        assert_eq!(raw_text_suffix_len(&chars("a</SCRIPT  >"), "script"), 11);
    }

    #[test]
    fn suffix_of_partial_end_tag() {
        assert_eq!(raw_text_suffix_len(&chars("x<"), "script"), 1);
        assert_eq!(raw_text_suffix_len(&chars("x</"), "script"), 2);
        assert_eq!(raw_text_suffix_len(&chars("x</scr"), "script"), 5);
        assert_eq!(raw_text_suffix_len(&chars("x</script \n"), "script"), 10);
    }

    #[test]
    fn no_suffix_when_tag_differs() {
        assert_eq!(raw_text_suffix_len(&chars("x</b>"), "script"), 0);
        assert_eq!(raw_text_suffix_len(&chars("x</scriptx"), "script"), 0);
        assert_eq!(raw_text_suffix_len(&chars("x</script>y"), "script"), 0);
        assert_eq!(raw_text_suffix_len(&chars("plain"), "style"), 0);
    }

    #[test]
    fn directive_key_strips_blanks() {
        assert_eq!(directive_key("#  if").as_deref(), Some("#if"));
        assert_eq!(directive_key("if"), None);
    }
}
