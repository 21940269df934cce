//! Painting for XML-style markup tokens.
//!
//! The markup tables produce one token per tag, comment, CDATA section or
//! processing instruction. Tags are taken apart again with a small tag
//! machine that splits names, `=`, quoted values and blanks.

use std::sync::Arc;

use super::keywords::KeywordSet;
use super::painter::{paint_token, set_syntax};
use super::state_machine::{StateTable, TokenStateMachine};
use super::token::{Syntax, Token};
use crate::text::TextDocument;

const CDATA_OPEN: usize = "<![CDATA[".len();
const CDATA_CLOSE: &str = "]]>";

#[derive(Debug)]
pub struct MarkupPainter {
    keywords: KeywordSet,
    tag_machine: TokenStateMachine,
}

/// Walk state while painting the inside of one tag.
struct TagWalk {
    expect_name: bool,
    last: Option<Syntax>,
}

impl MarkupPainter {
    /// `tag_table` splits tag interiors: identifiers for names, operators
    /// for `=`, string literals for quoted values.
    #[must_use]
    pub fn new(keywords: KeywordSet, tag_table: Arc<StateTable>) -> Self {
        Self {
            keywords,
            tag_machine: TokenStateMachine::new(tag_table),
        }
    }

    #[must_use]
    pub fn keywords(&self) -> &KeywordSet {
        &self.keywords
    }

    pub fn paint<D: TextDocument + ?Sized>(&mut self, doc: &mut D, token: &Token) {
        match token.syntax {
            Syntax::StartTag => self.paint_start_tag(doc, token),
            Syntax::EndTag => paint_end_tag(doc, token),
            Syntax::Pi => self.paint_pi(doc, token),
            Syntax::Cdata => paint_cdata(doc, token),
            Syntax::Content => set_syntax(doc, token.start, token.end, Syntax::Normal),
            _ => paint_token(doc, token),
        }
    }

    fn paint_start_tag<D: TextDocument + ?Sized>(&mut self, doc: &mut D, token: &Token) {
        let (start, end) = (token.start, token.end);
        set_syntax(doc, start, start + 1, Syntax::Keyword);
        if token.len() == 1 {
            return;
        }
        if doc.char_code_at(end - 1) != u32::from('>') {
            return self.paint_tag(doc, start + 1, end);
        }
        if token.len() >= 3 && doc.char_code_at(end - 2) == u32::from('/') {
            set_syntax(doc, end - 2, end, Syntax::Keyword);
            return self.paint_tag(doc, start + 1, end - 2);
        }
        set_syntax(doc, end - 1, end, Syntax::Keyword);
        self.paint_tag(doc, start + 1, end - 1);
    }

    fn paint_pi<D: TextDocument + ?Sized>(&mut self, doc: &mut D, token: &Token) {
        let (start, end) = (token.start, token.end);
        let content_start = (start + 2).min(end);
        set_syntax(doc, start, content_start, Syntax::Keyword);
        let closed = token.len() >= 4 && doc.slice(end - 2, end) == "?>";
        let content_end = if closed { end - 2 } else { end };
        if closed {
            set_syntax(doc, content_end, end, Syntax::Keyword);
        }
        self.paint_tag(doc, content_start, content_end);
    }

    /// Paint a tag interior: the name, then attributes and values.
    fn paint_tag<D: TextDocument + ?Sized>(&mut self, doc: &mut D, start: usize, end: usize) {
        if start >= end {
            return;
        }
        let text = doc.slice(start, end);
        let mut walk = TagWalk {
            expect_name: true,
            last: None,
        };
        for lexeme in self.tag_machine.scan(&text) {
            let (from, to) = (start + lexeme.range.start, start + lexeme.range.end);
            match lexeme.syntax {
                Syntax::Identifier if walk.expect_name => {
                    walk.expect_name = false;
                    self.paint_name(doc, from, to, Syntax::HtmlElementName);
                }
                Syntax::Identifier if walk.last == Some(Syntax::Operator) => {
                    set_syntax(doc, from, to, Syntax::HtmlAttributeValue);
                }
                Syntax::Identifier => self.paint_name(doc, from, to, Syntax::HtmlAttributeName),
                Syntax::Operator => set_syntax(doc, from, to, Syntax::Keyword),
                Syntax::StringLiteral => paint_quoted(doc, from, to),
                _ => set_syntax(doc, from, to, Syntax::Normal),
            }
            if lexeme.syntax != Syntax::Whitespace {
                walk.last = Some(lexeme.syntax);
            }
        }
    }

    /// Keyword if the whole name is known; `prefix:` split when the
    /// namespace prefix is known; `fallback` otherwise.
    fn paint_name<D: TextDocument + ?Sized>(
        &self,
        doc: &mut D,
        start: usize,
        end: usize,
        fallback: Syntax,
    ) {
        let name = doc.slice(start, end);
        if self.keywords.contains(&name) {
            return set_syntax(doc, start, end, Syntax::Keyword);
        }
        let Some(colon) = name.find(':').filter(|&colon| colon > 0) else {
            return set_syntax(doc, start, end, fallback);
        };
        let known =
            self.keywords.contains(&name[..colon]) || self.keywords.contains(&name[..=colon]);
        if !known {
            return set_syntax(doc, start, end, fallback);
        }
        let prefix_end = start + name[..=colon].chars().count();
        set_syntax(doc, start, prefix_end, Syntax::Keyword);
        if prefix_end < end {
            set_syntax(doc, prefix_end, end, fallback);
        }
    }
}

fn paint_end_tag<D: TextDocument + ?Sized>(doc: &mut D, token: &Token) {
    let (start, end) = (token.start, token.end);
    let name_start = (start + 2).min(end);
    set_syntax(doc, start, name_start, Syntax::Keyword);
    if name_start == end {
        return;
    }
    if doc.char_code_at(end - 1) != u32::from('>') {
        return set_syntax(doc, name_start, end, Syntax::HtmlElementName);
    }
    if name_start < end - 1 {
        set_syntax(doc, name_start, end - 1, Syntax::HtmlElementName);
    }
    set_syntax(doc, end - 1, end, Syntax::Keyword);
}

fn paint_cdata<D: TextDocument + ?Sized>(doc: &mut D, token: &Token) {
    let (start, end) = (token.start, token.end);
    let content_start = (start + CDATA_OPEN).min(end);
    set_syntax(doc, start, content_start, Syntax::Keyword);
    if content_start == end {
        return;
    }
    let closed = token.len() >= CDATA_OPEN + CDATA_CLOSE.len()
        && doc.slice(end - CDATA_CLOSE.len(), end) == CDATA_CLOSE;
    let content_end = if closed { end - CDATA_CLOSE.len() } else { end };
    if content_start < content_end {
        set_syntax(doc, content_start, content_end, Syntax::StringLiteral);
    }
    if closed {
        set_syntax(doc, content_end, end, Syntax::Keyword);
    }
}

/// Quotes are keywords and the text between them a value. A value whose
/// closing quote is missing runs to the end of the span.
fn paint_quoted<D: TextDocument + ?Sized>(doc: &mut D, start: usize, end: usize) {
    set_syntax(doc, start, start + 1, Syntax::Keyword);
    if end - start <= 1 {
        return;
    }
    if doc.char_code_at(start) != doc.char_code_at(end - 1) {
        return set_syntax(doc, start + 1, end, Syntax::HtmlAttributeValue);
    }
    set_syntax(doc, end - 1, end, Syntax::Keyword);
    if end - start > 2 {
        set_syntax(doc, start + 1, end - 1, Syntax::HtmlAttributeValue);
    }
}
