//! XML and HTML, plus the table that splits tag interiors.
//!
//! The document tables keep each tag, comment, CDATA section and processing
//! instruction as one token. HTML additionally keeps the raw text of
//! `<script>` and `<style>` elements, up to and including the closing tag,
//! as one body token for the embedded language.

use super::LanguageSpec;
use crate::highlight::painter::{EmbeddedRule, PaintRule};
use crate::highlight::state_machine::{CharClass, GROUND, StateId, StateTable, StateTableBuilder};
use crate::highlight::token::Syntax;

pub const KEYWORDS: &[&str] = &["xi:include", "xml:base", "xml:lang", "xmlns:", "xml:space"];

const NAME_CHARS: &[u8] = b"-.:";

/// Splits a tag interior: names are identifiers, `=` an operator, quoted
/// values string literals, blanks whitespace.
#[must_use]
pub fn tag_table() -> StateTable {
    let mut b = StateTableBuilder::new("xmltag");

    let name = b.state("name", Syntax::Identifier);
    b.on(GROUND, CharClass::Word, name)
        .on(GROUND, CharClass::Chars(NAME_CHARS), name)
        .on(name, CharClass::Word, name)
        .on(name, CharClass::Chars(NAME_CHARS), name);

    let equal = b.state("equal", Syntax::Operator);
    b.on(GROUND, CharClass::Char(b'='), equal);

    for quote in [b'"', b'\''] {
        let value = b.state("value", Syntax::StringLiteral);
        let value_end = b.state("value_end", Syntax::StringLiteral);
        b.acceptable(value_end);
        b.on(GROUND, CharClass::Char(quote), value)
            .on(value, CharClass::Char(quote), value_end)
            .otherwise(value, value);
    }

    let space = b.state("space", Syntax::Whitespace);
    b.on(GROUND, CharClass::Blank, space)
        .on(GROUND, CharClass::Char(b'\n'), space)
        .on(space, CharClass::Blank, space)
        .on(space, CharClass::Char(b'\n'), space);

    let other = b.state("other", Syntax::Normal);
    b.otherwise(GROUND, other);
    b.build()
}

/// States shared by the XML and HTML tables.
struct Markup {
    lt: StateId,
    start_tag: StateId,
    tag_end: StateId,
    tag_dq: StateId,
    tag_sq: StateId,
}

impl Markup {
    fn declare(b: &mut StateTableBuilder) -> Self {
        let content = b.state("content", Syntax::Content);
        let lt = b.state("lt", Syntax::Content);
        b.provisional(lt);
        b.on(GROUND, CharClass::Char(b'<'), lt)
            .otherwise(GROUND, content)
            .on(content, CharClass::Char(b'<'), GROUND)
            .otherwise(content, content);

        let start_tag = b.state("start_tag", Syntax::StartTag);
        let tag_end = b.state("start_tag_end", Syntax::StartTag);
        let tag_dq = b.state("start_tag_dq", Syntax::StartTag);
        let tag_sq = b.state("start_tag_sq", Syntax::StartTag);
        b.acceptable(tag_end);
        b.on(tag_dq, CharClass::Char(b'"'), start_tag)
            .otherwise(tag_dq, tag_dq)
            .on(tag_sq, CharClass::Char(b'\''), start_tag)
            .otherwise(tag_sq, tag_sq);

        let markup = Self {
            lt,
            start_tag,
            tag_end,
            tag_dq,
            tag_sq,
        };
        markup.inside_tag(b, start_tag);
        markup
    }

    /// Rules for any state inside a start tag; `state` is left otherwise.
    fn inside_tag(&self, b: &mut StateTableBuilder, state: StateId) {
        b.on(state, CharClass::Char(b'>'), self.tag_end)
            .on(state, CharClass::Char(b'"'), self.tag_dq)
            .on(state, CharClass::Char(b'\''), self.tag_sq)
            .on(state, CharClass::Char(b'<'), GROUND);
        if state == self.start_tag {
            b.otherwise(state, state);
        } else {
            b.otherwise(state, self.start_tag);
        }
    }

    /// Everything after `<` other than start tags.
    fn declare_rest(&self, b: &mut StateTableBuilder) {
        let lt = self.lt;

        let end_tag = b.state("end_tag", Syntax::EndTag);
        let end_tag_end = b.state("end_tag_end", Syntax::EndTag);
        b.acceptable(end_tag_end);
        b.on(end_tag, CharClass::Char(b'>'), end_tag_end)
            .on(end_tag, CharClass::Char(b'<'), GROUND)
            .otherwise(end_tag, end_tag);

        // `<!DOCTYPE ...>` and friends.
        let decl = b.state("decl", Syntax::Keyword);
        let decl_end = b.state("decl_end", Syntax::Keyword);
        b.acceptable(decl_end);
        b.on(decl, CharClass::Char(b'>'), decl_end)
            .otherwise(decl, decl);

        let bang = b.state("bang", Syntax::Keyword);
        let bang_dash = b.state("bang_dash", Syntax::Keyword);
        b.provisional(bang).provisional(bang_dash);

        let comment = b.state("comment", Syntax::Comment);
        let comment_dash = b.state("comment_dash", Syntax::Comment);
        let comment_dash2 = b.state("comment_dash2", Syntax::Comment);
        let comment_end = b.state("comment_end", Syntax::Comment);
        b.acceptable(comment_end);
        b.on(comment, CharClass::Char(b'-'), comment_dash)
            .otherwise(comment, comment)
            .on(comment_dash, CharClass::Char(b'-'), comment_dash2)
            .otherwise(comment_dash, comment)
            .on(comment_dash2, CharClass::Char(b'>'), comment_end)
            .on(comment_dash2, CharClass::Char(b'-'), comment_dash2)
            .otherwise(comment_dash2, comment);

        let cdata = b.state("cdata", Syntax::Cdata);
        let cdata_bracket = b.state("cdata_bracket", Syntax::Cdata);
        let cdata_bracket2 = b.state("cdata_bracket2", Syntax::Cdata);
        let cdata_end = b.state("cdata_end", Syntax::Cdata);
        b.acceptable(cdata_end);
        b.on(cdata, CharClass::Char(b']'), cdata_bracket)
            .otherwise(cdata, cdata)
            .on(cdata_bracket, CharClass::Char(b']'), cdata_bracket2)
            .otherwise(cdata_bracket, cdata)
            .on(cdata_bracket2, CharClass::Char(b'>'), cdata_end)
            .on(cdata_bracket2, CharClass::Char(b']'), cdata_bracket2)
            .otherwise(cdata_bracket2, cdata);

        // Rules in match order: the CDATA opener first.
        let opener = b.spell(bang, b"[CDATA[", Syntax::Cdata, false, cdata);
        for state in opener {
            b.provisional(state);
            b.on(state, CharClass::Char(b'>'), decl_end)
                .otherwise(state, decl);
        }
        b.on(bang, CharClass::Char(b'-'), bang_dash)
            .on(bang, CharClass::Char(b'>'), decl_end)
            .otherwise(bang, decl)
            .on(bang_dash, CharClass::Char(b'-'), comment)
            .on(bang_dash, CharClass::Char(b'>'), decl_end)
            .otherwise(bang_dash, decl);

        let pi = b.state("pi", Syntax::Pi);
        let pi_question = b.state("pi_question", Syntax::Pi);
        let pi_end = b.state("pi_end", Syntax::Pi);
        b.acceptable(pi_end);
        b.on(pi, CharClass::Char(b'?'), pi_question)
            .otherwise(pi, pi)
            .on(pi_question, CharClass::Char(b'>'), pi_end)
            .on(pi_question, CharClass::Char(b'?'), pi_question)
            .otherwise(pi_question, pi);

        b.on(lt, CharClass::Alpha, self.start_tag)
            .on(lt, CharClass::Chars(b"_:"), self.start_tag)
            .on(lt, CharClass::Char(b'/'), end_tag)
            .on(lt, CharClass::Char(b'!'), bang)
            .on(lt, CharClass::Char(b'?'), pi)
            .on(lt, CharClass::Char(b'<'), GROUND);
    }

    /// `<tag ...>` followed by raw text in `body` up to `</tag>`.
    ///
    /// `from` is the state reached after `<` and the first letters of `tag`;
    /// `rest` spells the remaining letters.
    fn raw_text_element(
        &self,
        b: &mut StateTableBuilder,
        from: StateId,
        rest: &'static [u8],
        tag: &'static [u8],
        body: Syntax,
    ) {
        let name = b.state("raw_tag_name", Syntax::StartTag);
        let attrs = b.state("raw_tag_attrs", Syntax::StartTag);
        let attrs_dq = b.state("raw_tag_attrs_dq", Syntax::StartTag);
        let attrs_sq = b.state("raw_tag_attrs_sq", Syntax::StartTag);
        // Not acceptable: the body starts in a state that knows the tag.
        let open_end = b.state("raw_tag_end", Syntax::StartTag);

        let chain = b.spell(from, rest, Syntax::StartTag, true, name);
        for state in chain {
            self.inside_tag(b, state);
        }
        b.on(name, CharClass::Blank, attrs)
            .on(name, CharClass::Char(b'\n'), attrs)
            .on(name, CharClass::Char(b'>'), open_end)
            .on(name, CharClass::Char(b'<'), GROUND)
            .otherwise(name, self.start_tag);
        b.on(attrs, CharClass::Char(b'>'), open_end)
            .on(attrs, CharClass::Char(b'"'), attrs_dq)
            .on(attrs, CharClass::Char(b'\''), attrs_sq)
            .on(attrs, CharClass::Char(b'<'), GROUND)
            .otherwise(attrs, attrs)
            .on(attrs_dq, CharClass::Char(b'"'), attrs)
            .otherwise(attrs_dq, attrs_dq)
            .on(attrs_sq, CharClass::Char(b'\''), attrs)
            .otherwise(attrs_sq, attrs_sq);

        let text = b.state("raw_text", body);
        let lt = b.state("raw_text_lt", body);
        let slash = b.state("raw_text_slash", body);
        let close_name = b.state("raw_text_close_name", body);
        let close_space = b.state("raw_text_close_space", body);
        let close = b.state("raw_text_close", body);
        b.acceptable(close);

        let closing = b.spell(slash, tag, body, true, close_name);
        for state in closing {
            b.on(state, CharClass::Char(b'<'), lt).otherwise(state, text);
        }
        for state in [open_end, text] {
            b.on(state, CharClass::Char(b'<'), lt).otherwise(state, text);
        }
        b.on(lt, CharClass::Char(b'/'), slash)
            .on(lt, CharClass::Char(b'<'), lt)
            .otherwise(lt, text)
            .on(slash, CharClass::Char(b'<'), lt)
            .otherwise(slash, text);
        for state in [close_name, close_space] {
            b.on(state, CharClass::Blank, close_space)
                .on(state, CharClass::Char(b'\n'), close_space)
                .on(state, CharClass::Char(b'>'), close)
                .on(state, CharClass::Char(b'<'), lt)
                .otherwise(state, text);
        }
    }
}

fn xml_table() -> StateTable {
    let mut b = StateTableBuilder::new("xml");
    let markup = Markup::declare(&mut b);
    markup.declare_rest(&mut b);
    b.build()
}

fn html_table() -> StateTable {
    let mut b = StateTableBuilder::new("html");
    let markup = Markup::declare(&mut b);

    // `<s` may begin `<script` or `<style`. Spelled rules precede the
    // generic `<name` rule added by `declare_rest`.
    let s = b.state("tag_s", Syntax::StartTag);
    b.spell(markup.lt, b"s", Syntax::StartTag, true, s);
    markup.raw_text_element(&mut b, s, b"cript", b"script", Syntax::ScriptBody);
    markup.raw_text_element(&mut b, s, b"tyle", b"style", Syntax::StyleBody);
    markup.inside_tag(&mut b, s);

    markup.declare_rest(&mut b);
    b.build()
}

#[must_use]
pub fn xml() -> LanguageSpec {
    LanguageSpec {
        id: "xml",
        extensions: &["xml", "xsl", "xslt", "xsd", "svg", "plist", "vcxproj", "csproj"],
        build_table: xml_table,
        keywords: KEYWORDS,
        paint: PaintRule::Markup,
    }
}

#[must_use]
pub fn html() -> LanguageSpec {
    LanguageSpec {
        id: "html",
        extensions: &["html", "htm", "xhtml"],
        build_table: html_table,
        keywords: KEYWORDS,
        paint: PaintRule::Composite {
            embedded: vec![
                EmbeddedRule {
                    syntax: Syntax::ScriptBody,
                    tag: "script",
                    language: "javascript",
                },
                EmbeddedRule {
                    syntax: Syntax::StyleBody,
                    tag: "style",
                    language: "css",
                },
            ],
        },
    }
}
