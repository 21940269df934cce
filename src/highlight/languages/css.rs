use super::LanguageSpec;
use super::clike::{block_comment_states, string_states};
use crate::highlight::painter::PaintRule;
use crate::highlight::state_machine::{CharClass, GROUND, StateTable, StateTableBuilder};
use crate::highlight::token::Syntax;

#[rustfmt::skip]
pub const KEYWORDS: &[&str] = &[
    // Properties
    "align-items", "animation", "background", "background-color", "background-image",
    "border", "border-bottom", "border-color", "border-left", "border-radius",
    "border-right", "border-top", "bottom", "box-shadow", "box-sizing", "clear", "color",
    "content", "cursor", "display", "flex", "flex-direction", "float", "font",
    "font-family", "font-size", "font-style", "font-weight", "gap", "grid", "height",
    "justify-content", "left", "letter-spacing", "line-height", "list-style", "margin",
    "margin-bottom", "margin-left", "margin-right", "margin-top", "max-height", "max-width",
    "min-height", "min-width", "opacity", "outline", "overflow", "padding",
    "padding-bottom", "padding-left", "padding-right", "padding-top", "position", "right",
    "text-align", "text-decoration", "text-transform", "top", "transform", "transition",
    "vertical-align", "visibility", "white-space", "width", "z-index",
    // Values
    "absolute", "auto", "block", "bold", "center", "fixed", "hidden", "important",
    "inherit", "initial", "inline", "inline-block", "none", "normal", "relative", "solid",
    "static", "transparent", "unset",
];

fn table() -> StateTable {
    let mut b = StateTableBuilder::new("css");

    let space = b.state("space", Syntax::Whitespace);
    b.on(GROUND, CharClass::Blank, space)
        .on(GROUND, CharClass::Char(b'\n'), space)
        .on(space, CharClass::Blank, space)
        .on(space, CharClass::Char(b'\n'), space);

    for quote in [b'"', b'\''] {
        let string = string_states(&mut b, quote, false, false);
        b.on(GROUND, CharClass::Char(quote), string);
    }

    let slash = b.state("slash", Syntax::Operator);
    let block = block_comment_states(&mut b);
    b.provisional(slash);
    b.on(GROUND, CharClass::Char(b'/'), slash)
        .on(slash, CharClass::Char(b'*'), block);

    // `#id` and `#fff`.
    let hash = b.state("hash", Syntax::Operator);
    let hash_name = b.state("hash_name", Syntax::Identifier);
    b.provisional(hash);
    b.on(GROUND, CharClass::Char(b'#'), hash)
        .on(hash, CharClass::Word, hash_name)
        .on(hash, CharClass::Char(b'-'), hash_name)
        .on(hash_name, CharClass::Word, hash_name)
        .on(hash_name, CharClass::Char(b'-'), hash_name);

    // `@media`, `@import`.
    let at = b.state("at", Syntax::Operator);
    let at_rule = b.state("at_rule", Syntax::Keyword);
    b.provisional(at);
    b.on(GROUND, CharClass::Char(b'@'), at)
        .on(at, CharClass::Alpha, at_rule)
        .on(at, CharClass::Char(b'-'), at_rule)
        .on(at_rule, CharClass::Word, at_rule)
        .on(at_rule, CharClass::Char(b'-'), at_rule);

    let ident = b.state("ident", Syntax::Identifier);
    b.on(GROUND, CharClass::Alpha, ident)
        .on(GROUND, CharClass::Chars(b"_-"), ident)
        .on(ident, CharClass::Word, ident)
        .on(ident, CharClass::Char(b'-'), ident);

    // Digits, then units or `%`.
    let number = b.state("number", Syntax::NumberLiteral);
    b.on(GROUND, CharClass::Digit, number)
        .on(number, CharClass::Word, number)
        .on(number, CharClass::Chars(b".%"), number);

    let operator = b.state("operator", Syntax::Operator);
    b.on(GROUND, CharClass::Chars(b"{}:;,()[]<>+~*=!.|^$&?\\"), operator);

    let other = b.state("other", Syntax::Normal);
    b.otherwise(GROUND, other);
    b.build()
}

#[must_use]
pub fn spec() -> LanguageSpec {
    LanguageSpec {
        id: "css",
        extensions: &["css"],
        build_table: table,
        keywords: KEYWORDS,
        paint: PaintRule::Keyword {
            delimiter: None,
            fold_case: false,
        },
    }
}
