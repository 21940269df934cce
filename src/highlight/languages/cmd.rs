//! Windows batch files.

use super::LanguageSpec;
use crate::highlight::painter::PaintRule;
use crate::highlight::state_machine::{CharClass, GROUND, StateId, StateTable, StateTableBuilder};
use crate::highlight::token::Syntax;

#[rustfmt::skip]
pub const KEYWORDS: &[&str] = &[
    "assoc", "attrib", "break", "bcdedit", "cacls", "call", "cd", "chcp", "chdir", "chkdsk",
    "chkntfs", "cls", "cmd", "color", "comp", "compact", "convert", "copy", "date", "del",
    "dir", "diskcomp", "diskcopy", "diskpart", "doskey", "driverquery", "echo", "endlocal",
    "erase", "exit", "fc", "find", "findstr", "for", "format", "fsutil", "ftype", "goto",
    "gpresult", "graftabl", "help", "icacls", "if", "label", "md", "mkdir", "mklink", "mode",
    "more", "move", "openfiles", "path", "pause", "popd", "print", "prompt", "pushd", "rd",
    "recover", "rem", "ren", "rename", "replace", "rmdir", "robocopy", "set", "setlocal",
    "sc", "schtasks", "shift", "shutdown", "sort", "start", "subst", "systeminfo",
    "tasklist", "taskkill", "time", "title", "tree", "type", "ver", "verify", "vol", "xcopy",
    "wmic",
    // Operators spelled as words
    "do", "else", "equ", "exist", "geq", "gtr", "in", "leq", "lss", "neq", "not", "nul",
];

/// A run to the end of the line in `syntax`.
fn to_end_of_line(b: &mut StateTableBuilder, name: &'static str, syntax: Syntax) -> StateId {
    let state = b.state(name, syntax);
    b.on(state, CharClass::Char(b'\n'), GROUND).otherwise(state, state);
    state
}

fn table() -> StateTable {
    let mut b = StateTableBuilder::new("cmd");

    let word = b.state("word", Syntax::Identifier);
    let comment = to_end_of_line(&mut b, "comment", Syntax::Comment);

    // Text starts at the beginning of a line.
    let newline = b.state("newline", Syntax::Whitespace);
    let indent = b.state("indent", Syntax::Whitespace);
    let command = b.state("command", Syntax::Operator);
    let space = b.state("space", Syntax::Whitespace);
    b.initial(newline);
    b.on(GROUND, CharClass::Char(b'\n'), newline)
        .on(GROUND, CharClass::Blank, space)
        .on(GROUND, CharClass::Chars(b"@&|("), command)
        .on(space, CharClass::Blank, space);
    for from in [newline, indent, command] {
        b.on(from, CharClass::Blank, indent)
            .on(from, CharClass::Chars(b"@&|("), command);
    }

    // `rem` plus a blank is a comment where a command may start: at the
    // start of a line, after indentation, or after `@`, `&`, `|` and `(`.
    let rem = b.state("rem", Syntax::Identifier);
    b.provisional(rem);
    let chain = b.spell(newline, b"rem", Syntax::Identifier, true, rem);
    for from in [indent, command] {
        b.on(from, CharClass::Chars(b"rR"), chain[0]);
    }
    for state in chain {
        b.provisional(state);
        b.on(state, CharClass::Word, word)
            .on(state, CharClass::Chars(b".-"), word);
    }
    b.on(rem, CharClass::Blank, comment)
        .on(rem, CharClass::Word, word)
        .on(rem, CharClass::Chars(b".-"), word);

    let string = b.state("string", Syntax::StringLiteral);
    let string_end = b.state("string_end", Syntax::StringLiteral);
    b.acceptable(string_end);
    b.on(GROUND, CharClass::Char(b'"'), string)
        .on(string, CharClass::Char(b'"'), string_end)
        .on(string, CharClass::Char(b'\n'), GROUND)
        .otherwise(string, string);

    // `::` and `: ` comments, `:name` labels.
    let colon = b.state("colon", Syntax::Operator);
    let label = to_end_of_line(&mut b, "label", Syntax::Label);
    b.provisional(colon);
    b.on(GROUND, CharClass::Char(b':'), colon)
        .on(colon, CharClass::Char(b':'), comment)
        .on(colon, CharClass::Blank, comment)
        .on(colon, CharClass::Word, label);

    // `%name%`, `%1`, `%*` and `%%i`.
    let percent = b.state("percent", Syntax::Operator);
    let variable = b.state("variable", Syntax::Identifier);
    let variable_end = b.state("variable_end", Syntax::Identifier);
    b.provisional(percent);
    b.acceptable(variable_end);
    b.on(GROUND, CharClass::Char(b'%'), percent)
        .on(percent, CharClass::Digit, variable_end)
        .on(percent, CharClass::Char(b'*'), variable_end)
        .on(percent, CharClass::Char(b'%'), variable)
        .on(percent, CharClass::Word, variable)
        .on(variable, CharClass::Char(b'%'), variable_end)
        .on(variable, CharClass::Word, variable)
        .on(variable, CharClass::Chars(b"~:."), variable);

    // `^` escapes the next char.
    let caret = b.state("caret", Syntax::Normal);
    let escaped = b.state("escaped", Syntax::Normal);
    b.acceptable(escaped);
    b.on(GROUND, CharClass::Char(b'^'), caret)
        .otherwise(caret, escaped);

    b.on(GROUND, CharClass::Word, word)
        .on(word, CharClass::Word, word)
        .on(word, CharClass::Chars(b".-\\"), word);

    let operator = b.state("operator", Syntax::Operator);
    b.on(GROUND, CharClass::Chars(b"<>)=,;!"), operator);

    let other = b.state("other", Syntax::Normal);
    b.otherwise(GROUND, other);
    b.build()
}

#[must_use]
pub fn spec() -> LanguageSpec {
    LanguageSpec {
        id: "cmd",
        extensions: &["cmd", "bat"],
        build_table: table,
        keywords: KEYWORDS,
        paint: PaintRule::Keyword {
            delimiter: None,
            fold_case: true,
        },
    }
}
