//! Documents that carry one syntax category per character.

use std::io;
use std::ops::Range;

use ropey::Rope;

use crate::error::Result;
use crate::highlight::Syntax;

/// The narrow view of a text buffer the highlighter works through.
///
/// Offsets are char indices.
pub trait TextDocument {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Code point at `offset`. Callers stay within `0..len()`.
    fn char_code_at(&self, offset: usize) -> u32;

    fn slice(&self, start: usize, end: usize) -> String;

    /// Tag `start..end` with `syntax`. Requires `start < end`.
    fn set_syntax(&mut self, start: usize, end: usize, syntax: Syntax);

    fn syntax_at(&self, offset: usize) -> Syntax;
}

/// Shape of an edit: how much of the old text survived at each end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextChange {
    /// Unchanged chars at the start.
    pub head_count: usize,
    /// Unchanged chars at the end.
    pub tail_count: usize,
    /// New length minus old length.
    pub delta: isize,
}

/// Rope-backed text with a syntax category per char.
///
/// Categories live in a second rope holding one code char per text char,
/// so edits and repaints cost the same as text edits.
#[derive(Clone, Debug, Default)]
pub struct SyntaxDocument {
    rope: Rope,
    syntax: Rope,
}

fn syntax_code(syntax: Syntax) -> char {
    char::from(b'A' + syntax as u8)
}

fn syntax_from_code(code: char) -> Syntax {
    u8::try_from(code)
        .ok()
        .and_then(|byte| byte.checked_sub(b'A'))
        .and_then(|index| Syntax::ALL.get(usize::from(index)))
        .copied()
        .unwrap_or_default()
}

fn syntax_run(syntax: Syntax, len: usize) -> String {
    std::iter::repeat_n(syntax_code(syntax), len).collect()
}

impl SyntaxDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let syntax = Rope::from_str(&syntax_run(Syntax::None, rope.len_chars()));
        Self { rope, syntax }
    }

    /// Replace the contents with everything `reader` yields.
    pub fn load<R: io::Read>(&mut self, reader: R) -> Result<TextChange> {
        let rope = Rope::from_reader(reader)?;
        Ok(self.swap_rope(rope))
    }

    /// Replace the contents with `text`.
    pub fn set_text(&mut self, text: &str) -> TextChange {
        self.swap_rope(Rope::from_str(text))
    }

    /// Replace `range` with `text`, clamping the range to the document.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> TextChange {
        let old_len = self.rope.len_chars();
        let end = range.end.min(old_len);
        let start = range.start.min(end);

        self.rope.remove(start..end);
        self.rope.insert(start, text);
        let inserted = self.rope.len_chars() + (end - start) - old_len;
        self.syntax.remove(start..end);
        self.syntax.insert(start, &syntax_run(Syntax::None, inserted));

        TextChange {
            head_count: start,
            tail_count: old_len - end,
            delta: signed(inserted) - signed(end - start),
        }
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> TextChange {
        self.replace(offset..offset, text)
    }

    pub fn remove(&mut self, range: Range<usize>) -> TextChange {
        self.replace(range, "")
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    #[must_use]
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Runs of equal syntax, in order.
    #[must_use]
    pub fn syntax_runs(&self) -> Vec<(Syntax, Range<usize>)> {
        let mut runs: Vec<(Syntax, Range<usize>)> = Vec::new();
        for (offset, syntax) in self.syntax().enumerate() {
            match runs.last_mut() {
                Some((last, range)) if *last == syntax => range.end = offset + 1,
                _ => runs.push((syntax, offset..offset + 1)),
            }
        }
        runs
    }

    /// Syntax runs rendered as letter and length pairs, e.g. `c9 w1 i3`.
    #[must_use]
    pub fn syntax_summary(&self) -> String {
        self.syntax_runs()
            .iter()
            .map(|(syntax, range)| format!("{}{}", syntax.letter(), range.len()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Category of every char, in order.
    pub fn syntax(&self) -> impl Iterator<Item = Syntax> + '_ {
        self.syntax.chars().map(syntax_from_code)
    }

    fn swap_rope(&mut self, rope: Rope) -> TextChange {
        let old_len = self.rope.len_chars();
        self.rope = rope;
        let new_len = self.rope.len_chars();
        self.syntax = Rope::from_str(&syntax_run(Syntax::None, new_len));
        TextChange {
            head_count: 0,
            tail_count: 0,
            delta: signed(new_len) - signed(old_len),
        }
    }
}

fn signed(count: usize) -> isize {
    isize::try_from(count).unwrap_or(isize::MAX)
}

impl TextDocument for SyntaxDocument {
    fn len(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_code_at(&self, offset: usize) -> u32 {
        u32::from(self.rope.char(offset))
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.rope.slice(start..end).to_string()
    }

    fn set_syntax(&mut self, start: usize, end: usize, syntax: Syntax) {
        assert!(start < end, "set_syntax needs a non-empty span: {start}..{end}");
        self.syntax.remove(start..end);
        self.syntax.insert(start, &syntax_run(syntax, end - start));
    }

    fn syntax_at(&self, offset: usize) -> Syntax {
        syntax_from_code(self.syntax.char(offset))
    }
}

impl From<&str> for SyntaxDocument {
    fn from(text: &str) -> Self {
        Self::with_text(text)
    }
}
