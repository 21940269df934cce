//! Incremental tokenizer driving a [`TokenStateMachine`] over a document.
//!
//! The tokenizer keeps every token it has produced in a [`TokenIndex`]
//! ordered by start offset. Everything before `scan_offset` is tokenized and
//! painted. An edit drops every token that reaches past the unchanged head
//! of the document and scanning resumes from the end of the last survivor.
//!
//! Tokens lying wholly inside the unchanged tail of the document are kept
//! as a pending tail, shifted by the edit's delta. When the resumed scan
//! reaches the start of a pending token in the same state the token was
//! started from, the rest of the tail is reused instead of rescanned.
//!
//! Boundary rules, per character:
//!
//! - a raw transition to 0 ends the open token before the character, which
//!   is then fed again from the ground state;
//! - a change of category ends the open token unless that token is still
//!   provisional, in which case it adopts the new category;
//! - an acceptable state ends the token after the character.

use std::fmt::Write as _;
use std::ops::Range;

use tracing::{debug, trace};

use super::painter::Painter;
use super::state_machine::{GROUND, StateId, TokenStateMachine};
use super::token::Token;
use crate::ordered_set::{NodeId, OrderedSet};
use crate::text::{TextChange, TextDocument};

fn starts_before(a: &Token, b: &Token) -> bool {
    a.start < b.start
}

/// Tokens ordered by start offset.
#[derive(Debug)]
pub struct TokenIndex {
    set: OrderedSet<Token>,
}

impl Default for TokenIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenIndex {
    #[must_use]
    pub fn new() -> Self {
        Self {
            set: OrderedSet::with_less(starts_before as fn(&Token, &Token) -> bool),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn insert(&mut self, token: Token) -> NodeId {
        self.set.add(token)
    }

    #[must_use]
    pub fn last(&self) -> Option<&Token> {
        self.set.last().map(|id| self.set.value(id))
    }

    /// Token starting exactly at `start`.
    #[must_use]
    pub fn at(&self, start: usize) -> Option<&Token> {
        self.set.find(&Token::key(start)).map(|id| self.set.value(id))
    }

    /// Last token starting before `start`.
    #[must_use]
    pub fn before(&self, start: usize) -> Option<&Token> {
        let id = match self.set.lower_bound(&Token::key(start)) {
            Some(id) => self.set.previous(id)?,
            None => self.set.last()?,
        };
        Some(self.set.value(id))
    }

    /// First token starting at or after `start`.
    #[must_use]
    pub fn first_from(&self, start: usize) -> Option<&Token> {
        self.set
            .lower_bound(&Token::key(start))
            .map(|id| self.set.value(id))
    }

    /// Tokens starting at or after `start`, in order.
    pub fn iter_from(&self, start: usize) -> impl Iterator<Item = &Token> {
        self.set
            .lower_bound(&Token::key(start))
            .into_iter()
            .flat_map(|id| self.set.values_from(id))
    }

    fn first_ending_after(&self, head: usize) -> Option<NodeId> {
        match self.set.lower_bound(&Token::key(head)) {
            Some(id) => match self.set.previous(id) {
                Some(prev) if self.set.value(prev).end > head => Some(prev),
                _ => Some(id),
            },
            None => self
                .set
                .last()
                .filter(|&last| self.set.value(last).end > head),
        }
    }

    /// Drop every token whose end is past `head`. Returns how many went.
    pub fn truncate_after(&mut self, head: usize) -> usize {
        self.remove_between(head, usize::MAX)
    }

    /// Drop tokens that end past `head` and start before `keep_from`.
    pub fn remove_between(&mut self, head: usize, keep_from: usize) -> usize {
        let mut doomed = Vec::new();
        let mut cursor = self.first_ending_after(head);
        while let Some(id) = cursor {
            if self.set.value(id).start >= keep_from {
                break;
            }
            doomed.push(id);
            cursor = self.set.next(id);
        }
        for &id in &doomed {
            self.set.remove_node(id);
        }
        doomed.len()
    }

    /// Remove the token starting exactly at `start`.
    pub fn remove_at(&mut self, start: usize) -> Option<Token> {
        let id = self.set.find(&Token::key(start))?;
        Some(self.set.remove_node(id))
    }

    /// Move every token starting at or after `from` by `delta`.
    ///
    /// Tokens before `from` must end at or before `from + delta`.
    pub fn shift_from(&mut self, from: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let mut cursor = self.set.lower_bound(&Token::key(from));
        while let Some(id) = cursor {
            let token = self.set.value_mut(id);
            *token = token.shifted(delta);
            cursor = self.set.next(id);
        }
    }

    pub fn clear(&mut self) {
        self.set.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.set.values()
    }
}

/// Turns document text into painted tokens, resuming after edits.
#[derive(Debug)]
pub struct Tokenizer {
    machine: TokenStateMachine,
    painter: Painter,
    tokens: TokenIndex,
    scan_offset: usize,
    /// Pending tokens kept from before an edit. They tile this range, which
    /// never starts before `scan_offset`.
    tail: Option<Range<usize>>,
    /// Document length as of the last scan, tracked through edits.
    doc_len: Option<usize>,
    repaint_pending: bool,
    verbose: u8,
}

impl Tokenizer {
    #[must_use]
    pub fn new(machine: TokenStateMachine, painter: Painter) -> Self {
        Self {
            machine,
            painter,
            tokens: TokenIndex::new(),
            scan_offset: 0,
            tail: None,
            doc_len: None,
            repaint_pending: false,
            verbose: 0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.machine.table().name()
    }

    /// Offset up to which the document is tokenized.
    #[must_use]
    pub fn scan_offset(&self) -> usize {
        self.scan_offset
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenIndex {
        &self.tokens
    }

    /// Range of tokens kept from before the last edit and not yet reached
    /// by the scan.
    #[must_use]
    pub fn pending_tail(&self) -> Option<Range<usize>> {
        self.tail.clone()
    }

    #[must_use]
    pub fn painter(&self) -> &Painter {
        &self.painter
    }

    #[must_use]
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    /// 0 is quiet, 1 logs tokens, 2 also logs every transition.
    pub fn set_verbose(&mut self, level: u8) {
        self.verbose = level;
        self.painter.set_verbose(level);
    }

    #[must_use]
    pub fn is_finished<D: TextDocument + ?Sized>(&self, doc: &D) -> bool {
        self.scan_offset == doc.len() && !self.repaint_pending
    }

    /// Forget tokens the edit may have invalidated and keep the ones in the
    /// unchanged tail for reuse.
    pub fn did_change_text_document(&mut self, change: TextChange) {
        let head = change.head_count;
        let old_len = self.doc_len;
        self.doc_len = old_len.map(|len| len.saturating_add_signed(change.delta));

        let mut removed = 0;
        let untouched = self.tail.as_ref().is_some_and(|tail| tail.end <= head);
        if !untouched {
            let cut = self.tail.as_ref().map_or(head, |tail| head.min(tail.start));
            let kept = self.reusable_tail(old_len, change);
            match kept {
                Some(kept) => {
                    removed = self.tokens.remove_between(cut, kept.start);
                    self.tokens.shift_from(kept.start, change.delta);
                    self.tail = Some(
                        kept.start.saturating_add_signed(change.delta)
                            ..kept.end.saturating_add_signed(change.delta),
                    );
                }
                None => {
                    removed = self.tokens.truncate_after(cut);
                    self.tail = None;
                }
            }
            let scanned = match &self.tail {
                Some(tail) => self.tokens.before(tail.start),
                None => self.tokens.last(),
            };
            self.scan_offset = scanned.map_or(0, |token| token.end);
        }
        self.repaint_pending = true;
        if self.verbose > 0 {
            debug!(
                tokenizer = self.name(),
                head,
                tail = change.tail_count,
                delta = change.delta,
                removed,
                scan_offset = self.scan_offset,
                pending = ?self.tail,
                "did_change"
            );
        }
        self.painter.did_change(change);
    }

    /// Span, in pre-edit offsets, of the tokens lying wholly inside the
    /// unchanged tail of the document.
    fn reusable_tail(&self, old_len: Option<usize>, change: TextChange) -> Option<Range<usize>> {
        let old_len = old_len?;
        if change.tail_count == 0 {
            return None;
        }
        let tail_from = old_len.saturating_sub(change.tail_count).max(change.head_count);
        let (from, end) = match &self.tail {
            Some(tail) => (tail_from.max(tail.start), tail.end),
            None => (tail_from, self.scan_offset),
        };
        let first = self.tokens.first_from(from)?;
        (first.start < end && end <= old_len).then_some(first.start..end)
    }

    /// Forget everything; the document was replaced wholesale.
    pub fn did_load_text_document(&mut self) {
        self.tokens.clear();
        self.scan_offset = 0;
        self.tail = None;
        self.doc_len = None;
        self.repaint_pending = false;
        self.painter.did_load();
    }

    /// Scan at most `hint` characters. Returns how many were scanned.
    ///
    /// Characters covered by a reused tail are not counted, so coloring can
    /// reach the end of the document in fewer than `hint` scanned chars.
    pub fn do_color<D: TextDocument + ?Sized>(&mut self, doc: &mut D, hint: usize) -> usize {
        let len = doc.len();
        self.doc_len = Some(len);
        if self.tail.as_ref().is_some_and(|tail| tail.end > len) {
            self.tokens.truncate_after(self.scan_offset);
            self.tail = None;
        }
        if self.scan_offset > len {
            self.tokens.truncate_after(len);
            self.scan_offset = self.tokens.last().map_or(0, |token| token.end);
        }
        let mut scanned = 0;
        loop {
            let start = self.scan_offset;
            let end = len.min(start.saturating_add(hint - scanned));
            // An edit that only removed trailing text still needs the last
            // token repainted.
            if start >= end && !self.repaint_pending {
                break;
            }
            scanned += self.scan_range(doc, 0, start, end);
            if scanned >= hint {
                break;
            }
        }
        scanned
    }

    /// Tokenize and paint `region` as a self-contained stretch of text.
    ///
    /// Used for embedded languages: tokens past `region.end` are dropped,
    /// and a region that does not continue the previous scan starts fresh
    /// from the ground state at `region.start`.
    pub fn process<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        region: Range<usize>,
    ) -> usize {
        self.doc_len = Some(doc.len());
        if self.scan_offset > region.end {
            self.tokens.truncate_after(region.end);
            self.scan_offset = self.tokens.last().map_or(0, |token| token.end);
        }
        let start = self.scan_offset.max(region.start);
        if start > region.end || (start == region.end && !self.repaint_pending) {
            return 0;
        }
        self.scan_range(doc, region.start, start, region.end)
    }

    /// Tokens as `start..end syntax "text"` lines.
    #[must_use]
    pub fn dump<D: TextDocument + ?Sized>(&self, doc: &D) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} scan_offset={} tokens={}",
            self.name(),
            self.scan_offset,
            self.tokens.len()
        );
        for token in self.tokens.iter() {
            let _ = writeln!(
                out,
                "{}..{} {} {:?} end_state={}",
                token.start,
                token.end,
                token.syntax,
                doc.slice(token.start, token.end),
                token.end_state
            );
        }
        out
    }

    /// Scan `start..end`, or less when a pending tail is reused. Returns how
    /// many characters were fed to the machine.
    fn scan_range<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        floor: usize,
        start: usize,
        end: usize,
    ) -> usize {
        let mut open: Option<Token> = None;
        let fresh = if start == floor {
            self.machine.table().initial()
        } else {
            GROUND
        };
        self.machine.reset_to(fresh);

        let resumable = self
            .tokens
            .before(start)
            .copied()
            .filter(|last| last.end == start && last.end > floor);
        if let Some(last) = resumable {
            if last.is_closed() {
                if self.repaint_pending {
                    self.painter.paint(doc, &self.tokens, &last);
                }
            } else {
                self.tokens.remove_at(last.start);
                self.machine.reset_to(last.end_state);
                open = Some(last);
            }
        }
        self.repaint_pending = false;

        for offset in start..end {
            if self.reuse_tail(doc, offset, &mut open) {
                return offset - start;
            }
            let last_state = self.machine.state();
            let step = self.machine.feed(doc.char_code_at(offset));
            if self.verbose > 1 {
                trace!(
                    offset,
                    from = self.machine.table().state_name(last_state),
                    to = self.machine.table().state_name(step.state),
                    restarted = step.restarted,
                    "transition"
                );
            }
            if step.restarted {
                if let Some(token) = open.take() {
                    self.end_token(doc, token, offset, last_state);
                }
            }

            let syntax = self.machine.syntax_of(step.state);
            let provisional = self.machine.is_provisional(step.state);
            match open.as_mut() {
                Some(token) if token.provisional || token.syntax == syntax => {
                    token.syntax = syntax;
                    token.provisional = provisional;
                }
                _ => {
                    if let Some(token) = open.take() {
                        self.end_token(doc, token, offset, last_state);
                    }
                    let mut token = Token::new(offset, offset, syntax);
                    token.start_state = last_state;
                    token.provisional = provisional;
                    open = Some(token);
                }
            }

            if self.machine.is_acceptable(step.state) {
                if let Some(token) = open.take() {
                    self.end_token(doc, token, offset + 1, GROUND);
                }
                self.machine.reset_to(GROUND);
            }
        }

        if let Some(token) = open {
            let state = self.machine.state();
            self.end_token(doc, token, end, state);
        }
        self.scan_offset = end;
        end - start
    }

    /// Called before feeding `offset`. Returns `true` when the pending tail
    /// starting at `offset` was taken over and scanning can stop.
    fn reuse_tail<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        offset: usize,
        open: &mut Option<Token>,
    ) -> bool {
        let Some(tail) = self.tail.clone() else {
            return false;
        };
        if offset < tail.start {
            return false;
        }
        let state = self.machine.state();
        if tail.start == offset
            && self
                .tokens
                .at(offset)
                .is_some_and(|next| next.start_state == state)
        {
            if let Some(token) = open.take() {
                self.end_token(doc, token, offset, state);
            }
            // Tokens whose paint reads earlier tokens see new neighbours.
            for token in self.tokens.iter_from(offset) {
                if self.painter.paints_independently(doc, token) {
                    break;
                }
                self.painter.paint(doc, &self.tokens, token);
            }
            if self.verbose > 0 {
                debug!(tokenizer = self.name(), offset, reused = ?tail, "reuse tail");
            }
            self.scan_offset = tail.end;
            self.tail = None;
            return true;
        }

        // The scan has moved past this pending token.
        let mut next_start = tail.start;
        while next_start <= offset && next_start < tail.end {
            match self.tokens.remove_at(next_start) {
                Some(token) => next_start = token.end,
                None => break,
            }
        }
        self.tail = (next_start > offset && next_start < tail.end).then_some(next_start..tail.end);
        false
    }

    fn end_token<D: TextDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        mut token: Token,
        end: usize,
        end_state: StateId,
    ) {
        token.end = end;
        token.end_state = end_state;
        if self.verbose > 0 {
            debug!(
                tokenizer = self.name(),
                start = token.start,
                end,
                syntax = %token.syntax,
                end_state,
                "token"
            );
        }
        self.tokens.insert(token);
        self.painter.paint(doc, &self.tokens, &token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::Syntax;

    fn index(spans: &[(usize, usize)]) -> TokenIndex {
        let mut tokens = TokenIndex::new();
        for &(start, end) in spans {
            tokens.insert(Token::new(start, end, Syntax::Normal));
        }
        tokens
    }

    #[test]
    fn truncate_drops_straddling_and_following() {
        let mut tokens = index(&[(0, 3), (3, 5), (5, 9), (9, 10)]);
        assert_eq!(tokens.truncate_after(6), 2);
        assert_eq!(tokens.last().map(|t| t.end), Some(5));
    }

    #[test]
    fn truncate_on_boundary_keeps_token_ending_there() {
        let mut tokens = index(&[(0, 3), (3, 5), (5, 9)]);
        assert_eq!(tokens.truncate_after(5), 1);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.truncate_after(5), 0);
    }

    #[test]
    fn truncate_past_end_is_noop() {
        let mut tokens = index(&[(0, 3)]);
        assert_eq!(tokens.truncate_after(3), 0);
        assert_eq!(tokens.truncate_after(0), 1);
        assert!(tokens.is_empty());
    }

    #[test]
    fn remove_between_keeps_the_tail() {
        let mut tokens = index(&[(0, 3), (3, 5), (5, 9), (9, 10), (10, 12)]);
        assert_eq!(tokens.remove_between(4, 9), 2);
        let starts: Vec<usize> = tokens.iter().map(|t| t.start).collect();
        assert_eq!(starts, [0, 9, 10]);

        tokens.shift_from(9, -4);
        let spans: Vec<(usize, usize)> = tokens.iter().map(|t| (t.start, t.end)).collect();
        assert_eq!(spans, [(0, 3), (5, 6), (6, 8)]);
        assert_eq!(tokens.at(5).map(|t| t.end), Some(6));
        assert_eq!(tokens.iter_from(4).count(), 2);
        assert_eq!(tokens.first_from(7), None);
    }

    #[test]
    fn remove_at_takes_exact_start() {
        let mut tokens = index(&[(0, 3), (3, 5)]);
        assert_eq!(tokens.remove_at(1), None);
        assert_eq!(tokens.remove_at(3).map(|t| t.end), Some(5));
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn before_finds_previous_token() {
        let tokens = index(&[(0, 3), (3, 5), (5, 9)]);
        assert_eq!(tokens.before(5).map(|t| t.start), Some(3));
        assert_eq!(tokens.before(7).map(|t| t.start), Some(5));
        assert_eq!(tokens.before(0), None);
        assert_eq!(tokens.at(3).map(|t| t.end), Some(5));
        assert_eq!(tokens.at(4), None);
    }
}
