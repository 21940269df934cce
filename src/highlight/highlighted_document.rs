use std::io;
use std::ops::Range;

use super::engine::{EnginePhase, HighlightEngine};
use super::painter::set_syntax;
use super::token::Syntax;
use crate::error::Result;
use crate::scheduler::TaskStatus;
use crate::text::{SyntaxDocument, TextChange, TextDocument};

/// Text document with syntax highlighting support.
///
/// Wraps a [`SyntaxDocument`] and keeps an optional [`HighlightEngine`] in
/// step with it: every edit made through this type is forwarded to the
/// engine before the next coloring step.
#[derive(Debug, Default)]
pub struct HighlightedDocument {
    doc: SyntaxDocument,
    engine: Option<HighlightEngine>,
}

impl HighlightedDocument {
    #[must_use]
    pub fn new(doc: SyntaxDocument) -> Self {
        Self { doc, engine: None }
    }

    /// Set the engine (builder pattern).
    #[must_use]
    pub fn with_engine(mut self, engine: HighlightEngine) -> Self {
        self.set_engine(Some(engine));
        self
    }

    /// Swap engines. The old one is detached and the syntax cleared.
    pub fn set_engine(&mut self, engine: Option<HighlightEngine>) {
        if let Some(mut old) = self.engine.take() {
            old.detach();
        }
        let len = self.doc.len();
        if len > 0 {
            set_syntax(&mut self.doc, 0, len, Syntax::None);
        }
        self.engine = engine;
    }

    #[must_use]
    pub fn engine(&self) -> Option<&HighlightEngine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut HighlightEngine> {
        self.engine.as_mut()
    }

    #[must_use]
    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    #[must_use]
    pub fn document(&self) -> &SyntaxDocument {
        &self.doc
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.doc.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.doc.text()
    }

    pub fn replace(&mut self, range: Range<usize>, text: &str) -> TextChange {
        let change = self.doc.replace(range, text);
        if let Some(engine) = &mut self.engine {
            engine.did_change_text_document(change);
        }
        change
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> TextChange {
        self.replace(offset..offset, text)
    }

    pub fn remove(&mut self, range: Range<usize>) -> TextChange {
        self.replace(range, "")
    }

    pub fn set_text(&mut self, text: &str) {
        self.doc.set_text(text);
        self.did_load();
    }

    pub fn load<R: io::Read>(&mut self, reader: R) -> Result<()> {
        self.doc.load(reader)?;
        self.did_load();
        Ok(())
    }

    fn did_load(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.did_load_text_document();
        }
    }

    #[must_use]
    pub fn phase(&self) -> EnginePhase {
        self.engine
            .as_ref()
            .map_or(EnginePhase::Detached, |engine| engine.phase(&self.doc))
    }

    /// True when there is nothing left to color.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.engine
            .as_ref()
            .is_none_or(|engine| !engine.is_attached() || engine.is_finished(&self.doc))
    }

    /// Color up to `hint` characters now.
    pub fn do_color(&mut self, hint: usize) -> usize {
        match &mut self.engine {
            Some(engine) => engine.do_color(&mut self.doc, hint),
            None => 0,
        }
    }

    /// Color the whole document now.
    pub fn color_all(&mut self) -> usize {
        let len = self.doc.len();
        self.do_color(len)
    }

    /// One scheduled step.
    pub fn run_step(&mut self) -> TaskStatus {
        match &mut self.engine {
            Some(engine) => engine.run(&mut self.doc),
            None => TaskStatus::Done,
        }
    }

    #[must_use]
    pub fn syntax_summary(&self) -> String {
        self.doc.syntax_summary()
    }

    #[must_use]
    pub fn dump(&self) -> String {
        self.engine
            .as_ref()
            .map_or_else(String::new, |engine| engine.dump(&self.doc))
    }
}
