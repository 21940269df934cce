//! Documents, languages and the idle scheduler wired together.
//!
//! A [`HighlightSession`] is what an editor host holds: it opens documents,
//! forwards edits and colors in the background whenever the host reports an
//! idle moment through [`HighlightSession::run_idle`].

use std::cell::{Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::rc::{Rc, Weak};

use tracing::{debug, info};

use super::engine::{HighlightEngine, HighlightOptions};
use super::highlighted_document::HighlightedDocument;
use super::registry::LanguageRegistry;
use crate::error::{Error, Result};
use crate::scheduler::{Scheduler, SchedulerOptions, Task, TaskStatus};
use crate::text::{SyntaxDocument, TextChange};

/// Session settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionOptions {
    pub highlight: HighlightOptions,
    pub scheduler: SchedulerOptions,
    /// Color the first step synchronously when a document is opened.
    pub color_on_open: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            highlight: HighlightOptions::default(),
            scheduler: SchedulerOptions::default(),
            color_on_open: false,
        }
    }
}

impl SessionOptions {
    #[must_use]
    pub fn with_highlight(mut self, highlight: HighlightOptions) -> Self {
        self.highlight = highlight;
        self
    }

    #[must_use]
    pub fn with_scheduler(mut self, scheduler: SchedulerOptions) -> Self {
        self.scheduler = scheduler;
        self
    }

    #[must_use]
    pub fn with_color_on_open(mut self, color_on_open: bool) -> Self {
        self.color_on_open = color_on_open;
        self
    }
}

/// Handle to a document open in a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Background coloring of one document.
struct ColorTask {
    doc: Weak<RefCell<HighlightedDocument>>,
    name: String,
}

impl Task for ColorTask {
    fn run(&mut self) -> TaskStatus {
        match self.doc.upgrade() {
            Some(doc) => doc.borrow_mut().run_step(),
            None => TaskStatus::Done,
        }
    }

    fn is_valid(&self) -> bool {
        self.doc.upgrade().is_some_and(|doc| {
            doc.borrow()
                .engine()
                .is_some_and(HighlightEngine::is_attached)
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Open documents colored in idle time.
pub struct HighlightSession {
    registry: LanguageRegistry,
    scheduler: Scheduler,
    options: SessionOptions,
    documents: HashMap<DocumentId, Rc<RefCell<HighlightedDocument>>>,
    next_id: u64,
}

impl fmt::Debug for HighlightSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightSession")
            .field("options", &self.options)
            .field("documents", &self.documents.len())
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl Default for HighlightSession {
    fn default() -> Self {
        Self::new(LanguageRegistry::with_builtins())
    }
}

impl HighlightSession {
    #[must_use]
    pub fn new(registry: LanguageRegistry) -> Self {
        Self::with_options(registry, SessionOptions::default())
    }

    #[must_use]
    pub fn with_options(registry: LanguageRegistry, options: SessionOptions) -> Self {
        Self {
            registry,
            scheduler: Scheduler::with_options(options.scheduler),
            options,
            documents: HashMap::new(),
            next_id: 0,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut LanguageRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn options(&self) -> SessionOptions {
        self.options
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Open `text` as a document in `language`.
    pub fn open(&mut self, language: &str, text: &str) -> Result<DocumentId> {
        let engine = self.registry.create_engine(language, self.options.highlight)?;
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        let doc = HighlightedDocument::new(SyntaxDocument::with_text(text)).with_engine(engine);
        let doc = Rc::new(RefCell::new(doc));
        info!(document = %id, language, len = text.chars().count(), "open");

        if self.options.color_on_open {
            doc.borrow_mut().run_step();
        }
        self.documents.insert(id, Rc::clone(&doc));
        self.schedule_color(&doc);
        Ok(id)
    }

    /// Open `text`, choosing the language from a file extension.
    pub fn open_with_extension(&mut self, ext: &str, text: &str) -> Result<DocumentId> {
        let language = self.registry.for_extension(ext)?;
        self.open(language, text)
    }

    fn get(&self, id: DocumentId) -> Result<&Rc<RefCell<HighlightedDocument>>> {
        self.documents
            .get(&id)
            .ok_or(Error::UnknownDocument(id.0))
    }

    pub fn document(&self, id: DocumentId) -> Result<Ref<'_, HighlightedDocument>> {
        self.get(id).map(|doc| doc.borrow())
    }

    #[must_use]
    pub fn is_open(&self, id: DocumentId) -> bool {
        self.documents.contains_key(&id)
    }

    /// Replace `range` with `text` and queue recoloring.
    pub fn edit(&mut self, id: DocumentId, range: Range<usize>, text: &str) -> Result<TextChange> {
        let doc = Rc::clone(self.get(id)?);
        let change = doc.borrow_mut().replace(range, text);
        self.schedule_color(&doc);
        Ok(change)
    }

    /// Switch a document to another language and recolor it from scratch.
    pub fn set_language(&mut self, id: DocumentId, language: &str) -> Result<()> {
        let doc = Rc::clone(self.get(id)?);
        let engine = self.registry.create_engine(language, self.options.highlight)?;
        debug!(document = %id, language, "set_language");

        // A task queued for the old engine keeps driving the document, so the
        // new engine inherits its pending flag instead of queueing another.
        let was_pending = doc
            .borrow()
            .engine()
            .is_some_and(HighlightEngine::is_schedule_pending);
        doc.borrow_mut().set_engine(Some(engine));
        if was_pending {
            if let Some(engine) = doc.borrow_mut().engine_mut() {
                engine.request_schedule();
            }
        } else {
            self.schedule_color(&doc);
        }
        Ok(())
    }

    /// Close a document. Its queued task is dropped when it comes up.
    pub fn close(&mut self, id: DocumentId) -> bool {
        let Some(doc) = self.documents.remove(&id) else {
            return false;
        };
        doc.borrow_mut().set_engine(None);
        debug!(document = %id, "close");
        true
    }

    /// Run one idle tick. Returns how many tasks ran.
    pub fn run_idle(&mut self) -> usize {
        self.scheduler.run_idle_tick()
    }

    /// Tick until nothing is pending or `max_ticks` ticks have run.
    pub fn run_until_idle(&mut self, max_ticks: usize) -> usize {
        self.scheduler.run_until_idle(max_ticks)
    }

    /// Color the rest of a document synchronously.
    pub fn color_now(&mut self, id: DocumentId) -> Result<usize> {
        Ok(self.get(id)?.borrow_mut().color_all())
    }

    fn schedule_color(&mut self, doc: &Rc<RefCell<HighlightedDocument>>) {
        let language = {
            let mut doc = doc.borrow_mut();
            if doc.is_finished() {
                return;
            }
            let Some(engine) = doc.engine_mut() else {
                return;
            };
            if !engine.request_schedule() {
                return;
            }
            engine.language()
        };
        self.scheduler.schedule(
            Box::new(ColorTask {
                doc: Rc::downgrade(doc),
                name: format!("color {language}"),
            }),
            0,
        );
    }
}
