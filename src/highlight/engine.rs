//! Per-document highlighting driver.

use tracing::{debug, warn};

use super::tokenizer::{TokenIndex, Tokenizer};
use crate::scheduler::TaskStatus;
use crate::text::{TextChange, TextDocument};

/// Engine settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Characters scanned per scheduled step.
    pub increment: usize,
    /// 0 is quiet, 1 logs tokens, 2 also logs every transition.
    pub verbose: u8,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            increment: 1000,
            verbose: 0,
        }
    }
}

impl HighlightOptions {
    /// Set the step size. Zero is treated as one.
    #[must_use]
    pub fn with_increment(mut self, increment: usize) -> Self {
        self.increment = increment.max(1);
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Where an engine stands relative to its document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnginePhase {
    Detached,
    /// Attached, nothing colored since attaching or the last load.
    Attached,
    /// Part of the document is colored.
    Scanning { scan_offset: usize },
    CaughtUp,
}

/// Colors one document with one language.
#[derive(Debug)]
pub struct HighlightEngine {
    language: &'static str,
    tokenizer: Tokenizer,
    options: HighlightOptions,
    attached: bool,
    /// Set by the first `do_color` after attaching or loading.
    started: bool,
    schedule_pending: bool,
}

impl HighlightEngine {
    #[must_use]
    pub fn new(
        language: &'static str,
        mut tokenizer: Tokenizer,
        options: HighlightOptions,
    ) -> Self {
        tokenizer.set_verbose(options.verbose);
        Self {
            language,
            tokenizer,
            options,
            attached: true,
            started: false,
            schedule_pending: false,
        }
    }

    #[must_use]
    pub fn language(&self) -> &'static str {
        self.language
    }

    #[must_use]
    pub fn options(&self) -> HighlightOptions {
        self.options
    }

    #[must_use]
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenIndex {
        self.tokenizer.tokens()
    }

    #[must_use]
    pub fn verbose(&self) -> u8 {
        self.options.verbose
    }

    pub fn set_verbose(&mut self, level: u8) {
        self.options.verbose = level;
        self.tokenizer.set_verbose(level);
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[must_use]
    pub fn phase<D: TextDocument + ?Sized>(&self, doc: &D) -> EnginePhase {
        if !self.attached {
            return EnginePhase::Detached;
        }
        if self.tokenizer.is_finished(doc) {
            return EnginePhase::CaughtUp;
        }
        if !self.started {
            return EnginePhase::Attached;
        }
        EnginePhase::Scanning {
            scan_offset: self.tokenizer.scan_offset(),
        }
    }

    #[must_use]
    pub fn is_finished<D: TextDocument + ?Sized>(&self, doc: &D) -> bool {
        self.tokenizer.is_finished(doc)
    }

    /// Color up to `hint` more characters. Returns how many were scanned.
    ///
    /// Pass `doc.len()` to color everything at once.
    pub fn do_color<D: TextDocument + ?Sized>(&mut self, doc: &mut D, hint: usize) -> usize {
        if !self.attached {
            warn!(language = self.language, "do_color on a detached engine");
            return 0;
        }
        self.started = true;
        let scanned = self.tokenizer.do_color(doc, hint);
        if self.options.verbose > 0 {
            debug!(
                language = self.language,
                scanned,
                scan_offset = self.tokenizer.scan_offset(),
                len = doc.len(),
                "do_color"
            );
        }
        scanned
    }

    /// One scheduled step of `increment` characters.
    pub fn run<D: TextDocument + ?Sized>(&mut self, doc: &mut D) -> TaskStatus {
        self.do_color(doc, self.options.increment);
        if !self.attached || self.is_finished(doc) {
            self.schedule_pending = false;
            return TaskStatus::Done;
        }
        TaskStatus::Pending
    }

    /// Mark a step as wanted. Returns `true` when the caller should schedule
    /// one, `false` when a scheduled step is already pending.
    pub fn request_schedule(&mut self) -> bool {
        if !self.attached || self.schedule_pending {
            return false;
        }
        self.schedule_pending = true;
        true
    }

    #[must_use]
    pub fn is_schedule_pending(&self) -> bool {
        self.schedule_pending
    }

    pub fn did_change_text_document(&mut self, change: TextChange) {
        if self.attached {
            self.tokenizer.did_change_text_document(change);
        }
    }

    pub fn did_load_text_document(&mut self) {
        if self.attached {
            self.started = false;
            self.tokenizer.did_load_text_document();
        }
    }

    /// Stop coloring for good. Later calls are no-ops.
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        debug!(language = self.language, "detach");
        self.attached = false;
        self.started = false;
        self.schedule_pending = false;
        self.tokenizer.did_load_text_document();
    }

    #[must_use]
    pub fn dump<D: TextDocument + ?Sized>(&self, doc: &D) -> String {
        self.tokenizer.dump(doc)
    }
}
