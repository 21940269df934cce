//! `lexcolor` - incremental table-driven syntax highlighting
//!
//! Documents are colored a slice at a time from an idle-time scheduler.
//! Each language is a compact state table plus a painter that refines raw
//! tokens (keywords, qualified names, markup tags, embedded languages).
//! After an edit only the text from the change onward is rescanned.
//!
//! ```
//! use lexcolor::highlight::{HighlightOptions, HighlightedDocument, LanguageRegistry};
//! use lexcolor::text::SyntaxDocument;
//!
//! let registry = LanguageRegistry::with_builtins();
//! let engine = registry.create_engine("cpp", HighlightOptions::default()).unwrap();
//! let mut doc = HighlightedDocument::new(SyntaxDocument::with_text("/* abc */ def"))
//!     .with_engine(engine);
//! doc.color_all();
//! assert_eq!(doc.syntax_summary(), "c9 w1 i3");
//! ```

// Crate-level lint configuration
#![allow(clippy::cast_possible_truncation)] // State and class ids are u16/u8 by construction
#![allow(clippy::module_name_repetitions)] // Allow highlight::HighlightEngine etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::items_after_statements)] // Common pattern in tests

pub mod encoding;
pub mod error;
pub mod highlight;
pub mod ordered_set;
pub mod scheduler;
pub mod text;

// Re-export core types at crate root
pub use encoding::{atob, btoa};
pub use error::{Error, Result};
pub use highlight::{
    HighlightEngine, HighlightOptions, HighlightSession, HighlightedDocument, LanguageRegistry,
    Syntax, Token,
};
pub use ordered_set::OrderedSet;
pub use scheduler::{Scheduler, SchedulerOptions, Task, TaskId, TaskStatus};
pub use text::{SyntaxDocument, TextChange, TextDocument};
