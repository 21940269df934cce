//! Text storage consumed by the highlighter.
//!
//! The highlighter only needs char access, slicing and per-char syntax
//! tagging, expressed by [`TextDocument`]. [`SyntaxDocument`] is the
//! rope-backed implementation used by sessions and tests.
//!
//! # Examples
//!
//! ```
//! use lexcolor::text::{SyntaxDocument, TextDocument};
//!
//! let mut doc = SyntaxDocument::with_text("Hello, world!");
//! let change = doc.replace(7..12, "rope");
//! assert_eq!(doc.text(), "Hello, rope!");
//! assert_eq!(change.head_count, 7);
//! assert_eq!(doc.len(), 12);
//! ```

mod document;

pub use document::{SyntaxDocument, TextChange, TextDocument};
