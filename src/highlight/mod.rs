//! Incremental syntax highlighting.
//!
//! A [`StateTable`] drives a [`TokenStateMachine`] over document chars; the
//! [`Tokenizer`] cuts the stream into tokens and hands each to a [`Painter`],
//! which writes the final [`Syntax`] onto the document. Edits truncate the
//! token index at the change so only text after it is rescanned.

pub mod engine;
pub mod highlighted_document;
pub mod keywords;
pub mod languages;
pub mod markup_painter;
pub mod painter;
pub mod registry;
pub mod session;
pub mod state_machine;
pub mod token;
pub mod tokenizer;

#[cfg(test)]
mod tests;

pub use engine::{EnginePhase, HighlightEngine, HighlightOptions};
pub use highlighted_document::HighlightedDocument;
pub use keywords::KeywordSet;
pub use languages::LanguageSpec;
pub use markup_painter::MarkupPainter;
pub use painter::{
    CompositePainter, EmbeddedRule, KeywordPainter, PaintRule, Painter, ScopedPainter,
};
pub use registry::LanguageRegistry;
pub use session::{DocumentId, HighlightSession, SessionOptions};
pub use state_machine::{
    CharClass, GROUND, Lexeme, StateId, StateTable, StateTableBuilder, Step, TokenStateMachine,
};
pub use token::{Syntax, Token};
pub use tokenizer::{TokenIndex, Tokenizer};
