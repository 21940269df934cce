
use std::sync::{LazyLock, Once};

use crate::highlight::{
    HighlightOptions, HighlightedDocument, LanguageRegistry, Painter, TokenStateMachine, Tokenizer,
};
use crate::text::{SyntaxDocument, TextDocument};

/// Shared registry. Tests that add keywords build their own.
static REGISTRY: LazyLock<LanguageRegistry> = LazyLock::new(LanguageRegistry::with_builtins);

fn setup_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// Tokenizer for `language` that paints raw token categories.
fn raw_tokenizer(language: &str) -> Tokenizer {
    let table = REGISTRY.table(language).unwrap();
    Tokenizer::new(TokenStateMachine::new(table), Painter::Plain)
}

/// Raw token categories of `text` as a syntax summary.
fn scan(language: &str, text: &str) -> String {
    let mut tokenizer = raw_tokenizer(language);
    let mut doc = SyntaxDocument::with_text(text);
    let len = doc.len();
    tokenizer.do_color(&mut doc, len);
    doc.syntax_summary()
}

fn highlighted(language: &str, text: &str, increment: usize) -> HighlightedDocument {
    let options = HighlightOptions::default().with_increment(increment);
    let engine = REGISTRY.create_engine(language, options).unwrap();
    HighlightedDocument::new(SyntaxDocument::with_text(text)).with_engine(engine)
}

/// Painted categories of `text` as a syntax summary.
fn paint(language: &str, text: &str) -> String {
    let mut doc = highlighted(language, text, 1000);
    doc.color_all();
    doc.syntax_summary()
}
