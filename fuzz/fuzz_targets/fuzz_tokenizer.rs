//! Fuzz target for incremental highlighting.
//!
//! Colors arbitrary text in every built-in language, applies an edit and
//! recolors. Checks that tokens always tile the document.

#![no_main]

use arbitrary::Arbitrary;
use lexcolor::highlight::{HighlightOptions, HighlightedDocument, LanguageRegistry};
use lexcolor::{SyntaxDocument, TaskStatus};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    text: &'a str,
    increment: u8,
    edit_at: u16,
    removed: u8,
    inserted: &'a str,
}

fuzz_target!(|input: Input<'_>| {
    let registry = LanguageRegistry::with_builtins();
    for language in registry.ids() {
        let options = HighlightOptions::default().with_increment(usize::from(input.increment));
        let engine = registry
            .create_engine(language, options)
            .expect("registered language");
        let mut doc =
            HighlightedDocument::new(SyntaxDocument::with_text(input.text)).with_engine(engine);
        doc.run_step();

        let len = doc.len();
        let at = usize::from(input.edit_at).min(len);
        let end = (at + usize::from(input.removed)).min(len);
        doc.replace(at..end, input.inserted);
        while doc.run_step() == TaskStatus::Pending {}

        let mut last_end = 0;
        if let Some(engine) = doc.engine() {
            for token in engine.tokens().iter() {
                assert_eq!(token.start, last_end, "{language}: tokens must tile");
                last_end = token.end;
            }
        }
        assert_eq!(last_end, doc.len(), "{language}: tokens must reach the end");
    }
});
