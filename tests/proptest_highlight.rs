//! Property-based tests for incremental highlighting and base64 helpers.
//!
//! Uses proptest to verify invariants that must hold across all inputs:
//! tokens tile the document, recoloring after edits agrees with coloring
//! from scratch, and `atob`/`btoa` invert each other on binary strings.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use lexcolor::encoding::{binary_to_bytes, bytes_to_binary};
use lexcolor::highlight::{HighlightOptions, HighlightedDocument, LanguageRegistry};
use lexcolor::{SyntaxDocument, TaskStatus, atob, btoa};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Source-like text: identifiers, numbers, quotes, comment and tag openers.
fn source_text() -> impl Strategy<Value = String> {
    "[a-z0-9 _.:;#/*<>=\"'!?%@`(){}\\[\\]\n-]{0,60}"
}

/// Pieces that open and close the multi-char constructs of every language.
const FRAGMENTS: &[&str] = &[
    "<script>", "</script>", "</SCRIPT >", "<style>", "</style>", "<p a='b'>", "</p>",
    "<!-- ", " -->", "<![CDATA[", "]]>", "<?x ", "?>", "/*", "*/", "//", "#", "\n", " ",
    "\t", "foo::bar:", "::", "a::b", "#if", "#  include", "default:", "case 1:", "\"",
    "'", "`", "'''", "\"\"\"", "\\", "rem ", "@", "&", "%x%", "x.y", "f(1);", "{",
    "}", "0x1f", "\u{e9}", "\u{4e2d}",
];

/// Text stitched together from [`FRAGMENTS`].
fn fragment_text(max: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..max).prop_map(|parts| parts.concat())
}

/// Random characters, fragments, or fragments repeated into a longer text.
fn mixed_text() -> impl Strategy<Value = String> {
    prop_oneof![
        source_text(),
        fragment_text(12),
        fragment_text(8).prop_map(|text| text.repeat(4)),
    ]
}

/// Any built-in language id.
fn language() -> impl Strategy<Value = &'static str> {
    prop::sample::select(LanguageRegistry::with_builtins().ids())
}

/// Arbitrary text including non-ASCII chars.
fn any_text() -> impl Strategy<Value = String> {
    "\\PC{0,60}"
}

/// Strings whose chars all fit in one byte.
fn binary_string() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), 0..64)
        .prop_map(|bytes| bytes.into_iter().map(char::from).collect())
}

/// An edit as fractions of the current length, so it always lands in range.
#[derive(Clone, Debug)]
struct Edit {
    at: f64,
    removed: usize,
    inserted: String,
    /// Coloring steps run before the edit is applied.
    steps_before: usize,
}

fn edit() -> impl Strategy<Value = Edit> {
    let inserted = prop_oneof![source_text(), fragment_text(3)];
    (0.0..=1.0f64, 0..6usize, inserted, 0..4usize).prop_map(
        |(at, removed, inserted, steps_before)| Edit {
            at,
            removed,
            inserted: inserted.chars().take(24).collect(),
            steps_before,
        },
    )
}

fn document(language: &str, text: &str, increment: usize) -> HighlightedDocument {
    let registry = LanguageRegistry::with_builtins();
    let engine = registry
        .create_engine(language, HighlightOptions::default().with_increment(increment))
        .unwrap();
    HighlightedDocument::new(SyntaxDocument::with_text(text)).with_engine(engine)
}

fn fresh_summary(language: &str, text: &str) -> String {
    let mut doc = document(language, text, usize::MAX);
    doc.color_all();
    doc.syntax_summary()
}

// ============================================================================
// Tokenizer Properties
// ============================================================================

proptest! {
    /// Every built-in language tiles the text with non-empty tokens.
    #[test]
    fn tokens_tile_the_document(text in any_text()) {
        let registry = LanguageRegistry::with_builtins();
        let len = text.chars().count();
        for language in registry.ids() {
            let mut doc = document(language, &text, usize::MAX);
            doc.color_all();
            prop_assert!(doc.is_finished());
            let engine = doc.engine().unwrap();
            let mut last_end = 0;
            for token in engine.tokens().iter() {
                prop_assert_eq!(token.start, last_end, "{} gap at {:?}", language, token);
                prop_assert!(token.start < token.end);
                last_end = token.end;
            }
            prop_assert_eq!(last_end, len, "{} stops short", language);
        }
    }

    /// Coloring in small steps ends where coloring in one go does.
    #[test]
    fn stepwise_coloring_matches_single_pass(
        text in mixed_text(),
        increment in 1..8usize,
        language in language(),
    ) {
        let mut doc = document(language, &text, increment);
        while doc.run_step() == TaskStatus::Pending {}
        prop_assert_eq!(doc.syntax_summary(), fresh_summary(language, &text));
    }

    /// Edits applied between partial coloring steps leave the same colors
    /// as coloring the final text from scratch.
    #[test]
    fn recoloring_after_edits_matches_fresh(
        text in mixed_text(),
        edits in prop::collection::vec(edit(), 1..5),
        increment in 1..12usize,
        language in language(),
    ) {
        let mut doc = document(language, &text, increment);
        for edit in &edits {
            for _ in 0..edit.steps_before {
                doc.run_step();
            }
            let len = doc.len();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
            let at = ((len as f64) * edit.at) as usize;
            let at = at.min(len);
            let end = (at + edit.removed).min(len);
            doc.replace(at..end, &edit.inserted);
        }
        while doc.run_step() == TaskStatus::Pending {}
        let text = doc.text();
        prop_assert_eq!(doc.syntax_summary(), fresh_summary(language, &text));

        // Reused tokens are exactly the ones a fresh scan produces.
        let mut fresh = document(language, &text, usize::MAX);
        fresh.color_all();
        let tokens = doc.engine().unwrap().tokens();
        prop_assert!(tokens.iter().eq(fresh.engine().unwrap().tokens().iter()));
    }
}

// ============================================================================
// Base64 Properties
// ============================================================================

proptest! {
    /// `atob` undoes `btoa`.
    #[test]
    fn atob_inverts_btoa(binary in binary_string()) {
        let encoded = btoa(&binary).unwrap();
        prop_assert_eq!(encoded.len() % 4, 0);
        prop_assert_eq!(atob(&encoded).unwrap(), binary);
    }

    /// Binary strings encode exactly like their bytes.
    #[test]
    fn btoa_agrees_with_byte_encoding(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let binary = bytes_to_binary(&bytes);
        prop_assert_eq!(binary_to_bytes(&binary).unwrap(), bytes.clone());
        prop_assert_eq!(btoa(&binary).unwrap(), STANDARD.encode(&bytes));
    }

    /// Wide chars are rejected, never silently truncated.
    #[test]
    fn btoa_rejects_wide_chars(prefix in binary_string(), wide in proptest::char::range('\u{100}', '\u{ffff}')) {
        let text = format!("{prefix}{wide}");
        prop_assert!(btoa(&text).is_err());
    }
}
