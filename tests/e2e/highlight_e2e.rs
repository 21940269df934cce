//! E2E tests for the idle-time highlighting pipeline.
//!
//! Run with:
//!   cargo test --test `highlight_e2e` -- --nocapture
//! With logging:
//!   `RUST_LOG=debug` cargo test --test `highlight_e2e` -- --nocapture
//!
//! CI: runs under the default `cargo test` job.

use std::fs::File;
use std::io::Write as _;
use std::time::Instant;

use lexcolor::highlight::{
    DocumentId, HighlightOptions, HighlightSession, HighlightedDocument, LanguageRegistry,
    SessionOptions, Syntax,
};
use lexcolor::{SchedulerOptions, SyntaxDocument, TextDocument};
use tracing::{Level, debug, info, span};

const SAMPLE_CPP: &str = include_str!("fixtures/sample.cpp");
const SAMPLE_HTML: &str = include_str!("fixtures/sample.html");
const SAMPLE_PY: &str = include_str!("fixtures/sample.py");

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_test_writer()
        .try_init();
}

fn session(increment: usize, tasks_per_tick: usize) -> HighlightSession {
    let options = SessionOptions::default()
        .with_highlight(HighlightOptions::default().with_increment(increment))
        .with_scheduler(SchedulerOptions::default().with_tasks_per_tick(tasks_per_tick));
    HighlightSession::with_options(LanguageRegistry::with_builtins(), options)
}

/// Color `text` in one go, outside any session.
fn fresh_summary(language: &str, text: &str) -> String {
    let registry = LanguageRegistry::with_builtins();
    let engine = registry
        .create_engine(language, HighlightOptions::default())
        .unwrap();
    let mut doc = HighlightedDocument::new(SyntaxDocument::with_text(text)).with_engine(engine);
    doc.color_all();
    doc.syntax_summary()
}

/// Syntax of the first char of `needle` in the document. Fixtures are ASCII,
/// so byte and char offsets agree.
fn syntax_of(session: &HighlightSession, id: DocumentId, needle: &str) -> Syntax {
    let doc = session.document(id).unwrap();
    let text = doc.text();
    let offset = text
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not in document"));
    doc.document().syntax_at(offset)
}

fn assert_fully_painted(session: &HighlightSession, id: DocumentId) {
    let doc = session.document(id).unwrap();
    let painted = doc.document();
    for offset in 0..painted.len() {
        assert_ne!(
            painted.syntax_at(offset),
            Syntax::None,
            "document {id}: char {offset} left unpainted"
        );
    }
}

#[test]
fn e2e_session_colors_fixtures_in_idle_time() {
    init_logging();
    let span = span!(Level::INFO, "e2e_fixtures");
    let _enter = span.enter();

    let mut session = session(64, 1);
    let cpp = session.open_with_extension("cpp", SAMPLE_CPP).unwrap();
    let html = session.open_with_extension("HTML", SAMPLE_HTML).unwrap();
    let py = session.open_with_extension(".py", SAMPLE_PY).unwrap();
    assert_eq!(session.scheduler().pending(), 3);

    let start = Instant::now();
    let ticks = session.run_until_idle(10_000);
    info!(ticks, elapsed = ?start.elapsed(), "idle coloring complete");
    assert!(!session.scheduler().has_pending());
    // Three documents share one task per tick.
    assert!(ticks > SAMPLE_CPP.len() / 64);

    for id in [cpp, html, py] {
        assert!(session.document(id).unwrap().is_finished());
        assert_fully_painted(&session, id);
        debug!(document = %id, summary = %session.document(id).unwrap().syntax_summary(), "colored");
    }

    assert_eq!(syntax_of(&session, cpp, "// Sample"), Syntax::Comment);
    assert_eq!(syntax_of(&session, cpp, "#include"), Syntax::Keyword);
    assert_eq!(syntax_of(&session, cpp, "#  define"), Syntax::Keyword);
    assert_eq!(syntax_of(&session, cpp, "namespace"), Syntax::Keyword);
    assert_eq!(syntax_of(&session, cpp, "/* A point"), Syntax::Comment);
    assert_eq!(syntax_of(&session, cpp, "std::vector"), Syntax::Keyword);
    assert_eq!(syntax_of(&session, cpp, "retry:"), Syntax::Label);
    assert_eq!(syntax_of(&session, cpp, "geometry::helper"), Syntax::Identifier);
    assert_eq!(syntax_of(&session, cpp, "\"done"), Syntax::StringLiteral);

    assert_eq!(syntax_of(&session, html, "<!-- navigation"), Syntax::Comment);
    assert_eq!(syntax_of(&session, html, "var count"), Syntax::Keyword);
    assert_eq!(syntax_of(&session, html, "function tick"), Syntax::Keyword);
    assert_eq!(syntax_of(&session, html, "</script>"), Syntax::Keyword);

    assert_eq!(syntax_of(&session, py, "# Sample"), Syntax::Comment);
    assert_eq!(syntax_of(&session, py, "import"), Syntax::Keyword);
    assert_eq!(syntax_of(&session, py, "def files"), Syntax::Keyword);
    assert_eq!(syntax_of(&session, py, "\"\"\"Walk"), Syntax::StringLiteral);
    assert_eq!(syntax_of(&session, py, "yield"), Syntax::Keyword);
    assert_eq!(syntax_of(&session, py, "# full path"), Syntax::Comment);
}

#[test]
fn e2e_idle_coloring_matches_single_pass() {
    init_logging();
    let mut session = session(17, 2);
    let cases = [("cpp", SAMPLE_CPP), ("html", SAMPLE_HTML), ("python", SAMPLE_PY)];
    let ids: Vec<_> = cases
        .iter()
        .map(|(language, text)| session.open(language, text).unwrap())
        .collect();
    session.run_until_idle(10_000);
    for (id, (language, text)) in ids.into_iter().zip(cases) {
        assert_eq!(
            session.document(id).unwrap().syntax_summary(),
            fresh_summary(language, text),
            "{language}"
        );
    }
}

#[test]
fn e2e_edits_interleaved_with_idle_ticks() {
    init_logging();
    let span = span!(Level::INFO, "e2e_edits");
    let _enter = span.enter();

    let mut session = session(32, 1);
    let id = session.open("cpp", SAMPLE_CPP).unwrap();
    session.run_idle();
    session.run_idle();

    // Open a comment early on, type into it, then close it again.
    let at = SAMPLE_CPP.find("namespace").unwrap();
    session.edit(id, at..at, "/* ").unwrap();
    session.run_idle();
    session.edit(id, at + 3..at + 3, "old ").unwrap();
    session.run_until_idle(10_000);
    assert_eq!(syntax_of(&session, id, "/* old namespace"), Syntax::Comment);
    assert_eq!(syntax_of(&session, id, "geometry {"), Syntax::Comment);
    assert_eq!(syntax_of(&session, id, "struct Point"), Syntax::Keyword);

    session.edit(id, at..at + 7, "").unwrap();
    assert_eq!(session.scheduler().pending(), 1);
    session.run_until_idle(10_000);

    let doc = session.document(id).unwrap();
    assert_eq!(doc.text(), SAMPLE_CPP);
    assert_eq!(doc.syntax_summary(), fresh_summary("cpp", SAMPLE_CPP));
}

#[test]
fn e2e_embedded_script_edits() {
    init_logging();
    let mut session = session(8, 1);
    let id = session.open("html", SAMPLE_HTML).unwrap();
    session.run_until_idle(10_000);

    let at = SAMPLE_HTML.find("var count").unwrap();
    session.edit(id, at..at + 3, "let").unwrap();
    session.run_until_idle(10_000);
    assert_eq!(syntax_of(&session, id, "let count"), Syntax::Keyword);

    // Dropping the closing tag turns the rest of the file into script.
    let close = session.document(id).unwrap().text().find("</script>").unwrap();
    session.edit(id, close..close + 9, "").unwrap();
    session.run_until_idle(10_000);
    let text = session.document(id).unwrap().text();
    assert_eq!(
        session.document(id).unwrap().syntax_summary(),
        fresh_summary("html", &text)
    );
    assert_ne!(syntax_of(&session, id, "</body>"), Syntax::EndTag);
}

#[test]
fn e2e_close_and_switch_language() {
    init_logging();
    let mut session = session(16, 4);
    let keep = session.open("python", SAMPLE_PY).unwrap();
    let dropped = session.open("cpp", SAMPLE_CPP).unwrap();
    session.run_idle();
    assert!(session.close(dropped));
    assert!(!session.is_open(dropped));

    session.set_language(keep, "cpp").unwrap();
    session.run_until_idle(10_000);
    assert!(!session.scheduler().has_pending());
    assert_eq!(
        session.document(keep).unwrap().syntax_summary(),
        fresh_summary("cpp", SAMPLE_PY)
    );
    assert!(session.document(dropped).is_err());
}

#[test]
fn e2e_load_from_file() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("walker.py");
    File::create(&path)
        .unwrap()
        .write_all(SAMPLE_PY.as_bytes())
        .unwrap();

    let registry = LanguageRegistry::with_builtins();
    let language = registry.for_extension("py").unwrap();
    let engine = registry
        .create_engine(language, HighlightOptions::default().with_increment(50))
        .unwrap();
    let mut doc = HighlightedDocument::new(SyntaxDocument::new()).with_engine(engine);
    doc.load(File::open(&path).unwrap()).unwrap();
    assert_eq!(doc.len(), SAMPLE_PY.chars().count());

    let mut steps = 0;
    while doc.run_step() == lexcolor::TaskStatus::Pending {
        steps += 1;
    }
    info!(steps, "colored from file");
    assert_eq!(doc.syntax_summary(), fresh_summary("python", SAMPLE_PY));
}
