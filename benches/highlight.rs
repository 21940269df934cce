//! Syntax highlighting performance benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use lexcolor::highlight::{
    HighlightOptions, HighlightSession, HighlightedDocument, LanguageRegistry, SessionOptions,
};
use lexcolor::{SyntaxDocument, TaskStatus, atob, btoa};
use std::hint::black_box;

const SAMPLE_LINES: [(&str, &str); 4] = [
    ("cpp", "int main() { std::vector<int> v; return v.size(); } // done"),
    ("python", "def f(x):  # comment\n    return '''doc''' + x"),
    ("xml", "<item id=\"12\" xml:lang='en'>text<![CDATA[raw]]></item>"),
    ("html", "<p>hi</p><script>if (a < b) { c(); }</script><style>p{color:red}</style>"),
];

fn build_source(lines: usize) -> String {
    let line = "int example(int x) { /* twice */ return ns::helper(x, \"s\") * 2; }\n";
    let mut text = String::with_capacity(lines * line.len());
    for _ in 0..lines {
        text.push_str(line);
    }
    text
}

fn colored(language: &str, text: &str, increment: usize) -> HighlightedDocument {
    let registry = LanguageRegistry::with_builtins();
    let engine = registry
        .create_engine(language, HighlightOptions::default().with_increment(increment))
        .expect("builtin language");
    HighlightedDocument::new(SyntaxDocument::with_text(text)).with_engine(engine)
}

fn bench_color_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlight_color_line");
    for (language, line) in SAMPLE_LINES {
        group.bench_with_input(BenchmarkId::new("line", language), &line, |b, input| {
            b.iter_batched(
                || colored(language, input, 1000),
                |mut doc| {
                    doc.color_all();
                    black_box(doc);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_color_full(c: &mut Criterion) {
    let source_small = build_source(1_000);
    let source_large = build_source(10_000);

    let mut group = c.benchmark_group("highlight_color_full");
    for (name, source) in [
        ("1k_lines target<50ms", &source_small),
        ("10k_lines target<500ms", &source_large),
    ] {
        group.bench_function(name, |b| {
            b.iter_batched(
                || colored("cpp", source, 1000),
                |mut doc| {
                    doc.color_all();
                    black_box(doc);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_idle_steps(c: &mut Criterion) {
    let source = build_source(1_000);
    let mut group = c.benchmark_group("highlight_idle_steps");
    for increment in [100usize, 1000, 10_000] {
        group.bench_with_input(BenchmarkId::new("increment", increment), &increment, |b, &increment| {
            b.iter_batched(
                || colored("cpp", &source, increment),
                |mut doc| {
                    while doc.run_step() == TaskStatus::Pending {}
                    black_box(doc);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_incremental_edit(c: &mut Criterion) {
    let source = build_source(2_000);
    let mut doc = colored("cpp", &source, 1000);
    doc.color_all();

    let line_len = source.lines().next().map_or(0, |line| line.chars().count() + 1);
    let near_end = line_len * 1_990 + 4;
    let near_start = line_len * 10 + 4;

    c.bench_function("highlight_incremental_near_end target<1ms", |b| {
        b.iter(|| {
            doc.insert(near_end, " ");
            doc.remove(near_end..near_end + 1);
            doc.color_all();
        });
    });

    c.bench_function("highlight_incremental_near_start", |b| {
        b.iter(|| {
            doc.insert(near_start, " ");
            doc.remove(near_start..near_start + 1);
            doc.color_all();
        });
    });
}

fn bench_session_idle(c: &mut Criterion) {
    let source = build_source(500);
    c.bench_function("highlight_session_four_documents", |b| {
        b.iter_batched(
            || {
                let mut session = HighlightSession::with_options(
                    LanguageRegistry::with_builtins(),
                    SessionOptions::default(),
                );
                for _ in 0..4 {
                    session.open("cpp", &source).expect("builtin language");
                }
                session
            },
            |mut session| {
                black_box(session.run_until_idle(usize::MAX));
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_base64(c: &mut Criterion) {
    let binary: String = (0..=255u8).cycle().take(16 * 1024).map(char::from).collect();
    let encoded = btoa(&binary).expect("latin-1 input");

    let mut group = c.benchmark_group("base64");
    group.bench_function("btoa_16k", |b| b.iter(|| btoa(black_box(&binary))));
    group.bench_function("atob_16k", |b| b.iter(|| atob(black_box(&encoded))));
    group.finish();
}

criterion_group!(
    benches,
    bench_color_line,
    bench_color_full,
    bench_idle_steps,
    bench_incremental_edit,
    bench_session_idle,
    bench_base64
);
criterion_main!(benches);
