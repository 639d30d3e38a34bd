use criterion::{criterion_group, criterion_main, Criterion};
use quiz_core::analyzer::{Analyzer, Mode};
use quiz_core::parser::parse_text;

const PAGE: &str = "[[Fjord]]\nCATEGORIES:Landforms, Coastal geography\n\
In physical geography, a fjord is a long, narrow inlet with steep sides or cliffs, created by a glacier.[ref]Atlas[/ref]\n\
Fjords exist on the coasts of Alaska, Antarctica, British Columbia, Chile, Denmark, Greenland, Iceland, Norway and New Zealand.\n";

fn bench_analyze(c: &mut Criterion) {
    let analyzer = Analyzer::default();
    c.bench_function("analyze_page_index_mode", |b| b.iter(|| analyzer.terms(PAGE, Mode::Index)));
}

fn bench_parse(c: &mut Criterion) {
    let dump = PAGE.repeat(50).replace("\n[[", "\n\n\n[[");
    c.bench_function("parse_dump", |b| b.iter(|| parse_text(&dump)));
}

criterion_group!(benches, bench_analyze, bench_parse);
criterion_main!(benches);
