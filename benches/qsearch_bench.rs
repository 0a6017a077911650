use criterion::{criterion_group, criterion_main, Criterion, black_box};
use piesearch::{CozyPosition, Searcher};

fn bench_qsearch(c: &mut Criterion) {
    let mut tactical = CozyPosition::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4").unwrap();
    let mut s = Searcher::default();
    c.bench_function("qsearch_tactical", |ben| {
        ben.iter(|| black_box(s.qsearch_eval(black_box(&mut tactical))))
    });
}

criterion_group!(benches, bench_qsearch);
criterion_main!(benches);
