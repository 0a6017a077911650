use piesearch::{CozyPosition, EngineConfig, GamePosition, SearchParams, Searcher};
use std::time::{Duration, Instant};

const MIDDLEGAME: &str = "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 2 3";
const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

#[test]
fn tiny_budget_still_returns_a_legal_move() {
    for fen in [None, Some(MIDDLEGAME)] {
        let mut pos = CozyPosition::from_moves(fen, &[]).unwrap();
        let mut searcher = Searcher::default();
        let t0 = Instant::now();
        let bm = searcher.choose_move(&mut pos, Duration::from_millis(1)).expect("no move under 1 ms");
        assert!(pos.legal_moves(false).contains(&bm), "{bm} is not legal");
        assert!(t0.elapsed() < Duration::from_millis(20), "search overran: {:?}", t0.elapsed());
    }
}

#[test]
fn zero_budget_falls_back_to_a_legal_move() {
    let mut pos = CozyPosition::from_fen(MIDDLEGAME).unwrap();
    let mut searcher = Searcher::default();
    let res = searcher.think(&mut pos, Duration::ZERO);
    let bm = res.best_move.expect("fallback move missing");
    assert!(pos.legal_moves(false).contains(&bm));
    assert!(res.depth <= 1);
}

#[test]
fn budget_is_respected() {
    let mut pos = CozyPosition::from_fen(MIDDLEGAME).unwrap();
    let mut searcher = Searcher::default();
    let t0 = Instant::now();
    // Soft budget 50 ms, hard cap 200 ms.
    let res = searcher.think(&mut pos, Duration::from_secs(2));
    let elapsed = t0.elapsed();
    assert!(res.best_move.is_some());
    assert!(res.depth >= 1, "not even depth 1 completed in {elapsed:?}");
    assert!(elapsed < Duration::from_millis(800), "search exceeded time: {elapsed:?}");
}

#[test]
fn node_cap_stops_the_search() {
    let mut cfg = EngineConfig::default();
    cfg.search = SearchParams { max_nodes: Some(2_000), ..SearchParams::default() };
    let mut pos = CozyPosition::from_fen(MIDDLEGAME).unwrap();
    let mut searcher = Searcher::new(cfg);
    let res = searcher.think(&mut pos, Duration::from_secs(600));
    assert!(res.best_move.is_some());
    assert!(searcher.nodes() <= 2_000, "visited {} nodes", searcher.nodes());
}

#[test]
fn depth_limit_bounds_iterations() {
    let mut cfg = EngineConfig::default();
    cfg.search.max_depth = 2;
    let mut pos = CozyPosition::startpos();
    let mut searcher = Searcher::new(cfg);
    let res = searcher.think(&mut pos, Duration::from_secs(600));
    assert_eq!(res.depth, 2);
}

#[test]
fn small_budgets_return_within_the_clock() {
    let mut pos = CozyPosition::from_fen(KIWIPETE).unwrap();
    let mut searcher = Searcher::default();
    for ms in [2u64, 5, 10, 20] {
        let budget = Duration::from_millis(ms);
        for _ in 0..3 {
            let t0 = Instant::now();
            let bm = searcher.choose_move(&mut pos, budget).expect("move");
            let elapsed = t0.elapsed();
            assert!(elapsed <= budget, "{ms} ms budget took {elapsed:?}");
            assert!(pos.legal_moves(false).contains(&bm));
        }
    }
}

#[test]
fn cancelled_search_restores_the_position() {
    let mut pos = CozyPosition::from_fen(KIWIPETE).unwrap();
    let (key, fen) = (pos.position_key(), pos.fen());
    let mut searcher = Searcher::default();
    for ms in [0u64, 1, 3, 7, 20] {
        let res = searcher.think(&mut pos, Duration::from_millis(ms));
        assert!(res.best_move.is_some());
        assert_eq!(pos.position_key(), key, "key changed after a {ms} ms search");
        assert_eq!(pos.fen(), fen, "board changed after a {ms} ms search");
    }
}

#[test]
fn node_capped_search_with_extras_restores_the_position() {
    let mut cfg = EngineConfig::default();
    cfg.search.max_nodes = Some(777);
    cfg.search.use_null_move = true;
    cfg.search.use_lmr = true;
    cfg.search.use_reverse_futility = true;
    for fen in [KIWIPETE, MIDDLEGAME] {
        let mut pos = CozyPosition::from_fen(fen).unwrap();
        let (key, before) = (pos.position_key(), pos.fen());
        let mut searcher = Searcher::new(cfg);
        let res = searcher.search_depth(&mut pos, 12);
        assert!(res.depth < 12, "node cap should cut the search short");
        assert!(res.best_move.is_some());
        assert_eq!(pos.position_key(), key);
        assert_eq!(pos.fen(), before);
    }
}
