use cozy_chess::{Piece, Square};
use piesearch::search::eval::Evaluator;
use piesearch::{GamePosition, MoveMeta, SearchParams, Searcher};

/// Edge `i` of a uniform synthetic game tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Edge(u8);

impl MoveMeta for Edge {
    fn from(&self) -> Square { Square::A1 }
    fn to(&self) -> Square { Square::index(self.0 as usize + 1) }
    fn piece(&self) -> Piece { Piece::Knight }
    fn captured(&self) -> Option<Piece> { None }
    fn promotion(&self) -> Option<Piece> { None }
    fn is_castle(&self) -> bool { false }
    fn is_en_passant(&self) -> bool { false }
}

struct Tree {
    path: Vec<u8>,
    height: usize,
    branching: u8,
    salt: u64,
}

impl Tree {
    fn new(height: usize, branching: u8, salt: u64) -> Self { Self { path: Vec::new(), height, branching, salt } }
}

fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

impl GamePosition for Tree {
    type Move = Edge;

    fn legal_moves(&self, captures_only: bool) -> Vec<Edge> {
        if captures_only || self.path.len() >= self.height { return Vec::new(); }
        (0..self.branching).map(Edge).collect()
    }
    fn make(&mut self, mv: Edge) { self.path.push(mv.0); }
    fn undo(&mut self, mv: Edge) { assert_eq!(self.path.pop(), Some(mv.0)); }
    fn is_checkmate(&self) -> bool { false }
    fn is_draw(&self) -> bool { false }
    fn is_in_check(&self) -> bool { false }
    fn position_key(&self) -> u64 {
        self.path.iter().fold(mix(self.salt), |h, &e| mix(h ^ (e as u64 + 1)))
    }
    fn square_is_attacked_by_opponent(&self, _sq: Square) -> bool { false }
}

struct PathEval;

impl Evaluator<Tree> for PathEval {
    fn evaluate(&self, pos: &Tree) -> i32 { (pos.position_key() % 1001) as i32 - 500 }
}

fn plain_negamax(t: &mut Tree, depth: usize) -> i32 {
    if depth == 0 { return PathEval.evaluate(t); }
    let mut best = i32::MIN;
    for mv in t.legal_moves(false) {
        t.make(mv);
        best = best.max(-plain_negamax(t, depth - 1));
        t.undo(mv);
    }
    best
}

fn leaf_count(height: usize, branching: u8) -> u64 { (branching as u64).pow(height as u32) }

#[test]
fn alphabeta_matches_plain_negamax() {
    for salt in 0..12u64 {
        let (height, branching) = (4, 5);
        let mut tree = Tree::new(height, branching, salt);
        let expected = plain_negamax(&mut tree, height);
        let mut searcher = Searcher::with_evaluator(SearchParams::default(), PathEval);
        let res = searcher.search_depth(&mut tree, height as u32);
        assert_eq!(res.score, expected, "salt {salt}");
        assert!(tree.path.is_empty(), "search left moves on the tree");
    }
}

#[test]
fn alphabeta_without_tt_matches_plain_negamax() {
    let mut params = SearchParams::default();
    params.use_tt = false;
    params.use_killers = false;
    params.use_history = false;
    for salt in 100..108u64 {
        let mut tree = Tree::new(5, 3, salt);
        let expected = plain_negamax(&mut tree, 5);
        let mut searcher = Searcher::with_evaluator(params, PathEval);
        assert_eq!(searcher.search_depth(&mut tree, 5).score, expected, "salt {salt}");
    }
}

#[test]
fn randomized_ordering_keeps_the_value() {
    let mut params = SearchParams::default();
    params.randomize_ties = true;
    let mut tree = Tree::new(4, 4, 7);
    let expected = plain_negamax(&mut tree, 4);
    for seed in [1u64, 2, 3, 99] {
        params.seed = seed;
        let mut searcher = Searcher::with_evaluator(params, PathEval);
        assert_eq!(searcher.search_depth(&mut tree, 4).score, expected, "seed {seed}");
    }
}

#[test]
fn pruning_visits_fewer_nodes_than_the_full_tree() {
    let mut params = SearchParams::default();
    params.use_tt = false;
    let (height, branching) = (5, 6);
    let mut tree = Tree::new(height, branching, 3);
    let mut searcher = Searcher::with_evaluator(params, PathEval);
    searcher.search_depth(&mut tree, height as u32);
    let full: u64 = (1..=height).map(|h| leaf_count(h, branching)).sum();
    assert!(searcher.nodes() < full, "searched {} of {full} nodes", searcher.nodes());
}
