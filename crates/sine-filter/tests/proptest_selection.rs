//! Property-based tests for premise selection.
//!
//! Random problems are built over a small pool of unary predicates applied
//! to integer literals, so the only symbols are the predicates themselves.
//! For quantifier-free problems the result is cross-checked against a
//! union-find over "shares a predicate".

use proptest::prelude::*;
use sine_core::{Sort, TermId, TermStore};
use sine_filter::SineFilter;

const NUM_PREDICATES: usize = 6;

/// One generated formula.
#[derive(Clone, Debug)]
enum Formula {
    /// Conjunction of `P_i(0)` for each listed predicate; `true` if empty
    Ground(Vec<usize>),
    /// `forall x. (=> trigger(x) (and body(x)...))` with pattern `trigger(x)`
    Axiom { trigger: usize, body: Vec<usize> },
}

impl Formula {
    fn predicates(&self) -> Vec<usize> {
        match self {
            Formula::Ground(ps) => ps.clone(),
            Formula::Axiom { trigger, body } => {
                let mut ps = body.clone();
                ps.push(*trigger);
                ps
            }
        }
    }
}

fn ground_strategy() -> impl Strategy<Value = Formula> {
    prop::collection::vec(0..NUM_PREDICATES, 0..=3).prop_map(Formula::Ground)
}

fn formula_strategy() -> impl Strategy<Value = Formula> {
    prop_oneof![
        3 => ground_strategy(),
        1 => (0..NUM_PREDICATES, prop::collection::vec(0..NUM_PREDICATES, 1..=2))
            .prop_map(|(trigger, body)| Formula::Axiom { trigger, body }),
    ]
}

fn build(store: &mut TermStore, formulas: &[Formula]) -> Vec<TermId> {
    let preds: Vec<_> = (0..NUM_PREDICATES)
        .map(|i| store.declare_fun(format!("P{i}"), vec![Sort::Int], Sort::Bool))
        .collect();
    let zero = store.mk_int(0);
    let x = store.mk_var("x", Sort::Int);

    formulas
        .iter()
        .map(|formula| match formula {
            Formula::Ground(ps) if ps.is_empty() => store.true_term(),
            Formula::Ground(ps) => {
                let atoms = ps.iter().map(|&i| store.mk_app(preds[i], vec![zero])).collect();
                store.mk_and(atoms)
            }
            Formula::Axiom { trigger, body } => {
                let trigger_x = store.mk_app(preds[*trigger], vec![x]);
                let atoms = body.iter().map(|&i| store.mk_app(preds[i], vec![x])).collect();
                let conclusion = store.mk_and(atoms);
                let implication = store.mk_implies(trigger_x, conclusion);
                let pattern = store.mk_pattern(vec![trigger_x]);
                store.mk_forall(vec![("x".to_string(), Sort::Int)], implication, vec![pattern])
            }
        })
        .collect()
}

fn find(parent: &mut [usize], i: usize) -> usize {
    let mut root = i;
    while parent[root] != root {
        root = parent[root];
    }
    let mut node = i;
    while parent[node] != root {
        let next = parent[node];
        parent[node] = root;
        node = next;
    }
    root
}

/// Positions in the conjecture's component of the symbol-sharing graph.
fn connected_to_conjecture(formulas: &[Formula]) -> Vec<usize> {
    let n = formulas.len();
    // Nodes 0..n are formulas, n.. are predicates.
    let mut parent: Vec<usize> = (0..n + NUM_PREDICATES).collect();
    for (i, formula) in formulas.iter().enumerate() {
        for p in formula.predicates() {
            let (a, b) = (find(&mut parent, i), find(&mut parent, n + p));
            parent[a] = b;
        }
    }
    let root = find(&mut parent, n - 1);
    (0..n).filter(|&i| find(&mut parent, i) == root).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn quantifier_free_selection_matches_union_find(
        formulas in prop::collection::vec(ground_strategy(), 1..12)
    ) {
        let mut store = TermStore::new();
        let terms = build(&mut store, &formulas);
        let selection = SineFilter::new(&store).select(&terms).unwrap();
        prop_assert_eq!(selection.kept, connected_to_conjecture(&formulas));
    }

    #[test]
    fn quantifier_free_selection_is_idempotent(
        formulas in prop::collection::vec(ground_strategy(), 1..12)
    ) {
        let mut store = TermStore::new();
        let terms = build(&mut store, &formulas);
        let filter = SineFilter::new(&store);
        let once = filter.filter(&terms).unwrap();
        let twice = filter.filter(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn selection_keeps_conjecture_and_input_order(
        formulas in prop::collection::vec(formula_strategy(), 1..12)
    ) {
        let mut store = TermStore::new();
        let terms = build(&mut store, &formulas);
        let selection = SineFilter::new(&store).select(&terms).unwrap();

        prop_assert_eq!(selection.kept.last().copied(), Some(terms.len() - 1));
        prop_assert!(selection.kept.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(selection.kept.len() + selection.dropped.len(), terms.len());
        prop_assert_eq!(selection.stats.formulas_out, selection.kept.len());
    }

    #[test]
    fn axioms_never_keep_more_than_their_erasure(
        formulas in prop::collection::vec(formula_strategy(), 1..12)
    ) {
        // Gating only withholds body symbols, so the kept set is contained in
        // the component computed as if every trigger were already matched.
        let mut store = TermStore::new();
        let terms = build(&mut store, &formulas);
        let selection = SineFilter::new(&store).select(&terms).unwrap();
        let upper = connected_to_conjecture(&formulas);
        prop_assert!(selection.kept.iter().all(|i| upper.contains(i)));
    }
}
