//! Invariants of exploration over pseudo-random navigation graphs.

use std::collections::HashSet;

use astg_rs::astg::{ActivityStackTransitionGraph, Transition};
use astg_rs::atg::ActivityTransitionGraph;
use astg_rs::compare::{InterestingTransitions, StackDiff};
use astg_rs::explore::{Exploration, KLimitExplorer};
use astg_rs::launch::LaunchConfiguration as C;
use astg_rs::paths::count_paths;
use astg_rs::policy::{DefaultTransitionPolicy, NaiveTransitionPolicy, TransitionPolicy};
use astg_rs::stack::ActivityStack;
use num_bigint::BigUint;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use test_log::test;

const CONFIGS: [C; 6] = [
    C::STANDARD,
    C::SINGLE_TOP,
    C::new(C::FLAG_STANDARD | C::FLAG_CLEAR_TOP),
    C::new(C::FLAG_SINGLE_TOP | C::FLAG_CLEAR_TOP),
    C::new(C::FLAG_STANDARD | C::FLAG_REORDER_TO_FRONT),
    C::new(C::FLAG_SINGLE_TOP | C::FLAG_REORDER_TO_FRONT),
];

fn name(i: usize) -> String {
    if i == 0 {
        "Main".to_string()
    } else {
        format!("A{}", i)
    }
}

/// Random graph over `n` activities with `m` launch sites.
fn random_atg(rng: &mut ChaCha8Rng, n: usize, m: usize) -> ActivityTransitionGraph {
    let mut atg = ActivityTransitionGraph::new();
    atg.node(name(0));
    for _ in 0..m {
        let source = rng.random_range(0..n);
        let target = rng.random_range(0..n);
        let config = CONFIGS[rng.random_range(0..CONFIGS.len())];
        atg.add_transition(name(source), name(target), config);
    }
    atg
}

/// Yields `(seed, atg, k)` triples small enough for exhaustive runs with either policy.
fn cases() -> impl Iterator<Item = (u64, ActivityTransitionGraph, usize)> {
    (0..40u64).map(|seed| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = rng.random_range(2..=4);
        let m = rng.random_range(1..=8);
        let k = rng.random_range(1..=2);
        (seed, random_atg(&mut rng, n, m), k)
    })
}

fn explore<P: TransitionPolicy>(atg: &ActivityTransitionGraph, k: usize, policy: &P) -> Exploration {
    KLimitExplorer::new(k).explore(atg, "Main", policy).unwrap()
}

/// Everything observable about a graph, in discovery order.
fn fingerprint(astg: &ActivityStackTransitionGraph) -> (Vec<ActivityStack>, Vec<(ActivityStack, ActivityStack, Vec<Transition>)>) {
    let nodes = astg.nodes().map(|(_, s)| s.clone()).collect();
    let edges = astg
        .edges()
        .map(|e| {
            (
                astg.stack(e.source).clone(),
                astg.stack(e.target).clone(),
                e.transitions().to_vec(),
            )
        })
        .collect();
    (nodes, edges)
}

#[test]
fn determinism() {
    for (seed, atg, k) in cases() {
        let first = explore(&atg, k, &DefaultTransitionPolicy);
        let second = explore(&atg, k, &DefaultTransitionPolicy);
        assert_eq!(fingerprint(&first.graph), fingerprint(&second.graph), "seed {}", seed);
        assert_eq!(first.stats, second.stats, "seed {}", seed);
    }
}

#[test]
fn stacks_are_deduplicated() {
    for (seed, atg, k) in cases() {
        for astg in [
            explore(&atg, k, &DefaultTransitionPolicy).graph,
            explore(&atg, k, &NaiveTransitionPolicy).graph,
        ] {
            let distinct: HashSet<&ActivityStack> = astg.nodes().map(|(_, s)| s).collect();
            assert_eq!(distinct.len(), astg.node_count(), "seed {}", seed);
            for (id, s) in astg.nodes() {
                assert_eq!(astg.lookup(s), Some(id), "seed {}", seed);
            }
        }
    }
}

#[test]
fn bound_respected() {
    for (seed, atg, k) in cases() {
        for astg in [
            explore(&atg, k, &DefaultTransitionPolicy).graph,
            explore(&atg, k, &NaiveTransitionPolicy).graph,
        ] {
            for (_, s) in astg.nodes() {
                for a in s.iter() {
                    assert!(s.count(a.as_str()) <= k, "seed {}: {} exceeds k = {}", seed, s, k);
                }
            }
        }
    }
}

#[test]
fn finish_edge_available() {
    for (seed, atg, k) in cases() {
        let astg = explore(&atg, k, &DefaultTransitionPolicy).graph;
        for (id, s) in astg.nodes() {
            let Some(target) = astg.finish_target(id) else {
                assert_eq!(s.size(), 1, "seed {}: {} has no finish edge", seed, s);
                continue;
            };
            let mut popped = s.clone();
            popped.pop();
            assert_eq!(astg.stack(target), &popped, "seed {}", seed);
        }
    }
}

#[test]
fn everything_reachable_from_init() {
    for (seed, atg, k) in cases() {
        let astg = explore(&atg, k, &DefaultTransitionPolicy).graph;
        assert_eq!(astg.reachable_stacks().len(), astg.node_count(), "seed {}", seed);
        assert_eq!(astg.stack(astg.init_stack().unwrap()), &ActivityStack::with_root("Main"));
    }
}

#[test]
fn no_standard_transition_is_interesting() {
    for (seed, atg, k) in cases() {
        let astg = explore(&atg, k, &DefaultTransitionPolicy).graph;
        let measured = InterestingTransitions::measure(&astg);
        assert!(measured.anomalies.is_empty(), "seed {}: {:?}", seed, measured.anomalies);
        assert!(measured.interesting <= measured.total);
    }
}

#[test]
fn one_step_paths_match_init_transitions() {
    for (seed, atg, k) in cases() {
        let astg = explore(&atg, k, &DefaultTransitionPolicy).graph;
        let one = count_paths(&astg, 1);
        let transitions_from_init = astg
            .outgoing(astg.init_stack().unwrap())
            .map(|e| e.transitions().len())
            .sum::<usize>();
        assert_eq!(one, BigUint::from(transitions_from_init), "seed {}", seed);
    }
}

// ─── Policy Differential ───────────────────────────────────────────────────────

/// A cycle `Main -> A1 -> ... -> A{len-1} -> Main` closed with `closing`.
fn cycle(len: usize, closing: C) -> ActivityTransitionGraph {
    let mut atg = ActivityTransitionGraph::new();
    for i in 1..len {
        atg.add_transition(name(i - 1), name(i), C::STANDARD);
    }
    atg.add_transition(name(len - 1), name(0), closing);
    atg
}

#[test]
fn policies_disagree_on_non_standard_cycles() {
    let closings = [
        C::new(C::FLAG_STANDARD | C::FLAG_CLEAR_TOP),
        C::new(C::FLAG_SINGLE_TOP | C::FLAG_CLEAR_TOP),
        C::new(C::FLAG_STANDARD | C::FLAG_REORDER_TO_FRONT),
    ];
    for len in 2..=4 {
        for closing in closings {
            let atg = cycle(len, closing);
            let accurate = explore(&atg, 2, &DefaultTransitionPolicy).graph;
            let naive = explore(&atg, 2, &NaiveTransitionPolicy).graph;

            // Closing the cycle never stacks a second Main.
            for (_, s) in accurate.nodes() {
                assert_eq!(s.count("Main"), 1, "{} via {}", s, closing);
                if closing.is_clear_top() {
                    assert!(s.iter().all(|a| s.count(a.as_str()) == 1), "{} via {}", s, closing);
                }
            }
            let diff = StackDiff::between(&accurate, &naive);
            assert!(!diff.only_right.is_empty(), "len {} via {}", len, closing);
            assert!(naive.contains(&ActivityStack::from_top_to_bottom(
                std::iter::once(name(0)).chain((0..len).rev().map(name))
            )));
        }
    }
}

#[test]
fn policies_disagree_on_single_top_self_loop() {
    let mut atg = ActivityTransitionGraph::new();
    atg.add_transition("Main", "A", C::STANDARD);
    atg.add_transition("A", "A", C::SINGLE_TOP);

    let accurate = explore(&atg, 2, &DefaultTransitionPolicy).graph;
    let naive = explore(&atg, 2, &NaiveTransitionPolicy).graph;
    let diff = StackDiff::between(&accurate, &naive);
    assert!(diff.only_left.is_empty());
    assert_eq!(diff.only_right, vec![ActivityStack::from_top_to_bottom(["A", "A", "Main"])]);
}

#[test]
fn policies_agree_without_flags() {
    for len in 1..=4 {
        let mut atg = ActivityTransitionGraph::new();
        for i in 1..=len {
            atg.add_transition(name(i - 1), name(i), C::STANDARD);
        }
        let accurate = explore(&atg, 1, &DefaultTransitionPolicy).graph;
        let naive = explore(&atg, 1, &NaiveTransitionPolicy).graph;
        assert!(StackDiff::between(&accurate, &naive).is_empty());
        assert_eq!(fingerprint(&accurate), fingerprint(&naive));
    }
}
