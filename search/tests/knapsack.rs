mod common;

use common::Knapsack;
use treesearch::prelude::*;

const ITEMS: [(i64, i64); 4] = [(8, 4), (7, 3), (5, 2), (3, 1)];

fn instance() -> Knapsack {
    Knapsack::new(10, &ITEMS)
}

#[test]
fn exhaustive_depth_first_finds_the_optimum() {
    let control =
        depth_first_from(instance(), SearchOptions::default(), usize::MAX, usize::MAX, usize::MAX)
            .unwrap();
    // all four items fit exactly (weight 10)
    assert_eq!(control.best_quality(), Some(&Maximize(23)));
    assert_eq!(control.best_state().unwrap().profit(), 23);
}

#[test]
fn breadth_first_agrees_with_depth_first() {
    let control =
        breadth_first_from(instance(), SearchOptions::default(), usize::MAX, usize::MAX, usize::MAX)
            .unwrap();
    assert_eq!(control.best_quality(), Some(&Maximize(23)));
}

#[test]
fn a_narrow_beam_stays_close_to_the_optimum() {
    let control = beam_search_from(
        instance(),
        SearchOptions::default(),
        2,
        |s: &Knapsack| -(s.bound().0 as f32),
        usize::MAX,
        usize::MAX,
    )
    .unwrap();
    assert!(control.best_quality().unwrap().0 >= 18);
}

#[test]
fn zero_discrepancy_follows_the_take_first_heuristic() {
    // taking every item in order is feasible here, so the heuristic dive is optimal
    let control = anytime_lds_from(instance(), SearchOptions::default(), 0).unwrap();
    assert_eq!(control.best_quality(), Some(&Maximize(23)));
}

#[test]
fn pilot_with_a_greedy_dive_finds_the_optimum() {
    let control =
        pilot_from(instance(), SearchOptions::default(), greedy_lookahead(), 2, usize::MAX).unwrap();
    assert_eq!(control.best_quality(), Some(&Maximize(23)));
}

#[test]
fn repeated_runs_are_identical() {
    let first =
        depth_first_from(instance(), SearchOptions::default(), usize::MAX, usize::MAX, usize::MAX)
            .unwrap();
    let second =
        depth_first_from(instance(), SearchOptions::default(), usize::MAX, usize::MAX, usize::MAX)
            .unwrap();
    assert_eq!(first.best_quality(), second.best_quality());
    assert_eq!(first.visited(), second.visited());
}

#[test]
fn a_seeded_upper_bound_prunes_without_losing_the_optimum() {
    let unpruned =
        depth_first_from(instance(), SearchOptions::default(), usize::MAX, usize::MAX, usize::MAX)
            .unwrap();
    let pruned = depth_first_from(
        instance(),
        SearchOptions::default().upper_bound(Maximize(22)),
        usize::MAX,
        usize::MAX,
        usize::MAX,
    )
    .unwrap();
    assert_eq!(pruned.best_quality(), Some(&Maximize(23)));
    assert!(pruned.visited() < unpruned.visited());
}
