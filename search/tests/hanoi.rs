mod common;

use common::Hanoi;
use treesearch::prelude::*;

#[test]
fn apply_undo_round_trip_restores_the_state() {
    let mut state = Hanoi::new(3);
    // walk a few moves down, checking the round trip at every node on the way
    for _ in 0..4 {
        let choices: Vec<_> = state.choices().collect();
        let snapshot = format!("{state:?}");
        for &choice in &choices {
            state.apply(choice);
            state.undo_last();
            assert_eq!(format!("{state:?}"), snapshot);
            assert_eq!(state.choices().collect::<Vec<_>>(), choices);
        }
        state.apply(choices[0]);
    }
}

#[test]
fn depth_first_solves_three_disks_in_seven_moves() {
    let control =
        depth_first_mut_from(Hanoi::new(3), SearchOptions::default(), usize::MAX, 7, usize::MAX)
            .unwrap();
    assert_eq!(control.best_quality(), Some(&Minimize(7)));
    assert_eq!(control.best_state().unwrap().moves(), 7);
}

#[test]
fn breadth_first_solves_three_disks_in_seven_moves() {
    let control =
        breadth_first_mut_from(Hanoi::new(3), SearchOptions::default(), usize::MAX, 7, usize::MAX)
            .unwrap();
    assert_eq!(control.best_quality(), Some(&Minimize(7)));
}

#[test]
fn a_unit_beam_with_a_blind_rank_finds_nothing() {
    // ranking by depth makes every candidate of a layer equal: the beam keeps the
    // first expansion and oscillates without ever reaching the goal
    let control = beam_search_mut_from(
        Hanoi::new(3),
        SearchOptions::default(),
        1,
        |s: &Hanoi| s.moves() as f32,
        usize::MAX,
        7,
    )
    .unwrap();
    assert_eq!(control.best_quality(), None);
}

#[test]
fn an_informed_beam_finds_the_optimal_solution() {
    let control = beam_search_mut_from(
        Hanoi::new(3),
        SearchOptions::default(),
        8,
        |s: &Hanoi| s.bound().0 as f32,
        usize::MAX,
        7,
    )
    .unwrap();
    assert_eq!(control.best_quality(), Some(&Minimize(7)));
}

#[test]
fn monotonic_beam_solves_at_every_width() {
    for width in 1..=4 {
        let control = monotonic_beam_search_mut_from(
            Hanoi::new(3),
            SearchOptions::default(),
            width,
            |s: &Hanoi| s.bound().0 as f32,
            usize::MAX,
            usize::MAX,
        )
        .unwrap();
        // the exact-distance rank makes even the greedy slot optimal
        assert_eq!(control.best_quality(), Some(&Minimize(7)), "width {width}");
    }
}
