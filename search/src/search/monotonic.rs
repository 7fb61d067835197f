//! Monotonic beam search.
//!
//! Guarantees that increasing the beam width can never worsen the best outcome
//! (Lemons et al., 2022). Slots are processed left to right over a per-iteration
//! candidate queue: a slot first feeds its children into the queue, then claims the
//! best candidate not already claimed by a smaller-indexed slot. Slot 0 therefore
//! behaves exactly like the width-1 search regardless of the width, slot 1 like the
//! second slot of the width-2 search, and so on.

use crate::collections::RankHeap;
use crate::control::{Control, SearchControl, SearchOptions, SnapshotControl, VisitOutcome};
use crate::model::{MutableState, Qualifiable, Snapshot, State};
use crate::search::beam::check_beam_params;
use crate::search::{run_from, run_from_mut, spawn_from, spawn_from_mut, SearchHandle};
use crate::SearchError;

/// Monotonic beam search. Terminates when slot 0 cannot claim a candidate, when
/// `depth_limit` iterations were run, or when the control asks to stop.
pub fn monotonic_beam_search<S, C, R>(
    control: &mut C,
    root: S,
    beam_width: usize,
    mut rank: R,
    filter_width: usize,
    depth_limit: usize,
) -> Result<(), SearchError>
where
    S: State,
    C: Control<S> + ?Sized,
    R: FnMut(&S) -> f32,
{
    check_beam_params(beam_width, filter_width, depth_limit)?;

    if control.visit_node(&root) == VisitOutcome::Discard {
        return Ok(());
    }
    let mut slots: Vec<S> = vec![root];
    let mut candidates = RankHeap::new();
    let mut depth = 0;

    'search: while depth < depth_limit && !slots.is_empty() && !control.should_stop() {
        candidates.clear();
        let mut next: Vec<S> = Vec::with_capacity(slots.len());
        let mut expansions = slots.drain(..);
        for index in 0..beam_width {
            if let Some(state) = expansions.next() {
                for child in state.branches().take(filter_width) {
                    if control.visit_node(&child) == VisitOutcome::Discard {
                        continue;
                    }
                    // terminal children were visited (and possibly recorded) but
                    // cannot occupy a slot
                    if child.is_terminal() {
                        continue;
                    }
                    let r = rank(&child);
                    candidates.push(r, child);
                }
            }
            match candidates.pop_best() {
                Some(best) => next.push(best),
                None if index == 0 => break 'search,
                // the slot goes inactive; later slots shift left
                None => {}
            }
        }
        drop(expansions);
        slots = next;
        depth += 1;
        tracing::trace!(depth, slots = slots.len(), "monotonic beam iteration");
    }
    Ok(())
}

/// Monotonic beam search over a mutable state, one snapshot per slot.
pub fn monotonic_beam_search_mut<S, C, R>(
    control: &mut C,
    root: &S,
    beam_width: usize,
    mut rank: R,
    filter_width: usize,
    depth_limit: usize,
) -> Result<(), SearchError>
where
    S: MutableState,
    C: Control<S> + ?Sized,
    R: FnMut(&S) -> f32,
{
    let mut adapter = SnapshotControl::new(control);
    monotonic_beam_search(
        &mut adapter,
        Snapshot(root.clone()),
        beam_width,
        move |s: &Snapshot<S>| rank(&s.0),
        filter_width,
        depth_limit,
    )
}

pub fn monotonic_beam_search_from<S, R>(
    root: S,
    options: SearchOptions<S>,
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
) -> Result<SearchControl<S>, SearchError>
where
    S: State,
    R: FnMut(&S) -> f32,
{
    run_from(root, options, |control, root| {
        monotonic_beam_search(control, root, beam_width, rank, filter_width, depth_limit)
    })
}

pub fn monotonic_beam_search_async<S, R>(
    root: S,
    options: SearchOptions<S>,
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
) -> SearchHandle<S>
where
    S: State + Send + 'static,
    R: FnMut(&S) -> f32 + Send + 'static,
{
    spawn_from(root, options, move |control, root| {
        monotonic_beam_search(control, root, beam_width, rank, filter_width, depth_limit)
    })
}

pub fn monotonic_beam_search_mut_from<S, R>(
    root: S,
    options: SearchOptions<S>,
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
) -> Result<SearchControl<S>, SearchError>
where
    S: MutableState,
    R: FnMut(&S) -> f32,
{
    run_from_mut(root, options, |control, state| {
        monotonic_beam_search_mut(control, state, beam_width, rank, filter_width, depth_limit)
    })
}

pub fn monotonic_beam_search_mut_async<S, R>(
    root: S,
    options: SearchOptions<S>,
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
) -> SearchHandle<S>
where
    S: MutableState + Send + 'static,
    R: FnMut(&S) -> f32 + Send + 'static,
{
    spawn_from_mut(root, options, move |control, state| {
        monotonic_beam_search_mut(control, state, beam_width, rank, filter_width, depth_limit)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::SearchControl;
    use crate::model::Maximize;

    // binary tree; the right spine hides the single best leaf behind bad ranks
    #[derive(Clone)]
    struct Deceptive {
        path: Vec<u8>,
        height: usize,
    }

    impl Deceptive {
        fn root(height: usize) -> Self {
            Deceptive { path: vec![], height }
        }

        fn score(&self) -> i64 {
            if self.path.iter().all(|&b| b == 1) {
                100 + self.path.len() as i64
            } else {
                self.path.iter().map(|&b| (1 - b) as i64).sum()
            }
        }
    }

    impl Qualifiable for Deceptive {
        type Qual = Maximize;

        fn is_terminal(&self) -> bool {
            self.path.len() == self.height
        }

        fn bound(&self) -> Maximize {
            Maximize(i64::MAX)
        }

        fn quality(&self) -> Option<Maximize> {
            self.is_terminal().then(|| Maximize(self.score()))
        }
    }

    impl State for Deceptive {
        fn branches(&self) -> Box<dyn Iterator<Item = Self> + '_> {
            if self.is_terminal() {
                return Box::new(std::iter::empty());
            }
            Box::new((0..2u8).map(move |b| {
                let mut path = self.path.clone();
                path.push(b);
                Deceptive { path, height: self.height }
            }))
        }
    }

    // prefer left branches: the deceptive rank that hides the optimum
    fn rank(s: &Deceptive) -> f32 {
        s.path.iter().map(|&b| b as f32).sum()
    }

    #[test]
    fn widening_the_beam_never_hurts() {
        let mut previous: Option<i64> = None;
        for width in 1..=6 {
            let mut control = SearchControl::new(Deceptive::root(4));
            monotonic_beam_search(&mut control, Deceptive::root(4), width, rank, usize::MAX, usize::MAX)
                .unwrap();
            let best = control.best_quality().map(|q| q.0).expect("a leaf is always reached");
            if let Some(prev) = previous {
                assert!(best >= prev, "width {width} degraded {prev} -> {best}");
            }
            previous = Some(best);
        }
    }

    #[test]
    fn unit_width_is_a_greedy_descent() {
        let mut control = SearchControl::new(Deceptive::root(4));
        monotonic_beam_search(&mut control, Deceptive::root(4), 1, rank, usize::MAX, usize::MAX).unwrap();
        // all-left path scores 4
        assert_eq!(control.best_quality(), Some(&Maximize(4)));
    }

    #[test]
    fn degenerate_width_combination_is_rejected() {
        let mut control = SearchControl::new(Deceptive::root(2));
        assert!(monotonic_beam_search(&mut control, Deceptive::root(2), 3, rank, 1, 10).is_err());
    }
}
