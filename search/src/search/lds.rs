//! Limited discrepancy search.
//!
//! The discrepancy of a path is the sum, over its nodes, of the index of the taken
//! branch within its parent (the heuristically preferred first branch costs 0).
//! Only paths with accumulated discrepancy at most `max_discrepancy` are visited.

use crate::collections::Lifo;
use crate::control::{Control, SearchControl, SearchOptions, SnapshotControl, VisitOutcome};
use crate::model::{MutableState, Snapshot, State};
use crate::search::{run_from, run_from_mut, spawn_from, spawn_from_mut, SearchHandle};
use crate::SearchError;
use smallvec::SmallVec;

/// Single-stack limited discrepancy search, visiting nodes in depth-first order
/// intermixed by discrepancy. Children are enumerated in order and cut as soon as
/// their contribution would exceed the budget.
pub fn naive_lds<S, C>(control: &mut C, root: S, max_discrepancy: usize) -> Result<(), SearchError>
where
    S: State,
    C: Control<S> + ?Sized,
{
    if control.visit_node(&root) == VisitOutcome::Discard {
        return Ok(());
    }
    let mut stack = Lifo::new();
    stack.push((0usize, root));

    while !control.should_stop() {
        let Some((discrepancy, state)) = stack.pop() else {
            break;
        };
        let budget = max_discrepancy - discrepancy;
        let mut children: SmallVec<[(usize, S); 8]> = SmallVec::new();
        for (index, child) in state.branches().take(budget + 1).enumerate() {
            if control.visit_node(&child) == VisitOutcome::Discard {
                continue;
            }
            children.push((discrepancy + index, child));
        }
        while let Some(entry) = children.pop() {
            stack.push(entry);
        }
    }
    Ok(())
}

/// Undo-based naive limited discrepancy search over a mutable state. The state is
/// restored before returning.
pub fn naive_lds_mut<S, C>(
    control: &mut C,
    state: &mut S,
    max_discrepancy: usize,
) -> Result<(), SearchError>
where
    S: MutableState,
    C: Control<S> + ?Sized,
{
    let mut depth = 0usize;
    if control.visit_node(state) == VisitOutcome::Discard {
        return Ok(());
    }
    let mut stack: Lifo<(usize, usize, S::Choice)> = Lifo::new();
    push_choices(state, 1, 0, max_discrepancy, &mut stack);

    while !control.should_stop() {
        let Some((target, discrepancy, choice)) = stack.pop() else {
            break;
        };
        while depth >= target {
            state.undo_last();
            depth -= 1;
        }
        state.apply(choice);
        depth += 1;
        if control.visit_node(state) == VisitOutcome::Discard {
            continue;
        }
        push_choices(state, depth + 1, discrepancy, max_discrepancy, &mut stack);
    }

    while depth > 0 {
        state.undo_last();
        depth -= 1;
    }
    Ok(())
}

fn push_choices<S: MutableState>(
    state: &S,
    target: usize,
    discrepancy: usize,
    max_discrepancy: usize,
    stack: &mut Lifo<(usize, usize, S::Choice)>,
) {
    let budget = max_discrepancy - discrepancy;
    let mut choices: SmallVec<[(usize, S::Choice); 8]> = state
        .choices()
        .take(budget + 1)
        .enumerate()
        .map(|(index, choice)| (discrepancy + index, choice))
        .collect();
    while let Some((child_discrepancy, choice)) = choices.pop() {
        stack.push((target, child_discrepancy, choice));
    }
}

/// Anytime limited discrepancy search.
///
/// One stack per discrepancy level; the search always pops from the smallest
/// non-empty level and visits the node then, so every discrepancy-K node is visited
/// before any discrepancy-(K+1) node.
pub fn anytime_lds<S, C>(control: &mut C, root: S, max_discrepancy: usize) -> Result<(), SearchError>
where
    S: State,
    C: Control<S> + ?Sized,
{
    let mut stacks: Vec<Lifo<S>> = (0..=max_discrepancy).map(|_| Lifo::new()).collect();
    stacks[0].push(root);

    while !control.should_stop() {
        let Some(level) = stacks.iter().position(|s| !s.is_empty()) else {
            break;
        };
        let state = stacks[level].pop().expect("level was non-empty");
        if control.visit_node(&state) == VisitOutcome::Discard {
            continue;
        }
        let budget = max_discrepancy - level;
        for (index, child) in state.branches().take(budget + 1).enumerate() {
            stacks[level + index].push(child);
        }
    }
    Ok(())
}

/// Anytime limited discrepancy search over a mutable state. Sibling discrepancies
/// are revisited out of depth-first order, so every stack entry carries a state
/// clone.
pub fn anytime_lds_mut<S, C>(
    control: &mut C,
    root: &S,
    max_discrepancy: usize,
) -> Result<(), SearchError>
where
    S: MutableState,
    C: Control<S> + ?Sized,
{
    let mut adapter = SnapshotControl::new(control);
    anytime_lds(&mut adapter, Snapshot(root.clone()), max_discrepancy)
}

pub fn naive_lds_from<S: State>(
    root: S,
    options: SearchOptions<S>,
    max_discrepancy: usize,
) -> Result<SearchControl<S>, SearchError> {
    run_from(root, options, |control, root| naive_lds(control, root, max_discrepancy))
}

pub fn naive_lds_async<S>(
    root: S,
    options: SearchOptions<S>,
    max_discrepancy: usize,
) -> SearchHandle<S>
where
    S: State + Send + 'static,
{
    spawn_from(root, options, move |control, root| {
        naive_lds(control, root, max_discrepancy)
    })
}

pub fn naive_lds_mut_from<S: MutableState>(
    root: S,
    options: SearchOptions<S>,
    max_discrepancy: usize,
) -> Result<SearchControl<S>, SearchError> {
    run_from_mut(root, options, |control, state| {
        naive_lds_mut(control, state, max_discrepancy)
    })
}

pub fn naive_lds_mut_async<S>(
    root: S,
    options: SearchOptions<S>,
    max_discrepancy: usize,
) -> SearchHandle<S>
where
    S: MutableState + Send + 'static,
{
    spawn_from_mut(root, options, move |control, state| {
        naive_lds_mut(control, state, max_discrepancy)
    })
}

pub fn anytime_lds_from<S: State>(
    root: S,
    options: SearchOptions<S>,
    max_discrepancy: usize,
) -> Result<SearchControl<S>, SearchError> {
    run_from(root, options, |control, root| anytime_lds(control, root, max_discrepancy))
}

pub fn anytime_lds_async<S>(
    root: S,
    options: SearchOptions<S>,
    max_discrepancy: usize,
) -> SearchHandle<S>
where
    S: State + Send + 'static,
{
    spawn_from(root, options, move |control, root| {
        anytime_lds(control, root, max_discrepancy)
    })
}

pub fn anytime_lds_mut_from<S: MutableState>(
    root: S,
    options: SearchOptions<S>,
    max_discrepancy: usize,
) -> Result<SearchControl<S>, SearchError> {
    run_from_mut(root, options, |control, state| {
        anytime_lds_mut(control, state, max_discrepancy)
    })
}

pub fn anytime_lds_mut_async<S>(
    root: S,
    options: SearchOptions<S>,
    max_discrepancy: usize,
) -> SearchHandle<S>
where
    S: MutableState + Send + 'static,
{
    spawn_from_mut(root, options, move |control, state| {
        anytime_lds_mut(control, state, max_discrepancy)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::SearchControl;
    use crate::model::{Maximize, Qualifiable};
    use std::cell::RefCell;
    use std::rc::Rc;

    // binary tree logging the discrepancy of every visited leaf
    #[derive(Clone)]
    struct Logged {
        path: Vec<u8>,
        height: usize,
        log: Rc<RefCell<Vec<usize>>>,
    }

    impl Logged {
        fn root(height: usize, log: Rc<RefCell<Vec<usize>>>) -> Self {
            Logged { path: vec![], height, log }
        }

        fn discrepancy(&self) -> usize {
            self.path.iter().map(|&b| b as usize).sum()
        }
    }

    impl Qualifiable for Logged {
        type Qual = Maximize;

        fn is_terminal(&self) -> bool {
            self.path.len() == self.height
        }

        fn bound(&self) -> Maximize {
            Maximize(i64::MAX)
        }

        fn quality(&self) -> Option<Maximize> {
            if self.is_terminal() {
                self.log.borrow_mut().push(self.discrepancy());
                Some(Maximize(self.discrepancy() as i64))
            } else {
                None
            }
        }
    }

    impl State for Logged {
        fn branches(&self) -> Box<dyn Iterator<Item = Self> + '_> {
            if self.is_terminal() {
                return Box::new(std::iter::empty());
            }
            Box::new((0..2u8).map(move |b| {
                let mut path = self.path.clone();
                path.push(b);
                Logged {
                    path,
                    height: self.height,
                    log: self.log.clone(),
                }
            }))
        }
    }

    fn count_leaves(height: usize, max_discrepancy: usize) -> usize {
        // number of height-bit words with at most max_discrepancy ones
        (0..1u32 << height)
            .filter(|w| (w.count_ones() as usize) <= max_discrepancy)
            .count()
    }

    #[test]
    fn naive_lds_covers_exactly_the_budgeted_leaves() {
        for d in 0..=3 {
            let log = Rc::new(RefCell::new(Vec::new()));
            let mut control = SearchControl::new(Logged::root(3, log.clone()));
            naive_lds(&mut control, Logged::root(3, log.clone()), d).unwrap();
            let visited = log.borrow();
            assert_eq!(visited.len(), count_leaves(3, d), "discrepancy {d}");
            assert!(visited.iter().all(|&k| k <= d));
        }
    }

    #[test]
    fn anytime_lds_visits_levels_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut control = SearchControl::new(Logged::root(4, log.clone()));
        anytime_lds(&mut control, Logged::root(4, log.clone()), 2).unwrap();
        let visited = log.borrow();
        assert_eq!(visited.len(), count_leaves(4, 2));
        // leaves must appear grouped by non-decreasing discrepancy
        let mut sorted = visited.clone();
        sorted.sort_unstable();
        assert_eq!(*visited, sorted);
    }

    #[test]
    fn zero_discrepancy_is_the_heuristic_dive() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut control = SearchControl::new(Logged::root(5, log.clone()));
        anytime_lds(&mut control, Logged::root(5, log.clone()), 0).unwrap();
        assert_eq!(*log.borrow(), vec![0]);
    }
}
