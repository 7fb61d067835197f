//! Depth-first exploration with filter, depth and backtrack limits.

use crate::collections::Lifo;
use crate::control::{Control, SearchControl, SearchOptions, VisitOutcome};
use crate::model::{MutableState, State};
use crate::search::{check, run_from, run_from_mut, spawn_from, spawn_from_mut, SearchHandle};
use crate::SearchError;
use smallvec::SmallVec;

/// Depth-first search over branch-producing states.
///
/// At most `filter_width` branches are expanded per node; nodes at `depth_limit`
/// are not expanded. `backtrack_limit` bounds the number of completed backtracks
/// (bounded-backtrack search): a backtrack completes whenever the next expanded
/// node is not a child of the previous one.
pub fn depth_first<S, C>(
    control: &mut C,
    root: S,
    filter_width: usize,
    depth_limit: usize,
    backtrack_limit: usize,
) -> Result<(), SearchError>
where
    S: State,
    C: Control<S> + ?Sized,
{
    check(filter_width >= 1, "filter_width must be at least 1")?;
    check(depth_limit >= 1, "depth_limit must be at least 1")?;

    if control.visit_node(&root) == VisitOutcome::Discard {
        return Ok(());
    }
    let mut stack = Lifo::new();
    stack.push((0usize, root));
    let mut backtracks = 0usize;
    let mut last_depth: Option<usize> = None;

    while !control.should_stop() {
        let Some((depth, state)) = stack.pop() else {
            break;
        };
        if let Some(last) = last_depth {
            if depth <= last {
                backtracks += 1;
                if backtracks > backtrack_limit {
                    break;
                }
            }
        }
        last_depth = Some(depth);
        if depth >= depth_limit {
            continue;
        }
        let mut children: SmallVec<[S; 8]> = SmallVec::new();
        for child in state.branches().take(filter_width) {
            if control.visit_node(&child) == VisitOutcome::Discard {
                continue;
            }
            children.push(child);
        }
        // pushed in reverse so the first branch is explored first
        while let Some(child) = children.pop() {
            stack.push((depth + 1, child));
        }
    }
    Ok(())
}

/// Depth-first search over a mutable state, walking the tree by applying and
/// undoing choices. The state is restored to its initial value before returning,
/// which makes this directly usable as a lookahead.
pub fn depth_first_mut<S, C>(
    control: &mut C,
    state: &mut S,
    filter_width: usize,
    depth_limit: usize,
    backtrack_limit: usize,
) -> Result<(), SearchError>
where
    S: MutableState,
    C: Control<S> + ?Sized,
{
    check(filter_width >= 1, "filter_width must be at least 1")?;
    check(depth_limit >= 1, "depth_limit must be at least 1")?;

    let mut depth = 0usize;
    if control.visit_node(state) == VisitOutcome::Discard {
        return Ok(());
    }
    let mut stack: Lifo<(usize, S::Choice)> = Lifo::new();
    push_choices(state, 1, filter_width, &mut stack);
    let mut backtracks = 0usize;

    while !control.should_stop() {
        let Some((target, choice)) = stack.pop() else {
            break;
        };
        if depth >= target {
            // moving to a sibling or an ancestor's sibling completes a backtrack
            backtracks += 1;
            if backtracks > backtrack_limit {
                break;
            }
            while depth >= target {
                state.undo_last();
                depth -= 1;
            }
        }
        state.apply(choice);
        depth += 1;
        debug_assert_eq!(depth, target);
        if control.visit_node(state) == VisitOutcome::Discard {
            continue;
        }
        if depth < depth_limit {
            push_choices(state, depth + 1, filter_width, &mut stack);
        }
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
    filter_width: usize,
    stack: &mut Lifo<(usize, S::Choice)>,
) {
    let mut choices: SmallVec<[S::Choice; 8]> = state.choices().take(filter_width).collect();
    while let Some(choice) = choices.pop() {
        stack.push((target, choice));
    }
}

pub fn depth_first_from<S: State>(
    root: S,
    options: SearchOptions<S>,
    filter_width: usize,
    depth_limit: usize,
    backtrack_limit: usize,
) -> Result<SearchControl<S>, SearchError> {
    run_from(root, options, |control, root| {
        depth_first(control, root, filter_width, depth_limit, backtrack_limit)
    })
}

pub fn depth_first_async<S>(
    root: S,
    options: SearchOptions<S>,
    filter_width: usize,
    depth_limit: usize,
    backtrack_limit: usize,
) -> SearchHandle<S>
where
    S: State + Send + 'static,
{
    spawn_from(root, options, move |control, root| {
        depth_first(control, root, filter_width, depth_limit, backtrack_limit)
    })
}

pub fn depth_first_mut_from<S: MutableState>(
    root: S,
    options: SearchOptions<S>,
    filter_width: usize,
    depth_limit: usize,
    backtrack_limit: usize,
) -> Result<SearchControl<S>, SearchError> {
    run_from_mut(root, options, |control, state| {
        depth_first_mut(control, state, filter_width, depth_limit, backtrack_limit)
    })
}

pub fn depth_first_mut_async<S>(
    root: S,
    options: SearchOptions<S>,
    filter_width: usize,
    depth_limit: usize,
    backtrack_limit: usize,
) -> SearchHandle<S>
where
    S: MutableState + Send + 'static,
{
    spawn_from_mut(root, options, move |control, state| {
        depth_first_mut(control, state, filter_width, depth_limit, backtrack_limit)
    })
}
