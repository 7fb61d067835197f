//! PILOT method: at every depth, evaluate each candidate branch by a full
//! lookahead, then commit to the branch whose lookahead promised the best quality.

use crate::control::{Control, SearchControl, SearchOptions, VisitOutcome, Wrapped};
use crate::model::{MutableState, Quality, State};
use crate::search::lookahead::{Lookahead, LookaheadMut};
use crate::search::{check, run_from, run_from_mut, spawn_from, spawn_from_mut, SearchHandle};
use crate::SearchError;
use smallvec::SmallVec;

/// PILOT over branch-producing states.
///
/// Branch evaluations run against a [`Wrapped`] control, so they are compared by
/// the quality they found themselves while still pruning against (and improving)
/// the global incumbent. A branch whose evaluation found no quality at all is only
/// taken as a last resort: if no branch has one, the search falls back to the
/// first branch.
pub fn pilot<S, C, L>(
    control: &mut C,
    root: S,
    lookahead: &L,
    filter_width: usize,
    depth_limit: usize,
) -> Result<(), SearchError>
where
    S: State,
    C: Control<S> + ?Sized,
    L: Lookahead<S>,
{
    check(filter_width >= 1, "filter_width must be at least 1")?;
    check(depth_limit >= 1, "depth_limit must be at least 1")?;

    if control.visit_node(&root) == VisitOutcome::Discard {
        return Ok(());
    }
    let mut current = root;
    let mut depth = 0;

    while depth < depth_limit && !control.should_stop() && !current.is_terminal() {
        let mut chosen: Option<(S::Qual, S)> = None;
        let mut first: Option<S> = None;
        for (index, branch) in current.branches().take(filter_width).enumerate() {
            if index == 0 {
                first = Some(branch.clone());
            }
            let promise = evaluate_branch(control, &branch, lookahead)?;
            if let Some(quality) = promise {
                let improves = match &chosen {
                    Some((best, _)) => quality.is_better_than(best),
                    None => true,
                };
                if improves {
                    chosen = Some((quality, branch));
                }
            }
        }
        current = match (chosen, first) {
            (Some((_, branch)), _) => branch,
            (None, Some(branch)) => branch,
            (None, None) => break,
        };
        depth += 1;
    }
    Ok(())
}

fn evaluate_branch<S, C, L>(
    control: &mut C,
    branch: &S,
    lookahead: &L,
) -> Result<Option<S::Qual>, SearchError>
where
    S: State,
    C: Control<S> + ?Sized,
    L: Lookahead<S>,
{
    if branch.is_terminal() {
        return Ok(match control.visit_node(branch) {
            VisitOutcome::Discard => None,
            VisitOutcome::Ok => branch.quality(),
        });
    }
    let mut wrapped = Wrapped::new(control);
    lookahead.run(&mut wrapped, branch.clone())?;
    Ok(wrapped.into_best_quality())
}

/// PILOT over a mutable state, advancing the state in place: choices under
/// evaluation are applied and undone, and the winning choice of every depth step
/// stays applied. The state ends on the constructed trajectory.
pub fn pilot_mut<S, C, L>(
    control: &mut C,
    state: &mut S,
    lookahead: &L,
    filter_width: usize,
    depth_limit: usize,
) -> Result<(), SearchError>
where
    S: MutableState,
    C: Control<S> + ?Sized,
    L: LookaheadMut<S>,
{
    check(filter_width >= 1, "filter_width must be at least 1")?;
    check(depth_limit >= 1, "depth_limit must be at least 1")?;

    if control.visit_node(state) == VisitOutcome::Discard {
        return Ok(());
    }
    let mut depth = 0;

    while depth < depth_limit && !control.should_stop() && !state.is_terminal() {
        let choices: SmallVec<[S::Choice; 8]> = state.choices().take(filter_width).collect();
        if choices.is_empty() {
            break;
        }
        let mut chosen: Option<(S::Qual, usize)> = None;
        for (index, choice) in choices.iter().enumerate() {
            state.apply(choice.clone());
            let promise = if state.is_terminal() {
                match control.visit_node(state) {
                    VisitOutcome::Discard => None,
                    VisitOutcome::Ok => state.quality(),
                }
            } else {
                let mut wrapped = Wrapped::new(control);
                match lookahead.run(&mut wrapped, state) {
                    Ok(()) => wrapped.into_best_quality(),
                    Err(e) => {
                        state.undo_last();
                        return Err(e);
                    }
                }
            };
            state.undo_last();
            if let Some(quality) = promise {
                let improves = match &chosen {
                    Some((best, _)) => quality.is_better_than(best),
                    None => true,
                };
                if improves {
                    chosen = Some((quality, index));
                }
            }
        }
        // fallback to the first choice when no evaluation produced a quality
        let index = chosen.map_or(0, |(_, i)| i);
        state.apply(choices[index].clone());
        depth += 1;
    }
    Ok(())
}

pub fn pilot_from<S, L>(
    root: S,
    options: SearchOptions<S>,
    lookahead: L,
    filter_width: usize,
    depth_limit: usize,
) -> Result<SearchControl<S>, SearchError>
where
    S: State,
    L: Lookahead<S>,
{
    run_from(root, options, |control, root| {
        pilot(control, root, &lookahead, filter_width, depth_limit)
    })
}

pub fn pilot_async<S, L>(
    root: S,
    options: SearchOptions<S>,
    lookahead: L,
    filter_width: usize,
    depth_limit: usize,
) -> SearchHandle<S>
where
    S: State + Send + 'static,
    L: Lookahead<S> + Send + 'static,
{
    spawn_from(root, options, move |control, root| {
        pilot(control, root, &lookahead, filter_width, depth_limit)
    })
}

pub fn pilot_mut_from<S, L>(
    root: S,
    options: SearchOptions<S>,
    lookahead: L,
    filter_width: usize,
    depth_limit: usize,
) -> Result<SearchControl<S>, SearchError>
where
    S: MutableState,
    L: LookaheadMut<S>,
{
    run_from_mut(root, options, |control, state| {
        pilot_mut(control, state, &lookahead, filter_width, depth_limit)
    })
}

pub fn pilot_mut_async<S, L>(
    root: S,
    options: SearchOptions<S>,
    lookahead: L,
    filter_width: usize,
    depth_limit: usize,
) -> SearchHandle<S>
where
    S: MutableState + Send + 'static,
    L: LookaheadMut<S> + Send + 'static,
{
    spawn_from_mut(root, options, move |control, state| {
        pilot_mut(control, state, &lookahead, filter_width, depth_limit)
    })
}
