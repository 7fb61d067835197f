//! Layered beam search.

use crate::collections::RankedLayer;
use crate::control::{Control, SearchControl, SearchOptions, SnapshotControl, VisitOutcome};
use crate::model::{MutableState, Snapshot, State};
use crate::search::{check, run_from, run_from_mut, spawn_from, spawn_from_mut, SearchHandle};
use crate::SearchError;

pub(crate) fn check_beam_params(
    beam_width: usize,
    filter_width: usize,
    depth_limit: usize,
) -> Result<(), SearchError> {
    check(beam_width >= 1, "beam_width must be at least 1")?;
    check(filter_width >= 1, "filter_width must be at least 1")?;
    check(depth_limit >= 1, "depth_limit must be at least 1")?;
    // a single-branch expansion can never fill more than one slot
    check(
        !(filter_width == 1 && beam_width > 1),
        "beam_width > 1 requires filter_width > 1",
    )
}

/// Classic layered beam search: per layer, expand up to `filter_width` branches of
/// every state, rank the survivors and keep the `beam_width` best.
///
/// `rank` is minimized; equal ranks keep their insertion order, so the retained
/// layer is deterministic for a deterministic model.
pub fn beam_search<S, C, R>(
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
    let mut layer = RankedLayer::from_root(root);
    let mut depth = 0;

    'search: while depth < depth_limit {
        while let Some(state) = layer.pop_current() {
            if control.should_stop() {
                break 'search;
            }
            for child in state.branches().take(filter_width) {
                if control.visit_node(&child) == VisitOutcome::Discard {
                    continue;
                }
                let r = rank(&child);
                layer.push_next(child, r);
            }
        }
        if layer.next_is_empty() {
            break;
        }
        layer.advance_layer(beam_width);
        depth += 1;
        tracing::trace!(depth, "beam layer advanced");
    }
    Ok(())
}

/// Beam search over a mutable state; every retained layer entry is an independent
/// snapshot.
pub fn beam_search_mut<S, C, R>(
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
    beam_search(
        &mut adapter,
        Snapshot(root.clone()),
        beam_width,
        move |s: &Snapshot<S>| rank(&s.0),
        filter_width,
        depth_limit,
    )
}

pub fn beam_search_from<S, R>(
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
        beam_search(control, root, beam_width, rank, filter_width, depth_limit)
    })
}

pub fn beam_search_async<S, R>(
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
        beam_search(control, root, beam_width, rank, filter_width, depth_limit)
    })
}

pub fn beam_search_mut_from<S, R>(
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
        beam_search_mut(control, state, beam_width, rank, filter_width, depth_limit)
    })
}

pub fn beam_search_mut_async<S, R>(
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
        beam_search_mut(control, state, beam_width, rank, filter_width, depth_limit)
    })
}
