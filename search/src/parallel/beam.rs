//! Parallel layered beam search.

use crate::control::{SearchControl, SearchOptions, VisitOutcome};
use crate::model::{MutableState, Snapshot, State};
use crate::parallel::{chunked, resolve_workers};
use crate::search::beam::check_beam_params;
use crate::search::{run_from, run_from_mut, spawn_from, spawn_from_mut, SearchHandle};
use crate::SearchError;
use std::sync::Mutex;

/// Parallel beam search.
///
/// Per layer, the current states are partitioned into contiguous chunks, one per
/// worker. A worker forks the control under the region mutex (so it inherits the
/// budget already consumed by earlier merges), expands its chunk into a local
/// ranked list and merges back. The locals are reassembled in chunk order and
/// stably sorted, so the retained layer is identical to the sequential result;
/// only the visitation order across workers is nondeterministic.
pub fn parallel_beam_search<S, R>(
    control: &mut SearchControl<S>,
    root: S,
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> Result<(), SearchError>
where
    S: State + Send,
    R: Fn(&S) -> f32 + Sync,
{
    check_beam_params(beam_width, filter_width, depth_limit)?;
    let workers = resolve_workers(max_parallelism)?;

    if control.visit_node(&root) == VisitOutcome::Discard {
        return Ok(());
    }
    let mut layer: Vec<S> = vec![root];
    let mut depth = 0;

    while depth < depth_limit && !control.should_stop() {
        let chunks = chunked(std::mem::take(&mut layer), workers);
        tracing::trace!(depth, workers = chunks.len(), "parallel beam layer");
        let shared = Mutex::new(&mut *control);
        let (results_snd, results_rcv) = crossbeam_channel::unbounded();
        std::thread::scope(|scope| {
            for (index, chunk) in chunks.into_iter().enumerate() {
                let shared = &shared;
                let rank = &rank;
                let results_snd = results_snd.clone();
                scope.spawn(move || {
                    let mut local = shared.lock().unwrap().fork(chunk[0].clone(), true);
                    let mut next: Vec<(f32, S)> = Vec::new();
                    for state in chunk {
                        if local.should_stop() {
                            break;
                        }
                        for child in state.branches().take(filter_width) {
                            if local.visit_node(&child) == VisitOutcome::Discard {
                                continue;
                            }
                            let r = rank(&child);
                            next.push((r, child));
                        }
                    }
                    shared.lock().unwrap().merge(local);
                    let _ = results_snd.send((index, next));
                });
            }
        });
        drop(results_snd);

        let mut collected: Vec<(usize, Vec<(f32, S)>)> = results_rcv.into_iter().collect();
        collected.sort_by_key(|(index, _)| *index);
        let mut union: Vec<(f32, S)> = collected.into_iter().flat_map(|(_, local)| local).collect();
        if union.is_empty() {
            break;
        }
        union.sort_by(|a, b| a.0.total_cmp(&b.0));
        union.truncate(beam_width);
        layer = union.into_iter().map(|(_, state)| state).collect();
        depth += 1;
    }
    Ok(())
}

/// Parallel beam search over a mutable state: the whole search runs on snapshots,
/// merged back into the caller's control at the end.
pub fn parallel_beam_search_mut<S, R>(
    control: &mut SearchControl<S>,
    root: &S,
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> Result<(), SearchError>
where
    S: MutableState + Send,
    R: Fn(&S) -> f32 + Sync,
{
    let mut inner = control.fork_mapped(Snapshot(root.clone()), true);
    let result = parallel_beam_search(
        &mut inner,
        Snapshot(root.clone()),
        beam_width,
        |s: &Snapshot<S>| rank(&s.0),
        filter_width,
        depth_limit,
        max_parallelism,
    );
    control.merge_mapped(inner, |snapshot| snapshot.0);
    result
}

pub fn parallel_beam_search_from<S, R>(
    root: S,
    options: SearchOptions<S>,
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> Result<SearchControl<S>, SearchError>
where
    S: State + Send,
    R: Fn(&S) -> f32 + Sync,
{
    run_from(root, options, |control, root| {
        parallel_beam_search(control, root, beam_width, rank, filter_width, depth_limit, max_parallelism)
    })
}

pub fn parallel_beam_search_async<S, R>(
    root: S,
    options: SearchOptions<S>,
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> SearchHandle<S>
where
    S: State + Send + 'static,
    R: Fn(&S) -> f32 + Sync + Send + 'static,
{
    spawn_from(root, options, move |control, root| {
        parallel_beam_search(control, root, beam_width, rank, filter_width, depth_limit, max_parallelism)
    })
}

pub fn parallel_beam_search_mut_from<S, R>(
    root: S,
    options: SearchOptions<S>,
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> Result<SearchControl<S>, SearchError>
where
    S: MutableState + Send,
    R: Fn(&S) -> f32 + Sync,
{
    run_from_mut(root, options, |control, state| {
        parallel_beam_search_mut(control, state, beam_width, rank, filter_width, depth_limit, max_parallelism)
    })
}

pub fn parallel_beam_search_mut_async<S, R>(
    root: S,
    options: SearchOptions<S>,
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> SearchHandle<S>
where
    S: MutableState + Send + 'static,
    R: Fn(&S) -> f32 + Sync + Send + 'static,
{
    spawn_from_mut(root, options, move |control, state| {
        parallel_beam_search_mut(control, state, beam_width, rank, filter_width, depth_limit, max_parallelism)
    })
}
