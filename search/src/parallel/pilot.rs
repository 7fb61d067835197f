//! Parallel PILOT method.

use crate::control::{SearchControl, SearchOptions, VisitOutcome, Wrapped};
use crate::model::{MutableState, Quality, Snapshot, State};
use crate::parallel::{chunked, resolve_workers};
use crate::search::lookahead::Lookahead;
use crate::search::{check, run_from, run_from_mut, spawn_from, spawn_from_mut, SearchHandle};
use crate::SearchError;
use std::sync::Mutex;

/// PILOT with the branch evaluations of every depth step fanned out across
/// workers. The per-branch best qualities are reduced deterministically: best
/// quality wins, ties go to the smallest enumeration index. The main thread then
/// commits the winner and proceeds to the next depth.
pub fn parallel_pilot<S, L>(
    control: &mut SearchControl<S>,
    root: S,
    lookahead: &L,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> Result<(), SearchError>
where
    S: State + Send,
    L: Lookahead<S> + Sync,
{
    check(filter_width >= 1, "filter_width must be at least 1")?;
    check(depth_limit >= 1, "depth_limit must be at least 1")?;
    let workers = resolve_workers(max_parallelism)?;

    if control.visit_node(&root) == VisitOutcome::Discard {
        return Ok(());
    }
    let mut current = root;
    let mut depth = 0;

    while depth < depth_limit && !control.should_stop() && !current.is_terminal() {
        let mut branches: Vec<S> = current.branches().take(filter_width).collect();
        if branches.is_empty() {
            break;
        }
        let evaluations: Vec<(usize, S)> = branches.iter().cloned().enumerate().collect();
        let chunks = chunked(evaluations, workers);
        let shared = Mutex::new(&mut *control);
        let (verdict_snd, verdict_rcv) = crossbeam_channel::unbounded();
        std::thread::scope(|scope| {
            for chunk in chunks {
                let shared = &shared;
                let verdict_snd = verdict_snd.clone();
                scope.spawn(move || {
                    let mut local = shared.lock().unwrap().fork(chunk[0].1.clone(), true);
                    for (index, branch) in chunk {
                        if local.should_stop() {
                            break;
                        }
                        let promise = if branch.is_terminal() {
                            match local.visit_node(&branch) {
                                VisitOutcome::Discard => None,
                                VisitOutcome::Ok => branch.quality(),
                            }
                        } else {
                            let mut wrapped = Wrapped::new(&mut local);
                            match lookahead.run(&mut wrapped, branch.clone()) {
                                Ok(()) => wrapped.into_best_quality(),
                                Err(e) => {
                                    let _ = verdict_snd.send(Err(e));
                                    break;
                                }
                            }
                        };
                        if let Some(quality) = promise {
                            let _ = verdict_snd.send(Ok((index, quality)));
                        }
                    }
                    shared.lock().unwrap().merge(local);
                });
            }
        });
        drop(verdict_snd);

        let mut winner: Option<(usize, S::Qual)> = None;
        for verdict in verdict_rcv {
            let (index, quality) = verdict?;
            winner = Some(match winner {
                None => (index, quality),
                Some((best_index, best)) => {
                    if quality.is_better_than(&best) {
                        (index, quality)
                    } else if !best.is_better_than(&quality) && index < best_index {
                        // tie on quality: the enumeration order decides
                        (index, quality)
                    } else {
                        (best_index, best)
                    }
                }
            });
        }
        // fallback to the first branch when no evaluation produced a quality
        let index = winner.map_or(0, |(i, _)| i);
        current = branches.swap_remove(index);
        depth += 1;
    }
    Ok(())
}

/// Parallel PILOT over a mutable state, running on snapshots and merged back into
/// the caller's control at the end.
pub fn parallel_pilot_mut<S, L>(
    control: &mut SearchControl<S>,
    root: &S,
    lookahead: &L,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> Result<(), SearchError>
where
    S: MutableState + Send,
    L: Lookahead<Snapshot<S>> + Sync,
{
    let mut inner = control.fork_mapped(Snapshot(root.clone()), true);
    let result = parallel_pilot(
        &mut inner,
        Snapshot(root.clone()),
        lookahead,
        filter_width,
        depth_limit,
        max_parallelism,
    );
    control.merge_mapped(inner, |snapshot| snapshot.0);
    result
}

pub fn parallel_pilot_from<S, L>(
    root: S,
    options: SearchOptions<S>,
    lookahead: L,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> Result<SearchControl<S>, SearchError>
where
    S: State + Send,
    L: Lookahead<S> + Sync,
{
    run_from(root, options, |control, root| {
        parallel_pilot(control, root, &lookahead, filter_width, depth_limit, max_parallelism)
    })
}

pub fn parallel_pilot_async<S, L>(
    root: S,
    options: SearchOptions<S>,
    lookahead: L,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> SearchHandle<S>
where
    S: State + Send + 'static,
    L: Lookahead<S> + Sync + Send + 'static,
{
    spawn_from(root, options, move |control, root| {
        parallel_pilot(control, root, &lookahead, filter_width, depth_limit, max_parallelism)
    })
}

pub fn parallel_pilot_mut_from<S, L>(
    root: S,
    options: SearchOptions<S>,
    lookahead: L,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> Result<SearchControl<S>, SearchError>
where
    S: MutableState + Send,
    L: Lookahead<Snapshot<S>> + Sync,
{
    run_from_mut(root, options, |control, state| {
        parallel_pilot_mut(control, state, &lookahead, filter_width, depth_limit, max_parallelism)
    })
}

pub fn parallel_pilot_mut_async<S, L>(
    root: S,
    options: SearchOptions<S>,
    lookahead: L,
    filter_width: usize,
    depth_limit: usize,
    max_parallelism: i32,
) -> SearchHandle<S>
where
    S: MutableState + Send + 'static,
    L: Lookahead<Snapshot<S>> + Sync + Send + 'static,
{
    spawn_from_mut(root, options, move |control, state| {
        parallel_pilot_mut(control, state, &lookahead, filter_width, depth_limit, max_parallelism)
    })
}
