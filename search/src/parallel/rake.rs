//! Parallel rake search.

use crate::control::{SearchControl, SearchOptions};
use crate::model::{MutableState, Snapshot, State};
use crate::parallel::{chunked, resolve_workers};
use crate::search::bfs::breadth_first;
use crate::search::lookahead::Lookahead;
use crate::search::{check, run_from, run_from_mut, spawn_from, spawn_from_mut, SearchHandle};
use crate::SearchError;
use std::sync::Mutex;

/// Rake search with the lookaheads parallelized over the rake nodes. The
/// breadth-first phase runs sequentially on the outer control; the frontier is
/// then partitioned across workers following the fork/merge pattern.
pub fn parallel_rake_search<S, L>(
    control: &mut SearchControl<S>,
    root: S,
    rake_width: usize,
    lookahead: &L,
    max_parallelism: i32,
) -> Result<(), SearchError>
where
    S: State + Send,
    L: Lookahead<S> + Sync,
{
    check(rake_width >= 1, "rake_width must be at least 1")?;
    let workers = resolve_workers(max_parallelism)?;

    let frontier = breadth_first(control, root, usize::MAX, usize::MAX, rake_width)?;
    let seeds: Vec<S> = frontier.into_iter().collect();
    if seeds.is_empty() {
        return Ok(());
    }
    let chunks = chunked(seeds, workers);
    tracing::trace!(workers = chunks.len(), "parallel rake region");
    let shared = Mutex::new(&mut *control);
    let (err_snd, err_rcv) = crossbeam_channel::unbounded();
    std::thread::scope(|scope| {
        for chunk in chunks {
            let shared = &shared;
            let err_snd = err_snd.clone();
            scope.spawn(move || {
                let mut local = shared.lock().unwrap().fork(chunk[0].clone(), true);
                for seed in chunk {
                    if local.should_stop() {
                        break;
                    }
                    if let Err(e) = lookahead.run(&mut local, seed) {
                        let _ = err_snd.send(e);
                        break;
                    }
                }
                shared.lock().unwrap().merge(local);
            });
        }
    });
    drop(err_snd);
    match err_rcv.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Parallel rake over a mutable state: the frontier and the lookaheads run on
/// snapshots, merged back into the caller's control at the end.
pub fn parallel_rake_search_mut<S, L>(
    control: &mut SearchControl<S>,
    root: &S,
    rake_width: usize,
    lookahead: &L,
    max_parallelism: i32,
) -> Result<(), SearchError>
where
    S: MutableState + Send,
    L: Lookahead<Snapshot<S>> + Sync,
{
    let mut inner = control.fork_mapped(Snapshot(root.clone()), true);
    let result =
        parallel_rake_search(&mut inner, Snapshot(root.clone()), rake_width, lookahead, max_parallelism);
    control.merge_mapped(inner, |snapshot| snapshot.0);
    result
}

pub fn parallel_rake_search_from<S, L>(
    root: S,
    options: SearchOptions<S>,
    rake_width: usize,
    lookahead: L,
    max_parallelism: i32,
) -> Result<SearchControl<S>, SearchError>
where
    S: State + Send,
    L: Lookahead<S> + Sync,
{
    run_from(root, options, |control, root| {
        parallel_rake_search(control, root, rake_width, &lookahead, max_parallelism)
    })
}

pub fn parallel_rake_search_async<S, L>(
    root: S,
    options: SearchOptions<S>,
    rake_width: usize,
    lookahead: L,
    max_parallelism: i32,
) -> SearchHandle<S>
where
    S: State + Send + 'static,
    L: Lookahead<S> + Sync + Send + 'static,
{
    spawn_from(root, options, move |control, root| {
        parallel_rake_search(control, root, rake_width, &lookahead, max_parallelism)
    })
}

pub fn parallel_rake_search_mut_from<S, L>(
    root: S,
    options: SearchOptions<S>,
    rake_width: usize,
    lookahead: L,
    max_parallelism: i32,
) -> Result<SearchControl<S>, SearchError>
where
    S: MutableState + Send,
    L: Lookahead<Snapshot<S>> + Sync,
{
    run_from_mut(root, options, |control, state| {
        parallel_rake_search_mut(control, state, rake_width, &lookahead, max_parallelism)
    })
}

pub fn parallel_rake_search_mut_async<S, L>(
    root: S,
    options: SearchOptions<S>,
    rake_width: usize,
    lookahead: L,
    max_parallelism: i32,
) -> SearchHandle<S>
where
    S: MutableState + Send + 'static,
    L: Lookahead<Snapshot<S>> + Sync + Send + 'static,
{
    spawn_from_mut(root, options, move |control, state| {
        parallel_rake_search_mut(control, state, rake_width, &lookahead, max_parallelism)
    })
}
