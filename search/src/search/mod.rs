//! Sequential search algorithms.
//!
//! Every algorithm exists in three call shapes:
//!  - extend a control: `algo(control, root, params...)`, the primitive form, also
//!    usable against a wrapped control from inside a lookahead;
//!  - start from a state: `algo_from(root, options, params...)` builds a
//!    [`SearchControl`], runs to completion and returns it;
//!  - asynchronous: `algo_async(...)` schedules the synchronous form on a thread
//!    and returns a [`SearchHandle`].
//!
//! Algorithms on [`MutableState`](crate::model::MutableState) models have dedicated
//! `_mut` entry points: depth-first, naive discrepancy search and PILOT walk the
//! tree by applying and undoing choices; the layered algorithms hold independent
//! snapshots per layer entry.

pub mod beam;
pub mod bfs;
pub mod dfs;
pub mod lds;
pub mod lookahead;
pub mod monotonic;
pub mod pilot;
pub mod rake;

use crate::control::{SearchControl, SearchOptions};
use crate::model::Qualifiable;
use crate::SearchError;
use std::thread::JoinHandle;

/// Completion handle of an `*_async` search.
pub struct SearchHandle<S: Qualifiable> {
    handle: JoinHandle<Result<SearchControl<S>, SearchError>>,
}

impl<S: Qualifiable> SearchHandle<S> {
    /// Waits for the search to complete and returns its control. A panic raised by
    /// the user model on the search thread is resumed on the joining thread.
    pub fn join(self) -> Result<SearchControl<S>, SearchError> {
        match self.handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

pub(crate) fn check(condition: bool, message: &'static str) -> Result<(), SearchError> {
    if condition {
        Ok(())
    } else {
        Err(SearchError::InvalidParameter(message))
    }
}

pub(crate) fn run_from<S, F>(
    root: S,
    options: SearchOptions<S>,
    run: F,
) -> Result<SearchControl<S>, SearchError>
where
    S: Qualifiable,
    F: FnOnce(&mut SearchControl<S>, S) -> Result<(), SearchError>,
{
    let mut control = options.start(root.clone());
    run(&mut control, root)?;
    control.finish();
    Ok(control)
}

pub(crate) fn run_from_mut<S, F>(
    root: S,
    options: SearchOptions<S>,
    run: F,
) -> Result<SearchControl<S>, SearchError>
where
    S: Qualifiable,
    F: FnOnce(&mut SearchControl<S>, &mut S) -> Result<(), SearchError>,
{
    let mut control = options.start(root.clone());
    let mut state = root;
    run(&mut control, &mut state)?;
    control.finish();
    Ok(control)
}

pub(crate) fn spawn_from<S, F>(root: S, options: SearchOptions<S>, run: F) -> SearchHandle<S>
where
    S: Qualifiable + Send + 'static,
    F: FnOnce(&mut SearchControl<S>, S) -> Result<(), SearchError> + Send + 'static,
{
    SearchHandle {
        handle: std::thread::spawn(move || run_from(root, options, run)),
    }
}

pub(crate) fn spawn_from_mut<S, F>(root: S, options: SearchOptions<S>, run: F) -> SearchHandle<S>
where
    S: Qualifiable + Send + 'static,
    F: FnOnce(&mut SearchControl<S>, &mut S) -> Result<(), SearchError> + Send + 'static,
{
    SearchHandle {
        handle: std::thread::spawn(move || run_from_mut(root, options, run)),
    }
}
