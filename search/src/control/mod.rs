//! Runtime control of a search: termination, bound pruning, incumbent tracking and
//! fork/merge for concurrent sub-searches.

mod wrapped;

pub use wrapped::{SnapshotControl, Wrapped};

use crate::model::{Qualifiable, Quality};
use crate::utils::EnvParam;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// If true, incumbent improvements and merges will be logged to the standard output.
static LOG_IMPROVEMENTS: EnvParam<bool> = EnvParam::new("TREESEARCH_LOG_IMPROVEMENTS", "false");

/// Macro that uses the same syntax as `println!()` but:
///  - only evaluates arguments and prints if `LOG_IMPROVEMENTS` is true.
///  - prepends the thread id to the line.
macro_rules! log_impr {
    ($($arg:tt)+) => {
        if LOG_IMPROVEMENTS.get() {
            print!("[{:?}] ", std::thread::current().id());
            println!($($arg)+);
        }
    }
}

/// Outcome of visiting a node. On `Discard` the caller must not expand the node's
/// children: its bound proves the subtree cannot beat the incumbent.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum VisitOutcome {
    Ok,
    Discard,
}

/// Shared cancellation signal. Clones observe the same flag; cancelling is
/// irrevocable for the searches holding the token.
#[derive(Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Callback fired on every strict incumbent improvement. In parallel searches it may
/// fire from any worker thread.
pub type ImprovementCallback<S> =
    Arc<dyn Fn(&SearchControl<S>, &S, &<S as Qualifiable>::Qual) + Send + Sync>;

/// The capabilities an algorithm needs from its controlling context.
///
/// Implemented by [`SearchControl`] and by the adapters in this module; algorithms
/// are generic over it so that a lookahead can run against a wrapped control exactly
/// like a top-level search runs against the real one.
pub trait Control<S: Qualifiable> {
    /// True iff the search must terminate now. Idempotent, no side effects.
    fn should_stop(&self) -> bool;

    /// Accounts for one visited node and classifies it: `Discard` iff the incumbent
    /// proves the subtree useless. Updates the incumbent when the node carries a
    /// strictly better quality.
    fn visit_node(&mut self, state: &S) -> VisitOutcome;
}

/// Recognized configuration for a [`SearchControl`].
///
/// ```
/// use treesearch::prelude::*;
/// use std::time::Duration;
///
/// # #[derive(Clone)] struct S;
/// # impl Qualifiable for S {
/// #     type Qual = Minimize;
/// #     fn is_terminal(&self) -> bool { true }
/// #     fn bound(&self) -> Minimize { Minimize(0) }
/// #     fn quality(&self) -> Option<Minimize> { Some(Minimize(0)) }
/// # }
/// let control = SearchOptions::default()
///     .runtime_limit(Duration::from_secs(1))
///     .node_limit(1_000_000)
///     .start(S);
/// ```
pub struct SearchOptions<S: Qualifiable> {
    runtime_limit: Option<Duration>,
    node_limit: Option<u64>,
    cancellation: Option<Cancellation>,
    upper_bound: Option<S::Qual>,
    on_improvement: Option<ImprovementCallback<S>>,
}

impl<S: Qualifiable> Default for SearchOptions<S> {
    fn default() -> Self {
        SearchOptions {
            runtime_limit: None,
            node_limit: None,
            cancellation: None,
            upper_bound: None,
            on_improvement: None,
        }
    }
}

impl<S: Qualifiable> SearchOptions<S> {
    /// Wall-clock budget for the search.
    pub fn runtime_limit(mut self, limit: Duration) -> Self {
        self.runtime_limit = Some(limit);
        self
    }

    /// Maximum number of visited nodes.
    pub fn node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// External cancellation signal, shared with any forked sub-search.
    pub fn cancellation(mut self, token: Cancellation) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Seeds the incumbent quality without a state, enabling bound pruning from the
    /// start. A state is only recorded once a strictly better solution is visited.
    pub fn upper_bound(mut self, quality: S::Qual) -> Self {
        self.upper_bound = Some(quality);
        self
    }

    /// Callback fired on every strict improvement, from whichever thread observed
    /// it.
    pub fn on_improvement(
        mut self,
        callback: impl Fn(&SearchControl<S>, &S, &S::Qual) + Send + Sync + 'static,
    ) -> Self {
        self.on_improvement = Some(Arc::new(callback));
        self
    }

    /// Builds the control that will drive a search from `root`.
    pub fn start(self, root: S) -> SearchControl<S> {
        SearchControl {
            root,
            best_quality: self.upper_bound,
            best_state: None,
            start: Instant::now(),
            runtime_limit: self.runtime_limit.unwrap_or(Duration::MAX),
            node_limit: self.node_limit.unwrap_or(u64::MAX),
            visited: 0,
            cancellation: self.cancellation.unwrap_or_default(),
            on_improvement: self.on_improvement,
            finished: false,
        }
    }
}

/// Tracks one search (or one forked sub-search): its incumbent, budgets and
/// termination state.
///
/// The outer caller owns the control; algorithms mutate it through
/// [`visit_node`](SearchControl::visit_node). Forks are independent value copies
/// with inherited remaining budgets and a private visited counter, merged back with
/// [`merge`](SearchControl::merge).
pub struct SearchControl<S: Qualifiable> {
    root: S,
    best_quality: Option<S::Qual>,
    best_state: Option<S>,
    start: Instant,
    runtime_limit: Duration,
    node_limit: u64,
    visited: u64,
    cancellation: Cancellation,
    on_improvement: Option<ImprovementCallback<S>>,
    finished: bool,
}

impl<S: Qualifiable> SearchControl<S> {
    /// A control with no limits, no seed incumbent and a fresh cancellation token.
    pub fn new(root: S) -> Self {
        SearchOptions::default().start(root)
    }

    pub fn root(&self) -> &S {
        &self.root
    }

    pub fn best_quality(&self) -> Option<&S::Qual> {
        self.best_quality.as_ref()
    }

    pub fn best_state(&self) -> Option<&S> {
        self.best_state.as_ref()
    }

    /// Consumes the control, returning the incumbent quality together with its
    /// state. `None` when no solution was visited (a seeded upper bound alone does
    /// not count).
    pub fn into_result(self) -> Option<(S::Qual, S)> {
        match (self.best_quality, self.best_state) {
            (Some(q), Some(s)) => Some((q, s)),
            _ => None,
        }
    }

    pub fn visited(&self) -> u64 {
        self.visited
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    /// Marks the search as finished; every later `should_stop` returns true.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// True iff the search must terminate: finished, cancelled, out of time or out
    /// of nodes.
    pub fn should_stop(&self) -> bool {
        self.finished
            || self.cancellation.is_cancelled()
            || self.start.elapsed() > self.runtime_limit
            || self.visited >= self.node_limit
    }

    /// Accounts for the node and prunes or records it.
    ///
    /// The node is discarded when an incumbent exists and the node's bound is not
    /// strictly better than it. Otherwise, a defined quality that strictly improves
    /// on the incumbent is adopted (the state is cloned) and the improvement
    /// callback fires.
    pub fn visit_node(&mut self, state: &S) -> VisitOutcome {
        self.visited += 1;
        if let Some(best) = &self.best_quality {
            if !state.bound().is_better_than(best) {
                return VisitOutcome::Discard;
            }
        }
        if let Some(quality) = state.quality() {
            let improves = match &self.best_quality {
                Some(best) => quality.is_better_than(best),
                None => true,
            };
            if improves {
                self.best_quality = Some(quality.clone());
                self.best_state = Some(state.clone());
                self.improved(state, &quality);
            }
        }
        VisitOutcome::Ok
    }

    /// Produces an independent control for a sub-search rooted at `root`: remaining
    /// budgets are inherited, counters start at zero, the cancellation token is
    /// shared. With `with_best`, the current incumbent quality is carried over so
    /// the child prunes against it.
    pub fn fork(&self, root: S, with_best: bool) -> Self {
        self.fork_with_limit(root, with_best, None)
    }

    /// Same as [`fork`](SearchControl::fork), additionally capping the child's
    /// runtime budget at `max_time`.
    pub fn fork_with_limit(&self, root: S, with_best: bool, max_time: Option<Duration>) -> Self {
        self.fork_mapped_with_limit(root, with_best, max_time)
    }

    /// Fork onto a different state shape sharing the quality type. This is how the
    /// snapshot-adapted parallel searches run: the sub-search is typed on the
    /// adapter, the caller's control on the plain state.
    pub(crate) fn fork_mapped<T>(&self, root: T, with_best: bool) -> SearchControl<T>
    where
        T: Qualifiable<Qual = S::Qual>,
    {
        self.fork_mapped_with_limit(root, with_best, None)
    }

    fn fork_mapped_with_limit<T>(
        &self,
        root: T,
        with_best: bool,
        max_time: Option<Duration>,
    ) -> SearchControl<T>
    where
        T: Qualifiable<Qual = S::Qual>,
    {
        let remaining = self.runtime_limit.saturating_sub(self.start.elapsed());
        SearchControl {
            root,
            best_quality: if with_best { self.best_quality.clone() } else { None },
            best_state: None,
            start: Instant::now(),
            runtime_limit: max_time.map_or(remaining, |m| remaining.min(m)),
            node_limit: self.node_limit.saturating_sub(self.visited),
            visited: 0,
            cancellation: self.cancellation.clone(),
            on_improvement: None,
            finished: false,
        }
    }

    /// Absorbs a finished sub-search: the visited count is added, and a strictly
    /// better child incumbent is adopted (firing the improvement callback).
    pub fn merge(&mut self, other: Self) {
        self.merge_mapped(other, |state| state)
    }

    pub(crate) fn merge_mapped<T>(&mut self, other: SearchControl<T>, unmap: impl FnOnce(T) -> S)
    where
        T: Qualifiable<Qual = S::Qual>,
    {
        self.visited += other.visited;
        let improves = match (&other.best_quality, &self.best_quality) {
            (Some(theirs), Some(ours)) => theirs.is_better_than(ours),
            (Some(_), None) => true,
            (None, _) => false,
        };
        if improves {
            log_impr!("< adopting child incumbent ({} nodes merged)", other.visited);
            self.best_quality = other.best_quality;
            self.best_state = other.best_state.map(unmap);
            if let (Some(state), Some(quality)) = (&self.best_state, &self.best_quality) {
                let (state, quality) = (state.clone(), quality.clone());
                self.fire_callback(&state, &quality);
            }
        }
        tracing::trace!(merged_nodes = other.visited, "merged sub-search");
    }

    fn improved(&mut self, state: &S, quality: &S::Qual) {
        log_impr!("* improvement after {} nodes", self.visited);
        tracing::debug!(visited = self.visited, "new incumbent");
        self.fire_callback(state, quality);
    }

    fn fire_callback(&mut self, state: &S, quality: &S::Qual) {
        if let Some(callback) = self.on_improvement.clone() {
            callback(self, state, quality);
        }
    }
}

impl<S: Qualifiable> Control<S> for SearchControl<S> {
    fn should_stop(&self) -> bool {
        SearchControl::should_stop(self)
    }

    fn visit_node(&mut self, state: &S) -> VisitOutcome {
        SearchControl::visit_node(self, state)
    }
}
