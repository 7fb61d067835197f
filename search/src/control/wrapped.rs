use crate::control::{Control, VisitOutcome};
use crate::model::{MutableState, Qualifiable, Quality, Snapshot};
use std::marker::PhantomData;

/// A control that delegates limits, node accounting and bound pruning to an outer
/// control but shadows the incumbent with its own best quality and state.
///
/// PILOT-style lookaheads run against a `Wrapped` control: the outer control keeps
/// counting nodes and pruning against the global incumbent (and still adopts any
/// genuine improvement found during the lookahead), while the caller reads only the
/// wrapped best to compare candidate branches against each other.
pub struct Wrapped<'a, S: Qualifiable, C: Control<S> + ?Sized> {
    inner: &'a mut C,
    best_quality: Option<S::Qual>,
    best_state: Option<S>,
}

impl<'a, S: Qualifiable, C: Control<S> + ?Sized> Wrapped<'a, S, C> {
    pub fn new(inner: &'a mut C) -> Self {
        Wrapped {
            inner,
            best_quality: None,
            best_state: None,
        }
    }

    /// Best quality observed through this wrapper, independently of the outer
    /// incumbent.
    pub fn best_quality(&self) -> Option<&S::Qual> {
        self.best_quality.as_ref()
    }

    pub fn best_state(&self) -> Option<&S> {
        self.best_state.as_ref()
    }

    pub fn into_best_quality(self) -> Option<S::Qual> {
        self.best_quality
    }
}

impl<S: Qualifiable, C: Control<S> + ?Sized> Control<S> for Wrapped<'_, S, C> {
    fn should_stop(&self) -> bool {
        self.inner.should_stop()
    }

    fn visit_node(&mut self, state: &S) -> VisitOutcome {
        let outcome = self.inner.visit_node(state);
        // the local best is updated even for discarded nodes: a quality that cannot
        // beat the global incumbent can still rank this branch among its siblings
        if let Some(quality) = state.quality() {
            let improves = match &self.best_quality {
                Some(best) => quality.is_better_than(best),
                None => true,
            };
            if improves {
                self.best_quality = Some(quality);
                self.best_state = Some(state.clone());
            }
        }
        outcome
    }
}

/// Adapter that lets a control over `S` drive a search over [`Snapshot<S>`].
///
/// The branch-based algorithms applied to a snapshotted mutable state report their
/// visits through this adapter, so the incumbent and the counters live in the
/// caller's control, typed on the plain state.
pub struct SnapshotControl<'a, S: MutableState, C: Control<S> + ?Sized> {
    inner: &'a mut C,
    _states: PhantomData<fn(&S)>,
}

impl<'a, S: MutableState, C: Control<S> + ?Sized> SnapshotControl<'a, S, C> {
    pub fn new(inner: &'a mut C) -> Self {
        SnapshotControl {
            inner,
            _states: PhantomData,
        }
    }
}

impl<S: MutableState, C: Control<S> + ?Sized> Control<Snapshot<S>> for SnapshotControl<'_, S, C> {
    fn should_stop(&self) -> bool {
        self.inner.should_stop()
    }

    fn visit_node(&mut self, state: &Snapshot<S>) -> VisitOutcome {
        self.inner.visit_node(&state.0)
    }
}
