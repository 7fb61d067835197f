//! Breadth-first exploration with width, depth and frontier-size cuts.

use crate::collections::{Fifo, LayeredFifo};
use crate::control::{Control, SearchControl, SearchOptions, VisitOutcome};
use crate::model::{MutableState, State};
use crate::search::{check, run_from, spawn_from, SearchHandle};
use crate::SearchError;

/// The frontier a breadth-first search stopped at, dequeued in layer order.
///
/// When the search stopped mid-layer, the un-expanded predecessors come out before
/// the partially built next layer, so a caller can resume consistently.
pub struct Frontier<S> {
    states: Fifo<S>,
}

impl<S> Frontier<S> {
    fn empty() -> Self {
        Frontier { states: Fifo::new() }
    }

    fn from_layers(layers: LayeredFifo<S>) -> Self {
        let mut states = Fifo::new();
        states.extend(layers.into_states());
        Frontier { states }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn pop(&mut self) -> Option<S> {
        self.states.pop()
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.states.iter()
    }
}

impl<S> IntoIterator for Frontier<S> {
    type Item = S;
    type IntoIter = std::collections::vec_deque::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.into_iter()
    }
}

/// Breadth-first search over branch-producing states, returning the final layer
/// for rake or beam seeding.
///
/// `node_limit` caps the number of states held across the two layers; when it is
/// reached mid-layer the search returns early with the partial frontier.
pub fn breadth_first<S, C>(
    control: &mut C,
    root: S,
    filter_width: usize,
    depth_limit: usize,
    node_limit: usize,
) -> Result<Frontier<S>, SearchError>
where
    S: State,
    C: Control<S> + ?Sized,
{
    check(filter_width >= 1, "filter_width must be at least 1")?;
    check(depth_limit >= 1, "depth_limit must be at least 1")?;
    check(node_limit >= 1, "node_limit must be at least 1")?;

    if control.visit_node(&root) == VisitOutcome::Discard {
        return Ok(Frontier::empty());
    }
    let mut layers = LayeredFifo::from_root(root);
    let mut depth = 0;

    'search: while depth < depth_limit && !layers.current_is_empty() {
        loop {
            if control.should_stop() || layers.len() >= node_limit {
                break 'search;
            }
            let Some(state) = layers.pop_current() else {
                break;
            };
            for child in state.branches().take(filter_width) {
                if control.visit_node(&child) == VisitOutcome::Discard {
                    continue;
                }
                layers.push_next(child);
            }
        }
        layers.advance();
        depth += 1;
    }
    Ok(Frontier::from_layers(layers))
}

/// Breadth-first search over a mutable state. Layer entries cannot be restored by
/// undoing, so each child is an independent clone.
pub fn breadth_first_mut<S, C>(
    control: &mut C,
    root: S,
    filter_width: usize,
    depth_limit: usize,
    node_limit: usize,
) -> Result<Frontier<S>, SearchError>
where
    S: MutableState,
    C: Control<S> + ?Sized,
{
    check(filter_width >= 1, "filter_width must be at least 1")?;
    check(depth_limit >= 1, "depth_limit must be at least 1")?;
    check(node_limit >= 1, "node_limit must be at least 1")?;

    if control.visit_node(&root) == VisitOutcome::Discard {
        return Ok(Frontier::empty());
    }
    let mut layers = LayeredFifo::from_root(root);
    let mut depth = 0;

    'search: while depth < depth_limit && !layers.current_is_empty() {
        loop {
            if control.should_stop() || layers.len() >= node_limit {
                break 'search;
            }
            let Some(state) = layers.pop_current() else {
                break;
            };
            for choice in state.choices().take(filter_width) {
                let mut child = state.clone();
                child.apply(choice);
                if control.visit_node(&child) == VisitOutcome::Discard {
                    continue;
                }
                layers.push_next(child);
            }
        }
        layers.advance();
        depth += 1;
    }
    Ok(Frontier::from_layers(layers))
}

pub fn breadth_first_from<S: State>(
    root: S,
    options: SearchOptions<S>,
    filter_width: usize,
    depth_limit: usize,
    node_limit: usize,
) -> Result<SearchControl<S>, SearchError> {
    run_from(root, options, |control, root| {
        breadth_first(control, root, filter_width, depth_limit, node_limit).map(|_| ())
    })
}

pub fn breadth_first_async<S>(
    root: S,
    options: SearchOptions<S>,
    filter_width: usize,
    depth_limit: usize,
    node_limit: usize,
) -> SearchHandle<S>
where
    S: State + Send + 'static,
{
    spawn_from(root, options, move |control, root| {
        breadth_first(control, root, filter_width, depth_limit, node_limit).map(|_| ())
    })
}

pub fn breadth_first_mut_from<S: MutableState>(
    root: S,
    options: SearchOptions<S>,
    filter_width: usize,
    depth_limit: usize,
    node_limit: usize,
) -> Result<SearchControl<S>, SearchError> {
    run_from(root, options, |control, root| {
        breadth_first_mut(control, root, filter_width, depth_limit, node_limit).map(|_| ())
    })
}

pub fn breadth_first_mut_async<S>(
    root: S,
    options: SearchOptions<S>,
    filter_width: usize,
    depth_limit: usize,
    node_limit: usize,
) -> SearchHandle<S>
where
    S: MutableState + Send + 'static,
{
    spawn_from(root, options, move |control, root| {
        breadth_first_mut(control, root, filter_width, depth_limit, node_limit).map(|_| ())
    })
}
