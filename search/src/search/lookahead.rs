//! Lookaheads: inner searches launched from a candidate node to estimate its
//! promise.
//!
//! A lookahead runs against whatever control it is handed — usually a
//! [`Wrapped`](crate::control::Wrapped) control inside PILOT, or the outer control
//! inside rake. The factory types below implement both traits where the underlying
//! algorithm has both shapes, so one value serves branch-based and mutable models
//! alike.

use crate::control::Control;
use crate::model::{MutableState, State};
use crate::search::{beam, dfs, lds, monotonic, rake};
use crate::SearchError;

/// A sub-search over branch-producing states, rooted at `seed`.
pub trait Lookahead<S: State> {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: S) -> Result<(), SearchError>;
}

/// A sub-search over a mutable state. Implementations must leave `seed` as they
/// found it.
pub trait LookaheadMut<S: MutableState> {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: &mut S) -> Result<(), SearchError>;
}

/// Depth-first lookahead within the given limits. For a mutable state the seed is
/// restored afterward.
pub struct DfsLookahead {
    filter_width: usize,
    depth_limit: usize,
    backtrack_limit: usize,
}

pub fn dfs_lookahead(filter_width: usize, depth_limit: usize, backtrack_limit: usize) -> DfsLookahead {
    DfsLookahead {
        filter_width,
        depth_limit,
        backtrack_limit,
    }
}

/// The classic greedy dive: depth-first restricted to the first branch of every
/// node. This is the default lookahead of rake and PILOT.
pub fn greedy_lookahead() -> DfsLookahead {
    dfs_lookahead(1, usize::MAX, 0)
}

impl<S: State> Lookahead<S> for DfsLookahead {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: S) -> Result<(), SearchError> {
        dfs::depth_first(control, seed, self.filter_width, self.depth_limit, self.backtrack_limit)
    }
}

impl<S: MutableState> LookaheadMut<S> for DfsLookahead {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: &mut S) -> Result<(), SearchError> {
        dfs::depth_first_mut(control, seed, self.filter_width, self.depth_limit, self.backtrack_limit)
    }
}

/// Layered beam lookahead.
pub struct BeamLookahead<R> {
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
}

pub fn beam_lookahead<R>(
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
) -> BeamLookahead<R> {
    BeamLookahead {
        beam_width,
        rank,
        filter_width,
        depth_limit,
    }
}

impl<S: State, R: Fn(&S) -> f32> Lookahead<S> for BeamLookahead<R> {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: S) -> Result<(), SearchError> {
        beam::beam_search(control, seed, self.beam_width, &self.rank, self.filter_width, self.depth_limit)
    }
}

impl<S: MutableState, R: Fn(&S) -> f32> LookaheadMut<S> for BeamLookahead<R> {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: &mut S) -> Result<(), SearchError> {
        beam::beam_search_mut(control, seed, self.beam_width, &self.rank, self.filter_width, self.depth_limit)
    }
}

/// Monotonic beam lookahead.
pub struct MonotonicBeamLookahead<R> {
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
}

pub fn monotonic_beam_lookahead<R>(
    beam_width: usize,
    rank: R,
    filter_width: usize,
    depth_limit: usize,
) -> MonotonicBeamLookahead<R> {
    MonotonicBeamLookahead {
        beam_width,
        rank,
        filter_width,
        depth_limit,
    }
}

impl<S: State, R: Fn(&S) -> f32> Lookahead<S> for MonotonicBeamLookahead<R> {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: S) -> Result<(), SearchError> {
        monotonic::monotonic_beam_search(
            control,
            seed,
            self.beam_width,
            &self.rank,
            self.filter_width,
            self.depth_limit,
        )
    }
}

impl<S: MutableState, R: Fn(&S) -> f32> LookaheadMut<S> for MonotonicBeamLookahead<R> {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: &mut S) -> Result<(), SearchError> {
        monotonic::monotonic_beam_search_mut(
            control,
            seed,
            self.beam_width,
            &self.rank,
            self.filter_width,
            self.depth_limit,
        )
    }
}

/// Rake lookahead: breadth-first to `rake_width` seeds, then the inner lookahead
/// from each of them.
pub struct RakeLookahead<L> {
    rake_width: usize,
    inner: L,
}

pub fn rake_lookahead<L>(rake_width: usize, inner: L) -> RakeLookahead<L> {
    RakeLookahead { rake_width, inner }
}

impl<S: State, L: Lookahead<S>> Lookahead<S> for RakeLookahead<L> {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: S) -> Result<(), SearchError> {
        rake::rake_search(control, seed, self.rake_width, &self.inner)
    }
}

impl<S: MutableState, L: LookaheadMut<S>> LookaheadMut<S> for RakeLookahead<L> {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: &mut S) -> Result<(), SearchError> {
        rake::rake_search_mut(control, seed, self.rake_width, &self.inner)
    }
}

/// Anytime limited-discrepancy lookahead.
pub struct LdsLookahead {
    max_discrepancy: usize,
}

pub fn lds_lookahead(max_discrepancy: usize) -> LdsLookahead {
    LdsLookahead { max_discrepancy }
}

impl<S: State> Lookahead<S> for LdsLookahead {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: S) -> Result<(), SearchError> {
        lds::anytime_lds(control, seed, self.max_discrepancy)
    }
}

impl<S: MutableState> LookaheadMut<S> for LdsLookahead {
    fn run<C: Control<S> + ?Sized>(&self, control: &mut C, seed: &mut S) -> Result<(), SearchError> {
        lds::anytime_lds_mut(control, seed, self.max_discrepancy)
    }
}
