//! Single import for the model contract, the runtime control and every search
//! entry point.

pub use crate::control::{
    Cancellation, Control, ImprovementCallback, SearchControl, SearchOptions, SnapshotControl,
    VisitOutcome, Wrapped,
};
pub use crate::model::{Maximize, Minimize, MutableState, Qualifiable, Quality, Snapshot, State};
pub use crate::SearchError;

pub use crate::search::beam::{
    beam_search, beam_search_async, beam_search_from, beam_search_mut, beam_search_mut_async,
    beam_search_mut_from,
};
pub use crate::search::bfs::{
    breadth_first, breadth_first_async, breadth_first_from, breadth_first_mut,
    breadth_first_mut_async, breadth_first_mut_from, Frontier,
};
pub use crate::search::dfs::{
    depth_first, depth_first_async, depth_first_from, depth_first_mut, depth_first_mut_async,
    depth_first_mut_from,
};
pub use crate::search::lds::{
    anytime_lds, anytime_lds_async, anytime_lds_from, anytime_lds_mut, anytime_lds_mut_async,
    anytime_lds_mut_from, naive_lds, naive_lds_async, naive_lds_from, naive_lds_mut,
    naive_lds_mut_async, naive_lds_mut_from,
};
pub use crate::search::lookahead::{
    beam_lookahead, dfs_lookahead, greedy_lookahead, lds_lookahead, monotonic_beam_lookahead,
    rake_lookahead, BeamLookahead, DfsLookahead, LdsLookahead, Lookahead, LookaheadMut,
    MonotonicBeamLookahead, RakeLookahead,
};
pub use crate::search::monotonic::{
    monotonic_beam_search, monotonic_beam_search_async, monotonic_beam_search_from,
    monotonic_beam_search_mut, monotonic_beam_search_mut_async, monotonic_beam_search_mut_from,
};
pub use crate::search::pilot::{
    pilot, pilot_async, pilot_from, pilot_mut, pilot_mut_async, pilot_mut_from,
};
pub use crate::search::rake::{
    rake_search, rake_search_async, rake_search_from, rake_search_mut, rake_search_mut_async,
    rake_search_mut_from,
};
pub use crate::search::SearchHandle;

pub use crate::parallel::beam::{
    parallel_beam_search, parallel_beam_search_async, parallel_beam_search_from,
    parallel_beam_search_mut, parallel_beam_search_mut_async, parallel_beam_search_mut_from,
};
pub use crate::parallel::pilot::{
    parallel_pilot, parallel_pilot_async, parallel_pilot_from, parallel_pilot_mut,
    parallel_pilot_mut_async, parallel_pilot_mut_from,
};
pub use crate::parallel::rake::{
    parallel_rake_search, parallel_rake_search_async, parallel_rake_search_from,
    parallel_rake_search_mut, parallel_rake_search_mut_async, parallel_rake_search_mut_from,
};
