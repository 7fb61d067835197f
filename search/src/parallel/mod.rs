//! Parallel execution layer.
//!
//! Each algorithm runs one fork-join region per layer or depth step: workers fork
//! the outer control (inheriting remaining budgets and the incumbent quality for
//! pruning), expand their share of the work, and merge back under the region's
//! single mutex. No worker shares state with another; cancellation and timeouts
//! are observed between nodes, after which in-flight workers merge and no new work
//! is dispatched.

pub mod beam;
pub mod pilot;
pub mod rake;

pub use beam::{
    parallel_beam_search, parallel_beam_search_async, parallel_beam_search_from,
    parallel_beam_search_mut, parallel_beam_search_mut_async, parallel_beam_search_mut_from,
};
pub use pilot::{
    parallel_pilot, parallel_pilot_async, parallel_pilot_from, parallel_pilot_mut,
    parallel_pilot_mut_async, parallel_pilot_mut_from,
};
pub use rake::{
    parallel_rake_search, parallel_rake_search_async, parallel_rake_search_from,
    parallel_rake_search_mut, parallel_rake_search_mut_async, parallel_rake_search_mut_from,
};

use crate::search::check;
use crate::utils::EnvParam;
use crate::SearchError;

/// Overrides the detected hardware parallelism used when `max_parallelism` is -1
/// (0 keeps the detected value).
static PARALLELISM: EnvParam<usize> = EnvParam::new("TREESEARCH_PARALLELISM", "0");

/// Resolves `max_parallelism` into a worker count: -1 means up to the hardware,
/// any other value must be at least 1 and is used as given.
pub(crate) fn resolve_workers(max_parallelism: i32) -> Result<usize, SearchError> {
    check(
        max_parallelism == -1 || max_parallelism >= 1,
        "max_parallelism must be -1 or at least 1",
    )?;
    Ok(match max_parallelism {
        -1 => match PARALLELISM.get() {
            0 => std::thread::available_parallelism().map_or(1, |n| n.get()),
            configured => configured,
        },
        n => n as usize,
    })
}

/// Splits the work items into at most `workers` contiguous, non-empty chunks,
/// preserving order.
pub(crate) fn chunked<T>(items: Vec<T>, workers: usize) -> Vec<Vec<T>> {
    use itertools::Itertools;
    let chunk_size = items.len().div_ceil(workers.max(1));
    if chunk_size == 0 {
        return Vec::new();
    }
    items
        .into_iter()
        .chunks(chunk_size)
        .into_iter()
        .map(|chunk| chunk.collect())
        .collect()
}
