//! Tree search over constructive decisions.
//!
//! A problem is modeled as a rooted tree of partial solutions (see [`model`]); this
//! crate provides the search strategies over such trees — exhaustive depth- and
//! breadth-first primitives, limited discrepancy search, layered and monotonic
//! beam search, rake and the PILOT method — together with a shared runtime
//! [`control`] (time, node and cancellation limits, bound pruning, incumbent
//! tracking) and a [`parallel`] layer that forks independent sub-searches and
//! merges their results.
//!
//! ```
//! use treesearch::prelude::*;
//!
//! #[derive(Clone)]
//! struct Digits(Vec<u8>);
//!
//! impl Qualifiable for Digits {
//!     type Qual = Maximize;
//!     fn is_terminal(&self) -> bool {
//!         self.0.len() == 3
//!     }
//!     fn bound(&self) -> Maximize {
//!         Maximize(i64::MAX)
//!     }
//!     fn quality(&self) -> Option<Maximize> {
//!         self.is_terminal()
//!             .then(|| Maximize(self.0.iter().map(|&d| d as i64).sum()))
//!     }
//! }
//!
//! impl State for Digits {
//!     fn branches(&self) -> Box<dyn Iterator<Item = Self> + '_> {
//!         if self.is_terminal() {
//!             return Box::new(std::iter::empty());
//!         }
//!         Box::new((0..3u8).map(move |d| {
//!             let mut digits = self.0.clone();
//!             digits.push(d);
//!             Digits(digits)
//!         }))
//!     }
//! }
//!
//! let mut control = SearchControl::new(Digits(vec![]));
//! depth_first(&mut control, Digits(vec![]), usize::MAX, usize::MAX, usize::MAX).unwrap();
//! assert_eq!(control.best_quality(), Some(&Maximize(6)));
//! ```

pub(crate) mod collections;
pub mod control;
pub mod model;
pub mod parallel;
pub mod prelude;
pub mod search;
pub mod utils;

use thiserror::Error;

/// Errors surfaced by the algorithm entry points.
///
/// Only argument validation produces an `Err`: failures raised by the user model
/// propagate as panics (the borrowed control keeps every improvement observed
/// before the failure), while cancellation and budget exhaustion are normal
/// returns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// An algorithm parameter violated its documented domain.
    #[error("invalid search parameter: {0}")]
    InvalidParameter(&'static str),
}
