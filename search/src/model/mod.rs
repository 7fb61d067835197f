//! The contract a user problem must provide to be searchable.
//!
//! A problem is modeled as a rooted tree whose nodes are partial solutions. Each
//! node reports an optimistic [`bound`](Qualifiable::bound) and, when available, the
//! [`quality`](Qualifiable::quality) of the solution it represents. Branching comes
//! in two shapes: [`State`] produces full successor states, [`MutableState`] applies
//! and undoes choices in place. Algorithms come in a dedicated variant for each
//! shape; the two families share only the qualifiable surface.

mod quality;
mod state;

pub use quality::{Maximize, Minimize, Quality};
pub use state::{MutableState, Qualifiable, Snapshot, State};
