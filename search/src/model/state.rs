use crate::model::Quality;

/// Capabilities shared by every node of a search tree, regardless of its branching
/// shape.
///
/// Cloning must be deep: a clone evolves independently of the original.
pub trait Qualifiable: Clone {
    type Qual: Quality;

    /// True iff the node is a complete solution that cannot be branched further.
    fn is_terminal(&self) -> bool;

    /// An admissible optimistic estimate of the best quality reachable from this
    /// node. The estimate may never claim more than the parent's did: for
    /// minimization a child bound is at least the parent bound, for maximization at
    /// most.
    fn bound(&self) -> Self::Qual;

    /// The quality of the (partial) solution this node represents, if it can be
    /// evaluated. Terminal nodes must report a quality; non-terminal nodes may.
    fn quality(&self) -> Option<Self::Qual>;
}

/// A search-tree node branched by producing full successor states.
///
/// Use this shape when cloning is cheap or states are small; otherwise prefer
/// [`MutableState`].
pub trait State: Qualifiable {
    /// The successors of this node, lazily, in deterministic heuristic-preferred
    /// order: earlier is assumed better. Terminal nodes produce no branches.
    fn branches(&self) -> Box<dyn Iterator<Item = Self> + '_>;
}

/// A search-tree node branched by applying (and undoing) choices in place.
///
/// Use this shape when applying and undoing a choice is much cheaper than cloning
/// the whole state.
pub trait MutableState: Qualifiable {
    type Choice: Clone;

    /// The applicable choices, lazily, in deterministic heuristic-preferred order.
    fn choices(&self) -> Box<dyn Iterator<Item = Self::Choice> + '_>;

    /// Applies a choice, making this state one of its own successors.
    fn apply(&mut self, choice: Self::Choice);

    /// Reverses the most recent non-undone `apply`. After `apply(c); undo_last()`
    /// the state must be indistinguishable from the original: same choices, bound,
    /// quality and terminal status.
    fn undo_last(&mut self);
}

/// Adapter that runs a [`MutableState`] through branch-based algorithms by taking a
/// clone per choice.
///
/// This is how the layered algorithms (beam, rake, anytime discrepancy search, the
/// parallel layer) handle mutable models: entries held across a layer or a stack
/// cannot be restored by undoing, so each one is an independent snapshot.
#[derive(Clone)]
pub struct Snapshot<S>(pub S);

impl<S: MutableState> Qualifiable for Snapshot<S> {
    type Qual = S::Qual;

    fn is_terminal(&self) -> bool {
        self.0.is_terminal()
    }

    fn bound(&self) -> Self::Qual {
        self.0.bound()
    }

    fn quality(&self) -> Option<Self::Qual> {
        self.0.quality()
    }
}

impl<S: MutableState> State for Snapshot<S> {
    fn branches(&self) -> Box<dyn Iterator<Item = Self> + '_> {
        Box::new(self.0.choices().map(move |choice| {
            let mut child = self.0.clone();
            child.apply(choice);
            Snapshot(child)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Maximize;

    // counts up to a limit, one increment choice per step
    #[derive(Clone)]
    struct Counter {
        value: i64,
        limit: i64,
    }

    impl Qualifiable for Counter {
        type Qual = Maximize;

        fn is_terminal(&self) -> bool {
            self.value == self.limit
        }

        fn bound(&self) -> Maximize {
            Maximize(self.limit)
        }

        fn quality(&self) -> Option<Maximize> {
            Some(Maximize(self.value))
        }
    }

    impl MutableState for Counter {
        type Choice = i64;

        fn choices(&self) -> Box<dyn Iterator<Item = i64> + '_> {
            if self.value < self.limit {
                Box::new(std::iter::once(1))
            } else {
                Box::new(std::iter::empty())
            }
        }

        fn apply(&mut self, step: i64) {
            self.value += step;
        }

        fn undo_last(&mut self) {
            self.value -= 1;
        }
    }

    #[test]
    fn snapshot_branches_leave_the_original_untouched() {
        let root = Snapshot(Counter { value: 0, limit: 2 });
        let children: Vec<_> = root.branches().collect();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].quality(), Some(Maximize(1)));
        assert_eq!(root.quality(), Some(Maximize(0)));
        assert!(!root.is_terminal());
    }
}
