use std::collections::VecDeque;

/// Bi-level FIFO: a current layer being consumed and a next layer being filled.
///
/// `advance` concatenates the next layer *after* any leftover current items, so a
/// traversal that stopped mid-layer still hands over a complete, consistently
/// ordered frontier.
pub(crate) struct LayeredFifo<T> {
    current: VecDeque<T>,
    next: VecDeque<T>,
}

impl<T> LayeredFifo<T> {
    pub fn from_root(root: T) -> Self {
        let mut current = VecDeque::new();
        current.push_back(root);
        LayeredFifo {
            current,
            next: VecDeque::new(),
        }
    }

    pub fn pop_current(&mut self) -> Option<T> {
        self.current.pop_front()
    }

    pub fn push_next(&mut self, item: T) {
        self.next.push_back(item);
    }

    /// Total number of states held, across both layers.
    pub fn len(&self) -> usize {
        self.current.len() + self.next.len()
    }

    pub fn current_is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// Moves the next layer into the current one, behind any leftover current items.
    pub fn advance(&mut self) {
        self.current.append(&mut self.next);
    }

    pub fn into_states(mut self) -> VecDeque<T> {
        self.advance();
        self.current
    }
}

/// Priority bi-level FIFO: the next layer is ranked, and advancing a layer admits
/// only the top K states.
pub(crate) struct RankedLayer<T> {
    current: VecDeque<T>,
    next: Vec<(f32, T)>,
}

impl<T> RankedLayer<T> {
    pub fn from_root(root: T) -> Self {
        let mut current = VecDeque::new();
        current.push_back(root);
        RankedLayer { current, next: Vec::new() }
    }

    pub fn pop_current(&mut self) -> Option<T> {
        self.current.pop_front()
    }

    /// Appends to the next layer; insertion order is the tie-break among equal ranks.
    pub fn push_next(&mut self, item: T, rank: f32) {
        self.next.push((rank, item));
    }

    pub fn next_is_empty(&self) -> bool {
        self.next.is_empty()
    }

    /// Replaces the current layer by the `k` smallest-ranked states of the next
    /// layer and clears the next layer. The sort is stable: equal ranks keep their
    /// insertion order. For `k >= |next|` every state is kept.
    pub fn advance_layer(&mut self, k: usize) {
        let mut next = std::mem::take(&mut self.next);
        next.sort_by(|a, b| a.0.total_cmp(&b.0));
        next.truncate(k);
        self.current = next.into_iter().map(|(_, item)| item).collect();
    }
}
