/// Solution quality with a domain-directed "better than" relation.
///
/// The two prebuilt polarities are [`Minimize`] and [`Maximize`]; both wrap an
/// integer score. "No solution yet" is represented as `Option::<Q>::None` wherever a
/// quality may be absent.
pub trait Quality: Clone + PartialEq + Send + Sync + 'static {
    /// True iff `self` is strictly preferable to `other`.
    fn is_better_than(&self, other: &Self) -> bool;
}

/// Quality of a minimization problem: a lower score is better.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Minimize(pub i64);

/// Quality of a maximization problem: a higher score is better.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Maximize(pub i64);

impl Quality for Minimize {
    fn is_better_than(&self, other: &Self) -> bool {
        self.0 < other.0
    }
}

impl Quality for Maximize {
    fn is_better_than(&self, other: &Self) -> bool {
        self.0 > other.0
    }
}

impl std::fmt::Display for Minimize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for Maximize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
