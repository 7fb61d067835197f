#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use treesearch::prelude::*;

/// 0/1 knapsack over a fixed item list, items decided in order. Partial solutions
/// are feasible, so every node reports its accumulated profit as quality.
#[derive(Clone, Debug)]
pub struct Knapsack {
    items: Arc<Vec<Item>>,
    capacity: i64,
    decided: usize,
    profit: i64,
    weight: i64,
}

#[derive(Clone, Debug)]
pub struct Item {
    pub profit: i64,
    pub weight: i64,
}

impl Knapsack {
    pub fn new(capacity: i64, items: &[(i64, i64)]) -> Self {
        let items = items
            .iter()
            .map(|&(profit, weight)| Item { profit, weight })
            .collect();
        Knapsack {
            items: Arc::new(items),
            capacity,
            decided: 0,
            profit: 0,
            weight: 0,
        }
    }

    pub fn profit(&self) -> i64 {
        self.profit
    }
}

impl Qualifiable for Knapsack {
    type Qual = Maximize;

    fn is_terminal(&self) -> bool {
        self.decided == self.items.len()
    }

    fn bound(&self) -> Maximize {
        let optimistic: i64 = self.items[self.decided..].iter().map(|i| i.profit).sum();
        Maximize(self.profit + optimistic)
    }

    fn quality(&self) -> Option<Maximize> {
        Some(Maximize(self.profit))
    }
}

impl State for Knapsack {
    fn branches(&self) -> Box<dyn Iterator<Item = Self> + '_> {
        if self.is_terminal() {
            return Box::new(std::iter::empty());
        }
        let item = self.items[self.decided].clone();
        let take = (self.weight + item.weight <= self.capacity).then(|| {
            let mut next = self.clone();
            next.decided += 1;
            next.profit += item.profit;
            next.weight += item.weight;
            next
        });
        let skip = {
            let mut next = self.clone();
            next.decided += 1;
            Some(next)
        };
        Box::new(take.into_iter().chain(skip))
    }
}

/// Tower of Hanoi as a mutable state: disks start on peg 0 and must reach peg 2,
/// minimizing moves. Disk 0 is the smallest.
#[derive(Clone, Debug)]
pub struct Hanoi {
    pegs: [Vec<u8>; 3],
    disks: usize,
    moves: i64,
    history: Vec<(usize, usize)>,
}

impl Hanoi {
    pub fn new(disks: usize) -> Self {
        let start: Vec<u8> = (0..disks as u8).rev().collect();
        Hanoi {
            pegs: [start, Vec::new(), Vec::new()],
            disks,
            moves: 0,
            history: Vec::new(),
        }
    }

    pub fn moves(&self) -> i64 {
        self.moves
    }

    /// Exact number of moves still needed to bring every disk to peg 2.
    pub fn remaining_moves(&self) -> i64 {
        let mut position = vec![0usize; self.disks];
        for (peg, disks) in self.pegs.iter().enumerate() {
            for &disk in disks {
                position[disk as usize] = peg;
            }
        }
        let mut target = 2usize;
        let mut remaining = 0i64;
        for disk in (0..self.disks).rev() {
            if position[disk] == target {
                continue;
            }
            remaining += 1 << disk;
            target = 3 - target - position[disk];
        }
        remaining
    }

    fn legal(&self, from: usize, to: usize) -> bool {
        match (self.pegs[from].last(), self.pegs[to].last()) {
            (Some(disk), Some(top)) => disk < top,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

impl Qualifiable for Hanoi {
    type Qual = Minimize;

    fn is_terminal(&self) -> bool {
        self.pegs[2].len() == self.disks
    }

    fn bound(&self) -> Minimize {
        Minimize(self.moves + self.remaining_moves())
    }

    fn quality(&self) -> Option<Minimize> {
        self.is_terminal().then(|| Minimize(self.moves))
    }
}

impl MutableState for Hanoi {
    type Choice = (usize, usize);

    fn choices(&self) -> Box<dyn Iterator<Item = (usize, usize)> + '_> {
        Box::new(
            (0..3)
                .flat_map(|from| (0..3).map(move |to| (from, to)))
                .filter(move |&(from, to)| from != to && self.legal(from, to)),
        )
    }

    fn apply(&mut self, (from, to): (usize, usize)) {
        let disk = self.pegs[from].pop().expect("illegal move");
        self.pegs[to].push(disk);
        self.moves += 1;
        self.history.push((from, to));
    }

    fn undo_last(&mut self) {
        let (from, to) = self.history.pop().expect("nothing to undo");
        let disk = self.pegs[to].pop().expect("inconsistent history");
        self.pegs[from].push(disk);
        self.moves -= 1;
    }
}

/// Complete tree with a fixed arity where every leaf carries a value computed by
/// the supplied table. Bounds never prune, so searches over this model visit a
/// deterministic node set — the workhorse for parallel equivalence checks.
#[derive(Clone)]
pub struct ValueTree {
    arity: usize,
    height: usize,
    depth: usize,
    index: usize,
    leaves: Arc<Vec<i64>>,
}

impl ValueTree {
    pub fn new(arity: usize, height: usize, leaves: Vec<i64>) -> Self {
        assert_eq!(leaves.len(), arity.pow(height as u32));
        ValueTree {
            arity,
            height,
            depth: 0,
            index: 0,
            leaves: Arc::new(leaves),
        }
    }

    /// Leaf values `0, 1, 2, ...` in left-to-right order.
    pub fn counting(arity: usize, height: usize) -> Self {
        let leaves = (0..arity.pow(height as u32) as i64).collect();
        Self::new(arity, height, leaves)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Qualifiable for ValueTree {
    type Qual = Maximize;

    fn is_terminal(&self) -> bool {
        self.depth == self.height
    }

    fn bound(&self) -> Maximize {
        Maximize(i64::MAX)
    }

    fn quality(&self) -> Option<Maximize> {
        self.is_terminal().then(|| Maximize(self.leaves[self.index]))
    }
}

impl State for ValueTree {
    fn branches(&self) -> Box<dyn Iterator<Item = Self> + '_> {
        if self.is_terminal() {
            return Box::new(std::iter::empty());
        }
        Box::new((0..self.arity).map(move |branch| ValueTree {
            arity: self.arity,
            height: self.height,
            depth: self.depth + 1,
            index: self.index * self.arity + branch,
            leaves: self.leaves.clone(),
        }))
    }
}

/// Unbounded binary tree used for cancellation checks: no terminal is ever
/// reached, so only the runtime control can end the search.
#[derive(Clone)]
pub struct Bottomless {
    depth: u64,
}

impl Bottomless {
    pub fn new() -> Self {
        Bottomless { depth: 0 }
    }
}

impl Qualifiable for Bottomless {
    type Qual = Minimize;

    fn is_terminal(&self) -> bool {
        false
    }

    fn bound(&self) -> Minimize {
        Minimize(0)
    }

    fn quality(&self) -> Option<Minimize> {
        None
    }
}

impl State for Bottomless {
    fn branches(&self) -> Box<dyn Iterator<Item = Self> + '_> {
        let depth = self.depth + 1;
        Box::new((0..2).map(move |_| Bottomless { depth }))
    }
}

/// 4-level binary tree for the discrepancy scenarios: the single valuable leaf
/// sits on the path right, left, left, right (discrepancy 2). Every terminal
/// visit logs the leaf's discrepancy.
#[derive(Clone)]
pub struct DiscrepancyTree {
    path: Vec<u8>,
    log: Rc<RefCell<Vec<usize>>>,
}

impl DiscrepancyTree {
    pub fn root(log: Rc<RefCell<Vec<usize>>>) -> Self {
        DiscrepancyTree { path: vec![], log }
    }

    pub fn discrepancy(&self) -> usize {
        self.path.iter().map(|&b| b as usize).sum()
    }

    fn is_optimal_leaf(&self) -> bool {
        self.path == [1, 0, 0, 1]
    }
}

impl Qualifiable for DiscrepancyTree {
    type Qual = Maximize;

    fn is_terminal(&self) -> bool {
        self.path.len() == 4
    }

    fn bound(&self) -> Maximize {
        Maximize(i64::MAX)
    }

    fn quality(&self) -> Option<Maximize> {
        if !self.is_terminal() {
            return None;
        }
        self.log.borrow_mut().push(self.discrepancy());
        Some(Maximize(if self.is_optimal_leaf() { 100 } else { 1 }))
    }
}

impl State for DiscrepancyTree {
    fn branches(&self) -> Box<dyn Iterator<Item = Self> + '_> {
        if self.is_terminal() {
            return Box::new(std::iter::empty());
        }
        Box::new((0..2u8).map(move |b| {
            let mut path = self.path.clone();
            path.push(b);
            DiscrepancyTree {
                path,
                log: self.log.clone(),
            }
        }))
    }
}

/// A tree whose states never report a quality and whose terminals are out of
/// reach: every lookahead comes back empty-handed. Expansions are logged so tests
/// can observe which nodes the search advanced through.
#[derive(Clone)]
pub struct Barren {
    pub path: Vec<u8>,
    log: Rc<RefCell<Vec<Vec<u8>>>>,
}

impl Barren {
    pub fn root(log: Rc<RefCell<Vec<Vec<u8>>>>) -> Self {
        Barren { path: vec![], log }
    }
}

impl Qualifiable for Barren {
    type Qual = Maximize;

    fn is_terminal(&self) -> bool {
        false
    }

    fn bound(&self) -> Maximize {
        Maximize(i64::MAX)
    }

    fn quality(&self) -> Option<Maximize> {
        None
    }
}

impl State for Barren {
    fn branches(&self) -> Box<dyn Iterator<Item = Self> + '_> {
        self.log.borrow_mut().push(self.path.clone());
        Box::new((0..3u8).map(move |b| {
            let mut path = self.path.clone();
            path.push(b);
            Barren {
                path,
                log: self.log.clone(),
            }
        }))
    }
}
