//! Containers of discovered-but-unexpanded nodes. Each [Algorithm] is bound to exactly one
//! [Frontier] variant, which alone decides the exploration order.
//!
//! The frontier never deduplicates positions itself; the engine's visited set guarantees a
//! position is admitted at most once.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use fxhash::FxHashMap;
use log::trace;
use rand::Rng;

use crate::engine::Algorithm;
use crate::node::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct SmallestCostHolder {
    cost: i32,
    seq: u64,
    id: NodeId,
}

impl PartialOrd for SmallestCostHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestCostHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: the smallest cost compares greatest, and among equal costs
        // the earliest admission does.
        match other.cost.cmp(&self.cost) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            s => s,
        }
    }
}

/// Min-cost priority queue with stable tie-breaking and decrease-key.
///
/// Decrease-key is done by lazy deletion: the improved entry is pushed again under its first
/// admission number and stale heap entries are dropped when they surface. `pending` holds the
/// live cost of every node that is logically in the queue.
#[derive(Clone, Debug, Default)]
pub struct CostQueue {
    heap: BinaryHeap<SmallestCostHolder>,
    pending: FxHashMap<NodeId, (i32, u64)>,
    next_seq: u64,
}

impl CostQueue {
    pub fn push(&mut self, id: NodeId, cost: i32) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.insert(id, (cost, seq));
        self.heap.push(SmallestCostHolder { cost, seq, id });
    }
    pub fn pop(&mut self) -> Option<NodeId> {
        while let Some(SmallestCostHolder { cost, seq, id }) = self.heap.pop() {
            // Skip entries superseded by a later decrease-key.
            if self.pending.get(&id) == Some(&(cost, seq)) {
                self.pending.remove(&id);
                return Some(id);
            }
        }
        None
    }
    /// Lowers the cost of a pending node. Returns false if the node is not pending or the new
    /// cost is not strictly lower.
    pub fn relax(&mut self, id: NodeId, cost: i32) -> bool {
        match self.pending.get_mut(&id) {
            Some(entry) if cost < entry.0 => {
                entry.0 = cost;
                let seq = entry.1;
                self.heap.push(SmallestCostHolder { cost, seq, id });
                true
            }
            _ => false,
        }
    }
    pub fn len(&self) -> usize {
        self.pending.len()
    }
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
    pub fn clear(&mut self) {
        self.heap.clear();
        self.pending.clear();
        self.next_seq = 0;
    }
}

#[derive(Clone, Debug)]
pub enum Frontier {
    /// Most recently discovered first (DFS).
    Lifo(Vec<NodeId>),
    /// Earliest discovered first (BFS).
    Fifo(VecDeque<NodeId>),
    /// Uniformly random pick among all pending nodes.
    Unordered(Vec<NodeId>),
    /// Lowest cost first (A*).
    PriorityByCost(CostQueue),
}

impl Frontier {
    pub fn for_algorithm(algorithm: Algorithm) -> Frontier {
        match algorithm {
            Algorithm::Dfs => Frontier::Lifo(Vec::new()),
            Algorithm::Bfs => Frontier::Fifo(VecDeque::new()),
            Algorithm::Random => Frontier::Unordered(Vec::new()),
            Algorithm::AStar => Frontier::PriorityByCost(CostQueue::default()),
        }
    }
    /// Admits a node. `cost` is only consulted by [Frontier::PriorityByCost].
    pub fn push(&mut self, id: NodeId, cost: i32) {
        match self {
            Frontier::Lifo(stack) => stack.push(id),
            Frontier::Fifo(queue) => queue.push_back(id),
            Frontier::Unordered(list) => list.push(id),
            Frontier::PriorityByCost(queue) => queue.push(id, cost),
        }
    }
    /// Removes the next node to expand. The random source is only drawn from by
    /// [Frontier::Unordered].
    pub fn pop<R: Rng>(&mut self, rng: &mut R) -> Option<NodeId> {
        match self {
            Frontier::Lifo(stack) => stack.pop(),
            Frontier::Fifo(queue) => queue.pop_front(),
            Frontier::Unordered(list) => {
                if list.is_empty() {
                    None
                } else {
                    let ix = rng.gen_range(0..list.len());
                    trace!("Random pick {} of {}", ix, list.len());
                    Some(list.swap_remove(ix))
                }
            }
            Frontier::PriorityByCost(queue) => queue.pop(),
        }
    }
    /// Offers a cheaper cost for a node that is already pending. Only the priority variant
    /// orders by cost, so the others always decline.
    pub fn relax(&mut self, id: NodeId, cost: i32) -> bool {
        match self {
            Frontier::PriorityByCost(queue) => queue.relax(id, cost),
            _ => false,
        }
    }
    pub fn len(&self) -> usize {
        match self {
            Frontier::Lifo(stack) => stack.len(),
            Frontier::Fifo(queue) => queue.len(),
            Frontier::Unordered(list) => list.len(),
            Frontier::PriorityByCost(queue) => queue.len(),
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn clear(&mut self) {
        match self {
            Frontier::Lifo(stack) => stack.clear(),
            Frontier::Fifo(queue) => queue.clear(),
            Frontier::Unordered(list) => list.clear(),
            Frontier::PriorityByCost(queue) => queue.clear(),
        }
    }
}

impl Default for Frontier {
    fn default() -> Frontier {
        Frontier::Fifo(VecDeque::new())
    }
}
