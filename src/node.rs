use core::ops::{Index, IndexMut};

use grid_util::point::Point;

/// Index of a [SearchNode] inside a [NodeArena].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Per-cell search record. Parent links point back towards the start node, which has none.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchNode {
    pub position: Point,
    pub parent: Option<NodeId>,
    /// Number of moves from the start along the parent chain.
    pub distance_from_start: i32,
    /// Manhattan distance to the goal when a heuristic is in use, zero otherwise.
    pub distance_to_goal_estimate: i32,
}

impl SearchNode {
    pub fn root(position: Point, distance_to_goal_estimate: i32) -> SearchNode {
        SearchNode {
            position,
            parent: None,
            distance_from_start: 0,
            distance_to_goal_estimate,
        }
    }
    /// A node one move further from the start than `parent`.
    pub fn child(
        parent_id: NodeId,
        parent: &SearchNode,
        position: Point,
        distance_to_goal_estimate: i32,
    ) -> SearchNode {
        SearchNode {
            position,
            parent: Some(parent_id),
            distance_from_start: parent.distance_from_start + 1,
            distance_to_goal_estimate,
        }
    }
    pub fn cost(&self) -> i32 {
        self.distance_from_start + self.distance_to_goal_estimate
    }
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Growable table owning every node created during a run. Cleared wholesale between runs.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<SearchNode>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }
    pub fn insert(&mut self, node: SearchNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
    pub fn get(&self, id: NodeId) -> Option<&SearchNode> {
        self.nodes.get(id.0)
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SearchNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }
}

impl Index<NodeId> for NodeArena {
    type Output = SearchNode;

    fn index(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0]
    }
}
