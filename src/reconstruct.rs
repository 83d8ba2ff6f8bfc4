use std::iter::FusedIterator;

use grid_util::point::Point;

use crate::node::{NodeArena, NodeId};

/// Walks parent links from a terminal node back to the start node, yielding positions from the
/// goal to the start inclusive. Once exhausted it stays exhausted.
#[derive(Clone, Debug)]
pub struct PathReconstructor<'a> {
    nodes: &'a NodeArena,
    cursor: Option<NodeId>,
}

/// Reconstructs the path ending in `terminal`. A missing terminal node yields an empty path.
pub fn reconstruct(nodes: &NodeArena, terminal: Option<NodeId>) -> PathReconstructor<'_> {
    PathReconstructor::resume(nodes, terminal)
}

impl<'a> PathReconstructor<'a> {
    /// Continues a walk from a cursor previously obtained through [cursor](Self::cursor).
    pub fn resume(nodes: &'a NodeArena, cursor: Option<NodeId>) -> PathReconstructor<'a> {
        PathReconstructor { nodes, cursor }
    }
    /// The node whose position will be yielded next.
    pub fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }
    pub fn is_finished(&self) -> bool {
        self.cursor.is_none()
    }
}

impl Iterator for PathReconstructor<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let node = self.nodes.get(self.cursor?)?;
        self.cursor = node.parent;
        Some(node.position)
    }
}

impl FusedIterator for PathReconstructor<'_> {}

/// Whether a cell of a reconstructed path gets painted as a path tile. The endpoints keep their
/// own kind.
pub fn is_path_tile(point: Point, start: Point, goal: Point) -> bool {
    point != start && point != goal
}
