use core::fmt;
use std::str::FromStr;

use fxhash::FxBuildHasher;
use grid_util::point::Point;
use indexmap::IndexMap;
use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ParseNameError, SearchError};
use crate::frontier::Frontier;
use crate::grid::Grid;
use crate::node::{NodeArena, NodeId, SearchNode};
use crate::reconstruct::{reconstruct, PathReconstructor};

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Dfs,
    Bfs,
    Random,
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Dfs,
        Algorithm::Bfs,
        Algorithm::Random,
        Algorithm::AStar,
    ];
    /// Only A* estimates the remaining distance; the other algorithms carry a zero estimate, so
    /// their node cost is just the distance from the start.
    pub fn uses_heuristic(self) -> bool {
        self == Algorithm::AStar
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Algorithm::Dfs => "dfs",
            Algorithm::Bfs => "bfs",
            Algorithm::Random => "random",
            Algorithm::AStar => "astar",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Algorithm {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseNameError::UnknownAlgorithm(s.to_owned()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Searching,
    GoalFound,
    Reconstructing,
    Done,
    Cancelled,
}

impl Phase {
    /// A run in one of these phases must be cancelled or finished before another can start.
    pub fn is_running(self) -> bool {
        matches!(
            self,
            Phase::Searching | Phase::GoalFound | Phase::Reconstructing
        )
    }
}

/// What a single [step](SearchEngine::step) did, in the order it happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent {
    /// A cell was discovered and admitted to the frontier.
    Searched(Point),
    /// A cell was taken from the frontier to be expanded next.
    Traversed(Point),
    GoalFound(SearchNode),
    /// A cell of the reconstructed path, emitted from the goal back to the start.
    OnPath(Point),
    /// The frontier ran dry without reaching the goal.
    NoPathFound,
    /// The engine had nothing to do.
    Idle,
}

/// Stepwise search over a [Grid]. Nothing runs on its own: every call to [step](Self::step)
/// performs one unit of work and reports it as [StepEvent]s, so a host can render between steps
/// at whatever pace it likes.
///
/// The random source is only used by [Algorithm::Random]; seed it for reproducible runs.
#[derive(Clone, Debug)]
pub struct SearchEngine<R = StdRng> {
    rng: R,
    grid: Option<Grid>,
    algorithm: Option<Algorithm>,
    start: Option<Point>,
    goal: Option<Point>,
    nodes: NodeArena,
    visited: FxIndexMap<Point, NodeId>,
    frontier: Frontier,
    active: Option<NodeId>,
    terminal: Option<NodeId>,
    path_cursor: Option<NodeId>,
    phase: Phase,
}

impl SearchEngine<StdRng> {
    pub fn new() -> SearchEngine<StdRng> {
        SearchEngine::with_rng(StdRng::from_entropy())
    }
    pub fn seeded(seed: u64) -> SearchEngine<StdRng> {
        SearchEngine::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for SearchEngine<StdRng> {
    fn default() -> Self {
        SearchEngine::new()
    }
}

impl<R: Rng> SearchEngine<R> {
    pub fn with_rng(rng: R) -> SearchEngine<R> {
        SearchEngine {
            rng,
            grid: None,
            algorithm: None,
            start: None,
            goal: None,
            nodes: NodeArena::new(),
            visited: FxIndexMap::default(),
            frontier: Frontier::default(),
            active: None,
            terminal: None,
            path_cursor: None,
            phase: Phase::Idle,
        }
    }

    /// Begins a new run. Fails without touching the current state if a run is still in progress
    /// or if the grid does not have exactly one start and one goal.
    pub fn start(&mut self, algorithm: Algorithm, grid: &Grid) -> Result<(), SearchError> {
        if self.phase.is_running() {
            return Err(SearchError::AlreadyRunning { phase: self.phase });
        }
        let (start, goal) = grid.validate()?;
        info!(
            "Starting {} search from {} to {} on a {}x{} grid",
            algorithm,
            start,
            goal,
            grid.width(),
            grid.height()
        );
        self.reset();
        self.grid = Some(grid.clone());
        self.algorithm = Some(algorithm);
        self.start = Some(start);
        self.goal = Some(goal);
        self.frontier = Frontier::for_algorithm(algorithm);
        let root = self
            .nodes
            .insert(SearchNode::root(start, estimate(self.algorithm, self.goal, start)));
        self.visited.insert(start, root);
        self.active = Some(root);
        self.phase = Phase::Searching;
        Ok(())
    }

    /// Performs one unit of work. While searching that is one expansion of the active node
    /// followed by one frontier pop; while reconstructing it is one path position. Calling this
    /// outside a run is harmless and yields [StepEvent::Idle].
    pub fn step(&mut self) -> Vec<StepEvent> {
        match self.phase {
            Phase::Searching => self.search_step(),
            Phase::GoalFound => {
                debug!("Reconstructing path");
                self.phase = Phase::Reconstructing;
                self.path_cursor = self.terminal;
                self.reconstruct_step()
            }
            Phase::Reconstructing => self.reconstruct_step(),
            Phase::Idle | Phase::Done | Phase::Cancelled => vec![StepEvent::Idle],
        }
    }

    /// Steps until the run is over and returns everything that happened.
    pub fn run_to_end(&mut self) -> Vec<StepEvent> {
        let mut events = Vec::new();
        while self.phase.is_running() {
            events.extend(self.step());
        }
        events
    }

    /// Abandons the current run. Idempotent; has no effect before the first run.
    pub fn cancel(&mut self) {
        if self.phase == Phase::Idle {
            return;
        }
        if self.phase != Phase::Cancelled {
            info!("Search cancelled during {:?}", self.phase);
        }
        self.reset();
        self.phase = Phase::Cancelled;
    }

    fn reset(&mut self) {
        self.nodes.clear();
        self.visited.clear();
        self.frontier.clear();
        self.active = None;
        self.terminal = None;
        self.path_cursor = None;
    }

    /// Records `id` as the terminal node. The step that captures the goal still pops the
    /// frontier once more.
    fn capture_goal(&mut self, id: NodeId, events: &mut Vec<StepEvent>) {
        let node = self.nodes[id];
        info!(
            "Goal {} found at distance {} after visiting {} cells",
            node.position,
            node.distance_from_start,
            self.visited.len()
        );
        self.terminal = Some(id);
        self.active = None;
        self.phase = Phase::GoalFound;
        events.push(StepEvent::GoalFound(node));
    }

    fn search_step(&mut self) -> Vec<StepEvent> {
        let (Some(active_id), Some(goal), Some(grid)) =
            (self.active, self.goal, self.grid.as_ref())
        else {
            return vec![StepEvent::Idle];
        };
        let mut events = Vec::new();
        let active = self.nodes[active_id];
        if active.position == goal {
            self.capture_goal(active_id, &mut events);
            return events;
        }
        let mut found = None;
        for neighbour in grid.neighbors(active.position) {
            if !grid.is_traversable(neighbour) {
                continue;
            }
            let distance = active.distance_from_start + 1;
            if let Some(&id) = self.visited.get(&neighbour) {
                // A pending node reached by a shorter route is re-parented in place.
                let node = &mut self.nodes[id];
                if self
                    .frontier
                    .relax(id, distance + node.distance_to_goal_estimate)
                {
                    trace!(
                        "Re-parenting {} at distance {} (was {})",
                        neighbour,
                        distance,
                        node.distance_from_start
                    );
                    node.parent = Some(active_id);
                    node.distance_from_start = distance;
                }
                continue;
            }
            let h = estimate(self.algorithm, self.goal, neighbour);
            let child = SearchNode::child(active_id, &active, neighbour, h);
            let id = self.nodes.insert(child);
            self.visited.insert(neighbour, id);
            if neighbour == goal {
                found = Some(id);
                break;
            }
            self.frontier.push(id, child.cost());
            events.push(StepEvent::Searched(neighbour));
        }
        if let Some(id) = found {
            self.capture_goal(id, &mut events);
        }
        match self.frontier.pop(&mut self.rng) {
            Some(id) => {
                self.active = Some(id);
                let node = &self.nodes[id];
                if !node.is_root() {
                    events.push(StepEvent::Traversed(node.position));
                }
            }
            None if self.terminal.is_some() => {}
            None => {
                info!(
                    "Frontier exhausted after visiting {} cells, no path to {}",
                    self.visited.len(),
                    goal
                );
                self.active = None;
                self.phase = Phase::Done;
                events.push(StepEvent::NoPathFound);
            }
        }
        events
    }

    fn reconstruct_step(&mut self) -> Vec<StepEvent> {
        let mut walk = PathReconstructor::resume(&self.nodes, self.path_cursor.take());
        let position = walk.next();
        self.path_cursor = walk.cursor();
        let finished = walk.is_finished();
        if finished {
            debug!("Path reconstruction complete");
            self.phase = Phase::Done;
        }
        match position {
            Some(p) => vec![StepEvent::OnPath(p)],
            None => vec![StepEvent::Idle],
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }
    /// The grid snapshot taken by [start](Self::start).
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }
    pub fn start_position(&self) -> Option<Point> {
        self.start
    }
    pub fn goal_position(&self) -> Option<Point> {
        self.goal
    }
    /// The node whose neighbours the next step expands.
    pub fn active(&self) -> Option<&SearchNode> {
        self.active.map(|id| &self.nodes[id])
    }
    /// The node at the goal, once found.
    pub fn terminal(&self) -> Option<&SearchNode> {
        self.terminal.map(|id| &self.nodes[id])
    }
    pub fn node(&self, id: NodeId) -> Option<&SearchNode> {
        self.nodes.get(id)
    }
    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }
    /// Visited positions in the order they were first reached.
    pub fn visited(&self) -> impl Iterator<Item = &Point> {
        self.visited.keys()
    }
    pub fn is_visited(&self, point: &Point) -> bool {
        self.visited.contains_key(point)
    }
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
    /// A fresh walk from the terminal node back to the start. Empty if no goal was found.
    pub fn path(&self) -> PathReconstructor<'_> {
        reconstruct(&self.nodes, self.terminal)
    }
}

/// Manhattan distance to the goal for algorithms that use a heuristic, zero for the rest.
fn estimate(algorithm: Option<Algorithm>, goal: Option<Point>, point: Point) -> i32 {
    match (algorithm, goal) {
        (Some(algorithm), Some(goal)) if algorithm.uses_heuristic() => {
            point.manhattan_distance(&goal)
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidGridError;

    fn grid(text: &str) -> Grid {
        text.parse().unwrap()
    }

    #[test]
    fn algorithm_names() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>(), Ok(algorithm));
        }
        assert_eq!("AStar".parse::<Algorithm>(), Ok(Algorithm::AStar));
        assert_eq!(
            "dijkstra".parse::<Algorithm>(),
            Err(ParseNameError::UnknownAlgorithm("dijkstra".to_owned()))
        );
    }

    #[test]
    fn step_is_noop_when_idle() {
        let mut engine = SearchEngine::seeded(0);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.step(), vec![StepEvent::Idle]);
        engine.cancel();
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn invalid_grid_leaves_state_alone() {
        let mut engine = SearchEngine::seeded(0);
        let err = engine.start(Algorithm::Bfs, &grid("S..")).unwrap_err();
        assert_eq!(err, SearchError::InvalidGrid(InvalidGridError::MissingGoal));
        assert_eq!(engine.phase(), Phase::Idle);
        assert!(engine.grid().is_none());
    }

    #[test]
    fn already_running() {
        let mut engine = SearchEngine::seeded(0);
        let g = grid("S...G");
        engine.start(Algorithm::Bfs, &g).unwrap();
        engine.step();
        let visited = engine.visited().count();
        assert_eq!(
            engine.start(Algorithm::Dfs, &g),
            Err(SearchError::AlreadyRunning {
                phase: Phase::Searching
            })
        );
        assert_eq!(engine.visited().count(), visited);
        engine.run_to_end();
        assert_eq!(engine.phase(), Phase::Done);
        assert!(engine.start(Algorithm::Dfs, &g).is_ok());
    }

    #[test]
    fn rejected_while_goal_found_or_reconstructing() {
        let mut engine = SearchEngine::seeded(0);
        let g = grid("S.G");
        engine.start(Algorithm::Bfs, &g).unwrap();
        while engine.phase() == Phase::Searching {
            engine.step();
        }
        for phase in [Phase::GoalFound, Phase::Reconstructing] {
            assert_eq!(engine.phase(), phase);
            let terminal = engine.terminal().copied();
            let visited = engine.visited().count();
            assert_eq!(
                engine.start(Algorithm::Dfs, &g),
                Err(SearchError::AlreadyRunning { phase })
            );
            assert_eq!(engine.phase(), phase);
            assert_eq!(engine.algorithm(), Some(Algorithm::Bfs));
            assert_eq!(engine.terminal().copied(), terminal);
            assert_eq!(engine.visited().count(), visited);
            engine.step();
        }
        assert_eq!(engine.phase(), Phase::Reconstructing);
        engine.run_to_end();
        assert!(engine.start(Algorithm::Dfs, &g).is_ok());
    }

    /// Capturing the goal does not end the step: the frontier is still popped once.
    #[test]
    fn goal_step_still_pops_frontier() {
        let mut engine = SearchEngine::seeded(0);
        engine.start(Algorithm::Bfs, &grid("..G\n...\nS..")).unwrap();
        let events = loop {
            let events = engine.step();
            if engine.phase() != Phase::Searching {
                break events;
            }
        };
        assert_eq!(engine.phase(), Phase::GoalFound);
        match events.as_slice() {
            [StepEvent::GoalFound(node), StepEvent::Traversed(p)] => {
                assert_eq!(node.position, Point::new(2, 2));
                assert_eq!(node.distance_from_start, 4);
                assert_eq!(*p, Point::new(2, 1));
            }
            other => panic!("unexpected events {:?}", other),
        }
        assert_eq!(engine.frontier_len(), 0);
        assert_eq!(engine.terminal().map(|t| t.position), Some(Point::new(2, 2)));
    }

    #[test]
    fn searching_without_a_grid_does_nothing() {
        let mut engine = SearchEngine::seeded(0);
        engine.start(Algorithm::Bfs, &grid("S..G")).unwrap();
        engine.grid = None;
        assert_eq!(engine.step(), vec![StepEvent::Idle]);
        assert_eq!(engine.phase(), Phase::Searching);
        assert_eq!(engine.frontier_len(), 0);
        assert_eq!(engine.visited().count(), 1);
    }

    /// Single row: every step discovers one cell and moves onto it.
    #[test]
    fn corridor_events() {
        let mut engine = SearchEngine::seeded(0);
        engine.start(Algorithm::Bfs, &grid("S..G")).unwrap();
        assert_eq!(
            engine.step(),
            vec![
                StepEvent::Searched(Point::new(1, 0)),
                StepEvent::Traversed(Point::new(1, 0))
            ]
        );
        assert_eq!(
            engine.step(),
            vec![
                StepEvent::Searched(Point::new(2, 0)),
                StepEvent::Traversed(Point::new(2, 0))
            ]
        );
        let events = engine.step();
        assert_eq!(engine.phase(), Phase::GoalFound);
        match events.as_slice() {
            [StepEvent::GoalFound(node)] => {
                assert_eq!(node.position, Point::new(3, 0));
                assert_eq!(node.distance_from_start, 3);
            }
            other => panic!("unexpected events {:?}", other),
        }
        let mut on_path = Vec::new();
        while engine.phase().is_running() {
            for event in engine.step() {
                if let StepEvent::OnPath(p) = event {
                    on_path.push(p.x);
                }
            }
        }
        assert_eq!(on_path, vec![3, 2, 1, 0]);
        assert_eq!(engine.phase(), Phase::Done);
        assert_eq!(engine.step(), vec![StepEvent::Idle]);
    }

    #[test]
    fn goal_next_to_start() {
        let mut engine = SearchEngine::seeded(0);
        engine.start(Algorithm::Dfs, &grid("SG")).unwrap();
        let events = engine.step();
        assert!(matches!(events.as_slice(), [StepEvent::GoalFound(_)]));
        assert_eq!(
            engine.run_to_end(),
            vec![
                StepEvent::OnPath(Point::new(1, 0)),
                StepEvent::OnPath(Point::new(0, 0))
            ]
        );
    }

    #[test]
    fn boxed_in_start() {
        let mut engine = SearchEngine::seeded(0);
        engine.start(Algorithm::AStar, &grid("S#G")).unwrap();
        assert_eq!(engine.step(), vec![StepEvent::NoPathFound]);
        assert_eq!(engine.phase(), Phase::Done);
        assert!(engine.terminal().is_none());
        assert_eq!(engine.path().count(), 0);
    }

    #[test]
    fn heuristic_only_for_astar() {
        let g = grid("S..\n...\n..G");
        for algorithm in Algorithm::ALL {
            let mut engine = SearchEngine::seeded(0);
            engine.start(algorithm, &g).unwrap();
            let root = *engine.active().unwrap();
            let expected = if algorithm == Algorithm::AStar { 4 } else { 0 };
            assert_eq!(root.distance_to_goal_estimate, expected);
            assert_eq!(root.cost(), expected);
        }
    }

    #[test]
    fn cancel_clears_state() {
        let mut engine = SearchEngine::seeded(0);
        let g = grid("S....\n.....\n....G");
        engine.start(Algorithm::Bfs, &g).unwrap();
        engine.step();
        engine.step();
        assert!(engine.frontier_len() > 0);
        engine.cancel();
        assert_eq!(engine.phase(), Phase::Cancelled);
        assert_eq!(engine.frontier_len(), 0);
        assert_eq!(engine.visited().count(), 0);
        assert!(engine.active().is_none());
        assert_eq!(engine.step(), vec![StepEvent::Idle]);
        engine.cancel();
        assert_eq!(engine.phase(), Phase::Cancelled);
        engine.start(Algorithm::Bfs, &g).unwrap();
        assert_eq!(engine.visited().count(), 1);
        assert_eq!(engine.phase(), Phase::Searching);
    }
}
