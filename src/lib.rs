//! # stepwise_grid_search
//!
//! A stepwise grid search engine for watching pathfinding algorithms work. A [SearchEngine]
//! explores a 4-connected [Grid] with
//! [depth-first search](https://en.wikipedia.org/wiki/Depth-first_search),
//! [breadth-first search](https://en.wikipedia.org/wiki/Breadth-first_search), a random
//! frontier, or [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) with the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) heuristic.
//!
//! Nothing runs to completion by itself: each call to [SearchEngine::step] does one expansion
//! (or, once the goal is found, yields one cell of the path back to the start) and reports what
//! happened as [StepEvent]s. A host renders the events and decides when to step again, for
//! instance once per [SearchSpeed::tick_interval].
//!
//! ```
//! use stepwise_grid_search::{Algorithm, Grid, RunStats, SearchEngine};
//!
//! let grid: Grid = "..G\n.#.\nS..".parse().unwrap();
//! let mut engine = SearchEngine::seeded(0);
//! engine.start(Algorithm::Bfs, &grid).unwrap();
//! let mut stats = RunStats::default();
//! while engine.phase().is_running() {
//!     stats.record_all(&engine.step());
//! }
//! assert_eq!(stats.path_length(), 4);
//! ```
pub mod config;
pub mod engine;
pub mod error;
pub mod frontier;
pub mod grid;
pub mod node;
pub mod presets;
pub mod reconstruct;
pub mod stats;

pub use config::SearchSpeed;
pub use engine::{Algorithm, Phase, SearchEngine, StepEvent};
pub use error::{InvalidGridError, ParseGridError, ParseNameError, SearchError};
pub use frontier::Frontier;
pub use grid::{CellKind, Grid};
pub use grid_util::point::Point;
pub use node::{NodeArena, NodeId, SearchNode};
pub use presets::{Preset, PRESETS};
pub use reconstruct::{is_path_tile, reconstruct, PathReconstructor};
pub use stats::RunStats;
