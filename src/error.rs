//! Typed errors.
//!
//! [InvalidGridError] and [SearchError] are pre-flight failures of
//! [SearchEngine::start](crate::SearchEngine::start): they are returned before any search state is
//! touched. An unreachable goal is not an error, it is reported through
//! [StepEvent::NoPathFound](crate::StepEvent::NoPathFound).

use core::fmt;

use crate::engine::Phase;

/// The grid does not have exactly one start and exactly one goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidGridError {
    MissingStart,
    MissingGoal,
    MultipleStarts(usize),
    MultipleGoals(usize),
}

impl fmt::Display for InvalidGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => write!(f, "grid has no start cell"),
            Self::MissingGoal => write!(f, "grid has no goal cell"),
            Self::MultipleStarts(n) => write!(f, "grid has {n} start cells, expected one"),
            Self::MultipleGoals(n) => write!(f, "grid has {n} goal cells, expected one"),
        }
    }
}

impl std::error::Error for InvalidGridError {}

/// Failure to start a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchError {
    InvalidGrid(InvalidGridError),
    /// A run is still in progress; cancel it or step it to completion first.
    AlreadyRunning { phase: Phase },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGrid(e) => write!(f, "invalid grid: {e}"),
            Self::AlreadyRunning { phase } => {
                write!(f, "a search is already running (phase: {phase:?})")
            }
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidGrid(e) => Some(e),
            Self::AlreadyRunning { .. } => None,
        }
    }
}

impl From<InvalidGridError> for SearchError {
    fn from(e: InvalidGridError) -> Self {
        Self::InvalidGrid(e)
    }
}

/// Failure to read a grid from its text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseGridError {
    Empty,
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    UnknownSymbol {
        row: usize,
        column: usize,
        symbol: char,
    },
}

impl fmt::Display for ParseGridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "grid text contains no rows"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            Self::UnknownSymbol {
                row,
                column,
                symbol,
            } => write!(f, "unknown symbol {symbol:?} at row {row}, column {column}"),
        }
    }
}

impl std::error::Error for ParseGridError {}

/// A name that matches no [Algorithm](crate::Algorithm) or [SearchSpeed](crate::SearchSpeed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseNameError {
    UnknownAlgorithm(String),
    UnknownSpeed(String),
}

impl fmt::Display for ParseNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAlgorithm(name) => write!(
                f,
                "unknown algorithm {name:?}, expected dfs, bfs, random or astar"
            ),
            Self::UnknownSpeed(name) => {
                write!(f, "unknown speed {name:?}, expected slow, normal or fast")
            }
        }
    }
}

impl std::error::Error for ParseNameError {}
