use core::fmt;
use std::str::FromStr;

use grid_util::grid::{BoolGrid, Grid as ValueGrid};
use grid_util::point::Point;
use itertools::Itertools;
use log::{info, warn};
use petgraph::unionfind::UnionFind;

use crate::error::{InvalidGridError, ParseGridError};

/// What occupies a cell of a [Grid].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Start,
    Goal,
    Passable,
    Impassable,
    OutOfBounds,
}

impl CellKind {
    /// Start, goal and passable cells can be entered.
    pub fn is_traversable(self) -> bool {
        matches!(self, CellKind::Start | CellKind::Goal | CellKind::Passable)
    }
    /// Symbol used in the text form of a grid. Out-of-bounds has none and prints as a space.
    pub fn symbol(self) -> char {
        match self {
            CellKind::Start => 'S',
            CellKind::Goal => 'G',
            CellKind::Passable => '.',
            CellKind::Impassable => '#',
            CellKind::OutOfBounds => ' ',
        }
    }
    pub fn from_symbol(symbol: char) -> Option<CellKind> {
        match symbol {
            'S' => Some(CellKind::Start),
            'G' => Some(CellKind::Goal),
            '.' => Some(CellKind::Passable),
            '#' => Some(CellKind::Impassable),
            _ => None,
        }
    }
}

/// Offsets of the 4-neighbourhood in expansion order: up, right, down, left. The y axis points up.
pub const NEIGHBOUR_OFFSETS: [(i32, i32); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// A rectangular map of [CellKind]s. Passability is kept in a [BoolGrid] where `true` marks an
/// impassable cell; start and goal cells are tracked separately so that malformed grids with
/// several of either can still be represented and rejected by [validate](Self::validate).
///
/// Connected components of traversable cells are maintained in a [UnionFind] structure in the
/// same way a pathing grid would, allowing [reachable](Self::reachable) queries without search.
#[derive(Clone, Debug)]
pub struct Grid {
    blocked: BoolGrid,
    starts: Vec<Point>,
    goals: Vec<Point>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Grid {
    /// Creates a grid of passable cells without a start or goal.
    pub fn new(width: usize, height: usize) -> Grid {
        let mut grid = Grid {
            blocked: BoolGrid::new(width, height, false),
            starts: Vec::new(),
            goals: Vec::new(),
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }
    pub fn width(&self) -> usize {
        self.blocked.width()
    }
    pub fn height(&self) -> usize {
        self.blocked.height()
    }
    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width()
            && (point.y as usize) < self.height()
    }
    pub fn kind(&self, point: Point) -> CellKind {
        if !self.in_bounds(point) {
            CellKind::OutOfBounds
        } else if self.blocked.get_point(point) {
            CellKind::Impassable
        } else if self.starts.contains(&point) {
            CellKind::Start
        } else if self.goals.contains(&point) {
            CellKind::Goal
        } else {
            CellKind::Passable
        }
    }
    pub fn is_traversable(&self, point: Point) -> bool {
        self.kind(point).is_traversable()
    }
    /// The four neighbours of a point in expansion order (up, right, down, left). Points outside
    /// the grid are included; they report [CellKind::OutOfBounds].
    pub fn neighbors(&self, point: Point) -> [Point; 4] {
        NEIGHBOUR_OFFSETS.map(|(dx, dy)| Point::new(point.x + dx, point.y + dy))
    }
    /// All cells in scan order: x fastest, starting at the origin.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        let (w, h) = (self.width() as i32, self.height() as i32);
        (0..h).flat_map(move |y| (0..w).map(move |x| Point::new(x, y)))
    }
    /// Scans the grid for the first cell of the given kind.
    pub fn find(&self, kind: CellKind) -> Option<Point> {
        self.points().find(|p| self.kind(*p) == kind)
    }
    pub fn find_all(&self, kind: CellKind) -> Vec<Point> {
        self.points().filter(|p| self.kind(*p) == kind).collect()
    }
    /// Paints a cell. Writes outside the grid are ignored. Joins newly connected components and
    /// flags the components as dirty if they are (potentially) broken apart.
    pub fn set_kind(&mut self, point: Point, kind: CellKind) {
        if !self.in_bounds(point) || kind == CellKind::OutOfBounds {
            warn!("Ignoring write of {:?} to {}", kind, point);
            return;
        }
        self.starts.retain(|p| *p != point);
        self.goals.retain(|p| *p != point);
        match kind {
            CellKind::Start => self.starts.push(point),
            CellKind::Goal => self.goals.push(point),
            _ => {}
        }
        let blocked = !kind.is_traversable();
        if blocked {
            if !self.blocked.get_point(point) {
                self.components_dirty = true;
            }
        } else {
            let ix = self.blocked.get_ix_point(&point);
            for n in self.neighbors(point) {
                if self.is_traversable(n) {
                    self.components.union(ix, self.blocked.get_ix_point(&n));
                }
            }
        }
        self.blocked.set_point(point, blocked);
    }
    /// Checks that there is exactly one start and one goal and returns their positions.
    pub fn validate(&self) -> Result<(Point, Point), InvalidGridError> {
        let start = match self.starts.as_slice() {
            [] => return Err(InvalidGridError::MissingStart),
            [start] => *start,
            many => return Err(InvalidGridError::MultipleStarts(many.len())),
        };
        let goal = match self.goals.as_slice() {
            [] => return Err(InvalidGridError::MissingGoal),
            [goal] => *goal,
            many => return Err(InvalidGridError::MultipleGoals(many.len())),
        };
        Ok((start, goal))
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }
    /// Checks if start and goal are not on the same component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.is_traversable(*start) && self.is_traversable(*goal) {
            let start_ix = self.blocked.get_ix_point(start);
            let goal_ix = self.blocked.get_ix_point(goal);
            !self.components.equiv(start_ix, goal_ix)
        } else {
            true
        }
    }
    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }
    /// Generates a new [UnionFind] structure and links up traversable neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        let w = self.width();
        let h = self.height();
        self.components = UnionFind::new(w * h);
        self.components_dirty = false;
        for point in self.points().collect_vec() {
            if !self.is_traversable(point) {
                continue;
            }
            let parent_ix = self.blocked.get_ix_point(&point);
            // Down and left links are made from the other side.
            for n in [Point::new(point.x, point.y + 1), Point::new(point.x + 1, point.y)] {
                if self.is_traversable(n) {
                    let ix = self.blocked.get_ix_point(&n);
                    self.components.union(parent_ix, ix);
                }
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in (0..self.height() as i32).rev() {
            let row: String = (0..self.width() as i32)
                .map(|x| self.kind(Point::new(x, y)).symbol())
                .collect();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// Reads the text form written by [Display]: one line per row, top row first, using `S`, `G`,
/// `.` and `#`. Surrounding whitespace and blank lines are ignored.
impl FromStr for Grid {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect_vec();
        let width = match rows.first() {
            Some(row) => row.chars().count(),
            None => return Err(ParseGridError::Empty),
        };
        let height = rows.len();
        let mut grid = Grid::new(width, height);
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ParseGridError::RaggedRow {
                    row,
                    expected: width,
                    found,
                });
            }
            let y = (height - 1 - row) as i32;
            for (column, symbol) in line.chars().enumerate() {
                let kind = CellKind::from_symbol(symbol).ok_or(ParseGridError::UnknownSymbol {
                    row,
                    column,
                    symbol,
                })?;
                if kind != CellKind::Passable {
                    grid.set_kind(Point::new(column as i32, y), kind);
                }
            }
        }
        grid.update();
        Ok(grid)
    }
}
