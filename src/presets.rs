//! Ready-made grids to run the algorithms on, each with the length of its shortest path.

use crate::error::ParseGridError;
use crate::grid::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub layout: &'static str,
    /// Moves on a shortest path from start to goal, `None` if the goal cannot be reached.
    pub best_path: Option<usize>,
}

impl Preset {
    pub fn grid(&self) -> Result<Grid, ParseGridError> {
        self.layout.parse()
    }
    pub fn by_name(name: &str) -> Option<&'static Preset> {
        PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

pub static PRESETS: [Preset; 5] = [
    Preset {
        name: "corridor",
        layout: "S..G",
        best_path: Some(3),
    },
    Preset {
        name: "open",
        layout: "
            .......G
            ........
            ........
            S.......
        ",
        best_path: Some(10),
    },
    Preset {
        name: "wall",
        layout: "
            ....#...G
            ....#....
            ....#....
            .........
            S...#....
        ",
        best_path: Some(12),
    },
    Preset {
        name: "maze",
        layout: "
            S.#.......
            ..#.####.#
            ..#....#..
            .####..##.
            ......#...
            ####.##.#.
            .....#..#G
        ",
        best_path: Some(27),
    },
    Preset {
        name: "sealed",
        layout: "
            S..#....
            ...#....
            ...#..G.
            ...#....
        ",
        best_path: None,
    },
];
