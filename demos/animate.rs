use std::collections::HashMap;
use std::env;
use std::str::FromStr;
use std::thread;

use stepwise_grid_search::{
    is_path_tile, Algorithm, CellKind, Grid, ParseNameError, Point, Preset, RunStats,
    SearchEngine, SearchSpeed, StepEvent, PRESETS,
};

// Plays a search in the terminal, one step per tick.
//
//     cargo run --example animate -- [preset] [algorithm] [speed]
//
// where
// - preset is one of corridor, open, wall, maze, sealed
// - algorithm is one of dfs, bfs, random, astar
// - speed is one of slow, normal, fast
//
// Cells are drawn as
// - S / G start and goal
// - # obstacle
// - + searched (admitted to the frontier)
// - o traversed (taken from the frontier)
// - * on the reconstructed path

fn render(grid: &Grid, marks: &HashMap<Point, char>, stats: &RunStats) {
    // Clear the screen and move the cursor home.
    print!("\x1b[2J\x1b[H");
    for y in (0..grid.height() as i32).rev() {
        let row: String = (0..grid.width() as i32)
            .map(|x| {
                let p = Point::new(x, y);
                match grid.kind(p) {
                    CellKind::Passable => marks.get(&p).copied().unwrap_or('.'),
                    kind => kind.symbol(),
                }
            })
            .collect();
        println!("{}", row);
    }
    println!("\n{}", stats);
}

fn parse_or<T: FromStr<Err = ParseNameError>>(
    arg: Option<&String>,
    default: T,
) -> Result<T, ParseNameError> {
    arg.map_or(Ok(default), |s| s.parse())
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let preset = match args.first() {
        Some(name) => match Preset::by_name(name) {
            Some(preset) => preset,
            None => {
                eprintln!("unknown preset {name:?}");
                return;
            }
        },
        None => &PRESETS[3],
    };
    let (algorithm, speed) = match (
        parse_or(args.get(1), Algorithm::AStar),
        parse_or(args.get(2), SearchSpeed::default()),
    ) {
        (Ok(algorithm), Ok(speed)) => (algorithm, speed),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("{e}");
            return;
        }
    };

    let grid = match preset.grid() {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("preset {} is broken: {e}", preset.name);
            return;
        }
    };
    let mut engine = SearchEngine::new();
    if let Err(e) = engine.start(algorithm, &grid) {
        eprintln!("{e}");
        return;
    }
    let (start, goal) = (grid.find(CellKind::Start), grid.find(CellKind::Goal));
    let mut stats = RunStats::new(preset.best_path);
    let mut marks = HashMap::new();
    while engine.phase().is_running() {
        for event in engine.step() {
            stats.record(&event);
            match event {
                StepEvent::Searched(p) => {
                    marks.insert(p, '+');
                }
                StepEvent::Traversed(p) => {
                    marks.insert(p, 'o');
                }
                StepEvent::OnPath(p) => {
                    if let (Some(start), Some(goal)) = (start, goal) {
                        if is_path_tile(p, start, goal) {
                            marks.insert(p, '*');
                        }
                    }
                }
                _ => {}
            }
        }
        render(&grid, &marks, &stats);
        thread::sleep(speed.tick_interval());
    }
    println!("{} on {} finished", algorithm, preset.name);
}
