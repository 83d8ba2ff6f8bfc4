/// Fuzzes the engine with many random grids and checks, for every algorithm, that the goal is
/// found exactly when it is reachable, that the search tree is sound and that BFS and A* return
/// shortest paths.
use std::collections::{HashSet, VecDeque};

use rand::prelude::*;
use stepwise_grid_search::{Algorithm, CellKind, Grid, Phase, Point, SearchEngine, StepEvent};

fn random_grid(w: usize, h: usize, rng: &mut StdRng, density: f64) -> Grid {
    let mut grid = Grid::new(w, h);
    for x in 0..w as i32 {
        for y in 0..h as i32 {
            if rng.gen_bool(density) {
                grid.set_kind(Point::new(x, y), CellKind::Impassable);
            }
        }
    }
    grid
}

fn random_grid_point(grid: &Grid, rng: &mut StdRng) -> Point {
    Point::new(
        rng.gen_range(0..grid.width()) as i32,
        rng.gen_range(0..grid.height()) as i32,
    )
}

/// Plain breadth-first distance, independent of the engine.
fn reference_distance(grid: &Grid, start: Point, goal: Point) -> Option<i32> {
    let mut dist = vec![None; grid.width() * grid.height()];
    let ix = |p: Point| p.y as usize * grid.width() + p.x as usize;
    dist[ix(start)] = Some(0);
    let mut queue = VecDeque::from([start]);
    while let Some(p) = queue.pop_front() {
        let d = dist[ix(p)].unwrap_or(0);
        if p == goal {
            return Some(d);
        }
        for (dx, dy) in [(0, 1), (1, 0), (0, -1), (-1, 0)] {
            let n = Point::new(p.x + dx, p.y + dy);
            if grid.is_traversable(n) && dist[ix(n)].is_none() {
                dist[ix(n)] = Some(d + 1);
                queue.push_back(n);
            }
        }
    }
    None
}

fn adjacent(a: Point, b: Point) -> bool {
    a.manhattan_distance(&b) == 1
}

fn check_run(grid: &Grid, algorithm: Algorithm, seed: u64) {
    let (start, goal) = grid.validate().unwrap();
    let mut engine = SearchEngine::seeded(seed);
    engine.start(algorithm, grid).unwrap();
    let events = engine.run_to_end();
    assert_eq!(engine.phase(), Phase::Done);

    let reachable = grid.reachable(&start, &goal);
    let found = engine.terminal().is_some();
    if found != reachable {
        println!("{algorithm} from {start} to {goal}:\n{grid}");
    }
    assert_eq!(found, reachable);

    // Visited positions are unique and each was reached from one visited before it.
    let visited: Vec<Point> = engine.visited().copied().collect();
    let unique: HashSet<Point> = visited.iter().copied().collect();
    assert_eq!(unique.len(), visited.len());
    assert_eq!(visited[0], start);
    for (i, p) in visited.iter().enumerate().skip(1) {
        assert!(grid.is_traversable(*p));
        assert!(visited[..i].iter().any(|q| adjacent(*p, *q)));
    }

    // Every parent chain ends at the start without revisiting a node.
    let nodes = engine.nodes();
    for (_, node) in nodes.iter() {
        let mut current = *node;
        let mut hops = 0;
        while let Some(parent) = current.parent {
            let parent_node = nodes[parent];
            assert!(adjacent(current.position, parent_node.position));
            assert_eq!(
                current.distance_from_start,
                parent_node.distance_from_start + 1
            );
            current = parent_node;
            hops += 1;
            assert!(hops <= nodes.len());
        }
        assert_eq!(current.position, start);
    }

    let on_path: Vec<Point> = events
        .iter()
        .filter_map(|e| match e {
            StepEvent::OnPath(p) => Some(*p),
            _ => None,
        })
        .collect();
    if let Some(terminal) = engine.terminal() {
        assert_eq!(terminal.position, goal);
        assert_eq!(on_path.len() as i32, terminal.distance_from_start + 1);
        assert_eq!(on_path.first(), Some(&goal));
        assert_eq!(on_path.last(), Some(&start));
        assert!(on_path.windows(2).all(|w| adjacent(w[0], w[1])));
        assert_eq!(engine.path().collect::<Vec<_>>(), on_path);
        if matches!(algorithm, Algorithm::Bfs | Algorithm::AStar) {
            assert_eq!(
                Some(terminal.distance_from_start),
                reference_distance(grid, start, goal),
                "{algorithm} is not optimal on\n{grid}"
            );
        }
    } else {
        assert!(on_path.is_empty());
        assert_eq!(events.last(), Some(&StepEvent::NoPathFound));
    }
}

#[test]
fn fuzz() {
    const N: usize = 9;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    for density in [0.2, 0.35, 0.5] {
        for _ in 0..N_GRIDS {
            let mut grid = random_grid(N, N, &mut rng, density);
            let start = random_grid_point(&grid, &mut rng);
            let mut goal = random_grid_point(&grid, &mut rng);
            while goal == start {
                goal = random_grid_point(&grid, &mut rng);
            }
            grid.set_kind(start, CellKind::Start);
            grid.set_kind(goal, CellKind::Goal);
            grid.update();
            for algorithm in Algorithm::ALL {
                check_run(&grid, algorithm, rng.gen());
            }
        }
    }
}

#[test]
fn fuzz_rectangular() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..500 {
        let w = rng.gen_range(2..12);
        let h = rng.gen_range(1..5);
        let mut grid = random_grid(w, h, &mut rng, 0.25);
        grid.set_kind(Point::new(0, 0), CellKind::Start);
        grid.set_kind(Point::new(w as i32 - 1, h as i32 - 1), CellKind::Goal);
        grid.update();
        for algorithm in Algorithm::ALL {
            check_run(&grid, algorithm, rng.gen());
        }
    }
}

/// Identical inputs give identical event streams; the random frontier needs the same seed.
#[test]
fn deterministic() {
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..200 {
        let mut grid = random_grid(8, 8, &mut rng, 0.3);
        grid.set_kind(Point::new(0, 0), CellKind::Start);
        grid.set_kind(Point::new(7, 7), CellKind::Goal);
        for algorithm in Algorithm::ALL {
            let seed: u64 = rng.gen();
            let run = |seed| {
                let mut engine = SearchEngine::seeded(seed);
                engine.start(algorithm, &grid).unwrap();
                engine.run_to_end()
            };
            let first = run(seed);
            assert_eq!(first, run(seed));
            if algorithm != Algorithm::Random {
                assert_eq!(first, run(seed.wrapping_add(1)));
            }
        }
    }
}
