/// Fuzzes the search by checking for many random weighted grids that a path is found exactly when
/// the end is reachable by being part of the same connected component as the start, and that
/// every found path is made of legal moves. Policies that keep blocked candidates are included.
use frontier_pathfinding::explorer::step_cost;
use frontier_pathfinding::*;
use itertools::Itertools;
use rand::prelude::*;

fn random_grid(w: usize, h: usize, rng: &mut StdRng) -> CostGrid {
    let mut grid = CostGrid::new(w, h, EMPTY_CELL_COST);
    for x in 0..w as i32 {
        for y in 0..h as i32 {
            let cost = if rng.gen_bool(0.4) {
                BLOCKED
            } else {
                f64::from(rng.gen_range(1..4u8))
            };
            grid.set_cost(Point::new(x, y), cost).unwrap();
        }
    }
    grid
}

fn visualize_grid(grid: &CostGrid, start: &Point, end: &Point) {
    for (y, row) in grid.to_string().lines().enumerate() {
        let row = row
            .chars()
            .enumerate()
            .map(|(x, c)| {
                let p = Point::new(x as i32, y as i32);
                if p == *start {
                    'S'
                } else if p == *end {
                    'G'
                } else {
                    c
                }
            })
            .collect::<String>();
        println!("{row}");
    }
}

#[test]
fn fuzz() {
    const N: usize = 10;
    const N_GRIDS: usize = 2000;
    let mut rng = StdRng::seed_from_u64(0);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, N as i32 - 1);
    let keep_blocked = NeighborPolicy {
        reject_unreachable: false,
        ..NeighborPolicy::octile()
    };
    for policy in [
        NeighborPolicy::orthogonal(),
        NeighborPolicy::octile(),
        keep_blocked,
    ] {
        for _ in 0..N_GRIDS {
            let mut grid = random_grid(N, N, &mut rng);
            grid.clear(start).unwrap();
            grid.clear(end).unwrap();
            grid.generate_components(&policy);
            let reachable = grid.reachable(&start, &end);

            let config: SearchConfig = SearchConfig {
                policy,
                ..Default::default()
            };
            let mut search = FrontierSearch::initialize(grid.clone(), start, end, config).unwrap();
            let outcome = search.run();
            // Show the grid if the outcome is wrong
            if matches!(outcome, SearchOutcome::Found { .. }) != reachable {
                visualize_grid(&grid, &start, &end);
            }
            assert_eq!(matches!(outcome, SearchOutcome::Found { .. }), reachable);

            if let SearchOutcome::Found { path, cost } = outcome {
                assert_eq!(path.last(), Some(&end));
                let mut total = 0.0;
                for (a, b) in std::iter::once(start).chain(path).tuple_windows() {
                    assert!(policy.adjacent(&a, &b), "{a:?} -> {b:?} is not a legal move");
                    let c = step_cost(&grid, &a, &b).unwrap();
                    assert!(c.is_finite());
                    total += c;
                }
                assert!((total - cost).abs() < 1e-9);
            }
        }
    }
}

/// The precheck only short-circuits unreachable searches, it never changes whether a path is found.
#[test]
fn fuzz_precheck() {
    const N: usize = 8;
    const N_GRIDS: usize = 500;
    let mut rng = StdRng::seed_from_u64(1);
    let start = Point::new(0, 0);
    let end = Point::new(N as i32 - 1, 0);
    for _ in 0..N_GRIDS {
        let mut grid = random_grid(N, N, &mut rng);
        grid.clear(start).unwrap();
        grid.clear(end).unwrap();
        let plain: SearchConfig = SearchConfig::default();
        let prechecked = SearchConfig {
            precheck_reachability: true,
            ..plain.clone()
        };
        let a = FrontierSearch::initialize(grid.clone(), start, end, plain)
            .unwrap()
            .run();
        let b = FrontierSearch::initialize(grid, start, end, prechecked)
            .unwrap()
            .run();
        assert_eq!(a, b);
    }
}
