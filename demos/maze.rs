use frontier_pathfinding::{
    FrontierSearch, MazeCarver, NeighborPolicy, Point, SearchConfig, SearchOutcome,
};
use rand::prelude::*;

// Carves a maze, then solves it from the top left corner to the carved cell furthest away
// in the bottom right.
fn main() {
    let start = Point::new(0, 0);
    let mut carver = MazeCarver::new(31, 15, start, StdRng::seed_from_u64(5)).unwrap();
    let mut steps = 0;
    while !carver.step() {
        steps += 1;
    }
    println!("Carved in {steps} steps:");
    let grid = carver.into_grid();
    println!("{grid}");

    let end = grid
        .passable()
        .into_iter()
        .max_by_key(|p| p.x + p.y)
        .unwrap();
    let config: SearchConfig = SearchConfig {
        policy: NeighborPolicy::orthogonal(),
        ..Default::default()
    };
    let mut search = FrontierSearch::initialize(grid, start, end, config).unwrap();
    if let SearchOutcome::Found { path, cost } = search.run() {
        println!(
            "Solved from {start:?} to {end:?}: {} cells, cost {cost}, {} iterations",
            path.len(),
            search.stats().iterations
        );
    }
}
