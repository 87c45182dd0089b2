use frontier_pathfinding::{CostGrid, FrontierSearch, Point, SearchConfig, SearchOutcome};

// A single search instance is reused for several ends on the same grid, and then moved to a
// rebuilt grid.
fn main() {
    let grid: CostGrid = "\
        ........\n\
        .##.###.\n\
        .#....#.\n\
        .#.##.#.\n\
        ........\n"
        .parse()
        .unwrap();
    let start = Point::new(0, 0);
    let config: SearchConfig = SearchConfig {
        precheck_reachability: true,
        ..Default::default()
    };
    let mut search = FrontierSearch::initialize(grid, start, Point::new(7, 4), config).unwrap();
    for end in [Point::new(7, 4), Point::new(3, 2), Point::new(4, 3)] {
        if end != search.end() {
            if let Err(e) = search.retarget(end) {
                println!("Cannot retarget: {e}");
                continue;
            }
        }
        match search.run() {
            SearchOutcome::Found { path, cost } => {
                println!("{start:?} -> {end:?}: {} cells, cost {cost:.3}", path.len())
            }
            SearchOutcome::Exhausted => println!("{start:?} -> {end:?}: unreachable"),
        }
    }

    let mut walled = search.grid().clone();
    walled.block(Point::new(0, 1)).unwrap();
    walled.block(Point::new(1, 0)).unwrap();
    search.replace_grid(walled).unwrap();
    println!("After walling in the start: {:?}", search.run());
}
