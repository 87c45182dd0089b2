use frontier_pathfinding::{CostGrid, FrontierSearch, Point, SearchConfig, SearchOutcome};

// In this example a path is found on a weighted grid
// S.3..
// .#3#.
// .#...
// ...9E
// S marks the start, E marks the end, # is blocked and digits are costly cells
fn main() {
    let grid: CostGrid = "\
        ..3..\n\
        .#3#.\n\
        .#...\n\
        ...9.\n"
        .parse()
        .unwrap();
    let start = Point::new(0, 0);
    let end = Point::new(4, 3);
    let config: SearchConfig = SearchConfig::default();
    let mut search = FrontierSearch::initialize(grid, start, end, config).unwrap();
    match search.run() {
        SearchOutcome::Found { path, cost } => {
            println!("A path of cost {cost:.3} has been found:");
            for p in path {
                println!("{:?}", p);
            }
        }
        SearchOutcome::Exhausted => println!("No path exists"),
    }
}
