use frontier_pathfinding::{CostGrid, FrontierSearch, Point, SearchConfig, Stepper};
use std::thread;
use std::time::Duration;

// Drives a search with one step per tick and redraws the grid after every step:
// S start, E end, * best path, o frontier tip, - visited cell
fn render(search: &FrontierSearch) {
    let path = search.best_path();
    let tips = search.frontier_tips();
    let mut frame = String::new();
    for (y, row) in search.grid().to_string().lines().enumerate() {
        for (x, c) in row.chars().enumerate() {
            let p = Point::new(x as i32, y as i32);
            let symbol = if p == search.start() {
                'S'
            } else if p == search.end() {
                'E'
            } else if path.contains(&p) {
                '*'
            } else if tips.contains(&p) {
                'o'
            } else if search.visited().is_visited(&p) {
                '-'
            } else {
                c
            };
            frame.push(symbol);
        }
        frame.push('\n');
    }
    println!("{frame}");
}

fn main() {
    let grid: CostGrid = "\
        ..........\n\
        .######...\n\
        ......#.2.\n\
        .####.#.2.\n\
        .#..#.#.2.\n\
        .#..#...#.\n\
        ....####..\n"
        .parse()
        .unwrap();
    let config: SearchConfig = SearchConfig::default();
    let mut search =
        FrontierSearch::initialize(grid, Point::new(2, 4), Point::new(9, 6), config).unwrap();
    render(&search);
    while !search.tick(render) {
        thread::sleep(Duration::from_millis(100));
    }
    println!("{:?} after {:?}", search.state(), search.stats());
}
