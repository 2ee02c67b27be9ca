//! Grid pathfinding over a two-coordinate cost: distance first, then the
//! number of obstacle-adjacent cells each edge's endpoints touch.
//!
//! Run with `IDP_LOG=1 cargo run --example grid --features logging` to see
//! the algorithm's tracing output.

use std::cmp::Ordering;

use idp_pathfind::graph::DomainState;
use idp_pathfind::pathfinder::PathFinder;

/// A cell in a rectangular grid with a fixed obstacle layout.
#[derive(Clone, PartialEq, Debug)]
struct GridState {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    obstacles: Vec<bool>,
}

impl GridState {
    fn new(x: i32, y: i32, width: i32, height: i32, obstacles: Vec<bool>) -> Self {
        GridState { x, y, width, height, obstacles }
    }

    fn is_obstacle(&self, x: i32, y: i32) -> bool {
        self.obstacles[(y * self.width + x) as usize]
    }

    /// Count of this cell's in-bounds neighbours (N/S/E/W) that are
    /// obstacles. Out-of-bounds neighbours never count.
    fn number_of_nearby_obstacles(&self) -> i32 {
        let mut count = 0;
        if self.y > 0 && self.is_obstacle(self.x, self.y - 1) {
            count += 1;
        }
        if self.y + 1 < self.height && self.is_obstacle(self.x, self.y + 1) {
            count += 1;
        }
        if self.x > 0 && self.is_obstacle(self.x - 1, self.y) {
            count += 1;
        }
        if self.x + 1 < self.width && self.is_obstacle(self.x + 1, self.y) {
            count += 1;
        }
        count
    }
}

impl DomainState for GridState {
    fn unique_id(&self) -> u32 {
        (self.y * self.width + self.x) as u32
    }

    fn successors(&self) -> Vec<Self> {
        let mut out = Vec::new();
        if self.is_obstacle(self.x, self.y) {
            return out;
        }
        for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            let (nx, ny) = (self.x + dx, self.y + dy);
            if nx < 0 || ny < 0 || nx >= self.width || ny >= self.height {
                continue;
            }
            if self.is_obstacle(nx, ny) {
                continue;
            }
            out.push(GridState::new(nx, ny, self.width, self.height, self.obstacles.clone()));
        }
        out
    }
}

fn compute_distance_cost(_from: &GridState, _to: &GridState) -> i64 {
    1
}

fn compute_obstacle_cost(from: &GridState, to: &GridState) -> i64 {
    (from.number_of_nearby_obstacles() + to.number_of_nearby_obstacles()) as i64
}

fn grid_finder() -> PathFinder<GridState, i64> {
    PathFinder::new(
        vec![0, 0],
        vec![
            Box::new(|a: &i64, b: &i64| a.cmp(b)) as Box<dyn Fn(&i64, &i64) -> Ordering>,
            Box::new(|a: &i64, b: &i64| a.cmp(b)) as Box<dyn Fn(&i64, &i64) -> Ordering>,
        ],
        vec![
            Box::new(|a: &i64, b: &i64| a + b) as Box<dyn Fn(&i64, &i64) -> i64>,
            Box::new(|a: &i64, b: &i64| a + b) as Box<dyn Fn(&i64, &i64) -> i64>,
        ],
        vec![
            Box::new(compute_distance_cost) as Box<dyn Fn(&GridState, &GridState) -> i64>,
            Box::new(compute_obstacle_cost) as Box<dyn Fn(&GridState, &GridState) -> i64>,
        ],
    )
    .expect("two coordinates is a non-empty cost vector")
}

fn main() {
    let width = 3;
    let height = 3;
    let mut obstacles = vec![false; (width * height) as usize];
    obstacles[(1 * width + 1) as usize] = true; // obstacle at (1, 1)

    let start = GridState::new(0, 0, width, height, obstacles.clone());
    let end = GridState::new(width - 1, height - 1, width, height, obstacles);

    let mut finder = grid_finder();

    let path = finder.optimal_path(start.clone(), end.clone());
    println!("optimal path ({} nodes):", path.len());
    for state in &path {
        println!("  ({}, {})", state.x, state.y);
    }

    let edges = finder.optimal_edges(start, end);
    println!("optimal edges ({} endpoints):", edges.len());
    for pair in edges.chunks(2) {
        if let [from, to] = pair {
            println!("  ({}, {}) -> ({}, {})", from.x, from.y, to.x, to.y);
        }
    }
}
