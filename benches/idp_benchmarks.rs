use std::cmp::Ordering;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use idp_pathfind::arena::CostArena;
use idp_pathfind::graph::DomainState;
use idp_pathfind::monoid::MonoidVectorProps;
use idp_pathfind::pathfinder::PathFinder;

#[derive(Clone, PartialEq, Debug)]
struct GridState {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl DomainState for GridState {
    fn unique_id(&self) -> u32 {
        (self.y * self.width + self.x) as u32
    }

    fn successors(&self) -> Vec<Self> {
        let mut out = Vec::new();
        for (dx, dy) in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            let (nx, ny) = (self.x + dx, self.y + dy);
            if nx < 0 || ny < 0 || nx >= self.width || ny >= self.height {
                continue;
            }
            out.push(GridState { x: nx, y: ny, width: self.width, height: self.height });
        }
        out
    }
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
            Box::new(|_: &GridState, _: &GridState| 1i64),
            Box::new(|a: &GridState, b: &GridState| ((a.x - b.x).abs() + (a.y - b.y).abs()) as i64),
        ],
    )
    .unwrap()
}

fn bench_optimal_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimal_path");

    for side in [4, 8, 16, 32].iter() {
        let cells = (side * side) as u64;
        group.throughput(Throughput::Elements(cells));

        group.bench_with_input(BenchmarkId::new("square_grid", side), side, |b, &side| {
            b.iter(|| {
                let mut finder = grid_finder();
                let start = GridState { x: 0, y: 0, width: side, height: side };
                let end = GridState { x: side - 1, y: side - 1, width: side, height: side };
                black_box(finder.optimal_path(start, end));
            });
        });
    }

    group.finish();
}

fn bench_optimal_edges_cached_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimal_edges_cached_session");

    for side in [8, 16, 32].iter() {
        let cells = (side * side) as u64;
        group.throughput(Throughput::Elements(cells));

        group.bench_with_input(BenchmarkId::new("square_grid", side), side, |b, &side| {
            let mut finder = grid_finder();
            let start = GridState { x: 0, y: 0, width: side, height: side };
            let end = GridState { x: side - 1, y: side - 1, width: side, height: side };
            // Warm the lazy graph's expansion cache once, then measure repeat
            // queries over the already-discovered region.
            let _ = finder.optimal_edges(start.clone(), end.clone());

            b.iter(|| {
                black_box(finder.optimal_edges(start.clone(), end.clone()));
            });
        });
    }

    group.finish();
}

fn bench_arena_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("arena_churn");

    for count in [1_000, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));

        group.bench_with_input(BenchmarkId::new("alloc_and_release", count), count, |b, &count| {
            let props = MonoidVectorProps::new(
                vec![0, 0],
                vec![
                    Box::new(|a: &i64, b: &i64| a.cmp(b)) as Box<dyn Fn(&i64, &i64) -> Ordering>,
                    Box::new(|a: &i64, b: &i64| a.cmp(b)) as Box<dyn Fn(&i64, &i64) -> Ordering>,
                ],
                vec![
                    Box::new(|a: &i64, b: &i64| a + b) as Box<dyn Fn(&i64, &i64) -> i64>,
                    Box::new(|a: &i64, b: &i64| a + b) as Box<dyn Fn(&i64, &i64) -> i64>,
                ],
            );
            let arena = CostArena::new(props);
            let step = arena.identity();

            b.iter(|| {
                let mut handles = Vec::with_capacity(count);
                let mut running = arena.identity();
                for _ in 0..count {
                    running = arena.op(&running, &step);
                    handles.push(arena.copy(&running));
                }
                black_box(&handles);
                drop(handles);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_optimal_path, bench_optimal_edges_cached_session, bench_arena_churn);
criterion_main!(benches);
