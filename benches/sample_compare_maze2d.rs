use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use wayfinder::algorithms::astar::AStarSearch;
use wayfinder::algorithms::uninformed::BfsSearch;
use wayfinder::algorithms::uninformed::DfsSearch;
use wayfinder::problems::maze_2d::Maze2DAction;
use wayfinder::problems::maze_2d::Maze2DCost;
use wayfinder::problems::maze_2d::Maze2DHeuristicManhattan;
use wayfinder::problems::maze_2d::Maze2DProblem;
use wayfinder::problems::maze_2d::Maze2DSpace;
use wayfinder::problems::maze_2d::Maze2DState;

const SIZES: [usize; 3] = [16, 32, 64];
const INSTANCES_PER_SIZE: u64 = 3;
const WALL_PERCENT: u32 = 25;

type Bfs = BfsSearch<Maze2DProblem, Maze2DSpace, Maze2DState, Maze2DAction, Maze2DCost>;
type Dfs = DfsSearch<Maze2DProblem, Maze2DSpace, Maze2DState, Maze2DAction, Maze2DCost>;
type AStar = AStarSearch<
    Maze2DHeuristicManhattan,
    Maze2DProblem,
    Maze2DSpace,
    Maze2DState,
    Maze2DAction,
    Maze2DCost,
>;

/// A random maze with open corners, so the base endpoints always validate.
fn random_maze(side: usize, rng: &mut ChaCha8Rng) -> Maze2DProblem {
    let mut rows = vec![vec![0u8; side]; side];
    for row in rows.iter_mut() {
        for cell in row.iter_mut() {
            *cell = u8::from(rng.random_range(0..100u32) < WALL_PERCENT);
        }
    }
    rows[0][0] = 0;
    rows[side - 1][side - 1] = 0;

    Maze2DProblem::from_numeric(&rows, (0, 0), (side - 1, side - 1)).unwrap()
}

fn bfs(problem: Maze2DProblem) -> bool {
    Bfs::new(problem).find_first().is_some()
}

fn dfs(problem: Maze2DProblem) -> bool {
    Dfs::new(problem).find_first().is_some()
}

fn astar(problem: Maze2DProblem) -> bool {
    AStar::new(problem).find_first().is_some()
}

fn compare_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("Maze2D Search");

    for side in SIZES {
        for seed in 0..INSTANCES_PER_SIZE {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let base = random_maze(side, &mut rng);

            let Some(problem) = base.randomize(&mut rng) else {
                continue;
            };
            let instance_name = format!("{side}x{side}:{seed}");

            group.bench_with_input(BenchmarkId::new("BFS", &instance_name), &problem, |b, p| {
                b.iter(|| bfs(p.clone()))
            });
            group.bench_with_input(BenchmarkId::new("DFS", &instance_name), &problem, |b, p| {
                b.iter(|| dfs(p.clone()))
            });
            group.bench_with_input(BenchmarkId::new("A*", &instance_name), &problem, |b, p| {
                b.iter(|| astar(p.clone()))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, compare_search);
criterion_main!(benches);
