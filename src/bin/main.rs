use std::path::PathBuf;

use clap::Parser;
use indoc::indoc;
use owo_colors::OwoColorize;

use wayfinder::algorithms::astar::AStarSearch;
use wayfinder::algorithms::uninformed::BfsSearch;
use wayfinder::algorithms::uninformed::DfsSearch;
use wayfinder::problem::Problem;
use wayfinder::problem::ZeroHeuristic;
use wayfinder::problems::maze_2d::Maze2DAction;
use wayfinder::problems::maze_2d::Maze2DCost;
use wayfinder::problems::maze_2d::Maze2DHeuristicManhattan;
use wayfinder::problems::maze_2d::Maze2DProblem;
use wayfinder::problems::maze_2d::Maze2DSpace;
use wayfinder::problems::maze_2d::Maze2DState;
use wayfinder::problems::weighted_graph::GraphHeuristicTable;
use wayfinder::problems::weighted_graph::WeightedGraph;
use wayfinder::problems::weighted_graph::WeightedGraphProblem;
use wayfinder::render;
use wayfinder::space::Path;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory to drop PNG renderings into. No renderings without it.
    #[arg(short, long, env = "RENDER_DIR")]
    pub render: Option<PathBuf>,

    /// Pixels per maze cell in renderings.
    #[arg(long, default_value_t = 16)]
    pub scale: u32,

    /// Extra maze files ('S'/'E' markers, '#' walls) to solve.
    #[arg()]
    pub mazes: Vec<PathBuf>,
}

type MazeBfs = BfsSearch<Maze2DProblem, Maze2DSpace, Maze2DState, Maze2DAction, Maze2DCost>;
type MazeDfs = DfsSearch<Maze2DProblem, Maze2DSpace, Maze2DState, Maze2DAction, Maze2DCost>;
type MazeAStar<H> = AStarSearch<H, Maze2DProblem, Maze2DSpace, Maze2DState, Maze2DAction, Maze2DCost>;

fn report<St, A, C>(name: &str, path: &Option<Path<St, A, C>>, discovered: usize)
where
    St: wayfinder::space::State,
    A: wayfinder::space::Action,
    C: wayfinder::space::Cost,
{
    match path {
        Some(p) => println!(
            "  {}: {} cost={} len={} (discovered {} states)",
            name.bold(),
            "found".green(),
            p.cost,
            p.len(),
            discovered,
        ),
        None => println!(
            "  {}: {} (discovered {} states)",
            name.bold(),
            "no path".red(),
            discovered,
        ),
    }
}

fn solve_maze(
    title: &str,
    problem: &Maze2DProblem,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", title.bold().underline());
    print!("{problem}");

    let mut bfs = MazeBfs::new(problem.clone());
    let bfs_path = bfs.find_first();
    report("bfs", &bfs_path, bfs.discovered());

    let mut dfs = MazeDfs::new(problem.clone());
    let dfs_path = dfs.find_first();
    report("dfs", &dfs_path, dfs.discovered());

    let mut astar = MazeAStar::<Maze2DHeuristicManhattan>::new(problem.clone());
    let astar_path = astar.find_first();
    report("a*  (manhattan)", &astar_path, astar.discovered());

    let mut dijkstra = MazeAStar::<ZeroHeuristic>::new(problem.clone());
    let dijkstra_path = dijkstra.find_first();
    report("a*  (zero)", &dijkstra_path, dijkstra.discovered());

    if let Some(dir) = &args.render {
        std::fs::create_dir_all(dir)?;
        let out = dir.join(format!("{}.png", title.replace(' ', "_")));
        render::render_maze(problem, bfs_path.as_ref(), args.scale, &out)?;
        println!("  rendered to {}", out.display().cyan());
    }
    println!();

    Ok(())
}

fn solve_graph(
    title: &str,
    problem: &WeightedGraphProblem,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", title.bold().underline());
    print!("{}", problem.space());

    let mut astar = GraphAStar::<GraphHeuristicTable>::new(problem.clone());
    let path = astar.find_first();
    report("a*  (table)", &path, astar.discovered());
    if let Some(p) = &path {
        let route: Vec<&str> = p
            .states(problem.space())
            .iter()
            .map(|id| problem.space().label(id))
            .collect();
        println!("  route: {}", route.join(" → ").green());
    }

    if let Some(dir) = &args.render {
        std::fs::create_dir_all(dir)?;
        let out = dir.join(format!("{}.png", title.replace(' ', "_")));
        render::render_graph(problem, path.as_ref(), 512, &out)?;
        println!("  rendered to {}", out.display().cyan());
    }
    println!();

    Ok(())
}

type GraphAStar<H> = AStarSearch<
    H,
    WeightedGraphProblem,
    WeightedGraph,
    wayfinder::problems::weighted_graph::NodeId,
    wayfinder::problems::weighted_graph::GraphHop,
    wayfinder::problems::weighted_graph::GraphCost,
>;

fn showcase_maze() -> Result<Maze2DProblem, Box<dyn std::error::Error>> {
    Ok(Maze2DProblem::try_from(indoc! {"
        S..#...
        .#.#.#.
        .#.....
        ..###..
        .#...#.
        .###.#.
        ......E
    "})?)
}

fn showcase_numeric_maze() -> Result<Maze2DProblem, Box<dyn std::error::Error>> {
    let rows = vec![
        vec![0u8, 1, 0, 0, 0],
        vec![0, 1, 0, 1, 0],
        vec![0, 0, 0, 1, 0],
        vec![1, 1, 1, 1, 0],
        vec![0, 0, 0, 0, 0],
    ];
    Ok(Maze2DProblem::from_numeric(&rows, (0, 0), (4, 4))?)
}

fn showcase_graph() -> Result<WeightedGraphProblem, Box<dyn std::error::Error>> {
    let mut graph = WeightedGraph::new();
    let s = graph.add_node("S")?;
    let a = graph.add_node("A")?;
    let b = graph.add_node("B")?;
    let c = graph.add_node("C")?;
    let d = graph.add_node("D")?;
    let g = graph.add_node("G")?;

    graph.add_edge(s, a, 1)?;
    graph.add_edge(s, b, 4)?;
    graph.add_edge(a, b, 2)?;
    graph.add_edge(a, c, 5)?;
    graph.add_edge(a, d, 12)?;
    graph.add_edge(b, c, 2)?;
    graph.add_edge(c, d, 3)?;
    graph.add_edge(c, g, 7)?;
    graph.add_edge(d, g, 2)?;

    let heuristics = [("S", 7), ("A", 6), ("B", 4), ("C", 2), ("D", 1), ("G", 0)];
    Ok(WeightedGraphProblem::new(graph, &heuristics, "S", "G")?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    solve_maze("showcase maze 7x7", &showcase_maze()?, &args)?;
    solve_maze("numeric maze 5x5", &showcase_numeric_maze()?, &args)?;
    solve_graph("showcase graph", &showcase_graph()?, &args)?;

    for p in &args.mazes {
        let text = std::fs::read_to_string(p)?;
        let problem = Maze2DProblem::try_from(text.as_str())?;
        solve_maze(&p.display().to_string(), &problem, &args)?;
    }

    Ok(())
}
