//! A* search: best-first expansion ordered by `f = g + h`.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;

use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::search::SearchTree;
use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// The ranking tuple for A*
///
/// We prefer better f-values, and tie break for lower h. The tie-break is an
/// implementation detail; callers must not rely on which equal-f path wins.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AStarRank<C: Cost> {
    f: C,
    h: C,
}

impl<C> AStarRank<C>
where
    C: Cost,
{
    pub fn new(g: C, h: C) -> Self {
        Self {
            f: g.saturating_add(&h),
            h,
        }
    }

    pub fn f(&self) -> C {
        self.f
    }
}

/// An open-list entry.
///
/// Entries carry just ranking information and the index of the actual search
/// node. A node may have several live entries at once: finding a cheaper
/// route pushes a fresh, better-ranked entry rather than re-ranking the old
/// one in place. The stale entries surface later and are skipped because the
/// node is closed by then.
#[derive(Debug)]
struct AStarHeapNode<C>
where
    C: Cost,
{
    rank: AStarRank<C>,
    node_index: SearchTreeIndex,
}

/// PartialEq is forwarded to self.rank's PartialEq
impl<C: Cost> PartialEq for AStarHeapNode<C> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank.eq(&other.rank)
    }
}
impl<C: Cost> Eq for AStarHeapNode<C> {}

/// PartialOrd is forwarded to Ord::cmp
impl<C: Cost> PartialOrd for AStarHeapNode<C> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.rank.cmp(&other.rank))
    }
}
/// Ord is forwarded to self.rank's Ord
impl<C: Cost> Ord for AStarHeapNode<C> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

#[derive(Debug)]
pub struct AStarSearch<H, P, Sp, St, A, C>
where
    H: Heuristic<P, Sp, St, A, C>,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    search_tree: SearchTree<St, A, C>,

    /// Min-heap on `(f, h)`.
    open: BinaryHeap<Reverse<AStarHeapNode<C>>>,

    /// Amalgamation of,
    /// - The `HashMap<St, SearchTreeIndex>`, to find existing nodes from
    ///   their state.
    /// - The "Closed Set", as the `bool` in the value.
    ///
    /// A node's best-known g lives on its tree node and only ever decreases
    /// until the node is closed.
    node_map: FxHashMap<St, (SearchTreeIndex, bool)>,

    problem: P,

    _phantom_heuristic: PhantomData<H>,
    _phantom_space: PhantomData<Sp>,
    _phantom_action: PhantomData<A>,
}

impl<H, P, Sp, St, A, C> AStarSearch<H, P, Sp, St, A, C>
where
    H: Heuristic<P, Sp, St, A, C>,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    #[must_use]
    pub fn new(problem: P) -> Self {
        let start = problem.start();
        let h = H::h(&problem, &start);

        let mut search = Self {
            search_tree: SearchTree::new(),
            open: BinaryHeap::new(),
            node_map: FxHashMap::default(),

            problem,

            _phantom_heuristic: PhantomData,
            _phantom_space: PhantomData,
            _phantom_action: PhantomData,
        };

        search.push_new(&start, None, C::zero(), h);
        search
    }

    /// Runs the search until the goal is popped with its settled (optimal,
    /// for admissible heuristics) cost.
    ///
    /// Returns `None` when the open list is exhausted first.
    #[must_use]
    pub fn find_first(&mut self) -> Option<Path<St, A, C>> {
        while let Some(Reverse(heap_node)) = self.open.pop() {
            let node_index = heap_node.node_index;
            let state = *self.search_tree[node_index].state();

            if self.is_closed(&state) {
                // A stale entry: this node was re-reached more cheaply after
                // this entry was pushed, and the better entry already popped.
                // The `tentative_g < g` guard at push time makes skipping
                // here redundant work, never a correctness hazard.
                continue;
            }

            if self.problem.is_goal(&state) {
                log::debug!(
                    "Goal settled at g={} after discovering {} states",
                    self.search_tree[node_index].g(),
                    self.search_tree.len()
                );
                return Some(self.search_tree.path(self.problem.space(), node_index));
            }

            // Mark as closed
            self.mark_closed(&state);
            let g: C = self.search_tree[node_index].g();

            // Expand state
            for (s, a) in self.problem.space().neighbours(&state) {
                let c: C = self.problem.space().cost(&state, &a);
                let tentative_g = g.saturating_add(&c);

                // Have we seen this State?
                match self.node_map.get(&s) {
                    Some((_, true)) => {
                        // Yes, and we expanded it already.
                        continue;
                    }
                    Some(&(neigh_index, false)) => {
                        // Yes, but it's still open. Re-point it if this route
                        // is strictly cheaper.
                        if tentative_g < self.search_tree[neigh_index].g() {
                            self.search_tree[neigh_index].reach((node_index, a), tentative_g);
                            let h = H::h(&self.problem, &s);
                            self.open.push(Reverse(AStarHeapNode {
                                rank: AStarRank::new(tentative_g, h),
                                node_index: neigh_index,
                            }));
                        }
                    }
                    None => {
                        // No, let's create a new node for it.
                        let h = H::h(&self.problem, &s);
                        self.push_new(&s, Some((node_index, a)), tentative_g, h);
                    }
                }
            }
        }

        log::debug!(
            "Open list exhausted after discovering {} states; goal unreachable",
            self.search_tree.len()
        );
        None
    }

    /// States discovered so far.
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.search_tree.len()
    }

    #[inline(always)]
    #[must_use]
    fn is_closed(&self, s: &St) -> bool {
        match self.node_map.get(s) {
            Some((_index, is_closed)) => *is_closed,
            None => false,
        }
    }

    #[inline(always)]
    fn mark_closed(&mut self, s: &St) {
        match self.node_map.get_mut(s) {
            Some((_index, is_closed)) => {
                debug_assert!(!*is_closed);
                *is_closed = true;
            }
            None => {
                unreachable!("Tried closing a state without a node");
            }
        }
    }

    #[inline(always)]
    fn push_new(&mut self, s: &St, parent: Option<(SearchTreeIndex, A)>, g: C, h: C) {
        debug_assert!(!self.node_map.contains_key(s));

        let node_index = self.search_tree.push(SearchTreeNode::new(*s, parent, g));
        self.node_map.insert(*s, (node_index, false));
        self.open.push(Reverse(AStarHeapNode {
            rank: AStarRank::new(g, h),
            node_index,
        }));
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;
    use crate::problem::ZeroHeuristic;
    use crate::problems::maze_2d::Maze2DAction;
    use crate::problems::maze_2d::Maze2DCost;
    use crate::problems::maze_2d::Maze2DHeuristicManhattan;
    use crate::problems::maze_2d::Maze2DProblem;
    use crate::problems::maze_2d::Maze2DSpace;
    use crate::problems::maze_2d::Maze2DState;
    use crate::problems::weighted_graph::GraphCost;
    use crate::problems::weighted_graph::GraphHeuristicTable;
    use crate::problems::weighted_graph::GraphHop;
    use crate::problems::weighted_graph::NodeId;
    use crate::problems::weighted_graph::WeightedGraph;
    use crate::problems::weighted_graph::WeightedGraphProblem;

    type GraphAStar<H> =
        AStarSearch<H, WeightedGraphProblem, WeightedGraph, NodeId, GraphHop, GraphCost>;
    type MazeAStar<H> =
        AStarSearch<H, Maze2DProblem, Maze2DSpace, Maze2DState, Maze2DAction, Maze2DCost>;

    /// The 6-node showcase graph. Optimal route S A B C D G, cost 10.
    fn showcase_graph() -> WeightedGraphProblem {
        let mut graph = WeightedGraph::new();
        let s = graph.add_node("S").unwrap();
        let a = graph.add_node("A").unwrap();
        let b = graph.add_node("B").unwrap();
        let c = graph.add_node("C").unwrap();
        let d = graph.add_node("D").unwrap();
        let g = graph.add_node("G").unwrap();

        graph.add_edge(s, a, 1).unwrap();
        graph.add_edge(s, b, 4).unwrap();
        graph.add_edge(a, b, 2).unwrap();
        graph.add_edge(a, c, 5).unwrap();
        graph.add_edge(a, d, 12).unwrap();
        graph.add_edge(b, c, 2).unwrap();
        graph.add_edge(c, d, 3).unwrap();
        graph.add_edge(c, g, 7).unwrap();
        graph.add_edge(d, g, 2).unwrap();

        let heuristics = [("S", 7), ("A", 6), ("B", 4), ("C", 2), ("D", 1), ("G", 0)];
        WeightedGraphProblem::new(graph, &heuristics, "S", "G").unwrap()
    }

    /// Cheapest simple-path cost by exhaustive enumeration.
    fn brute_force_optimum(problem: &WeightedGraphProblem) -> Option<GraphCost> {
        fn go(
            space: &WeightedGraph,
            goal: NodeId,
            at: NodeId,
            seen: &mut Vec<NodeId>,
            g: GraphCost,
            best: &mut Option<GraphCost>,
        ) {
            if at == goal {
                *best = Some(best.map_or(g, |b: GraphCost| b.min(g)));
                return;
            }
            for (next, hop) in space.neighbours(&at) {
                if seen.contains(&next) {
                    continue;
                }
                seen.push(next);
                go(space, goal, next, seen, g + space.cost(&at, &hop), best);
                seen.pop();
            }
        }

        let mut best = None;
        let mut seen = vec![problem.start()];
        go(
            problem.space(),
            problem.goal(),
            problem.start(),
            &mut seen,
            0,
            &mut best,
        );
        best
    }

    #[test]
    fn ranking_prefers_f_then_h() {
        let g = 2u32;
        let h_low = 0u32;
        let h_high = 1u32;
        assert!(AStarRank::new(g, h_low) < AStarRank::new(g, h_high));
        assert!(AStarRank::new(g, h_high) == AStarRank::new(g, h_high));
        assert!(AStarRank::new(g, h_high) > AStarRank::new(g, h_low));

        // Same f-value, tie-broken on h
        let low = AStarRank::new(2u32, 0u32);
        let high = AStarRank::new(0u32, 2u32);
        assert!(low < high);
        assert!(low.f() == high.f());
    }

    #[test]
    fn solves_the_showcase_graph() {
        let problem = showcase_graph();
        let space = problem.space().clone();

        let mut search = GraphAStar::<GraphHeuristicTable>::new(problem);
        let path = search.find_first().expect("S reaches G");

        assert_eq!(path.cost, 10);
        assert!(space.valid_path(&path));

        // This fixture has a unique optimum, so the exact route is stable.
        let labels: Vec<&str> = path
            .states(&space)
            .iter()
            .map(|id| space.label(id))
            .collect();
        assert_eq!(labels, ["S", "A", "B", "C", "D", "G"]);
    }

    #[test]
    fn zero_heuristic_degenerates_to_dijkstra() {
        let problem = showcase_graph();
        let mut search = GraphAStar::<ZeroHeuristic>::new(problem);
        let path = search.find_first().expect("S reaches G");
        assert_eq!(path.cost, 10);
    }

    #[test]
    fn matches_exhaustive_search() {
        let problem = showcase_graph();
        let expected = brute_force_optimum(&problem);
        assert_eq!(expected, Some(10));

        let mut search = GraphAStar::<GraphHeuristicTable>::new(showcase_graph());
        let path = search.find_first().unwrap();
        assert_eq!(Some(path.cost), expected);
    }

    #[test]
    fn reports_unreachable_goals() {
        let mut graph = WeightedGraph::new();
        let s = graph.add_node("S").unwrap();
        let a = graph.add_node("A").unwrap();
        let _island = graph.add_node("Z").unwrap();
        graph.add_edge(s, a, 3).unwrap();

        let problem =
            WeightedGraphProblem::new(graph, &[("S", 1), ("A", 1), ("Z", 0)], "S", "Z").unwrap();
        let mut search = GraphAStar::<GraphHeuristicTable>::new(problem);
        assert_eq!(search.find_first(), None);
    }

    #[test]
    fn reroutes_open_nodes_through_cheaper_parents() {
        // B is first reached from S at g=4, then improved through A at g=3.
        // The settled route must use the improved parent.
        let problem = showcase_graph();
        let space = problem.space().clone();

        let mut search = GraphAStar::<GraphHeuristicTable>::new(problem);
        let path = search.find_first().unwrap();
        let labels: Vec<&str> = path
            .states(&space)
            .iter()
            .map(|id| space.label(id))
            .collect();
        assert!(labels.windows(2).any(|w| w == ["A", "B"]));
    }

    #[test]
    fn manhattan_astar_matches_bfs_distance_on_mazes() {
        let problem = Maze2DProblem::try_from(indoc! {"
            S..#...
            .#.#.#.
            .#.....
            ..###..
            .#...#.
            .###.#.
            ......E
        "})
        .unwrap();
        let space = problem.space().clone();

        let mut search = MazeAStar::<Maze2DHeuristicManhattan>::new(problem);
        let path = search.find_first().expect("the showcase maze is solvable");
        assert_eq!(path.cost, 12);
        assert!(space.valid_path(&path));

        // Dijkstra ordering agrees.
        let problem = Maze2DProblem::try_from(indoc! {"
            S..#...
            .#.#.#.
            .#.....
            ..###..
            .#...#.
            .###.#.
            ......E
        "})
        .unwrap();
        let mut search = MazeAStar::<ZeroHeuristic>::new(problem);
        assert_eq!(search.find_first().unwrap().cost, 12);
    }
}
