//! The shared uninformed-search core.
//!
//! Breadth-first and depth-first search are the same algorithm under
//! different frontier disciplines: pop a discovered state, goal-check it,
//! admit its undiscovered neighbours. [`BfsSearch`] and [`DfsSearch`] are
//! frontier instantiations of [`UninformedSearch`].

use std::marker::PhantomData;

use rustc_hash::FxHashMap;

use crate::frontier::FifoFrontier;
use crate::frontier::Frontier;
use crate::frontier::LifoFrontier;
use crate::problem::Problem;
use crate::search::SearchTree;
use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// Breadth-first search.
///
/// FIFO frontier; with unit edge costs the first time the goal is popped the
/// recorded path is a shortest path by edge count.
pub type BfsSearch<P, Sp, St, A, C> = UninformedSearch<FifoFrontier, P, Sp, St, A, C>;

/// Depth-first search.
///
/// LIFO frontier; finds *some* valid path if one exists. Path length is an
/// artifact of traversal order, not a shortest-path guarantee.
pub type DfsSearch<P, Sp, St, A, C> = UninformedSearch<LifoFrontier, P, Sp, St, A, C>;

#[derive(Debug)]
pub struct UninformedSearch<F, P, Sp, St, A, C>
where
    F: Frontier,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    search_tree: SearchTree<St, A, C>,

    /// Discovered-but-unexpanded node indices, ordered by the discipline.
    frontier: F,

    /// The visited set: a state is present from the moment it is discovered
    /// (admitted to the frontier), not when it is popped. This is what keeps
    /// a state from entering the frontier twice.
    node_map: FxHashMap<St, SearchTreeIndex>,

    problem: P,

    _phantom_space: PhantomData<Sp>,
    _phantom_action: PhantomData<A>,
}

impl<F, P, Sp, St, A, C> UninformedSearch<F, P, Sp, St, A, C>
where
    F: Frontier,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    #[must_use]
    pub fn new(problem: P) -> Self {
        let start = problem.start();

        let mut search = Self {
            search_tree: SearchTree::new(),
            frontier: F::default(),
            node_map: FxHashMap::default(),

            problem,

            _phantom_space: PhantomData,
            _phantom_action: PhantomData,
        };

        search.push_new(&start, None, C::zero());
        search
    }

    /// Runs the search to completion.
    ///
    /// Returns the discovered path from start to goal inclusive, or `None`
    /// when the frontier is exhausted with the goal never popped (the goal is
    /// unreachable).
    #[must_use]
    pub fn find_first(&mut self) -> Option<Path<St, A, C>> {
        while let Some(node_index) = self.frontier.pop() {
            let state = *self.search_tree[node_index].state();
            let g: C = self.search_tree[node_index].g();

            if self.problem.is_goal(&state) {
                log::debug!(
                    "Goal found after discovering {} states",
                    self.search_tree.len()
                );
                return Some(self.search_tree.path(self.problem.space(), node_index));
            }

            // Expand state
            for (s, a) in self.problem.space().neighbours(&state) {
                if self.node_map.contains_key(&s) {
                    // Already discovered, possibly already expanded.
                    continue;
                }

                let c: C = self.problem.space().cost(&state, &a);
                self.push_new(&s, Some((node_index, a)), g.saturating_add(&c));
            }
        }

        log::debug!(
            "Frontier exhausted after discovering {} states; goal unreachable",
            self.search_tree.len()
        );
        None
    }

    /// The backpointer map over every state discovered so far: state to the
    /// state it was reached from, with the start mapping to `None`.
    ///
    /// Secondary output for inspection and visualization; the path returned
    /// by [`UninformedSearch::find_first`] is already reconstructed from it.
    #[must_use]
    pub fn predecessors(&self) -> FxHashMap<St, Option<St>> {
        self.search_tree.predecessors()
    }

    /// States discovered so far.
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.search_tree.len()
    }

    #[inline(always)]
    fn push_new(&mut self, s: &St, parent: Option<(SearchTreeIndex, A)>, g: C) {
        debug_assert!(!self.node_map.contains_key(s));

        let node_index = self
            .search_tree
            .push(SearchTreeNode::new(*s, parent, g));
        self.node_map.insert(*s, node_index);
        self.frontier.push(node_index);
    }
}
