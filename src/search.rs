use nonmax::NonMaxUsize;
use rustc_hash::FxHashMap;

use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// A reference to a `SearchTreeNode<St, A, C>`.
///
/// `NonMaxUsize` keeps `Option<(SearchTreeIndex, A)>` niche-packed, so a
/// parent link costs no more than a raw index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchTreeIndex {
    index: NonMaxUsize,
}

impl SearchTreeIndex {
    #[inline(always)]
    fn new(index: usize) -> Self {
        Self {
            index: NonMaxUsize::new(index).unwrap(),
        }
    }

    #[inline(always)]
    pub fn get(&self) -> usize {
        self.index.get()
    }
}

#[derive(Debug, Clone)]
pub struct SearchTreeNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub(crate) parent: Option<(SearchTreeIndex, A)>,
    pub(crate) state: St,
    pub(crate) g: C,
}

impl<St, A, C> SearchTreeNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub fn new(s: St, parent: Option<(SearchTreeIndex, A)>, g: C) -> Self {
        Self {
            parent,
            state: s,
            g,
        }
    }

    /// Gives this Node a better path through a new parent.
    pub fn reach(&mut self, new_parent: (SearchTreeIndex, A), g: C) {
        debug_assert!(g < self.g);
        self.parent = Some(new_parent);
        self.g = g;
    }

    pub(crate) fn state(&self) -> &St {
        &self.state
    }
    pub(crate) fn g(&self) -> C {
        self.g
    }
}

/// The Search Tree; every discovered state gets a node pointing at the node
/// it was first (or, for A*, most cheaply) reached from.
///
/// The start node's parent is `None`. Parent links always form a tree rooted
/// there, which is what makes walking backpointers terminate.
pub struct SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    nodes: Vec<SearchTreeNode<St, A, C>>,
}

impl<St, A, C> SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    #[inline(always)]
    pub(crate) fn push(&mut self, node: SearchTreeNode<St, A, C>) -> SearchTreeIndex {
        let index = SearchTreeIndex::new(self.nodes.len());
        self.nodes.push(node);
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Reconstructs the path ending at `node_index` by walking backpointers
    /// up to the root and reversing.
    #[must_use]
    pub fn path<Sp: Space<St, A, C>>(
        &self,
        space: &Sp,
        mut node_index: SearchTreeIndex,
    ) -> Path<St, A, C> {
        self.verify();

        let e = &self[node_index];
        let mut path = Path::<St, A, C>::new_from_start(*e.state());

        while let Some((parent_index, a)) = self[node_index].parent {
            let p = &self[parent_index];
            let s = p.state();
            let c: C = space.cost(s, &a);
            debug_assert!(c != C::zero());

            path.append((*s, a), c);
            debug_assert!(node_index != parent_index);
            node_index = parent_index;
        }

        path.reverse();
        path
    }

    /// Exports the backpointer map: every discovered state mapped to the
    /// state it was reached from. The root maps to `None`.
    #[must_use]
    pub fn predecessors(&self) -> FxHashMap<St, Option<St>> {
        let mut map = FxHashMap::default();
        map.reserve(self.nodes.len());
        for node in &self.nodes {
            let parent = node.parent.map(|(i, _a)| *self[i].state());
            map.insert(*node.state(), parent);
        }
        map
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify(&self) {
        // All good... (hopefully)
    }
    /// Every parent chain must terminate at a root within `len()` hops.
    #[cfg(feature = "verify")]
    pub(crate) fn verify(&self) {
        for (i, node) in self.nodes.iter().enumerate() {
            let mut hops = 0usize;
            let mut current = node.parent;
            while let Some((p, _a)) = current {
                debug_assert!(p.get() != i, "Node {i} is its own ancestor");
                hops += 1;
                debug_assert!(
                    hops <= self.nodes.len(),
                    "Parent chain of node {i} does not terminate"
                );
                current = self[p].parent;
            }
        }
    }
}

impl<St, A, C> Default for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A, C> std::ops::Index<SearchTreeIndex> for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    type Output = SearchTreeNode<St, A, C>;

    #[inline(always)]
    fn index(&self, index: SearchTreeIndex) -> &Self::Output {
        &self.nodes[index.get()]
    }
}

impl<St, A, C> std::ops::IndexMut<SearchTreeIndex> for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn index_mut(&mut self, index: SearchTreeIndex) -> &mut SearchTreeNode<St, A, C> {
        &mut self.nodes[index.get()]
    }
}

impl<St, A, C> std::fmt::Debug for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}
