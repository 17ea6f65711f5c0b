//! Small labelled graphs with explicit edge weights.
//!
//! Built for hand-drawn teaching examples: a handful of named nodes, directed
//! weighted edges, and a per-node heuristic table looked up by A*.

use derive_more::Display;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Space;
use crate::space::State;

pub type GraphCost = u32;

/// A dense node handle, valid only for the graph that issued it.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("#{_0}")]
pub struct NodeId(u32);

impl NodeId {
    #[inline(always)]
    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}
impl State for NodeId {}

/// Following an edge to an adjacent node.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
#[display("→{to}")]
pub struct GraphHop {
    pub to: NodeId,
}
impl Action for GraphHop {}

#[derive(Debug, Error)]
pub enum WeightedGraphError {
    #[error("Node '{0}' already exists")]
    DuplicateNode(String),
    #[error("Unknown node '{0}'")]
    UnknownNode(String),
    #[error("Node {0} does not belong to this graph")]
    ForeignNode(NodeId),
    #[error("Edge {0}-{1} already exists")]
    DuplicateEdge(NodeId, NodeId),
    #[error("Edge {0}-{1} has zero cost")]
    ZeroCostEdge(NodeId, NodeId),
    #[error("Self-loop on {0}")]
    SelfLoop(NodeId),
    #[error("No heuristic value given for node '{0}'")]
    MissingHeuristic(String),
    #[error("Heuristic for '{0}' given twice")]
    DuplicateHeuristic(String),
}

#[derive(Clone, Default)]
pub struct WeightedGraph {
    labels: Vec<String>,
    ids: FxHashMap<String, NodeId>,
    adjacency: Vec<Vec<(NodeId, GraphCost)>>,
}

impl WeightedGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, label: &str) -> Result<NodeId, WeightedGraphError> {
        if self.ids.contains_key(label) {
            return Err(WeightedGraphError::DuplicateNode(label.to_string()));
        }

        let id = NodeId(self.labels.len() as u32);
        self.labels.push(label.to_string());
        self.ids.insert(label.to_string(), id);
        self.adjacency.push(vec![]);
        Ok(id)
    }

    /// Adds a directed edge with a strictly positive cost.
    pub fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        cost: GraphCost,
    ) -> Result<(), WeightedGraphError> {
        for endpoint in [&from, &to] {
            if !self.valid(endpoint) {
                return Err(WeightedGraphError::ForeignNode(*endpoint));
            }
        }
        if from == to {
            return Err(WeightedGraphError::SelfLoop(from));
        }
        if cost == 0 {
            return Err(WeightedGraphError::ZeroCostEdge(from, to));
        }
        if self.edge_cost(&from, &to).is_some() {
            return Err(WeightedGraphError::DuplicateEdge(from, to));
        }

        self.adjacency[from.index()].push((to, cost));
        Ok(())
    }

    #[must_use]
    pub fn node(&self, label: &str) -> Option<NodeId> {
        self.ids.get(label).copied()
    }

    #[must_use]
    pub fn label(&self, id: &NodeId) -> &str {
        debug_assert!(self.valid(id));
        &self.labels[id.index()]
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Every node, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.labels.len()).map(|i| NodeId(i as u32))
    }

    /// Every edge, as `(from, to, cost)`.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, GraphCost)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, out)| {
            let from = NodeId(i as u32);
            out.iter().map(move |&(to, cost)| (from, to, cost))
        })
    }

    #[inline(always)]
    fn edge_cost(&self, from: &NodeId, to: &NodeId) -> Option<GraphCost> {
        self.adjacency[from.index()]
            .iter()
            .find(|(next, _)| next == to)
            .map(|&(_, cost)| cost)
    }
}

impl Space<NodeId, GraphHop, GraphCost> for WeightedGraph {
    fn apply(&self, s: &NodeId, a: &GraphHop) -> Option<NodeId> {
        self.edge_cost(s, &a.to).map(|_| a.to)
    }

    fn cost(&self, s: &NodeId, a: &GraphHop) -> GraphCost {
        match self.edge_cost(s, &a.to) {
            Some(cost) => cost,
            None => GraphCost::MAX,
        }
    }

    fn neighbours(&self, s: &NodeId) -> Vec<(NodeId, GraphHop)> {
        self.adjacency[s.index()]
            .iter()
            .map(|&(to, _)| (to, GraphHop { to }))
            .collect()
    }

    fn valid(&self, s: &NodeId) -> bool {
        s.index() < self.labels.len()
    }

    fn size(&self) -> Option<usize> {
        Some(self.labels.len())
    }
}

impl std::fmt::Debug for WeightedGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "WeightedGraph({} nodes, {} edges)",
            self.node_count(),
            self.edges().count()
        )
    }
}

impl std::fmt::Display for WeightedGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{self:?}:")?;
        for (from, to, cost) in self.edges() {
            writeln!(f, "  {} -{}- {}", self.label(&from), cost, self.label(&to))?;
        }
        Ok(())
    }
}

/// A search problem over a [`WeightedGraph`] with a complete per-node
/// heuristic table.
#[derive(Clone, Debug)]
pub struct WeightedGraphProblem {
    space: WeightedGraph,
    h: Vec<GraphCost>,
    start: NodeId,
    goal: NodeId,
}

impl WeightedGraphProblem {
    /// Builds a problem with endpoints and heuristics given by label.
    ///
    /// The table must cover every node exactly once; a missing entry would
    /// otherwise surface mid-search as a panic or a silent zero.
    pub fn new(
        space: WeightedGraph,
        heuristics: &[(&str, GraphCost)],
        start: &str,
        goal: &str,
    ) -> Result<Self, WeightedGraphError> {
        let mut h = vec![GraphCost::MAX; space.node_count()];
        for &(label, value) in heuristics {
            let id = space
                .node(label)
                .ok_or_else(|| WeightedGraphError::UnknownNode(label.to_string()))?;
            if h[id.index()] != GraphCost::MAX {
                return Err(WeightedGraphError::DuplicateHeuristic(label.to_string()));
            }
            h[id.index()] = value;
        }
        for (i, &value) in h.iter().enumerate() {
            if value == GraphCost::MAX {
                return Err(WeightedGraphError::MissingHeuristic(
                    space.labels[i].clone(),
                ));
            }
        }

        let start = space
            .node(start)
            .ok_or_else(|| WeightedGraphError::UnknownNode(start.to_string()))?;
        let goal = space
            .node(goal)
            .ok_or_else(|| WeightedGraphError::UnknownNode(goal.to_string()))?;

        Ok(Self {
            space,
            h,
            start,
            goal,
        })
    }

    #[must_use]
    pub fn h_value(&self, s: &NodeId) -> GraphCost {
        self.h[s.index()]
    }
}

impl Problem<WeightedGraph, NodeId, GraphHop, GraphCost> for WeightedGraphProblem {
    fn space(&self) -> &WeightedGraph {
        &self.space
    }
    fn start(&self) -> NodeId {
        self.start
    }
    fn goal(&self) -> NodeId {
        self.goal
    }
}

/// Table lookup against the problem's per-node estimates.
#[derive(Debug)]
pub struct GraphHeuristicTable;

impl Heuristic<WeightedGraphProblem, WeightedGraph, NodeId, GraphHop, GraphCost>
    for GraphHeuristicTable
{
    #[inline(always)]
    fn h(p: &WeightedGraphProblem, s: &NodeId) -> GraphCost {
        p.h_value(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (WeightedGraph, NodeId, NodeId, NodeId) {
        let mut graph = WeightedGraph::new();
        let a = graph.add_node("A").unwrap();
        let b = graph.add_node("B").unwrap();
        let c = graph.add_node("C").unwrap();
        graph.add_edge(a, b, 1).unwrap();
        graph.add_edge(b, c, 2).unwrap();
        (graph, a, b, c)
    }

    #[test]
    fn builder_rejects_bad_input() {
        let (mut graph, a, b, c) = triangle();

        assert!(matches!(
            graph.add_node("A"),
            Err(WeightedGraphError::DuplicateNode(_))
        ));
        assert!(matches!(
            graph.add_edge(a, b, 3),
            Err(WeightedGraphError::DuplicateEdge(..))
        ));
        assert!(matches!(
            graph.add_edge(a, c, 0),
            Err(WeightedGraphError::ZeroCostEdge(..))
        ));
        assert!(matches!(
            graph.add_edge(a, a, 1),
            Err(WeightedGraphError::SelfLoop(_))
        ));
    }

    #[test]
    fn hops_follow_edge_direction() {
        let (mut graph, a, b, c) = triangle();

        assert_eq!(graph.apply(&a, &GraphHop { to: b }), Some(b));
        // Edges are directed; the reverse hop needs its own edge.
        assert_eq!(graph.apply(&b, &GraphHop { to: a }), None);
        assert_eq!(graph.apply(&a, &GraphHop { to: c }), None);

        graph.add_edge(b, a, 3).unwrap();
        assert_eq!(graph.apply(&b, &GraphHop { to: a }), Some(a));

        assert_eq!(graph.cost(&b, &GraphHop { to: c }), 2);
        assert_eq!(
            graph.neighbours(&b),
            vec![(c, GraphHop { to: c }), (a, GraphHop { to: a })]
        );
    }

    #[test]
    fn labels_roundtrip() {
        let (graph, a, _b, _c) = triangle();
        assert_eq!(graph.node("A"), Some(a));
        assert_eq!(graph.label(&a), "A");
        assert_eq!(graph.node("Z"), None);
        assert_eq!(graph.edges().count(), 2);
    }

    #[test]
    fn problems_demand_a_complete_heuristic_table() {
        let (graph, ..) = triangle();

        assert!(matches!(
            WeightedGraphProblem::new(graph.clone(), &[("A", 1), ("B", 1)], "A", "C"),
            Err(WeightedGraphError::MissingHeuristic(n)) if n == "C"
        ));
        assert!(matches!(
            WeightedGraphProblem::new(
                graph.clone(),
                &[("A", 1), ("B", 1), ("B", 2), ("C", 0)],
                "A",
                "C"
            ),
            Err(WeightedGraphError::DuplicateHeuristic(n)) if n == "B"
        ));
        assert!(matches!(
            WeightedGraphProblem::new(graph.clone(), &[("A", 1), ("Z", 1)], "A", "C"),
            Err(WeightedGraphError::UnknownNode(n)) if n == "Z"
        ));
        assert!(matches!(
            WeightedGraphProblem::new(graph.clone(), &[("A", 1), ("B", 1), ("C", 0)], "A", "Z"),
            Err(WeightedGraphError::UnknownNode(n)) if n == "Z"
        ));

        let problem =
            WeightedGraphProblem::new(graph, &[("A", 3), ("B", 2), ("C", 0)], "A", "C").unwrap();
        assert_eq!(problem.h_value(&problem.start()), 3);
        assert_eq!(GraphHeuristicTable::h(&problem, &problem.goal()), 0);
    }
}
