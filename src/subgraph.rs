/*!
# Optimal Subgraph

[`OptimalSubgraph`] is the working set that an [`crate::idp`] iteration reads
and writes: while `is_initial` is set, edge lookups pass straight through to
the underlying [`LazyGraph`]; once an iteration has pruned the graph down to
the provably-optimal edges for every coordinate processed so far,
[`OptimalSubgraph::not_initial`] switches lookups over to the pruned
`optimal_next`/`optimal_prev` maps instead — later coordinates only ever see
the surviving subgraph, not the full lazy expansion.

`temp_next`/`temp_prev` hold edges a single coordinate's forward/backward
Dijkstra pass is still propagating along; they are cleared at the start of
every coordinate. `next_weight`/`prev_weight` hold that coordinate's
tentative distances, represented as [`PartialCost`] since a Dijkstra pass
only ever produces a single-coordinate result.
*/

use std::collections::HashMap;

use crate::arena::{CostArena, PartialCost};
use crate::graph::{Edge, LazyGraph};

/// The live working set for one run of [`crate::idp::optimal_subgraph`].
///
/// Borrows the underlying [`LazyGraph`] rather than owning it: the graph's
/// node/edge expansion cache is expensive to rebuild and is meant to
/// outlive any one `start`/`end` query, so a [`crate::pathfinder::PathFinder`]
/// holds one `LazyGraph` across many queries, each building a fresh
/// `OptimalSubgraph` borrow over it.
pub struct OptimalSubgraph<'g, S, T> {
    is_initial: bool,
    graph: &'g mut LazyGraph<S, T>,

    optimal_edges: Vec<Edge>,
    optimal_next: HashMap<u32, Vec<Edge>>,
    optimal_prev: HashMap<u32, Vec<Edge>>,

    temp_next: HashMap<u32, Vec<Edge>>,
    temp_prev: HashMap<u32, Vec<Edge>>,

    next_weight: HashMap<u32, PartialCost<T>>,
    prev_weight: HashMap<u32, PartialCost<T>>,
}

impl<'g, S, T: Clone> OptimalSubgraph<'g, S, T> {
    /// Wraps a persistent [`LazyGraph`]. Starts in "initial" mode: every
    /// edge lookup is a pass-through to the lazy graph until the first
    /// coordinate's optimal edges are committed and [`Self::not_initial`] is
    /// called.
    pub fn new(graph: &'g mut LazyGraph<S, T>) -> Self {
        Self {
            is_initial: true,
            graph,
            optimal_edges: Vec::new(),
            optimal_next: HashMap::new(),
            optimal_prev: HashMap::new(),
            temp_next: HashMap::new(),
            temp_prev: HashMap::new(),
            next_weight: HashMap::new(),
            prev_weight: HashMap::new(),
        }
    }

    /// The arena backing this subgraph's edge and weight costs.
    pub fn arena(&self) -> &CostArena<T> {
        self.graph.arena()
    }

    /// The underlying graph's node-count sizing hint, for Dijkstra passes
    /// that want to pre-reserve heap space.
    pub fn capacity_hint(&self) -> usize {
        self.graph.capacity_hint()
    }

    /// Edges confirmed optimal across every coordinate processed so far.
    pub fn optimal_edges(&self) -> &[Edge] {
        &self.optimal_edges
    }

    /// Confirmed-optimal outgoing edges of `id`. Does not trigger expansion.
    pub fn optimal_next_edges(&self, id: u32) -> &[Edge] {
        self.optimal_next.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Confirmed-optimal incoming edges of `id`. Does not trigger expansion.
    pub fn optimal_prev_edges(&self, id: u32) -> &[Edge] {
        self.optimal_prev.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Outgoing edges usable for coordinate `i`'s forward Dijkstra pass:
    /// the full lazy graph while `is_initial`, or the pruned optimal set
    /// from the previous coordinate otherwise.
    pub fn get_next_edges(&mut self, id: u32, i: usize) -> &[Edge] {
        if self.is_initial {
            self.graph.get_next_edges(id, i)
        } else {
            self.graph.compute_edges_at(id, i);
            self.optimal_next.get(&id).map(Vec::as_slice).unwrap_or(&[])
        }
    }

    /// Incoming edges usable for coordinate `i`'s backward Dijkstra pass.
    /// Assumes coordinate `i` was already computed via [`Self::get_next_edges`]
    /// on the edge's source this round.
    pub fn get_prev_edges(&self, id: u32, _i: usize) -> &[Edge] {
        if self.is_initial {
            self.graph.get_prev_edges(id)
        } else {
            self.optimal_prev.get(&id).map(Vec::as_slice).unwrap_or(&[])
        }
    }

    /// The cost handle named by `edge`, from the underlying graph's arena.
    pub fn edge_cost(&self, edge: Edge) -> &crate::arena::CostHandle<T> {
        self.graph.edge_cost(edge)
    }

    /// The domain state registered under `id`, if any.
    pub fn state(&self, id: u32) -> Option<&S> {
        self.graph.state(id)
    }

    /// Registers `state` with the underlying lazy graph; see
    /// [`LazyGraph::seed`].
    pub fn seed(&mut self, state: S) -> u32
    where
        S: crate::graph::DomainState,
    {
        self.graph.seed(state)
    }

    pub fn add_temp_next_edge(&mut self, edge: Edge) {
        self.temp_next.entry(edge.from_id).or_insert_with(Vec::new).push(edge);
    }

    pub fn add_temp_prev_edge(&mut self, edge: Edge) {
        self.temp_prev.entry(edge.to_id).or_insert_with(Vec::new).push(edge);
    }

    pub fn temp_next_edges(&self) -> &HashMap<u32, Vec<Edge>> {
        &self.temp_next
    }

    pub fn temp_prev_edges(&self) -> &HashMap<u32, Vec<Edge>> {
        &self.temp_prev
    }

    /// Commits `edge` as optimal: it becomes visible in both
    /// [`Self::optimal_next_edges`] and [`Self::optimal_prev_edges`].
    pub fn add_optimal_edge(&mut self, edge: Edge) {
        self.optimal_next.entry(edge.from_id).or_insert_with(Vec::new).push(edge);
        self.optimal_prev.entry(edge.to_id).or_insert_with(Vec::new).push(edge);
        self.optimal_edges.push(edge);
    }

    pub fn set_next_weight(&mut self, id: u32, cost: PartialCost<T>) {
        self.next_weight.insert(id, cost);
    }

    pub fn set_prev_weight(&mut self, id: u32, cost: PartialCost<T>) {
        self.prev_weight.insert(id, cost);
    }

    pub fn get_next_weight(&self, id: u32) -> Option<&PartialCost<T>> {
        self.next_weight.get(&id)
    }

    pub fn get_prev_weight(&self, id: u32) -> Option<&PartialCost<T>> {
        self.prev_weight.get(&id)
    }

    pub fn is_next_weight_inf(&self, id: u32) -> bool {
        !self.next_weight.contains_key(&id)
    }

    pub fn is_prev_weight_inf(&self, id: u32) -> bool {
        !self.prev_weight.contains_key(&id)
    }

    /// Whether any edge has been committed optimal yet.
    pub fn is_graph_exists(&self) -> bool {
        !self.optimal_next.is_empty()
    }

    /// Switches edge lookups from the lazy graph pass-through over to the
    /// pruned `optimal_next`/`optimal_prev` maps. One-way: a coordinate's
    /// pruning result becomes the substrate for every later coordinate.
    pub fn not_initial(&mut self) {
        self.is_initial = false;
    }

    pub fn clear_optimal_edges(&mut self) {
        self.optimal_next.clear();
        self.optimal_prev.clear();
        self.optimal_edges.clear();
    }

    pub fn clear_propagation_edges(&mut self) {
        self.temp_next.clear();
        self.temp_prev.clear();
    }

    pub fn clear_weights(&mut self) {
        self.next_weight.clear();
        self.prev_weight.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DomainState;
    use crate::monoid::MonoidVectorProps;
    use std::cmp::Ordering;

    #[derive(Clone, PartialEq, Debug)]
    struct Line {
        id: u32,
        max: u32,
    }

    impl DomainState for Line {
        fn unique_id(&self) -> u32 {
            self.id
        }

        fn successors(&self) -> Vec<Self> {
            if self.id + 1 < self.max {
                vec![Line { id: self.id + 1, max: self.max }]
            } else {
                Vec::new()
            }
        }
    }

    fn line_graph(max: u32) -> LazyGraph<Line, i64> {
        let props = MonoidVectorProps::new(
            vec![0],
            vec![Box::new(|a: &i64, b: &i64| a.cmp(b)) as Box<dyn Fn(&i64, &i64) -> Ordering>],
            vec![Box::new(|a: &i64, b: &i64| a + b) as Box<dyn Fn(&i64, &i64) -> i64>],
        );
        let arena = CostArena::new(props);
        let computes: Vec<Box<dyn Fn(&Line, &Line) -> i64>> = vec![Box::new(|_: &Line, _: &Line| 1)];
        let mut graph = LazyGraph::new(arena, computes);
        graph.seed(Line { id: 0, max });
        graph
    }

    #[test]
    fn test_initial_mode_passes_through_to_lazy_graph() {
        let mut graph = line_graph(3);
        let mut sub = OptimalSubgraph::new(&mut graph);
        let edges = sub.get_next_edges(0, 0).to_vec();
        assert_eq!(edges.len(), 1);
    }

    #[test]
    fn test_not_initial_switches_to_optimal_maps() {
        let mut graph = line_graph(3);
        let mut sub = OptimalSubgraph::new(&mut graph);
        let edge = sub.get_next_edges(0, 0)[0];
        sub.add_optimal_edge(edge);
        sub.not_initial();
        assert_eq!(sub.get_next_edges(0, 0), &[edge]);
        assert_eq!(sub.optimal_prev_edges(1), &[edge]);
    }

    #[test]
    fn test_weight_inf_until_set() {
        let mut graph = line_graph(3);
        let sub = OptimalSubgraph::new(&mut graph);
        assert!(sub.is_next_weight_inf(0));
    }

    #[test]
    fn test_clear_methods_empty_their_maps() {
        let mut graph = line_graph(3);
        let mut sub = OptimalSubgraph::new(&mut graph);
        let edge = sub.get_next_edges(0, 0)[0];
        sub.add_optimal_edge(edge);
        sub.add_temp_next_edge(edge);
        sub.clear_optimal_edges();
        sub.clear_propagation_edges();
        assert!(sub.optimal_edges().is_empty());
        assert!(sub.temp_next_edges().is_empty());
    }
}
