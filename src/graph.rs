/*!
# Lazy Multi-Cost Graph

[`LazyGraph`] never materialises the whole state space up front. A caller
supplies a `start` state and a [`DomainState`] impl describing how to expand
a state into its successors; edges and their per-coordinate costs are
discovered and cached the first time something asks for them.

Edge costs are computed one coordinate at a time, not all `k` at once: an
iteration of [`crate::idp`] that only needs coordinate `i` this round should
not pay to compute coordinates `i+1..k` it may never touch. A `computed_mask`
bit per edge per coordinate tracks what has been filled in so far.
*/

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::arena::{CostArena, CostHandle};
use crate::error::Error;

/// A node in the domain state space. `unique_id` must be injective: two
/// states that compare unequal must never return the same id, and two
/// states that compare equal must return the same id.
pub trait DomainState: Clone + PartialEq {
    /// Stable identifier for this state, used as the graph node id.
    fn unique_id(&self) -> u32;

    /// States reachable by one edge from this state.
    fn successors(&self) -> Vec<Self>
    where
        Self: Sized;
}

/// A directed edge `from_id -> to_id`. Lightweight and `Copy`; the cost
/// vector it names lives in the owning [`LazyGraph`]'s arena, indexed by
/// `edge_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from_id: u32,
    pub to_id: u32,
    edge_id: u32,
}

/// A lazily-expanded graph over `S`, with edge costs computed coordinate by
/// coordinate via `computes[i](from, to)`.
pub struct LazyGraph<S, T> {
    arena: CostArena<T>,
    computes: Vec<Box<dyn Fn(&S, &S) -> T>>,
    nodes: HashMap<u32, S>,
    next_edges: HashMap<u32, Vec<Edge>>,
    prev_edges: HashMap<u32, Vec<Edge>>,
    edge_costs: Vec<CostHandle<T>>,
    edge_endpoints: Vec<(u32, u32)>,
    computed_mask: Vec<u64>,
    identity: CostHandle<T>,
    capacity_hint: usize,
}

impl<S: DomainState, T: Clone> LazyGraph<S, T> {
    /// Builds an empty graph. `computes[i]` computes coordinate `i` of an
    /// edge's cost from its endpoint states; `computes.len()` must equal
    /// `arena`'s monoid arity, and be no more than 64 (the `computed_mask`
    /// bitmap is a `u64`).
    pub fn new(arena: CostArena<T>, computes: Vec<Box<dyn Fn(&S, &S) -> T>>) -> Self {
        Self::with_capacity(arena, computes, 0)
    }

    /// Like [`LazyGraph::new`], but remembers `capacity` as a sizing hint for
    /// callers (e.g. [`crate::idp`]'s Dijkstra heaps) that want to
    /// pre-reserve space proportional to the expected node count.
    pub fn with_capacity(
        arena: CostArena<T>,
        computes: Vec<Box<dyn Fn(&S, &S) -> T>>,
        capacity: usize,
    ) -> Self {
        let arity = computes.len();
        debug_assert!(arity >= 1, "{}", Error::EmptyCostVector);
        debug_assert!(arity <= 64, "LazyGraph supports at most 64 cost coordinates");
        debug_assert_eq!(arity, arena.num_monoids(), "computes.len() must match the arena's arity");
        let identity = arena.identity();
        Self {
            arena,
            computes,
            nodes: HashMap::with_capacity(capacity),
            next_edges: HashMap::new(),
            prev_edges: HashMap::new(),
            edge_costs: Vec::new(),
            edge_endpoints: Vec::new(),
            computed_mask: Vec::new(),
            identity,
            capacity_hint: capacity,
        }
    }

    /// Number of cost coordinates `k`.
    pub fn arity(&self) -> usize {
        self.computes.len()
    }

    /// The sizing hint passed to [`LazyGraph::with_capacity`], `0` if built
    /// via [`LazyGraph::new`].
    pub fn capacity_hint(&self) -> usize {
        self.capacity_hint
    }

    /// Registers `state` as a node if its id is new, and returns its id. If
    /// the id already names a node, asserts (debug builds only) that the
    /// existing state is equal to `state` — a mismatch is a caller-side
    /// `unique_id` collision.
    pub fn seed(&mut self, state: S) -> u32 {
        self.ensure_node(state)
    }

    /// The domain state registered under `id`, if any.
    pub fn state(&self, id: u32) -> Option<&S> {
        self.nodes.get(&id)
    }

    /// The cost handle named by `edge`.
    pub fn edge_cost(&self, edge: Edge) -> &CostHandle<T> {
        &self.edge_costs[edge.edge_id as usize]
    }

    /// The arena backing this graph's edge costs, for callers (e.g.
    /// [`crate::idp`]) that need to compare or combine handles directly.
    pub fn arena(&self) -> &CostArena<T> {
        &self.arena
    }

    /// Outgoing edges from `id`, with coordinate `i` guaranteed filled in.
    /// Expands `id` via [`DomainState::successors`] on first access.
    pub fn get_next_edges(&mut self, id: u32, i: usize) -> &[Edge] {
        debug_assert!(i < self.computes.len());
        if !self.next_edges.contains_key(&id) {
            self.expand(id, i);
        } else {
            self.compute_edges_at(id, i);
        }
        self.next_edges.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Incoming edges to `id` discovered so far. Never triggers expansion:
    /// an id with no known predecessors simply returns an empty slice, which
    /// is indistinguishable here from "not reachable yet" — callers that
    /// care about the difference track reachability themselves.
    pub fn get_prev_edges(&self, id: u32) -> &[Edge] {
        self.prev_edges.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ensures every already-known outgoing edge of `id` has coordinate `i`
    /// computed. A no-op if `id` has not been expanded yet.
    pub fn compute_edges_at(&mut self, id: u32, i: usize) {
        let bit = 1u64 << i;
        let edge_ids: Vec<u32> = match self.next_edges.get(&id) {
            Some(edges) => edges.iter().map(|e| e.edge_id).collect(),
            None => return,
        };
        for edge_id in edge_ids {
            if self.computed_mask[edge_id as usize] & bit != 0 {
                continue;
            }
            let (from_id, to_id) = self.edge_endpoints[edge_id as usize];
            self.fill_coordinate(edge_id, from_id, to_id, i);
        }
    }

    /// Total number of distinct edges discovered so far.
    pub fn edge_count(&self) -> usize {
        self.edge_costs.len()
    }

    /// Total number of distinct nodes discovered so far.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Drops every node, edge and cached cost, releasing their arena slots.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.next_edges.clear();
        self.prev_edges.clear();
        self.edge_costs.clear();
        self.edge_endpoints.clear();
        self.computed_mask.clear();
    }

    fn expand(&mut self, id: u32, i: usize) {
        let state = self.nodes[&id].clone();
        self.next_edges.entry(id).or_insert_with(Vec::new);
        for succ in state.successors() {
            let to_id = self.ensure_node(succ);
            let edge_cost = self.arena.identity();
            self.edge_costs.push(edge_cost);
            self.edge_endpoints.push((id, to_id));
            self.computed_mask.push(0);
            let edge_id = (self.edge_costs.len() - 1) as u32;
            self.fill_coordinate(edge_id, id, to_id, i);
            let edge = Edge { from_id: id, to_id, edge_id };
            self.next_edges.get_mut(&id).unwrap().push(edge);
            self.prev_edges.entry(to_id).or_insert_with(Vec::new).push(edge);
        }
    }

    fn fill_coordinate(&mut self, edge_id: u32, from_id: u32, to_id: u32, i: usize) {
        let from_state = self.nodes[&from_id].clone();
        let to_state = self.nodes[&to_id].clone();
        let value = (self.computes[i])(&from_state, &to_state);
        let handle = &self.edge_costs[edge_id as usize];
        self.arena.set_at(handle, i, value);
        debug_assert!(
            self.arena.compare_at(handle, &self.identity, i) != Ordering::Less,
            "edge cost computed negative at coordinate {}",
            i
        );
        self.computed_mask[edge_id as usize] |= 1u64 << i;
    }

    fn ensure_node(&mut self, state: S) -> u32 {
        let id = state.unique_id();
        match self.nodes.get(&id) {
            Some(existing) => {
                debug_assert!(*existing == state, "{}", Error::DuplicateNodeId(id));
            }
            None => {
                self.nodes.insert(id, state);
            }
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monoid::MonoidVectorProps;

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

    fn int_arena(k: usize) -> CostArena<i64> {
        CostArena::new(MonoidVectorProps::new(
            vec![0; k],
            (0..k)
                .map(|_| Box::new(|a: &i64, b: &i64| a.cmp(b)) as Box<dyn Fn(&i64, &i64) -> Ordering>)
                .collect(),
            (0..k)
                .map(|_| Box::new(|a: &i64, b: &i64| a + b) as Box<dyn Fn(&i64, &i64) -> i64>)
                .collect(),
        ))
    }

    fn line_graph(max: u32) -> LazyGraph<Line, i64> {
        let computes: Vec<Box<dyn Fn(&Line, &Line) -> i64>> = vec![
            Box::new(|_from: &Line, _to: &Line| 1),
            Box::new(|from: &Line, to: &Line| (to.id as i64) - (from.id as i64)),
        ];
        let mut graph = LazyGraph::new(int_arena(2), computes);
        graph.seed(Line { id: 0, max });
        graph
    }

    #[test]
    fn test_expand_on_first_access_creates_successor_edges() {
        let mut graph = line_graph(3);
        let edges = graph.get_next_edges(0, 0).to_vec();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from_id, 0);
        assert_eq!(edges[0].to_id, 1);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn test_terminal_node_has_no_successors() {
        let mut graph = line_graph(1);
        let edges = graph.get_next_edges(0, 0);
        assert!(edges.is_empty());
    }

    #[test]
    fn test_second_coordinate_is_filled_lazily() {
        let mut graph = line_graph(3);
        let edge = graph.get_next_edges(0, 0)[0];
        let zero = graph.arena().identity();
        assert_ne!(graph.arena().compare_at(graph.edge_cost(edge), &zero, 0), Ordering::Equal);
        assert_eq!(graph.arena().compare_at(graph.edge_cost(edge), &zero, 1), Ordering::Equal);
        graph.get_next_edges(0, 1);
        assert_ne!(graph.arena().compare_at(graph.edge_cost(edge), &zero, 1), Ordering::Equal);
    }

    #[test]
    fn test_prev_edges_populated_by_expansion() {
        let mut graph = line_graph(3);
        graph.get_next_edges(0, 0);
        let prev = graph.get_prev_edges(1);
        assert_eq!(prev.len(), 1);
        assert_eq!(prev[0].from_id, 0);
    }

    #[test]
    fn test_reseeding_same_id_with_equal_state_is_fine() {
        let mut graph = line_graph(3);
        graph.get_next_edges(0, 0);
        let id = graph.seed(Line { id: 1, max: 3 });
        assert_eq!(id, 1);
    }
}
