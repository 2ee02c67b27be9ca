/*!
# PathFinder Façade

[`PathFinder`] is the public entry point: it wires a [`MonoidVectorProps`],
a [`CostArena`], and the caller's per-coordinate cost callbacks into a
[`LazyGraph`], then translates [`crate::idp`]'s handle-level results back
into domain states.

One `PathFinder` is a path-finding *session*: its `LazyGraph` persists
across calls to [`PathFinder::optimal_path`]/[`PathFinder::optimal_edges`],
so repeated queries over overlapping regions of the state space reuse
already-discovered nodes, edges, and computed costs. [`PathFinder::clear`]
drops that cache.
*/

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::arena::CostArena;
use crate::error::Error;
use crate::graph::DomainState;
use crate::graph::LazyGraph;
use crate::idp;
use crate::monoid::MonoidVectorProps;

/// Runs Iterated Dijkstra Propagation between pairs of domain states over a
/// lazily-expanded, multi-cost graph.
pub struct PathFinder<S, T> {
    graph: LazyGraph<S, T>,
}

impl<S: DomainState, T: Clone> PathFinder<S, T> {
    /// Builds a façade from a `k`-coordinate monoid vector configuration and
    /// per-coordinate edge-cost callbacks. `identity`, `compares`,
    /// `combines` and `computes` must all have the same length `k >= 1`.
    pub fn new(
        identity: Vec<T>,
        compares: Vec<Box<dyn Fn(&T, &T) -> Ordering>>,
        combines: Vec<Box<dyn Fn(&T, &T) -> T>>,
        computes: Vec<Box<dyn Fn(&S, &S) -> T>>,
    ) -> Result<Self, Error> {
        Self::with_capacity(identity, compares, combines, computes, 0)
    }

    /// Like [`PathFinder::new`], but pre-reserves `capacity` cost-arena
    /// slots up front rather than growing the arena incrementally.
    pub fn with_capacity(
        identity: Vec<T>,
        compares: Vec<Box<dyn Fn(&T, &T) -> Ordering>>,
        combines: Vec<Box<dyn Fn(&T, &T) -> T>>,
        computes: Vec<Box<dyn Fn(&S, &S) -> T>>,
        capacity: usize,
    ) -> Result<Self, Error> {
        if identity.is_empty() {
            return Err(Error::EmptyCostVector);
        }
        let props = MonoidVectorProps::new(identity, compares, combines);
        let arena = CostArena::with_capacity(props, capacity);
        let graph = LazyGraph::with_capacity(arena, computes, capacity);
        Ok(Self { graph })
    }

    /// Runs IDP between `start` and `end`, then walks `optimal_prev` back
    /// from `end` to `start` by BFS, returning the domain-state sequence
    /// from `start` to `end` inclusive. Empty if `end` is unreachable from
    /// `start`. If `start` and `end` have the same `unique_id`, returns the
    /// single-element path `[start]` without running IDP.
    pub fn optimal_path(&mut self, start: S, end: S) -> Vec<S> {
        let start_id = self.graph.seed(start.clone());
        let end_id = self.graph.seed(end.clone());
        if start_id == end_id {
            return vec![start];
        }

        let sub = idp::optimal_subgraph(&mut self.graph, start_id, end_id);
        if !sub.is_graph_exists() {
            return Vec::new();
        }

        let mut parent: HashMap<u32, u32> = HashMap::new();
        let mut queue: VecDeque<u32> = VecDeque::new();
        let mut closed: HashSet<u32> = HashSet::new();
        queue.push_back(end_id);
        closed.insert(end_id);

        let mut start_found = false;
        'bfs: while let Some(current) = queue.pop_front() {
            for edge in sub.optimal_prev_edges(current) {
                if closed.insert(edge.from_id) {
                    queue.push_back(edge.from_id);
                }
                parent.insert(edge.from_id, current);
                if edge.from_id == start_id {
                    start_found = true;
                    break 'bfs;
                }
            }
        }

        if !start_found {
            return Vec::new();
        }

        let mut path_ids = vec![start_id];
        let mut next = parent[&start_id];
        while next != end_id {
            path_ids.push(next);
            next = parent[&next];
        }
        path_ids.push(end_id);

        path_ids
            .into_iter()
            .map(|id| sub.state(id).cloned().expect("BFS only visits registered node ids"))
            .collect()
    }

    /// Runs IDP between `start` and `end`, returning every surviving edge
    /// as an interleaved `[from, to, from, to, …]` sequence of domain
    /// states. Empty if unreachable.
    pub fn optimal_edges(&mut self, start: S, end: S) -> Vec<S> {
        let start_id = self.graph.seed(start);
        let end_id = self.graph.seed(end);

        let sub = idp::optimal_subgraph(&mut self.graph, start_id, end_id);

        let mut out = Vec::with_capacity(sub.optimal_edges().len() * 2);
        for edge in sub.optimal_edges() {
            out.push(sub.state(edge.from_id).cloned().expect("edge endpoints are registered nodes"));
            out.push(sub.state(edge.to_id).cloned().expect("edge endpoints are registered nodes"));
        }
        out
    }

    /// Drops the graph's node/edge/cost cache, releasing every cost handle.
    pub fn clear(&mut self) {
        self.graph.clear();
    }
}
