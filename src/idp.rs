/*!
# Iterated Dijkstra Propagation

The core search: one coordinate at a time, run a forward and a backward
Dijkstra from `start` and `end` respectively, then BFS out from `start`
along edges that lie on *some* shortest path for that coordinate, pruning
everything else away. The surviving subgraph becomes the substrate for the
next coordinate — so the second coordinate only ever breaks ties among
paths that were already optimal for the first, and so on lexicographically
through every coordinate.

Early exit: if `end` is unreached by the forward pass, or `start` by the
backward pass, there is no path at all and the remaining coordinates are
skipped.
*/

use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::arena::PartialCost;
use crate::graph::LazyGraph;
use crate::heap::IndexedHeap;
use crate::subgraph::OptimalSubgraph;

/// Runs a forward Dijkstra from `source` over coordinate `i`, recording
/// every edge relaxed onto the frontier as a temporary propagation edge and
/// every settled node's distance as its next-weight.
pub fn forward_dijkstra<S, T: Clone>(sub: &mut OptimalSubgraph<'_, S, T>, source: u32, i: usize) {
    let arena = sub.arena().clone();
    let cmp_arena = arena.clone();
    let mut heap: IndexedHeap<PartialCost<T>, _> = IndexedHeap::with_capacity(
        move |a: &PartialCost<T>, b: &PartialCost<T>| !matches!(cmp_arena.compare_at(a, b, i), Ordering::Less),
        sub.capacity_hint(),
    );

    heap.push(arena.identity_at(i), source);
    let mut closed: HashSet<u32> = HashSet::new();

    while let Some((cost, id)) = heap.pop() {
        closed.insert(id);
        trace!(node = id, coordinate = i, "forward dijkstra settled node");
        let edges = sub.get_next_edges(id, i).to_vec();

        for edge in edges {
            let edge_cost = sub.edge_cost(edge);
            if !closed.contains(&edge.to_id) {
                let weight = arena.op_at(&cost, edge_cost, i);
                if heap.push(weight, edge.to_id) {
                    sub.add_temp_next_edge(edge);
                }
            } else if arena.is_identity_at(edge_cost, i) {
                sub.add_temp_next_edge(edge);
            }
        }

        sub.set_next_weight(id, cost);
    }
}

/// The mirror image of [`forward_dijkstra`]: runs backward from `source`
/// over predecessor edges, recording next-weights as prev-weights instead.
pub fn backward_dijkstra<S, T: Clone>(sub: &mut OptimalSubgraph<'_, S, T>, source: u32, i: usize) {
    let arena = sub.arena().clone();
    let cmp_arena = arena.clone();
    let mut heap: IndexedHeap<PartialCost<T>, _> = IndexedHeap::with_capacity(
        move |a: &PartialCost<T>, b: &PartialCost<T>| !matches!(cmp_arena.compare_at(a, b, i), Ordering::Less),
        sub.capacity_hint(),
    );

    heap.push(arena.identity_at(i), source);
    let mut closed: HashSet<u32> = HashSet::new();

    while let Some((cost, id)) = heap.pop() {
        closed.insert(id);
        trace!(node = id, coordinate = i, "backward dijkstra settled node");
        let edges = sub.get_prev_edges(id, i).to_vec();

        for edge in edges {
            let edge_cost = sub.edge_cost(edge);
            if !closed.contains(&edge.from_id) {
                let weight = arena.op_at(&cost, edge_cost, i);
                if heap.push(weight, edge.from_id) {
                    sub.add_temp_prev_edge(edge);
                }
            } else if arena.is_identity_at(edge_cost, i) {
                sub.add_temp_prev_edge(edge);
            }
        }

        sub.set_prev_weight(id, cost);
    }
}

/// Walks forward from `start` along the temporary propagation edges left by
/// [`forward_dijkstra`]/[`backward_dijkstra`], keeping only the edges whose
/// combined forward+edge+backward cost at coordinate `i` equals the optimal
/// distance from `start` to `end` (`sub.get_prev_weight(start)`). Surviving
/// edges are committed via [`OptimalSubgraph::add_optimal_edge`].
pub fn bfs_optimal_edge_retrieval<S, T: Clone>(sub: &mut OptimalSubgraph<'_, S, T>, start: u32, i: usize) {
    let arena = sub.arena().clone();

    let mut queue: VecDeque<u32> = VecDeque::new();
    let mut closed: HashSet<u32> = HashSet::new();
    queue.push_back(start);
    closed.insert(start);

    let total_cost = arena.identity_at(i);

    while let Some(node_id) = queue.pop_front() {
        let next_edges: Vec<_> = sub
            .temp_next_edges()
            .get(&node_id)
            .cloned()
            .unwrap_or_default();

        for edge in next_edges {
            if sub.is_prev_weight_inf(edge.to_id) {
                continue;
            }

            let prev_weight = sub.get_prev_weight(edge.to_id).expect("checked not inf above");
            let next_weight = sub.get_next_weight(node_id).expect("node settled by forward pass");
            let edge_cost = sub.edge_cost(edge);

            arena.op_at_into(prev_weight, next_weight, &total_cost, i);
            arena.op_at_into(edge_cost, &total_cost, &total_cost, i);

            let optimal_cost = sub.get_prev_weight(start).expect("start settled by backward pass");
            let on_optimal_path = arena.compare_at(&total_cost, optimal_cost, i) == Ordering::Equal;

            if on_optimal_path {
                sub.add_optimal_edge(edge);
                if closed.insert(edge.to_id) {
                    queue.push_back(edge.to_id);
                }
            }
        }
    }
}

/// Runs one coordinate's full cycle: forward/backward Dijkstra, then BFS
/// pruning, switching the subgraph over to the pruned edge set for the next
/// coordinate. Returns early (leaving the subgraph's optimal-edge set from
/// the previous coordinate, or empty on the first) when `end` or `start` is
/// unreachable.
pub fn iterate<S, T: Clone>(sub: &mut OptimalSubgraph<'_, S, T>, start: u32, end: u32, i: usize) {
    sub.clear_propagation_edges();
    sub.clear_weights();

    forward_dijkstra(sub, start, i);
    if sub.is_next_weight_inf(end) {
        debug!(coordinate = i, "end unreachable, stopping IDP early");
        return;
    }

    backward_dijkstra(sub, end, i);
    if sub.is_prev_weight_inf(start) {
        debug!(coordinate = i, "start unreachable from end, stopping IDP early");
        return;
    }

    sub.clear_optimal_edges();
    bfs_optimal_edge_retrieval(sub, start, i);
    debug!(coordinate = i, surviving_edges = sub.optimal_edges().len(), "coordinate pruned");
    sub.not_initial();
}

/// Runs every coordinate in order, starting from the full lazy graph and
/// narrowing down to the lexicographically optimal subgraph between `start`
/// and `end`. Stops as soon as a coordinate finds no path at all.
pub fn optimal_subgraph<'g, S, T: Clone>(
    graph: &'g mut LazyGraph<S, T>,
    start: u32,
    end: u32,
) -> OptimalSubgraph<'g, S, T> {
    let arity = graph.arity();
    let mut sub = OptimalSubgraph::new(graph);

    iterate(&mut sub, start, end, 0);
    if !sub.is_graph_exists() {
        return sub;
    }

    for i in 1..arity {
        iterate(&mut sub, start, end, i);
        if !sub.is_graph_exists() {
            return sub;
        }
    }

    sub
}
