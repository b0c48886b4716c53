//! Dijkstra over the compiled routing graph, with edge-level predecessor
//! tracking so an itinerary can be reconstructed as alternating
//! `Wait`/`Bus` segments.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use super::graph::Edge;

/// One segment of an itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Wait(WaitItem),
    Bus(BusItem),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitItem {
    pub stop_name: String,
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusItem {
    pub bus_name: String,
    pub span_count: usize,
    pub time: f64,
}

/// An earliest-arrival itinerary: total weight plus its ordered segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteData {
    pub total_time: f64,
    pub items: Vec<Item>,
}

#[derive(Copy, Clone, Debug)]
struct HeapEntry {
    cost: f64,
    vertex: NodeIndex,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so `BinaryHeap` (a max-heap) pops the smallest cost first.
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Standard priority-queue Dijkstra over non-negative edge weights.
/// Returns the total weight and the edges of the shortest path from
/// `source` to `target`, in traversal order, or `None` if unreachable.
pub(crate) fn shortest_path(
    graph: &DiGraph<(), Edge>,
    source: NodeIndex,
    target: NodeIndex,
) -> Option<(f64, Vec<EdgeIndex>)> {
    let mut best_weight = vec![f64::INFINITY; graph.node_count()];
    let mut predecessor_edge: Vec<Option<EdgeIndex>> = vec![None; graph.node_count()];
    let mut heap = BinaryHeap::new();

    best_weight[source.index()] = 0.0;
    heap.push(HeapEntry {
        cost: 0.0,
        vertex: source,
    });

    while let Some(HeapEntry { cost, vertex }) = heap.pop() {
        if vertex == target {
            break;
        }
        if cost > best_weight[vertex.index()] {
            continue;
        }
        for edge_ref in graph.edges(vertex) {
            let next = edge_ref.target();
            let next_cost = cost + edge_ref.weight().weight;
            if next_cost < best_weight[next.index()] {
                best_weight[next.index()] = next_cost;
                predecessor_edge[next.index()] = Some(edge_ref.id());
                heap.push(HeapEntry {
                    cost: next_cost,
                    vertex: next,
                });
            }
        }
    }

    if best_weight[target.index()].is_infinite() {
        return None;
    }

    let mut path = Vec::new();
    let mut current = target;
    while current != source {
        let edge_id = predecessor_edge[current.index()]?;
        path.push(edge_id);
        current = graph.edge_endpoints(edge_id).unwrap().0;
    }
    path.reverse();

    Some((best_weight[target.index()], path))
}
