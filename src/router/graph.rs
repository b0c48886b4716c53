//! Router-compile: builds the two-vertices-per-stop expansion and its
//! wait/ride edges from a frozen catalogue.

use petgraph::graph::{DiGraph, NodeIndex};

use crate::catalogue::{BusId, Catalogue, StopId};

use super::RouteSettings;

/// What an edge in the compiled graph represents.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeKind {
    Wait { stop: StopId },
    Ride { bus: BusId, span_count: usize },
}

/// A compiled edge: the petgraph edge weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub weight: f64,
    pub kind: EdgeKind,
}

/// The wait vertex for a stop: `2k`.
pub(crate) fn wait_vertex(stop: StopId) -> NodeIndex {
    NodeIndex::new(stop.index() * 2)
}

/// The board vertex for a stop: `2k + 1`.
pub(crate) fn board_vertex(stop: StopId) -> NodeIndex {
    NodeIndex::new(stop.index() * 2 + 1)
}

pub(crate) fn compile(catalogue: &Catalogue, settings: &RouteSettings) -> DiGraph<(), Edge> {
    let stop_count = catalogue.stops().len();
    let mut graph = DiGraph::with_capacity(stop_count * 2, stop_count * 2);

    for _ in 0..stop_count * 2 {
        graph.add_node(());
    }

    for k in 0..stop_count {
        let stop = StopId(k as u32);
        graph.add_edge(
            wait_vertex(stop),
            board_vertex(stop),
            Edge {
                weight: settings.bus_wait_time as f64,
                kind: EdgeKind::Wait { stop },
            },
        );
    }

    let speed_metres_per_minute = settings.bus_velocity * 1000.0 / 60.0;
    for (index, bus) in catalogue.buses().iter().enumerate() {
        let bus_id = BusId(index as u32);
        add_ride_edges(&mut graph, catalogue, bus_id, &bus.stops, speed_metres_per_minute);
        if bus.is_roundtrip {
            add_closing_edge(&mut graph, catalogue, bus_id, &bus.stops, speed_metres_per_minute);
        } else {
            let reversed: Vec<StopId> = bus.stops.iter().rev().copied().collect();
            add_ride_edges(&mut graph, catalogue, bus_id, &reversed, speed_metres_per_minute);
        }
    }

    graph
}

/// Emits one edge per `(i, j)` with `i < j` in `stops`, board(stops[i]) →
/// wait(stops[j]), summing per-segment road distance (unknown segments
/// contribute 0, never abort the edge) and skipping pairs whose total is
/// not positive.
fn add_ride_edges(
    graph: &mut DiGraph<(), Edge>,
    catalogue: &Catalogue,
    bus: BusId,
    stops: &[StopId],
    speed_metres_per_minute: f64,
) {
    let n = stops.len();
    if n < 2 {
        return;
    }
    for i in 0..n {
        let mut total_metres = 0.0;
        for j in (i + 1)..n {
            total_metres += catalogue
                .get_distance(stops[j - 1], stops[j])
                .map(|m| m as f64)
                .unwrap_or(0.0);
            if total_metres <= 0.0 {
                continue;
            }
            graph.add_edge(
                board_vertex(stops[i]),
                wait_vertex(stops[j]),
                Edge {
                    weight: total_metres / speed_metres_per_minute,
                    kind: EdgeKind::Ride {
                        bus,
                        span_count: j - i,
                    },
                },
            );
        }
    }
}

/// Circular routes only cover forward index-ordered pairs in
/// `add_ride_edges`; this closes the loop with one direct edge from the
/// last stop back to the first, span count 1. This intentionally does not
/// add any further wrap-around pairs.
fn add_closing_edge(
    graph: &mut DiGraph<(), Edge>,
    catalogue: &Catalogue,
    bus: BusId,
    stops: &[StopId],
    speed_metres_per_minute: f64,
) {
    let Some((&last, &first)) = stops.last().zip(stops.first()) else {
        return;
    };
    if let Some(metres) = catalogue.get_distance(last, first) {
        if metres > 0 {
            graph.add_edge(
                board_vertex(last),
                wait_vertex(first),
                Edge {
                    weight: metres as f64 / speed_metres_per_minute,
                    kind: EdgeKind::Ride { bus, span_count: 1 },
                },
            );
        }
    }
}
