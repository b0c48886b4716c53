//! Translates a frozen [`Catalogue`](crate::catalogue::Catalogue) into a
//! weighted directed graph over a two-vertices-per-stop expansion (wait
//! vertex, board vertex), and answers earliest-arrival itinerary queries
//! against it with Dijkstra.

mod dijkstra;
mod graph;

pub use dijkstra::{BusItem, Item, RouteData, WaitItem};
pub use graph::{Edge, EdgeKind};

use std::sync::OnceLock;

use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalogue::Catalogue;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RouterError {
    #[error("bus_velocity must be positive, got {0}")]
    NonPositiveVelocity(f64),
}

/// Router-compile configuration, value-copied at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSettings {
    pub bus_wait_time: u32,
    pub bus_velocity: f64,
}

impl RouteSettings {
    pub fn new(bus_wait_time: u32, bus_velocity: f64) -> Result<Self, RouterError> {
        if bus_velocity <= 0.0 {
            return Err(RouterError::NonPositiveVelocity(bus_velocity));
        }
        Ok(Self {
            bus_wait_time,
            bus_velocity,
        })
    }
}

/// Compiles a catalogue into a routing graph on first query and answers
/// shortest-itinerary queries against it. Borrows the catalogue for its
/// lifetime and owns its own graph; neither owns `settings`.
pub struct Router<'c> {
    catalogue: &'c Catalogue,
    settings: RouteSettings,
    graph: OnceLock<DiGraph<(), Edge>>,
}

impl<'c> Router<'c> {
    pub fn new(catalogue: &'c Catalogue, settings: RouteSettings) -> Self {
        Self {
            catalogue,
            settings,
            graph: OnceLock::new(),
        }
    }

    /// Forces the compile now. Call this before sharing a `Router` across
    /// concurrent readers; the lazy path is only safe under single-threaded
    /// access up to the first `build_route` call.
    pub fn ensure_compiled(&self) {
        self.graph();
    }

    fn graph(&self) -> &DiGraph<(), Edge> {
        self.graph.get_or_init(|| {
            log::debug!(
                "compiling routing graph for {} stops, {} buses",
                self.catalogue.stops().len(),
                self.catalogue.buses().len()
            );
            graph::compile(self.catalogue, &self.settings)
        })
    }

    /// Earliest-arrival itinerary from `from` to `to`, or `None` if either
    /// stop is unknown or no path exists. Identical stops yield a
    /// zero-weight, zero-item itinerary.
    pub fn build_route(&self, from: &str, to: &str) -> Option<RouteData> {
        let from_id = self.catalogue.stop_id(from)?;
        let to_id = self.catalogue.stop_id(to)?;
        if from_id == to_id {
            return Some(RouteData {
                total_time: 0.0,
                items: Vec::new(),
            });
        }

        let graph = self.graph();
        let source = graph::wait_vertex(from_id);
        let target = graph::wait_vertex(to_id);
        let (total_time, edges) = dijkstra::shortest_path(graph, source, target)?;

        let items = edges
            .into_iter()
            .map(|edge_id| {
                let edge = &graph[edge_id];
                match &edge.kind {
                    EdgeKind::Wait { stop } => Item::Wait(WaitItem {
                        stop_name: self.catalogue.get_stop_by_id(*stop).name.clone(),
                        time: edge.weight,
                    }),
                    EdgeKind::Ride { bus, span_count } => Item::Bus(BusItem {
                        bus_name: self.catalogue.get_bus_by_id(*bus).name.clone(),
                        span_count: *span_count,
                        time: edge.weight,
                    }),
                }
            })
            .collect();

        Some(RouteData { total_time, items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinates;

    fn two_transfer_network() -> Catalogue {
        let mut c = Catalogue::new();
        c.add_stop("S1", Coordinates::new(0.0, 0.0)).unwrap();
        c.add_stop("S2", Coordinates::new(0.0, 1.0)).unwrap();
        c.add_stop("S3", Coordinates::new(0.0, 2.0)).unwrap();
        c.set_distance("S1", "S2", 4000).unwrap();
        c.set_distance("S2", "S3", 2000).unwrap();
        c.add_bus("A", &["S1", "S2"], false).unwrap();
        c.add_bus("B", &["S2", "S3"], false).unwrap();
        c
    }

    #[test]
    fn scenario_routing_one_transfer() {
        let c = two_transfer_network();
        let settings = RouteSettings::new(6, 40.0).unwrap();
        let router = Router::new(&c, settings);
        let route = router.build_route("S1", "S3").unwrap();
        assert!((route.total_time - 21.0).abs() < 1e-6);

        let items: Vec<String> = route
            .items
            .iter()
            .map(|item| match item {
                Item::Wait(w) => format!("Wait {} {}", w.stop_name, w.time),
                Item::Bus(b) => format!("Bus {} span={} {}", b.bus_name, b.span_count, b.time),
            })
            .collect();
        assert_eq!(
            items,
            vec![
                "Wait S1 6".to_string(),
                "Bus A span=1 6".to_string(),
                "Wait S2 6".to_string(),
                "Bus B span=1 3".to_string(),
            ]
        );
    }

    #[test]
    fn identical_endpoints_are_free() {
        let c = two_transfer_network();
        let settings = RouteSettings::new(6, 40.0).unwrap();
        let router = Router::new(&c, settings);
        let route = router.build_route("S1", "S1").unwrap();
        assert_eq!(route.total_time, 0.0);
        assert!(route.items.is_empty());
    }

    #[test]
    fn unknown_stop_yields_none() {
        let c = two_transfer_network();
        let settings = RouteSettings::new(6, 40.0).unwrap();
        let router = Router::new(&c, settings);
        assert!(router.build_route("S1", "Nowhere").is_none());
    }

    #[test]
    fn itinerary_alternates_wait_then_bus() {
        let c = two_transfer_network();
        let settings = RouteSettings::new(6, 40.0).unwrap();
        let router = Router::new(&c, settings);
        let route = router.build_route("S1", "S3").unwrap();
        for pair in route.items.chunks(2) {
            assert!(matches!(pair[0], Item::Wait(_)));
            if pair.len() == 2 {
                assert!(matches!(pair[1], Item::Bus(_)));
            }
        }
    }

    #[test]
    fn negative_or_zero_velocity_is_rejected() {
        assert!(RouteSettings::new(5, 0.0).is_err());
        assert!(RouteSettings::new(5, -1.0).is_err());
    }
}
