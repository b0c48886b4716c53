//! The catalogue: a stably-addressed graph of stops and buses, an
//! asymmetric pairwise road-distance table, and the two derived indexes
//! (stop→bus-set, bus→route-stats) that stay consistent through ingest.
//!
//! Ingest and query are two disjoint phases (see the crate's concurrency
//! notes): nothing here locks, because the contract forbids concurrent
//! ingest and query.

mod domain;

pub use domain::{Bus, BusId, RouteInfo, Stop, StopId};

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::geo::{self, Coordinates};

/// Ingest-time failures. Query-time lookups never produce one of these;
/// absence is represented as `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogueError {
    #[error("stop {0:?} already exists")]
    DuplicateStop(String),
    #[error("bus {0:?} already exists")]
    DuplicateBus(String),
    #[error("stop {0:?} is not known")]
    UnknownStop(String),
    #[error("distance from {from:?} to {to:?} must be a positive integer, got {metres}")]
    NonPositiveDistance {
        from: String,
        to: String,
        metres: i64,
    },
}

/// A frozen-after-ingest graph of stops and buses.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    stops: Vec<Stop>,
    buses: Vec<Bus>,
    stop_ids: HashMap<String, StopId>,
    bus_ids: HashMap<String, BusId>,
    distances: HashMap<(StopId, StopId), u32>,
    /// Every bus serving a stop at any position, by stop. Kept as a hash
    /// set; surfacing requires name order, but storage stays unordered, so
    /// the sort happens once, at the query boundary (`get_buses_for_stop`),
    /// rather than maintaining a second ordered container.
    stop_to_buses: Vec<HashSet<BusId>>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a stop. Re-insertion under an existing name is rejected.
    pub fn add_stop(
        &mut self,
        name: impl Into<String>,
        coordinates: Coordinates,
    ) -> Result<StopId, CatalogueError> {
        let name = name.into();
        if self.stop_ids.contains_key(&name) {
            return Err(CatalogueError::DuplicateStop(name));
        }
        let id = StopId(self.stops.len() as u32);
        self.stop_ids.insert(name.clone(), id);
        self.stops.push(Stop { name, coordinates });
        self.stop_to_buses.push(HashSet::new());
        Ok(id)
    }

    /// Records a directed distance. Both stops must already exist and
    /// `metres` must be a positive integer.
    pub fn set_distance(
        &mut self,
        from_name: &str,
        to_name: &str,
        metres: i64,
    ) -> Result<(), CatalogueError> {
        let from = self
            .stop_ids
            .get(from_name)
            .copied()
            .ok_or_else(|| CatalogueError::UnknownStop(from_name.to_string()))?;
        let to = self
            .stop_ids
            .get(to_name)
            .copied()
            .ok_or_else(|| CatalogueError::UnknownStop(to_name.to_string()))?;
        if metres <= 0 {
            return Err(CatalogueError::NonPositiveDistance {
                from: from_name.to_string(),
                to: to_name.to_string(),
                metres,
            });
        }
        self.distances.insert((from, to), metres as u32);
        Ok(())
    }

    /// Inserts a bus, resolving each stop name to its reference. Unknown
    /// stop names are silently dropped from the route; a warning is logged
    /// for each drop so callers can detect it.
    pub fn add_bus(
        &mut self,
        name: impl Into<String>,
        stop_names: &[impl AsRef<str>],
        is_roundtrip: bool,
    ) -> Result<BusId, CatalogueError> {
        let name = name.into();
        if self.bus_ids.contains_key(&name) {
            return Err(CatalogueError::DuplicateBus(name));
        }

        let mut stops = Vec::with_capacity(stop_names.len());
        for stop_name in stop_names {
            let stop_name = stop_name.as_ref();
            match self.stop_ids.get(stop_name) {
                Some(&id) => stops.push(id),
                None => log::warn!("bus {name:?} references unknown stop {stop_name:?}, dropping"),
            }
        }

        let id = BusId(self.buses.len() as u32);
        for &stop_id in &stops {
            self.stop_to_buses[stop_id.index()].insert(id);
        }
        self.bus_ids.insert(name.clone(), id);
        self.buses.push(Bus {
            name,
            stops,
            is_roundtrip,
        });
        Ok(id)
    }

    pub fn get_stop(&self, name: &str) -> Option<&Stop> {
        self.stop_ids.get(name).map(|&id| &self.stops[id.index()])
    }

    pub fn get_bus(&self, name: &str) -> Option<&Bus> {
        self.bus_ids.get(name).map(|&id| &self.buses[id.index()])
    }

    pub(crate) fn get_stop_by_id(&self, id: StopId) -> &Stop {
        &self.stops[id.index()]
    }

    pub(crate) fn get_bus_by_id(&self, id: BusId) -> &Bus {
        &self.buses[id.index()]
    }

    /// Buses serving `stop_name`, sorted by name ascending. Empty if the
    /// stop is unknown or has no buses.
    pub fn get_buses_for_stop(&self, stop_name: &str) -> Vec<&Bus> {
        let Some(&stop_id) = self.stop_ids.get(stop_name) else {
            return Vec::new();
        };
        let mut buses: Vec<&Bus> = self.stop_to_buses[stop_id.index()]
            .iter()
            .map(|&bus_id| self.get_bus_by_id(bus_id))
            .collect();
        buses.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        buses
    }

    /// Directed distance lookup with the asymmetric fallback: if `(from,
    /// to)` is recorded, return it; else fall back to `(to, from)`; else
    /// `None` (distinct from zero: an unknown pair, not a zero-length one).
    pub fn get_distance(&self, from: StopId, to: StopId) -> Option<u32> {
        self.distances
            .get(&(from, to))
            .or_else(|| self.distances.get(&(to, from)))
            .copied()
    }

    /// Per-bus derived statistics, or `None` if the bus is unknown or has
    /// zero stops.
    pub fn get_route_info(&self, bus_name: &str) -> Option<RouteInfo> {
        let bus = self.get_bus(bus_name)?;
        if bus.stops.is_empty() {
            return None;
        }

        let unique_stops_count = bus.stops.iter().collect::<HashSet<_>>().len();
        let n = bus.stops.len();
        let stops_count = if bus.is_roundtrip { n } else { 2 * n - 1 };

        let segments: Vec<(StopId, StopId)> = if bus.is_roundtrip {
            (0..n)
                .map(|i| (bus.stops[i], bus.stops[(i + 1) % n]))
                .collect()
        } else {
            let forward = (0..n - 1).map(|i| (bus.stops[i], bus.stops[i + 1]));
            let backward = (0..n - 1).map(|i| (bus.stops[i + 1], bus.stops[i]));
            forward.chain(backward).collect()
        };

        let mut geo_length = 0.0;
        let mut route_length = 0.0;
        for (from, to) in segments {
            let segment_geo =
                geo::compute_distance(self.get_stop_by_id(from).coordinates, self.get_stop_by_id(to).coordinates);
            geo_length += segment_geo;
            route_length += match self.get_distance(from, to) {
                Some(metres) => metres as f64,
                None => segment_geo,
            };
        }

        let curvature = if geo_length > 0.0 {
            route_length / geo_length
        } else {
            0.0
        };

        Some(RouteInfo {
            stops_count,
            unique_stops_count,
            route_length,
            curvature,
        })
    }

    pub(crate) fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub(crate) fn stop_id(&self, name: &str) -> Option<StopId> {
        self.stop_ids.get(name).copied()
    }

    /// All buses, in input-key (insertion) order. The renderer's polyline
    /// pass and its palette assignment both need this order; its label
    /// pass needs name order instead, via `buses_by_name`.
    pub(crate) fn buses(&self) -> &[Bus] {
        &self.buses
    }

    /// All buses, sorted by name ascending.
    pub(crate) fn buses_by_name(&self) -> Vec<&Bus> {
        let mut buses: Vec<&Bus> = self.buses.iter().collect();
        buses.sort_unstable_by(|a, b| a.name.cmp(&b.name));
        buses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stop_linear() -> Catalogue {
        let mut c = Catalogue::new();
        c.add_stop("A", Coordinates::new(43.587795, 39.716901)).unwrap();
        c.add_stop("B", Coordinates::new(43.581969, 39.719848)).unwrap();
        c.set_distance("A", "B", 850).unwrap();
        c.set_distance("B", "A", 850).unwrap();
        c.add_bus("114", &["A", "B"], false).unwrap();
        c
    }

    #[test]
    fn scenario_two_stop_linear() {
        let c = two_stop_linear();
        let info = c.get_route_info("114").unwrap();
        assert_eq!(info.stops_count, 3);
        assert_eq!(info.unique_stops_count, 2);
        assert_eq!(info.route_length, 1700.0);
        assert!((info.curvature - 1.23199).abs() < 1e-4);
    }

    #[test]
    fn scenario_stop_membership() {
        let c = two_stop_linear();
        let buses: Vec<&str> = c.get_buses_for_stop("A").iter().map(|b| b.name.as_str()).collect();
        assert_eq!(buses, vec!["114"]);
        assert!(c.get_buses_for_stop("Z").is_empty());
    }

    #[test]
    fn scenario_circular_three_stop() {
        let mut c = Catalogue::new();
        c.add_stop("X", Coordinates::new(0.0, 0.0)).unwrap();
        c.add_stop("Y", Coordinates::new(0.0, 1.0)).unwrap();
        c.add_stop("Z", Coordinates::new(1.0, 1.0)).unwrap();
        c.set_distance("X", "Y", 100).unwrap();
        c.set_distance("Y", "Z", 200).unwrap();
        c.set_distance("Z", "X", 300).unwrap();
        c.add_bus("C", &["X", "Y", "Z"], true).unwrap();

        let info = c.get_route_info("C").unwrap();
        assert_eq!(info.stops_count, 3);
        assert_eq!(info.unique_stops_count, 3);
        assert_eq!(info.route_length, 600.0);
    }

    #[test]
    fn scenario_unknown_bus() {
        let c = two_stop_linear();
        assert!(c.get_route_info("nope").is_none());
        assert!(c.get_bus("nope").is_none());
    }

    #[test]
    fn duplicate_stop_is_rejected() {
        let mut c = Catalogue::new();
        c.add_stop("A", Coordinates::new(0.0, 0.0)).unwrap();
        assert!(matches!(
            c.add_stop("A", Coordinates::new(1.0, 1.0)),
            Err(CatalogueError::DuplicateStop(_))
        ));
    }

    #[test]
    fn unknown_stop_in_bus_is_dropped_not_errored() {
        let mut c = Catalogue::new();
        c.add_stop("A", Coordinates::new(0.0, 0.0)).unwrap();
        c.add_bus("1", &["A", "Ghost"], true).unwrap();
        let bus = c.get_bus("1").unwrap();
        assert_eq!(bus.stops.len(), 1);
    }

    #[test]
    fn asymmetric_distance_fallback() {
        let mut c = Catalogue::new();
        let a = c.add_stop("A", Coordinates::new(0.0, 0.0)).unwrap();
        let b = c.add_stop("B", Coordinates::new(0.0, 1.0)).unwrap();
        c.set_distance("A", "B", 500).unwrap();
        assert_eq!(c.get_distance(a, b), Some(500));
        assert_eq!(c.get_distance(b, a), Some(500));
    }

    #[test]
    fn unknown_pair_is_none_not_zero() {
        let mut c = Catalogue::new();
        let a = c.add_stop("A", Coordinates::new(0.0, 0.0)).unwrap();
        let b = c.add_stop("B", Coordinates::new(0.0, 1.0)).unwrap();
        assert_eq!(c.get_distance(a, b), None);
    }
}
