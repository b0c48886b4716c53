//! Entities that make up the transport network, independent of how the
//! catalogue indexes or stores them.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// Dense index of a [`Stop`](super::Stop) in a [`Catalogue`](super::Catalogue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StopId(pub(crate) u32);

/// Dense index of a [`Bus`](super::Bus) in a [`Catalogue`](super::Catalogue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BusId(pub(crate) u32);

impl StopId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl BusId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A named geographic point. Never mutated after ingest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub coordinates: Coordinates,
}

/// A named, ordered sequence of stop references, either circular or linear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bus {
    pub name: String,
    pub stops: Vec<StopId>,
    pub is_roundtrip: bool,
}

/// Derived per-bus statistics, computed on demand from the materialised
/// traversal of a bus's stops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub stops_count: usize,
    pub unique_stops_count: usize,
    pub route_length: f64,
    pub curvature: f64,
}
