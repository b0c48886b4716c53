//! A build-then-query transport catalogue: ingest stops, road distances and
//! bus routes, then answer route-statistics, stop-membership, itinerary and
//! map-rendering queries against the frozen network.

pub mod catalogue;
pub mod error;
pub mod geo;
pub mod render;
pub mod request;
pub mod router;
pub mod svg;

pub use catalogue::{Bus, BusId, Catalogue, RouteInfo, Stop, StopId};
pub use error::Error;
pub use render::{Offset, RenderSettings, Renderer};
pub use request::{ingest, BaseRecord, Request, RequestHandler, Response};
pub use router::{BusItem, Item, Router, RouteData, RouteSettings, WaitItem};
pub use svg::Color;
