//! Thin translation layer between typed query/ingest records and the
//! catalogue, router and renderer. Parsing an external wire format (JSON or
//! otherwise) into these types is left to the caller; this module only
//! defines the shapes and the dispatch logic.

use crate::catalogue::Catalogue;
use crate::error::Error;
use crate::geo::Coordinates;
use crate::render::Renderer;
use crate::router::{Item, Router};

/// One ingest record. Processing order across a batch is stops, then
/// distances, then buses, regardless of the order records arrived in: a
/// bus or distance referencing a stop defined later in the same batch
/// must still resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum BaseRecord {
    Stop {
        name: String,
        coordinates: Coordinates,
        road_distances: Vec<(String, i64)>,
    },
    Bus {
        name: String,
        stops: Vec<String>,
        is_roundtrip: bool,
    },
}

/// Applies a batch of ingest records to `catalogue` in the
/// stops-then-distances-then-buses order, regardless of how they were
/// listed. Builds into a fresh, local catalogue and only swaps it into
/// `*catalogue` once every record has applied cleanly, so a failure
/// partway through a batch (e.g. a duplicate bus name on the third bus)
/// leaves the caller's `catalogue` exactly as it was before the call,
/// never holding the stops and buses that happened to ingest before the
/// error. No partial catalogue is ever published to queries.
pub fn ingest(catalogue: &mut Catalogue, records: &[BaseRecord]) -> Result<(), Error> {
    let mut staging = Catalogue::new();
    apply(&mut staging, records)?;
    *catalogue = staging;
    Ok(())
}

fn apply(catalogue: &mut Catalogue, records: &[BaseRecord]) -> Result<(), Error> {
    for record in records {
        if let BaseRecord::Stop {
            name, coordinates, ..
        } = record
        {
            catalogue.add_stop(name.clone(), *coordinates)?;
        }
    }
    for record in records {
        if let BaseRecord::Stop {
            name, road_distances, ..
        } = record
        {
            for (to_name, metres) in road_distances {
                catalogue.set_distance(name, to_name, *metres)?;
            }
        }
    }
    for record in records {
        if let BaseRecord::Bus {
            name,
            stops,
            is_roundtrip,
        } = record
        {
            catalogue.add_bus(name.clone(), stops, *is_roundtrip)?;
        }
    }
    Ok(())
}

/// A single query, carrying the `id` a caller expects echoed back as
/// `request_id`.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Stop { id: i64, name: String },
    Bus { id: i64, name: String },
    Map { id: i64 },
    Route { id: i64, from: String, to: String },
    /// A record whose `type` field did not match any recognised query.
    /// The caller's JSON layer is expected to produce this rather than
    /// fail outright, so one bad record does not abort the whole batch.
    Unknown { id: i64, request_type: String },
}

impl Request {
    fn id(&self) -> i64 {
        match self {
            Request::Stop { id, .. }
            | Request::Bus { id, .. }
            | Request::Map { id }
            | Request::Route { id, .. }
            | Request::Unknown { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Stop {
        request_id: i64,
        buses: Vec<String>,
    },
    Bus {
        request_id: i64,
        route_length: i64,
        curvature: f64,
        stop_count: usize,
        unique_stop_count: usize,
    },
    Map {
        request_id: i64,
        map: String,
    },
    Route {
        request_id: i64,
        total_time: f64,
        items: Vec<Item>,
    },
    NotFound {
        request_id: i64,
    },
    UnknownRequestType {
        request_id: i64,
        request_type: String,
    },
}

/// Answers queries against a frozen catalogue, compiling the router lazily
/// on the first `Route` query and rendering the map fresh on every `Map`
/// query (rendering is cheap relative to route compilation and has no
/// state worth caching).
pub struct RequestHandler<'c> {
    catalogue: &'c Catalogue,
    router: Router<'c>,
    renderer: Renderer,
}

impl<'c> RequestHandler<'c> {
    pub fn new(catalogue: &'c Catalogue, router: Router<'c>, renderer: Renderer) -> Self {
        Self {
            catalogue,
            router,
            renderer,
        }
    }

    pub fn handle(&self, request: Request) -> Response {
        let request_id = request.id();
        match request {
            Request::Stop { name, .. } => self.handle_stop(request_id, &name),
            Request::Bus { name, .. } => self.handle_bus(request_id, &name),
            Request::Map { .. } => self.handle_map(request_id),
            Request::Route { from, to, .. } => self.handle_route(request_id, &from, &to),
            Request::Unknown { request_type, .. } => Response::UnknownRequestType {
                request_id,
                request_type,
            },
        }
    }

    fn handle_stop(&self, request_id: i64, name: &str) -> Response {
        if self.catalogue.get_stop(name).is_none() {
            return Response::NotFound { request_id };
        }
        let buses = self
            .catalogue
            .get_buses_for_stop(name)
            .into_iter()
            .map(|bus| bus.name.clone())
            .collect();
        Response::Stop { request_id, buses }
    }

    fn handle_bus(&self, request_id: i64, name: &str) -> Response {
        match self.catalogue.get_route_info(name) {
            Some(info) => Response::Bus {
                request_id,
                route_length: info.route_length.round() as i64,
                curvature: info.curvature,
                stop_count: info.stops_count,
                unique_stop_count: info.unique_stops_count,
            },
            None => Response::NotFound { request_id },
        }
    }

    fn handle_map(&self, request_id: i64) -> Response {
        let document = self.renderer.render(self.catalogue);
        Response::Map {
            request_id,
            map: document.render(),
        }
    }

    fn handle_route(&self, request_id: i64, from: &str, to: &str) -> Response {
        match self.router.build_route(from, to) {
            Some(route) => Response::Route {
                request_id,
                total_time: route.total_time,
                items: route.items,
            },
            None => Response::NotFound { request_id },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Offset, RenderSettings};
    use crate::router::RouteSettings;
    use crate::svg::Color;

    fn sample_catalogue() -> Catalogue {
        let mut c = Catalogue::new();
        ingest(
            &mut c,
            &[
                BaseRecord::Stop {
                    name: "A".to_string(),
                    coordinates: Coordinates::new(43.587795, 39.716901),
                    road_distances: vec![("B".to_string(), 850)],
                },
                BaseRecord::Stop {
                    name: "B".to_string(),
                    coordinates: Coordinates::new(43.581969, 39.719848),
                    road_distances: vec![("A".to_string(), 850)],
                },
                BaseRecord::Bus {
                    name: "114".to_string(),
                    stops: vec!["A".to_string(), "B".to_string()],
                    is_roundtrip: false,
                },
            ],
        )
        .unwrap();
        c
    }

    fn render_settings() -> RenderSettings {
        RenderSettings {
            width: 600.0,
            height: 400.0,
            padding: 50.0,
            stop_radius: 5.0,
            line_width: 14.0,
            bus_label_font_size: 20,
            bus_label_offset: Offset { dx: 7.0, dy: 15.0 },
            stop_label_font_size: 18,
            stop_label_offset: Offset { dx: 7.0, dy: -3.0 },
            underlayer_color: Color::rgba(255, 255, 255, 0.85),
            underlayer_width: 3.0,
            color_palette: vec![Color::named("green")],
        }
    }

    #[test]
    fn ingest_resolves_forward_referenced_distances_and_buses() {
        let c = sample_catalogue();
        assert!(c.get_bus("114").is_some());
        assert_eq!(c.get_distance(c.stop_id("A").unwrap(), c.stop_id("B").unwrap()), Some(850));
    }

    #[test]
    fn failed_ingest_leaves_the_callers_catalogue_untouched() {
        let mut c = Catalogue::new();
        let result = ingest(
            &mut c,
            &[
                BaseRecord::Stop {
                    name: "A".to_string(),
                    coordinates: Coordinates::new(0.0, 0.0),
                    road_distances: Vec::new(),
                },
                BaseRecord::Bus {
                    name: "1".to_string(),
                    stops: vec!["A".to_string()],
                    is_roundtrip: true,
                },
                BaseRecord::Bus {
                    name: "1".to_string(),
                    stops: vec!["A".to_string()],
                    is_roundtrip: true,
                },
            ],
        );
        assert!(result.is_err());
        assert!(c.get_stop("A").is_none());
        assert!(c.get_bus("1").is_none());
    }

    #[test]
    fn scenario_stop_and_bus_queries() {
        let c = sample_catalogue();
        let router = Router::new(&c, RouteSettings::new(6, 40.0).unwrap());
        let handler = RequestHandler::new(&c, router, Renderer::new(render_settings()));

        let response = handler.handle(Request::Stop {
            id: 1,
            name: "A".to_string(),
        });
        assert_eq!(
            response,
            Response::Stop {
                request_id: 1,
                buses: vec!["114".to_string()],
            }
        );

        let response = handler.handle(Request::Bus {
            id: 2,
            name: "114".to_string(),
        });
        match response {
            Response::Bus {
                request_id,
                route_length,
                stop_count,
                unique_stop_count,
                ..
            } => {
                assert_eq!(request_id, 2);
                assert_eq!(route_length, 1700);
                assert_eq!(stop_count, 3);
                assert_eq!(unique_stop_count, 2);
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn unknown_bus_is_not_found() {
        let c = sample_catalogue();
        let router = Router::new(&c, RouteSettings::new(6, 40.0).unwrap());
        let handler = RequestHandler::new(&c, router, Renderer::new(render_settings()));
        let response = handler.handle(Request::Bus {
            id: 6,
            name: "nope".to_string(),
        });
        assert_eq!(response, Response::NotFound { request_id: 6 });
    }

    #[test]
    fn unknown_request_type_is_surfaced_per_request() {
        let c = sample_catalogue();
        let router = Router::new(&c, RouteSettings::new(6, 40.0).unwrap());
        let handler = RequestHandler::new(&c, router, Renderer::new(render_settings()));
        let response = handler.handle(Request::Unknown {
            id: 9,
            request_type: "Flight".to_string(),
        });
        assert_eq!(
            response,
            Response::UnknownRequestType {
                request_id: 9,
                request_type: "Flight".to_string(),
            }
        );
    }

    #[test]
    fn map_query_renders_an_svg_document() {
        let c = sample_catalogue();
        let router = Router::new(&c, RouteSettings::new(6, 40.0).unwrap());
        let handler = RequestHandler::new(&c, router, Renderer::new(render_settings()));
        let response = handler.handle(Request::Map { id: 5 });
        match response {
            Response::Map { request_id, map } => {
                assert_eq!(request_id, 5);
                assert!(map.starts_with("<?xml"));
            }
            other => panic!("unexpected response {other:?}"),
        }
    }
}
