//! Builds the deterministic SVG rendering of a catalogue's network.

mod projector;

pub use projector::SphereProjector;

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::catalogue::{Bus, Catalogue, Stop};
use crate::svg::{Circle, Color, Document, PathProps, Point, StrokeLineCap, StrokeLineJoin, Text};

/// Offset pair for label positioning, e.g. `bus_label_offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub dx: f64,
    pub dy: f64,
}

/// Renderer configuration, value-copied at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub stop_radius: f64,
    pub line_width: f64,
    pub bus_label_font_size: u32,
    pub bus_label_offset: Offset,
    pub stop_label_font_size: u32,
    pub stop_label_offset: Offset,
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    pub color_palette: Vec<Color>,
}

/// Renders a catalogue's network to an SVG document under fixed
/// configuration. Stateless beyond its settings; every render starts from
/// the catalogue passed to it.
pub struct Renderer {
    settings: RenderSettings,
}

impl Renderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn render(&self, catalogue: &Catalogue) -> Document {
        let mut document = Document::new();

        let buses_by_key = catalogue.buses();
        let all_points = buses_by_key
            .iter()
            .flat_map(|bus| bus.stops.iter())
            .map(|&stop_id| catalogue.get_stop_by_id(stop_id).coordinates);
        let projector = SphereProjector::new(
            all_points,
            self.settings.width,
            self.settings.height,
            self.settings.padding,
        );

        let bus_colors = self.bus_colors(catalogue);

        for polyline in self.route_lines(catalogue, &projector, &bus_colors) {
            document.add(polyline);
        }
        for text in self.bus_labels(catalogue, &projector, &bus_colors) {
            document.add(text);
        }

        let mut referenced_stops: Vec<&Stop> = {
            let mut seen = BTreeSet::new();
            let mut stops = Vec::new();
            for bus in buses_by_key {
                for &stop_id in &bus.stops {
                    let stop = catalogue.get_stop_by_id(stop_id);
                    if seen.insert(stop.name.clone()) {
                        stops.push(stop);
                    }
                }
            }
            stops
        };
        referenced_stops.sort_unstable_by(|a, b| a.name.cmp(&b.name));

        for stop in &referenced_stops {
            let (x, y) = projector.project(stop.coordinates);
            let mut circle = Circle::new();
            circle.center = Point::new(x, y);
            circle.radius = self.settings.stop_radius;
            circle.props.fill_color = Some(Color::named("white"));
            document.add(circle);
        }

        for stop in &referenced_stops {
            let (underlayer, label) = self.stop_label(stop, &projector);
            document.add(underlayer);
            document.add(label);
        }

        document
    }

    fn materialised_stops(bus: &Bus) -> Vec<crate::catalogue::StopId> {
        if bus.is_roundtrip {
            bus.stops.clone()
        } else {
            let mut stops = bus.stops.clone();
            stops.extend(bus.stops.iter().rev().skip(1).copied());
            stops
        }
    }

    /// Assigns every non-empty bus a palette colour by walking
    /// `catalogue.buses()` in input-key order, the same enumeration order
    /// `route_lines` draws polylines in and the palette-rotation rule
    /// (§4.6) is defined against. `bus_labels` looks up the same map by
    /// name instead of running an independent rotation, so a bus's label
    /// always reuses its own polyline's colour regardless of name order.
    fn bus_colors(&self, catalogue: &Catalogue) -> HashMap<String, Color> {
        let mut colors = HashMap::new();
        let palette = &self.settings.color_palette;
        if palette.is_empty() {
            return colors;
        }

        let mut color_index = 0usize;
        for bus in catalogue.buses() {
            if bus.stops.is_empty() {
                continue;
            }
            colors.insert(bus.name.clone(), palette[color_index].clone());
            color_index = (color_index + 1) % palette.len();
        }
        colors
    }

    fn route_lines(
        &self,
        catalogue: &Catalogue,
        projector: &SphereProjector,
        bus_colors: &HashMap<String, Color>,
    ) -> Vec<crate::svg::Polyline> {
        let mut result = Vec::new();

        for bus in catalogue.buses() {
            if bus.stops.is_empty() {
                continue;
            }
            let Some(stroke_color) = bus_colors.get(&bus.name) else {
                continue;
            };
            let route_stops = Self::materialised_stops(bus);
            let mut polyline = crate::svg::Polyline::new();
            for stop_id in route_stops {
                let (x, y) = projector.project(catalogue.get_stop_by_id(stop_id).coordinates);
                polyline = polyline.add_point(Point::new(x, y));
            }
            polyline.props = PathProps {
                stroke_color: Some(stroke_color.clone()),
                fill_color: Some(Color::None),
                stroke_width: Some(self.settings.line_width),
                stroke_line_cap: Some(StrokeLineCap::Round),
                stroke_line_join: Some(StrokeLineJoin::Round),
            };
            result.push(polyline);
        }

        result
    }

    fn bus_labels(
        &self,
        catalogue: &Catalogue,
        projector: &SphereProjector,
        bus_colors: &HashMap<String, Color>,
    ) -> Vec<Text> {
        let mut result = Vec::new();

        for bus in catalogue.buses_by_name() {
            if bus.stops.is_empty() {
                continue;
            }
            let Some(bus_color) = bus_colors.get(&bus.name) else {
                continue;
            };
            let bus_color = bus_color.clone();

            let mut termini = vec![bus.stops[0]];
            if !bus.is_roundtrip {
                let last = *bus.stops.last().unwrap();
                if last != bus.stops[0] {
                    termini.push(last);
                }
            }

            for stop_id in termini {
                let (x, y) = projector.project(catalogue.get_stop_by_id(stop_id).coordinates);
                let point = Point::new(x, y);

                let mut underlayer = Text::new();
                underlayer.position = point;
                underlayer.offset = Point::new(
                    self.settings.bus_label_offset.dx,
                    self.settings.bus_label_offset.dy,
                );
                underlayer.font_size = self.settings.bus_label_font_size;
                underlayer.font_family = "Verdana".to_string();
                underlayer.font_weight = "bold".to_string();
                underlayer.data = bus.name.clone();
                underlayer.props = PathProps {
                    fill_color: Some(self.settings.underlayer_color.clone()),
                    stroke_color: Some(self.settings.underlayer_color.clone()),
                    stroke_width: Some(self.settings.underlayer_width),
                    stroke_line_cap: Some(StrokeLineCap::Round),
                    stroke_line_join: Some(StrokeLineJoin::Round),
                };

                let mut label = Text::new();
                label.position = point;
                label.offset = underlayer.offset;
                label.font_size = self.settings.bus_label_font_size;
                label.font_family = "Verdana".to_string();
                label.font_weight = "bold".to_string();
                label.data = bus.name.clone();
                label.props.fill_color = Some(bus_color.clone());

                result.push(underlayer);
                result.push(label);
            }
        }

        result
    }

    fn stop_label(&self, stop: &Stop, projector: &SphereProjector) -> (Text, Text) {
        let (x, y) = projector.project(stop.coordinates);
        let point = Point::new(x, y);

        let mut underlayer = Text::new();
        underlayer.position = point;
        underlayer.offset = Point::new(
            self.settings.stop_label_offset.dx,
            self.settings.stop_label_offset.dy,
        );
        underlayer.font_size = self.settings.stop_label_font_size;
        underlayer.font_family = "Verdana".to_string();
        underlayer.data = stop.name.clone();
        underlayer.props = PathProps {
            fill_color: Some(self.settings.underlayer_color.clone()),
            stroke_color: Some(self.settings.underlayer_color.clone()),
            stroke_width: Some(self.settings.underlayer_width),
            stroke_line_cap: Some(StrokeLineCap::Round),
            stroke_line_join: Some(StrokeLineJoin::Round),
        };

        let mut label = Text::new();
        label.position = point;
        label.offset = underlayer.offset;
        label.font_size = self.settings.stop_label_font_size;
        label.font_family = "Verdana".to_string();
        label.data = stop.name.clone();
        label.props.fill_color = Some(Color::named("black"));

        (underlayer, label)
    }
}
