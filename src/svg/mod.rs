//! A small typed SVG document tree, rendered to its textual form with
//! indentation. Scoped to exactly the shapes the renderer needs: circles,
//! polylines and text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An RGB or RGBA color, a named CSS color, or none at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Color {
    None,
    Named(String),
    Rgb(Rgb),
    Rgba(Rgba),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub opacity: f64,
}

impl Color {
    pub fn named(name: impl Into<String>) -> Self {
        Color::Named(name.into())
    }

    pub fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Color::Rgb(Rgb { red, green, blue })
    }

    pub fn rgba(red: u8, green: u8, blue: u8, opacity: f64) -> Self {
        Color::Rgba(Rgba {
            red,
            green,
            blue,
            opacity,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::None => write!(f, "none"),
            Color::Named(name) => write!(f, "{name}"),
            Color::Rgb(rgb) => write!(f, "rgb({},{},{})", rgb.red, rgb.green, rgb.blue),
            Color::Rgba(rgba) => write!(
                f,
                "rgba({},{},{},{})",
                rgba.red, rgba.green, rgba.blue, rgba.opacity
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeLineCap {
    Butt,
    Round,
    Square,
}

impl fmt::Display for StrokeLineCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrokeLineCap::Butt => "butt",
            StrokeLineCap::Round => "round",
            StrokeLineCap::Square => "square",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeLineJoin {
    Arcs,
    Bevel,
    Miter,
    MiterClip,
    Round,
}

impl fmt::Display for StrokeLineJoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StrokeLineJoin::Arcs => "arcs",
            StrokeLineJoin::Bevel => "bevel",
            StrokeLineJoin::Miter => "miter",
            StrokeLineJoin::MiterClip => "miter-clip",
            StrokeLineJoin::Round => "round",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Fill/stroke attributes shared by every shape. All fields default to
/// unset, in which case the corresponding SVG attribute is omitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathProps {
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub stroke_width: Option<f64>,
    pub stroke_line_cap: Option<StrokeLineCap>,
    pub stroke_line_join: Option<StrokeLineJoin>,
}

impl PathProps {
    fn render_attrs(&self, out: &mut String) {
        if let Some(fill) = &self.fill_color {
            out.push_str(&format!(" fill=\"{fill}\""));
        }
        if let Some(stroke) = &self.stroke_color {
            out.push_str(&format!(" stroke=\"{stroke}\""));
        }
        if let Some(width) = self.stroke_width {
            out.push_str(&format!(" stroke-width=\"{width}\""));
        }
        if let Some(cap) = self.stroke_line_cap {
            out.push_str(&format!(" stroke-linecap=\"{cap}\""));
        }
        if let Some(join) = self.stroke_line_join {
            out.push_str(&format!(" stroke-linejoin=\"{join}\""));
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub props: PathProps,
}

impl Circle {
    pub fn new() -> Self {
        Self {
            radius: 1.0,
            ..Default::default()
        }
    }

    fn render(&self, out: &mut String, indent: usize) {
        out.push_str(&" ".repeat(indent));
        out.push_str(&format!(
            "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
            self.center.x, self.center.y, self.radius
        ));
        self.props.render_attrs(out);
        out.push_str("/>\n");
    }
}

impl Default for Point {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub props: PathProps,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(mut self, point: Point) -> Self {
        self.points.push(point);
        self
    }

    fn render(&self, out: &mut String, indent: usize) {
        out.push_str(&" ".repeat(indent));
        out.push_str("<polyline points=\"");
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&format!("{},{}", p.x, p.y));
        }
        out.push('"');
        self.props.render_attrs(out);
        out.push_str("/>\n");
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub position: Point,
    pub offset: Point,
    pub font_size: u32,
    pub font_family: String,
    pub font_weight: String,
    pub data: String,
    pub props: PathProps,
}

impl Text {
    pub fn new() -> Self {
        Self {
            font_size: 1,
            ..Default::default()
        }
    }

    fn render(&self, out: &mut String, indent: usize) {
        out.push_str(&" ".repeat(indent));
        out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" dx=\"{}\" dy=\"{}\" font-size=\"{}\"",
            self.position.x, self.position.y, self.offset.x, self.offset.y, self.font_size
        ));
        if !self.font_family.is_empty() {
            out.push_str(&format!(" font-family=\"{}\"", self.font_family));
        }
        if !self.font_weight.is_empty() {
            out.push_str(&format!(" font-weight=\"{}\"", self.font_weight));
        }
        self.props.render_attrs(out);
        out.push('>');
        html_encode(&self.data, out);
        out.push_str("</text>\n");
    }
}

fn html_encode(data: &str, out: &mut String) {
    for ch in data.chars() {
        match ch {
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            other => out.push(other),
        }
    }
}

/// A shape in the document tree. Each variant renders to one SVG tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle(Circle),
    Polyline(Polyline),
    Text(Text),
}

impl Shape {
    fn render(&self, out: &mut String, indent: usize) {
        match self {
            Shape::Circle(c) => c.render(out, indent),
            Shape::Polyline(p) => p.render(out, indent),
            Shape::Text(t) => t.render(out, indent),
        }
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Shape::Circle(c)
    }
}
impl From<Polyline> for Shape {
    fn from(p: Polyline) -> Self {
        Shape::Polyline(p)
    }
}
impl From<Text> for Shape {
    fn from(t: Text) -> Self {
        Shape::Text(t)
    }
}

/// An ordered collection of shapes, rendered as a complete SVG document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    objects: Vec<Shape>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, object: impl Into<Shape>) {
        self.objects.push(object.into());
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
        out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n");
        for object in &self.objects {
            object.render(&mut out, 2);
        }
        out.push_str("</svg>");
        out
    }
}
