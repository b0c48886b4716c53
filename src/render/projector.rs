//! Min-max equirectangular projection from geographic coordinates to SVG
//! pixel space.

use crate::geo::Coordinates;

const ZERO_TOLERANCE: f64 = 1e-6;

fn is_zero(value: f64) -> bool {
    value.abs() < ZERO_TOLERANCE
}

/// Maps a bounded set of coordinates onto a `(width, height)` viewport with
/// uniform `padding` on every side, preserving aspect ratio. Built once from
/// the full set of points a render pass will need, then reused per point.
pub struct SphereProjector {
    min_lon: f64,
    max_lat: f64,
    zoom: f64,
    padding: f64,
}

impl SphereProjector {
    pub fn new(
        points: impl Iterator<Item = Coordinates>,
        width: f64,
        height: f64,
        padding: f64,
    ) -> Self {
        let mut min_lon = f64::INFINITY;
        let mut max_lon = f64::NEG_INFINITY;
        let mut min_lat = f64::INFINITY;
        let mut max_lat = f64::NEG_INFINITY;
        let mut any = false;

        for point in points {
            any = true;
            min_lon = min_lon.min(point.longitude);
            max_lon = max_lon.max(point.longitude);
            min_lat = min_lat.min(point.latitude);
            max_lat = max_lat.max(point.latitude);
        }

        if !any {
            return Self {
                min_lon: 0.0,
                max_lat: 0.0,
                zoom: 0.0,
                padding,
            };
        }

        let lon_span = max_lon - min_lon;
        let lat_span = max_lat - min_lat;

        let zoom_x = if !is_zero(lon_span) {
            Some((width - 2.0 * padding) / lon_span)
        } else {
            None
        };
        let zoom_y = if !is_zero(lat_span) {
            Some((height - 2.0 * padding) / lat_span)
        } else {
            None
        };

        let zoom = match (zoom_x, zoom_y) {
            (Some(x), Some(y)) => x.min(y),
            (Some(x), None) => x,
            (None, Some(y)) => y,
            (None, None) => 0.0,
        };

        Self {
            min_lon,
            max_lat,
            zoom,
            padding,
        }
    }

    pub fn project(&self, coordinates: Coordinates) -> (f64, f64) {
        let x = (coordinates.longitude - self.min_lon) * self.zoom + self.padding;
        let y = (self.max_lat - coordinates.latitude) * self.zoom + self.padding;
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_point_set_maps_everything_to_padding() {
        let sp = SphereProjector::new(std::iter::empty(), 600.0, 400.0, 50.0);
        let (x, y) = sp.project(Coordinates::new(10.0, 20.0));
        assert_eq!((x, y), (50.0, 50.0));
    }

    #[test]
    fn single_point_maps_to_padding_corner() {
        let point = Coordinates::new(43.0, 39.0);
        let sp = SphereProjector::new(std::iter::once(point), 600.0, 400.0, 50.0);
        let (x, y) = sp.project(point);
        assert_eq!((x, y), (50.0, 50.0));
    }

    #[test]
    fn zoom_takes_the_smaller_of_the_two_axes() {
        let points = vec![
            Coordinates::new(0.0, 0.0),
            Coordinates::new(10.0, 100.0),
        ];
        let sp = SphereProjector::new(points.into_iter(), 600.0, 400.0, 0.0);
        // lon span 100 -> zoom_x = 600/100 = 6; lat span 10 -> zoom_y = 400/10 = 40.
        assert!((sp.zoom - 6.0).abs() < 1e-9);
    }
}
