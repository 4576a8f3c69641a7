use serde::{Deserialize, Serialize};

/// Largest coordinate difference still treated as the same position.
const LAT_LNG_MARGIN: f64 = 1.0e-9;

/// Geographic position in degrees. Values are stored as given; nothing here
/// wraps or clamps them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Latitude within ±90 and longitude within ±180
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Loose equality, tolerant of projection round trips
    pub fn equals(&self, other: &LatLng) -> bool {
        self.equals_within(other, LAT_LNG_MARGIN)
    }

    pub fn equals_within(&self, other: &LatLng, margin: f64) -> bool {
        let delta = (self.lat - other.lat)
            .abs()
            .max((self.lng - other.lng).abs());
        delta <= margin
    }
}

impl From<[f64; 2]> for LatLng {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self::new(lat, lng)
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

/// Pixel coordinate or pixel extent. Arithmetic returns a new point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        self.map2(other, |a, b| a + b)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        self.map2(other, |a, b| a - b)
    }

    pub fn divide_by(&self, divisor: f64) -> Point {
        self.map(|v| v / divisor)
    }

    pub fn floor(&self) -> Point {
        self.map(f64::floor)
    }

    pub fn round(&self) -> Point {
        self.map(f64::round)
    }

    /// Rounds each axis toward zero
    pub fn trunc(&self) -> Point {
        self.map(f64::trunc)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Point {
        Point::new(f(self.x), f(self.y))
    }

    fn map2(&self, other: &Point, f: impl Fn(f64, f64) -> f64) -> Point {
        Point::new(f(self.x, other.x), f(self.y, other.y))
    }
}

/// Axis-aligned geographic rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Bounds collapsed onto a single coordinate
    pub fn from_point(point: LatLng) -> Self {
        Self::new(point, point)
    }

    /// Edges count as inside
    pub fn contains(&self, point: &LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_from_pairs() {
        let coord = LatLng::from([40.7128, -74.0060]);
        assert_eq!(coord, LatLng::new(40.7128, -74.0060));
        assert_eq!(LatLng::from((40.7128, -74.0060)), coord);
        assert!(coord.is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
    }

    #[test]
    fn test_lat_lng_equals_margin() {
        let a = LatLng::new(55.0, 37.0);
        assert!(a.equals(&LatLng::new(55.0 + 1.0e-10, 37.0)));
        assert!(!a.equals(&LatLng::new(55.001, 37.0)));
        assert!(a.equals_within(&LatLng::new(55.001, 37.0), 0.01));
    }

    #[test]
    fn test_point_arithmetic_returns_new_points() {
        let size = Point::new(25.0, 41.0);
        let half = size.divide_by(2.0);

        assert_eq!(size, Point::new(25.0, 41.0));
        assert_eq!(half, Point::new(12.5, 20.5));
        assert_eq!(half.trunc(), Point::new(12.0, 20.0));
        assert_eq!(half.round(), Point::new(13.0, 21.0));
        assert_eq!(Point::new(-12.5, 3.7).trunc(), Point::new(-12.0, 3.0));
        assert_eq!(half.add(&half).subtract(&size), Point::default());
    }

    #[test]
    fn test_bounds_contains_its_edges() {
        let bounds = LatLngBounds::new(LatLng::new(40.0, -75.0), LatLng::new(41.0, -73.0));

        assert!(bounds.contains(&LatLng::new(40.5, -74.0)));
        assert!(bounds.contains(&LatLng::new(41.0, -73.0)));
        assert!(!bounds.contains(&LatLng::new(42.0, -74.0)));
        assert_eq!(
            LatLngBounds::from_point(LatLng::new(1.0, 2.0)).center(),
            LatLng::new(1.0, 2.0)
        );
    }
}
