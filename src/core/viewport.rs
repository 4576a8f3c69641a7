//! Spherical Web Mercator view used to place markers.
//!
//! Three coordinate spaces are involved:
//!
//! * world pixels: the projected coordinate at the current zoom, with the
//!   whole world spanning `TILE_SIZE * 2^zoom` pixels
//! * layer points: world pixels minus the pixel origin, which is the
//!   floored world position of the view center
//! * container points: layer points shifted by half the container size,
//!   so the view center sits in the middle of the container

use crate::core::constants::TILE_SIZE;
use crate::core::geo::{LatLng, LatLngBounds, Point};
use crate::traits::Projection;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

const MAX_LATITUDE: f64 = 85.0511287798;
const ZOOM_RANGE: (f64, f64) = (0.0, 18.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    /// Container size in pixels
    pub size: Point,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pixel_origin: Point,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        let mut viewport = Self {
            center: clamp_to_world(center),
            zoom: zoom.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1),
            size,
            min_zoom: ZOOM_RANGE.0,
            max_zoom: ZOOM_RANGE.1,
            pixel_origin: Point::default(),
        };
        viewport.refresh_origin();
        viewport
    }

    pub fn set_center(&mut self, center: LatLng) {
        self.center = clamp_to_world(center);
        self.refresh_origin();
    }

    /// Clamped to the zoom limits
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.refresh_origin();
    }

    pub fn set_size(&mut self, size: Point) {
        self.size = size;
    }

    /// Re-clamps the current zoom into the new limits
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        self.min_zoom = min_zoom.min(max_zoom);
        self.max_zoom = max_zoom.max(min_zoom);
        self.set_zoom(self.zoom);
    }

    /// World width in pixels at the current zoom
    pub fn world_size(&self) -> f64 {
        TILE_SIZE as f64 * 2_f64.powf(self.zoom)
    }

    pub fn pixel_origin(&self) -> Point {
        self.pixel_origin
    }

    /// Geographic coordinate to world pixels
    pub fn project(&self, lat_lng: &LatLng) -> Point {
        let world = self.world_size();
        let sin = lat_lng
            .lat
            .clamp(-MAX_LATITUDE, MAX_LATITUDE)
            .to_radians()
            .sin();

        Point::new(
            (lat_lng.lng + 180.0) / 360.0 * world,
            (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * world,
        )
    }

    /// World pixels to geographic coordinate
    pub fn unproject(&self, world_point: &Point) -> LatLng {
        let world = self.world_size();
        let n = PI * (1.0 - 2.0 * world_point.y / world);

        LatLng::new(
            n.sinh().atan().to_degrees(),
            world_point.x / world * 360.0 - 180.0,
        )
    }

    fn refresh_origin(&mut self) {
        self.pixel_origin = self.project(&self.center).floor();
    }

    pub fn lat_lng_to_layer_point(&self, lat_lng: &LatLng) -> Point {
        self.project(lat_lng).subtract(&self.pixel_origin)
    }

    pub fn layer_point_to_lat_lng(&self, point: &Point) -> LatLng {
        self.unproject(&point.add(&self.pixel_origin))
    }

    pub fn layer_point_to_container_point(&self, point: &Point) -> Point {
        point.add(&self.half_size())
    }

    pub fn container_point_to_layer_point(&self, point: &Point) -> Point {
        point.subtract(&self.half_size())
    }

    fn half_size(&self) -> Point {
        self.size.divide_by(2.0)
    }

    /// Geographic extent of the container
    pub fn bounds(&self) -> LatLngBounds {
        let top_left = self.container_point_to_lat_lng(&Point::default());
        let bottom_right = self.container_point_to_lat_lng(&self.size);

        LatLngBounds::new(
            LatLng::new(bottom_right.lat, top_left.lng),
            LatLng::new(top_left.lat, bottom_right.lng),
        )
    }
}

fn clamp_to_world(lat_lng: LatLng) -> LatLng {
    LatLng::new(
        lat_lng.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE),
        lat_lng.lng.clamp(-180.0, 180.0),
    )
}

impl Projection for Viewport {
    fn lat_lng_to_layer_point(&self, lat_lng: &LatLng) -> Point {
        Viewport::lat_lng_to_layer_point(self, lat_lng)
    }

    fn layer_point_to_container_point(&self, point: &Point) -> Point {
        Viewport::layer_point_to_container_point(self, point)
    }

    fn container_point_to_lat_lng(&self, point: &Point) -> LatLng {
        self.layer_point_to_lat_lng(&self.container_point_to_layer_point(point))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::default(), 0.0, Point::new(800.0, 600.0))
    }
}
