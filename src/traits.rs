//! Shared trait abstractions for the seams between the map and its layers

use crate::core::geo::{LatLng, Point};

/// Coordinate transforms the map supplies to its layers.
///
/// Layer points are relative to the map's pixel origin; container points are
/// relative to the top-left corner of the map container.
pub trait Projection {
    /// Transform geographic coordinates to layer pixel coordinates
    fn lat_lng_to_layer_point(&self, lat_lng: &LatLng) -> Point;

    /// Transform layer pixel coordinates to container coordinates
    fn layer_point_to_container_point(&self, point: &Point) -> Point;

    /// Transform container coordinates (for example a pointer position) to
    /// geographic coordinates
    fn container_point_to_lat_lng(&self, point: &Point) -> LatLng;

    fn lat_lng_to_container_point(&self, lat_lng: &LatLng) -> Point {
        self.layer_point_to_container_point(&self.lat_lng_to_layer_point(lat_lng))
    }
}

/// Trait for viewport-aware components
/// Standardizes viewport change handling
pub trait ViewportAware {
    /// Handle viewport changes
    fn on_viewport_changed(&self) -> crate::Result<()>;

    /// Check if component requires viewport updates
    fn requires_viewport_updates(&self) -> bool {
        true
    }
}

/// A layer that receives raw input landing on one of its elements.
///
/// Layers register themselves with [`crate::Map::register_target`] when
/// mounted and unregister when removed.
pub trait InteractiveTarget {
    /// Handles input aimed at one of the target's elements and returns
    /// whether dispatch stops before the map's own listeners
    fn handle_dom_event(
        &self,
        map: &crate::Map,
        event: &crate::input::events::DomEvent,
    ) -> crate::Result<bool>;
}
