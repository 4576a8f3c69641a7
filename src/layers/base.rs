use crate::{
    core::{geo::LatLngBounds, map::Map},
    traits::ViewportAware,
    Result,
};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique layer identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(u64);

impl LayerId {
    pub fn next() -> Self {
        LayerId(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Marker,
    Custom,
}

impl fmt::Display for LayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerType::Marker => write!(f, "marker"),
            LayerType::Custom => write!(f, "custom"),
        }
    }
}

/// Operations the map drives on the layers it holds.
///
/// Layers are handles with interior mutability, so every method takes
/// `&self`; the map keeps one shared handle per added layer.
pub trait LayerOperations: ViewportAware {
    /// Get layer ID
    fn id(&self) -> LayerId;

    /// Get layer type
    fn layer_type(&self) -> LayerType;

    /// Called by the map right after the layer was registered
    fn on_add(&self, map: &Map) -> Result<()>;

    /// Called by the map right after the layer was unregistered
    fn on_remove(&self, map: &Map) -> Result<()>;

    /// Get layer bounds if applicable
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Get layer options
    fn options(&self) -> serde_json::Value;

    /// Merge layer options
    fn set_options(&self, options: serde_json::Value) -> Result<()>;

    /// Dynamic casting support
    fn as_any(&self) -> &dyn std::any::Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_ids_are_unique() {
        let a = LayerId::next();
        let b = LayerId::next();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn test_layer_type_display() {
        assert_eq!(LayerType::Marker.to_string(), "marker");
        assert_eq!(LayerType::Custom.to_string(), "custom");
    }
}
