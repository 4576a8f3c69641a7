//! # maplet-markers
//!
//! Marker layers for maplet maps: icon definitions, the retained visual
//! elements that render them, and the rules deciding which pointer and
//! keyboard events raised on a marker reach the map.
//!
//! Everything runs on one thread. Maps, markers, panes and elements are
//! cheap `Rc` handles; cloning one yields another handle to the same object.

pub mod core;
pub mod input;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    config::{MapOptions, MarkerOptions},
    geo::{LatLng, LatLngBounds, Point},
    geometry::IconSizeSpec,
    map::{DispatchOutcome, Map},
    viewport::Viewport,
};

pub use layers::{
    base::{LayerId, LayerOperations, LayerType},
    icon::{Icon, IconDescriptor, IconKind, IconOptions},
    marker::Marker,
    visual::{ElementChange, RenderOutcome},
};

pub use input::{
    evented::{Evented, ListenerId},
    events::{DomEvent, Event, EventTarget, EventType},
    propagation::{Propagation, PropagationPolicy},
};

pub use rendering::{element::VisualElement, pane::Pane};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("iconUrl not set in icon options")]
    MissingIconUrl,

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Unknown pane: {0}")]
    UnknownPane(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Layer error: {0}")]
    Layer(String),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Installs `env_logger` as the `log` backend. Safe to call repeatedly.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(cfg!(test)).try_init();
}

/// Without the `debug` feature no backend is installed
#[cfg(not(feature = "debug"))]
pub fn init_logging() {}
