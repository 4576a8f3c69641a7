//! Prelude module for common maplet-markers types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use maplet_markers::prelude::*;`

pub use crate::core::{
    config::{MapOptions, MarkerOptions},
    geo::{LatLng, LatLngBounds, Point},
    geometry::{compute_anchor, normalize_size, IconSizeSpec},
    map::{DispatchOutcome, Map},
    viewport::Viewport,
};

pub use crate::layers::{
    base::{LayerId, LayerOperations, LayerType},
    icon::{Icon, IconDescriptor, IconKind, IconOptions},
    marker::Marker,
    visual::{ElementChange, ElementRole, RenderOutcome},
};

pub use crate::input::{
    evented::{Evented, ListenerId},
    events::{DomEvent, Event, EventTarget, EventType, KeyCode, KeyModifiers, MouseButton},
    propagation::{Propagation, PropagationPolicy},
};

pub use crate::rendering::{
    element::{Attribute, VisualElement},
    pane::Pane,
};

pub use crate::traits::{InteractiveTarget, Projection, ViewportAware};

pub use crate::{Error as MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
