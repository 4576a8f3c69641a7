//! Options for maps and markers.
//!
//! Both deserialize from camelCase JSON with defaults for every missing key;
//! unknown keys are ignored.

use crate::core::constants::{DEFAULT_RISE_OFFSET, MARKER_PANE, SHADOW_PANE};
use crate::core::geo::{LatLng, Point};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: f64,
    /// Container size in pixels
    pub size: Point,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
    /// Use retina image URLs where an icon provides them
    pub retina: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: LatLng::default(),
            zoom: 0.0,
            size: Point::new(800.0, 600.0),
            min_zoom: None,
            max_zoom: None,
            retina: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarkerOptions {
    /// Make the icon focusable (tab index 0, role `button`) when the icon
    /// does not set its own tab index
    pub keyboard: bool,
    /// Tooltip text for the icon element
    pub title: Option<String>,
    /// Overrides the icon definition's alt text
    pub alt: Option<String>,
    pub z_index_offset: i32,
    pub opacity: f64,
    pub rise_on_hover: bool,
    pub rise_offset: i32,
    pub pane: String,
    pub shadow_pane: String,
    /// When false the marker registers no event target and the map sees
    /// pointer events on its element as its own
    pub interactive: bool,
    /// Let every event type bubble to the map after the marker handled it
    pub bubbling_mouse_events: bool,
    pub draggable: bool,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            keyboard: true,
            title: None,
            alt: None,
            z_index_offset: 0,
            opacity: 1.0,
            rise_on_hover: false,
            rise_offset: DEFAULT_RISE_OFFSET,
            pane: MARKER_PANE.to_string(),
            shadow_pane: SHADOW_PANE.to_string(),
            interactive: true,
            bubbling_mouse_events: false,
            draggable: false,
        }
    }
}

impl MarkerOptions {
    /// Returns a copy with the fields present in `patch` replaced
    pub fn merged(&self, patch: serde_json::Value) -> crate::Result<Self> {
        let mut current = serde_json::to_value(self)?;
        if let (serde_json::Value::Object(target), serde_json::Value::Object(fields)) =
            (&mut current, patch)
        {
            for (key, value) in fields {
                target.insert(key, value);
            }
        }
        Ok(serde_json::from_value(current)?)
    }
}
