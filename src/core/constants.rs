//! Core constants derived from Leaflet defaults and common web-map conventions.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Marker icon default size (regular PNG).
pub const MARKER_ICON_SIZE: (f64, f64) = (25.0, 41.0);

/// Anchor inside the icon (hot-spot) in pixel coords.
pub const MARKER_ICON_ANCHOR: (f64, f64) = (12.0, 41.0);

/// Where popups open relative to the anchor.
pub const MARKER_POPUP_ANCHOR: (f64, f64) = (1.0, -34.0);

/// Where tooltips open relative to the anchor.
pub const MARKER_TOOLTIP_ANCHOR: (f64, f64) = (16.0, -28.0);

/// Default shadow size.
pub const MARKER_SHADOW_SIZE: (f64, f64) = (41.0, 41.0);

pub const DEFAULT_ICON_URL: &str = "marker-icon.png";
pub const DEFAULT_ICON_RETINA_URL: &str = "marker-icon-2x.png";
pub const DEFAULT_SHADOW_URL: &str = "marker-shadow.png";

/// Prefix for the default icon's image URLs unless overridden.
pub const DEFAULT_IMAGE_PATH: &str = "images/";

/// alt text of an icon that does not configure one.
pub const DEFAULT_ICON_ALT: &str = "Marker";

/// z-index bump applied while a `rise_on_hover` marker is hovered.
pub const DEFAULT_RISE_OFFSET: i32 = 250;

// Element classes
pub const ICON_CLASS: &str = "maplet-marker-icon";
pub const SHADOW_CLASS: &str = "maplet-marker-shadow";
pub const INTERACTIVE_CLASS: &str = "maplet-interactive";
pub const ZOOM_ANIMATED_CLASS: &str = "maplet-zoom-animated";

// Standard panes and their stacking order
pub const TILE_PANE: &str = "tilePane";
pub const OVERLAY_PANE: &str = "overlayPane";
pub const SHADOW_PANE: &str = "shadowPane";
pub const MARKER_PANE: &str = "markerPane";
pub const TOOLTIP_PANE: &str = "tooltipPane";
pub const POPUP_PANE: &str = "popupPane";

pub const STANDARD_PANES: [(&str, i32); 6] = [
    (TILE_PANE, 200),
    (OVERLAY_PANE, 400),
    (SHADOW_PANE, 500),
    (MARKER_PANE, 600),
    (TOOLTIP_PANE, 650),
    (POPUP_PANE, 700),
];
