//! Icon definitions.
//!
//! An [`Icon`] is immutable once built. All sizes and anchors are validated
//! and normalized at construction, so a misconfigured icon fails before any
//! marker renders it. Markers share icons through `Rc<Icon>`.

use crate::core::constants::{
    DEFAULT_ICON_ALT, DEFAULT_ICON_RETINA_URL, DEFAULT_ICON_URL, DEFAULT_IMAGE_PATH,
    DEFAULT_SHADOW_URL, MARKER_ICON_ANCHOR, MARKER_ICON_SIZE, MARKER_POPUP_ANCHOR,
    MARKER_SHADOW_SIZE, MARKER_TOOLTIP_ANCHOR,
};
use crate::core::geo::Point;
use crate::core::geometry::{compute_anchor, normalize_optional, IconSizeSpec};
use crate::{MapError, Result};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Options of the built-in default icon
pub static DEFAULT_ICON_OPTIONS: Lazy<IconOptions> = Lazy::new(|| IconOptions {
    icon_url: Some(DEFAULT_ICON_URL.to_string()),
    icon_retina_url: Some(DEFAULT_ICON_RETINA_URL.to_string()),
    icon_size: Some(pair(MARKER_ICON_SIZE)),
    icon_anchor: Some(pair(MARKER_ICON_ANCHOR)),
    popup_anchor: Some(pair(MARKER_POPUP_ANCHOR)),
    tooltip_anchor: Some(pair(MARKER_TOOLTIP_ANCHOR)),
    shadow_url: Some(DEFAULT_SHADOW_URL.to_string()),
    shadow_size: Some(pair(MARKER_SHADOW_SIZE)),
    ..IconOptions::default()
});

/// Image path prefix for default icons; frozen by first use
static DEFAULT_IMAGE_PATH_CELL: OnceCell<String> = OnceCell::new();

thread_local! {
    static SHARED_DEFAULT_ICON: Rc<Icon> = Rc::new(Icon::default_icon());
}

fn pair((x, y): (f64, f64)) -> IconSizeSpec {
    IconSizeSpec::Pair(vec![x, y])
}

/// The two visuals an icon can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Icon,
    Shadow,
}

/// Icon configuration as users write it.
///
/// Keys are camelCase when (de)serialized; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IconOptions {
    pub icon_url: Option<String>,
    pub icon_retina_url: Option<String>,
    pub icon_size: Option<IconSizeSpec>,
    pub icon_anchor: Option<IconSizeSpec>,
    pub popup_anchor: Option<IconSizeSpec>,
    pub tooltip_anchor: Option<IconSizeSpec>,
    pub shadow_url: Option<String>,
    pub shadow_retina_url: Option<String>,
    pub shadow_size: Option<IconSizeSpec>,
    pub shadow_anchor: Option<IconSizeSpec>,
    pub class_name: Option<String>,
    pub alt: Option<String>,
    pub tab_index: Option<i32>,
    pub cross_origin: Option<String>,
    /// Overrides the process-wide image path of default icons
    pub image_path: Option<String>,
}

const GEOMETRY_KEYS: [&str; 6] = [
    "iconSize",
    "iconAnchor",
    "popupAnchor",
    "tooltipAnchor",
    "shadowSize",
    "shadowAnchor",
];

impl IconOptions {
    pub fn new(icon_url: impl Into<String>) -> Self {
        Self {
            icon_url: Some(icon_url.into()),
            ..Self::default()
        }
    }

    /// Parses JSON options. Malformed size or anchor values are reported as
    /// [`MapError::InvalidGeometry`] rather than a generic parse error.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        if let serde_json::Value::Object(fields) = &value {
            for key in GEOMETRY_KEYS {
                match fields.get(key) {
                    None | Some(serde_json::Value::Null) => {}
                    Some(raw) => {
                        IconSizeSpec::from_value(raw).map_err(|err| match err {
                            MapError::InvalidGeometry(reason) => {
                                MapError::InvalidGeometry(format!("{key}: {reason}"))
                            }
                            other => other,
                        })?;
                    }
                }
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_icon_size(mut self, size: impl Into<IconSizeSpec>) -> Self {
        self.icon_size = Some(size.into());
        self
    }

    pub fn with_icon_anchor(mut self, anchor: impl Into<IconSizeSpec>) -> Self {
        self.icon_anchor = Some(anchor.into());
        self
    }

    pub fn with_shadow(mut self, url: impl Into<String>) -> Self {
        self.shadow_url = Some(url.into());
        self
    }

    pub fn with_shadow_size(mut self, size: impl Into<IconSizeSpec>) -> Self {
        self.shadow_size = Some(size.into());
        self
    }

    pub fn with_shadow_anchor(mut self, anchor: impl Into<IconSizeSpec>) -> Self {
        self.shadow_anchor = Some(anchor.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    pub fn with_tab_index(mut self, tab_index: i32) -> Self {
        self.tab_index = Some(tab_index);
        self
    }

    /// `self`'s fields win, `base` fills the gaps
    fn merged_over(&self, base: &IconOptions) -> IconOptions {
        fn pick<T: Clone>(own: &Option<T>, base: &Option<T>) -> Option<T> {
            own.clone().or_else(|| base.clone())
        }

        IconOptions {
            icon_url: pick(&self.icon_url, &base.icon_url),
            icon_retina_url: pick(&self.icon_retina_url, &base.icon_retina_url),
            icon_size: pick(&self.icon_size, &base.icon_size),
            icon_anchor: pick(&self.icon_anchor, &base.icon_anchor),
            popup_anchor: pick(&self.popup_anchor, &base.popup_anchor),
            tooltip_anchor: pick(&self.tooltip_anchor, &base.tooltip_anchor),
            shadow_url: pick(&self.shadow_url, &base.shadow_url),
            shadow_retina_url: pick(&self.shadow_retina_url, &base.shadow_retina_url),
            shadow_size: pick(&self.shadow_size, &base.shadow_size),
            shadow_anchor: pick(&self.shadow_anchor, &base.shadow_anchor),
            class_name: pick(&self.class_name, &base.class_name),
            alt: pick(&self.alt, &base.alt),
            tab_index: pick(&self.tab_index, &base.tab_index),
            cross_origin: pick(&self.cross_origin, &base.cross_origin),
            image_path: pick(&self.image_path, &base.image_path),
        }
    }
}

/// Sizes and anchors with every default applied
#[derive(Debug, Clone, PartialEq)]
struct IconGeometry {
    icon_size: Option<Point>,
    icon_anchor: Option<Point>,
    shadow_size: Option<Point>,
    shadow_anchor: Option<Point>,
    popup_anchor: Option<Point>,
    tooltip_anchor: Option<Point>,
}

impl IconGeometry {
    fn resolve(options: &IconOptions) -> Result<Self> {
        let icon_size = normalize_optional(options.icon_size.as_ref())?;
        let shadow_size = normalize_optional(options.shadow_size.as_ref())?;
        // A shadow without its own anchor lines up with the icon's.
        let shadow_anchor_spec = options
            .shadow_anchor
            .as_ref()
            .or(options.icon_anchor.as_ref());

        Ok(Self {
            icon_size,
            icon_anchor: compute_anchor(icon_size, options.icon_anchor.as_ref())?,
            shadow_size,
            shadow_anchor: compute_anchor(shadow_size, shadow_anchor_spec)?,
            popup_anchor: normalize_optional(options.popup_anchor.as_ref())?,
            tooltip_anchor: normalize_optional(options.tooltip_anchor.as_ref())?,
        })
    }

    fn builtin() -> Self {
        let point = |(x, y): (f64, f64)| Some(Point::new(x, y));
        Self {
            icon_size: point(MARKER_ICON_SIZE),
            icon_anchor: point(MARKER_ICON_ANCHOR),
            shadow_size: point(MARKER_SHADOW_SIZE),
            shadow_anchor: point(MARKER_ICON_ANCHOR),
            popup_anchor: point(MARKER_POPUP_ANCHOR),
            tooltip_anchor: point(MARKER_TOOLTIP_ANCHOR),
        }
    }
}

/// Validated options plus their resolved geometry
#[derive(Debug, Clone, PartialEq)]
pub struct IconDefinition {
    options: IconOptions,
    geometry: IconGeometry,
}

impl IconDefinition {
    fn new(options: IconOptions) -> Result<Self> {
        if options.icon_url.as_deref().map_or(true, str::is_empty) {
            return Err(MapError::MissingIconUrl);
        }
        let geometry = IconGeometry::resolve(&options)?;
        Ok(Self { options, geometry })
    }

    pub fn options(&self) -> &IconOptions {
        &self.options
    }
}

/// Everything needed to render one visual of an icon
#[derive(Debug, Clone, PartialEq)]
pub struct IconDescriptor {
    pub kind: IconKind,
    pub url: String,
    /// Absent means the image keeps its intrinsic size
    pub size: Option<Point>,
    pub anchor: Option<Point>,
    pub class_name: Option<String>,
    pub alt: String,
    pub tab_index: Option<i32>,
    pub cross_origin: Option<String>,
}

/// An icon definition. `Default` resolves its URLs against the image path
/// and fills unset options from [`DEFAULT_ICON_OPTIONS`]; `Custom` uses its
/// options as given.
#[derive(Debug, Clone, PartialEq)]
pub enum Icon {
    Default(IconDefinition),
    Custom(IconDefinition),
}

impl Icon {
    /// A custom icon; `icon_url` is required
    pub fn new(options: IconOptions) -> Result<Self> {
        IconDefinition::new(options).map(Icon::Custom)
    }

    /// The built-in default icon
    pub fn default_icon() -> Self {
        Icon::Default(IconDefinition {
            options: DEFAULT_ICON_OPTIONS.clone(),
            geometry: IconGeometry::builtin(),
        })
    }

    /// The default icon with some options replaced
    pub fn default_with(overrides: IconOptions) -> Result<Self> {
        IconDefinition::new(overrides.merged_over(&DEFAULT_ICON_OPTIONS)).map(Icon::Default)
    }

    /// `Custom` when options are given, otherwise the default icon
    pub fn from_options(options: Option<IconOptions>) -> Result<Self> {
        match options {
            Some(options) => Self::new(options),
            None => Ok(Self::default_icon()),
        }
    }

    /// The default icon instance shared by every marker created without one
    pub fn shared_default() -> Rc<Icon> {
        SHARED_DEFAULT_ICON.with(Rc::clone)
    }

    /// Sets the process-wide image path of default icons. Only allowed before
    /// any default icon resolved a URL.
    pub fn set_default_image_path(path: impl Into<String>) -> Result<()> {
        DEFAULT_IMAGE_PATH_CELL.set(path.into()).map_err(|_| {
            MapError::IllegalState("default icon image path is already in use".to_string())
        })
    }

    pub fn default_image_path() -> &'static str {
        DEFAULT_IMAGE_PATH_CELL.get_or_init(|| DEFAULT_IMAGE_PATH.to_string())
    }

    fn definition(&self) -> &IconDefinition {
        match self {
            Icon::Default(definition) | Icon::Custom(definition) => definition,
        }
    }

    pub fn options(&self) -> &IconOptions {
        &self.definition().options
    }

    pub fn is_default(&self) -> bool {
        matches!(self, Icon::Default(_))
    }

    pub fn popup_anchor(&self) -> Option<Point> {
        self.definition().geometry.popup_anchor
    }

    pub fn tooltip_anchor(&self) -> Option<Point> {
        self.definition().geometry.tooltip_anchor
    }

    /// Resolved image URL for `kind`; `None` for a shadow that is not configured
    pub fn url(&self, kind: IconKind, retina: bool) -> Option<String> {
        let options = self.options();
        let (url, retina_url) = match kind {
            IconKind::Icon => (&options.icon_url, &options.icon_retina_url),
            IconKind::Shadow => (&options.shadow_url, &options.shadow_retina_url),
        };
        let chosen = if retina {
            retina_url.as_ref().or(url.as_ref())
        } else {
            url.as_ref()
        }?;

        Some(match self {
            Icon::Default(definition) => {
                let prefix: &str = match &definition.options.image_path {
                    Some(path) => path,
                    None => Self::default_image_path(),
                };
                format!("{prefix}{chosen}")
            }
            Icon::Custom(_) => chosen.clone(),
        })
    }

    /// Describes one visual at normal pixel density
    pub fn describe(&self, kind: IconKind) -> Option<IconDescriptor> {
        self.describe_for(kind, false)
    }

    /// Describes one visual; `None` for a shadow that is not configured
    pub fn describe_for(&self, kind: IconKind, retina: bool) -> Option<IconDescriptor> {
        let url = self.url(kind, retina)?;
        let options = self.options();
        let geometry = &self.definition().geometry;

        Some(match kind {
            IconKind::Icon => IconDescriptor {
                kind,
                url,
                size: geometry.icon_size,
                anchor: geometry.icon_anchor,
                class_name: options.class_name.clone(),
                alt: options
                    .alt
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ICON_ALT.to_string()),
                tab_index: options.tab_index,
                cross_origin: options.cross_origin.clone(),
            },
            IconKind::Shadow => IconDescriptor {
                kind,
                url,
                size: geometry.shadow_size,
                anchor: geometry.shadow_anchor,
                class_name: options.class_name.clone(),
                alt: String::new(),
                tab_index: None,
                cross_origin: options.cross_origin.clone(),
            },
        })
    }
}

impl Default for Icon {
    fn default() -> Self {
        Self::default_icon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_icon_url_is_rejected() {
        assert!(matches!(
            Icon::new(IconOptions::default()),
            Err(MapError::MissingIconUrl)
        ));
        assert!(matches!(
            Icon::new(IconOptions::new("")),
            Err(MapError::MissingIconUrl)
        ));
    }

    #[test]
    fn test_describe_icon_defaults() {
        let icon = Icon::new(IconOptions::new("pin.png").with_icon_size(96.0)).unwrap();
        let described = icon.describe(IconKind::Icon).unwrap();

        assert_eq!(described.url, "pin.png");
        assert_eq!(described.size, Some(Point::new(96.0, 96.0)));
        assert_eq!(described.anchor, Some(Point::new(48.0, 48.0)));
        assert_eq!(described.alt, "Marker");
        assert_eq!(described.tab_index, None);
    }

    #[test]
    fn test_no_size_means_no_anchor() {
        let icon = Icon::new(IconOptions::new("pin.png")).unwrap();
        let described = icon.describe(IconKind::Icon).unwrap();

        assert_eq!(described.size, None);
        assert_eq!(described.anchor, None);
    }

    #[test]
    fn test_shadow_is_omitted_without_url() {
        let icon = Icon::new(IconOptions::new("pin.png").with_shadow_size(10.0)).unwrap();
        assert!(icon.describe(IconKind::Shadow).is_none());
    }

    #[test]
    fn test_shadow_anchor_falls_back_to_icon_anchor() {
        let icon = Icon::new(
            IconOptions::new("pin.png")
                .with_icon_anchor([5.0, 30.0])
                .with_shadow("pin-shadow.png")
                .with_shadow_size([40.0, 30.0]),
        )
        .unwrap();
        let shadow = icon.describe(IconKind::Shadow).unwrap();

        assert_eq!(shadow.anchor, Some(Point::new(5.0, 30.0)));
        assert_eq!(shadow.alt, "");
        assert_eq!(shadow.tab_index, None);
    }

    #[test]
    fn test_default_icon_resolves_against_image_path() {
        let icon = Icon::default_icon();
        let prefix = Icon::default_image_path();

        let described = icon.describe(IconKind::Icon).unwrap();
        assert_eq!(described.url, format!("{prefix}marker-icon.png"));
        assert_eq!(described.size, Some(Point::new(25.0, 41.0)));
        assert_eq!(described.anchor, Some(Point::new(12.0, 41.0)));

        let shadow = icon.describe(IconKind::Shadow).unwrap();
        assert_eq!(shadow.url, format!("{prefix}marker-shadow.png"));
        assert_eq!(shadow.size, Some(Point::new(41.0, 41.0)));

        let retina = icon.describe_for(IconKind::Icon, true).unwrap();
        assert_eq!(retina.url, format!("{prefix}marker-icon-2x.png"));
        assert_eq!(icon.popup_anchor(), Some(Point::new(1.0, -34.0)));
    }

    #[test]
    fn test_builtin_geometry_matches_resolved_defaults() {
        let resolved = IconGeometry::resolve(&DEFAULT_ICON_OPTIONS).unwrap();
        assert_eq!(resolved, IconGeometry::builtin());
    }

    #[test]
    fn test_default_with_overrides() {
        let icon = Icon::default_with(IconOptions {
            icon_url: Some("marker-icon.png?2".to_string()),
            image_path: Some("/static/".to_string()),
            ..IconOptions::default()
        })
        .unwrap();

        assert!(icon.is_default());
        assert_eq!(
            icon.url(IconKind::Icon, false).as_deref(),
            Some("/static/marker-icon.png?2")
        );
        assert_eq!(
            icon.describe(IconKind::Icon).unwrap().size,
            Some(Point::new(25.0, 41.0))
        );
    }

    #[test]
    fn test_image_path_is_frozen_after_use() {
        let _ = Icon::default_image_path();
        assert!(matches!(
            Icon::set_default_image_path("/elsewhere/"),
            Err(MapError::IllegalState(_))
        ));
    }

    #[test]
    fn test_from_value_validates_geometry() {
        let options = IconOptions::from_value(json!({
            "iconUrl": "pin.png",
            "iconSize": [96, 100],
            "riseOnHover": true
        }))
        .unwrap();
        assert_eq!(options.icon_size, Some(IconSizeSpec::Pair(vec![96.0, 100.0])));

        let err = IconOptions::from_value(json!({"iconUrl": "pin.png", "iconSize": "big"}));
        assert!(matches!(err, Err(MapError::InvalidGeometry(_))));
    }

    #[test]
    fn test_bad_pair_fails_at_construction() {
        let options = IconOptions::new("pin.png").with_icon_size(IconSizeSpec::Pair(vec![1.0]));
        assert!(matches!(
            Icon::new(options),
            Err(MapError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_shared_default_is_one_instance() {
        assert!(Rc::ptr_eq(&Icon::shared_default(), &Icon::shared_default()));
    }
}
