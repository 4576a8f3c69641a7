use crate::{
    core::{
        config::MarkerOptions,
        constants::{INTERACTIVE_CLASS, ZOOM_ANIMATED_CLASS},
        geo::{LatLng, LatLngBounds},
        map::{Map, WeakMap},
    },
    input::{
        evented::{Evented, ListenerId},
        events::{DomEvent, Event, EventTarget, EventType},
        propagation::PropagationPolicy,
    },
    layers::{
        base::{LayerId, LayerOperations, LayerType},
        icon::Icon,
        visual::{create_or_update, position_elements, RenderRequest, RenderTargets},
    },
    rendering::element::VisualElement,
    traits::{InteractiveTarget, Projection, ViewportAware},
    MapError, Result,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

struct MarkerState {
    lat_lng: LatLng,
    icon: Rc<Icon>,
    options: MarkerOptions,
    map: Option<WeakMap>,
    icon_element: Option<VisualElement>,
    shadow_element: Option<VisualElement>,
    /// Projected y plus the z-index offset, before any hover rise
    z_index: i32,
    hovered: bool,
}

struct MarkerShared {
    id: LayerId,
    state: RefCell<MarkerState>,
    events: Evented,
}

/// A point on the map drawn as an icon and an optional shadow.
///
/// `Marker` is a handle: clones share coordinate, icon, elements and
/// listeners. Changes made while the marker is not on a map are stored and
/// show up once it is added.
#[derive(Clone)]
pub struct Marker {
    shared: Rc<MarkerShared>,
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("Marker")
            .field("id", &self.shared.id)
            .field("lat_lng", &state.lat_lng)
            .field("icon", &state.icon)
            .field("mounted", &state.icon_element.is_some())
            .finish()
    }
}

impl PartialEq for Marker {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Marker {
    /// Detached marker at `lat_lng` using the shared default icon
    pub fn new(lat_lng: impl Into<LatLng>) -> Self {
        Self {
            shared: Rc::new(MarkerShared {
                id: LayerId::next(),
                state: RefCell::new(MarkerState {
                    lat_lng: lat_lng.into(),
                    icon: Icon::shared_default(),
                    options: MarkerOptions::default(),
                    map: None,
                    icon_element: None,
                    shadow_element: None,
                    z_index: 0,
                    hovered: false,
                }),
                events: Evented::new(),
            }),
        }
    }

    /// Replaces the icon; meant for construction before the marker is added
    pub fn with_icon(self, icon: impl Into<Rc<Icon>>) -> Self {
        self.shared.state.borrow_mut().icon = icon.into();
        self
    }

    /// Replaces the options; meant for construction before the marker is added
    pub fn with_options(self, options: MarkerOptions) -> Self {
        self.shared.state.borrow_mut().options = options;
        self
    }

    pub fn id(&self) -> LayerId {
        self.shared.id
    }

    pub fn map(&self) -> Option<Map> {
        self.shared
            .state
            .borrow()
            .map
            .as_ref()
            .and_then(WeakMap::upgrade)
    }

    pub fn is_mounted(&self) -> bool {
        self.map().is_some()
    }

    /// Adds the marker to `map`, taking it off any other map first
    pub fn add_to(&self, map: &Map) -> Result<()> {
        if let Some(current) = self.map() {
            if current == *map {
                return Ok(());
            }
            current.remove_layer(self.id())?;
        }
        map.add_layer(Rc::new(self.clone()))
    }

    /// Takes the marker off its map; no-op while detached
    pub fn remove(&self) -> Result<()> {
        match self.map() {
            Some(map) => map.remove_layer(self.id()).map(|_| ()),
            None => Ok(()),
        }
    }

    pub fn lat_lng(&self) -> LatLng {
        self.shared.state.borrow().lat_lng
    }

    /// Stores the new coordinate, repositions when mounted and fires `move`
    /// with the previous and new coordinate. Fires on every call.
    pub fn set_lat_lng(&self, lat_lng: impl Into<LatLng>) -> Result<()> {
        let lat_lng = lat_lng.into();
        let old = std::mem::replace(&mut self.shared.state.borrow_mut().lat_lng, lat_lng);

        if let Some(map) = self.map() {
            self.reposition(&map)?;
        }

        let mut event =
            Event::new(EventType::Move, EventTarget::Layer(self.id())).with_lat_lng(lat_lng);
        event.old_lat_lng = Some(old);
        self.shared.events.fire(&event);
        Ok(())
    }

    pub fn icon(&self) -> Rc<Icon> {
        Rc::clone(&self.shared.state.borrow().icon)
    }

    /// Applies `icon` to the mounted elements in place. No event is fired.
    pub fn set_icon(&self, icon: impl Into<Rc<Icon>>) -> Result<()> {
        self.shared.state.borrow_mut().icon = icon.into();

        if let Some(map) = self.map() {
            self.init_icon(&map)?;
            self.reposition(&map)?;
            log::debug!("{} icon replaced", self.id());
        }
        Ok(())
    }

    pub fn icon_element(&self) -> Option<VisualElement> {
        self.shared.state.borrow().icon_element.clone()
    }

    pub fn shadow_element(&self) -> Option<VisualElement> {
        self.shared.state.borrow().shadow_element.clone()
    }

    pub fn marker_options(&self) -> MarkerOptions {
        self.shared.state.borrow().options.clone()
    }

    pub fn set_alt(&self, alt: impl Into<String>) {
        let alt = alt.into();
        let element = {
            let mut state = self.shared.state.borrow_mut();
            state.options.alt = Some(alt.clone());
            state.icon_element.clone()
        };
        if let Some(element) = element {
            element.set_alt(Some(&alt));
        }
    }

    pub fn set_title(&self, title: Option<&str>) {
        let element = {
            let mut state = self.shared.state.borrow_mut();
            state.options.title = title.map(str::to_string);
            state.icon_element.clone()
        };
        if let Some(element) = element {
            element.set_title(title);
        }
    }

    pub fn set_z_index_offset(&self, offset: i32) -> Result<()> {
        self.shared.state.borrow_mut().options.z_index_offset = offset;
        match self.map() {
            Some(map) => self.reposition(&map),
            None => Ok(()),
        }
    }

    /// Sets the opacity of both elements, clamped to `0.0..=1.0`. NaN is ignored.
    pub fn set_opacity(&self, opacity: f64) {
        if opacity.is_nan() {
            log::warn!("{} ignoring NaN opacity", self.id());
            return;
        }
        let opacity = opacity.clamp(0.0, 1.0);
        let (icon, shadow) = {
            let mut state = self.shared.state.borrow_mut();
            state.options.opacity = opacity;
            (state.icon_element.clone(), state.shadow_element.clone())
        };
        for element in icon.iter().chain(shadow.iter()) {
            element.set_opacity(opacity_style(opacity));
        }
    }

    /// Re-projects the coordinate and moves both elements there.
    ///
    /// Fails with [`MapError::IllegalState`] while the marker is detached.
    pub fn update(&self) -> Result<()> {
        let map = self
            .map()
            .ok_or_else(|| MapError::IllegalState(format!("{} is not on a map", self.id())))?;
        self.reposition(&map)
    }

    pub fn on<F>(&self, kind: EventType, callback: F) -> ListenerId
    where
        F: Fn(&Event) + 'static,
    {
        self.shared.events.on(kind, callback)
    }

    pub fn once<F>(&self, kind: EventType, callback: F) -> ListenerId
    where
        F: Fn(&Event) + 'static,
    {
        self.shared.events.once(kind, callback)
    }

    pub fn off(&self, kind: EventType, id: ListenerId) -> bool {
        self.shared.events.off(kind, id)
    }

    pub fn listens(&self, kind: EventType) -> bool {
        self.shared.events.listens(kind)
    }

    /// Fires `event` on this marker's listeners only
    pub fn fire(&self, event: &Event) -> usize {
        self.shared.events.fire(event)
    }

    fn mount(&self, map: &Map) -> Result<()> {
        self.shared.state.borrow_mut().map = Some(map.downgrade());

        let rendered = self.init_icon(map).and_then(|_| self.reposition(map));
        if let Err(err) = rendered {
            self.unmount(map);
            return Err(err);
        }

        self.sync_target(map);
        log::debug!("mounted {} at {:?}", self.id(), self.lat_lng());
        Ok(())
    }

    fn unmount(&self, map: &Map) {
        let (icon, shadow) = {
            let mut state = self.shared.state.borrow_mut();
            state.map = None;
            state.hovered = false;
            (state.icon_element.take(), state.shadow_element.take())
        };

        if let Some(element) = &icon {
            map.unregister_target(element.id());
            map.detach_element(element);
        }
        if let Some(element) = &shadow {
            map.detach_element(element);
        }
    }

    /// Registers the icon element as an input target when the marker is
    /// interactive and unregisters it otherwise
    fn sync_target(&self, map: &Map) {
        let (element, interactive) = {
            let state = self.shared.state.borrow();
            (state.icon_element.clone(), state.options.interactive)
        };
        let Some(element) = element else {
            return;
        };

        if interactive {
            map.register_target(element.id(), Rc::new(self.clone()));
        } else {
            map.unregister_target(element.id());
        }
    }

    fn init_icon(&self, map: &Map) -> Result<()> {
        let (icon, options, existing_icon, existing_shadow) = {
            let state = self.shared.state.borrow();
            (
                Rc::clone(&state.icon),
                state.options.clone(),
                state.icon_element.clone(),
                state.shadow_element.clone(),
            )
        };

        let primary_pane = map.pane(&options.pane)?;
        let shadow_pane = map.pane(&options.shadow_pane)?;

        let mut primary_classes = vec![ZOOM_ANIMATED_CLASS];
        if options.interactive {
            primary_classes.push(INTERACTIVE_CLASS);
        }
        let request = RenderRequest {
            icon: &icon,
            retina: map.retina(),
            keyboard: options.keyboard,
            alt: options.alt.as_deref(),
            primary_classes: &primary_classes,
            shadow_classes: &[ZOOM_ANIMATED_CLASS],
        };
        let outcome = create_or_update(
            existing_icon.as_ref(),
            existing_shadow.as_ref(),
            &request,
            &RenderTargets {
                primary_pane: &primary_pane,
                shadow_pane: &shadow_pane,
            },
        )?;

        outcome.primary.set_title(options.title.as_deref());
        let opacity = opacity_style(options.opacity);
        outcome.primary.set_opacity(opacity);
        if let Some(shadow) = &outcome.shadow {
            shadow.set_opacity(opacity);
        }
        if !outcome.changes.is_empty() {
            log::trace!("{} elements changed: {:?}", self.id(), outcome.changes);
        }

        let mut state = self.shared.state.borrow_mut();
        state.icon_element = Some(outcome.primary);
        state.shadow_element = outcome.shadow;
        Ok(())
    }

    fn reposition(&self, map: &Map) -> Result<()> {
        let (lat_lng, icon, shadow, offset) = {
            let state = self.shared.state.borrow();
            (
                state.lat_lng,
                state.icon_element.clone(),
                state.shadow_element.clone(),
                state.options.z_index_offset,
            )
        };
        let icon = icon
            .ok_or_else(|| MapError::IllegalState(format!("{} has no icon element", self.id())))?;

        let position = map.lat_lng_to_layer_point(&lat_lng).round();
        position_elements(&icon, shadow.as_ref(), position);

        self.shared.state.borrow_mut().z_index = position.y as i32 + offset;
        self.apply_z_index();
        Ok(())
    }

    fn apply_z_index(&self) {
        let state = self.shared.state.borrow();
        if let Some(element) = &state.icon_element {
            let rise = if state.hovered {
                state.options.rise_offset
            } else {
                0
            };
            element.set_z_index(Some(state.z_index + rise));
        }
    }

    fn set_hovered(&self, hovered: bool) {
        let rises = {
            let mut state = self.shared.state.borrow_mut();
            state.hovered = hovered;
            state.options.rise_on_hover
        };
        if rises {
            self.apply_z_index();
        }
    }
}

/// Leaves full opacity out of the element style
fn opacity_style(opacity: f64) -> Option<f64> {
    if opacity < 1.0 {
        Some(opacity.max(0.0))
    } else {
        None
    }
}

impl InteractiveTarget for Marker {
    fn handle_dom_event(&self, map: &Map, dom: &DomEvent) -> Result<bool> {
        let kind = dom.kind;
        match kind {
            EventType::MouseOver => self.set_hovered(true),
            EventType::MouseOut => self.set_hovered(false),
            _ => {}
        }

        let (lat_lng, bubbling) = {
            let state = self.shared.state.borrow();
            (state.lat_lng, state.options.bubbling_mouse_events)
        };

        let mut event =
            Event::new(kind, EventTarget::Layer(self.id())).with_original(dom.clone());
        if kind.is_pointer() {
            let layer_point = map.lat_lng_to_layer_point(&lat_lng);
            let container_point = map.layer_point_to_container_point(&layer_point);
            event = event
                .with_lat_lng(lat_lng)
                .with_points(layer_point, container_point);
        }
        self.shared.events.fire(&event);

        let stop = event.is_propagation_stopped()
            || (!bubbling && PropagationPolicy::marker_default().stops_at_source(kind));
        if stop {
            log::trace!("{kind} stopped at {}", self.id());
        }
        Ok(stop)
    }
}

impl ViewportAware for Marker {
    fn on_viewport_changed(&self) -> Result<()> {
        match self.map() {
            Some(map) => self.reposition(&map),
            None => Ok(()),
        }
    }
}

impl LayerOperations for Marker {
    fn id(&self) -> LayerId {
        self.shared.id
    }

    fn layer_type(&self) -> LayerType {
        LayerType::Marker
    }

    fn on_add(&self, map: &Map) -> Result<()> {
        self.mount(map)?;
        self.shared
            .events
            .fire(&Event::new(EventType::Add, EventTarget::Layer(self.id())));
        Ok(())
    }

    fn on_remove(&self, map: &Map) -> Result<()> {
        self.unmount(map);
        log::debug!("unmounted {}", self.id());
        self.shared
            .events
            .fire(&Event::new(EventType::Remove, EventTarget::Layer(self.id())));
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(LatLngBounds::from_point(self.lat_lng()))
    }

    fn options(&self) -> serde_json::Value {
        serde_json::to_value(&self.shared.state.borrow().options).unwrap_or_default()
    }

    /// Merges `options` and re-renders when mounted. A pane change moves
    /// the existing elements into the new panes.
    fn set_options(&self, options: serde_json::Value) -> Result<()> {
        let merged = self.marker_options().merged(options)?;
        let map = self.map();
        if let Some(map) = &map {
            map.pane(&merged.pane)?;
            map.pane(&merged.shadow_pane)?;
        }

        let previous = std::mem::replace(&mut self.shared.state.borrow_mut().options, merged);
        let Some(map) = map else {
            return Ok(());
        };

        let current = self.marker_options();
        if previous.pane != current.pane || previous.shadow_pane != current.shadow_pane {
            for element in self.icon_element().iter().chain(self.shadow_element().iter()) {
                map.detach_element(element);
            }
        }
        self.init_icon(&map)?;
        self.reposition(&map)?;
        if previous.interactive != current.interactive {
            self.sync_target(&map);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use crate::layers::icon::IconOptions;
    use crate::rendering::element::Attribute;
    use serde_json::json;
    use std::cell::Cell;

    fn map() -> Map {
        Map::with_view(LatLng::new(0.0, 0.0), 4.0, Point::new(400.0, 400.0))
    }

    fn counter(marker: &Marker, kind: EventType) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let spy = Rc::clone(&count);
        marker.on(kind, move |_| spy.set(spy.get() + 1));
        count
    }

    #[test]
    fn test_mount_inserts_into_panes() {
        let map = map();
        let marker = Marker::new(LatLng::new(10.0, 10.0));
        let added = counter(&marker, EventType::Add);

        assert!(marker.icon_element().is_none());
        marker.add_to(&map).unwrap();

        let icon = marker.icon_element().unwrap();
        let shadow = marker.shadow_element().unwrap();
        assert!(map.pane("markerPane").unwrap().contains(&icon));
        assert!(map.pane("shadowPane").unwrap().contains(&shadow));
        assert!(map.is_target(icon.id()));
        assert!(icon.has_class("maplet-interactive"));
        assert_eq!(added.get(), 1);

        marker.add_to(&map).unwrap();
        assert_eq!(added.get(), 1);
    }

    #[test]
    fn test_unmount_detaches_and_forgets_elements() {
        let map = map();
        let marker = Marker::new([5.0, 5.0]);
        let removed = counter(&marker, EventType::Remove);
        marker.add_to(&map).unwrap();
        let icon = marker.icon_element().unwrap();

        marker.remove().unwrap();

        assert!(!icon.is_attached());
        assert!(marker.icon_element().is_none());
        assert!(marker.shadow_element().is_none());
        assert!(!map.is_target(icon.id()));
        assert!(map.pane("markerPane").unwrap().is_empty());
        assert_eq!(removed.get(), 1);

        marker.remove().unwrap();
        assert_eq!(removed.get(), 1);
    }

    #[test]
    fn test_detached_updates_are_deferred() {
        let marker = Marker::new([0.0, 0.0]);
        let moves = counter(&marker, EventType::Move);

        marker.set_lat_lng([1.0, 2.0]).unwrap();
        marker.set_opacity(0.5);
        assert_eq!(moves.get(), 1);
        assert!(matches!(marker.update(), Err(MapError::IllegalState(_))));

        let map = map();
        marker.add_to(&map).unwrap();
        let icon = marker.icon_element().unwrap();
        assert_eq!(icon.style().opacity, Some(0.5));
        assert_eq!(
            icon.style().translate,
            Some(map.lat_lng_to_layer_point(&LatLng::new(1.0, 2.0)).round())
        );
    }

    #[test]
    fn test_set_lat_lng_moves_elements() {
        let map = map();
        let marker = Marker::new([0.0, 0.0]);
        marker.add_to(&map).unwrap();
        let before = marker.icon_element().unwrap().style().translate;

        marker.set_lat_lng([20.0, 20.0]).unwrap();

        let icon = marker.icon_element().unwrap();
        assert_ne!(icon.style().translate, before);
        assert_eq!(
            marker.shadow_element().unwrap().style().translate,
            icon.style().translate
        );
    }

    #[test]
    fn test_set_icon_keeps_nodes() {
        let map = map();
        let marker = Marker::new([0.0, 0.0]);
        marker.add_to(&map).unwrap();
        let icon = marker.icon_element().unwrap();
        let shadow = marker.shadow_element().unwrap();

        let replacement = Icon::new(
            IconOptions::new("pin.png")
                .with_icon_size(32.0)
                .with_shadow("pin-shadow.png"),
        )
        .unwrap();
        marker.set_icon(replacement).unwrap();

        assert_eq!(marker.icon_element().unwrap(), icon);
        assert_eq!(marker.shadow_element().unwrap(), shadow);
        assert_eq!(icon.src(), "pin.png");
        assert_eq!(icon.style().width_css().as_deref(), Some("32px"));
        assert_eq!(shadow.src(), "pin-shadow.png");
    }

    #[test]
    fn test_set_icon_without_shadow_detaches_it() {
        let map = map();
        let marker = Marker::new([0.0, 0.0]);
        marker.add_to(&map).unwrap();
        let shadow = marker.shadow_element().unwrap();

        marker
            .set_icon(Icon::new(IconOptions::new("dot.png")).unwrap())
            .unwrap();

        assert!(marker.shadow_element().is_none());
        assert!(!shadow.is_attached());
        assert!(map.pane("shadowPane").unwrap().is_empty());
    }

    #[test]
    fn test_z_index_follows_position_and_offset() {
        let map = map();
        let marker = Marker::new([10.0, 0.0]);
        marker.add_to(&map).unwrap();
        let y = map.lat_lng_to_layer_point(&LatLng::new(10.0, 0.0)).round().y as i32;
        let icon = marker.icon_element().unwrap();
        assert_eq!(icon.style().z_index, Some(y));

        marker.set_z_index_offset(1000).unwrap();
        assert_eq!(icon.style().z_index, Some(y + 1000));
    }

    #[test]
    fn test_keyboard_and_title_attributes() {
        let map = map();
        let marker = Marker::new([0.0, 0.0]).with_options(MarkerOptions {
            title: Some("Depot".to_string()),
            ..MarkerOptions::default()
        });
        marker.add_to(&map).unwrap();
        let icon = marker.icon_element().unwrap();

        assert_eq!(icon.tab_index(), Some(0));
        assert_eq!(icon.role().as_deref(), Some("button"));
        assert_eq!(icon.title().as_deref(), Some("Depot"));

        let silent = Marker::new([0.0, 0.0]).with_options(MarkerOptions {
            keyboard: false,
            ..MarkerOptions::default()
        });
        silent.add_to(&map).unwrap();
        assert!(!silent
            .icon_element()
            .unwrap()
            .has_attribute(Attribute::TabIndex));
    }

    #[test]
    fn test_alt_override_survives_icon_change() {
        let map = map();
        let marker = Marker::new([0.0, 0.0]);
        marker.add_to(&map).unwrap();
        marker.set_alt("Warehouse");
        assert_eq!(marker.icon_element().unwrap().alt().as_deref(), Some("Warehouse"));

        marker.set_icon(Icon::default_icon()).unwrap();
        assert_eq!(marker.icon_element().unwrap().alt().as_deref(), Some("Warehouse"));
    }

    #[test]
    fn test_unknown_pane_fails_the_add() {
        let map = map();
        let marker = Marker::new([0.0, 0.0]).with_options(MarkerOptions {
            pane: "labels".to_string(),
            ..MarkerOptions::default()
        });

        assert!(matches!(marker.add_to(&map), Err(MapError::UnknownPane(_))));
        assert!(!marker.is_mounted());
        assert!(!map.has_layer(marker.id()));

        map.create_pane("labels", 625);
        marker.add_to(&map).unwrap();
        assert!(map
            .pane("labels")
            .unwrap()
            .contains(&marker.icon_element().unwrap()));
    }

    #[test]
    fn test_opacity_stays_a_number() {
        let map = map();
        let marker = Marker::new([0.0, 0.0]);
        marker.add_to(&map).unwrap();

        marker.set_opacity(0.4);
        marker.set_opacity(f64::NAN);
        assert_eq!(marker.marker_options().opacity, 0.4);

        marker.set_opacity(f64::NEG_INFINITY);
        assert_eq!(marker.marker_options().opacity, 0.0);
        marker.set_opacity(7.0);
        assert_eq!(marker.icon_element().unwrap().style().opacity, None);

        marker.set_options(json!({"title": "Depot"})).unwrap();
        assert_eq!(marker.marker_options().opacity, 1.0);
    }

    #[test]
    fn test_set_options_moves_elements_between_panes() {
        let map = map();
        let labels = map.create_pane("labels", 625);
        let marker = Marker::new([0.0, 0.0]);
        marker.add_to(&map).unwrap();
        let icon = marker.icon_element().unwrap();

        marker
            .set_options(json!({"pane": "labels", "opacity": 0.25}))
            .unwrap();

        assert_eq!(marker.icon_element().unwrap(), icon);
        assert!(labels.contains(&icon));
        assert!(!map.pane("markerPane").unwrap().contains(&icon));
        assert_eq!(icon.style().opacity, Some(0.25));
        assert_eq!(marker.options()["pane"], "labels");
        assert!(marker.set_options(json!({"pane": "missing"})).is_err());
        assert_eq!(marker.marker_options().pane, "labels");
    }

    #[test]
    fn test_non_interactive_marker_is_not_a_target() {
        let map = map();
        let marker = Marker::new([0.0, 0.0]).with_options(MarkerOptions {
            interactive: false,
            ..MarkerOptions::default()
        });
        marker.add_to(&map).unwrap();
        let icon = marker.icon_element().unwrap();

        assert!(!map.is_target(icon.id()));
        assert!(!icon.has_class("maplet-interactive"));

        marker.set_options(json!({"interactive": true})).unwrap();
        assert!(map.is_target(icon.id()));
        assert!(icon.has_class("maplet-interactive"));
    }

    #[test]
    fn test_moving_between_maps() {
        let first = map();
        let second = map();
        let marker = Marker::new([0.0, 0.0]);

        marker.add_to(&first).unwrap();
        marker.add_to(&second).unwrap();

        assert!(!first.has_layer(marker.id()));
        assert!(second.has_layer(marker.id()));
        assert_eq!(marker.map(), Some(second));
    }

    #[test]
    fn test_view_change_repositions() {
        let map = map();
        let marker = Marker::new([30.0, 30.0]);
        marker.add_to(&map).unwrap();
        let before = marker.icon_element().unwrap().style().translate;

        map.set_view(LatLng::new(30.0, 30.0), 6.0).unwrap();

        let after = marker.icon_element().unwrap().style().translate;
        assert_ne!(before, after);
        assert_eq!(
            after,
            Some(map.lat_lng_to_layer_point(&LatLng::new(30.0, 30.0)).round())
        );
    }
}
