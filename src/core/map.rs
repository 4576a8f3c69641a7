use crate::{
    core::{
        config::MapOptions,
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    input::{
        evented::{Evented, ListenerId},
        events::{DomEvent, Event, EventTarget, EventType},
    },
    layers::base::{LayerId, LayerOperations},
    prelude::HashMap,
    rendering::{
        element::{ElementId, VisualElement},
        pane::{Pane, Panes},
    },
    traits::{InteractiveTarget, Projection},
    MapError, Result,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Where a dispatched input event ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The target element is not inside any of this map's panes
    Dropped,
    /// A layer handled the event and stopped it
    Stopped,
    /// The map's own listeners saw the event
    Propagated,
}

struct MapInner {
    options: MapOptions,
    viewport: RefCell<Viewport>,
    panes: RefCell<Panes>,
    layers: RefCell<Vec<Rc<dyn LayerOperations>>>,
    targets: RefCell<HashMap<ElementId, Rc<dyn InteractiveTarget>>>,
    events: Evented,
}

/// The map: panes, a projection and the layers drawn into them.
///
/// `Map` is a cheap handle; clones refer to the same map.
#[derive(Clone)]
pub struct Map {
    inner: Rc<MapInner>,
}

/// Non-owning map reference held by mounted layers
#[derive(Clone)]
pub(crate) struct WeakMap(Weak<MapInner>);

impl WeakMap {
    pub(crate) fn upgrade(&self) -> Option<Map> {
        self.0.upgrade().map(|inner| Map { inner })
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("viewport", &*self.inner.viewport.borrow())
            .field("layers", &self.inner.layers.borrow().len())
            .field("targets", &self.inner.targets.borrow().len())
            .finish()
    }
}

impl Default for Map {
    fn default() -> Self {
        Self::new(MapOptions::default())
    }
}

impl Map {
    pub fn new(options: MapOptions) -> Self {
        let mut viewport = Viewport::new(options.center, options.zoom, options.size);
        if options.min_zoom.is_some() || options.max_zoom.is_some() {
            viewport.set_zoom_limits(
                options.min_zoom.unwrap_or(viewport.min_zoom),
                options.max_zoom.unwrap_or(viewport.max_zoom),
            );
        }

        Self {
            inner: Rc::new(MapInner {
                options,
                viewport: RefCell::new(viewport),
                panes: RefCell::new(Panes::standard()),
                layers: RefCell::new(Vec::new()),
                targets: RefCell::new(HashMap::default()),
                events: Evented::new(),
            }),
        }
    }

    /// Map with the default options centered at `center`
    pub fn with_view(center: LatLng, zoom: f64, size: Point) -> Self {
        Self::new(MapOptions {
            center,
            zoom,
            size,
            ..MapOptions::default()
        })
    }

    pub(crate) fn downgrade(&self) -> WeakMap {
        WeakMap(Rc::downgrade(&self.inner))
    }

    pub fn options(&self) -> &MapOptions {
        &self.inner.options
    }

    pub fn retina(&self) -> bool {
        self.inner.options.retina
    }

    /// Snapshot of the current view
    pub fn viewport(&self) -> Viewport {
        self.inner.viewport.borrow().clone()
    }

    /// Moves the view and repositions every layer
    pub fn set_view(&self, center: LatLng, zoom: f64) -> Result<()> {
        {
            let mut viewport = self.inner.viewport.borrow_mut();
            viewport.set_center(center);
            viewport.set_zoom(zoom);
        }
        self.notify_viewport_changed()
    }

    pub fn set_size(&self, size: Point) -> Result<()> {
        self.inner.viewport.borrow_mut().set_size(size);
        self.notify_viewport_changed()
    }

    fn notify_viewport_changed(&self) -> Result<()> {
        for layer in self.layers() {
            if layer.requires_viewport_updates() {
                layer.on_viewport_changed()?;
            }
        }
        Ok(())
    }

    pub fn pane(&self, name: &str) -> Result<Pane> {
        self.inner.panes.borrow().get(name)
    }

    /// Returns the pane called `name`, creating it with `z_index` if needed
    pub fn create_pane(&self, name: &str, z_index: i32) -> Pane {
        self.inner.panes.borrow_mut().create(name, z_index)
    }

    /// Whether `element` sits in one of this map's panes
    pub fn contains_element(&self, element: ElementId) -> bool {
        self.inner.panes.borrow().pane_of(element).is_some()
    }

    /// Removes `element` from whichever pane holds it
    pub fn detach_element(&self, element: &VisualElement) -> bool {
        let pane = self.inner.panes.borrow().pane_of(element.id());
        pane.map(|pane| pane.remove_child(element)).unwrap_or(false)
    }

    /// Adds a layer, mounts it and fires `layeradd`. Adding a layer that is
    /// already on the map does nothing.
    pub fn add_layer(&self, layer: Rc<dyn LayerOperations>) -> Result<()> {
        let id = layer.id();
        if self.has_layer(id) {
            return Ok(());
        }

        self.inner.layers.borrow_mut().push(Rc::clone(&layer));
        if let Err(err) = layer.on_add(self) {
            self.inner.layers.borrow_mut().retain(|l| l.id() != id);
            log::warn!("failed to add {} {}: {}", layer.layer_type(), id, err);
            return Err(err);
        }

        log::debug!("added {} {}", layer.layer_type(), id);
        self.fire_layer_event(EventType::LayerAdd, id);
        Ok(())
    }

    /// Unmounts a layer and fires `layerremove`; returns whether the layer
    /// was on the map
    pub fn remove_layer(&self, id: LayerId) -> Result<bool> {
        let layer = {
            let mut layers = self.inner.layers.borrow_mut();
            match layers.iter().position(|l| l.id() == id) {
                Some(index) => layers.remove(index),
                None => return Ok(false),
            }
        };

        layer.on_remove(self)?;
        log::debug!("removed {} {}", layer.layer_type(), id);
        self.fire_layer_event(EventType::LayerRemove, id);
        Ok(true)
    }

    pub fn has_layer(&self, id: LayerId) -> bool {
        self.inner.layers.borrow().iter().any(|l| l.id() == id)
    }

    pub fn layer_count(&self) -> usize {
        self.inner.layers.borrow().len()
    }

    fn layers(&self) -> Vec<Rc<dyn LayerOperations>> {
        self.inner.layers.borrow().clone()
    }

    fn fire_layer_event(&self, kind: EventType, id: LayerId) {
        let mut event = Event::new(kind, EventTarget::Map);
        event.layer = Some(id);
        self.inner.events.fire(&event);
    }

    /// Routes input landing on `element` to `target`
    pub fn register_target(&self, element: ElementId, target: Rc<dyn InteractiveTarget>) {
        log::trace!("registered target {}", element);
        self.inner.targets.borrow_mut().insert(element, target);
    }

    pub fn unregister_target(&self, element: ElementId) -> bool {
        self.inner.targets.borrow_mut().remove(&element).is_some()
    }

    pub fn is_target(&self, element: ElementId) -> bool {
        self.inner.targets.borrow().contains_key(&element)
    }

    pub fn on<F>(&self, kind: EventType, callback: F) -> ListenerId
    where
        F: Fn(&Event) + 'static,
    {
        self.inner.events.on(kind, callback)
    }

    pub fn once<F>(&self, kind: EventType, callback: F) -> ListenerId
    where
        F: Fn(&Event) + 'static,
    {
        self.inner.events.once(kind, callback)
    }

    pub fn off(&self, kind: EventType, id: ListenerId) -> bool {
        self.inner.events.off(kind, id)
    }

    pub fn listens(&self, kind: EventType) -> bool {
        self.inner.events.listens(kind)
    }

    /// Delivers one input event.
    ///
    /// An event aimed at an element that is in none of this map's panes is
    /// dropped. When the element belongs to a registered target, the target
    /// handles it first and may stop it; otherwise the map fires its own
    /// event, carrying the geographic position under the pointer.
    pub fn dispatch_dom_event(&self, event: DomEvent) -> Result<DispatchOutcome> {
        let kind = event.kind;
        if !EventType::DOM_MIRRORED.contains(&kind) {
            return Err(MapError::Layer(format!("{kind} is not an input event")));
        }

        if let Some(element) = event.target {
            if !self.contains_element(element) {
                log::trace!("dropped {kind} on detached {element}");
                return Ok(DispatchOutcome::Dropped);
            }

            let target = self.inner.targets.borrow().get(&element).cloned();
            if let Some(target) = target {
                if target.handle_dom_event(self, &event)? {
                    return Ok(DispatchOutcome::Stopped);
                }
            }
        }

        let mut map_event = Event::new(kind, EventTarget::Map);
        if kind.is_pointer() {
            let container_point = event.container_point;
            let layer_point = self
                .inner
                .viewport
                .borrow()
                .container_point_to_layer_point(&container_point);
            map_event = map_event
                .with_lat_lng(self.container_point_to_lat_lng(&container_point))
                .with_points(layer_point, container_point);
        }
        self.inner.events.fire(&map_event.with_original(event));
        Ok(DispatchOutcome::Propagated)
    }
}

impl Projection for Map {
    fn lat_lng_to_layer_point(&self, lat_lng: &LatLng) -> Point {
        self.inner.viewport.borrow().lat_lng_to_layer_point(lat_lng)
    }

    fn layer_point_to_container_point(&self, point: &Point) -> Point {
        self.inner
            .viewport
            .borrow()
            .layer_point_to_container_point(point)
    }

    fn container_point_to_lat_lng(&self, point: &Point) -> LatLng {
        let viewport = self.inner.viewport.borrow();
        viewport.layer_point_to_lat_lng(&viewport.container_point_to_layer_point(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::base::LayerType;
    use crate::traits::ViewportAware;
    use std::cell::Cell;

    struct Tracker {
        id: LayerId,
        added: Cell<usize>,
        moved: Cell<usize>,
    }

    impl Tracker {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                id: LayerId::next(),
                added: Cell::new(0),
                moved: Cell::new(0),
            })
        }
    }

    impl ViewportAware for Tracker {
        fn on_viewport_changed(&self) -> Result<()> {
            self.moved.set(self.moved.get() + 1);
            Ok(())
        }
    }

    impl LayerOperations for Tracker {
        fn id(&self) -> LayerId {
            self.id
        }

        fn layer_type(&self) -> LayerType {
            LayerType::Custom
        }

        fn on_add(&self, _map: &Map) -> Result<()> {
            self.added.set(self.added.get() + 1);
            Ok(())
        }

        fn on_remove(&self, _map: &Map) -> Result<()> {
            Ok(())
        }

        fn options(&self) -> serde_json::Value {
            serde_json::Value::Null
        }

        fn set_options(&self, _options: serde_json::Value) -> Result<()> {
            Ok(())
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn test_standard_panes() {
        let map = Map::default();

        assert_eq!(map.pane("markerPane").unwrap().z_index(), 600);
        assert_eq!(map.pane("shadowPane").unwrap().z_index(), 500);
        assert!(matches!(map.pane("nope"), Err(MapError::UnknownPane(_))));

        let custom = map.create_pane("labels", 625);
        assert_eq!(map.pane("labels").unwrap(), custom);
        assert_eq!(map.create_pane("labels", 1).z_index(), 625);
    }

    #[test]
    fn test_layer_add_and_remove_events() {
        let map = Map::default();
        let tracker = Tracker::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for kind in [EventType::LayerAdd, EventType::LayerRemove] {
            let seen = Rc::clone(&seen);
            map.on(kind, move |e| seen.borrow_mut().push((e.kind, e.layer)));
        }

        map.add_layer(tracker.clone()).unwrap();
        map.add_layer(tracker.clone()).unwrap();
        assert_eq!(tracker.added.get(), 1);
        assert_eq!(map.layer_count(), 1);

        assert!(map.remove_layer(tracker.id).unwrap());
        assert!(!map.remove_layer(tracker.id).unwrap());
        assert_eq!(
            *seen.borrow(),
            vec![
                (EventType::LayerAdd, Some(tracker.id)),
                (EventType::LayerRemove, Some(tracker.id)),
            ]
        );
    }

    #[test]
    fn test_set_view_notifies_layers() {
        let map = Map::default();
        let tracker = Tracker::new();
        map.add_layer(tracker.clone()).unwrap();

        map.set_view(LatLng::new(10.0, 10.0), 3.0).unwrap();
        assert_eq!(tracker.moved.get(), 1);
        assert_eq!(map.viewport().zoom, 3.0);

        map.set_size(Point::new(300.0, 200.0)).unwrap();
        assert_eq!(tracker.moved.get(), 2);
        let middle = map.container_point_to_lat_lng(&Point::new(150.0, 100.0));
        assert!(middle.equals_within(&LatLng::new(10.0, 10.0), 0.5));
    }

    #[test]
    fn test_map_click_carries_pointer_position() {
        let map = Map::with_view(LatLng::new(0.0, 0.0), 2.0, Point::new(512.0, 512.0));
        let hit = Rc::new(RefCell::new(None));
        {
            let hit = Rc::clone(&hit);
            map.on(EventType::Click, move |e| *hit.borrow_mut() = e.lat_lng);
        }

        let outcome = map
            .dispatch_dom_event(DomEvent::click(Point::new(256.0, 256.0)))
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Propagated);
        let lat_lng = hit.borrow().unwrap();
        assert!(lat_lng.equals_within(&LatLng::new(0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_events_on_foreign_elements_are_dropped() {
        let map = Map::default();
        let clicks = Rc::new(Cell::new(0));
        {
            let clicks = Rc::clone(&clicks);
            map.on(EventType::Click, move |_| clicks.set(clicks.get() + 1));
        }

        let stray = VisualElement::new_image("stray.png");
        let outcome = map
            .dispatch_dom_event(DomEvent::click(Point::new(1.0, 1.0)).on(&stray))
            .unwrap();

        assert_eq!(outcome, DispatchOutcome::Dropped);
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn test_lifecycle_events_are_not_input() {
        let map = Map::default();
        let lifecycle = DomEvent {
            kind: EventType::Move,
            ..DomEvent::click(Point::default())
        };
        let result = map.dispatch_dom_event(lifecycle);
        assert!(matches!(result, Err(MapError::Layer(_))));
    }

    #[test]
    fn test_projection_round_trips_through_container() {
        let map = Map::with_view(LatLng::new(48.0, 11.0), 9.0, Point::new(640.0, 480.0));
        let target = LatLng::new(48.1, 11.2);

        let container = map.lat_lng_to_container_point(&target);
        assert!(map
            .container_point_to_lat_lng(&container)
            .equals_within(&target, 1e-9));
    }
}
