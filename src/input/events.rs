use crate::core::geo::{LatLng, Point};
use crate::layers::base::LayerId;
use crate::rendering::element::{ElementId, VisualElement};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

/// Semantic event types fired by maps and layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Add,
    Remove,
    Move,
    LayerAdd,
    LayerRemove,
    Click,
    DblClick,
    MouseDown,
    MouseUp,
    MouseOver,
    MouseOut,
    MouseMove,
    ContextMenu,
    KeyPress,
    KeyUp,
    KeyDown,
}

impl EventType {
    /// Event types mirrored from raw input on a marker element
    pub const DOM_MIRRORED: [EventType; 11] = [
        EventType::Click,
        EventType::DblClick,
        EventType::MouseDown,
        EventType::MouseUp,
        EventType::MouseOver,
        EventType::MouseOut,
        EventType::MouseMove,
        EventType::ContextMenu,
        EventType::KeyPress,
        EventType::KeyUp,
        EventType::KeyDown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Add => "add",
            EventType::Remove => "remove",
            EventType::Move => "move",
            EventType::LayerAdd => "layeradd",
            EventType::LayerRemove => "layerremove",
            EventType::Click => "click",
            EventType::DblClick => "dblclick",
            EventType::MouseDown => "mousedown",
            EventType::MouseUp => "mouseup",
            EventType::MouseOver => "mouseover",
            EventType::MouseOut => "mouseout",
            EventType::MouseMove => "mousemove",
            EventType::ContextMenu => "contextmenu",
            EventType::KeyPress => "keypress",
            EventType::KeyUp => "keyup",
            EventType::KeyDown => "keydown",
        }
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(
            self,
            EventType::KeyPress | EventType::KeyUp | EventType::KeyDown
        )
    }

    /// Checks if this is a mouse/pointer event
    pub fn is_pointer(&self) -> bool {
        Self::DOM_MIRRORED.contains(self) && !self.is_keyboard()
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = crate::MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lifecycle = [
            EventType::Add,
            EventType::Remove,
            EventType::Move,
            EventType::LayerAdd,
            EventType::LayerRemove,
        ];
        lifecycle
            .into_iter()
            .chain(Self::DOM_MIRRORED)
            .find(|t| t.as_str() == s)
            .ok_or_else(|| crate::MapError::Layer(format!("unknown event type `{s}`")))
    }
}

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Keyboard key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Enter,
    Space,
    Tab,
    Other(u32),
}

/// Keyboard modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Raw input as the hosting environment reports it.
///
/// `target` is the element the input landed on; `None` means the bare map
/// surface. `container_point` is the pointer position inside the map
/// container.
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    pub kind: EventType,
    pub target: Option<ElementId>,
    pub container_point: Point,
    pub button: MouseButton,
    pub key: Option<KeyCode>,
    pub modifiers: KeyModifiers,
}

impl DomEvent {
    /// Pointer input on the map surface. `kind` must be a pointer type.
    pub fn pointer(kind: EventType, container_point: Point) -> Self {
        debug_assert!(kind.is_pointer(), "{kind} is not a pointer event");
        Self {
            kind,
            target: None,
            container_point,
            button: MouseButton::Left,
            key: None,
            modifiers: KeyModifiers::default(),
        }
    }

    /// Keyboard input; aim it at an element with [`DomEvent::on`]
    pub fn keyboard(kind: EventType, key: KeyCode) -> Self {
        debug_assert!(kind.is_keyboard(), "{kind} is not a keyboard event");
        Self {
            kind,
            target: None,
            container_point: Point::default(),
            button: MouseButton::Left,
            key: Some(key),
            modifiers: KeyModifiers::default(),
        }
    }

    pub fn click(container_point: Point) -> Self {
        Self::pointer(EventType::Click, container_point)
    }

    /// Retargets the input at `element`
    pub fn on(mut self, element: &VisualElement) -> Self {
        self.target = Some(element.id());
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Who an event was fired on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTarget {
    Map,
    Layer(LayerId),
}

/// A semantic event handed to listeners
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventType,
    pub target: EventTarget,
    pub original_event: Option<DomEvent>,
    pub lat_lng: Option<LatLng>,
    /// Set on `move`
    pub old_lat_lng: Option<LatLng>,
    pub layer_point: Option<Point>,
    pub container_point: Option<Point>,
    /// Set on `layeradd` / `layerremove`
    pub layer: Option<LayerId>,
    stopped: Cell<bool>,
}

impl Event {
    pub fn new(kind: EventType, target: EventTarget) -> Self {
        Self {
            kind,
            target,
            original_event: None,
            lat_lng: None,
            old_lat_lng: None,
            layer_point: None,
            container_point: None,
            layer: None,
            stopped: Cell::new(false),
        }
    }

    pub fn with_original(mut self, original: DomEvent) -> Self {
        self.original_event = Some(original);
        self
    }

    pub fn with_lat_lng(mut self, lat_lng: LatLng) -> Self {
        self.lat_lng = Some(lat_lng);
        self
    }

    pub fn with_points(mut self, layer_point: Point, container_point: Point) -> Self {
        self.layer_point = Some(layer_point);
        self.container_point = Some(container_point);
        self
    }

    /// Keeps the event from reaching the map once the current target is done
    pub fn stop_propagation(&self) {
        self.stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_names_round_trip() {
        for kind in EventType::DOM_MIRRORED {
            assert_eq!(kind.as_str().parse::<EventType>().unwrap(), kind);
        }
        assert_eq!("move".parse::<EventType>().unwrap(), EventType::Move);
        assert!("tap".parse::<EventType>().is_err());
    }

    #[test]
    fn test_event_type_checks() {
        assert!(EventType::Click.is_pointer());
        assert!(EventType::MouseMove.is_pointer());
        assert!(!EventType::KeyDown.is_pointer());
        assert!(EventType::KeyDown.is_keyboard());
        assert!(!EventType::Move.is_pointer());
    }

    #[test]
    fn test_dom_event_targets_element() {
        let el = VisualElement::new_image("a.png");
        let event = DomEvent::click(Point::new(3.0, 4.0)).on(&el);

        assert_eq!(event.target, Some(el.id()));
        assert_eq!(event.kind, EventType::Click);
    }

    #[test]
    fn test_stop_propagation() {
        let event = Event::new(EventType::Click, EventTarget::Map);
        assert!(!event.is_propagation_stopped());
        event.stop_propagation();
        assert!(event.is_propagation_stopped());
    }
}
