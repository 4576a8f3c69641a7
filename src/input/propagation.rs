//! Which marker events continue to the map.
//!
//! One table, consulted by the marker's input handler once its own listeners
//! ran. The answer decides whether the map fires its event next.

use crate::input::events::EventType;
use crate::prelude::HashMap;
use once_cell::sync::Lazy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Dispatch continues to the map's listeners
    Bubble,
    /// The map never sees the event
    StopAtSource,
}

static MARKER_DEFAULT: Lazy<PropagationPolicy> = Lazy::new(|| {
    use EventType::*;

    let mut policy = PropagationPolicy::bubbling();
    for kind in [Click, DblClick, MouseDown, MouseUp, ContextMenu] {
        policy = policy.with(kind, Propagation::StopAtSource);
    }
    policy
});

#[derive(Debug, Clone, PartialEq)]
pub struct PropagationPolicy {
    table: HashMap<EventType, Propagation>,
}

impl PropagationPolicy {
    /// Every mirrored event type bubbles
    pub fn bubbling() -> Self {
        Self {
            table: EventType::DOM_MIRRORED
                .iter()
                .map(|kind| (*kind, Propagation::Bubble))
                .collect(),
        }
    }

    /// The marker table: click-family and context-menu events stop at the
    /// marker, hover/move and keyboard events bubble
    pub fn marker_default() -> &'static PropagationPolicy {
        &MARKER_DEFAULT
    }

    pub fn with(mut self, kind: EventType, propagation: Propagation) -> Self {
        self.table.insert(kind, propagation);
        self
    }

    /// Types missing from the table bubble
    pub fn propagation(&self, kind: EventType) -> Propagation {
        self.table
            .get(&kind)
            .copied()
            .unwrap_or(Propagation::Bubble)
    }

    pub fn stops_at_source(&self, kind: EventType) -> bool {
        self.propagation(kind) == Propagation::StopAtSource
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_table() {
        let policy = PropagationPolicy::marker_default();

        for kind in [
            EventType::Click,
            EventType::DblClick,
            EventType::MouseDown,
            EventType::MouseUp,
            EventType::ContextMenu,
        ] {
            assert!(policy.stops_at_source(kind), "{kind} should stop");
        }
        for kind in [
            EventType::MouseMove,
            EventType::MouseOver,
            EventType::MouseOut,
            EventType::KeyPress,
            EventType::KeyUp,
            EventType::KeyDown,
        ] {
            assert!(!policy.stops_at_source(kind), "{kind} should bubble");
        }
    }

    #[test]
    fn test_bubbling_table_stops_nothing() {
        let policy = PropagationPolicy::bubbling();
        assert!(EventType::DOM_MIRRORED
            .iter()
            .all(|kind| !policy.stops_at_source(*kind)));
        assert_eq!(policy.propagation(EventType::Move), Propagation::Bubble);
    }
}
