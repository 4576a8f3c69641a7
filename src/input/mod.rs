pub mod evented;
pub mod events;
pub mod propagation;

// Re-export the essential types
pub use evented::{EventCallback, Evented, ListenerId};
pub use events::{DomEvent, Event, EventTarget, EventType, KeyCode, KeyModifiers, MouseButton};
pub use propagation::{Propagation, PropagationPolicy};
