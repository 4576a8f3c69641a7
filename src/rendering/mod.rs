pub mod element;
pub mod pane;

// Re-export main types
pub use element::{Attribute, ElementId, ElementStyle, VisualElement};
pub use pane::{Pane, PaneId, Panes};
