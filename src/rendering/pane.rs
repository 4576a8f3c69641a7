//! Layered containers that visual elements are inserted into

use crate::core::constants::STANDARD_PANES;
use crate::prelude::HashMap;
use crate::rendering::element::{ElementId, VisualElement};
use crate::{MapError, Result};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PANE_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneId(u64);

#[derive(Debug)]
struct PaneInner {
    id: PaneId,
    name: String,
    z_index: i32,
    children: RefCell<Vec<VisualElement>>,
}

/// Back reference from an element to the pane holding it
#[derive(Debug, Clone)]
pub(crate) struct WeakPane {
    id: PaneId,
    inner: Weak<PaneInner>,
}

impl WeakPane {
    pub(crate) fn id(&self) -> PaneId {
        self.id
    }

    fn upgrade(&self) -> Option<Pane> {
        self.inner.upgrade().map(|inner| Pane { inner })
    }
}

/// A named container. Clones share the same children.
#[derive(Debug, Clone)]
pub struct Pane {
    inner: Rc<PaneInner>,
}

impl PartialEq for Pane {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Pane {
    pub fn new(name: impl Into<String>, z_index: i32) -> Self {
        Self {
            inner: Rc::new(PaneInner {
                id: PaneId(NEXT_PANE_ID.fetch_add(1, Ordering::Relaxed)),
                name: name.into(),
                z_index,
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn id(&self) -> PaneId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn z_index(&self) -> i32 {
        self.inner.z_index
    }

    /// Appends `element`, taking it out of the pane it sat in before.
    /// No-op when it is already a child.
    pub fn append_child(&self, element: &VisualElement) {
        if let Some(previous) = element.parent() {
            if previous.id() == self.id() {
                return;
            }
            if let Some(previous) = previous.upgrade() {
                previous.remove_child(element);
            }
        }
        self.inner.children.borrow_mut().push(element.clone());
        element.set_parent(Some(self.downgrade()));
    }

    fn downgrade(&self) -> WeakPane {
        WeakPane {
            id: self.id(),
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Removes `element` if it is a child; returns whether it was
    pub fn remove_child(&self, element: &VisualElement) -> bool {
        let mut children = self.inner.children.borrow_mut();
        let before = children.len();
        children.retain(|child| child != element);
        let removed = children.len() != before;
        if removed {
            element.set_parent(None);
        }
        removed
    }

    pub fn contains(&self, element: &VisualElement) -> bool {
        self.inner.children.borrow().iter().any(|c| c == element)
    }

    pub fn contains_id(&self, id: ElementId) -> bool {
        self.inner.children.borrow().iter().any(|c| c.id() == id)
    }

    pub fn len(&self) -> usize {
        self.inner.children.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.children.borrow().is_empty()
    }
}

/// Every pane of one map, by name
#[derive(Debug, Clone)]
pub struct Panes {
    panes: HashMap<String, Pane>,
}

impl Panes {
    /// The standard tile/overlay/shadow/marker/tooltip/popup stack
    pub fn standard() -> Self {
        let panes = STANDARD_PANES
            .iter()
            .map(|(name, z_index)| (name.to_string(), Pane::new(*name, *z_index)))
            .collect();
        Self { panes }
    }

    pub fn get(&self, name: &str) -> Result<Pane> {
        self.panes
            .get(name)
            .cloned()
            .ok_or_else(|| MapError::UnknownPane(name.to_string()))
    }

    /// Returns the pane called `name`, creating it if needed
    pub fn create(&mut self, name: &str, z_index: i32) -> Pane {
        self.panes
            .entry(name.to_string())
            .or_insert_with(|| Pane::new(name, z_index))
            .clone()
    }

    /// Finds the pane currently holding `id`
    pub fn pane_of(&self, id: ElementId) -> Option<Pane> {
        self.panes.values().find(|pane| pane.contains_id(id)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_remove() {
        let pane = Pane::new("markerPane", 600);
        let el = VisualElement::new_image("a.png");

        pane.append_child(&el);
        pane.append_child(&el);
        assert_eq!(pane.len(), 1);
        assert_eq!(el.parent_pane(), Some(pane.id()));

        assert!(pane.remove_child(&el));
        assert!(!pane.remove_child(&el));
        assert!(pane.is_empty());
        assert_eq!(el.parent_pane(), None);
    }

    #[test]
    fn test_append_moves_between_panes() {
        let shadows = Pane::new("shadowPane", 500);
        let markers = Pane::new("markerPane", 600);
        let el = VisualElement::new_image("a.png");

        shadows.append_child(&el);
        markers.append_child(&el);
        assert!(!shadows.contains(&el));
        assert!(markers.contains(&el));
        assert_eq!(el.parent_pane(), Some(markers.id()));

        markers.remove_child(&el);
        assert!(!el.is_attached());
        assert!(shadows.is_empty() && markers.is_empty());
    }

    #[test]
    fn test_standard_panes_stack_shadows_below_markers() {
        let panes = Panes::standard();
        let shadow = panes.get("shadowPane").unwrap();
        let marker = panes.get("markerPane").unwrap();

        assert!(shadow.z_index() < marker.z_index());
        assert!(matches!(panes.get("nope"), Err(MapError::UnknownPane(_))));
    }

    #[test]
    fn test_pane_of() {
        let mut panes = Panes::standard();
        let custom = panes.create("labels", 610);
        let el = VisualElement::new_image("a.png");
        custom.append_child(&el);

        assert_eq!(panes.pane_of(el.id()), Some(custom));
    }
}
