//! Retained, DOM-like image nodes.
//!
//! A [`VisualElement`] is a shared handle: clones point at the same node and
//! compare equal, so a caller holding a handle keeps observing the node the
//! marker renders into.

use crate::core::geo::Point;
use crate::rendering::pane::{PaneId, WeakPane};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Attributes and styles an element exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Src,
    Alt,
    Title,
    Class,
    TabIndex,
    Role,
    CrossOrigin,
    Width,
    Height,
    MarginLeft,
    MarginTop,
    Transform,
    ZIndex,
    Opacity,
}

/// Inline style of an element. Lengths are pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementStyle {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub margin_left: Option<f64>,
    pub margin_top: Option<f64>,
    /// `translate3d` offset applied by positioning
    pub translate: Option<Point>,
    pub z_index: Option<i32>,
    pub opacity: Option<f64>,
}

fn px(value: Option<f64>) -> Option<String> {
    value.map(|v| format!("{v}px"))
}

impl ElementStyle {
    /// CSS `width`, e.g. `"96px"`
    pub fn width_css(&self) -> Option<String> {
        px(self.width)
    }

    pub fn height_css(&self) -> Option<String> {
        px(self.height)
    }

    pub fn transform_css(&self) -> Option<String> {
        self.translate
            .map(|p| format!("translate3d({}px, {}px, 0px)", p.x, p.y))
    }
}

#[derive(Debug, Clone, Default)]
struct ElementData {
    pub src: String,
    pub alt: Option<String>,
    pub title: Option<String>,
    pub classes: Vec<String>,
    pub tab_index: Option<i32>,
    pub role: Option<String>,
    pub cross_origin: Option<String>,
    pub style: ElementStyle,
    parent: Option<WeakPane>,
}

#[derive(Clone)]
pub struct VisualElement {
    id: ElementId,
    data: Rc<RefCell<ElementData>>,
}

impl fmt::Debug for VisualElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualElement")
            .field("id", &self.id)
            .field("data", &*self.data.borrow())
            .finish()
    }
}

impl PartialEq for VisualElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for VisualElement {}

/// Writes `value` into `slot` and reports whether it differed
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

impl VisualElement {
    /// Creates a detached image element
    pub fn new_image(src: impl Into<String>) -> Self {
        let id = ElementId(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed));
        log::trace!("creating {id}");
        Self {
            id,
            data: Rc::new(RefCell::new(ElementData {
                src: src.into(),
                ..ElementData::default()
            })),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn src(&self) -> String {
        self.data.borrow().src.clone()
    }

    pub fn alt(&self) -> Option<String> {
        self.data.borrow().alt.clone()
    }

    pub fn title(&self) -> Option<String> {
        self.data.borrow().title.clone()
    }

    pub fn tab_index(&self) -> Option<i32> {
        self.data.borrow().tab_index
    }

    pub fn role(&self) -> Option<String> {
        self.data.borrow().role.clone()
    }

    pub fn has_attribute(&self, attribute: Attribute) -> bool {
        let data = self.data.borrow();
        match attribute {
            Attribute::Src => true,
            Attribute::Alt => data.alt.is_some(),
            Attribute::Title => data.title.is_some(),
            Attribute::Class => !data.classes.is_empty(),
            Attribute::TabIndex => data.tab_index.is_some(),
            Attribute::Role => data.role.is_some(),
            Attribute::CrossOrigin => data.cross_origin.is_some(),
            Attribute::Width => data.style.width.is_some(),
            Attribute::Height => data.style.height.is_some(),
            Attribute::MarginLeft => data.style.margin_left.is_some(),
            Attribute::MarginTop => data.style.margin_top.is_some(),
            Attribute::Transform => data.style.translate.is_some(),
            Attribute::ZIndex => data.style.z_index.is_some(),
            Attribute::Opacity => data.style.opacity.is_some(),
        }
    }

    /// Space-separated class list
    pub fn class_name(&self) -> String {
        self.data.borrow().classes.join(" ")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.data.borrow().classes.iter().any(|c| c == class)
    }

    pub fn style(&self) -> ElementStyle {
        self.data.borrow().style.clone()
    }

    /// The pane this element is attached to
    pub fn parent_pane(&self) -> Option<PaneId> {
        self.data.borrow().parent.as_ref().map(WeakPane::id)
    }

    pub fn is_attached(&self) -> bool {
        self.parent_pane().is_some()
    }

    /// On-screen top-left corner: translate plus the negative-anchor margins
    pub fn offset(&self) -> Point {
        let style = &self.data.borrow().style;
        let translate = style.translate.unwrap_or_default();
        Point::new(
            translate.x + style.margin_left.unwrap_or(0.0),
            translate.y + style.margin_top.unwrap_or(0.0),
        )
    }

    pub(crate) fn parent(&self) -> Option<WeakPane> {
        self.data.borrow().parent.clone()
    }

    pub(crate) fn set_parent(&self, parent: Option<WeakPane>) {
        self.data.borrow_mut().parent = parent;
    }

    // Attribute writers. Each returns whether the value changed.

    pub fn set_src(&self, src: &str) -> bool {
        let mut data = self.data.borrow_mut();
        if data.src == src {
            return false;
        }
        data.src = src.to_string();
        true
    }

    pub fn set_alt(&self, alt: Option<&str>) -> bool {
        replace(&mut self.data.borrow_mut().alt, alt.map(str::to_string))
    }

    pub fn set_title(&self, title: Option<&str>) -> bool {
        replace(&mut self.data.borrow_mut().title, title.map(str::to_string))
    }

    pub fn set_classes(&self, classes: Vec<String>) -> bool {
        replace(&mut self.data.borrow_mut().classes, classes)
    }

    pub fn set_tab_index(&self, tab_index: Option<i32>) -> bool {
        replace(&mut self.data.borrow_mut().tab_index, tab_index)
    }

    pub fn set_role(&self, role: Option<&str>) -> bool {
        replace(&mut self.data.borrow_mut().role, role.map(str::to_string))
    }

    pub fn set_cross_origin(&self, cross_origin: Option<&str>) -> bool {
        replace(
            &mut self.data.borrow_mut().cross_origin,
            cross_origin.map(str::to_string),
        )
    }

    pub fn set_size(&self, size: Option<Point>) -> (bool, bool) {
        let mut data = self.data.borrow_mut();
        (
            replace(&mut data.style.width, size.map(|s| s.x)),
            replace(&mut data.style.height, size.map(|s| s.y)),
        )
    }

    /// Margins are the negated anchor so the anchor lands on the position
    pub fn set_anchor(&self, anchor: Option<Point>) -> (bool, bool) {
        let mut data = self.data.borrow_mut();
        (
            replace(&mut data.style.margin_left, anchor.map(|a| -a.x)),
            replace(&mut data.style.margin_top, anchor.map(|a| -a.y)),
        )
    }

    pub fn set_position(&self, position: Point) -> bool {
        replace(&mut self.data.borrow_mut().style.translate, Some(position))
    }

    pub fn set_z_index(&self, z_index: Option<i32>) -> bool {
        replace(&mut self.data.borrow_mut().style.z_index, z_index)
    }

    pub fn set_opacity(&self, opacity: Option<f64>) -> bool {
        replace(&mut self.data.borrow_mut().style.opacity, opacity)
    }
}
