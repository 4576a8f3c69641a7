//! Binds icon definitions to visual elements.
//!
//! Existing elements are always updated in place: a node a caller holds on
//! to stays the node the marker renders into, whatever icon is applied.

use crate::core::constants::{ICON_CLASS, SHADOW_CLASS};
use crate::core::geo::Point;
use crate::layers::icon::{Icon, IconDescriptor, IconKind};
use crate::rendering::element::{Attribute, VisualElement};
use crate::rendering::pane::Pane;
use crate::{MapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    Primary,
    Shadow,
}

/// One observable mutation made by [`create_or_update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementChange {
    Created(ElementRole),
    Removed(ElementRole),
    Attribute(ElementRole, Attribute),
}

/// What to render and how
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub icon: &'a Icon,
    pub retina: bool,
    /// Give the primary element tab index 0 and role `button` when the icon
    /// sets no tab index of its own
    pub keyboard: bool,
    /// Replaces the icon's alt text on the primary element
    pub alt: Option<&'a str>,
    /// Classes appended after the icon's own on the primary element
    pub primary_classes: &'a [&'a str],
    /// Classes appended after the icon's own on the shadow element
    pub shadow_classes: &'a [&'a str],
}

/// Where new elements go
#[derive(Debug, Clone, Copy)]
pub struct RenderTargets<'a> {
    pub primary_pane: &'a Pane,
    pub shadow_pane: &'a Pane,
}

#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub primary: VisualElement,
    pub shadow: Option<VisualElement>,
    /// Empty when the elements already matched the request
    pub changes: Vec<ElementChange>,
}

/// Creates or updates the primary and shadow elements for `request.icon`.
///
/// * a missing primary is created and appended to the primary pane;
///   an existing one is mutated in place
/// * shadows follow the same rule; an existing shadow is detached from the
///   shadow pane when the icon has none
pub fn create_or_update(
    existing_primary: Option<&VisualElement>,
    existing_shadow: Option<&VisualElement>,
    request: &RenderRequest<'_>,
    targets: &RenderTargets<'_>,
) -> Result<RenderOutcome> {
    let mut changes = Vec::new();

    let descriptor = request
        .icon
        .describe_for(IconKind::Icon, request.retina)
        .ok_or(MapError::MissingIconUrl)?;
    let primary = bind(
        existing_primary,
        &descriptor,
        ElementRole::Primary,
        request,
        targets.primary_pane,
        &mut changes,
    );

    let shadow = match request.icon.describe_for(IconKind::Shadow, request.retina) {
        Some(descriptor) => Some(bind(
            existing_shadow,
            &descriptor,
            ElementRole::Shadow,
            request,
            targets.shadow_pane,
            &mut changes,
        )),
        None => {
            if let Some(old) = existing_shadow {
                targets.shadow_pane.remove_child(old);
                log::debug!("detached shadow {}", old.id());
                changes.push(ElementChange::Removed(ElementRole::Shadow));
            }
            None
        }
    };

    Ok(RenderOutcome {
        primary,
        shadow,
        changes,
    })
}

fn bind(
    existing: Option<&VisualElement>,
    descriptor: &IconDescriptor,
    role: ElementRole,
    request: &RenderRequest<'_>,
    pane: &Pane,
    changes: &mut Vec<ElementChange>,
) -> VisualElement {
    let element = match existing {
        Some(element) => element.clone(),
        None => {
            changes.push(ElementChange::Created(role));
            VisualElement::new_image(descriptor.url.as_str())
        }
    };

    apply(&element, descriptor, role, request, changes);

    if !pane.contains(&element) {
        pane.append_child(&element);
        log::debug!("attached {} to {}", element.id(), pane.name());
    }
    element
}

fn apply(
    element: &VisualElement,
    descriptor: &IconDescriptor,
    role: ElementRole,
    request: &RenderRequest<'_>,
    changes: &mut Vec<ElementChange>,
) {
    let mut record = |changed: bool, attribute: Attribute| {
        if changed {
            changes.push(ElementChange::Attribute(role, attribute));
        }
    };

    record(element.set_src(&descriptor.url), Attribute::Src);

    let (width, height) = element.set_size(descriptor.size);
    record(width, Attribute::Width);
    record(height, Attribute::Height);

    let (left, top) = element.set_anchor(descriptor.anchor);
    record(left, Attribute::MarginLeft);
    record(top, Attribute::MarginTop);

    let (base, extra) = match role {
        ElementRole::Primary => (ICON_CLASS, request.primary_classes),
        ElementRole::Shadow => (SHADOW_CLASS, request.shadow_classes),
    };
    record(
        element.set_classes(class_list(base, descriptor.class_name.as_deref(), extra)),
        Attribute::Class,
    );

    let alt = match role {
        ElementRole::Primary => request.alt.unwrap_or(descriptor.alt.as_str()),
        ElementRole::Shadow => descriptor.alt.as_str(),
    };
    record(element.set_alt(Some(alt)), Attribute::Alt);
    record(
        element.set_cross_origin(descriptor.cross_origin.as_deref()),
        Attribute::CrossOrigin,
    );

    let tab_index = match role {
        ElementRole::Primary => descriptor
            .tab_index
            .or(if request.keyboard { Some(0) } else { None }),
        ElementRole::Shadow => None,
    };
    record(element.set_tab_index(tab_index), Attribute::TabIndex);
    record(
        element.set_role(tab_index.map(|_| "button")),
        Attribute::Role,
    );
}

fn class_list(base: &str, custom: Option<&str>, extra: &[&str]) -> Vec<String> {
    std::iter::once(base)
        .chain(custom.into_iter().flat_map(str::split_whitespace))
        .chain(extra.iter().copied())
        .map(str::to_string)
        .collect()
}

/// Places both elements at `position` (a layer point). Each element's
/// anchor margins shift it so the anchor lands on `position`.
pub fn position_elements(
    primary: &VisualElement,
    shadow: Option<&VisualElement>,
    position: Point,
) -> bool {
    let mut changed = primary.set_position(position);
    if let Some(shadow) = shadow {
        changed |= shadow.set_position(position);
    }
    changed
}
