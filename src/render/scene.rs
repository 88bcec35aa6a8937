use std::collections::BTreeMap;

use crate::{
    animation::timeline::{Prop, Value},
    foundation::core::{Seconds, Vec2},
    geometry::connector::ConnectorPath,
};

/// Stable handle of an element in a [`Scene`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ElementId(pub u32);

/// Role of a scene element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Scene root.
    Root,
    /// Named container surface.
    Layer,
    /// Translatable container (the mirrored-copy group).
    Group,
    /// Rendered point.
    Star,
    /// Rendered connection.
    Line,
    /// Expanding-ring decoration around an origin point.
    Ripple,
    /// Annotation card.
    Label,
    /// Point caption.
    Message,
}

/// Content of an annotation card.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Card {
    /// Category tag.
    pub category: String,
    /// Icon class.
    pub icon: String,
    /// Card heading.
    pub title: String,
    /// Card body text.
    pub body: String,
}

/// Mutable attribute bag of an element. Unused attributes keep their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Attrs {
    /// Circle center x.
    pub cx: f64,
    /// Circle center y.
    pub cy: f64,
    /// Circle radius.
    pub r: f64,
    /// Box origin x.
    pub x: f64,
    /// Box origin y.
    pub y: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
    /// Intrinsic opacity.
    pub opacity: f64,
    /// Temporary opacity override (hover highlight).
    pub hover_opacity: Option<f64>,
    /// Group translation.
    pub translate: Vec2,
    /// Connector shape.
    pub path: Option<ConnectorPath>,
    /// Stroke dash length; `None` draws a solid stroke.
    pub dash_array: Option<f64>,
    /// Stroke dash offset.
    pub dash_offset: f64,
    /// Fill paint.
    pub fill: Option<String>,
    /// Stroke paint.
    pub stroke: Option<String>,
    /// Stroke width.
    pub stroke_width: f64,
    /// Glow filter reference.
    pub glow: Option<String>,
    /// Style class.
    pub class: Option<String>,
    /// Text content.
    pub text: String,
    /// Annotation card content.
    pub card: Option<Card>,
    /// Start delay of a looping decoration.
    pub animation_delay: Option<Seconds>,
}

impl Default for Attrs {
    fn default() -> Self {
        Self {
            cx: 0.0,
            cy: 0.0,
            r: 0.0,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            opacity: 1.0,
            hover_opacity: None,
            translate: Vec2::ZERO,
            path: None,
            dash_array: None,
            dash_offset: 0.0,
            fill: None,
            stroke: None,
            stroke_width: 0.0,
            glow: None,
            class: None,
            text: String::new(),
            card: None,
            animation_delay: None,
        }
    }
}

/// One node of the retained scene tree.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Element {
    /// Element role.
    pub kind: ElementKind,
    /// Logical id this element renders (point, connection or annotation id, or layer name).
    pub data_id: String,
    /// Parent element, `None` while unattached.
    pub parent: Option<ElementId>,
    /// Children in paint order.
    pub children: Vec<ElementId>,
    /// Attributes.
    pub attrs: Attrs,
}

/// Retained element tree standing in for the host document.
///
/// Every lookup is total: operations on unknown or detached ids are no-ops.
#[derive(Clone, Debug)]
pub struct Scene {
    elements: BTreeMap<ElementId, Element>,
    root: ElementId,
    next_id: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Scene holding only a root element.
    pub fn new() -> Self {
        let root = ElementId(0);
        let mut elements = BTreeMap::new();
        elements.insert(
            root,
            Element {
                kind: ElementKind::Root,
                data_id: String::new(),
                parent: None,
                children: Vec::new(),
                attrs: Attrs::default(),
            },
        );
        Self {
            elements,
            root,
            next_id: 1,
        }
    }

    /// Scene with the given named layers attached to the root, in order.
    pub fn with_layers(names: &[&str]) -> Self {
        let mut scene = Self::new();
        for name in names {
            scene.add_layer(name);
        }
        scene
    }

    /// Root element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Create and attach a named layer under the root.
    pub fn add_layer(&mut self, name: &str) -> ElementId {
        let id = self.create(ElementKind::Layer, name);
        self.append(self.root, id);
        id
    }

    /// Attached layer with the given name.
    pub fn layer(&self, name: &str) -> Option<ElementId> {
        self.children(self.root).iter().copied().find(|id| {
            self.get(*id)
                .is_some_and(|e| e.kind == ElementKind::Layer && e.data_id == name)
        })
    }

    /// Create an unattached element with default attributes.
    pub fn create(&mut self, kind: ElementKind, data_id: &str) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(
            id,
            Element {
                kind,
                data_id: data_id.to_owned(),
                parent: None,
                children: Vec::new(),
                attrs: Attrs::default(),
            },
        );
        id
    }

    /// Attach `child` directly before `before` under `parent`; appends when `before` is not a
    /// child of `parent`.
    pub fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        before: ElementId,
    ) -> bool {
        if !self.append(parent, child) {
            return false;
        }
        if let Some(p) = self.elements.get_mut(&parent)
            && let Some(pos) = p.children.iter().position(|c| *c == before)
        {
            p.children.pop();
            p.children.insert(pos, child);
        }
        true
    }

    /// Attach `child` as the last child of `parent`, moving it if already attached.
    pub fn append(&mut self, parent: ElementId, child: ElementId) -> bool {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return false;
        }
        self.unlink(child);
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.push(child);
        }
        if let Some(c) = self.elements.get_mut(&child) {
            c.parent = Some(parent);
        }
        true
    }

    /// Remove an element and its whole subtree. Returns `false` for unknown ids and the root.
    pub fn detach(&mut self, id: ElementId) -> bool {
        if id == self.root || !self.contains(id) {
            return false;
        }
        self.unlink(id);
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(el) = self.elements.remove(&next) {
                stack.extend(el.children);
            }
        }
        true
    }

    fn unlink(&mut self, id: ElementId) {
        let Some(parent) = self.elements.get(&id).and_then(|e| e.parent) else {
            return;
        };
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(el) = self.elements.get_mut(&id) {
            el.parent = None;
        }
    }

    /// `true` while the element exists.
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Element by id.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Mutable element by id.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    /// Attributes of an element.
    pub fn attrs(&self, id: ElementId) -> Option<&Attrs> {
        self.get(id).map(|e| &e.attrs)
    }

    /// Mutable attributes of an element.
    pub fn attrs_mut(&mut self, id: ElementId) -> Option<&mut Attrs> {
        self.get_mut(id).map(|e| &mut e.attrs)
    }

    /// Children of an element; empty for unknown ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.get(id).map_or(&[], |e| e.children.as_slice())
    }

    /// Current value of an animatable attribute.
    pub fn read(&self, id: ElementId, prop: Prop) -> Option<Value> {
        let a = self.attrs(id)?;
        let num = match prop {
            Prop::Cx => a.cx,
            Prop::Cy => a.cy,
            Prop::R => a.r,
            Prop::X => a.x,
            Prop::Y => a.y,
            Prop::Opacity => a.opacity,
            Prop::TranslateX => a.translate.x,
            Prop::TranslateY => a.translate.y,
            Prop::DashOffset => a.dash_offset,
            Prop::Path => return a.path.map(Value::Path),
        };
        Some(Value::Num(num))
    }

    /// Write an animatable attribute. Mismatched value variants are ignored.
    pub fn write(&mut self, id: ElementId, prop: Prop, value: &Value) -> bool {
        let Some(a) = self.attrs_mut(id) else {
            return false;
        };
        match (prop, value) {
            (Prop::Path, Value::Path(p)) => a.path = Some(*p),
            (Prop::Path, Value::Num(_)) | (_, Value::Path(_)) => return false,
            (prop, Value::Num(v)) => {
                let slot = match prop {
                    Prop::Cx => &mut a.cx,
                    Prop::Cy => &mut a.cy,
                    Prop::R => &mut a.r,
                    Prop::X => &mut a.x,
                    Prop::Y => &mut a.y,
                    Prop::Opacity => &mut a.opacity,
                    Prop::TranslateX => &mut a.translate.x,
                    Prop::TranslateY => &mut a.translate.y,
                    Prop::DashOffset => &mut a.dash_offset,
                    Prop::Path => return false,
                };
                *slot = *v;
            }
        }
        true
    }

    /// Write several attributes at once.
    pub fn write_all(&mut self, id: ElementId, props: &[(Prop, Value)]) {
        for (prop, value) in props {
            self.write(id, *prop, value);
        }
    }

    /// First element of `kind` tagged with `data_id`.
    pub fn find_by_data_id(&self, kind: ElementKind, data_id: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .find(|(_, e)| e.kind == kind && e.data_id == data_id)
            .map(|(id, _)| *id)
    }

    /// Number of live elements of `kind`.
    pub fn count_kind(&self, kind: ElementKind) -> usize {
        self.elements.values().filter(|e| e.kind == kind).count()
    }

    /// All live elements in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.elements.iter().map(|(id, e)| (*id, e))
    }

    /// Opacity as displayed: the hover override when set, otherwise the intrinsic opacity.
    pub fn effective_opacity(&self, id: ElementId) -> Option<f64> {
        self.attrs(id)
            .map(|a| a.hover_opacity.unwrap_or(a.opacity))
    }

    /// Accumulated group translation above `id` (excluding its own).
    pub fn ancestor_translation(&self, id: ElementId) -> Vec2 {
        let mut total = Vec2::ZERO;
        let mut cursor = self.get(id).and_then(|e| e.parent);
        while let Some(p) = cursor {
            let Some(el) = self.get(p) else { break };
            total += el.attrs.translate;
            cursor = el.parent;
        }
        total
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
