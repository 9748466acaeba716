// Copyright 2026 the Motionpath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host interface: element geometry and animated property access.
//!
//! Motion paths are resolved against a tree of elements that the host owns,
//! such as a DOM or a retained scene graph. The [`Scene`] trait exposes the
//! read-only geometry of that tree, and [`PropertyAccess`] adds the numeric
//! property reads and writes a motion needs.
//!
//! [`SceneTree`] is a small in-memory implementation of both.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use crate::{Affine, Rect, Size, Vec2};

/// Read access to the geometry of a tree of elements.
pub trait Scene {
    /// A handle to an element.
    type Element: Clone + PartialEq + fmt::Debug;

    /// The parent element, or `None` for the top-level frame.
    fn parent(&self, el: &Self::Element) -> Option<Self::Element>;

    /// The transform from the element's local space into its parent's space.
    fn transform(&self, el: &Self::Element) -> Affine;

    /// The bounding box of a graphical element, in its local space.
    ///
    /// Non-graphical elements return `None`.
    fn bounding_box(&self, el: &Self::Element) -> Option<Rect>;

    /// The laid-out size of the element's box.
    fn layout_size(&self, el: &Self::Element) -> Size;

    /// The `viewBox` of an `svg` element.
    fn view_box(&self, el: &Self::Element) -> Option<Rect>;

    /// The viewport size of an `svg` element (its `width` and `height`).
    fn viewport_size(&self, el: &Self::Element) -> Option<Size>;

    /// The lower-case tag name, such as `"path"` or `"svg"`.
    fn tag_name(&self, el: &Self::Element) -> &str;

    /// Path data of a path-shaped element.
    fn path_data(&self, el: &Self::Element) -> Option<Cow<'_, str>>;

    /// The nearest `svg` ancestor of the element.
    fn owner_svg(&self, el: &Self::Element) -> Option<Self::Element>;

    /// How far the element's content is scrolled.
    fn scroll_offset(&self, _el: &Self::Element) -> Vec2 {
        Vec2::ZERO
    }

    /// Resolve a selector to the elements it names, in document order.
    fn resolve_targets(&self, selector: &str) -> Vec<Self::Element>;

    /// Ask the host to move the element's transform origin.
    ///
    /// The origin is given as fractions of the element's size.
    fn set_transform_origin(&mut self, _el: &Self::Element, _origin: (f64, f64)) {}
}

/// Numeric property access on elements.
pub trait PropertyAccess: Scene {
    /// Read a property, converted to `unit`.
    ///
    /// Properties that are unset or not numeric read as zero.
    fn read_property(&self, el: &Self::Element, name: &str, unit: &str) -> f64;

    /// The unit a property is currently expressed in, if any.
    fn property_unit(&self, el: &Self::Element, name: &str) -> Option<String>;

    /// Write a property.
    fn write_property(&mut self, el: &Self::Element, name: &str, value: f64, unit: Option<&str>);
}

/// Read a property as a finite number, treating anything else as zero.
pub(crate) fn read_number<H: PropertyAccess + ?Sized>(
    host: &H,
    el: &H::Element,
    name: &str,
    unit: &str,
) -> f64 {
    let value = host.read_property(el, name, unit);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// A handle to a node in a [`SceneTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// A numeric property value together with its unit.
#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    /// The number.
    pub value: f64,
    /// The unit, such as `"px"` or `"deg"`.
    pub unit: Option<String>,
}

/// A node of a [`SceneTree`].
#[derive(Clone, Debug, Default)]
pub struct Node {
    /// The lower-case tag name.
    pub tag: String,
    /// An identifier, matched by `#id` selectors.
    pub id: Option<String>,
    /// The transform into the parent's space, excluding `x` and `y`.
    pub transform: Affine,
    /// The bounding box in local space, for graphical nodes.
    pub bounding_box: Option<Rect>,
    /// The laid-out size.
    pub layout_size: Size,
    /// The `viewBox`, for `svg` nodes.
    pub view_box: Option<Rect>,
    /// The viewport size, for `svg` nodes.
    pub viewport_size: Option<Size>,
    /// Path data, for path-shaped nodes.
    pub path_data: Option<String>,
    /// How far the content is scrolled.
    pub scroll_offset: Vec2,
    /// Animated numeric properties.
    pub properties: BTreeMap<String, Property>,
    /// The transform origin last requested through [`Scene::set_transform_origin`].
    pub transform_origin: Option<(f64, f64)>,
}

/// A retained tree of nodes implementing [`Scene`] and [`PropertyAccess`].
///
/// The `x` and `y` properties of a node translate it within its parent, the
/// way CSS transforms do, so moving a node along a path moves its frame.
#[derive(Clone, Debug, Default)]
pub struct SceneTree {
    nodes: Vec<Node>,
    parents: Vec<Option<NodeId>>,
}

impl Node {
    /// A node with the given tag and default geometry.
    pub fn new(tag: &str) -> Node {
        Node {
            tag: tag.to_ascii_lowercase(),
            ..Node::default()
        }
    }

    /// Set the identifier.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Node {
        self.id = Some(id.to_owned());
        self
    }

    /// Set the local transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Affine) -> Node {
        self.transform = transform;
        self
    }

    /// Set the bounding box.
    #[must_use]
    pub fn with_bounding_box(mut self, rect: Rect) -> Node {
        self.bounding_box = Some(rect);
        self
    }

    /// Set the laid-out size.
    #[must_use]
    pub fn with_layout_size(mut self, size: Size) -> Node {
        self.layout_size = size;
        self
    }

    /// Set the `viewBox` and viewport size.
    #[must_use]
    pub fn with_view_box(mut self, view_box: Rect, viewport: Size) -> Node {
        self.view_box = Some(view_box);
        self.viewport_size = Some(viewport);
        self
    }

    /// Set the path data.
    #[must_use]
    pub fn with_path_data(mut self, data: &str) -> Node {
        self.path_data = Some(data.to_owned());
        self
    }

    /// Set a numeric property.
    #[must_use]
    pub fn with_property(mut self, name: &str, value: f64, unit: Option<&str>) -> Node {
        self.properties.insert(
            name.to_owned(),
            Property {
                value,
                unit: unit.map(str::to_owned),
            },
        );
        self
    }
}

impl SceneTree {
    /// An empty tree.
    pub fn new() -> SceneTree {
        SceneTree::default()
    }

    /// Add a node under `parent`, or as a new top-level frame.
    pub fn insert(&mut self, parent: Option<NodeId>, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        self.parents.push(parent);
        id
    }

    /// The node behind a handle.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Mutable access to the node behind a handle.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// The value of a property, if set.
    pub fn property(&self, id: NodeId, name: &str) -> Option<f64> {
        self.node(id).properties.get(name).map(|p| p.value)
    }

    fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
}

impl Scene for SceneTree {
    type Element = NodeId;

    fn parent(&self, el: &NodeId) -> Option<NodeId> {
        self.parents[el.0]
    }

    fn transform(&self, el: &NodeId) -> Affine {
        let translate = Vec2::new(
            self.property(*el, "x").unwrap_or(0.0),
            self.property(*el, "y").unwrap_or(0.0),
        );
        self.node(*el).transform.then_translate(translate)
    }

    fn bounding_box(&self, el: &NodeId) -> Option<Rect> {
        self.node(*el).bounding_box
    }

    fn layout_size(&self, el: &NodeId) -> Size {
        self.node(*el).layout_size
    }

    fn view_box(&self, el: &NodeId) -> Option<Rect> {
        self.node(*el).view_box
    }

    fn viewport_size(&self, el: &NodeId) -> Option<Size> {
        self.node(*el).viewport_size
    }

    fn tag_name(&self, el: &NodeId) -> &str {
        &self.node(*el).tag
    }

    fn path_data(&self, el: &NodeId) -> Option<Cow<'_, str>> {
        self.node(*el).path_data.as_deref().map(Cow::Borrowed)
    }

    fn owner_svg(&self, el: &NodeId) -> Option<NodeId> {
        let mut cur = self.parent(el);
        while let Some(id) = cur {
            if self.node(id).tag == "svg" {
                return Some(id);
            }
            cur = self.parent(&id);
        }
        None
    }

    fn scroll_offset(&self, el: &NodeId) -> Vec2 {
        self.node(*el).scroll_offset
    }

    /// Supports `#id` and bare tag name selectors.
    fn resolve_targets(&self, selector: &str) -> Vec<NodeId> {
        let selector = selector.trim();
        match selector.strip_prefix('#') {
            Some(id) => self
                .ids()
                .filter(|n| self.node(*n).id.as_deref() == Some(id))
                .collect(),
            None => {
                let tag = selector.to_ascii_lowercase();
                self.ids().filter(|n| self.node(*n).tag == tag).collect()
            }
        }
    }

    fn set_transform_origin(&mut self, el: &NodeId, origin: (f64, f64)) {
        self.node_mut(*el).transform_origin = Some(origin);
    }
}

impl PropertyAccess for SceneTree {
    fn read_property(&self, el: &NodeId, name: &str, _unit: &str) -> f64 {
        self.property(*el, name).unwrap_or(0.0)
    }

    fn property_unit(&self, el: &NodeId, name: &str) -> Option<String> {
        self.node(*el)
            .properties
            .get(name)
            .and_then(|p| p.unit.clone())
    }

    fn write_property(&mut self, el: &NodeId, name: &str, value: f64, unit: Option<&str>) {
        self.node_mut(*el).properties.insert(
            name.to_owned(),
            Property {
                value,
                unit: unit.map(str::to_owned),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point;

    #[test]
    fn tree_structure() {
        let mut tree = SceneTree::new();
        let svg = tree.insert(None, Node::new("SVG").with_id("stage"));
        let g = tree.insert(Some(svg), Node::new("g"));
        let path = tree.insert(Some(g), Node::new("path").with_path_data("M0 0 L1 1"));
        assert_eq!(tree.parent(&path), Some(g));
        assert_eq!(tree.parent(&svg), None);
        assert_eq!(tree.tag_name(&svg), "svg");
        assert_eq!(tree.owner_svg(&path), Some(svg));
        assert_eq!(tree.owner_svg(&svg), None);
        assert_eq!(tree.path_data(&path).as_deref(), Some("M0 0 L1 1"));
        assert_eq!(tree.resolve_targets("#stage"), [svg]);
        assert_eq!(tree.resolve_targets("path"), [path]);
        assert!(tree.resolve_targets("#missing").is_empty());
    }

    #[test]
    fn position_properties_translate() {
        let mut tree = SceneTree::new();
        let el = tree.insert(
            None,
            Node::new("div")
                .with_transform(Affine::scale(2.0))
                .with_property("x", 5.0, Some("px")),
        );
        assert_eq!(tree.transform(&el) * Point::new(1.0, 1.0), Point::new(7.0, 2.0));
        tree.write_property(&el, "y", 3.0, None);
        assert_eq!(tree.transform(&el) * Point::new(1.0, 1.0), Point::new(7.0, 5.0));
        assert_eq!(tree.read_property(&el, "x", "px"), 5.0);
        assert_eq!(tree.read_property(&el, "opacity", "px"), 0.0);
        assert_eq!(tree.property_unit(&el, "x").as_deref(), Some("px"));
        assert_eq!(tree.property_unit(&el, "y"), None);
    }

    #[test]
    fn transform_origin_is_recorded() {
        let mut tree = SceneTree::new();
        let el = tree.insert(None, Node::new("div"));
        tree.set_transform_origin(&el, (0.5, 0.5));
        assert_eq!(tree.node(el).transform_origin, Some((0.5, 0.5)));
    }
}
