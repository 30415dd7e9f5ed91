//! Diagram elements: nodes, edges and clusters.
//!
//! Elements are constructed with a builder-style API and handed to a
//! [`Diagram`](super::Diagram), which validates them on insertion. Geometry
//! and animation fields start empty and are filled in by layout and ordering.

use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use cadence_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    semantic::{EdgeDirection, EdgeStyle, NodeShape},
};

/// Labels wider than this many display columns are truncated for display.
const MAX_LABEL_COLUMNS: usize = 20;

/// Display columns kept in front of the ellipsis of a truncated label.
const TRUNCATED_LABEL_COLUMNS: usize = 17;

const ELLIPSIS: &str = "...";

/// A diagram node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: Id,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    shape: NodeShape,
    #[serde(skip)]
    position_override: Option<Point>,
    position: Point,
    size: Size,
    merged: Vec<Id>,
    animation_index: Option<usize>,
}

impl Node {
    /// Creates a node with the default shape and no description.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cadence::structure::Node;
    /// # use cadence::semantic::NodeShape;
    /// let node = Node::new("db", "Database").with_shape(NodeShape::Cylinder);
    /// assert_eq!(node.label(), "Database");
    /// assert_eq!(node.shape(), NodeShape::Cylinder);
    /// ```
    pub fn new(id: impl Into<Id>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            shape: NodeShape::default(),
            position_override: None,
            position: Point::default(),
            size: Size::default(),
            merged: Vec::new(),
            animation_index: None,
        }
    }

    pub fn with_shape(mut self, shape: NodeShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Pins the node center to `position`, bypassing the layout engine.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position_override = Some(position);
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the label as it should be drawn.
    ///
    /// Labels wider than 20 display columns are cut to 17 columns followed
    /// by `...`.
    pub fn display_label(&self) -> String {
        truncate_label(&self.label)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    pub fn position_override(&self) -> Option<Point> {
        self.position_override
    }

    /// Returns the center of the node. Meaningful after layout.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the size of the node. Meaningful after layout.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Bounds {
        self.position.to_bounds(self.size)
    }

    /// Returns the ids of nodes folded into this one by simplification.
    pub fn merged(&self) -> &[Id] {
        &self.merged
    }

    pub fn animation_index(&self) -> Option<usize> {
        self.animation_index
    }

    pub(crate) fn set_geometry(&mut self, position: Point, size: Size) {
        self.position = position;
        self.size = size;
    }

    pub(crate) fn set_animation_index(&mut self, index: usize) {
        self.animation_index = Some(index);
    }

    pub(super) fn absorb(&mut self, other: Node) {
        self.merged.push(other.id);
        self.merged.extend(other.merged);
    }
}

fn truncate_label(label: &str) -> String {
    if label.width() <= MAX_LABEL_COLUMNS {
        return label.to_string();
    }
    let mut columns = 0;
    let mut truncated = String::with_capacity(label.len());
    for ch in label.chars() {
        let width = ch.width().unwrap_or(0);
        if columns + width > TRUNCATED_LABEL_COLUMNS {
            break;
        }
        columns += width;
        truncated.push(ch);
    }
    truncated.push_str(ELLIPSIS);
    truncated
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    id: Id,
    #[serde(skip)]
    explicit_id: bool,
    source: Id,
    target: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    style: EdgeStyle,
    direction: EdgeDirection,
    waypoints: Vec<Point>,
    animation_index: Option<usize>,
}

impl Edge {
    /// Creates an edge from `source` to `target`.
    ///
    /// Unless [`Edge::with_id`] is used, the id is `"{source}->{target}"`,
    /// suffixed with `#n` when a parallel edge already holds that id.
    pub fn new(source: impl Into<Id>, target: impl Into<Id>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: Id::edge(source, target),
            explicit_id: false,
            source,
            target,
            label: None,
            style: EdgeStyle::default(),
            direction: EdgeDirection::default(),
            waypoints: Vec::new(),
            animation_index: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<Id>) -> Self {
        self.id = id.into();
        self.explicit_id = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_style(mut self, style: EdgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_direction(mut self, direction: EdgeDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }

    pub fn direction(&self) -> EdgeDirection {
        self.direction
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Returns the routed path of the edge: start, control point, end.
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    pub fn animation_index(&self) -> Option<usize> {
        self.animation_index
    }

    pub(super) fn has_explicit_id(&self) -> bool {
        self.explicit_id
    }

    pub(super) fn set_id(&mut self, id: Id) {
        self.id = id;
    }

    pub(super) fn set_endpoints(&mut self, source: Id, target: Id) {
        self.source = source;
        self.target = target;
    }

    pub(super) fn merge_label(&mut self, other: Option<&str>) {
        self.label = match (self.label.take(), other) {
            (Some(mine), Some(theirs)) if mine != theirs => Some(format!("{mine} / {theirs}")),
            (Some(mine), _) => Some(mine),
            (None, theirs) => theirs.map(str::to_string),
        };
    }

    pub(crate) fn set_waypoints(&mut self, waypoints: Vec<Point>) {
        self.waypoints = waypoints;
    }

    pub(crate) fn set_animation_index(&mut self, index: usize) {
        self.animation_index = Some(index);
    }
}

/// A named group of nodes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    id: Id,
    label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    members: Vec<Id>,
    bounds: Bounds,
    animation_index: Option<usize>,
}

impl Cluster {
    /// Creates a cluster over `members`. Repeated member ids are kept once.
    pub fn new<I, M>(id: impl Into<Id>, label: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Id>,
    {
        let mut unique: Vec<Id> = Vec::new();
        for member in members {
            let member = member.into();
            if !unique.contains(&member) {
                unique.push(member);
            }
        }
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            members: unique,
            bounds: Bounds::default(),
            animation_index: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn members(&self) -> &[Id] {
        &self.members
    }

    pub fn contains(&self, node: Id) -> bool {
        self.members.contains(&node)
    }

    /// Returns the rectangle enclosing all members plus the cluster margin.
    /// Meaningful after layout.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn animation_index(&self) -> Option<usize> {
        self.animation_index
    }

    /// Replaces `old` with `new` in place, or drops `old` when `new` is
    /// already a member.
    pub(super) fn replace_member(&mut self, old: Id, new: Id) {
        if self.members.contains(&new) {
            self.members.retain(|m| *m != old);
        } else if let Some(slot) = self.members.iter_mut().find(|m| **m == old) {
            *slot = new;
        }
    }

    pub(crate) fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub(crate) fn set_animation_index(&mut self, index: usize) {
        self.animation_index = Some(index);
    }
}
