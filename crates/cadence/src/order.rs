//! Animation ordering.
//!
//! Every element of a laid-out diagram gets a distinct `animation_index` in
//! `0..N`. Clusters come first in insertion order, then nodes in the order
//! the layout engine visited them, then edges sorted by the positions of
//! their endpoints in that node order. Edges between the same endpoints keep
//! their insertion order.

use std::collections::HashMap;

use log::debug;
use serde::Serialize;

use cadence_core::{identifier::Id, semantic::ElementCategory};

use crate::{layout::Layout, structure::Diagram};

/// An element in reveal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnimatedElement {
    id: Id,
    category: ElementCategory,
    index: usize,
}

impl AnimatedElement {
    pub fn new(id: Id, category: ElementCategory, index: usize) -> Self {
        Self {
            id,
            category,
            index,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn category(&self) -> ElementCategory {
        self.category
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Assigns an animation index to every element of `layout` and returns the
/// elements in that order.
///
/// Only the `animation_index` fields are modified.
pub fn assign_animation_order(layout: &mut Layout) -> Vec<AnimatedElement> {
    let node_order = layout.node_order().to_vec();
    let diagram = layout.diagram_mut();
    let sequence = reveal_sequence(diagram, &node_order);

    for element in &sequence {
        match element.category {
            ElementCategory::Cluster => {
                if let Some(cluster) = diagram.cluster_mut(element.id) {
                    cluster.set_animation_index(element.index);
                }
            }
            ElementCategory::Node => {
                if let Some(node) = diagram.node_mut(element.id) {
                    node.set_animation_index(element.index);
                }
            }
            ElementCategory::Edge => {
                if let Some(edge) = diagram.edge_mut(element.id) {
                    edge.set_animation_index(element.index);
                }
            }
        }
    }
    debug!(elements = sequence.len(); "Animation order assigned");
    sequence
}

/// Computes the reveal sequence without touching the diagram.
fn reveal_sequence(diagram: &Diagram, node_order: &[Id]) -> Vec<AnimatedElement> {
    let mut ids: Vec<(Id, ElementCategory)> = Vec::with_capacity(diagram.element_count());
    ids.extend(
        diagram
            .clusters()
            .map(|cluster| (cluster.id(), ElementCategory::Cluster)),
    );

    let mut position: HashMap<Id, usize> = HashMap::with_capacity(diagram.node_count());
    for id in node_order.iter().copied().filter(|id| diagram.contains_node(*id)) {
        let next = position.len();
        position.entry(id).or_insert(next);
    }
    // Nodes the engine did not visit follow in insertion order.
    for node in diagram.nodes() {
        let next = position.len();
        position.entry(node.id()).or_insert(next);
    }
    let mut nodes: Vec<Id> = diagram.nodes().map(|node| node.id()).collect();
    nodes.sort_by_key(|id| position[id]);
    ids.extend(nodes.into_iter().map(|id| (id, ElementCategory::Node)));

    let rank = |id: Id| position.get(&id).copied().unwrap_or(usize::MAX);
    let mut edges: Vec<_> = diagram.edges().collect();
    edges.sort_by_key(|edge| (rank(edge.source()), rank(edge.target())));
    ids.extend(edges.into_iter().map(|edge| (edge.id(), ElementCategory::Edge)));

    ids.into_iter()
        .enumerate()
        .map(|(index, (id, category))| AnimatedElement::new(id, category, index))
        .collect()
}

/// Collects the elements of `diagram` that carry an animation index, sorted
/// by it.
pub fn ordered_elements(diagram: &Diagram) -> Vec<AnimatedElement> {
    let mut elements: Vec<AnimatedElement> = diagram
        .clusters()
        .filter_map(|c| Some(AnimatedElement::new(c.id(), ElementCategory::Cluster, c.animation_index()?)))
        .chain(
            diagram
                .nodes()
                .filter_map(|n| Some(AnimatedElement::new(n.id(), ElementCategory::Node, n.animation_index()?))),
        )
        .chain(
            diagram
                .edges()
                .filter_map(|e| Some(AnimatedElement::new(e.id(), ElementCategory::Edge, e.animation_index()?))),
        )
        .collect();
    elements.sort_by_key(AnimatedElement::index);
    elements
}
