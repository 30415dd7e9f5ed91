//! Radial layout engine
//!
//! The hub, the node with the highest degree (earliest inserted on ties),
//! sits at the canvas center. Every other node goes on the ring matching its
//! hop distance from the hub in the undirected graph. Ring `k` has radius
//! `radius + (k - 1) * ring_spacing`, and its nodes are spread evenly
//! starting from the top (-π/2), in insertion order. Nodes unreachable from
//! the hub share one ring outside the outermost reachable ring.

use std::{
    collections::{BTreeMap, HashMap},
    f32::consts::{FRAC_PI_2, TAU},
};

use petgraph::{
    algo::dijkstra,
    graph::{NodeIndex, UnGraph},
};

use cadence_core::{
    geometry::{Point, Size},
    identifier::Id,
};

use crate::{
    layout::{
        engines::{LayoutEngine, Placement},
        sizing::NodeSizes,
    },
    structure::Diagram,
};

#[derive(Debug, Clone)]
pub struct Engine {
    canvas: Size,
    radius: f32,
    ring_spacing: f32,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            canvas: Size::default(),
            radius: 200.0,
            ring_spacing: 150.0,
        }
    }

    pub fn set_canvas(&mut self, canvas: Size) -> &mut Self {
        self.canvas = canvas;
        self
    }

    pub fn set_rings(&mut self, radius: f32, ring_spacing: f32) -> &mut Self {
        self.radius = radius;
        self.ring_spacing = ring_spacing;
        self
    }

    /// Radius of ring `ring`, counting from 1.
    pub fn ring_radius(&self, ring: usize) -> f32 {
        self.radius + ring.saturating_sub(1) as f32 * self.ring_spacing
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine for Engine {
    fn place(&self, diagram: &Diagram, _sizes: &NodeSizes) -> Placement {
        let mut placement = Placement::with_capacity(diagram.node_count());
        let Some(hub) = hub_of(diagram) else {
            return placement;
        };
        let center = Point::new(self.canvas.width() / 2.0, self.canvas.height() / 2.0);
        placement.place(hub, center);

        for (ring, members) in rings_around(diagram, hub) {
            let radius = self.ring_radius(ring);
            let step = TAU / members.len() as f32;
            for (i, id) in members.into_iter().enumerate() {
                let angle = -FRAC_PI_2 + i as f32 * step;
                placement.place(id, Point::on_circle(center, radius, angle));
            }
        }
        placement
    }
}

/// Node with the highest degree. `min_by` keeps the first of equal
/// elements, so ties go to the earliest inserted node.
fn hub_of(diagram: &Diagram) -> Option<Id> {
    diagram
        .nodes()
        .map(|node| (node.id(), diagram.degree_of(node.id())))
        .min_by(|(_, a), (_, b)| b.cmp(a))
        .map(|(id, _)| id)
}

/// Groups every node except `hub` by ring number. Unreachable nodes go to
/// one ring past the farthest reachable one.
fn rings_around(diagram: &Diagram, hub: Id) -> BTreeMap<usize, Vec<Id>> {
    let mut graph: UnGraph<Id, ()> =
        UnGraph::with_capacity(diagram.node_count(), diagram.edge_count());
    let indices: HashMap<Id, NodeIndex> = diagram
        .nodes()
        .map(|node| (node.id(), graph.add_node(node.id())))
        .collect();
    for edge in diagram.edges().filter(|edge| !edge.is_self_loop()) {
        if let (Some(a), Some(b)) = (indices.get(&edge.source()), indices.get(&edge.target())) {
            graph.add_edge(*a, *b, ());
        }
    }

    let Some(start) = indices.get(&hub) else {
        return BTreeMap::new();
    };
    let hops = dijkstra(&graph, *start, None, |_| 1usize);
    let outermost = hops.values().copied().max().unwrap_or(0);

    let mut rings: BTreeMap<usize, Vec<Id>> = BTreeMap::new();
    for index in graph.node_indices().filter(|index| index != start) {
        let ring = hops.get(&index).copied().unwrap_or(outermost + 1);
        rings.entry(ring).or_default().push(graph[index]);
    }
    rings
}
