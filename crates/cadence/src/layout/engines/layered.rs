//! Layered layout engine
//!
//! Assigns every node to a layer by longest path from the sources of the
//! edge graph, then lays the layers out along the main axis and stacks the
//! nodes of each layer along the cross axis in insertion order.
//!
//! Self-loops are ignored for layering. If the remaining graph has cycles,
//! the back edges found by a depth-first search started from the nodes in
//! insertion order are dropped first, which always leaves a DAG.

use std::collections::HashMap;

use log::debug;
use petgraph::{
    Direction as EdgeDirection,
    algo::toposort,
    graph::{DiGraph, NodeIndex},
    visit::{DfsEvent, depth_first_search},
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

/// Direction in which layers advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    TopToBottom,
}

#[derive(Debug, Clone)]
pub struct Engine {
    direction: Direction,
    padding: f32,
    canvas: Size,
}

impl Engine {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            padding: 0.0,
            canvas: Size::default(),
        }
    }

    pub fn set_padding(&mut self, padding: f32) -> &mut Self {
        self.padding = padding;
        self
    }

    pub fn set_canvas(&mut self, canvas: Size) -> &mut Self {
        self.canvas = canvas;
        self
    }

    /// Maps a size into (main axis, cross axis) coordinates.
    fn orient(&self, size: Size) -> Size {
        match self.direction {
            Direction::LeftToRight => size,
            Direction::TopToBottom => size.transpose(),
        }
    }

    /// Maps a (main axis, cross axis) point back to canvas coordinates.
    fn unorient(&self, point: Point) -> Point {
        match self.direction {
            Direction::LeftToRight => point,
            Direction::TopToBottom => point.transpose(),
        }
    }
}

impl LayoutEngine for Engine {
    fn place(&self, diagram: &Diagram, sizes: &NodeSizes) -> Placement {
        let layers = assign_layers(diagram);
        let extent = sizes
            .values()
            .fold(Size::default(), |acc, size| acc.max(self.orient(*size)));
        let (main, cross) = (extent.width(), extent.height());

        let stack_extent =
            |len: usize| len as f32 * cross + len.saturating_sub(1) as f32 * self.padding;
        let tallest = layers.iter().map(Vec::len).max().unwrap_or(0);

        let mut placement = Placement::with_capacity(diagram.node_count());
        for (layer_index, layer) in layers.iter().enumerate() {
            let main_pos = layer_index as f32 * (main + self.padding) + main / 2.0;
            let offset = (stack_extent(tallest) - stack_extent(layer.len())) / 2.0;
            for (slot, id) in layer.iter().enumerate() {
                let cross_pos = offset + slot as f32 * (cross + self.padding) + cross / 2.0;
                placement.place(*id, self.unorient(Point::new(main_pos, cross_pos)));
            }
        }
        placement.center_on(self.canvas, sizes);
        placement
    }
}

/// Groups node ids by longest-path layer. Nodes within a layer keep their
/// insertion order.
pub(super) fn assign_layers(diagram: &Diagram) -> Vec<Vec<Id>> {
    let mut graph: DiGraph<Id, ()> =
        DiGraph::with_capacity(diagram.node_count(), diagram.edge_count());
    let indices: HashMap<Id, NodeIndex> = diagram
        .nodes()
        .map(|node| (node.id(), graph.add_node(node.id())))
        .collect();

    for edge in diagram.edges().filter(|edge| !edge.is_self_loop()) {
        if let (Some(source), Some(target)) = (indices.get(&edge.source()), indices.get(&edge.target()))
        {
            graph.add_edge(*source, *target, ());
        }
    }

    let order = match toposort(&graph, None) {
        Ok(order) => order,
        Err(cycle) => {
            debug!(node:% = graph[cycle.node_id()]; "Cycle found, dropping back edges");
            break_cycles(&mut graph);
            toposort(&graph, None).unwrap_or_else(|_| graph.node_indices().collect())
        }
    };

    let mut depth = vec![0usize; graph.node_count()];
    for node in order {
        let next = depth[node.index()] + 1;
        for successor in graph.neighbors_directed(node, EdgeDirection::Outgoing) {
            depth[successor.index()] = depth[successor.index()].max(next);
        }
    }

    let layer_count = depth.iter().copied().max().map_or(0, |max| max + 1);
    let mut layers = vec![Vec::new(); layer_count];
    for index in graph.node_indices() {
        layers[depth[index.index()]].push(graph[index]);
    }
    layers
}

/// Removes every back edge of a depth-first search that visits roots in
/// node insertion order.
fn break_cycles(graph: &mut DiGraph<Id, ()>) {
    let mut back_edges = Vec::new();
    depth_first_search(&*graph, graph.node_indices(), |event| {
        if let DfsEvent::BackEdge(source, target) = event {
            back_edges.push((source, target));
        }
    });
    debug!(count = back_edges.len(); "Dropping back edges");
    graph.retain_edges(|g, edge| {
        g.edge_endpoints(edge)
            .is_none_or(|endpoints| !back_edges.contains(&endpoints))
    });
}
