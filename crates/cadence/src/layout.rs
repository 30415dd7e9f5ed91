//! Diagram layout.
//!
//! [`layout`] turns a [`Diagram`] into a [`Layout`]: a simplified copy of the
//! diagram with every node, edge and cluster carrying its geometry. The steps
//! are:
//!
//! 1. Validate the layout configuration.
//! 2. Simplify the diagram to the configured node budget.
//! 3. Size nodes from their labels.
//! 4. Place node centers with the engine for the requested algorithm.
//!    Nodes with a position override keep it.
//! 5. Route edges and fit clusters around their members.

mod engines;
mod routing;
mod sizing;

use log::{debug, info};
use serde::{Serialize, Serializer, ser::SerializeStruct};

use cadence_core::{
    geometry::{Point, Size},
    identifier::Id,
    semantic::LayoutAlgorithm,
};

pub use engines::{Direction, Engine, EngineBuilder, LayoutEngine, Placement};
pub use sizing::NodeSizes;

use crate::{
    config::LayoutConfig,
    error::{CadenceError, Warning},
    simplify::Simplifier,
    structure::Diagram,
};

/// A laid-out diagram.
#[derive(Debug, Clone)]
pub struct Layout {
    diagram: Diagram,
    algorithm: LayoutAlgorithm,
    canvas: Size,
    node_order: Vec<Id>,
    warnings: Vec<Warning>,
}

impl Layout {
    /// Returns the simplified diagram with geometry filled in.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    pub fn algorithm(&self) -> LayoutAlgorithm {
        self.algorithm
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Node ids in the order the layout engine visited them.
    ///
    /// For layered layouts this is layer by layer, for radial layouts the hub
    /// followed by ring by ring, and for grids insertion order.
    pub fn node_order(&self) -> &[Id] {
        &self.node_order
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Returns the center of a node, if it survived simplification.
    pub fn node_position(&self, id: Id) -> Option<Point> {
        self.diagram.node(id).map(|node| node.position())
    }

    pub(crate) fn diagram_mut(&mut self) -> &mut Diagram {
        &mut self.diagram
    }
}

impl Serialize for Layout {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let warnings: Vec<String> = self.warnings.iter().map(ToString::to_string).collect();
        let mut state = serializer.serialize_struct("Layout", 7)?;
        state.serialize_field("title", &self.diagram.title())?;
        state.serialize_field("algorithm", &self.algorithm)?;
        state.serialize_field("canvas", &self.canvas)?;
        state.serialize_field("nodes", &self.diagram.nodes().collect::<Vec<_>>())?;
        state.serialize_field("edges", &self.diagram.edges().collect::<Vec<_>>())?;
        state.serialize_field("clusters", &self.diagram.clusters().collect::<Vec<_>>())?;
        state.serialize_field("warnings", &warnings)?;
        state.end()
    }
}

/// Lays out `diagram` with `algorithm`.
///
/// The input diagram is not modified.
///
/// # Errors
///
/// Returns [`CadenceError::InvalidConfig`] for an invalid configuration and
/// [`CadenceError::EmptyDiagram`] for a diagram without nodes.
pub fn layout(
    diagram: &Diagram,
    algorithm: LayoutAlgorithm,
    config: &LayoutConfig,
) -> Result<Layout, CadenceError> {
    config.validate()?;
    if diagram.node_count() == 0 {
        return Err(CadenceError::EmptyDiagram);
    }

    let (mut diagram, warning) = Simplifier::new(config.max_nodes())
        .simplify(diagram)?
        .into_parts();

    let sizes = sizing::measure_nodes(&diagram, config);
    let canvas = Size::new(config.width(), config.height());
    let engine = EngineBuilder::new()
        .with_padding(config.padding())
        .with_canvas(canvas)
        .with_rings(config.radius(), config.ring_spacing())
        .build(algorithm);
    let placement = engine.place(&diagram, &sizes);
    debug!(algorithm:% = algorithm, nodes = placement.order().len(); "Nodes placed");

    for node in diagram.nodes_mut() {
        let size = sizes.get(&node.id()).copied().unwrap_or_default();
        let center = node
            .position_override()
            .or_else(|| placement.center(node.id()))
            .unwrap_or_default();
        node.set_geometry(center, size);
    }
    routing::route_edges(&mut diagram);
    routing::fit_clusters(&mut diagram, config.cluster_margin());

    info!(
        algorithm:% = algorithm,
        nodes = diagram.node_count(),
        edges = diagram.edge_count(),
        clusters = diagram.cluster_count();
        "Layout calculated"
    );

    Ok(Layout {
        diagram,
        algorithm,
        canvas,
        node_order: placement.into_order(),
        warnings: warning.into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::structure::{Cluster, Edge, Node};

    fn services() -> Diagram {
        let mut diagram = Diagram::new();
        for (id, label) in [
            ("api", "API Gateway"),
            ("auth", "Auth Service"),
            ("users", "User Service"),
            ("db", "Database"),
        ] {
            diagram.add_node(Node::new(id, label)).unwrap();
        }
        for (source, target) in [("api", "auth"), ("api", "users"), ("auth", "db"), ("users", "db")] {
            diagram.add_edge(Edge::new(source, target)).unwrap();
        }
        diagram
            .add_cluster(Cluster::new("backend", "Backend", ["auth", "users"]))
            .unwrap();
        diagram
    }

    fn overlaps(a: &cadence_core::geometry::Bounds, b: &cadence_core::geometry::Bounds) -> bool {
        a.min_x() < b.max_x() && b.min_x() < a.max_x() && a.min_y() < b.max_y() && b.min_y() < a.max_y()
    }

    #[test]
    fn test_empty_diagram_is_rejected() {
        let err = layout(&Diagram::new(), LayoutAlgorithm::Grid, &LayoutConfig::default())
            .unwrap_err();
        assert_eq!(err, CadenceError::EmptyDiagram);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = LayoutConfig::default().with_padding(-1.0);
        let err = layout(&services(), LayoutAlgorithm::Grid, &config).unwrap_err();
        assert!(matches!(err, CadenceError::InvalidConfig(_)));
    }

    #[test]
    fn test_horizontal_layout_orders_layers() {
        let result = layout(&services(), LayoutAlgorithm::Horizontal, &LayoutConfig::default())
            .unwrap();
        let x = |id: &str| result.node_position(Id::new(id)).unwrap().x();

        assert!(x("api") < x("auth"));
        assert_approx_eq!(f32, x("auth"), x("users"));
        assert!(x("users") < x("db"));
        assert_eq!(
            result.node_order(),
            &[Id::new("api"), Id::new("auth"), Id::new("users"), Id::new("db")]
        );
    }

    #[test]
    fn test_vertical_layout_orders_layers() {
        let result = layout(&services(), LayoutAlgorithm::Vertical, &LayoutConfig::default())
            .unwrap();
        let y = |id: &str| result.node_position(Id::new(id)).unwrap().y();
        assert!(y("api") < y("auth"));
        assert!(y("auth") < y("db"));
    }

    #[test]
    fn test_no_overlap_in_non_radial_layouts() {
        for algorithm in [
            LayoutAlgorithm::Grid,
            LayoutAlgorithm::Horizontal,
            LayoutAlgorithm::Vertical,
        ] {
            let result = layout(&services(), algorithm, &LayoutConfig::default()).unwrap();
            let bounds: Vec<_> = result.diagram().nodes().map(|n| n.bounds()).collect();
            for (i, a) in bounds.iter().enumerate() {
                for b in &bounds[i + 1..] {
                    assert!(!overlaps(a, b), "{algorithm} overlaps");
                }
            }
        }
    }

    #[test]
    fn test_cluster_contains_members() {
        let result = layout(&services(), LayoutAlgorithm::Horizontal, &LayoutConfig::default())
            .unwrap();
        let diagram = result.diagram();
        let cluster = diagram.cluster(Id::new("backend")).unwrap();
        for member in cluster.members() {
            let node = diagram.node(*member).unwrap();
            assert!(cluster.bounds().contains_bounds(&node.bounds()));
        }
    }

    #[test]
    fn test_edges_have_three_waypoints() {
        let result = layout(&services(), LayoutAlgorithm::Grid, &LayoutConfig::default()).unwrap();
        for edge in result.diagram().edges() {
            assert_eq!(edge.waypoints().len(), 3);
        }
    }

    #[test]
    fn test_position_override_is_kept() {
        let mut diagram = Diagram::new();
        diagram
            .add_node(Node::new("pinned", "Pinned").with_position(Point::new(12.0, 34.0)))
            .unwrap();
        diagram.add_node(Node::new("free", "Free")).unwrap();

        let result = layout(&diagram, LayoutAlgorithm::Grid, &LayoutConfig::default()).unwrap();
        let pinned = result.node_position(Id::new("pinned")).unwrap();
        assert_approx_eq!(f32, pinned.x(), 12.0);
        assert_approx_eq!(f32, pinned.y(), 34.0);
    }

    #[test]
    fn test_simplification_warning_is_reported() {
        let mut diagram = Diagram::new();
        for id in ["a", "b", "c"] {
            diagram.add_node(Node::new(id, id)).unwrap();
        }
        let config = LayoutConfig::default().with_max_nodes(1);
        let result = layout(&diagram, LayoutAlgorithm::Grid, &config).unwrap();
        assert_eq!(result.warnings().len(), 1);
        assert_eq!(result.diagram().node_count(), 3);
    }

    #[test]
    fn test_layout_is_deterministic() {
        for algorithm in [
            LayoutAlgorithm::Grid,
            LayoutAlgorithm::Horizontal,
            LayoutAlgorithm::Vertical,
            LayoutAlgorithm::Radial,
        ] {
            let first = layout(&services(), algorithm, &LayoutConfig::default()).unwrap();
            let second = layout(&services(), algorithm, &LayoutConfig::default()).unwrap();
            for (a, b) in first.diagram().nodes().zip(second.diagram().nodes()) {
                assert_eq!(a.position(), b.position());
            }
            assert_eq!(first.node_order(), second.node_order());
        }
    }

    #[test]
    fn test_layout_serializes() {
        let result = layout(&services(), LayoutAlgorithm::Grid, &LayoutConfig::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["algorithm"], "grid");
        assert_eq!(json["nodes"].as_array().unwrap().len(), 4);
        assert_eq!(json["nodes"][0]["id"], "api");
    }

    mod proptest_tests {
        use std::collections::HashSet;

        use proptest::{prelude::*, test_runner::TestCaseError};

        use super::*;

        const ALGORITHMS: [LayoutAlgorithm; 4] = [
            LayoutAlgorithm::Grid,
            LayoutAlgorithm::Horizontal,
            LayoutAlgorithm::Vertical,
            LayoutAlgorithm::Radial,
        ];

        /// Random graphs, including cycles, self-loops, parallel edges and
        /// overlapping clusters.
        fn arb_diagram() -> impl Strategy<Value = Diagram> {
            (1usize..14)
                .prop_flat_map(|n| {
                    (
                        Just(n),
                        prop::collection::vec((0..n, 0..n), 0..(n * 2)),
                        prop::collection::vec(prop::collection::vec(0..n, 1..4), 0..3),
                    )
                })
                .prop_map(|(n, edges, clusters)| {
                    let mut diagram = Diagram::new();
                    for i in 0..n {
                        let id = format!("l{i}");
                        diagram.add_node(Node::new(id.as_str(), id.as_str())).unwrap();
                    }
                    for (s, t) in edges {
                        diagram
                            .add_edge(Edge::new(format!("l{s}").as_str(), format!("l{t}").as_str()))
                            .unwrap();
                    }
                    for (k, members) in clusters.into_iter().enumerate() {
                        let members: Vec<String> = members.iter().map(|m| format!("l{m}")).collect();
                        diagram
                            .add_cluster(Cluster::new(
                                format!("lk{k}").as_str(),
                                "cluster",
                                members.iter().map(String::as_str),
                            ))
                            .unwrap();
                    }
                    diagram
                })
        }

        fn check_one_center_per_node(diagram: &Diagram, budget: usize) -> Result<(), TestCaseError> {
            let config = LayoutConfig::default().with_max_nodes(budget);
            for algorithm in ALGORITHMS {
                let result =
                    layout(diagram, algorithm, &config).map_err(|e| TestCaseError::fail(e.to_string()))?;
                let laid_out = result.diagram();

                let visited: HashSet<Id> = result.node_order().iter().copied().collect();
                let nodes: HashSet<Id> = laid_out.nodes().map(|n| n.id()).collect();
                prop_assert_eq!(result.node_order().len(), laid_out.node_count());
                prop_assert_eq!(&visited, &nodes);

                let centers: Vec<Point> = laid_out.nodes().map(|n| n.position()).collect();
                for (i, a) in centers.iter().enumerate() {
                    prop_assert!(a.x().is_finite() && a.y().is_finite());
                    for b in &centers[i + 1..] {
                        prop_assert!(a.distance(*b) > 1e-3, "{} stacks two nodes at {:?}", algorithm, a);
                    }
                }

                for edge in laid_out.edges() {
                    prop_assert!(laid_out.contains_node(edge.source()));
                    prop_assert!(laid_out.contains_node(edge.target()));
                    prop_assert_eq!(edge.waypoints().len(), 3);
                }
                for cluster in laid_out.clusters() {
                    for member in cluster.members() {
                        let node = laid_out
                            .node(*member)
                            .ok_or_else(|| TestCaseError::fail("cluster member missing"))?;
                        prop_assert!(cluster.bounds().contains_bounds(&node.bounds()));
                    }
                }
            }
            Ok(())
        }

        fn check_budget(diagram: &Diagram, budget: usize) -> Result<(), TestCaseError> {
            let config = LayoutConfig::default().with_max_nodes(budget);
            let result = layout(diagram, LayoutAlgorithm::Horizontal, &config)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            if result.warnings().is_empty() {
                prop_assert!(result.diagram().node_count() <= budget);
            } else {
                prop_assert!(result.diagram().node_count() > budget);
            }
            Ok(())
        }

        proptest! {
            #[test]
            fn every_algorithm_places_each_node_once(diagram in arb_diagram(), budget in 1usize..16) {
                check_one_center_per_node(&diagram, budget)?;
            }

            #[test]
            fn simplification_respects_budget(diagram in arb_diagram(), budget in 1usize..16) {
                check_budget(&diagram, budget)?;
            }
        }
    }
}
