//! TOML diagram descriptions.
//!
//! ```toml
//! title = "Services"
//!
//! [[nodes]]
//! id = "api"
//! label = "API Gateway"
//!
//! [[nodes]]
//! id = "db"
//! shape = "cylinder"
//!
//! [[edges]]
//! source = "api"
//! target = "db"
//!
//! [[clusters]]
//! id = "backend"
//! members = ["db"]
//! ```

use log::debug;
use serde::Deserialize;

use cadence::{
    CadenceError,
    geometry::Point,
    identifier::Id,
    semantic::{EdgeDirection, EdgeStyle, NodeShape},
    structure::{Cluster, Diagram, Edge, Node},
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct DiagramFile {
    title: Option<String>,
    #[serde(default)]
    nodes: Vec<NodeEntry>,
    #[serde(default)]
    edges: Vec<EdgeEntry>,
    #[serde(default)]
    clusters: Vec<ClusterEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeEntry {
    id: Id,
    /// Defaults to the id.
    label: Option<String>,
    description: Option<String>,
    #[serde(default)]
    shape: NodeShape,
    /// Fixed center as `[x, y]`.
    position: Option<[f32; 2]>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EdgeEntry {
    id: Option<Id>,
    source: Id,
    target: Id,
    label: Option<String>,
    #[serde(default)]
    style: EdgeStyle,
    #[serde(default)]
    direction: EdgeDirection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClusterEntry {
    id: Id,
    label: Option<String>,
    description: Option<String>,
    members: Vec<Id>,
}

impl DiagramFile {
    /// Builds a validated [`Diagram`], adding nodes before the edges and
    /// clusters that reference them.
    pub(crate) fn into_diagram(self) -> Result<Diagram, CadenceError> {
        let mut diagram = match self.title {
            Some(title) => Diagram::new().with_title(title),
            None => Diagram::new(),
        };

        for entry in self.nodes {
            let label = entry.label.unwrap_or_else(|| entry.id.to_string());
            let mut node = Node::new(entry.id, label).with_shape(entry.shape);
            if let Some(description) = entry.description {
                node = node.with_description(description);
            }
            if let Some([x, y]) = entry.position {
                node = node.with_position(Point::new(x, y));
            }
            diagram.add_node(node)?;
        }

        for entry in self.edges {
            let mut edge = Edge::new(entry.source, entry.target)
                .with_style(entry.style)
                .with_direction(entry.direction);
            if let Some(id) = entry.id {
                edge = edge.with_id(id);
            }
            if let Some(label) = entry.label {
                edge = edge.with_label(label);
            }
            diagram.add_edge(edge)?;
        }

        for entry in self.clusters {
            let label = entry.label.unwrap_or_else(|| entry.id.to_string());
            let mut cluster = Cluster::new(entry.id, label, entry.members);
            if let Some(description) = entry.description {
                cluster = cluster.with_description(description);
            }
            diagram.add_cluster(cluster)?;
        }

        debug!(
            nodes = diagram.node_count(),
            edges = diagram.edge_count(),
            clusters = diagram.cluster_count();
            "Diagram description loaded"
        );
        Ok(diagram)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<Diagram, CadenceError> {
        toml::from_str::<DiagramFile>(source)
            .expect("valid TOML")
            .into_diagram()
    }

    #[test]
    fn test_full_description() {
        let diagram = parse(
            r#"
            title = "Services"

            [[nodes]]
            id = "api"
            label = "API Gateway"
            position = [100.0, 200.0]

            [[nodes]]
            id = "db"
            shape = "cylinder"

            [[edges]]
            source = "api"
            target = "db"
            label = "queries"
            style = "dashed"

            [[clusters]]
            id = "storage"
            members = ["db"]
            "#,
        )
        .unwrap();

        assert_eq!(diagram.title(), Some("Services"));
        assert_eq!(diagram.node_count(), 2);
        let db = diagram.node(Id::new("db")).unwrap();
        assert_eq!(db.label(), "db");
        assert_eq!(db.shape(), NodeShape::Cylinder);
        assert_eq!(
            diagram.node(Id::new("api")).unwrap().position_override(),
            Some(Point::new(100.0, 200.0))
        );
        assert!(diagram.edge(Id::new("api->db")).is_some());
        assert!(diagram.cluster(Id::new("storage")).unwrap().contains(Id::new("db")));
    }

    #[test]
    fn test_dangling_edge() {
        let err = parse(
            r#"
            [[nodes]]
            id = "solo"

            [[edges]]
            source = "solo"
            target = "ghost"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CadenceError::DanglingReference { .. }));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = toml::from_str::<DiagramFile>("[[nodes]]\nid = \"a\"\ncolour = \"red\"");
        assert!(result.is_err());
    }
}
