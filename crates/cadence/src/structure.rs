//! The diagram graph model.
//!
//! A [`Diagram`] owns its [`Node`]s, [`Edge`]s and [`Cluster`]s and keeps
//! them in insertion order. Every mutation goes through a method that
//! validates the change first, so a diagram is consistent at all times:
//! ids are unique per category, edges point at existing nodes and clusters
//! have at least one existing member.
//!
//! Adjacency is maintained incrementally, so [`Diagram::degree_of`] and
//! [`Diagram::neighbors_of`] run in time proportional to the node's degree.

mod element;
mod graph_base;

use std::collections::HashSet;

use log::trace;

use cadence_core::{identifier::Id, semantic::ElementCategory};

pub use element::{Cluster, Edge, Node};

use crate::error::CadenceError;
use graph_base::{Adjacency, Arena};

/// A validated graph of nodes, edges and clusters.
///
/// # Examples
///
/// ```
/// # use cadence::structure::{Diagram, Edge, Node};
/// let mut diagram = Diagram::new();
/// diagram.add_node(Node::new("api", "API")).unwrap();
/// diagram.add_node(Node::new("db", "Database")).unwrap();
/// diagram.add_edge(Edge::new("api", "db")).unwrap();
///
/// assert_eq!(diagram.degree_of("api".into()), 1);
/// assert!(diagram.add_edge(Edge::new("api", "ghost")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    title: Option<String>,
    nodes: Arena<Node>,
    edges: Arena<Edge>,
    clusters: Arena<Cluster>,
    adjacency: Adjacency,
}

impl Diagram {
    /// Creates an empty diagram.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::DuplicateId`] if a node with the same id exists.
    pub fn add_node(&mut self, node: Node) -> Result<Id, CadenceError> {
        let id = node.id();
        if !self.nodes.insert(id, node) {
            return Err(CadenceError::DuplicateId {
                category: ElementCategory::Node,
                id,
            });
        }
        Ok(id)
    }

    /// Adds an edge and returns its final id.
    ///
    /// An edge without an explicit id that collides with an existing edge is
    /// renamed with the first free `#n` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::DanglingReference`] if either endpoint is not a
    /// node of this diagram, or [`CadenceError::DuplicateId`] if an explicit
    /// id is already taken.
    pub fn add_edge(&mut self, mut edge: Edge) -> Result<Id, CadenceError> {
        for endpoint in [edge.source(), edge.target()] {
            if !self.nodes.contains(endpoint) {
                return Err(CadenceError::DanglingReference {
                    category: ElementCategory::Edge,
                    owner: edge.id(),
                    missing: endpoint,
                });
            }
        }

        if self.edges.contains(edge.id()) {
            if edge.has_explicit_id() {
                return Err(CadenceError::DuplicateId {
                    category: ElementCategory::Edge,
                    id: edge.id(),
                });
            }
            let base = edge.id();
            let free = (1..)
                .map(|n| base.with_suffix(n))
                .find(|candidate| !self.edges.contains(*candidate))
                .unwrap_or(base);
            edge.set_id(free);
        }

        let id = edge.id();
        self.adjacency.connect(id, edge.source(), edge.target());
        self.edges.insert(id, edge);
        Ok(id)
    }

    /// Adds a cluster.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::DuplicateId`] for a taken cluster id,
    /// [`CadenceError::EmptyCluster`] when there are no members, and
    /// [`CadenceError::DanglingReference`] for a member that is not a node.
    pub fn add_cluster(&mut self, cluster: Cluster) -> Result<Id, CadenceError> {
        let id = cluster.id();
        if self.clusters.contains(id) {
            return Err(CadenceError::DuplicateId {
                category: ElementCategory::Cluster,
                id,
            });
        }
        if cluster.members().is_empty() {
            return Err(CadenceError::EmptyCluster { id });
        }
        if let Some(missing) = cluster
            .members()
            .iter()
            .find(|member| !self.nodes.contains(**member))
        {
            return Err(CadenceError::DanglingReference {
                category: ElementCategory::Cluster,
                owner: id,
                missing: *missing,
            });
        }
        self.clusters.insert(id, cluster);
        Ok(id)
    }

    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: Id) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub fn cluster(&self, id: Id) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    pub fn contains_node(&self, id: Id) -> bool {
        self.nodes.contains(id)
    }

    /// Iterates nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterates edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Iterates clusters in insertion order.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Total number of animated elements.
    pub fn element_count(&self) -> usize {
        self.node_count() + self.edge_count() + self.cluster_count()
    }

    /// Iterates the edges leaving `node`.
    pub fn outgoing_edges(&self, node: Id) -> impl Iterator<Item = &Edge> {
        self.adjacency
            .outgoing(node)
            .iter()
            .filter_map(|id| self.edges.get(*id))
    }

    /// Iterates the edges entering `node`.
    pub fn incoming_edges(&self, node: Id) -> impl Iterator<Item = &Edge> {
        self.adjacency
            .incoming(node)
            .iter()
            .filter_map(|id| self.edges.get(*id))
    }

    /// Returns the distinct nodes connected to `node` by an edge in either
    /// direction, excluding `node` itself.
    ///
    /// Neighbors are listed in the order their first connecting edge appears
    /// in the adjacency lists: outgoing first, then incoming.
    pub fn neighbors_of(&self, node: Id) -> Vec<Id> {
        let mut seen = HashSet::new();
        self.outgoing_edges(node)
            .map(Edge::target)
            .chain(self.incoming_edges(node).map(Edge::source))
            .filter(|other| *other != node && seen.insert(*other))
            .collect()
    }

    /// Returns the number of edges incident to `node`.
    ///
    /// A self-loop counts once.
    pub fn degree_of(&self, node: Id) -> usize {
        let self_loops = self
            .outgoing_edges(node)
            .filter(|edge| edge.is_self_loop())
            .count();
        self.adjacency.outgoing(node).len() + self.adjacency.incoming(node).len() - self_loops
    }

    /// Returns the first cluster, in insertion order, containing `node`.
    pub fn cluster_of(&self, node: Id) -> Option<&Cluster> {
        self.clusters_of(node).next()
    }

    /// Iterates every cluster containing `node`, in insertion order.
    pub fn clusters_of(&self, node: Id) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(move |cluster| cluster.contains(node))
    }

    /// Returns the insertion rank of a node.
    ///
    /// Ranks order nodes by insertion and are used to break ties.
    pub fn node_rank(&self, node: Id) -> Option<usize> {
        self.nodes.rank(node)
    }

    pub(crate) fn node_mut(&mut self, id: Id) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    pub(crate) fn edge_mut(&mut self, id: Id) -> Option<&mut Edge> {
        self.edges.get_mut(id)
    }

    pub(crate) fn cluster_mut(&mut self, id: Id) -> Option<&mut Cluster> {
        self.clusters.get_mut(id)
    }

    /// Folds `removed` into `survivor`.
    ///
    /// Edges incident to `removed` are re-pointed at `survivor`, and those
    /// without an explicit id are renamed after their new endpoints. Edges that
    /// would become self-loops of `survivor` are dropped, and an edge that
    /// would duplicate an existing edge between the same endpoints is
    /// coalesced into it, joining the labels. Cluster memberships move to
    /// `survivor`. Both ids must be distinct nodes of this diagram.
    pub(crate) fn merge_nodes(&mut self, removed: Id, survivor: Id) {
        if removed == survivor || !self.nodes.contains(survivor) {
            return;
        }

        let mut incident: Vec<Id> = self.adjacency.outgoing(removed).to_vec();
        for id in self.adjacency.incoming(removed) {
            if !incident.contains(id) {
                incident.push(*id);
            }
        }

        for edge_id in incident {
            let Some(edge) = self.edges.get(edge_id) else {
                continue;
            };
            let (old_source, old_target) = (edge.source(), edge.target());
            let repoint = |end: Id| if end == removed { survivor } else { end };
            let (source, target) = (repoint(old_source), repoint(old_target));

            if source == target {
                trace!(edge:% = edge_id; "Dropping edge collapsed into a self-loop");
                self.remove_edge(edge_id);
                continue;
            }

            let duplicate = self
                .adjacency
                .outgoing(source)
                .iter()
                .copied()
                .find(|other| {
                    *other != edge_id
                        && self.edges.get(*other).is_some_and(|e| e.target() == target)
                });

            if let Some(existing) = duplicate {
                trace!(edge:% = edge_id, into:% = existing; "Coalescing parallel edge");
                if let Some(edge) = self.remove_edge(edge_id) {
                    if let Some(kept) = self.edges.get_mut(existing) {
                        kept.merge_label(edge.label());
                    }
                }
                continue;
            }

            self.adjacency.disconnect(edge_id, old_source, old_target);
            let edge_id = self.rederive_edge_id(edge_id, source, target);
            self.adjacency.connect(edge_id, source, target);
            if let Some(edge) = self.edges.get_mut(edge_id) {
                edge.set_endpoints(source, target);
            }
        }

        for cluster in self.clusters.iter_mut() {
            cluster.replace_member(removed, survivor);
        }

        self.adjacency.forget(removed);
        if let Some(node) = self.nodes.remove(removed) {
            if let Some(kept) = self.nodes.get_mut(survivor) {
                kept.absorb(node);
            }
        }
    }

    /// Renames a derived edge id to match `source -> target`, taking the
    /// first free `#n` suffix on collision. Explicit ids are kept. The edge
    /// must already be disconnected from the adjacency.
    fn rederive_edge_id(&mut self, id: Id, source: Id, target: Id) -> Id {
        if self.edges.get(id).is_none_or(Edge::has_explicit_id) {
            return id;
        }
        let base = Id::edge(source, target);
        let Some(fresh) = std::iter::once(base)
            .chain((1..).map(|n| base.with_suffix(n)))
            .find(|candidate| *candidate == id || !self.edges.contains(*candidate))
        else {
            return id;
        };
        if fresh == id || !self.edges.rename(id, fresh) {
            return id;
        }
        trace!(edge:% = id, renamed:% = fresh; "Renaming re-pointed edge");
        if let Some(edge) = self.edges.get_mut(fresh) {
            edge.set_id(fresh);
        }
        fresh
    }

    fn remove_edge(&mut self, id: Id) -> Option<Edge> {
        let edge = self.edges.remove(id)?;
        self.adjacency.disconnect(id, edge.source(), edge.target());
        Some(edge)
    }
}
