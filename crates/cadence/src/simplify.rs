//! Importance-based diagram simplification.
//!
//! A [`Simplifier`] reduces a diagram to at most `budget` nodes by repeatedly
//! folding the least important node into its most important neighbor.
//! Importance is pluggable through the [`ImportanceScore`] trait; the default
//! [`DegreeScore`] ranks nodes by how many edges touch them.
//!
//! A node is never removed when it is the sole member of a cluster, and a
//! node without neighbors has nothing to merge into. When these rules leave
//! more than `budget` nodes, the result carries a
//! [`Warning::SimplificationBudgetUnreachable`].

use log::{debug, warn};

use cadence_core::identifier::Id;

use crate::{
    error::{CadenceError, Warning},
    structure::{Diagram, Node},
};

/// Scores the importance of a node. Higher scores survive longer.
pub trait ImportanceScore {
    fn score(&self, diagram: &Diagram, node: &Node) -> f64;
}

/// Scores nodes by their degree.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeScore;

impl ImportanceScore for DegreeScore {
    fn score(&self, diagram: &Diagram, node: &Node) -> f64 {
        diagram.degree_of(node.id()) as f64
    }
}

impl<F> ImportanceScore for F
where
    F: Fn(&Diagram, &Node) -> f64,
{
    fn score(&self, diagram: &Diagram, node: &Node) -> f64 {
        self(diagram, node)
    }
}

/// One node folded into another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    removed: Id,
    survivor: Id,
}

impl Merge {
    pub fn removed(&self) -> Id {
        self.removed
    }

    pub fn survivor(&self) -> Id {
        self.survivor
    }
}

/// Outcome of a simplification pass.
#[derive(Debug, Clone)]
pub struct Simplification {
    diagram: Diagram,
    merges: Vec<Merge>,
    warning: Option<Warning>,
}

impl Simplification {
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// Returns the merges in the order they were applied.
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    pub fn warning(&self) -> Option<&Warning> {
        self.warning.as_ref()
    }

    pub fn into_parts(self) -> (Diagram, Option<Warning>) {
        (self.diagram, self.warning)
    }
}

/// Reduces diagrams to a node budget.
#[derive(Debug, Clone)]
pub struct Simplifier<S = DegreeScore> {
    budget: usize,
    scorer: S,
}

impl Simplifier<DegreeScore> {
    /// Creates a simplifier keeping at most `budget` nodes, scored by degree.
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            scorer: DegreeScore,
        }
    }
}

impl<S: ImportanceScore> Simplifier<S> {
    /// Replaces the importance scorer.
    pub fn with_scorer<T: ImportanceScore>(self, scorer: T) -> Simplifier<T> {
        Simplifier {
            budget: self.budget,
            scorer,
        }
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Simplifies a copy of `diagram`.
    ///
    /// A diagram already within budget is returned unchanged. Otherwise the
    /// lowest-scoring removable node is merged into its highest-scoring
    /// neighbor until the budget is met or no removable node remains. Ties
    /// go to the node inserted first.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::InvalidConfig`] for a zero budget.
    pub fn simplify(&self, diagram: &Diagram) -> Result<Simplification, CadenceError> {
        if self.budget == 0 {
            return Err(CadenceError::invalid_config(
                "simplification budget must be at least 1",
            ));
        }

        let mut diagram = diagram.clone();
        let mut merges = Vec::new();
        let mut warning = None;

        while diagram.node_count() > self.budget {
            let Some(removed) = self.pick_removable(&diagram) else {
                let remaining = diagram.node_count();
                warn!(budget = self.budget, remaining; "Simplification budget unreachable");
                warning = Some(Warning::SimplificationBudgetUnreachable {
                    budget: self.budget,
                    remaining,
                });
                break;
            };
            let Some(survivor) = self.pick_survivor(&diagram, removed) else {
                break;
            };
            debug!(removed:% = removed, survivor:% = survivor; "Merging node");
            diagram.merge_nodes(removed, survivor);
            merges.push(Merge { removed, survivor });
        }

        Ok(Simplification {
            diagram,
            merges,
            warning,
        })
    }

    fn score_of(&self, diagram: &Diagram, id: Id) -> f64 {
        diagram
            .node(id)
            .map_or(f64::NEG_INFINITY, |node| self.scorer.score(diagram, node))
    }

    /// Lowest-scoring node that has a neighbor and is not the only member of
    /// a cluster. `min_by` keeps the first of equal elements, which is the
    /// earliest inserted.
    fn pick_removable(&self, diagram: &Diagram) -> Option<Id> {
        diagram
            .nodes()
            .filter(|node| is_removable(diagram, node.id()))
            .map(|node| (node.id(), self.scorer.score(diagram, node)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(id, _)| id)
    }

    /// Highest-scoring neighbor of `removed`, earliest inserted on ties.
    fn pick_survivor(&self, diagram: &Diagram, removed: Id) -> Option<Id> {
        diagram
            .neighbors_of(removed)
            .into_iter()
            .map(|id| (id, self.score_of(diagram, id), diagram.node_rank(id)))
            .min_by(|(_, score_a, rank_a), (_, score_b, rank_b)| {
                score_b.total_cmp(score_a).then(rank_a.cmp(rank_b))
            })
            .map(|(id, _, _)| id)
    }
}

fn is_removable(diagram: &Diagram, node: Id) -> bool {
    let sole_member = diagram
        .clusters_of(node)
        .any(|cluster| cluster.members().len() == 1);
    !sole_member && !diagram.neighbors_of(node).is_empty()
}

/// Simplifies `diagram` to at most `budget` nodes using [`DegreeScore`].
pub fn simplify(diagram: &Diagram, budget: usize) -> Result<Simplification, CadenceError> {
    Simplifier::new(budget).simplify(diagram)
}
