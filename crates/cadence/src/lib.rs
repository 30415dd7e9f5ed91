//! Cadence - deterministic diagram layout with synchronized animation timelines.
//!
//! Cadence takes a graph of nodes, edges and clusters, lays it out with one of
//! several placement algorithms, orders its elements for a progressive reveal
//! and builds a timeline that drives every output modality from one source of
//! timing truth.
//!
//! The pipeline stages are available individually:
//!
//! - [`structure`] - the validated [`Diagram`](structure::Diagram) model
//! - [`simplify`] - importance-based reduction to a node budget
//! - [`layout`] - grid, horizontal, vertical and radial placement
//! - [`order`] - animation order assignment
//! - [`timeline`] - the canonical [`Timeline`](timeline::Timeline)
//! - [`sync`] - continuous, frame-sequence and narration adapters
//!
//! [`Pipeline`] chains them with one [`AppConfig`](config::AppConfig).

pub mod config;
pub mod layout;
pub mod order;
pub mod simplify;
pub mod structure;
pub mod sync;
pub mod timeline;

mod error;

pub use cadence_core::{geometry, identifier, semantic};

pub use error::{CadenceError, Warning};

use log::{debug, info};

use semantic::LayoutAlgorithm;

use config::{AppConfig, SyncConfig};
use layout::Layout;
use structure::Diagram;
use sync::{ContinuousAnimation, FrameManifest, NarrationScript};
use timeline::Timeline;

/// Runs diagrams through layout, ordering and timeline construction.
///
/// A pipeline holds a validated configuration and no other state, so one
/// instance can serve any number of diagrams, including from several threads
/// at once.
///
/// # Examples
///
/// ```
/// use cadence::{Pipeline, config::AppConfig, structure::{Diagram, Edge, Node}};
///
/// let mut diagram = Diagram::new();
/// diagram.add_node(Node::new("api", "API Gateway")).unwrap();
/// diagram.add_node(Node::new("db", "Database")).unwrap();
/// diagram.add_edge(Edge::new("api", "db")).unwrap();
///
/// let pipeline = Pipeline::new(AppConfig::default()).unwrap();
/// let rendered = pipeline.run(&diagram).unwrap();
///
/// assert_eq!(rendered.timeline().len(), 3);
/// assert_eq!(rendered.frames().unwrap().total_frames(), 33);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::InvalidConfig`] if any configuration value is
    /// out of range.
    pub fn new(config: AppConfig) -> Result<Self, CadenceError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Lay out `diagram` with the configured algorithm and assign the
    /// animation order.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::EmptyDiagram`] for a diagram without nodes.
    pub fn layout(&self, diagram: &Diagram) -> Result<Layout, CadenceError> {
        self.layout_with(diagram, self.config.layout().algorithm())
    }

    /// Like [`Pipeline::layout`], with an explicit algorithm.
    pub fn layout_with(
        &self,
        diagram: &Diagram,
        algorithm: LayoutAlgorithm,
    ) -> Result<Layout, CadenceError> {
        let mut layout = layout::layout(diagram, algorithm, self.config.layout())?;
        order::assign_animation_order(&mut layout);
        Ok(layout)
    }

    /// Run the full pipeline on `diagram` with the configured algorithm.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::EmptyDiagram`] for a diagram without nodes.
    pub fn run(&self, diagram: &Diagram) -> Result<Rendered, CadenceError> {
        self.run_with(diagram, self.config.layout().algorithm())
    }

    /// Like [`Pipeline::run`], with an explicit algorithm.
    pub fn run_with(
        &self,
        diagram: &Diagram,
        algorithm: LayoutAlgorithm,
    ) -> Result<Rendered, CadenceError> {
        info!(
            algorithm:% = algorithm,
            nodes = diagram.node_count(),
            edges = diagram.edge_count();
            "Running pipeline"
        );
        let layout = self.layout_with(diagram, algorithm)?;
        let elements = order::ordered_elements(layout.diagram());
        let timeline = timeline::build_timeline(&elements, self.config.timeline())?;
        debug!(total_duration = timeline.total_duration(); "Pipeline finished");

        Ok(Rendered {
            layout,
            timeline,
            sync: self.config.sync().clone(),
        })
    }
}

/// The result of a pipeline run: a layout, its timeline, and access to the
/// sync adapter views.
#[derive(Debug, Clone)]
pub struct Rendered {
    layout: Layout,
    timeline: Timeline,
    sync: SyncConfig,
}

impl Rendered {
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn warnings(&self) -> &[Warning] {
        self.layout.warnings()
    }

    /// Continuous-time view for CSS-style animation.
    pub fn continuous(&self) -> ContinuousAnimation {
        sync::to_continuous_animation(&self.timeline)
    }

    /// Frame view at the configured frame rate.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::InvalidConfig`] for a non-positive frame rate.
    pub fn frames(&self) -> Result<FrameManifest, CadenceError> {
        sync::to_frame_sequence(&self.timeline, self.sync.fps())
    }

    /// Narration view with the configured grouping.
    pub fn narration(&self) -> NarrationScript {
        sync::to_narration_cues(&self.timeline, self.sync.grouping())
    }
}
