//! Configuration types for the Cadence pipeline.
//!
//! Every section implements [`serde::Deserialize`] with per-field defaults, so
//! a configuration file only needs to name the values it overrides.
//!
//! # Overview
//!
//! - [`AppConfig`] - Root of the configuration tree.
//! - [`LayoutConfig`] - Canvas, spacing, node sizing and simplification budget.
//! - [`TimelineConfig`] - Durations, delays and staggering of the animation.
//! - [`SyncConfig`] - Frame rate and narration grouping for the sync adapters.
//!
//! # Example
//!
//! ```
//! # use cadence::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.sync().fps(), 30.0);
//! ```

use serde::Deserialize;

use cadence_core::semantic::{AnimationKind, ElementCategory, Easing, LayoutAlgorithm};

use crate::{
    error::{CadenceError, ensure_non_negative, ensure_positive},
    sync::Grouping,
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Timeline configuration section.
    #[serde(default)]
    timeline: TimelineConfig,

    /// Sync adapter configuration section.
    #[serde(default)]
    sync: SyncConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its three sections.
    pub fn new(layout: LayoutConfig, timeline: TimelineConfig, sync: SyncConfig) -> Self {
        Self {
            layout,
            timeline,
            sync,
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the timeline configuration.
    pub fn timeline(&self) -> &TimelineConfig {
        &self.timeline
    }

    /// Returns the sync configuration.
    pub fn sync(&self) -> &SyncConfig {
        &self.sync
    }

    /// Replaces the layout section.
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Replaces the timeline section.
    pub fn with_timeline(mut self, timeline: TimelineConfig) -> Self {
        self.timeline = timeline;
        self
    }

    /// Replaces the sync section.
    pub fn with_sync(mut self, sync: SyncConfig) -> Self {
        self.sync = sync;
        self
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::InvalidConfig`] naming the first offending value.
    pub fn validate(&self) -> Result<(), CadenceError> {
        self.layout.validate()?;
        self.timeline.validate()?;
        self.sync.validate()
    }
}

/// Layout configuration.
///
/// Lengths are in canvas units. Node sizes are derived from the label text
/// using `char_width` and `line_height` per display column and line.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    algorithm: LayoutAlgorithm,
    padding: f32,
    width: f32,
    height: f32,
    max_nodes: usize,
    cluster_margin: f32,
    radius: f32,
    ring_spacing: f32,
    char_width: f32,
    line_height: f32,
    text_padding: f32,
    min_node_width: f32,
    min_node_height: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            algorithm: LayoutAlgorithm::default(),
            padding: 50.0,
            width: 1920.0,
            height: 1080.0,
            max_nodes: 10,
            cluster_margin: 40.0,
            radius: 200.0,
            ring_spacing: 150.0,
            char_width: 9.0,
            line_height: 18.0,
            text_padding: 16.0,
            min_node_width: 120.0,
            min_node_height: 80.0,
        }
    }
}

impl LayoutConfig {
    /// Returns the default layout algorithm.
    pub fn algorithm(&self) -> LayoutAlgorithm {
        self.algorithm
    }

    /// Returns the gap between neighbouring nodes.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Returns the canvas width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the canvas height.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Returns the maximum number of nodes kept after simplification.
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    /// Returns the margin added around cluster members.
    pub fn cluster_margin(&self) -> f32 {
        self.cluster_margin
    }

    /// Returns the radius of the first radial ring.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns the distance between consecutive radial rings.
    pub fn ring_spacing(&self) -> f32 {
        self.ring_spacing
    }

    /// Returns the width of one display column of label text.
    pub fn char_width(&self) -> f32 {
        self.char_width
    }

    /// Returns the height of one line of label text.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Returns the padding between a label and the node border.
    pub fn text_padding(&self) -> f32 {
        self.text_padding
    }

    /// Returns the minimum node width.
    pub fn min_node_width(&self) -> f32 {
        self.min_node_width
    }

    /// Returns the minimum node height.
    pub fn min_node_height(&self) -> f32 {
        self.min_node_height
    }

    pub fn with_algorithm(mut self, algorithm: LayoutAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_canvas(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn with_cluster_margin(mut self, margin: f32) -> Self {
        self.cluster_margin = margin;
        self
    }

    pub fn with_rings(mut self, radius: f32, ring_spacing: f32) -> Self {
        self.radius = radius;
        self.ring_spacing = ring_spacing;
        self
    }

    pub fn with_min_node_size(mut self, width: f32, height: f32) -> Self {
        self.min_node_width = width;
        self.min_node_height = height;
        self
    }

    /// Validates all layout values.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::InvalidConfig`] for non-finite, negative or
    /// zero values where a positive one is required, and for a zero node
    /// budget.
    pub fn validate(&self) -> Result<(), CadenceError> {
        ensure_positive("layout.width", self.width)?;
        ensure_positive("layout.height", self.height)?;
        ensure_non_negative("layout.padding", self.padding)?;
        ensure_non_negative("layout.cluster_margin", self.cluster_margin)?;
        ensure_positive("layout.radius", self.radius)?;
        ensure_positive("layout.ring_spacing", self.ring_spacing)?;
        ensure_positive("layout.char_width", self.char_width)?;
        ensure_positive("layout.line_height", self.line_height)?;
        ensure_non_negative("layout.text_padding", self.text_padding)?;
        ensure_non_negative("layout.min_node_width", self.min_node_width)?;
        ensure_non_negative("layout.min_node_height", self.min_node_height)?;
        if self.max_nodes == 0 {
            return Err(CadenceError::invalid_config(
                "`layout.max_nodes` must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Timeline configuration.
///
/// All values are in seconds. A per-category duration, when set, overrides
/// `element_duration` for elements of that category.
///
/// Clusters and nodes fade in and edges are drawn by default. The easing and
/// the `loop` flag apply to every element.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    element_duration: f64,
    cluster_duration: Option<f64>,
    node_duration: Option<f64>,
    edge_duration: Option<f64>,
    inter_element_delay: f64,
    stagger: bool,
    initial_delay: f64,
    cluster_animation: AnimationKind,
    node_animation: AnimationKind,
    edge_animation: AnimationKind,
    easing: Easing,
    #[serde(rename = "loop")]
    looped: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            element_duration: 0.5,
            cluster_duration: None,
            node_duration: None,
            edge_duration: None,
            inter_element_delay: 0.3,
            stagger: true,
            initial_delay: 0.0,
            cluster_animation: AnimationKind::FadeIn,
            node_animation: AnimationKind::FadeIn,
            edge_animation: AnimationKind::Draw,
            easing: Easing::EaseOut,
            looped: false,
        }
    }
}

impl TimelineConfig {
    /// Returns the default reveal duration of one element.
    pub fn element_duration(&self) -> f64 {
        self.element_duration
    }

    /// Returns the delay between the starts of consecutive elements.
    pub fn inter_element_delay(&self) -> f64 {
        self.inter_element_delay
    }

    /// Returns whether element starts are staggered.
    pub fn stagger(&self) -> bool {
        self.stagger
    }

    /// Returns the delay before the first element starts.
    pub fn initial_delay(&self) -> f64 {
        self.initial_delay
    }

    /// Returns the reveal duration used for elements of `category`.
    pub fn duration_for(&self, category: ElementCategory) -> f64 {
        let specific = match category {
            ElementCategory::Cluster => self.cluster_duration,
            ElementCategory::Node => self.node_duration,
            ElementCategory::Edge => self.edge_duration,
        };
        specific.unwrap_or(self.element_duration)
    }

    /// Returns the reveal effect used for elements of `category`.
    pub fn animation_for(&self, category: ElementCategory) -> AnimationKind {
        match category {
            ElementCategory::Cluster => self.cluster_animation,
            ElementCategory::Node => self.node_animation,
            ElementCategory::Edge => self.edge_animation,
        }
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Returns whether reveals repeat forever instead of playing once.
    pub fn looped(&self) -> bool {
        self.looped
    }

    pub fn with_element_duration(mut self, duration: f64) -> Self {
        self.element_duration = duration;
        self
    }

    /// Overrides the reveal duration of a single category.
    pub fn with_category_duration(mut self, category: ElementCategory, duration: f64) -> Self {
        let slot = match category {
            ElementCategory::Cluster => &mut self.cluster_duration,
            ElementCategory::Node => &mut self.node_duration,
            ElementCategory::Edge => &mut self.edge_duration,
        };
        *slot = Some(duration);
        self
    }

    /// Overrides the reveal effect of a single category.
    pub fn with_category_animation(
        mut self,
        category: ElementCategory,
        kind: AnimationKind,
    ) -> Self {
        let slot = match category {
            ElementCategory::Cluster => &mut self.cluster_animation,
            ElementCategory::Node => &mut self.node_animation,
            ElementCategory::Edge => &mut self.edge_animation,
        };
        *slot = kind;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_loop(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    pub fn with_inter_element_delay(mut self, delay: f64) -> Self {
        self.inter_element_delay = delay;
        self
    }

    pub fn with_stagger(mut self, stagger: bool) -> Self {
        self.stagger = stagger;
        self
    }

    pub fn with_initial_delay(mut self, delay: f64) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Validates all timeline values.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::InvalidConfig`] for a non-positive duration or
    /// delay and for a negative initial delay.
    pub fn validate(&self) -> Result<(), CadenceError> {
        ensure_positive("timeline.element_duration", self.element_duration)?;
        for (name, value) in [
            ("timeline.cluster_duration", self.cluster_duration),
            ("timeline.node_duration", self.node_duration),
            ("timeline.edge_duration", self.edge_duration),
        ] {
            if let Some(value) = value {
                ensure_positive(name, value)?;
            }
        }
        ensure_positive("timeline.inter_element_delay", self.inter_element_delay)?;
        ensure_non_negative("timeline.initial_delay", self.initial_delay)
    }
}

/// Sync adapter configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    fps: f64,
    grouping: Grouping,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            fps: 30.0,
            grouping: Grouping::default(),
        }
    }
}

impl SyncConfig {
    /// Returns the frame rate of the frame-sequence adapter.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Returns the narration grouping policy.
    pub fn grouping(&self) -> &Grouping {
        &self.grouping
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// Validates the frame rate.
    ///
    /// # Errors
    ///
    /// Returns [`CadenceError::InvalidConfig`] when `fps` is not a positive
    /// finite number.
    pub fn validate(&self) -> Result<(), CadenceError> {
        ensure_positive("sync.fps", self.fps)
    }
}
