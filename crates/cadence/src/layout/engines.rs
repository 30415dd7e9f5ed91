//! Layout engine factory module
//!
//! Each [`LayoutAlgorithm`] is implemented by an engine that places node
//! centers. Engines are created and configured through [`EngineBuilder`] and
//! dispatched through the closed [`Engine`] enum.

mod grid;
mod layered;
mod radial;

use std::collections::HashMap;

use cadence_core::{
    geometry::{Bounds, Point, Size},
    identifier::Id,
    semantic::LayoutAlgorithm,
};

use crate::{layout::sizing::NodeSizes, structure::Diagram};

pub use layered::Direction;

/// Node centers produced by an engine, plus the order in which the engine
/// visited the nodes.
#[derive(Debug, Clone, Default)]
pub struct Placement {
    centers: HashMap<Id, Point>,
    order: Vec<Id>,
}

impl Placement {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            centers: HashMap::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    fn place(&mut self, id: Id, center: Point) {
        if self.centers.insert(id, center).is_none() {
            self.order.push(id);
        }
    }

    pub fn center(&self, id: Id) -> Option<Point> {
        self.centers.get(&id).copied()
    }

    /// Node ids in engine visiting order. Every node appears exactly once.
    pub fn order(&self) -> &[Id] {
        &self.order
    }

    pub fn into_order(self) -> Vec<Id> {
        self.order
    }

    /// Moves all centers so the bounding box of the placed nodes is centered
    /// on `canvas`.
    fn center_on(&mut self, canvas: Size, sizes: &NodeSizes) {
        let content = self
            .order
            .iter()
            .filter_map(|id| {
                let center = self.centers.get(id)?;
                let size = sizes.get(id).copied().unwrap_or_default();
                Some(Bounds::new_from_center(*center, size))
            })
            .reduce(|acc, bounds| acc.merge(&bounds));
        let Some(content) = content else {
            return;
        };

        let canvas_center = Point::new(canvas.width() / 2.0, canvas.height() / 2.0);
        let offset = canvas_center.sub_point(content.center());
        for center in self.centers.values_mut() {
            *center = center.add_point(offset);
        }
    }
}

/// Trait defining the interface for layout engines
pub trait LayoutEngine {
    /// Places the center of every node of `diagram`.
    ///
    /// `sizes` holds the measured size of every node.
    fn place(&self, diagram: &Diagram, sizes: &NodeSizes) -> Placement;
}

/// A configured engine for one [`LayoutAlgorithm`].
#[derive(Debug, Clone)]
pub enum Engine {
    Grid(grid::Engine),
    Layered(layered::Engine),
    Radial(radial::Engine),
}

impl LayoutEngine for Engine {
    fn place(&self, diagram: &Diagram, sizes: &NodeSizes) -> Placement {
        match self {
            Self::Grid(engine) => engine.place(diagram, sizes),
            Self::Layered(engine) => engine.place(diagram, sizes),
            Self::Radial(engine) => engine.place(diagram, sizes),
        }
    }
}

/// Builder for creating and configuring layout engines.
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    padding: f32,
    canvas: Size,
    radius: f32,
    ring_spacing: f32,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    /// Create a new engine builder with default spacing and a 1920x1080 canvas
    pub fn new() -> Self {
        Self {
            padding: 50.0,
            canvas: Size::new(1920.0, 1080.0),
            radius: 200.0,
            ring_spacing: 150.0,
        }
    }

    /// Set the gap between neighbouring nodes
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the canvas the layout is centered on
    pub fn with_canvas(mut self, canvas: Size) -> Self {
        self.canvas = canvas;
        self
    }

    /// Set the first ring radius and the spacing between rings
    pub fn with_rings(mut self, radius: f32, ring_spacing: f32) -> Self {
        self.radius = radius;
        self.ring_spacing = ring_spacing;
        self
    }

    /// Build the engine for `algorithm`
    pub fn build(&self, algorithm: LayoutAlgorithm) -> Engine {
        match algorithm {
            LayoutAlgorithm::Grid => {
                let mut e = grid::Engine::new();
                e.set_padding(self.padding).set_canvas(self.canvas);
                Engine::Grid(e)
            }
            LayoutAlgorithm::Horizontal | LayoutAlgorithm::Vertical => {
                let direction = if algorithm == LayoutAlgorithm::Vertical {
                    Direction::TopToBottom
                } else {
                    Direction::LeftToRight
                };
                let mut e = layered::Engine::new(direction);
                e.set_padding(self.padding).set_canvas(self.canvas);
                Engine::Layered(e)
            }
            LayoutAlgorithm::Radial => {
                let mut e = radial::Engine::new();
                e.set_canvas(self.canvas)
                    .set_rings(self.radius, self.ring_spacing);
                Engine::Radial(e)
            }
        }
    }
}
