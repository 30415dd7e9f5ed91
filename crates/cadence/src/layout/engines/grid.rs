//! Grid layout engine
//!
//! Places nodes row-major, in insertion order, on a grid of
//! `ceil(sqrt(n))` columns. Every cell has the size of the largest node plus
//! the padding, so no two nodes overlap. The grid is centered on the canvas.

use cadence_core::geometry::{Point, Size};

use crate::{
    layout::{
        engines::{LayoutEngine, Placement},
        sizing::NodeSizes,
    },
    structure::Diagram,
};

#[derive(Debug, Clone, Default)]
pub struct Engine {
    padding: f32,
    canvas: Size,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_padding(&mut self, padding: f32) -> &mut Self {
        self.padding = padding;
        self
    }

    pub fn set_canvas(&mut self, canvas: Size) -> &mut Self {
        self.canvas = canvas;
        self
    }
}

/// Smallest column count `c` with `c * c >= n`.
fn column_count(n: usize) -> usize {
    let mut cols = (n as f64).sqrt().ceil() as usize;
    while cols * cols < n {
        cols += 1;
    }
    cols.max(1)
}

impl LayoutEngine for Engine {
    fn place(&self, diagram: &Diagram, sizes: &NodeSizes) -> Placement {
        let cols = column_count(diagram.node_count());
        let largest = sizes
            .values()
            .fold(Size::default(), |acc, size| acc.max(*size));
        let cell = Size::new(
            largest.width() + self.padding,
            largest.height() + self.padding,
        );

        let mut placement = Placement::with_capacity(diagram.node_count());
        for (i, node) in diagram.nodes().enumerate() {
            let (row, col) = (i / cols, i % cols);
            let center = Point::new(
                col as f32 * cell.width() + cell.width() / 2.0,
                row as f32 * cell.height() + cell.height() / 2.0,
            );
            placement.place(node.id(), center);
        }
        placement.center_on(self.canvas, sizes);
        placement
    }
}
