//! Node sizing from label text.
//!
//! Labels are measured in display columns with `unicode-width`, so wide
//! glyphs take two columns and combining marks take none. The measured text
//! box is padded and then grown to the configured minimum node size.

use indexmap::IndexMap;
use unicode_width::UnicodeWidthStr;

use cadence_core::{
    geometry::{Insets, Size},
    identifier::Id,
};

use crate::{config::LayoutConfig, structure::{Diagram, Node}};

/// Node sizes keyed by id, in node insertion order.
pub type NodeSizes = IndexMap<Id, Size>;

/// Monospace text metrics used to size nodes.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextMetrics {
    char_width: f32,
    line_height: f32,
    padding: f32,
    min_size: Size,
}

impl TextMetrics {
    pub(crate) fn from_config(config: &LayoutConfig) -> Self {
        Self {
            char_width: config.char_width(),
            line_height: config.line_height(),
            padding: config.text_padding(),
            min_size: Size::new(config.min_node_width(), config.min_node_height()),
        }
    }

    /// Size of `text` without padding. Each `\n` starts a new line.
    pub(crate) fn text_size(&self, text: &str) -> Size {
        let (lines, columns) = text
            .lines()
            .fold((0usize, 0usize), |(lines, columns), line| {
                (lines + 1, columns.max(line.width()))
            });
        Size::new(
            columns as f32 * self.char_width,
            lines.max(1) as f32 * self.line_height,
        )
    }

    pub(crate) fn node_size(&self, node: &Node) -> Size {
        self.text_size(&node.display_label())
            .add_padding(Insets::uniform(self.padding))
            .max(self.min_size)
    }
}

/// Measures every node of `diagram`.
pub(crate) fn measure_nodes(diagram: &Diagram, config: &LayoutConfig) -> NodeSizes {
    let metrics = TextMetrics::from_config(config);
    diagram
        .nodes()
        .map(|node| (node.id(), metrics.node_size(node)))
        .collect()
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn metrics() -> TextMetrics {
        TextMetrics::from_config(&LayoutConfig::default())
    }

    #[test]
    fn test_text_size_single_line() {
        let size = metrics().text_size("Database");
        assert_approx_eq!(f32, size.width(), 8.0 * 9.0);
        assert_approx_eq!(f32, size.height(), 18.0);
    }

    #[test]
    fn test_text_size_multi_line_uses_widest() {
        let size = metrics().text_size("API\nGateway");
        assert_approx_eq!(f32, size.width(), 7.0 * 9.0);
        assert_approx_eq!(f32, size.height(), 36.0);
    }

    #[test]
    fn test_text_size_wide_glyphs() {
        let size = metrics().text_size("数据库");
        assert_approx_eq!(f32, size.width(), 6.0 * 9.0);
    }

    #[test]
    fn test_empty_text_has_one_line() {
        let size = metrics().text_size("");
        assert_approx_eq!(f32, size.width(), 0.0);
        assert_approx_eq!(f32, size.height(), 18.0);
    }

    #[test]
    fn test_node_size_respects_minimum() {
        let size = metrics().node_size(&Node::new("db", "DB"));
        assert_approx_eq!(f32, size.width(), 120.0);
        assert_approx_eq!(f32, size.height(), 80.0);
    }

    #[test]
    fn test_node_size_grows_with_label() {
        // Truncated to 17 columns plus "..." = 20 columns.
        let size = metrics().node_size(&Node::new("n", "A very long service name indeed"));
        assert_approx_eq!(f32, size.width(), 20.0 * 9.0 + 32.0);
        assert_approx_eq!(f32, size.height(), 80.0);
    }

    #[test]
    fn test_measure_nodes_keeps_insertion_order() {
        let mut diagram = Diagram::new();
        diagram.add_node(Node::new("z", "Z")).unwrap();
        diagram.add_node(Node::new("a", "A")).unwrap();

        let sizes = measure_nodes(&diagram, &LayoutConfig::default());
        let ids: Vec<_> = sizes.keys().map(|id| id.to_string()).collect();
        assert_eq!(ids, ["z", "a"]);
    }
}
