//! Tag types shared by the graph model, the layout engines and the timeline.
//!
//! All tags are closed enums that (de)serialize as lowercase strings so they
//! can appear directly in TOML configuration and JSON exports.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a tag name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported {kind} `{value}`")]
pub struct ParseTagError {
    kind: &'static str,
    value: String,
}

impl ParseTagError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Implements `FromStr`, `Display` and `&'static str` conversion for a tag enum.
macro_rules! tag_names {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = ParseTagError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(ParseTagError::new($kind, s)),
                }
            }
        }

        impl From<$ty> for &'static str {
            fn from(val: $ty) -> Self {
                match val {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s: &'static str = (*self).into();
                write!(f, "{s}")
            }
        }
    };
}

/// Shape a renderer should draw for a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    Rectangle,
    #[default]
    Rounded,
    Circle,
    Diamond,
    Hexagon,
    Cylinder,
    Parallelogram,
    Cloud,
}

tag_names!(NodeShape, "node shape", {
    Rectangle => "rectangle",
    Rounded => "rounded",
    Circle => "circle",
    Diamond => "diamond",
    Hexagon => "hexagon",
    Cylinder => "cylinder",
    Parallelogram => "parallelogram",
    Cloud => "cloud",
});

/// Line style of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

tag_names!(EdgeStyle, "edge style", {
    Solid => "solid",
    Dashed => "dashed",
    Dotted => "dotted",
});

/// Which ends of an edge carry an arrow head.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    #[default]
    Forward,
    Backward,
    Both,
    None,
}

tag_names!(EdgeDirection, "edge direction", {
    Forward => "forward",
    Backward => "backward",
    Both => "both",
    None => "none",
});

/// Category of an animated element.
///
/// Identifiers are unique within a category, and the timeline can assign a
/// different base duration per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    Cluster,
    Node,
    Edge,
}

tag_names!(ElementCategory, "element category", {
    Cluster => "cluster",
    Node => "node",
    Edge => "edge",
});

/// Reveal effect applied to an element.
///
/// Each kind maps to a CSS `@keyframes` name through
/// [`AnimationKind::keyframes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    #[default]
    FadeIn,
    ScaleIn,
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    /// Stroke drawn along the path.
    Draw,
    Pulse,
    Glow,
}

tag_names!(AnimationKind, "animation kind", {
    FadeIn => "fade_in",
    ScaleIn => "scale_in",
    SlideLeft => "slide_left",
    SlideRight => "slide_right",
    SlideUp => "slide_up",
    SlideDown => "slide_down",
    Draw => "draw",
    Pulse => "pulse",
    Glow => "glow",
});

impl AnimationKind {
    /// Name of the `@keyframes` rule a renderer defines for this kind.
    pub fn keyframes(self) -> &'static str {
        match self {
            Self::FadeIn => "fadeIn",
            Self::ScaleIn => "scaleIn",
            Self::SlideLeft => "slideLeft",
            Self::SlideRight => "slideRight",
            Self::SlideUp => "slideUp",
            Self::SlideDown => "slideDown",
            Self::Draw => "drawPath",
            Self::Pulse => "pulse",
            Self::Glow => "glow",
        }
    }
}

/// Timing curve of a reveal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    Ease,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
}

tag_names!(Easing, "easing", {
    Linear => "linear",
    Ease => "ease",
    EaseIn => "ease_in",
    EaseOut => "ease_out",
    EaseInOut => "ease_in_out",
});

impl Easing {
    /// The CSS `<easing-function>` keyword.
    pub fn css_name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Ease => "ease",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }
}

/// Placement algorithm used to lay out a diagram.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    Grid,
    #[default]
    Horizontal,
    Vertical,
    Radial,
}

tag_names!(LayoutAlgorithm, "layout algorithm", {
    Grid => "grid",
    Horizontal => "horizontal",
    Vertical => "vertical",
    Radial => "radial",
});
