//! Visual style attached to each resolved node.
//!
//! Only the properties the transition engine compares or mutates live here:
//! fills, strokes, opacity, an optional 2D transform, and the flexbox-ish
//! layout input consumed by the layout solver.

use serde::{Deserialize, Serialize};

/// A paint source used for fills and strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Paint {
    /// Solid RGBA color, components in 0.0..=1.0.
    Solid { rgba: [f32; 4] },
    /// Linear gradient between two points in node-local unit space.
    LinearGradient {
        start: [f32; 2],
        end: [f32; 2],
        stops: Vec<GradientStop>,
    },
    /// Image fill referenced by key; decoding happens elsewhere.
    Image { key: String },
}

/// One color stop of a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: f32,
    pub rgba: [f32; 4],
}

impl Paint {
    pub fn solid(rgba: [f32; 4]) -> Self {
        Self::Solid { rgba }
    }

    /// Parse a hex color string into a solid paint.
    ///
    /// Supports `#RRGGBB` and `#RRGGBBAA`.
    pub fn from_hex(color: &str) -> Option<Self> {
        let hex = color.trim().strip_prefix('#')?.trim();
        let channel = |range: std::ops::Range<usize>| -> Option<f32> {
            let byte = u8::from_str_radix(hex.get(range)?, 16).ok()?;
            Some(byte as f32 / 255.0)
        };
        let alpha = match hex.len() {
            6 => 1.0,
            8 => channel(6..8)?,
            _ => return None,
        };
        Some(Self::Solid {
            rgba: [channel(0..2)?, channel(2..4)?, channel(4..6)?, alpha],
        })
    }
}

/// Stroke applied to a node outline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Stroke {
    pub weight: f32,
    pub paints: Vec<Paint>,
}

/// Edge insets (padding).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeInsets {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// A length that may be automatic, absolute, or relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Dimension {
    #[default]
    Auto,
    Points(f32),
    Percent(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionType {
    #[default]
    Relative,
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

/// Cross-axis alignment of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Start,
    Center,
    End,
    Stretch,
}

/// Main-axis distribution of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justify {
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Layout input handed to the layout solver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutStyle {
    pub width: Dimension,
    pub height: Dimension,
    pub position: PositionType,
    /// Left inset, used with absolute positioning.
    pub left: Option<f32>,
    /// Top inset, used with absolute positioning.
    pub top: Option<f32>,
    pub flex_direction: FlexDirection,
    pub padding: EdgeInsets,
    pub gap: f32,
    pub align_items: Option<Align>,
    pub justify_content: Option<Justify>,
}

/// 2D transform applied at paint time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale_x: f32,
    pub scale_y: f32,
    /// Rotation in degrees.
    pub rotate: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotate: 0.0,
        }
    }
}

/// Complete style of a resolved node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub fills: Vec<Paint>,
    pub stroke: Stroke,
    /// Group opacity; fades multiply into this value.
    pub opacity: f32,
    pub transform: Option<Transform2D>,
    pub layout: LayoutStyle,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            fills: Vec::new(),
            stroke: Stroke::default(),
            opacity: 1.0,
            transform: None,
            layout: LayoutStyle::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_hex_colors() {
        assert_eq!(
            Paint::from_hex("#ff0000"),
            Some(Paint::solid([1.0, 0.0, 0.0, 1.0]))
        );
        let Some(Paint::Solid { rgba }) = Paint::from_hex("#00000080") else {
            panic!("expected solid paint");
        };
        assert!((rgba[3] - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(Paint::from_hex("red"), None);
        assert_eq!(Paint::from_hex("#abc"), None);
    }

    #[test]
    fn test_default_style_is_opaque() {
        let style = NodeStyle::default();
        assert_eq!(style.opacity, 1.0);
        assert!(style.fills.is_empty());
        assert_eq!(style.layout.width, Dimension::Auto);
    }
}
