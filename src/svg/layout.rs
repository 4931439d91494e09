//! Canvas layout: view window, y-flip, and background geometry.

use crate::geom::BBox;

/// Options for preview generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    /// View margin in mm, added on all sides.
    pub margin: f64,
    /// Override for the output width; content size when absent.
    pub width: Option<f64>,
    /// Override for the output height; content size when absent.
    pub height: Option<f64>,
    /// Stroke width in mm for outlines and hatch lines.
    pub stroke_width: f64,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            margin: 10.0,
            width: None,
            height: None,
            stroke_width: 0.1,
        }
    }
}

/// Background rectangle, identical to the view window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Background {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Computed canvas layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub view_box: String,
    pub width: f64,
    pub height: f64,
    /// `matrix(1 0 0 -1 0 flip_y)` flips the scene into screen coordinates.
    pub flip_y: f64,
    pub bg: Background,
}

/// Compute the view window for a scene box.
///
/// The window always includes the machine origin, grows by `margin` on all
/// sides, and substitutes a 100x100 area when the scene is empty so an empty
/// project still produces a visible canvas.
pub fn compute_layout(bbox: BBox, options: &SvgOptions) -> Layout {
    let bbox = if bbox.is_empty() {
        BBox::new(0.0, 0.0, 100.0, 100.0)
    } else {
        bbox
    };

    let min_x = bbox.min_x.min(0.0) - options.margin;
    let min_y = bbox.min_y.min(0.0) - options.margin;
    let max_x = bbox.max_x.max(0.0) + options.margin;
    let max_y = bbox.max_y.max(0.0) + options.margin;

    let content_width = max_x - min_x;
    let content_height = max_y - min_y;
    let view_box = format!("{min_x} {min_y} {content_width} {content_height}");
    let flip_y = max_y + min_y;

    Layout {
        view_box,
        width: options.width.unwrap_or(content_width),
        height: options.height.unwrap_or(content_height),
        flip_y,
        bg: Background {
            x: min_x,
            y: min_y,
            width: content_width,
            height: content_height,
        },
    }
}
