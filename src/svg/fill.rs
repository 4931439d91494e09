//! Hatch fill: scan-line generation, line clipping, and reusable fill
//! patterns.

use std::collections::HashSet;

use crate::geom::{BBox, Point};
use crate::svg::node::{SvgNode, leaf};
use crate::svg::palette::hex_to_rgba;

/// Stroke opacity shared by inline hatch lines and pattern tiles.
pub const FILL_OPACITY: f64 = 0.8;

/// Hatch parameters taken from a scan-mode cut setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillSettings {
    /// Line spacing in mm.
    pub interval: f64,
    /// Fill angle in degrees.
    pub angle: f64,
    /// Add a second, perpendicular line family.
    pub cross_hatch: bool,
}

/// Generate clipped scan lines covering `bbox`.
pub fn generate_scan_lines(
    bbox: BBox,
    settings: &FillSettings,
    color: &str,
    stroke_width: f64,
) -> Vec<SvgNode> {
    let angle_rad = settings.angle.to_radians();
    let mut lines = lines_at_angle(bbox, settings.interval, angle_rad, color, stroke_width);
    if settings.cross_hatch {
        lines.extend(lines_at_angle(
            bbox,
            settings.interval,
            angle_rad + std::f64::consts::FRAC_PI_2,
            color,
            stroke_width,
        ));
    }
    lines
}

/// Parallel lines at `angle` through `bbox`, spaced by `interval` along the
/// perpendicular, each spanning the bbox diagonal from the center so every
/// candidate fully crosses the box before clipping.
fn lines_at_angle(
    bbox: BBox,
    interval: f64,
    angle: f64,
    color: &str,
    stroke_width: f64,
) -> Vec<SvgNode> {
    let mut lines = Vec::new();
    if interval <= 0.0 {
        return lines;
    }

    let diagonal = bbox.diagonal();
    let (dy, dx) = angle.sin_cos();
    let (px, py) = (-dy, dx);
    let center = bbox.center();

    let num_lines = (diagonal / interval).ceil() + 2.0;
    let mut i = -num_lines / 2.0;
    while i <= num_lines / 2.0 {
        let offset = i * interval;
        let start = Point::new(
            center.x + px * offset - dx * diagonal,
            center.y + py * offset - dy * diagonal,
        );
        let end = Point::new(
            center.x + px * offset + dx * diagonal,
            center.y + py * offset + dy * diagonal,
        );

        if let Some((a, b)) = clip_line_to_bbox(start, end, &bbox) {
            lines.push(leaf(
                "line",
                &[
                    ("x1", &format!("{}", a.x)),
                    ("y1", &format!("{}", a.y)),
                    ("x2", &format!("{}", b.x)),
                    ("y2", &format!("{}", b.y)),
                    ("stroke", color),
                    ("stroke-width", &format!("{stroke_width}")),
                    ("stroke-opacity", &format!("{FILL_OPACITY}")),
                ],
            ));
        }
        i += 1.0;
    }

    lines
}

const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

fn outcode(p: Point, bbox: &BBox) -> u8 {
    let mut code = INSIDE;
    if p.x < bbox.min_x {
        code |= LEFT;
    } else if p.x > bbox.max_x {
        code |= RIGHT;
    }
    if p.y < bbox.min_y {
        code |= BOTTOM;
    } else if p.y > bbox.max_y {
        code |= TOP;
    }
    code
}

/// Cohen-Sutherland segment clipping against an axis-aligned box.
///
/// Returns `None` when the segment lies fully outside. Each iteration moves
/// one outside endpoint onto the box edge its outcode names, until both
/// endpoints are inside or the outcodes share a side.
pub fn clip_line_to_bbox(mut p1: Point, mut p2: Point, bbox: &BBox) -> Option<(Point, Point)> {
    let mut code1 = outcode(p1, bbox);
    let mut code2 = outcode(p2, bbox);

    loop {
        if code1 | code2 == INSIDE {
            return Some((p1, p2));
        }
        if code1 & code2 != INSIDE {
            return None;
        }

        let code_out = if code1 != INSIDE { code1 } else { code2 };
        let p = if code_out & TOP != 0 {
            Point::new(
                p1.x + (p2.x - p1.x) * (bbox.max_y - p1.y) / (p2.y - p1.y),
                bbox.max_y,
            )
        } else if code_out & BOTTOM != 0 {
            Point::new(
                p1.x + (p2.x - p1.x) * (bbox.min_y - p1.y) / (p2.y - p1.y),
                bbox.min_y,
            )
        } else if code_out & RIGHT != 0 {
            Point::new(
                bbox.max_x,
                p1.y + (p2.y - p1.y) * (bbox.max_x - p1.x) / (p2.x - p1.x),
            )
        } else {
            Point::new(
                bbox.min_x,
                p1.y + (p2.y - p1.y) * (bbox.min_x - p1.x) / (p2.x - p1.x),
            )
        };

        if code_out == code1 {
            p1 = p;
            code1 = outcode(p1, bbox);
        } else {
            p2 = p;
            code2 = outcode(p2, bbox);
        }
    }
}

/// Parameters of a reusable `<pattern>` hatch tile.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternParams {
    pub interval: f64,
    pub angle: f64,
    pub cross_hatch: bool,
    pub color: String,
    pub stroke_width: f64,
    pub opacity: f64,
}

impl PatternParams {
    /// Deterministic id. Numeric inputs are rounded to three decimals so
    /// floating-point noise in otherwise-equal settings maps to one id,
    /// and the color is reduced to an id-safe token.
    pub fn id(&self) -> String {
        let round = |v: f64| (v * 1000.0).round() / 1000.0;
        let color: String = self
            .color
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        format!(
            "hatch-{}-{}-{}-{}-{}-{}",
            round(self.interval),
            round(self.angle),
            if self.cross_hatch { "x" } else { "p" },
            color,
            round(self.stroke_width),
            round(self.opacity)
        )
    }
}

/// Dedup cache of pattern definitions, keyed by [`PatternParams::id`].
#[derive(Debug, Default)]
pub struct PatternCache {
    seen: HashSet<String>,
    defs: Vec<SvgNode>,
}

impl PatternCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the pattern if unseen and return its id for use as a
    /// `fill="url(#id)"` reference.
    pub fn ensure(&mut self, params: &PatternParams) -> String {
        let id = params.id();
        if self.seen.insert(id.clone()) {
            self.defs.push(build_pattern(&id, params));
        }
        id
    }

    /// All registered definitions, for a `<defs>` block.
    pub fn into_defs(self) -> Vec<SvgNode> {
        self.defs
    }
}

fn build_pattern(id: &str, params: &PatternParams) -> SvgNode {
    let size = format!("{}", params.interval);
    let stroke = hex_to_rgba(&params.color, params.opacity);
    let width = format!("{}", params.stroke_width);

    let mut pattern = SvgNode::new("pattern")
        .attr("id", id)
        .attr("width", size.clone())
        .attr("height", size.clone())
        .attr("patternUnits", "userSpaceOnUse")
        .attr("patternTransform", format!("rotate({})", params.angle))
        .child(leaf(
            "line",
            &[
                ("x1", "0"),
                ("y1", "0"),
                ("x2", &size),
                ("y2", "0"),
                ("stroke", &stroke),
                ("stroke-width", &width),
            ],
        ));
    if params.cross_hatch {
        pattern = pattern.child(leaf(
            "line",
            &[
                ("x1", "0"),
                ("y1", "0"),
                ("x2", "0"),
                ("y2", &size),
                ("stroke", &stroke),
                ("stroke-width", &width),
            ],
        ));
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(interval: f64, angle: f64, cross_hatch: bool) -> FillSettings {
        FillSettings {
            interval,
            angle,
            cross_hatch,
        }
    }

    #[test]
    fn clip_keeps_inside_segment() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        let clipped = clip_line_to_bbox(Point::new(1.0, 1.0), Point::new(9.0, 9.0), &bbox);
        assert_eq!(clipped, Some((Point::new(1.0, 1.0), Point::new(9.0, 9.0))));
    }

    #[test]
    fn clip_rejects_fully_outside_segment() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(
            clip_line_to_bbox(Point::new(-5.0, -1.0), Point::new(15.0, -1.0), &bbox),
            None
        );
    }

    #[test]
    fn clip_trims_crossing_segment_to_edges() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        let (a, b) =
            clip_line_to_bbox(Point::new(-10.0, 5.0), Point::new(20.0, 5.0), &bbox).unwrap();
        assert_eq!((a.x, a.y), (0.0, 5.0));
        assert_eq!((b.x, b.y), (10.0, 5.0));
    }

    #[test]
    fn horizontal_fill_covers_box_height() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        let lines = generate_scan_lines(bbox, &settings(1.0, 0.0, false), "#FF0000", 0.1);
        // diagonal ~14.14 at 1mm spacing gives an odd candidate count, so
        // offsets land on half-integers and 10 lines cross the box.
        assert!(lines.len() >= 10, "got {} lines", lines.len());
        for line in &lines {
            assert_eq!(line.name, "line");
            assert!(line.attrs.contains(&("stroke".to_string(), "#FF0000".to_string())));
            assert!(
                line.attrs
                    .contains(&("stroke-opacity".to_string(), "0.8".to_string()))
            );
        }
    }

    #[test]
    fn cross_hatch_doubles_line_families() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        let single = generate_scan_lines(bbox, &settings(1.0, 45.0, false), "black", 0.1);
        let crossed = generate_scan_lines(bbox, &settings(1.0, 45.0, true), "black", 0.1);
        assert!(crossed.len() > single.len());
    }

    #[test]
    fn zero_interval_produces_no_lines() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(generate_scan_lines(bbox, &settings(0.0, 0.0, false), "black", 0.1).is_empty());
    }

    #[test]
    fn pattern_id_is_stable_under_float_noise() {
        let a = PatternParams {
            interval: 0.1,
            angle: 45.0,
            cross_hatch: false,
            color: "#FF0000".to_string(),
            stroke_width: 0.1,
            opacity: 0.8,
        };
        let b = PatternParams {
            interval: 0.1000000001,
            angle: 45.0000000002,
            ..a.clone()
        };
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id(), "hatch-0.1-45-p-ff0000-0.1-0.8");
    }

    #[test]
    fn pattern_cache_registers_each_id_once() {
        let mut cache = PatternCache::new();
        let params = PatternParams {
            interval: 0.2,
            angle: 0.0,
            cross_hatch: true,
            color: "#0000FF".to_string(),
            stroke_width: 0.1,
            opacity: 0.8,
        };
        let id1 = cache.ensure(&params);
        let id2 = cache.ensure(&params);
        assert_eq!(id1, id2);
        let defs = cache.into_defs();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "pattern");
        // Cross-hatch tile carries both line directions.
        assert_eq!(defs[0].children.len(), 2);
    }
}
