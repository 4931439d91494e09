//! Per-shape-kind SVG renderers.
//!
//! Each kind renders into a transform group holding its outline, plus hatch
//! fill when the shape's cut setting is a scan mode: rectangles and
//! ellipses reference a shared repeatable pattern tile, while paths and
//! compound groups get line geometry clipped to their own outline. Groups
//! whose children are all closed fillable outlines collapse into one
//! compound nonzero path so inner subpaths cut holes.

use std::collections::HashMap;

use crate::bounds::shape_bbox;
use crate::geom::{BBox, Mat, Point};
use crate::svg::fill::{FILL_OPACITY, FillSettings, PatternCache, PatternParams, generate_scan_lines};
use crate::svg::layout::SvgOptions;
use crate::svg::node::{SvgNode, g, leaf};
use crate::svg::palette::color_for_cut_index;
use crate::svg::path_data::{ellipse_to_path_data, path_to_path_data, rect_to_path_data};
use crate::types::{Bitmap, CutSetting, Ellipse, Group, PathShape, Rect, Shape, TextShape};

/// Shared render state: the cut-setting table, resolved options, the
/// clip-id counter that keeps generated ids unique and reproducible across
/// runs of the same input, and the dedup cache of pattern tiles.
pub struct RenderCtx<'a> {
    cut_settings: &'a HashMap<i32, CutSetting>,
    stroke_width: f64,
    clip_counter: usize,
    patterns: PatternCache,
}

impl<'a> RenderCtx<'a> {
    pub fn new(cut_settings: &'a HashMap<i32, CutSetting>, options: &SvgOptions) -> Self {
        Self {
            cut_settings,
            stroke_width: options.stroke_width,
            clip_counter: 0,
            patterns: PatternCache::new(),
        }
    }

    fn next_clip_id(&mut self) -> String {
        let id = format!("clip-{}", self.clip_counter);
        self.clip_counter += 1;
        id
    }

    fn setting_for(&self, cut_index: Option<i32>) -> Option<&'a CutSetting> {
        cut_index.and_then(|i| self.cut_settings.get(&i))
    }

    fn filled_setting_for(&self, cut_index: Option<i32>) -> Option<&'a CutSetting> {
        self.setting_for(cut_index).filter(|s| s.mode.is_filled())
    }

    /// A `url(#…)` fill reference for the cut setting's hatch, registering
    /// the pattern tile on first use.
    fn hatch_fill(&mut self, cut: &CutSetting, color: &str) -> String {
        let settings = fill_settings(cut);
        let id = self.patterns.ensure(&PatternParams {
            interval: settings.interval,
            angle: settings.angle,
            cross_hatch: settings.cross_hatch,
            color: color.to_string(),
            stroke_width: self.stroke_width,
            opacity: FILL_OPACITY,
        });
        format!("url(#{id})")
    }

    /// Every pattern tile registered during rendering, for a `<defs>` block.
    pub fn into_defs(self) -> Vec<SvgNode> {
        self.patterns.into_defs()
    }
}

fn fill_settings(cut: &CutSetting) -> FillSettings {
    FillSettings {
        // A zero or missing interval would generate nothing; the authoring
        // tool's default spacing stands in.
        interval: match cut.interval {
            Some(v) if v != 0.0 => v,
            _ => 0.1,
        },
        angle: cut.angle.unwrap_or(0.0),
        cross_hatch: cut.cross_hatch.unwrap_or(false),
    }
}

/// Render every top-level shape.
pub fn render_all(shapes: &[Shape], ctx: &mut RenderCtx) -> Vec<SvgNode> {
    shapes.iter().map(|s| render_shape(s, ctx)).collect()
}

pub fn render_shape(shape: &Shape, ctx: &mut RenderCtx) -> SvgNode {
    match shape {
        Shape::Rect(s) => render_rect(s, ctx),
        Shape::Ellipse(s) => render_ellipse(s, ctx),
        Shape::Path(s) => render_path(s, ctx),
        Shape::Group(s) => render_group(s, ctx),
        Shape::Bitmap(s) => render_bitmap(s),
        Shape::Text(s) => render_text(s),
    }
}

fn render_rect(rect: &Rect, ctx: &mut RenderCtx) -> SvgNode {
    let stroke = color_for_cut_index(rect.cut_index);
    // The element's own fill keeps the hatch inside the outline, so the
    // shared pattern tile replaces per-shape line geometry here.
    let fill = match ctx.filled_setting_for(rect.cut_index) {
        Some(cut) => ctx.hatch_fill(cut, stroke),
        None => "none".to_string(),
    };

    g(&[("transform", &rect.xform.to_svg())]).child(leaf(
        "rect",
        &[
            ("x", "0"),
            ("y", "0"),
            ("width", &format!("{}", rect.w)),
            ("height", &format!("{}", rect.h)),
            ("rx", &format!("{}", rect.cr)),
            ("ry", &format!("{}", rect.cr)),
            ("fill", &fill),
            ("stroke", stroke),
        ],
    ))
}

fn render_ellipse(ellipse: &Ellipse, ctx: &mut RenderCtx) -> SvgNode {
    let stroke = color_for_cut_index(ellipse.cut_index);
    let fill = match ctx.filled_setting_for(ellipse.cut_index) {
        Some(cut) => ctx.hatch_fill(cut, stroke),
        None => "none".to_string(),
    };

    let outline = if ellipse.rx == ellipse.ry {
        leaf(
            "circle",
            &[
                ("cx", "0"),
                ("cy", "0"),
                ("r", &format!("{}", ellipse.rx)),
                ("fill", &fill),
                ("stroke", stroke),
            ],
        )
    } else {
        leaf(
            "ellipse",
            &[
                ("cx", "0"),
                ("cy", "0"),
                ("rx", &format!("{}", ellipse.rx)),
                ("ry", &format!("{}", ellipse.ry)),
                ("fill", &fill),
                ("stroke", stroke),
            ],
        )
    };
    g(&[("transform", &ellipse.xform.to_svg())]).child(outline)
}

fn render_path(path: &PathShape, ctx: &mut RenderCtx) -> SvgNode {
    let stroke = color_for_cut_index(path.cut_index);
    let d = path_to_path_data(&path.geometry, &Mat::identity());
    let mut node = g(&[("transform", &path.xform.to_svg())]);

    let filled = path.geometry.is_closed && !d.is_empty();
    if filled && let Some(cut) = ctx.filled_setting_for(path.cut_index) {
        let local = BBox::empty().add_points(
            path.geometry
                .verts
                .iter()
                .map(|v| Point::new(v.x, v.y)),
        );
        let lines = generate_scan_lines(local, &fill_settings(cut), stroke, ctx.stroke_width);

        let clip_id = ctx.next_clip_id();
        node = node
            .child(SvgNode::new("clipPath").attr("id", clip_id.clone()).child(
                leaf("path", &[("d", &d)]),
            ))
            .child(g(&[("clip-path", &format!("url(#{clip_id})"))]).children(lines));
    }

    node.child(leaf(
        "path",
        &[
            ("d", &d),
            ("fill", "none"),
            ("stroke", stroke),
            ("stroke-width", &format!("{}", ctx.stroke_width)),
        ],
    ))
}

fn render_bitmap(bitmap: &Bitmap) -> SvgNode {
    g(&[("transform", &bitmap.xform.to_svg())]).child(leaf(
        "image",
        &[
            ("href", &format!("data:image/png;base64,{}", bitmap.data)),
            ("x", "0"),
            ("y", "0"),
            ("width", &format!("{}", bitmap.w)),
            ("height", &format!("{}", bitmap.h)),
        ],
    ))
}

fn render_text(text: &TextShape) -> SvgNode {
    let stroke = color_for_cut_index(text.cut_index);
    g(&[("transform", &text.xform.to_svg())]).child(
        SvgNode::new("text")
            .attr("x", "0")
            .attr("y", "0")
            .attr("fill", stroke)
            .text(text.text.clone()),
    )
}

/// A shape that contributes a closed outline to a compound path.
fn is_fillable_outline(shape: &Shape) -> bool {
    match shape {
        Shape::Path(p) => p.geometry.is_closed,
        Shape::Rect(_) | Shape::Ellipse(_) => true,
        _ => false,
    }
}

/// Path data for a compound-group child in the combined coordinate space.
/// The group matrix is the outer transform.
fn child_path_data(shape: &Shape, group_matrix: &Mat) -> Option<String> {
    match shape {
        Shape::Path(p) if p.geometry.is_closed => {
            Some(path_to_path_data(&p.geometry, &group_matrix.mul(&p.xform)))
        }
        Shape::Rect(r) => Some(rect_to_path_data(
            r.w,
            r.h,
            r.cr,
            &group_matrix.mul(&r.xform),
        )),
        Shape::Ellipse(e) => Some(ellipse_to_path_data(
            e.rx,
            e.ry,
            &group_matrix.mul(&e.xform),
        )),
        _ => None,
    }
}

fn render_group(group: &Group, ctx: &mut RenderCtx) -> SvgNode {
    let all_fillable =
        !group.children.is_empty() && group.children.iter().all(is_fillable_outline);

    if all_fillable {
        let parts: Vec<String> = group
            .children
            .iter()
            .filter_map(|c| child_path_data(c, &group.xform))
            .collect();

        if !parts.is_empty() {
            let combined = parts.join(" ");
            let mut node = g(&[]);

            // The first child's cut setting stands for the whole compound.
            let cut_index = group.children[0].cut_index();
            let stroke = color_for_cut_index(cut_index);

            if let Some(cut) = ctx.filled_setting_for(cut_index) {
                let bbox = group
                    .children
                    .iter()
                    .fold(BBox::empty(), |acc, c| acc.union(&shape_bbox(c)));
                let lines =
                    generate_scan_lines(bbox, &fill_settings(cut), stroke, ctx.stroke_width);

                let clip_id = ctx.next_clip_id();
                node = node
                    .child(
                        SvgNode::new("clipPath").attr("id", clip_id.clone()).child(leaf(
                            "path",
                            &[
                                ("d", &combined),
                                ("fill-rule", "nonzero"),
                                ("clip-rule", "nonzero"),
                            ],
                        )),
                    )
                    .child(g(&[("clip-path", &format!("url(#{clip_id})"))]).children(lines));
            }

            // One compound outline; transforms are baked into the data.
            return node.child(leaf(
                "path",
                &[
                    ("d", &combined),
                    ("fill", "none"),
                    ("fill-rule", "nonzero"),
                    ("stroke", stroke),
                    ("stroke-width", &format!("{}", ctx.stroke_width)),
                ],
            ));
        }
    }

    let children: Vec<SvgNode> = group
        .children
        .iter()
        .map(|c| render_shape(c, ctx))
        .collect();
    g(&[("transform", &group.xform.to_svg())]).children(children)
}
