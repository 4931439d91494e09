//! LBRN2 document decoding.
//!
//! Dispatch is tag-driven: every top-level element of a `LightBurnProject`
//! must map to a known constructor, and every `Shape` must carry a known
//! `Type`. Within an element, decoding is lenient: malformed fields fall
//! back to defaults and dangling geometry-template references resolve to
//! empty geometry, each noted in the warning log.

use crate::codec::{self, TemplateCache};
use crate::coerce::{num_or, opt_bool, opt_int, opt_num};
use crate::error::ProjectError;
use crate::geom::{Mat, Point};
use crate::types::{
    Bitmap, CutMode, CutSetting, Ellipse, Group, Notes, PathGeometry, PathShape, Project, Rect,
    Shape, TextShape, Thumbnail, UiPrefs, VariableText, Vert,
};
use crate::xml::{XmlNode, parse_document};

/// State for one parse call. The template cache must not outlive the
/// document: identical id pairs in two files are unrelated.
struct ParseContext<'a> {
    templates: TemplateCache,
    log: &'a mut Vec<String>,
}

/// Parse an LBRN2 document. Warnings about recoverable oddities are pushed
/// onto `log`.
pub fn parse_project(xml: &str, log: &mut Vec<String>) -> Result<Project, ProjectError> {
    let root = parse_document(xml)?;
    if root.name != "LightBurnProject" {
        return Err(ProjectError::UnknownElement {
            tag: root.name.clone(),
        });
    }
    let mut ctx = ParseContext {
        templates: TemplateCache::new(),
        log,
    };
    project_from_node(&root, &mut ctx)
}

fn project_from_node(node: &XmlNode, ctx: &mut ParseContext) -> Result<Project, ProjectError> {
    let mut project = Project {
        app_version: node.attr("AppVersion").map(str::to_string),
        format_version: node.attr("FormatVersion").map(str::to_string),
        material_height: opt_num(node.attr("MaterialHeight")),
        mirror_x: opt_bool(node.attr("MirrorX")),
        mirror_y: opt_bool(node.attr("MirrorY")),
        ..Default::default()
    };

    for child in &node.children {
        match child.name.as_str() {
            "Thumbnail" => {
                project.thumbnail = Some(Thumbnail {
                    source: child.attr("Source").unwrap_or_default().to_string(),
                });
            }
            "VariableText" => project.variable_text = Some(variable_text_from_node(child)),
            "UIPrefs" => project.ui_prefs = Some(ui_prefs_from_node(child)),
            "CutSetting" => project.cut_settings.push(cut_setting_from_node(child)),
            "Shape" => project.shapes.push(shape_from_node(child, ctx)?),
            "Notes" => {
                project.notes = Some(Notes {
                    show_on_load: opt_bool(child.attr("ShowOnLoad")),
                    text: child.attr("Notes").map(str::to_string),
                });
            }
            tag => {
                return Err(ProjectError::UnknownElement {
                    tag: tag.to_string(),
                });
            }
        }
    }

    Ok(project)
}

fn variable_text_from_node(node: &XmlNode) -> VariableText {
    let value = |name: &str| node.child(name).and_then(|c| c.attr("Value"));
    VariableText {
        start: opt_num(value("Start")),
        end: opt_num(value("End")),
        current: opt_num(value("Current")),
        increment: opt_num(value("Increment")),
        auto_advance: opt_bool(value("AutoAdvance")),
    }
}

fn ui_prefs_from_node(node: &XmlNode) -> UiPrefs {
    UiPrefs {
        prefs: node
            .children
            .iter()
            .map(|c| {
                (
                    c.name.clone(),
                    c.attr("Value").unwrap_or_default().to_string(),
                )
            })
            .collect(),
    }
}

fn cut_setting_from_node(node: &XmlNode) -> CutSetting {
    let value = |name: &str| node.child(name).and_then(|c| c.attr("Value"));
    CutSetting {
        mode: CutMode::parse(node.attr("type").unwrap_or("Cut")),
        index: opt_int(value("index")),
        name: value("name").map(str::to_string),
        priority: opt_int(value("priority")),
        min_power: opt_num(value("minPower")),
        max_power: opt_num(value("maxPower")),
        min_power2: opt_num(value("minPower2")),
        max_power2: opt_num(value("maxPower2")),
        speed: opt_num(value("speed")),
        kerf: opt_num(value("kerf")),
        z_offset: opt_num(value("zOffset")),
        enable_power_ramp: opt_bool(value("enablePowerRamp")),
        ramp_length: opt_num(value("rampLength")),
        num_passes: opt_int(value("numPasses")),
        z_per_pass: opt_num(value("zPerPass")),
        perforate: opt_bool(value("perforate")),
        dot_mode: opt_bool(value("dotMode")),
        scan_opt: value("scanOpt").map(str::to_string),
        interval: opt_num(value("interval")),
        angle: opt_num(value("angle")),
        over_scanning: opt_num(value("overScanning")),
        line_angle: opt_num(value("lineAngle")),
        cross_hatch: opt_bool(value("crossHatch")),
        frequency: opt_num(value("frequency")),
        pulse_width: opt_num(value("pulseWidth")),
    }
}

/// XForm, CutIndex, and Locked, shared by every shape kind.
fn read_common(node: &XmlNode) -> (Mat, Option<i32>, Option<bool>) {
    let xform = node
        .child("XForm")
        .map(|x| {
            let nums: Vec<f64> = x
                .text
                .split_whitespace()
                .filter_map(|t| t.parse().ok())
                .collect();
            if nums.len() == 6 {
                Mat::from_array([nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]])
            } else {
                Mat::identity()
            }
        })
        .unwrap_or_default();
    (xform, opt_int(node.attr("CutIndex")), opt_bool(node.attr("Locked")))
}

fn shape_from_node(node: &XmlNode, ctx: &mut ParseContext) -> Result<Shape, ProjectError> {
    let kind = node.attr("Type").ok_or(ProjectError::MissingShapeType)?;
    let (xform, cut_index, locked) = read_common(node);
    match kind {
        "Rect" => Ok(Shape::Rect(Rect {
            xform,
            cut_index,
            locked,
            w: num_or(node.attr("W"), 0.0),
            h: num_or(node.attr("H"), 0.0),
            cr: num_or(node.attr("Cr"), 0.0),
        })),
        "Ellipse" => Ok(Shape::Ellipse(Ellipse {
            xform,
            cut_index,
            locked,
            rx: num_or(node.attr("Rx"), 0.0),
            ry: num_or(node.attr("Ry"), 0.0),
        })),
        "Path" => Ok(Shape::Path(path_from_node(node, ctx))),
        "Group" => {
            let mut children = Vec::new();
            // Children may sit under a wrapper element or directly on the
            // group node.
            let child_nodes: Vec<&XmlNode> = match node.child("Children") {
                Some(wrapper) => wrapper.children_named("Shape").collect(),
                None => node.children_named("Shape").collect(),
            };
            for child in child_nodes {
                children.push(shape_from_node(child, ctx)?);
            }
            Ok(Shape::Group(Group {
                xform,
                cut_index,
                locked,
                children,
            }))
        }
        "Bitmap" => {
            let data = node
                .child("Data")
                .map(|d| {
                    d.attr("Source")
                        .map(str::to_string)
                        .unwrap_or_else(|| d.text.clone())
                })
                .unwrap_or_default();
            Ok(Shape::Bitmap(Bitmap {
                xform,
                cut_index,
                locked,
                w: num_or(node.attr("W"), 0.0),
                h: num_or(node.attr("H"), 0.0),
                data,
            }))
        }
        "Text" => {
            let backup_path = node
                .child("BackupPath")
                .map(|bp| Box::new(path_from_node(bp, ctx)));
            Ok(Shape::Text(TextShape {
                xform,
                cut_index,
                locked,
                text: node.attr("Text").unwrap_or_default().to_string(),
                font: node.attr("Font").map(str::to_string),
                backup_path,
            }))
        }
        other => Err(ProjectError::UnknownShapeType {
            kind: other.to_string(),
        }),
    }
}

fn path_from_node(node: &XmlNode, ctx: &mut ParseContext) -> PathShape {
    let (xform, cut_index, locked) = read_common(node);
    let vert_id = opt_int(node.attr("VertID"));
    let prim_id = opt_int(node.attr("PrimID"));

    let verts = read_verts(node);

    let geometry = if verts.is_empty() {
        match (vert_id, prim_id) {
            (Some(v), Some(p)) => match ctx.templates.resolve(v, p) {
                Some(geometry) => geometry,
                None => {
                    ctx.log.push(format!(
                        "path references unknown geometry template VertID={v} PrimID={p}"
                    ));
                    PathGeometry::default()
                }
            },
            _ => PathGeometry::default(),
        }
    } else {
        let decode = read_prims(node, verts.len());
        let (prims, is_closed) = match decode {
            Some(d) => {
                let closed = d.is_closed.unwrap_or(true);
                (d.prims, closed)
            }
            None => (codec::synthesize_prims(verts.len(), prim_id), true),
        };
        let geometry = PathGeometry {
            verts,
            prims,
            is_closed,
        };
        if let (Some(v), Some(p)) = (vert_id, prim_id) {
            ctx.templates.register(v, p, &geometry);
        }
        geometry
    };

    PathShape {
        xform,
        cut_index,
        locked,
        geometry,
    }
}

/// Vertices from either the encoded `VertList` text or structured `Vert`
/// child elements (the older format).
fn read_verts(node: &XmlNode) -> Vec<Vert> {
    if let Some(list) = node.child("VertList") {
        let encoded = if list.text.is_empty() {
            node.attr("VertList").unwrap_or_default()
        } else {
            &list.text
        };
        if !encoded.is_empty() {
            return codec::parse_vert_list(encoded);
        }
    } else if let Some(encoded) = node.attr("VertList") {
        return codec::parse_vert_list(encoded);
    }

    node.children_named("Vert")
        .map(|v| {
            let mut vert = Vert::new(num_or(v.attr("x"), 0.0), num_or(v.attr("y"), 0.0));
            vert.corner = opt_int(v.attr("c")).and_then(|c| u32::try_from(c).ok());
            if let (Some(hx), Some(hy)) = (opt_num(v.attr("c0x")), opt_num(v.attr("c0y"))) {
                vert.out_handle = Some(Point::new(hx, hy));
            }
            if let (Some(hx), Some(hy)) = (opt_num(v.attr("c1x")), opt_num(v.attr("c1y"))) {
                vert.in_handle = Some(Point::new(hx, hy));
            }
            vert
        })
        .collect()
}

/// Primitives from the encoded `PrimList` text, structured `Prim` children,
/// or `None` when the shape carries neither.
fn read_prims(node: &XmlNode, vert_count: usize) -> Option<codec::PrimListDecode> {
    if let Some(list) = node.child("PrimList") {
        let encoded = if list.text.is_empty() {
            node.attr("PrimList").unwrap_or_default()
        } else {
            &list.text
        };
        if !encoded.is_empty() {
            return Some(codec::parse_prim_list(encoded, vert_count));
        }
    } else if let Some(encoded) = node.attr("PrimList") {
        return Some(codec::parse_prim_list(encoded, vert_count));
    }

    let structured: Vec<_> = node.children_named("Prim").collect();
    if !structured.is_empty() {
        let prims = structured
            .iter()
            .map(|p| match p.attr("type") {
                Some("B") | Some("Bezier") => crate::types::Prim::BezierTo,
                Some("M") | Some("Move") => crate::types::Prim::MoveTo,
                _ => crate::types::Prim::LineTo,
            })
            .collect();
        return Some(codec::PrimListDecode {
            prims,
            is_closed: opt_bool(node.attr("Closed")),
        });
    }

    None
}
