//! LBRN2 document encoding.
//!
//! Output matches what the authoring tool itself writes: 4-space
//! indentation, `True`/`False` booleans, a fixed child order, and the
//! fixed-point form for very small magnitudes that would otherwise print
//! in scientific notation.

use crate::codec::{encode_prim_list, encode_vert_list};
use crate::types::{
    Bitmap, CutSetting, Ellipse, Group, Notes, PathShape, Project, Rect, Shape, TextShape,
    VariableText,
};

/// Format a number the way LBRN2 files do. Magnitudes below 0.001 would
/// print as `1e-5` via `Display`, which the format does not use; those get
/// nine fixed decimals with trailing zeros trimmed.
pub fn fmt_value(v: f64) -> String {
    if v != 0.0 && v.abs() < 0.001 {
        let s = format!("{v:.9}");
        let s = s.trim_end_matches('0');
        s.trim_end_matches('.').to_string()
    } else {
        format!("{v}")
    }
}

fn fmt_bool(v: bool) -> &'static str {
    if v { "True" } else { "False" }
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

struct Writer {
    out: String,
    depth: usize,
}

impl Writer {
    fn line(&mut self, s: &str) {
        for _ in 0..self.depth {
            self.out.push_str("    ");
        }
        self.out.push_str(s);
        self.out.push('\n');
    }
}

/// Serialize a project back into LBRN2 XML.
pub fn write_project(project: &Project) -> String {
    let mut w = Writer {
        out: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"),
        depth: 0,
    };

    let mut attrs = String::new();
    if let Some(v) = &project.app_version {
        attrs.push_str(&format!(" AppVersion=\"{}\"", escape_attr(v)));
    }
    if let Some(v) = &project.format_version {
        attrs.push_str(&format!(" FormatVersion=\"{}\"", escape_attr(v)));
    }
    if let Some(v) = project.material_height {
        attrs.push_str(&format!(" MaterialHeight=\"{}\"", fmt_value(v)));
    }
    if let Some(v) = project.mirror_x {
        attrs.push_str(&format!(" MirrorX=\"{}\"", fmt_bool(v)));
    }
    if let Some(v) = project.mirror_y {
        attrs.push_str(&format!(" MirrorY=\"{}\"", fmt_bool(v)));
    }
    w.line(&format!("<LightBurnProject{attrs}>"));
    w.depth += 1;

    if let Some(thumb) = &project.thumbnail {
        w.line(&format!(
            "<Thumbnail Source=\"{}\"/>",
            escape_attr(&thumb.source)
        ));
    }
    if let Some(vt) = &project.variable_text {
        write_variable_text(&mut w, vt);
    }
    if let Some(prefs) = &project.ui_prefs {
        w.line("<UIPrefs>");
        w.depth += 1;
        for (tag, value) in &prefs.prefs {
            w.line(&format!("<{tag} Value=\"{}\"/>", escape_attr(value)));
        }
        w.depth -= 1;
        w.line("</UIPrefs>");
    }
    for cut in &project.cut_settings {
        write_cut_setting(&mut w, cut);
    }
    for shape in &project.shapes {
        write_shape(&mut w, shape);
    }
    if let Some(notes) = &project.notes {
        write_notes(&mut w, notes);
    }

    w.depth -= 1;
    w.line("</LightBurnProject>");
    w.out
}

fn write_variable_text(w: &mut Writer, vt: &VariableText) {
    w.line("<VariableText>");
    w.depth += 1;
    if let Some(v) = vt.start {
        w.line(&format!("<Start Value=\"{}\"/>", fmt_value(v)));
    }
    if let Some(v) = vt.end {
        w.line(&format!("<End Value=\"{}\"/>", fmt_value(v)));
    }
    if let Some(v) = vt.current {
        w.line(&format!("<Current Value=\"{}\"/>", fmt_value(v)));
    }
    if let Some(v) = vt.increment {
        w.line(&format!("<Increment Value=\"{}\"/>", fmt_value(v)));
    }
    if let Some(v) = vt.auto_advance {
        w.line(&format!("<AutoAdvance Value=\"{}\"/>", v as i32));
    }
    w.depth -= 1;
    w.line("</VariableText>");
}

fn write_notes(w: &mut Writer, notes: &Notes) {
    let mut attrs = String::new();
    if let Some(v) = notes.show_on_load {
        attrs.push_str(&format!(" ShowOnLoad=\"{}\"", v as i32));
    }
    if let Some(text) = &notes.text {
        attrs.push_str(&format!(" Notes=\"{}\"", escape_attr(text)));
    }
    w.line(&format!("<Notes{attrs}/>"));
}

fn write_cut_setting(w: &mut Writer, cut: &CutSetting) {
    w.line(&format!("<CutSetting type=\"{}\">", escape_attr(cut.mode.as_str())));
    w.depth += 1;

    let num = |tag: &str, v: Option<f64>, w: &mut Writer| {
        if let Some(v) = v {
            w.line(&format!("<{tag} Value=\"{}\"/>", fmt_value(v)));
        }
    };
    let int = |tag: &str, v: Option<i32>, w: &mut Writer| {
        if let Some(v) = v {
            w.line(&format!("<{tag} Value=\"{v}\"/>"));
        }
    };
    let flag = |tag: &str, v: Option<bool>, w: &mut Writer| {
        if let Some(v) = v {
            w.line(&format!("<{tag} Value=\"{}\"/>", v as i32));
        }
    };

    int("index", cut.index, w);
    if let Some(name) = &cut.name {
        w.line(&format!("<name Value=\"{}\"/>", escape_attr(name)));
    }
    int("priority", cut.priority, w);
    num("minPower", cut.min_power, w);
    num("maxPower", cut.max_power, w);
    num("minPower2", cut.min_power2, w);
    num("maxPower2", cut.max_power2, w);
    num("speed", cut.speed, w);
    num("kerf", cut.kerf, w);
    num("zOffset", cut.z_offset, w);
    flag("enablePowerRamp", cut.enable_power_ramp, w);
    num("rampLength", cut.ramp_length, w);
    int("numPasses", cut.num_passes, w);
    num("zPerPass", cut.z_per_pass, w);
    flag("perforate", cut.perforate, w);
    flag("dotMode", cut.dot_mode, w);
    if let Some(scan_opt) = &cut.scan_opt {
        w.line(&format!("<scanOpt Value=\"{}\"/>", escape_attr(scan_opt)));
    }
    num("interval", cut.interval, w);
    num("angle", cut.angle, w);
    num("overScanning", cut.over_scanning, w);
    num("lineAngle", cut.line_angle, w);
    flag("crossHatch", cut.cross_hatch, w);
    num("frequency", cut.frequency, w);
    num("pulseWidth", cut.pulse_width, w);

    w.depth -= 1;
    w.line("</CutSetting>");
}

fn common_attrs(
    cut_index: Option<i32>,
    locked: Option<bool>,
) -> String {
    let mut attrs = String::new();
    if let Some(v) = cut_index {
        attrs.push_str(&format!(" CutIndex=\"{v}\""));
    }
    if let Some(v) = locked {
        attrs.push_str(&format!(" Locked=\"{}\"", v as i32));
    }
    attrs
}

fn write_xform(w: &mut Writer, m: &crate::geom::Mat) {
    w.line(&format!(
        "<XForm>{} {} {} {} {} {}</XForm>",
        fmt_value(m.a),
        fmt_value(m.b),
        fmt_value(m.c),
        fmt_value(m.d),
        fmt_value(m.tx),
        fmt_value(m.ty)
    ));
}

fn write_shape(w: &mut Writer, shape: &Shape) {
    match shape {
        Shape::Rect(s) => write_rect(w, s),
        Shape::Ellipse(s) => write_ellipse(w, s),
        Shape::Path(s) => write_path(w, s, "Shape"),
        Shape::Group(s) => write_group(w, s),
        Shape::Bitmap(s) => write_bitmap(w, s),
        Shape::Text(s) => write_text(w, s),
    }
}

fn write_rect(w: &mut Writer, s: &Rect) {
    w.line(&format!(
        "<Shape Type=\"Rect\"{} W=\"{}\" H=\"{}\" Cr=\"{}\">",
        common_attrs(s.cut_index, s.locked),
        fmt_value(s.w),
        fmt_value(s.h),
        fmt_value(s.cr)
    ));
    w.depth += 1;
    write_xform(w, &s.xform);
    w.depth -= 1;
    w.line("</Shape>");
}

fn write_ellipse(w: &mut Writer, s: &Ellipse) {
    w.line(&format!(
        "<Shape Type=\"Ellipse\"{} Rx=\"{}\" Ry=\"{}\">",
        common_attrs(s.cut_index, s.locked),
        fmt_value(s.rx),
        fmt_value(s.ry)
    ));
    w.depth += 1;
    write_xform(w, &s.xform);
    w.depth -= 1;
    w.line("</Shape>");
}

fn write_path(w: &mut Writer, s: &PathShape, tag: &str) {
    w.line(&format!(
        "<{tag} Type=\"Path\"{}>",
        common_attrs(s.cut_index, s.locked)
    ));
    w.depth += 1;
    write_xform(w, &s.xform);
    w.line(&format!(
        "<VertList>{}</VertList>",
        encode_vert_list(&s.geometry.verts)
    ));
    w.line(&format!(
        "<PrimList>{}</PrimList>",
        encode_prim_list(&s.geometry)
    ));
    w.depth -= 1;
    w.line(&format!("</{tag}>"));
}

fn write_group(w: &mut Writer, s: &Group) {
    w.line(&format!(
        "<Shape Type=\"Group\"{}>",
        common_attrs(s.cut_index, s.locked)
    ));
    w.depth += 1;
    write_xform(w, &s.xform);
    w.line("<Children>");
    w.depth += 1;
    for child in &s.children {
        write_shape(w, child);
    }
    w.depth -= 1;
    w.line("</Children>");
    w.depth -= 1;
    w.line("</Shape>");
}

fn write_bitmap(w: &mut Writer, s: &Bitmap) {
    w.line(&format!(
        "<Shape Type=\"Bitmap\"{} W=\"{}\" H=\"{}\">",
        common_attrs(s.cut_index, s.locked),
        fmt_value(s.w),
        fmt_value(s.h)
    ));
    w.depth += 1;
    write_xform(w, &s.xform);
    w.line(&format!("<Data Source=\"{}\"/>", escape_attr(&s.data)));
    w.depth -= 1;
    w.line("</Shape>");
}

fn write_text(w: &mut Writer, s: &TextShape) {
    let mut attrs = format!(
        "<Shape Type=\"Text\"{} Text=\"{}\"",
        common_attrs(s.cut_index, s.locked),
        escape_attr(&s.text)
    );
    if let Some(font) = &s.font {
        attrs.push_str(&format!(" Font=\"{}\"", escape_attr(font)));
    }
    if s.backup_path.is_some() {
        attrs.push_str(" HasBackupPath=\"1\"");
    }
    attrs.push('>');
    w.line(&attrs);
    w.depth += 1;
    write_xform(w, &s.xform);
    if let Some(backup) = &s.backup_path {
        write_path(w, backup, "BackupPath");
    }
    w.depth -= 1;
    w.line("</Shape>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Mat;
    use crate::types::{CutMode, PathGeometry, Prim, Vert};

    #[test]
    fn small_magnitudes_avoid_scientific_notation() {
        assert_eq!(fmt_value(0.00001), "0.00001");
        assert_eq!(fmt_value(-0.000025), "-0.000025");
        assert_eq!(fmt_value(0.0), "0");
        assert_eq!(fmt_value(12.5), "12.5");
        assert_eq!(fmt_value(0.001), "0.001");
    }

    #[test]
    fn writes_declaration_and_child_order() {
        let project = Project {
            app_version: Some("1.4.03".to_string()),
            mirror_x: Some(false),
            cut_settings: vec![CutSetting {
                mode: CutMode::Scan,
                index: Some(0),
                interval: Some(0.1),
                ..Default::default()
            }],
            shapes: vec![Shape::Rect(Rect {
                xform: Mat::from_array([1.0, 0.0, 0.0, 1.0, 50.0, 40.0]),
                cut_index: Some(0),
                locked: None,
                w: 30.0,
                h: 20.0,
                cr: 0.0,
            })],
            notes: Some(Notes {
                show_on_load: Some(true),
                text: Some("a < b".to_string()),
            }),
            ..Default::default()
        };
        let xml = write_project(&project);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xml.contains("<LightBurnProject AppVersion=\"1.4.03\" MirrorX=\"False\">"));
        assert!(xml.contains("<CutSetting type=\"Scan\">"));
        assert!(xml.contains("        <index Value=\"0\"/>"));
        assert!(xml.contains("<Shape Type=\"Rect\" CutIndex=\"0\" W=\"30\" H=\"20\" Cr=\"0\">"));
        assert!(xml.contains("<XForm>1 0 0 1 50 40</XForm>"));
        assert!(xml.contains("<Notes ShowOnLoad=\"1\" Notes=\"a &lt; b\"/>"));
        // CutSetting precedes Shape, Notes come last.
        let cut_at = xml.find("<CutSetting").unwrap();
        let shape_at = xml.find("<Shape").unwrap();
        let notes_at = xml.find("<Notes").unwrap();
        assert!(cut_at < shape_at && shape_at < notes_at);
    }

    #[test]
    fn path_roundtrips_through_writer_and_parser() {
        let geometry = PathGeometry {
            verts: vec![
                Vert::new(0.0, 0.0),
                Vert::new(10.0, 0.0),
                Vert::new(10.0, 10.0),
                Vert::new(0.0, 10.0),
            ],
            prims: vec![Prim::LineTo; 4],
            is_closed: true,
        };
        let project = Project {
            shapes: vec![Shape::Path(PathShape {
                xform: Mat::identity(),
                cut_index: None,
                locked: None,
                geometry: geometry.clone(),
            })],
            ..Default::default()
        };
        let xml = write_project(&project);
        let mut log = Vec::new();
        let back = crate::parser::parse_project(&xml, &mut log).expect("reparse");
        assert!(log.is_empty());
        let Shape::Path(path) = &back.shapes[0] else {
            panic!("expected path");
        };
        assert_eq!(path.geometry, geometry);
    }

    #[test]
    fn group_nests_children_under_wrapper() {
        let project = Project {
            shapes: vec![Shape::Group(Group {
                xform: Mat::identity(),
                cut_index: None,
                locked: None,
                children: vec![Shape::Ellipse(Ellipse {
                    xform: Mat::identity(),
                    cut_index: None,
                    locked: None,
                    rx: 5.0,
                    ry: 5.0,
                })],
            })],
            ..Default::default()
        };
        let xml = write_project(&project);
        assert!(xml.contains("<Children>"));
        assert!(xml.contains("<Shape Type=\"Ellipse\" Rx=\"5\" Ry=\"5\">"));
    }
}
