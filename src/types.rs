//! Typed scene model for LBRN2 project files.

use crate::geom::{Mat, Point};

/// Path vertex with optional bezier handles.
///
/// `out_handle` is the control point leaving this vertex (start of a curved
/// segment), `in_handle` the control point arriving at it. A handle is a
/// real coordinate only when both of its components were present in the
/// encoded form; an x-marker alone is the "no handle" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vert {
    pub x: f64,
    pub y: f64,
    /// Corner-smoothness flag as written by the authoring tool.
    pub corner: Option<u32>,
    pub out_handle: Option<Point>,
    pub in_handle: Option<Point>,
}

impl Vert {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Typed connector between consecutive vertices.
///
/// The primitive at index `i` describes the segment from vertex `i` to
/// vertex `i + 1` (wrapping to the subpath start on close). `MoveTo`
/// breaks continuity without drawing, starting a new subpath.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prim {
    LineTo,
    BezierTo,
    MoveTo,
}

/// Vertex/primitive array pair of a path shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathGeometry {
    pub verts: Vec<Vert>,
    pub prims: Vec<Prim>,
    pub is_closed: bool,
}

/// Rectangle shape, origin at its lower-left corner in local space.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub xform: Mat,
    pub cut_index: Option<i32>,
    pub locked: Option<bool>,
    pub w: f64,
    pub h: f64,
    /// Corner radius.
    pub cr: f64,
}

/// Ellipse shape, centered on the local origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub xform: Mat,
    pub cut_index: Option<i32>,
    pub locked: Option<bool>,
    pub rx: f64,
    pub ry: f64,
}

/// Free-form path shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    pub xform: Mat,
    pub cut_index: Option<i32>,
    pub locked: Option<bool>,
    pub geometry: PathGeometry,
}

/// Group of child shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub xform: Mat,
    pub cut_index: Option<i32>,
    pub locked: Option<bool>,
    pub children: Vec<Shape>,
}

/// Bitmap shape; the payload is the base64 image data, passed through
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub xform: Mat,
    pub cut_index: Option<i32>,
    pub locked: Option<bool>,
    pub w: f64,
    pub h: f64,
    pub data: String,
}

/// Text shape. `backup_path` is the pre-shaped outline LightBurn stores so
/// a file renders without the font installed.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub xform: Mat,
    pub cut_index: Option<i32>,
    pub locked: Option<bool>,
    pub text: String,
    pub font: Option<String>,
    pub backup_path: Option<Box<PathShape>>,
}

/// All shape kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Ellipse(Ellipse),
    Path(PathShape),
    Group(Group),
    Bitmap(Bitmap),
    Text(TextShape),
}

impl Shape {
    pub fn xform(&self) -> &Mat {
        match self {
            Shape::Rect(s) => &s.xform,
            Shape::Ellipse(s) => &s.xform,
            Shape::Path(s) => &s.xform,
            Shape::Group(s) => &s.xform,
            Shape::Bitmap(s) => &s.xform,
            Shape::Text(s) => &s.xform,
        }
    }

    pub fn xform_mut(&mut self) -> &mut Mat {
        match self {
            Shape::Rect(s) => &mut s.xform,
            Shape::Ellipse(s) => &mut s.xform,
            Shape::Path(s) => &mut s.xform,
            Shape::Group(s) => &mut s.xform,
            Shape::Bitmap(s) => &mut s.xform,
            Shape::Text(s) => &mut s.xform,
        }
    }

    pub fn cut_index(&self) -> Option<i32> {
        match self {
            Shape::Rect(s) => s.cut_index,
            Shape::Ellipse(s) => s.cut_index,
            Shape::Path(s) => s.cut_index,
            Shape::Group(s) => s.cut_index,
            Shape::Bitmap(s) => s.cut_index,
            Shape::Text(s) => s.cut_index,
        }
    }

    pub fn locked(&self) -> Option<bool> {
        match self {
            Shape::Rect(s) => s.locked,
            Shape::Ellipse(s) => s.locked,
            Shape::Path(s) => s.locked,
            Shape::Group(s) => s.locked,
            Shape::Bitmap(s) => s.locked,
            Shape::Text(s) => s.locked,
        }
    }
}

/// Laser operation mode of a cut setting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CutMode {
    #[default]
    Cut,
    Scan,
    ScanCut,
    /// Unrecognized mode string, preserved verbatim for roundtrip.
    Other(String),
}

impl CutMode {
    pub fn parse(s: &str) -> Self {
        match s {
            "Cut" => CutMode::Cut,
            "Scan" => CutMode::Scan,
            "Scan+Cut" => CutMode::ScanCut,
            other => CutMode::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CutMode::Cut => "Cut",
            CutMode::Scan => "Scan",
            CutMode::ScanCut => "Scan+Cut",
            CutMode::Other(s) => s,
        }
    }

    /// Whether shapes on this setting get hatch fill in the preview.
    pub fn is_filled(&self) -> bool {
        matches!(self, CutMode::Scan | CutMode::ScanCut)
    }
}

/// Laser-parameter profile referenced by shapes via `cut_index`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CutSetting {
    pub mode: CutMode,
    pub index: Option<i32>,
    pub name: Option<String>,
    pub priority: Option<i32>,
    pub min_power: Option<f64>,
    pub max_power: Option<f64>,
    pub min_power2: Option<f64>,
    pub max_power2: Option<f64>,
    pub speed: Option<f64>,
    pub kerf: Option<f64>,
    pub z_offset: Option<f64>,
    pub enable_power_ramp: Option<bool>,
    pub ramp_length: Option<f64>,
    pub num_passes: Option<i32>,
    pub z_per_pass: Option<f64>,
    pub perforate: Option<bool>,
    pub dot_mode: Option<bool>,
    pub scan_opt: Option<String>,
    /// Fill line spacing in mm.
    pub interval: Option<f64>,
    /// Fill angle in degrees.
    pub angle: Option<f64>,
    pub over_scanning: Option<f64>,
    pub line_angle: Option<f64>,
    pub cross_hatch: Option<bool>,
    pub frequency: Option<f64>,
    pub pulse_width: Option<f64>,
}

/// Embedded preview image.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub source: String,
}

/// Serial-number / date variable text window.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VariableText {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub current: Option<f64>,
    pub increment: Option<f64>,
    pub auto_advance: Option<bool>,
}

/// Editor UI preferences, carried opaquely as `(tag, Value)` pairs so a
/// roundtrip preserves them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UiPrefs {
    pub prefs: Vec<(String, String)>,
}

/// Project notes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Notes {
    pub show_on_load: Option<bool>,
    pub text: Option<String>,
}

/// Parsed LBRN2 project.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Project {
    pub app_version: Option<String>,
    pub format_version: Option<String>,
    pub material_height: Option<f64>,
    pub mirror_x: Option<bool>,
    pub mirror_y: Option<bool>,
    pub thumbnail: Option<Thumbnail>,
    pub variable_text: Option<VariableText>,
    pub ui_prefs: Option<UiPrefs>,
    pub cut_settings: Vec<CutSetting>,
    pub shapes: Vec<Shape>,
    pub notes: Option<Notes>,
}
