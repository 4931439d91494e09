//! Shape outlines as SVG path-data strings.
//!
//! Every generator takes the matrix of the coordinate space the text should
//! land in and bakes it into the emitted coordinates, so compound paths can
//! combine shapes from different local spaces into one string.

use crate::geom::{Mat, Point};
use crate::types::{PathGeometry, Prim};

/// Control-point distance for a quarter-circle cubic approximation.
const KAPPA: f64 = 0.5522847498;

/// Path data for path geometry.
///
/// Primitive `i` runs from vertex `i` to vertex `i + 1` (wrapping at the
/// end). A bezier takes its first control point from the start vertex's
/// outgoing handle and its second from the end vertex's incoming handle,
/// each falling back to the vertex position itself. A move primitive hops
/// to a new subpath, closing the previous one first when the path as a
/// whole is closed.
///
/// A closed loop decoded from the compact encoding keeps its wrap
/// primitive, so a final straight segment back to the subpath start would
/// duplicate the close that `Z` already draws; that segment is folded into
/// the `Z`. A curved wrap is still emitted, since `Z` closes with a line.
pub fn path_to_path_data(geometry: &PathGeometry, matrix: &Mat) -> String {
    let verts = &geometry.verts;
    if verts.is_empty() {
        return String::new();
    }

    let mut d = String::new();
    for (i, prim) in geometry.prims.iter().enumerate() {
        let Some(start) = verts.get(i).copied() else {
            break;
        };
        let end = verts[(i + 1) % verts.len()];

        if i == 0 {
            let p = matrix.apply(start.position());
            d.push_str(&format!("M {} {}", p.x, p.y));
        }

        match prim {
            Prim::LineTo => {
                if geometry.is_closed && i + 1 == verts.len() {
                    continue;
                }
                let p = matrix.apply(end.position());
                d.push_str(&format!(" L {} {}", p.x, p.y));
            }
            Prim::BezierTo => {
                let c0 = matrix.apply(start.out_handle.unwrap_or_else(|| start.position()));
                let c1 = matrix.apply(end.in_handle.unwrap_or_else(|| end.position()));
                let p = matrix.apply(end.position());
                d.push_str(&format!(
                    " C {} {} {} {} {} {}",
                    c0.x, c0.y, c1.x, c1.y, p.x, p.y
                ));
            }
            Prim::MoveTo => {
                let p = matrix.apply(end.position());
                if geometry.is_closed {
                    d.push_str(&format!(" Z M {} {}", p.x, p.y));
                } else {
                    d.push_str(&format!(" M {} {}", p.x, p.y));
                }
            }
        }
    }

    if !d.is_empty() && geometry.is_closed {
        d.push_str(" Z");
    }
    d
}

/// Path data for a rectangle, with cubic corner arcs when a corner radius
/// is set. The radius is clamped to half the shorter side.
pub fn rect_to_path_data(w: f64, h: f64, cr: f64, matrix: &Mat) -> String {
    let at = |x: f64, y: f64| matrix.apply(Point::new(x, y));

    if cr > 0.0 {
        let r = cr.min(w / 2.0).min(h / 2.0);
        let k = r * KAPPA;

        let p0 = at(r, 0.0);
        let p1 = at(w - r, 0.0);
        let p2 = at(w, r);
        let p3 = at(w, h - r);
        let p4 = at(w - r, h);
        let p5 = at(r, h);
        let p6 = at(0.0, h - r);
        let p7 = at(0.0, r);

        let c_tr1 = at(w - r + k, 0.0);
        let c_tr2 = at(w, r - k);
        let c_br1 = at(w, h - r + k);
        let c_br2 = at(w - r + k, h);
        let c_bl1 = at(r - k, h);
        let c_bl2 = at(0.0, h - r + k);
        let c_tl1 = at(0.0, r - k);
        let c_tl2 = at(r - k, 0.0);

        return format!(
            "M {} {} L {} {} C {} {} {} {} {} {} L {} {} C {} {} {} {} {} {} \
             L {} {} C {} {} {} {} {} {} L {} {} C {} {} {} {} {} {} Z",
            p0.x, p0.y, p1.x, p1.y, c_tr1.x, c_tr1.y, c_tr2.x, c_tr2.y, p2.x, p2.y,
            p3.x, p3.y, c_br1.x, c_br1.y, c_br2.x, c_br2.y, p4.x, p4.y,
            p5.x, p5.y, c_bl1.x, c_bl1.y, c_bl2.x, c_bl2.y, p6.x, p6.y,
            p7.x, p7.y, c_tl1.x, c_tl1.y, c_tl2.x, c_tl2.y, p0.x, p0.y
        );
    }

    let p0 = at(0.0, 0.0);
    let p1 = at(w, 0.0);
    let p2 = at(w, h);
    let p3 = at(0.0, h);
    format!(
        "M {} {} L {} {} L {} {} L {} {} Z",
        p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
    )
}

/// Path data for an ellipse centered on the local origin, as four cubic
/// quadrant arcs.
pub fn ellipse_to_path_data(rx: f64, ry: f64, matrix: &Mat) -> String {
    let at = |x: f64, y: f64| matrix.apply(Point::new(x, y));
    let kx = rx * KAPPA;
    let ky = ry * KAPPA;

    let p0 = at(rx, 0.0);
    let p1 = at(0.0, ry);
    let p2 = at(-rx, 0.0);
    let p3 = at(0.0, -ry);

    let c01a = at(rx, ky);
    let c01b = at(kx, ry);
    let c12a = at(-kx, ry);
    let c12b = at(-rx, ky);
    let c23a = at(-rx, -ky);
    let c23b = at(-kx, -ry);
    let c30a = at(kx, -ry);
    let c30b = at(rx, -ky);

    format!(
        "M {} {} C {} {} {} {} {} {} C {} {} {} {} {} {} \
         C {} {} {} {} {} {} C {} {} {} {} {} {} Z",
        p0.x, p0.y, c01a.x, c01a.y, c01b.x, c01b.y, p1.x, p1.y,
        c12a.x, c12a.y, c12b.x, c12b.y, p2.x, p2.y,
        c23a.x, c23a.y, c23b.x, c23b.y, p3.x, p3.y,
        c30a.x, c30a.y, c30b.x, c30b.y, p0.x, p0.y
    )
}
