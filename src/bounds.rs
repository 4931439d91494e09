//! Bounding-box measurement over the scene graph.
//!
//! Each shape reports the box of its local-space extreme points mapped
//! through its own transform. Groups union their children's boxes without
//! applying the group transform, matching how the preview layout treats
//! group coordinates.

use crate::geom::{BBox, Mat, Point};
use crate::types::{Shape, TextShape};

/// Bounding box of one shape.
pub fn shape_bbox(shape: &Shape) -> BBox {
    match shape {
        Shape::Rect(s) => corners_bbox(&s.xform, s.w, s.h),
        Shape::Bitmap(s) => corners_bbox(&s.xform, s.w, s.h),
        Shape::Ellipse(s) => BBox::empty().add_points(
            [
                Point::new(s.rx, 0.0),
                Point::new(-s.rx, 0.0),
                Point::new(0.0, s.ry),
                Point::new(0.0, -s.ry),
            ]
            .map(|p| s.xform.apply(p)),
        ),
        Shape::Path(s) => BBox::empty().add_points(
            s.geometry
                .verts
                .iter()
                .map(|v| s.xform.apply(v.position())),
        ),
        Shape::Text(s) => text_bbox(s),
        Shape::Group(s) => s
            .children
            .iter()
            .fold(BBox::empty(), |acc, child| acc.union(&shape_bbox(child))),
    }
}

fn corners_bbox(xform: &Mat, w: f64, h: f64) -> BBox {
    BBox::empty().add_points(
        [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ]
        .map(|p| xform.apply(p)),
    )
}

/// A text shape is measured through its backup-path outline when one is
/// present; otherwise a nominal 100x50 placeholder box stands in, since
/// no font metrics are available.
fn text_bbox(s: &TextShape) -> BBox {
    match &s.backup_path {
        Some(backup) if !backup.geometry.verts.is_empty() => BBox::empty().add_points(
            backup
                .geometry
                .verts
                .iter()
                .map(|v| s.xform.apply(v.position())),
        ),
        _ => BBox::empty().add_points([
            s.xform.apply(Point::new(0.0, 0.0)),
            s.xform.apply(Point::new(100.0, 50.0)),
        ]),
    }
}

/// Bounding box of a whole scene.
pub fn scene_bbox(shapes: &[Shape]) -> BBox {
    shapes
        .iter()
        .fold(BBox::empty(), |acc, s| acc.union(&shape_bbox(s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Ellipse, Group, PathGeometry, PathShape, Prim, Rect, Vert};

    fn rect_at(tx: f64, ty: f64, w: f64, h: f64) -> Shape {
        Shape::Rect(Rect {
            xform: Mat::from_array([1.0, 0.0, 0.0, 1.0, tx, ty]),
            cut_index: None,
            locked: None,
            w,
            h,
            cr: 0.0,
        })
    }

    #[test]
    fn rect_box_is_transformed_corners() {
        let b = shape_bbox(&rect_at(50.0, 40.0, 30.0, 20.0));
        assert_eq!(b, BBox::new(50.0, 40.0, 80.0, 60.0));
    }

    #[test]
    fn ellipse_box_uses_axis_extremes() {
        let b = shape_bbox(&Shape::Ellipse(Ellipse {
            xform: Mat::from_array([1.0, 0.0, 0.0, 1.0, 10.0, 10.0]),
            cut_index: None,
            locked: None,
            rx: 4.0,
            ry: 2.0,
        }));
        assert_eq!(b, BBox::new(6.0, 8.0, 14.0, 12.0));
    }

    #[test]
    fn path_box_covers_vertices_only() {
        // Handles are ignored; only the anchor positions count.
        let b = shape_bbox(&Shape::Path(PathShape {
            xform: Mat::identity(),
            cut_index: None,
            locked: None,
            geometry: PathGeometry {
                verts: vec![Vert::new(-1.0, 2.0), Vert::new(7.0, -3.0)],
                prims: vec![Prim::LineTo],
                is_closed: false,
            },
        }));
        assert_eq!(b, BBox::new(-1.0, -3.0, 7.0, 2.0));
    }

    #[test]
    fn group_unions_children_without_its_own_transform() {
        let group = Shape::Group(Group {
            xform: Mat::from_array([1.0, 0.0, 0.0, 1.0, 1000.0, 1000.0]),
            cut_index: None,
            locked: None,
            children: vec![rect_at(0.0, 0.0, 10.0, 10.0), rect_at(20.0, 20.0, 10.0, 10.0)],
        });
        assert_eq!(shape_bbox(&group), BBox::new(0.0, 0.0, 30.0, 30.0));
    }

    #[test]
    fn empty_scene_has_empty_box() {
        assert!(scene_bbox(&[]).is_empty());
        let empty_group = Shape::Group(Group {
            xform: Mat::identity(),
            cut_index: None,
            locked: None,
            children: vec![],
        });
        assert!(shape_bbox(&empty_group).is_empty());
    }
}
