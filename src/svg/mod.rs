//! SVG preview generation.
//!
//! The pipeline: collect the scene's shapes and cut settings, measure the
//! scene box, compute the canvas layout, render each shape, and assemble
//! the root document with its background and y-flip group.

pub mod fill;
pub mod layout;
pub mod node;
pub mod palette;
pub mod path_data;
pub mod render;

use std::collections::HashMap;

use crate::bounds::scene_bbox;
use crate::types::{CutSetting, Project};

pub use layout::{Layout, SvgOptions, compute_layout};
pub use node::SvgNode;
pub use render::{RenderCtx, render_all};

/// Cut settings keyed by their layer index. A setting without an index is
/// unreferenceable and dropped.
pub fn collect_cut_settings(project: &Project) -> HashMap<i32, CutSetting> {
    project
        .cut_settings
        .iter()
        .filter_map(|c| c.index.map(|i| (i, c.clone())))
        .collect()
}

/// Root document: canvas attributes, pattern definitions, white background
/// over the view window, and one flip group holding the rendered shapes.
pub fn assemble(children: Vec<SvgNode>, defs: Vec<SvgNode>, layout: &Layout) -> SvgNode {
    let mut root = SvgNode::new("svg")
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("width", format!("{}", layout.width))
        .attr("height", format!("{}", layout.height))
        .attr("viewBox", layout.view_box.clone())
        .attr("style", "background-color: white;");
    if !defs.is_empty() {
        root = root.child(SvgNode::new("defs").children(defs));
    }
    root.child(node::leaf(
            "rect",
            &[
                ("x", &format!("{}", layout.bg.x)),
                ("y", &format!("{}", layout.bg.y)),
                ("width", &format!("{}", layout.bg.width)),
                ("height", &format!("{}", layout.bg.height)),
                ("fill", "white"),
            ],
        ))
        .child(
            node::g(&[(
                "transform",
                &format!("matrix(1 0 0 -1 0 {})", layout.flip_y),
            )])
            .children(children),
        )
}

/// Render a whole project to SVG markup.
pub fn project_to_svg(project: &Project, options: &SvgOptions) -> String {
    let cut_settings = collect_cut_settings(project);
    let bbox = scene_bbox(&project.shapes);
    let layout = compute_layout(bbox, options);
    let mut ctx = RenderCtx::new(&cut_settings, options);
    let nodes = render_all(&project.shapes, &mut ctx);
    assemble(nodes, ctx.into_defs(), &layout).render()
}
