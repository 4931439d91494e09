//! # lbrn-tools
//!
//! A Rust library for working with LightBurn LBRN2 laser project files.
//!
//! ## Features
//!
//! - **LBRN2 parsing**: Decode project files into a typed scene graph,
//!   including the compact vertex/primitive path encoding and shared
//!   geometry templates
//! - **LBRN2 writing**: Re-emit a scene graph in the native file format
//! - **SVG preview**: Render a project to SVG with layer colors, hatch
//!   fill for scan layers, and compound-path hole support
//!
//! ## Example
//!
//! ```rust,ignore
//! use lbrn_tools::{parse_project, project_to_svg, SvgOptions};
//!
//! let content = std::fs::read_to_string("example.lbrn2").unwrap();
//! let mut warnings = Vec::new();
//! let project = parse_project(&content, &mut warnings).unwrap();
//! let svg = project_to_svg(&project, &SvgOptions::default());
//! std::fs::write("preview.svg", svg).unwrap();
//! ```

pub mod bounds;
pub mod codec;
pub mod coerce;
pub mod error;
pub mod geom;
pub mod parser;
pub mod svg;
pub mod types;
pub mod writer;
pub mod xml;

// Re-export commonly used items
pub use error::ProjectError;
pub use parser::parse_project;
pub use svg::{SvgOptions, project_to_svg};
pub use types::{Project, Shape};
pub use writer::write_project;
