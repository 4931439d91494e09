//! Compact textual codec for path geometry.
//!
//! LBRN2 stores path geometry as two mini-languages:
//!
//! - `VertList`: per-vertex tokens `V{x} {y}` followed by an optional
//!   corner flag `c{n}` and up to two handle pairs
//!   `c0x{v}c0y{v}` / `c1x{v}c1y{v}`. A handle component appearing alone
//!   (the literal `c0x1` with no `c0y`) is a "no handle" marker, not a
//!   1-unit coordinate.
//! - `PrimList`: either a compact token stream (`L0 1B1 2M2 3`), a bare
//!   line descriptor (`LineClosed` / `LineOpen`), or absent entirely, in
//!   which case primitives are synthesized from the vertex count and the
//!   numeric primitive-shape-id hint.
//!
//! Decoding is lenient throughout: a malformed token is skipped rather
//! than aborting the shape.

use std::collections::HashMap;

use crate::geom::Point;
use crate::types::{PathGeometry, Prim, Vert};

fn is_number_char(ch: char) -> bool {
    ch == '-' || ch == '+' || ch == '.' || ch == 'e' || ch == 'E' || ch.is_ascii_digit()
}

/// Consume one number token from `chars` starting at `*i`.
fn scan_number(chars: &[char], i: &mut usize) -> Option<f64> {
    let start = *i;
    while *i < chars.len() && is_number_char(chars[*i]) {
        *i += 1;
    }
    if *i == start {
        return None;
    }
    chars[start..*i].iter().collect::<String>().parse().ok()
}

fn skip_whitespace(chars: &[char], i: &mut usize) {
    while *i < chars.len() && chars[*i].is_whitespace() {
        *i += 1;
    }
}

/// Decode a `VertList` string into vertices.
pub fn parse_vert_list(encoded: &str) -> Vec<Vert> {
    let chars: Vec<char> = encoded.chars().collect();
    let mut verts = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != 'V' {
            i += 1;
            continue;
        }
        i += 1;

        skip_whitespace(&chars, &mut i);
        let x = scan_number(&chars, &mut i);
        skip_whitespace(&chars, &mut i);
        let y = scan_number(&chars, &mut i);

        let (Some(x), Some(y)) = (x, y) else {
            // Malformed vertex: resync at the next marker.
            continue;
        };

        let mut vert = Vert::new(x, y);
        let mut c0x = None;
        let mut c0y = None;
        let mut c1x = None;
        let mut c1y = None;

        // Sub-tokens run until the next vertex marker. The c0x/c1x
        // prefixes must be tried before the bare corner flag, since the
        // flag test would otherwise eat their leading "c0"/"c1".
        while i < chars.len() && chars[i] != 'V' {
            let rest = &chars[i..];
            if rest.starts_with(&['c', '0', 'x']) {
                i += 3;
                c0x = scan_number(&chars, &mut i);
            } else if rest.starts_with(&['c', '0', 'y']) {
                i += 3;
                c0y = scan_number(&chars, &mut i);
            } else if rest.starts_with(&['c', '1', 'x']) {
                i += 3;
                c1x = scan_number(&chars, &mut i);
            } else if rest.starts_with(&['c', '1', 'y']) {
                i += 3;
                c1y = scan_number(&chars, &mut i);
            } else if chars[i] == 'c'
                && i + 1 < chars.len()
                && chars[i + 1].is_ascii_digit()
            {
                i += 1;
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                vert.corner = chars[start..i].iter().collect::<String>().parse().ok();
            } else {
                i += 1;
            }
        }

        // A handle is real only when both components arrived.
        if let (Some(hx), Some(hy)) = (c0x, c0y) {
            vert.out_handle = Some(Point::new(hx, hy));
        }
        if let (Some(hx), Some(hy)) = (c1x, c1y) {
            vert.in_handle = Some(Point::new(hx, hy));
        }

        verts.push(vert);
    }

    verts
}

/// Encode vertices back into the `VertList` form. Handle pairs are emitted
/// only when both components are set.
pub fn encode_vert_list(verts: &[Vert]) -> String {
    let mut out = String::new();
    for v in verts {
        out.push_str(&format!("V{} {}", v.x, v.y));
        if let Some(c) = v.corner {
            out.push_str(&format!("c{c}"));
        }
        if let Some(h) = v.out_handle {
            out.push_str(&format!("c0x{}c0y{}", h.x, h.y));
        }
        if let Some(h) = v.in_handle {
            out.push_str(&format!("c1x{}c1y{}", h.x, h.y));
        }
    }
    out
}

/// Result of decoding a `PrimList` string.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimListDecode {
    pub prims: Vec<Prim>,
    /// `Some` when the encoding itself decides closedness (the line
    /// descriptor keyword, or a wrap in the compact stream), `None` when
    /// the caller's default applies.
    pub is_closed: Option<bool>,
}

/// Decode a `PrimList` string.
///
/// Tries the compact token stream first, then the bare line descriptor.
/// The from/to indices in the compact form are positional restatements of
/// array order and are not trusted for connectivity; the only information
/// taken from them is the wrap signal (a to-index smaller than its
/// from-index), which marks the path as closed.
pub fn parse_prim_list(encoded: &str, vert_count: usize) -> PrimListDecode {
    let trimmed = encoded.trim();

    if looks_like_compact_prims(trimmed) {
        let chars: Vec<char> = trimmed.chars().collect();
        let mut prims = Vec::new();
        let mut saw_wrap = false;
        let mut i = 0;
        while i < chars.len() {
            skip_whitespace(&chars, &mut i);
            if i >= chars.len() {
                break;
            }
            let kind = match chars[i] {
                'L' => Some(Prim::LineTo),
                'B' => Some(Prim::BezierTo),
                'M' => Some(Prim::MoveTo),
                _ => None,
            };
            i += 1;
            let Some(kind) = kind else { continue };

            skip_whitespace(&chars, &mut i);
            let from = scan_number(&chars, &mut i);
            skip_whitespace(&chars, &mut i);
            let to = scan_number(&chars, &mut i);
            let (Some(from), Some(to)) = (from, to) else {
                continue;
            };
            if to < from {
                saw_wrap = true;
            }
            prims.push(kind);
        }
        return PrimListDecode {
            prims,
            is_closed: Some(saw_wrap),
        };
    }

    if trimmed.contains("Line") {
        let is_open = trimmed.contains("Open");
        let count = if is_open {
            vert_count.saturating_sub(1)
        } else {
            vert_count
        };
        return PrimListDecode {
            prims: vec![Prim::LineTo; count],
            is_closed: Some(!is_open),
        };
    }

    PrimListDecode {
        prims: Vec::new(),
        is_closed: None,
    }
}

/// The compact stream starts with a kind letter immediately followed by a
/// digit ("L0 1…"), which distinguishes it from "LineClosed".
fn looks_like_compact_prims(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('L' | 'B' | 'M'), Some(d)) if d.is_ascii_digit()
    )
}

/// Synthesize primitives when a shape carries vertices but no `PrimList`.
///
/// The primitive-shape-id hint 2 with exactly 8 vertices is the rounded
/// rectangle emitted by the authoring tool: alternating Line/Bezier
/// segments around the four corners. Every other id falls back to
/// all-Line; generalizing the heuristic to other ids would be guesswork.
pub fn synthesize_prims(vert_count: usize, prim_id: Option<i32>) -> Vec<Prim> {
    if prim_id == Some(2) && vert_count == 8 {
        return (0..8)
            .map(|i| if i % 2 == 0 { Prim::LineTo } else { Prim::BezierTo })
            .collect();
    }
    vec![Prim::LineTo; vert_count]
}

/// Encode primitives into the compact `PrimList` form.
///
/// The from-index of each token is its position; the to-index is the next
/// position, except at a subpath boundary where a closed path wraps to the
/// start of the current subpath. Subpath starts are tracked through the
/// MoveTo hops.
pub fn encode_prim_list(geometry: &PathGeometry) -> String {
    let prims = &geometry.prims;
    let vert_count = geometry.verts.len();
    let loop_length = if geometry.is_closed && vert_count == prims.len() + 1 {
        prims.len()
    } else {
        vert_count
    };

    let mut subpath_start = 0;
    let mut out = String::new();
    for (i, prim) in prims.iter().enumerate() {
        let letter = match prim {
            Prim::LineTo => 'L',
            Prim::BezierTo => 'B',
            Prim::MoveTo => 'M',
        };
        let from = i;
        let to = if i + 1 < loop_length {
            i + 1
        } else if geometry.is_closed {
            subpath_start
        } else {
            i
        };
        if *prim == Prim::MoveTo {
            subpath_start = to;
        }
        out.push_str(&format!("{letter}{from} {to}"));
    }
    out
}

/// Build path geometry from absolute M/L/Z path-data text.
///
/// Subpaths become MoveTo hops in one geometry, so a multi-polygon outline
/// can travel as a single path shape. A close command rewinds the hop
/// origin to the current subpath start. Unsupported commands and malformed
/// coordinates are skipped. The result is always closed.
pub fn polygon_to_path_geometry(path_data: &str) -> PathGeometry {
    let mut verts: Vec<Vert> = Vec::new();
    let mut prims: Vec<Prim> = Vec::new();

    let chars: Vec<char> = path_data.chars().collect();
    let mut subpath_start: Option<usize> = None;
    let mut last_vert: Option<usize> = None;
    let mut i = 0;

    while i < chars.len() {
        let command = chars[i];
        i += 1;
        match command {
            'M' | 'L' => {
                skip_whitespace(&chars, &mut i);
                let x = scan_number(&chars, &mut i);
                skip_whitespace(&chars, &mut i);
                if i < chars.len() && chars[i] == ',' {
                    i += 1;
                }
                skip_whitespace(&chars, &mut i);
                let y = scan_number(&chars, &mut i);
                let (Some(x), Some(y)) = (x, y) else {
                    continue;
                };

                verts.push(Vert::new(x, y));
                if last_vert.is_some() {
                    prims.push(if command == 'M' {
                        Prim::MoveTo
                    } else {
                        Prim::LineTo
                    });
                }
                if command == 'M' {
                    subpath_start = Some(verts.len() - 1);
                }
                last_vert = Some(verts.len() - 1);
            }
            'z' | 'Z' => {
                // A close returns the pen to the subpath start, so a
                // following move hops from there.
                if subpath_start.is_some() {
                    last_vert = subpath_start;
                }
            }
            _ => {}
        }
    }

    PathGeometry {
        verts,
        prims,
        is_closed: true,
    }
}

/// Per-parse cache of geometry templates keyed by `(VertID, PrimID)`.
///
/// A shape carrying inline geometry and both ids registers (or
/// overwrites) an entry; a shape carrying only the id pair resolves to a
/// deep copy, so later mutation of one instance never affects another.
/// The cache lives inside a single parse call and is never shared across
/// parses.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: HashMap<(i32, i32), PathGeometry>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, vert_id: i32, prim_id: i32, geometry: &PathGeometry) {
        self.entries.insert((vert_id, prim_id), geometry.clone());
    }

    /// Deep-copy the entry for this id pair, if one was registered
    /// earlier in the same parse.
    pub fn resolve(&self, vert_id: i32, prim_id: i32) -> Option<PathGeometry> {
        self.entries.get(&(vert_id, prim_id)).cloned()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_vertices() {
        let verts = parse_vert_list("V49 48V62 63");
        assert_eq!(verts.len(), 2);
        assert_eq!((verts[0].x, verts[0].y), (49.0, 48.0));
        assert_eq!((verts[1].x, verts[1].y), (62.0, 63.0));
        assert!(verts[0].out_handle.is_none());
        assert!(verts[0].in_handle.is_none());
    }

    #[test]
    fn handle_pair_requires_both_components() {
        // c0x1 with no c0y is the "no handle" sentinel; c1x/c1y form a
        // real coordinate.
        let verts = parse_vert_list("V2.1156745 -12.3306c0x1c1x1.5871694c1y-12.3306");
        assert_eq!(verts.len(), 1);
        assert!(verts[0].out_handle.is_none());
        let h = verts[0].in_handle.expect("in handle");
        assert_eq!(h.x, 1.5871694);
        assert_eq!(h.y, -12.3306);
    }

    #[test]
    fn corner_flag_does_not_shadow_handle_prefixes() {
        let verts = parse_vert_list("V0 0c1c0x5c0y6");
        assert_eq!(verts[0].corner, Some(1));
        let h = verts[0].out_handle.expect("out handle");
        assert_eq!((h.x, h.y), (5.0, 6.0));
    }

    #[test]
    fn malformed_vertex_is_skipped() {
        let verts = parse_vert_list("V10 20Vgarbage hereV30 40");
        assert_eq!(verts.len(), 2);
        assert_eq!((verts[1].x, verts[1].y), (30.0, 40.0));
    }

    #[test]
    fn compact_prim_stream_decodes_by_kind() {
        let decode = parse_prim_list("L0 1B1 2M2 3", 4);
        assert_eq!(decode.prims, vec![Prim::LineTo, Prim::BezierTo, Prim::MoveTo]);
        assert_eq!(decode.is_closed, Some(false));
    }

    #[test]
    fn compact_prim_stream_wrap_marks_closed() {
        let decode = parse_prim_list("L0 1L1 2L2 3L3 0", 4);
        assert_eq!(decode.prims, vec![Prim::LineTo; 4]);
        assert_eq!(decode.is_closed, Some(true));
    }

    #[test]
    fn line_descriptor_closed_yields_one_prim_per_vertex() {
        let decode = parse_prim_list("LineClosed", 4);
        assert_eq!(decode.prims, vec![Prim::LineTo; 4]);
        assert_eq!(decode.is_closed, Some(true));
    }

    #[test]
    fn line_descriptor_open_yields_one_fewer() {
        let decode = parse_prim_list("LineOpen", 4);
        assert_eq!(decode.prims, vec![Prim::LineTo; 3]);
        assert_eq!(decode.is_closed, Some(false));
    }

    #[test]
    fn synthesized_rounded_rect_alternates() {
        let prims = synthesize_prims(8, Some(2));
        assert_eq!(prims.len(), 8);
        assert_eq!(prims[0], Prim::LineTo);
        assert_eq!(prims[1], Prim::BezierTo);
        assert_eq!(prims[7], Prim::BezierTo);
    }

    #[test]
    fn synthesized_other_ids_are_all_lines() {
        assert_eq!(synthesize_prims(8, Some(3)), vec![Prim::LineTo; 8]);
        assert_eq!(synthesize_prims(5, Some(2)), vec![Prim::LineTo; 5]);
        assert_eq!(synthesize_prims(3, None), vec![Prim::LineTo; 3]);
    }

    #[test]
    fn encode_prim_list_wraps_closed_loop() {
        let geometry = PathGeometry {
            verts: vec![Vert::new(0.0, 0.0); 4],
            prims: vec![Prim::LineTo; 4],
            is_closed: true,
        };
        assert_eq!(encode_prim_list(&geometry), "L0 1L1 2L2 3L3 0");
    }

    #[test]
    fn encode_prim_list_open_does_not_wrap() {
        let geometry = PathGeometry {
            verts: vec![Vert::new(0.0, 0.0); 4],
            prims: vec![Prim::LineTo; 3],
            is_closed: false,
        };
        assert_eq!(encode_prim_list(&geometry), "L0 1L1 2L2 3");
    }

    #[test]
    fn encode_prim_list_tracks_subpath_start_through_moves() {
        // Two squares joined by a hop at index 3.
        let geometry = PathGeometry {
            verts: vec![Vert::new(0.0, 0.0); 8],
            prims: vec![
                Prim::LineTo,
                Prim::LineTo,
                Prim::LineTo,
                Prim::MoveTo,
                Prim::LineTo,
                Prim::LineTo,
                Prim::LineTo,
            ],
            is_closed: true,
        };
        assert_eq!(
            encode_prim_list(&geometry),
            "L0 1L1 2L2 3M3 4L4 5L5 6L6 4"
        );
    }

    #[test]
    fn vert_list_roundtrip() {
        let verts = vec![
            Vert {
                x: 2.1156745,
                y: -12.3306,
                corner: Some(1),
                out_handle: Some(Point::new(3.0, 4.5)),
                in_handle: None,
            },
            Vert::new(10.0, 0.0),
        ];
        let encoded = encode_vert_list(&verts);
        assert_eq!(parse_vert_list(&encoded), verts);
    }

    #[test]
    fn polygon_path_data_becomes_hopping_geometry() {
        let geometry =
            polygon_to_path_geometry("M 0,0 L 10,0 L 10,10 z M 20,20 L 30,20 L 30,30 z");
        assert_eq!(geometry.verts.len(), 6);
        assert_eq!(
            geometry.prims,
            vec![
                Prim::LineTo,
                Prim::LineTo,
                Prim::MoveTo,
                Prim::LineTo,
                Prim::LineTo,
            ]
        );
        assert!(geometry.is_closed);
        assert_eq!((geometry.verts[3].x, geometry.verts[3].y), (20.0, 20.0));
    }

    #[test]
    fn polygon_path_data_skips_garbage_commands() {
        let geometry = polygon_to_path_geometry("M 0 0 Q 1 2 3 4 L 5 5");
        // The Q command and its arguments are not vertex data.
        assert_eq!(geometry.verts.len(), 2);
        assert_eq!(geometry.prims, vec![Prim::LineTo]);
    }

    #[test]
    fn template_cache_resolves_to_deep_copy() {
        let mut cache = TemplateCache::new();
        let geometry = PathGeometry {
            verts: vec![Vert::new(1.0, 2.0), Vert::new(3.0, 4.0)],
            prims: vec![Prim::LineTo; 2],
            is_closed: true,
        };
        cache.register(3, 7, &geometry);

        let mut copy = cache.resolve(3, 7).expect("registered entry");
        copy.verts[0].x = 99.0;
        let again = cache.resolve(3, 7).expect("still registered");
        assert_eq!(again.verts[0].x, 1.0);

        assert!(cache.resolve(3, 8).is_none());
    }
}
