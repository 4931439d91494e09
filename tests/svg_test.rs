use lbrn_tools::svg::SvgOptions;
use lbrn_tools::{parse_project, project_to_svg};

fn render(xml: &str, options: &SvgOptions) -> String {
    let mut warnings = Vec::new();
    let project = parse_project(xml, &mut warnings).expect("parse");
    project_to_svg(&project, options)
}

#[test]
fn empty_scene_falls_back_to_default_canvas() {
    let svg = render("<LightBurnProject/>", &SvgOptions::default());
    assert!(svg.contains("viewBox=\"-10 -10 120 120\""));
    assert!(svg.contains("width=\"120\""));
    assert!(svg.contains("height=\"120\""));
    assert!(svg.contains("style=\"background-color: white;\""));
    assert!(svg.contains("matrix(1 0 0 -1 0 100)"));
}

#[test]
fn margin_growth_adds_to_each_dimension_twice() {
    let xml = r#"<LightBurnProject>
        <Shape Type="Rect" W="50" H="30">
            <XForm>1 0 0 1 0 0</XForm>
        </Shape>
    </LightBurnProject>"#;

    let narrow = render(
        xml,
        &SvgOptions {
            margin: 5.0,
            ..Default::default()
        },
    );
    let wide = render(
        xml,
        &SvgOptions {
            margin: 15.0,
            ..Default::default()
        },
    );
    assert!(narrow.contains("viewBox=\"-5 -5 60 40\""));
    assert!(wide.contains("viewBox=\"-15 -15 80 60\""));
}

#[test]
fn multi_subpath_path_emits_hop_with_close() {
    let xml = r#"<LightBurnProject>
        <Shape Type="Path">
            <XForm>1 0 0 1 0 0</XForm>
            <VertList>V0 0V10 0V10 10V0 10V20 20V30 20V30 30V20 30</VertList>
            <PrimList>L0 1L1 2L2 3M3 4L4 5L5 6L6 4</PrimList>
        </Shape>
    </LightBurnProject>"#;
    let svg = render(xml, &SvgOptions::default());
    assert!(svg.contains("d=\"M 0 0 L 10 0 L 10 10 L 0 10 Z M 20 20 L 30 20 L 30 30 L 20 30 Z\""));
}

#[test]
fn nested_scan_paths_build_one_nonzero_path_with_hole() {
    // Outer square wound one way, inner square the other, both on a Scan
    // layer: the group must collapse to a single nonzero compound path
    // plus one clip for the fill lines.
    let xml = r#"<LightBurnProject>
        <CutSetting type="Scan">
            <index Value="0"/>
            <interval Value="1"/>
        </CutSetting>
        <Shape Type="Group">
            <XForm>1 0 0 1 0 0</XForm>
            <Children>
                <Shape Type="Path" CutIndex="0">
                    <XForm>1 0 0 1 0 0</XForm>
                    <VertList>V0 0V20 0V20 20V0 20</VertList>
                    <PrimList>L0 1L1 2L2 3L3 0</PrimList>
                </Shape>
                <Shape Type="Path" CutIndex="0">
                    <XForm>1 0 0 1 0 0</XForm>
                    <VertList>V5 15V15 15V15 5V5 5</VertList>
                    <PrimList>L0 1L1 2L2 3L3 0</PrimList>
                </Shape>
            </Children>
        </Shape>
    </LightBurnProject>"#;
    let svg = render(xml, &SvgOptions::default());

    // Exactly one clipPath, whose path shares the compound data.
    assert_eq!(svg.matches("<clipPath").count(), 1);
    // The compound data appears twice: once in the clip, once as outline.
    let outer_subpath = "M 0 0 L 20 0 L 20 20 L 0 20 Z";
    let inner_subpath = "M 5 15 L 15 15 L 15 5 L 5 5 Z";
    assert_eq!(svg.matches(outer_subpath).count(), 2);
    assert_eq!(svg.matches(inner_subpath).count(), 2);
    // Both carry the nonzero rule; the outline is a single stroked path.
    assert_eq!(svg.matches("fill-rule=\"nonzero\"").count(), 2);
    assert_eq!(
        svg.matches(&format!("d=\"{outer_subpath} {inner_subpath}\" fill=\"none\""))
            .count(),
        1
    );
    // Fill lines were generated and clipped.
    assert!(svg.contains("<line "));
    assert!(svg.contains("clip-path=\"url(#clip-0)\""));
}

#[test]
fn scan_rect_fills_with_a_hatch_pattern() {
    let xml = r#"<LightBurnProject>
        <CutSetting type="Scan">
            <index Value="1"/>
            <interval Value="2"/>
            <angle Value="0"/>
        </CutSetting>
        <Shape Type="Rect" CutIndex="1" W="10" H="10">
            <XForm>1 0 0 1 30 30</XForm>
        </Shape>
    </LightBurnProject>"#;
    let svg = render(xml, &SvgOptions::default());
    assert!(svg.contains("<g transform=\"matrix(1 0 0 1 30 30)\">"));
    // Layer 1 is blue; its hatch tile carries the translucent stroke.
    assert!(svg.contains("<pattern id=\"hatch-2-0-p-0000ff-0.1-0.8\""));
    assert!(svg.contains("fill=\"url(#hatch-2-0-p-0000ff-0.1-0.8)\""));
    assert!(svg.contains("rgba(0, 0, 255, 0.8)"));
    assert!(svg.contains("stroke=\"#0000FF\""));
}

#[test]
fn shapes_on_one_scan_layer_share_a_pattern_def() {
    let xml = r#"<LightBurnProject>
        <CutSetting type="Scan">
            <index Value="0"/>
            <interval Value="1"/>
        </CutSetting>
        <Shape Type="Rect" CutIndex="0" W="10" H="10">
            <XForm>1 0 0 1 0 0</XForm>
        </Shape>
        <Shape Type="Ellipse" CutIndex="0" Rx="5" Ry="3">
            <XForm>1 0 0 1 30 0</XForm>
        </Shape>
    </LightBurnProject>"#;
    let svg = render(xml, &SvgOptions::default());
    assert_eq!(svg.matches("<defs>").count(), 1);
    assert_eq!(svg.matches("<pattern ").count(), 1);
    assert_eq!(svg.matches("fill=\"url(#hatch-").count(), 2);
}

#[test]
fn cut_layers_render_outline_only() {
    let xml = r#"<LightBurnProject>
        <CutSetting type="Cut">
            <index Value="0"/>
        </CutSetting>
        <Shape Type="Ellipse" CutIndex="0" Rx="5" Ry="5">
            <XForm>1 0 0 1 10 10</XForm>
        </Shape>
    </LightBurnProject>"#;
    let svg = render(xml, &SvgOptions::default());
    assert!(svg.contains("<circle cx=\"0\" cy=\"0\" r=\"5\" fill=\"none\" stroke=\"#FF0000\"/>"));
    assert!(!svg.contains("<line "));
}

#[test]
fn explicit_canvas_size_overrides_content() {
    let xml = r#"<LightBurnProject>
        <Shape Type="Rect" W="50" H="50">
            <XForm>1 0 0 1 0 0</XForm>
        </Shape>
    </LightBurnProject>"#;
    let svg = render(
        xml,
        &SvgOptions {
            width: Some(640.0),
            height: Some(480.0),
            ..Default::default()
        },
    );
    assert!(svg.contains("width=\"640\""));
    assert!(svg.contains("height=\"480\""));
    assert!(svg.contains("viewBox=\"-10 -10 70 70\""));
}

#[test]
fn bitmap_and_text_render_their_nodes() {
    let xml = r#"<LightBurnProject>
        <Shape Type="Bitmap" W="25" H="25">
            <XForm>1 0 0 1 0 0</XForm>
            <Data Source="iVBORw0KGgo="/>
        </Shape>
        <Shape Type="Text" Text="Serial 001">
            <XForm>1 0 0 1 0 40</XForm>
        </Shape>
    </LightBurnProject>"#;
    let svg = render(xml, &SvgOptions::default());
    assert!(svg.contains("href=\"data:image/png;base64,iVBORw0KGgo=\""));
    assert!(svg.contains("<text x=\"0\" y=\"0\" fill=\"black\">Serial 001</text>"));
}
