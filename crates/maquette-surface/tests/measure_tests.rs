use maquette_geometry::{CanvasPoint, CanvasRect, MaybeInfinite};
use maquette_model::DetectedLayoutSystem;
use maquette_surface::measure::{
    collect_computed_style, collect_metadata_for_element, collect_special_measurements,
    global_frame_for_element, is_containing_block_for_absolute, Rounding,
};
use maquette_surface::{NodeId, TextContentInclusion};
use maquette_testing::{NodeSpec, TestSurface};

fn flex_child_fixture() -> (TestSurface, NodeId) {
    let (mut surface, container) = TestSurface::with_container("sb", &["sb/parent/child"]);
    let parent = surface.add_node(
        container,
        NodeSpec::new("div")
            .path("sb/parent")
            .rect(10.0, 10.0, 200.0, 100.0)
            .style("display", "flex")
            .style("flexDirection", "row")
            .style("position", "relative")
            .style("gap", "8px"),
    );
    let child = surface.add_node(
        parent,
        NodeSpec::new("div")
            .path("sb/parent/child")
            .rect(20.0, 10.0, 50.0, 50.0)
            .style("display", "block")
            .style("marginTop", "4px")
            .style("marginRight", "2em")
            .style("paddingLeft", "6px"),
    );
    (surface, child)
}

#[test]
fn special_measurements_classify_parent_flex_layout() {
    let (surface, child) = flex_child_fixture();
    let measurements =
        collect_special_measurements(&surface, child, None, 1.0, CanvasPoint::ZERO);

    assert_eq!(measurements.parent_layout_system, DetectedLayoutSystem::Flex);
    assert_eq!(
        measurements.layout_system_for_children,
        DetectedLayoutSystem::Flow
    );
    assert_eq!(
        measurements.parent_flex_direction,
        Some(maquette_model::FlexDirection::Row)
    );
    assert_eq!(measurements.parent_flex_gap, 8.0);
    assert!(measurements.is_parent_non_static);
    assert!(measurements.parent_provides_layout);
}

#[test]
fn malformed_lengths_degrade_to_neutral_values() {
    let (surface, child) = flex_child_fixture();
    let measurements =
        collect_special_measurements(&surface, child, None, 1.0, CanvasPoint::ZERO);

    assert_eq!(measurements.margin.top, Some(4.0));
    // em margins do not resolve to a number but do not abort the walk
    assert_eq!(measurements.margin.right, None);
    assert_eq!(measurements.padding.left, Some(6.0));
}

#[test]
fn containing_block_detection_covers_transform_and_contain() {
    let (mut surface, container) = TestSurface::with_container("sb", &["sb/a"]);
    let transformed = surface.add_node(
        container,
        NodeSpec::new("div")
            .path("sb/a")
            .rect(0.0, 0.0, 10.0, 10.0)
            .style("transform", "translateX(10px)"),
    );
    let contained = surface.add_node(
        container,
        NodeSpec::new("div")
            .rect(0.0, 0.0, 10.0, 10.0)
            .style("contain", "layout style"),
    );
    let plain = surface.add_node(
        container,
        NodeSpec::new("div")
            .rect(0.0, 0.0, 10.0, 10.0)
            .style("position", "static"),
    );

    assert!(is_containing_block_for_absolute(&surface, transformed));
    assert!(is_containing_block_for_absolute(&surface, contained));
    assert!(!is_containing_block_for_absolute(&surface, plain));
}

#[test]
fn global_frame_unzooms_and_offsets_by_container() {
    let (mut surface, container) = TestSurface::with_container("sb", &["sb/a"]);
    let node = surface.add_node(
        container,
        NodeSpec::new("div")
            .path("sb/a")
            .rect(100.0, 50.0, 200.0, 100.0),
    );

    let frame = global_frame_for_element(
        &surface,
        node,
        2.0,
        CanvasPoint::new(10.0, 10.0),
        TextContentInclusion::WithoutTextContent,
        Rounding::NearestHalf,
    );
    assert_eq!(frame, CanvasRect::new(40.0, 15.0, 100.0, 50.0));
}

#[test]
fn computed_style_only_collected_for_selection() {
    let (mut surface, container) = TestSurface::with_container("sb", &["sb/a"]);
    let node = surface.add_node(
        container,
        NodeSpec::new("div")
            .path("sb/a")
            .rect(0.0, 0.0, 10.0, 10.0)
            .style("display", "flex")
            .style("backgroundColor", "red"),
    );

    let (unselected_style, unselected_attribution) =
        collect_computed_style(&surface, node, false, &Default::default());
    assert!(unselected_style.is_none());
    assert!(unselected_attribution.is_none());

    let mut from_sheets = rustc_hash::FxHashSet::default();
    from_sheets.insert("backgroundColor".to_owned());
    let (style, attribution) = collect_computed_style(&surface, node, true, &from_sheets);
    let style = style.unwrap();
    assert_eq!(style.get("display"), Some("flex"));
    assert_eq!(style.get("backgroundColor"), Some("red"));
    assert!(attribution.unwrap().is_from_style_sheet("backgroundColor"));
}

#[test]
fn grid_properties_parse_shorthand_and_longhand() {
    let (mut surface, container) = TestSurface::with_container("sb", &["sb/grid/item"]);
    let grid = surface.add_node(
        container,
        NodeSpec::new("div")
            .path("sb/grid")
            .rect(0.0, 0.0, 300.0, 300.0)
            .style("display", "grid")
            .style("gridTemplateColumns", "1fr 1fr 1fr")
            .style("gridTemplateRows", "repeat(2, 100px)"),
    );
    let item = surface.add_node(
        grid,
        NodeSpec::new("div")
            .path("sb/grid/item")
            .rect(0.0, 0.0, 100.0, 100.0)
            .style("gridColumn", "2 / 4")
            .style("gridRowStart", "1")
            .style("gridRowEnd", "auto"),
    );

    let measurements = collect_special_measurements(&surface, item, None, 1.0, CanvasPoint::ZERO);
    let grid_props = measurements.element_grid_properties;
    assert_eq!(
        grid_props.grid_column_start,
        Some(maquette_model::GridPosition::Numeric(2))
    );
    assert_eq!(
        grid_props.grid_column_end,
        Some(maquette_model::GridPosition::Numeric(4))
    );
    assert_eq!(
        grid_props.grid_row_start,
        Some(maquette_model::GridPosition::Numeric(1))
    );
    assert_eq!(
        grid_props.grid_row_end,
        Some(maquette_model::GridPosition::Auto)
    );

    let grid_measurements =
        collect_special_measurements(&surface, grid, None, 1.0, CanvasPoint::ZERO);
    assert_eq!(
        grid_measurements.container_grid_properties.grid_template_columns,
        Some("1fr 1fr 1fr".to_owned())
    );
    assert_eq!(
        grid_measurements.layout_system_for_children,
        DetectedLayoutSystem::Grid
    );
}

#[test]
fn measured_element_reports_frames_and_text() {
    let (mut surface, container) = TestSurface::with_container("sb", &["sb/label"]);
    let node = surface.add_node(
        container,
        NodeSpec::new("span")
            .path("sb/label")
            .rect(10.0, 10.0, 80.25, 20.0)
            .text("hello"),
    );

    let measured =
        collect_metadata_for_element(&surface, node, None, 1.0, CanvasPoint::ZERO);
    assert_eq!(measured.tag_name, "span");
    assert_eq!(measured.text_content, Some("hello".to_owned()));
    assert_eq!(
        measured.global_frame,
        MaybeInfinite::Finite(CanvasRect::new(10.0, 10.0, 80.5, 20.0))
    );
    assert_eq!(
        measured.non_rounded_global_frame,
        MaybeInfinite::Finite(CanvasRect::new(10.0, 10.0, 80.25, 20.0))
    );
}
