//! Geometry & style measurement for live tree nodes
//!
//! Turns raw surface readings into the derived measurements stored per
//! element: global frames in canvas coordinates, layout-system
//! classification, containing-block relationships, flex/grid container and
//! item properties, and the selection-only computed-style snapshot.

use maquette_geometry::{
    round_to_nearest_half, BorderWidths, CanvasPoint, CanvasRect, MaybeInfinite, Sides,
};
use maquette_model::{
    ComputedStyleSnapshot, DetectedLayoutSystem, ElementPath, GridContainerProperties,
    GridElementProperties, HugProperties, HugProperty, SpecialSizeMeasurements,
    StyleAttributeMetadata, COMPUTED_STYLE_KEYS,
};
use rustc_hash::FxHashSet;

use crate::parse::{
    element_layout_system, parse_align_items, parse_css_length, parse_direction,
    parse_flex_direction, parse_grid_auto_flow, parse_grid_position, parse_grid_range,
    parse_justify_content, parse_position, parse_sides_px, position_value_is_default,
};
use crate::{NodeId, RenderSurface, StyleSource, TextContentInclusion};

/// Frame rounding applied when converting into canvas coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    NearestHalf,
    NoRounding,
}

/// Everything measured from one live node, before it is fanned out into the
/// metadata entries for the node's annotated paths.
#[derive(Clone, Debug)]
pub struct MeasuredElement {
    pub tag_name: String,
    pub global_frame: MaybeInfinite<CanvasRect>,
    pub non_rounded_global_frame: MaybeInfinite<CanvasRect>,
    pub special_size_measurements: SpecialSizeMeasurements,
    pub text_content: Option<String>,
}

fn computed(surface: &dyn RenderSurface, node: NodeId, property: &str) -> Option<String> {
    surface.style_property(node, StyleSource::Computed, property)
}

fn inline(surface: &dyn RenderSurface, node: NodeId, property: &str) -> Option<String> {
    surface.style_property(node, StyleSource::Inline, property)
}

/// Converts a viewport rectangle into canvas coordinates: undo the canvas
/// zoom, round, then shift by the container origin.
pub fn viewport_to_canvas(
    rect: CanvasRect,
    scale: f64,
    container_origin: CanvasPoint,
    rounding: Rounding,
) -> CanvasRect {
    let unscaled = if scale != 1.0 {
        rect.scale(1.0 / scale)
    } else {
        rect
    };
    let rounded = match rounding {
        Rounding::NearestHalf => CanvasRect {
            x: round_to_nearest_half(unscaled.x),
            y: round_to_nearest_half(unscaled.y),
            width: round_to_nearest_half(unscaled.width),
            height: round_to_nearest_half(unscaled.height),
        },
        Rounding::NoRounding => unscaled,
    };
    rounded.offset_by_negated(container_origin)
}

/// The element's bounding rectangle in canvas coordinates.
pub fn global_frame_for_element(
    surface: &dyn RenderSurface,
    node: NodeId,
    scale: f64,
    container_origin: CanvasPoint,
    inclusion: TextContentInclusion,
    rounding: Rounding,
) -> CanvasRect {
    viewport_to_canvas(
        surface.bounding_rect(node, inclusion),
        scale,
        container_origin,
        rounding,
    )
}

fn is_element_non_static(position: Option<&str>) -> bool {
    matches!(position, Some(value) if value != "static")
}

/// Containing-block test for absolutely positioned descendants: non-static
/// position, transform, perspective, will-change, filter, or layout/paint
/// containment all establish one.
pub fn is_containing_block_for_absolute(surface: &dyn RenderSurface, node: NodeId) -> bool {
    let prop = |name: &str| computed(surface, node, name);
    if is_element_non_static(prop("position").as_deref()) {
        return true;
    }
    if matches!(prop("transform").as_deref(), Some(value) if value != "none") {
        return true;
    }
    if matches!(prop("perspective").as_deref(), Some(value) if value != "none") {
        return true;
    }
    if matches!(
        prop("willChange").as_deref(),
        Some("transform") | Some("perspective")
    ) {
        return true;
    }
    if matches!(prop("filter").as_deref(), Some(value) if value != "none") {
        return true;
    }
    if let Some(contain) = prop("contain") {
        if ["layout", "paint", "strict", "content"]
            .iter()
            .any(|token| contain.contains(token))
        {
            return true;
        }
    }
    false
}

/// Walks up from the node until an offset parent is found.
fn closest_offset_parent(surface: &dyn RenderSurface, node: NodeId) -> Option<NodeId> {
    let mut current = Some(node);
    while let Some(candidate) = current {
        if let Some(offset_parent) = surface.offset_parent(candidate) {
            return Some(offset_parent);
        }
        current = surface.parent(candidate);
    }
    None
}

fn grid_container_properties(
    surface: &dyn RenderSurface,
    node: NodeId,
    source: StyleSource,
) -> GridContainerProperties {
    let prop = |name: &str| surface.style_property(node, source, name);
    GridContainerProperties {
        grid_template_columns: prop("gridTemplateColumns"),
        grid_template_rows: prop("gridTemplateRows"),
        grid_auto_columns: prop("gridAutoColumns"),
        grid_auto_rows: prop("gridAutoRows"),
        grid_auto_flow: prop("gridAutoFlow").as_deref().and_then(parse_grid_auto_flow),
    }
}

fn grid_element_properties(
    surface: &dyn RenderSurface,
    node: NodeId,
    source: StyleSource,
) -> GridElementProperties {
    let prop = |name: &str| surface.style_property(node, source, name);

    let (column_shorthand_start, column_shorthand_end) = prop("gridColumn")
        .map(|value| parse_grid_range(&value))
        .unwrap_or((None, None));
    let (row_shorthand_start, row_shorthand_end) = prop("gridRow")
        .map(|value| parse_grid_range(&value))
        .unwrap_or((None, None));

    let longhand = |name: &str| prop(name).as_deref().and_then(parse_grid_position);

    GridElementProperties {
        grid_column_start: column_shorthand_start.or_else(|| longhand("gridColumnStart")),
        grid_column_end: column_shorthand_end.or_else(|| longhand("gridColumnEnd")),
        grid_row_start: row_shorthand_start.or_else(|| longhand("gridRowStart")),
        grid_row_end: row_shorthand_end.or_else(|| longhand("gridRowEnd")),
    }
}

fn hug_properties_from_style(
    surface: &dyn RenderSurface,
    node: NodeId,
    global_frame: CanvasRect,
) -> HugProperties {
    let detect = |property: &str, extent: f64| -> Option<HugProperty> {
        if extent == 0.0 {
            return Some(HugProperty::Collapsed);
        }
        match computed(surface, node, property).as_deref() {
            Some("max-content") => Some(HugProperty::Hug),
            Some("min-content") => Some(HugProperty::Squeeze),
            _ => None,
        }
    };
    HugProperties {
        width: detect("width", global_frame.width),
        height: detect("height", global_frame.height),
    }
}

/// Collects the full [`SpecialSizeMeasurements`] record for a node.
pub fn collect_special_measurements(
    surface: &dyn RenderSurface,
    node: NodeId,
    closest_offset_parent_path: Option<ElementPath>,
    scale: f64,
    container_origin: CanvasPoint,
) -> SpecialSizeMeasurements {
    let prop = |name: &str| computed(surface, node, name);
    let parent = surface.parent(node);
    let parent_prop = |name: &str| parent.and_then(|p| computed(surface, p, name));

    let layout_system_for_children = element_layout_system(prop("display").as_deref());
    let position = prop("position").as_deref().and_then(parse_position);

    let offset_raw = surface.offset_position(node);
    let offset = CanvasPoint {
        x: round_to_nearest_half(offset_raw.x),
        y: round_to_nearest_half(offset_raw.y),
    };

    let offset_parent = surface.offset_parent(node);
    let coordinate_system_bounds = offset_parent.map(|p| {
        global_frame_for_element(
            surface,
            p,
            scale,
            container_origin,
            TextContentInclusion::WithoutTextContent,
            Rounding::NearestHalf,
        )
    });
    let immediate_parent_bounds = parent.map(|p| {
        global_frame_for_element(
            surface,
            p,
            scale,
            container_origin,
            TextContentInclusion::WithoutTextContent,
            Rounding::NearestHalf,
        )
    });

    let is_parent_non_static = is_element_non_static(parent_prop("position").as_deref());
    let provides_bounds_for_absolute_children = is_containing_block_for_absolute(surface, node);

    let parent_layout_system = element_layout_system(parent_prop("display").as_deref());
    let parent_provides_layout = parent == offset_parent && parent.is_some();
    let parent_flex_direction = parent_prop("flexDirection")
        .as_deref()
        .and_then(parse_flex_direction);
    let parent_justify_content = parent_prop("justifyContent")
        .as_deref()
        .and_then(parse_justify_content);
    let parent_text_direction = parent_prop("direction").as_deref().and_then(parse_direction);

    // A flex parent hugging its main axis authors max-content on that axis.
    let main_axis_size_property = match parent_flex_direction {
        Some(direction) if direction.is_horizontal() => "width",
        _ => "height",
    };
    let parent_hugs_on_main_axis = parent_layout_system == DetectedLayoutSystem::Flex
        && parent
            .and_then(|p| inline(surface, p, main_axis_size_property))
            .as_deref()
            == Some("max-content");

    let flex_direction = prop("flexDirection").as_deref().and_then(parse_flex_direction);
    let justify_content = prop("justifyContent")
        .as_deref()
        .and_then(parse_justify_content);
    let align_items = prop("alignItems").as_deref().and_then(parse_align_items);

    let margin = parse_sides_px(
        prop("marginTop").as_deref(),
        prop("marginRight").as_deref(),
        prop("marginBottom").as_deref(),
        prop("marginLeft").as_deref(),
    );
    let padding = parse_sides_px(
        prop("paddingTop").as_deref(),
        prop("paddingRight").as_deref(),
        prop("paddingBottom").as_deref(),
        prop("paddingLeft").as_deref(),
    );
    let parent_padding = parse_sides_px(
        parent_prop("paddingTop").as_deref(),
        parent_prop("paddingRight").as_deref(),
        parent_prop("paddingBottom").as_deref(),
        parent_prop("paddingLeft").as_deref(),
    );

    let border = BorderWidths {
        top: prop("borderTopWidth")
            .as_deref()
            .and_then(parse_css_length)
            .unwrap_or(0.0),
        right: prop("borderRightWidth")
            .as_deref()
            .and_then(parse_css_length)
            .unwrap_or(0.0),
        bottom: prop("borderBottomWidth")
            .as_deref()
            .and_then(parse_css_length)
            .unwrap_or(0.0),
        left: prop("borderLeftWidth")
            .as_deref()
            .and_then(parse_css_length)
            .unwrap_or(0.0),
    };

    let natural_size = surface.natural_image_size(node);
    let client_size = surface.client_size(node);

    // The content box children position against: the element itself when it
    // establishes a containing block, otherwise its closest offset parent.
    let containing_node = if provides_bounds_for_absolute_children {
        node
    } else {
        closest_offset_parent(surface, node).unwrap_or(node)
    };
    let containing_frame = global_frame_for_element(
        surface,
        containing_node,
        scale,
        container_origin,
        TextContentInclusion::WithoutTextContent,
        Rounding::NearestHalf,
    );
    let global_content_box_for_children = Some(CanvasRect {
        x: containing_frame.x + border.left,
        y: containing_frame.y + border.top,
        width: containing_frame.width - border.left - border.right,
        height: containing_frame.height - border.top - border.bottom,
    });

    let global_frame = global_frame_for_element(
        surface,
        node,
        scale,
        container_origin,
        TextContentInclusion::WithoutTextContent,
        Rounding::NearestHalf,
    );
    let global_frame_with_text_content = Some(MaybeInfinite::Finite(global_frame_for_element(
        surface,
        node,
        scale,
        container_origin,
        TextContentInclusion::WithTextContent,
        Rounding::NearestHalf,
    )));

    let has_position_offset = ["top", "right", "bottom", "left"].iter().any(|side| {
        prop(side)
            .map(|value| !position_value_is_default(&value))
            .unwrap_or(false)
    });
    let has_transform = matches!(prop("transform").as_deref(), Some(value) if value != "none");

    let gap = prop("gap").as_deref().and_then(parse_css_length);
    let row_gap = prop("rowGap").as_deref().and_then(parse_css_length);
    let column_gap = prop("columnGap").as_deref().and_then(parse_css_length);
    let parent_flex_gap = parent_prop("gap")
        .as_deref()
        .and_then(parse_css_length)
        .unwrap_or(0.0);

    let border_radius = Some(parse_sides_px(
        prop("borderTopLeftRadius").as_deref(),
        prop("borderTopRightRadius").as_deref(),
        prop("borderBottomLeftRadius").as_deref(),
        prop("borderBottomRightRadius").as_deref(),
    ))
    .filter(|sides: &Sides| *sides != Sides::EMPTY);

    let contains_only_text = surface.contains_only_text(node);
    let text_bounds = if contains_only_text {
        let raw = global_frame_for_element(
            surface,
            node,
            scale,
            container_origin,
            TextContentInclusion::OnlyTextContent,
            Rounding::NearestHalf,
        );
        Some(raw.stretch(
            padding.horizontal_sum() + margin.horizontal_sum(),
            padding.vertical_sum() + margin.vertical_sum(),
        ))
    } else {
        None
    };

    SpecialSizeMeasurements {
        offset,
        coordinate_system_bounds,
        immediate_parent_bounds,
        global_frame_with_text_content,
        parent_provides_layout,
        closest_offset_parent_path,
        is_parent_non_static,
        parent_layout_system,
        layout_system_for_children,
        provides_bounds_for_absolute_children,
        display: prop("display").unwrap_or_default(),
        position,
        margin,
        padding,
        border,
        natural_width: natural_size.map(|size| round_to_nearest_half(size.width)),
        natural_height: natural_size.map(|size| round_to_nearest_half(size.height)),
        client_width: round_to_nearest_half(client_size.width),
        client_height: round_to_nearest_half(client_size.height),
        parent_flex_direction,
        parent_justify_content,
        parent_flex_gap,
        parent_padding,
        parent_hugs_on_main_axis,
        gap,
        row_gap,
        column_gap,
        flex_direction,
        justify_content,
        align_items,
        html_element_name: surface.tag_name(node).to_lowercase(),
        children_count: surface.children_count(node),
        global_content_box_for_children,
        float_value: prop("float").unwrap_or_default(),
        has_position_offset,
        parent_text_direction,
        has_transform,
        border_radius,
        font_size: prop("fontSize"),
        font_weight: prop("fontWeight"),
        font_style: prop("fontStyle"),
        text_decoration_line: prop("textDecorationLine"),
        contains_only_text,
        text_bounds,
        computed_hug_property: hug_properties_from_style(surface, node, global_frame),
        container_grid_properties: grid_container_properties(
            surface,
            node,
            StyleSource::Computed,
        ),
        element_grid_properties: grid_element_properties(surface, node, StyleSource::Computed),
        container_grid_properties_from_props: grid_container_properties(
            surface,
            node,
            StyleSource::Inline,
        ),
        element_grid_properties_from_props: grid_element_properties(
            surface,
            node,
            StyleSource::Inline,
        ),
    }
}

/// Measures one node: identity, frames, and special measurements.
pub fn collect_metadata_for_element(
    surface: &dyn RenderSurface,
    node: NodeId,
    closest_offset_parent_path: Option<ElementPath>,
    scale: f64,
    container_origin: CanvasPoint,
) -> MeasuredElement {
    let tag_name = surface.tag_name(node).to_lowercase();
    let global_frame = global_frame_for_element(
        surface,
        node,
        scale,
        container_origin,
        TextContentInclusion::WithoutTextContent,
        Rounding::NearestHalf,
    );
    let non_rounded_global_frame = global_frame_for_element(
        surface,
        node,
        scale,
        container_origin,
        TextContentInclusion::WithoutTextContent,
        Rounding::NoRounding,
    );
    let text_content = if surface.children_count(node) == 0 {
        surface.text_content(node)
    } else {
        None
    };
    let special_size_measurements = collect_special_measurements(
        surface,
        node,
        closest_offset_parent_path,
        scale,
        container_origin,
    );

    MeasuredElement {
        tag_name,
        global_frame: MaybeInfinite::Finite(global_frame),
        non_rounded_global_frame: MaybeInfinite::Finite(non_rounded_global_frame),
        special_size_measurements,
        text_content,
    }
}

/// Computed-style snapshot plus stylesheet attribution, collected only for
/// selected elements — skipping unselected elements is a deliberate
/// cost-avoidance policy.
pub fn collect_computed_style(
    surface: &dyn RenderSurface,
    node: NodeId,
    is_selected: bool,
    attribution_from_stylesheets: &FxHashSet<String>,
) -> (Option<ComputedStyleSnapshot>, Option<StyleAttributeMetadata>) {
    if !is_selected {
        return (None, None);
    }
    let mut snapshot = ComputedStyleSnapshot::default();
    let mut attribution = StyleAttributeMetadata::default();
    for key in COMPUTED_STYLE_KEYS {
        if let Some(value) = computed(surface, node, key) {
            if value.is_empty() {
                continue;
            }
            snapshot.properties.insert((*key).to_owned(), value);
            if attribution_from_stylesheets.contains(*key) {
                attribution.from_style_sheet.insert((*key).to_owned());
            }
        }
    }
    (Some(snapshot), Some(attribution))
}
