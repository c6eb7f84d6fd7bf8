//! Per-element measurement records and the metadata map

use maquette_geometry::{BorderWidths, CanvasPoint, CanvasRect, MaybeInfinite, Sides};
use rustc_hash::FxHashMap;

use crate::{
    ComputedStyleSnapshot, ElementPath, GridContainerProperties, GridElementProperties,
    StyleAttributeMetadata,
};

/// Layout system detected from an element's computed display value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DetectedLayoutSystem {
    Flex,
    Grid,
    Flow,
    #[default]
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Static,
    Relative,
    Absolute,
    Sticky,
    Fixed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlexDirection {
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlexJustifyContent {
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlexAlignment {
    Auto,
    FlexStart,
    Center,
    FlexEnd,
    Stretch,
    Baseline,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// How a dimension hugs its content, detected from the computed style map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HugProperty {
    Hug,
    Squeeze,
    Collapsed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct HugProperties {
    pub width: Option<HugProperty>,
    pub height: Option<HugProperty>,
}

/// Marks an element that is the branch of a conditional render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConditionalCase {
    #[default]
    NotAConditional,
    TrueCase,
    FalseCase,
}

/// Layout-system classification and derived measurements for one element.
///
/// Collected by the measurement unit on every (re)measure; the defaults are
/// the neutral values used for synthesized entries.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SpecialSizeMeasurements {
    /// Offset from the offset parent, in local coordinates.
    pub offset: CanvasPoint,
    /// Global frame of the closest containing block.
    pub coordinate_system_bounds: Option<CanvasRect>,
    /// Global frame of the immediate parent node.
    pub immediate_parent_bounds: Option<CanvasRect>,
    pub global_frame_with_text_content: Option<MaybeInfinite<CanvasRect>>,
    /// Whether the immediate parent is also the offset parent.
    pub parent_provides_layout: bool,
    pub closest_offset_parent_path: Option<ElementPath>,
    pub is_parent_non_static: bool,
    pub parent_layout_system: DetectedLayoutSystem,
    pub layout_system_for_children: DetectedLayoutSystem,
    /// Whether this element establishes the containing block for absolutely
    /// positioned descendants.
    pub provides_bounds_for_absolute_children: bool,
    pub display: String,
    pub position: Option<Position>,
    pub margin: Sides,
    pub padding: Sides,
    pub border: BorderWidths,
    pub natural_width: Option<f64>,
    pub natural_height: Option<f64>,
    pub client_width: f64,
    pub client_height: f64,
    pub parent_flex_direction: Option<FlexDirection>,
    pub parent_justify_content: Option<FlexJustifyContent>,
    pub parent_flex_gap: f64,
    pub parent_padding: Sides,
    pub parent_hugs_on_main_axis: bool,
    pub gap: Option<f64>,
    pub row_gap: Option<f64>,
    pub column_gap: Option<f64>,
    pub flex_direction: Option<FlexDirection>,
    pub justify_content: Option<FlexJustifyContent>,
    pub align_items: Option<FlexAlignment>,
    pub html_element_name: String,
    pub children_count: usize,
    /// Global frame shrunk by the border widths; the coordinate space
    /// offered to children.
    pub global_content_box_for_children: Option<CanvasRect>,
    pub float_value: String,
    pub has_position_offset: bool,
    pub parent_text_direction: Option<TextDirection>,
    pub has_transform: bool,
    pub border_radius: Option<Sides>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub text_decoration_line: Option<String>,
    /// Whether the element renders only text nodes.
    pub contains_only_text: bool,
    pub text_bounds: Option<CanvasRect>,
    pub computed_hug_property: HugProperties,
    pub container_grid_properties: GridContainerProperties,
    pub element_grid_properties: GridElementProperties,
    pub container_grid_properties_from_props: GridContainerProperties,
    pub element_grid_properties_from_props: GridElementProperties,
}

/// One metadata entry per element path.
///
/// Created by the walker when first observed, replaced wholesale on each
/// re-measure, and only ever patched in place through the explicit
/// [`ElementInstanceMetadata::patch_global_frame`] operation.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementInstanceMetadata {
    pub element_path: ElementPath,
    pub tag_name: String,
    pub global_frame: Option<MaybeInfinite<CanvasRect>>,
    pub non_rounded_global_frame: Option<MaybeInfinite<CanvasRect>>,
    pub special_size_measurements: SpecialSizeMeasurements,
    pub computed_style: Option<ComputedStyleSnapshot>,
    pub attribute_metadata: Option<StyleAttributeMetadata>,
    pub text_content: Option<String>,
    pub children_paths: Option<Vec<ElementPath>>,
    pub conditional_case: ConditionalCase,
}

impl ElementInstanceMetadata {
    /// Entry produced from a real measurement of a live node.
    #[allow(clippy::too_many_arguments)]
    pub fn measured(
        element_path: ElementPath,
        tag_name: impl Into<String>,
        global_frame: MaybeInfinite<CanvasRect>,
        non_rounded_global_frame: MaybeInfinite<CanvasRect>,
        special_size_measurements: SpecialSizeMeasurements,
        computed_style: Option<ComputedStyleSnapshot>,
        attribute_metadata: Option<StyleAttributeMetadata>,
        text_content: Option<String>,
    ) -> Self {
        Self {
            element_path,
            tag_name: tag_name.into(),
            global_frame: Some(global_frame),
            non_rounded_global_frame: Some(non_rounded_global_frame),
            special_size_measurements,
            computed_style,
            attribute_metadata,
            text_content,
            children_paths: None,
            conditional_case: ConditionalCase::NotAConditional,
        }
    }

    /// Entry synthesized for a structural ancestor with no live node;
    /// backfill fills the frames in afterwards.
    pub fn synthesized(element_path: ElementPath) -> Self {
        Self {
            element_path,
            tag_name: "unknown".to_owned(),
            global_frame: None,
            non_rounded_global_frame: None,
            special_size_measurements: SpecialSizeMeasurements::default(),
            computed_style: None,
            attribute_metadata: None,
            text_content: None,
            children_paths: None,
            conditional_case: ConditionalCase::NotAConditional,
        }
    }

    /// Replaces only the global frame, used for predictive updates after a
    /// group-resize command before the next walk lands.
    pub fn patch_global_frame(&mut self, frame: CanvasRect) {
        self.global_frame = Some(MaybeInfinite::Finite(frame));
    }

    pub fn local_frame(&self) -> Option<CanvasRect> {
        let global = self
            .global_frame
            .as_ref()
            .and_then(MaybeInfinite::as_finite)?;
        let origin = self
            .special_size_measurements
            .coordinate_system_bounds
            .map(|bounds| bounds.origin())
            .unwrap_or(CanvasPoint::ZERO);
        Some(global.translate(-origin.x, -origin.y))
    }
}

/// Mapping from path string to metadata entry; keys are unique and carry no
/// ordering guarantee.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementInstanceMetadataMap {
    entries: FxHashMap<String, ElementInstanceMetadata>,
}

impl ElementInstanceMetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, metadata: ElementInstanceMetadata) {
        self.entries
            .insert(metadata.element_path.to_path_string(), metadata);
    }

    pub fn get(&self, path: &ElementPath) -> Option<&ElementInstanceMetadata> {
        self.entries.get(&path.to_path_string())
    }

    pub fn get_mut(&mut self, path: &ElementPath) -> Option<&mut ElementInstanceMetadata> {
        self.entries.get_mut(&path.to_path_string())
    }

    pub fn get_by_string(&self, path: &str) -> Option<&ElementInstanceMetadata> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &ElementPath) -> bool {
        self.entries.contains_key(&path.to_path_string())
    }

    pub fn contains_key(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn remove(&mut self, path: &str) -> Option<ElementInstanceMetadata> {
        self.entries.remove(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &ElementInstanceMetadata> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ElementInstanceMetadata)> {
        self.entries.iter()
    }

    /// Overwrites entries from `other` on top of the receiver.
    pub fn merge_from(&mut self, other: &ElementInstanceMetadataMap) {
        for metadata in other.entries.values() {
            self.insert(metadata.clone());
        }
    }

    pub fn paths(&self) -> Vec<ElementPath> {
        self.entries
            .values()
            .map(|metadata| metadata.element_path.clone())
            .collect()
    }

    /// The element's frame in canvas coordinates, if measured.
    pub fn frame_in_canvas_coords(&self, path: &ElementPath) -> Option<MaybeInfinite<CanvasRect>> {
        self.get(path).and_then(|metadata| metadata.global_frame)
    }

    /// Children of `parent` in render order.
    ///
    /// The walker records the observed child order on the parent entry; when
    /// that is missing the map falls back to a deterministic scan ordered by
    /// path string.
    pub fn children_paths_ordered(&self, parent: &ElementPath) -> Vec<ElementPath> {
        if let Some(children) = self.get(parent).and_then(|m| m.children_paths.clone()) {
            return children;
        }
        let mut children: Vec<&ElementInstanceMetadata> = self
            .entries
            .values()
            .filter(|metadata| metadata.element_path.parent() == *parent)
            .collect();
        children.sort_by(|a, b| {
            a.element_path
                .to_path_string()
                .cmp(&b.element_path.to_path_string())
        });
        children
            .into_iter()
            .map(|metadata| metadata.element_path.clone())
            .collect()
    }

    /// The target's siblings (including itself) in render order.
    pub fn siblings_ordered(&self, target: &ElementPath) -> Vec<ElementPath> {
        self.children_paths_ordered(&target.parent())
    }
}

impl FromIterator<ElementInstanceMetadata> for ElementInstanceMetadataMap {
    fn from_iter<T: IntoIterator<Item = ElementInstanceMetadata>>(iter: T) -> Self {
        let mut map = Self::new();
        for metadata in iter {
            map.insert(metadata);
        }
        map
    }
}

#[cfg(test)]
#[path = "tests/metadata_tests.rs"]
mod tests;
