//! Metadata fixtures shared across crate tests

use maquette_geometry::{CanvasRect, MaybeInfinite};
use maquette_model::{
    ElementInstanceMetadata, ElementInstanceMetadataMap, ElementPath, SpecialSizeMeasurements,
};

/// A measured entry with the given frame and neutral measurements.
pub fn metadata_entry(path: &str, frame: CanvasRect) -> ElementInstanceMetadata {
    ElementInstanceMetadata::measured(
        ElementPath::from_string(path),
        "div",
        MaybeInfinite::Finite(frame),
        MaybeInfinite::Finite(frame),
        SpecialSizeMeasurements::default(),
        None,
        None,
        None,
    )
}

/// A measured entry whose parent bounds are also recorded, as the reorder
/// strategy expects.
pub fn metadata_entry_with_parent_bounds(
    path: &str,
    frame: CanvasRect,
    parent_bounds: CanvasRect,
) -> ElementInstanceMetadata {
    let mut entry = metadata_entry(path, frame);
    entry.special_size_measurements.immediate_parent_bounds = Some(parent_bounds);
    entry
}

/// Builds a map from `(path, frame)` pairs.
pub fn metadata_map(entries: &[(&str, CanvasRect)]) -> ElementInstanceMetadataMap {
    entries
        .iter()
        .map(|(path, frame)| metadata_entry(path, *frame))
        .collect()
}
