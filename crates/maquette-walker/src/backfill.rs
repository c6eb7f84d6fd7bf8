//! Backfill of structural ancestors with no live node

use maquette_geometry::{bounding_frame_from_children, CanvasRect, MaybeInfinite};
use maquette_model::{ElementInstanceMetadata, ElementInstanceMetadataMap, ElementPath};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Clone, Debug, Default)]
pub struct BackfillResult {
    /// Entries that existed in the input.
    pub updated_metadata: ElementInstanceMetadataMap,
    /// Entries synthesized for missing ancestors, kept separate so callers
    /// can distinguish measured from synthesized data.
    pub reconstructed_metadata: ElementInstanceMetadataMap,
}

impl BackfillResult {
    /// Both maps combined, synthesized entries included.
    pub fn merged(&self) -> ElementInstanceMetadataMap {
        let mut merged = self.updated_metadata.clone();
        merged.merge_from(&self.reconstructed_metadata);
        merged
    }
}

/// Reconstructs metadata for ancestors that have no live representation
/// (virtual roots, fragments) by aggregating descendant bounding geometry.
///
/// Missing ancestors are synthesized deepest-first so each parent can read
/// its children's frames, finished or synthesized. Idempotent: running it on
/// its own merged output is a no-op.
pub fn backfill_metadata(metadata: &ElementInstanceMetadataMap) -> BackfillResult {
    let mut missing_paths: FxHashSet<String> = FxHashSet::default();
    let mut children_by_parent: FxHashMap<String, Vec<String>> = FxHashMap::default();

    let mut note_child = |path: &ElementPath| {
        let parent_string = path.parent().to_path_string();
        children_by_parent
            .entry(parent_string)
            .or_default()
            .push(path.to_path_string());
    };

    for entry in metadata.values() {
        note_child(&entry.element_path);
        // Walk the ancestor chain, recording every ancestor the map lacks.
        let mut current = entry.element_path.parent();
        while !current.is_empty() {
            let current_string = current.to_path_string();
            if metadata.contains_key(&current_string) || missing_paths.contains(&current_string) {
                break;
            }
            note_child(&current);
            missing_paths.insert(current_string);
            current = current.parent();
        }
    }

    let mut paths_to_fill: Vec<ElementPath> = missing_paths
        .iter()
        .map(|path| ElementPath::from_string(path))
        .collect();
    // Deepest first, so parents aggregate already-synthesized children.
    paths_to_fill.sort_by(|a, b| {
        b.depth()
            .cmp(&a.depth())
            .then_with(|| b.to_path_string().cmp(&a.to_path_string()))
    });

    let mut filled = ElementInstanceMetadataMap::new();
    for path in &paths_to_fill {
        let path_string = path.to_path_string();
        let child_strings = children_by_parent
            .get(&path_string)
            .cloned()
            .unwrap_or_default();

        let lookup = |child: &str| -> Option<&ElementInstanceMetadata> {
            metadata.get_by_string(child).or_else(|| filled.get_by_string(child))
        };

        let child_frames: Vec<MaybeInfinite<CanvasRect>> = child_strings
            .iter()
            .filter_map(|child| lookup(child).and_then(|entry| entry.global_frame))
            .collect();
        let child_text_frames: Vec<MaybeInfinite<CanvasRect>> = child_strings
            .iter()
            .filter_map(|child| {
                lookup(child)
                    .and_then(|entry| entry.special_size_measurements.global_frame_with_text_content)
            })
            .collect();

        let bounding_frame = bounding_frame_from_children(&child_frames);
        let bounding_text_frame = bounding_frame_from_children(&child_text_frames);

        let mut entry = ElementInstanceMetadata::synthesized(path.clone());
        entry.global_frame = bounding_frame;
        entry.non_rounded_global_frame = bounding_frame;
        entry.special_size_measurements.global_frame_with_text_content = bounding_text_frame;
        filled.insert(entry);
    }

    BackfillResult {
        updated_metadata: metadata.clone(),
        reconstructed_metadata: filled,
    }
}

#[cfg(test)]
#[path = "tests/backfill_tests.rs"]
mod tests;
