use super::*;
use maquette_commands::{CanvasCommand, EditorState};
use maquette_geometry::CanvasVector;
use maquette_model::{ElementInstanceMetadataMap, FlexDirection};
use maquette_testing::metadata_entry_with_parent_bounds;

use crate::Modifiers;

fn path(value: &str) -> ElementPath {
    ElementPath::from_string(value)
}

/// Horizontal flex row "sb/list" with three 100x100 children side by side.
fn row_metadata(sibling_uids: &[&str]) -> ElementInstanceMetadataMap {
    let parent_frame = CanvasRect::new(0.0, 0.0, 100.0 * sibling_uids.len() as f64, 100.0);
    let mut map = ElementInstanceMetadataMap::new();

    let mut parent = maquette_testing::metadata_entry("sb/list", parent_frame);
    parent.children_paths = Some(
        sibling_uids
            .iter()
            .map(|uid| path(&format!("sb/list/{uid}")))
            .collect(),
    );
    map.insert(parent);

    for (index, uid) in sibling_uids.iter().enumerate() {
        let frame = CanvasRect::new(100.0 * index as f64, 0.0, 100.0, 100.0);
        let mut entry =
            metadata_entry_with_parent_bounds(&format!("sb/list/{uid}"), frame, parent_frame);
        entry.special_size_measurements.parent_layout_system = DetectedLayoutSystem::Flex;
        entry.special_size_measurements.parent_flex_direction = Some(FlexDirection::Row);
        map.insert(entry);
    }
    map
}

fn drag_session(start: (f64, f64), delta: (f64, f64)) -> InteractionSession {
    InteractionSession::drag(
        CanvasPoint::new(start.0, start.1),
        Some(CanvasVector::new(delta.0, delta.1)),
        Modifiers::NONE,
    )
}

fn reorder_commands(result: &StrategyApplicationResult) -> Vec<usize> {
    result
        .commands
        .iter()
        .filter_map(|command| match command {
            CanvasCommand::ReorderElement { index, .. } => Some(*index),
            _ => None,
        })
        .collect()
}

#[test]
fn dragging_into_the_next_siblings_strip_reorders_to_its_index() {
    let metadata = row_metadata(&["a", "b", "c"]);
    let editor = EditorState::new();
    let targets = [path("sb/list/b")];
    let canvas_state = CanvasState {
        editor: &editor,
        starting_metadata: &metadata,
        interaction_targets: &targets,
        scale: 1.0,
        canvas_offset: CanvasVector::ZERO,
    };
    // index 1, dragged so the pointer lands inside c's strip (x 200..300)
    let session = drag_session((150.0, 50.0), (100.0, 0.0));
    let custom = CustomStrategyState::default();

    let result = apply_reorder(&canvas_state, &session, &custom);
    assert_eq!(result.status, StrategyStatus::Success);
    assert_eq!(reorder_commands(&result), vec![2]);
    assert_eq!(result.custom_state_patch.last_reorder_idx, Some(2));
}

#[test]
fn no_reorder_command_when_the_index_is_unchanged() {
    let metadata = row_metadata(&["a", "b", "c"]);
    let editor = EditorState::new();
    let targets = [path("sb/list/b")];
    let canvas_state = CanvasState {
        editor: &editor,
        starting_metadata: &metadata,
        interaction_targets: &targets,
        scale: 1.0,
        canvas_offset: CanvasVector::ZERO,
    };
    // pointer stays inside b's own strip
    let session = drag_session((150.0, 50.0), (10.0, 0.0));
    let custom = CustomStrategyState::default();

    let result = apply_reorder(&canvas_state, &session, &custom);
    assert_eq!(result.status, StrategyStatus::Success);
    assert!(reorder_commands(&result).is_empty());
    // but the cursor/highlight refresh still runs
    assert!(!result.commands.is_empty());
    assert_eq!(result.custom_state_patch.last_reorder_idx, Some(1));
}

#[test]
fn any_generated_sibling_blocks_reordering_entirely() {
    let metadata = row_metadata(&["a", "b", "c~~~2"]);
    let editor = EditorState::new();
    let targets = [path("sb/list/b")];
    let canvas_state = CanvasState {
        editor: &editor,
        starting_metadata: &metadata,
        interaction_targets: &targets,
        scale: 1.0,
        canvas_offset: CanvasVector::ZERO,
    };
    let session = drag_session((150.0, 50.0), (100.0, 0.0));
    let custom = CustomStrategyState::default();

    let result = apply_reorder(&canvas_state, &session, &custom);
    assert_eq!(result.status, StrategyStatus::Failure);
    assert!(reorder_commands(&result).is_empty());
    assert!(matches!(
        result.commands.as_slice(),
        [CanvasCommand::SetCursor {
            cursor: Some(maquette_commands::CssCursor::NotPermitted),
            ..
        }]
    ));
}

#[test]
fn losing_the_target_momentarily_keeps_the_last_resolved_index() {
    let metadata = row_metadata(&["a", "b", "c"]);
    let editor = EditorState::new();
    let targets = [path("sb/list/b")];
    let canvas_state = CanvasState {
        editor: &editor,
        starting_metadata: &metadata,
        interaction_targets: &targets,
        scale: 1.0,
        canvas_offset: CanvasVector::ZERO,
    };
    // pointer beyond every strip
    let session = drag_session((150.0, 50.0), (400.0, 0.0));
    let custom = CustomStrategyState {
        last_reorder_idx: Some(2),
        ..Default::default()
    };

    let result = apply_reorder(&canvas_state, &session, &custom);
    assert_eq!(reorder_commands(&result), vec![2]);
    assert_eq!(result.custom_state_patch.last_reorder_idx, Some(2));
}

#[test]
fn reorder_allowed_is_a_whole_sibling_set_check() {
    assert!(is_reorder_allowed(&[path("sb/a"), path("sb/b")]));
    assert!(!is_reorder_allowed(&[path("sb/a"), path("sb/b~~~1")]));
}

#[test]
fn candidate_requires_drag_and_reorderable_parent() {
    let metadata = row_metadata(&["a", "b", "c"]);
    let editor = EditorState::new();
    let targets = [path("sb/list/b")];
    let canvas_state = CanvasState {
        editor: &editor,
        starting_metadata: &metadata,
        interaction_targets: &targets,
        scale: 1.0,
        canvas_offset: CanvasVector::ZERO,
    };
    let session = drag_session((150.0, 50.0), (10.0, 0.0));
    assert!(reorder_candidate(&canvas_state, &session).is_some());

    let no_targets: [ElementPath; 0] = [];
    let empty_state = CanvasState {
        interaction_targets: &no_targets,
        ..canvas_state
    };
    assert!(reorder_candidate(&empty_state, &session).is_none());
}
