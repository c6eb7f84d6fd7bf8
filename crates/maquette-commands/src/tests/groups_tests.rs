use super::*;
use crate::{
    fold_and_apply_commands, push_intended_bounds_and_update_groups, StyleStore, StyleValue,
};
use maquette_testing::metadata_entry;

fn path(value: &str) -> ElementPath {
    ElementPath::from_string(value)
}

fn style_store(entries: &[(&str, StyleValue)]) -> StyleStore {
    let mut store = StyleStore::default();
    for (property, value) in entries {
        store.insert((*property).to_owned(), value.clone());
    }
    store
}

fn entry_with_bounds(
    path_str: &str,
    frame: CanvasRect,
    coordinate_system_bounds: CanvasRect,
) -> maquette_model::ElementInstanceMetadata {
    let mut entry = metadata_entry(path_str, frame);
    entry.special_size_measurements.coordinate_system_bounds = Some(coordinate_system_bounds);
    entry
}

/// Group (0,0,100,100) with two unconstrained children filling it.
fn group_fixture() -> EditorState {
    let container_bounds = CanvasRect::new(0.0, 0.0, 1000.0, 1000.0);
    let group_frame = CanvasRect::new(0.0, 0.0, 100.0, 100.0);

    let mut state = EditorState::new();
    state.metadata.insert(entry_with_bounds("sb/group", group_frame, container_bounds));
    state.metadata.insert(entry_with_bounds(
        "sb/group/c1",
        CanvasRect::new(0.0, 0.0, 40.0, 100.0),
        group_frame,
    ));
    state.metadata.insert(entry_with_bounds(
        "sb/group/c2",
        CanvasRect::new(60.0, 0.0, 40.0, 100.0),
        group_frame,
    ));
    state.group_containers.insert("sb/group".to_owned());
    state.child_order.insert(
        "sb/group".to_owned(),
        vec![path("sb/group/c1"), path("sb/group/c2")],
    );
    state.style_stores.insert(
        "sb/group/c1".to_owned(),
        style_store(&[
            ("left", StyleValue::Px(0.0)),
            ("top", StyleValue::Px(0.0)),
            ("width", StyleValue::Px(40.0)),
            ("height", StyleValue::Px(100.0)),
        ]),
    );
    state.style_stores.insert(
        "sb/group/c2".to_owned(),
        style_store(&[
            ("left", StyleValue::Px(60.0)),
            ("top", StyleValue::Px(0.0)),
            ("width", StyleValue::Px(40.0)),
            ("height", StyleValue::Px(100.0)),
        ]),
    );
    state
}

#[test]
fn group_resize_scales_unconstrained_children_to_fill_the_new_bounds() {
    let state = group_fixture();
    let command = push_intended_bounds_and_update_groups(
        vec![FrameAndTarget {
            target: path("sb/group"),
            frame: CanvasRect::new(0.0, 0.0, 200.0, 100.0),
        }],
        MetadataSource::StartingMetadata,
    );

    let outcome =
        fold_and_apply_commands(&state, &[command], InteractionLifecycle::EndInteraction);
    let updated = &outcome.updated_state;

    let c1 = path("sb/group/c1");
    let c2 = path("sb/group/c2");
    assert_eq!(updated.style_value(&c1, "left"), Some(&StyleValue::Px(0.0)));
    assert_eq!(updated.style_value(&c1, "width"), Some(&StyleValue::Px(80.0)));
    assert_eq!(updated.style_value(&c2, "left"), Some(&StyleValue::Px(120.0)));
    assert_eq!(updated.style_value(&c2, "width"), Some(&StyleValue::Px(80.0)));
    // combined bounding box fills the new intended width exactly
    assert_eq!(
        updated
            .style_value(&c2, "left")
            .and_then(StyleValue::as_number)
            .unwrap()
            + updated
                .style_value(&c2, "width")
                .and_then(StyleValue::as_number)
                .unwrap(),
        200.0
    );
    // heights are untouched on the unchanged axis
    assert_eq!(updated.style_value(&c1, "height"), Some(&StyleValue::Px(100.0)));

    // the resized children queue a follow-up true-up on commit
    assert!(outcome
        .state_patches
        .iter()
        .any(|patch| matches!(patch, StatePatch::QueueGroupTrueUps(children) if children.len() == 2)));
}

#[test]
fn hug_constrained_dimension_is_excluded_from_scaling() {
    let mut state = group_fixture();
    state
        .style_stores
        .get_mut("sb/group/c1")
        .unwrap()
        .insert("width".to_owned(), StyleValue::keyword("max-content"));

    let command = push_intended_bounds_and_update_groups(
        vec![FrameAndTarget {
            target: path("sb/group"),
            frame: CanvasRect::new(0.0, 0.0, 200.0, 100.0),
        }],
        MetadataSource::StartingMetadata,
    );
    let outcome =
        fold_and_apply_commands(&state, &[command], InteractionLifecycle::EndInteraction);

    // width stays authored as max-content; only the pins scale
    assert_eq!(
        outcome
            .updated_state
            .style_value(&path("sb/group/c1"), "width"),
        Some(&StyleValue::keyword("max-content"))
    );
}

#[test]
fn mid_interaction_pushes_intended_bounds_patch() {
    let state = group_fixture();
    let bounds = vec![FrameAndTarget {
        target: path("sb/group"),
        frame: CanvasRect::new(0.0, 0.0, 200.0, 100.0),
    }];
    let command = push_intended_bounds_and_update_groups(
        bounds.clone(),
        MetadataSource::StartingMetadata,
    );

    let outcome =
        fold_and_apply_commands(&state, &[command], InteractionLifecycle::MidInteraction);
    assert!(outcome
        .updated_state
        .strategy_intended_bounds
        .iter()
        .any(|ft| ft.target == path("sb/group")));
    // the queued true-up belongs to commit, not preview
    assert!(!outcome
        .state_patches
        .iter()
        .any(|patch| matches!(patch, StatePatch::QueueGroupTrueUps(_))));
}

/// Ancestor refit: resizing a child of a group refits the group to the union
/// of child frames and re-anchors its children by the inverse delta.
#[test]
fn ancestor_group_is_refitted_and_children_reanchored() {
    let container_bounds = CanvasRect::new(0.0, 0.0, 1000.0, 1000.0);
    let group_frame = CanvasRect::new(10.0, 10.0, 100.0, 100.0);

    let mut state = EditorState::new();
    state.metadata.insert(entry_with_bounds("sb/group", group_frame, container_bounds));
    state.metadata.insert(entry_with_bounds(
        "sb/group/c1",
        CanvasRect::new(10.0, 10.0, 40.0, 40.0),
        group_frame,
    ));
    state.metadata.insert(entry_with_bounds(
        "sb/group/c2",
        CanvasRect::new(50.0, 50.0, 60.0, 60.0),
        group_frame,
    ));
    state.group_containers.insert("sb/group".to_owned());
    state.child_order.insert(
        "sb/group".to_owned(),
        vec![path("sb/group/c1"), path("sb/group/c2")],
    );
    state.style_stores.insert(
        "sb/group".to_owned(),
        style_store(&[
            ("left", StyleValue::Px(10.0)),
            ("top", StyleValue::Px(10.0)),
            ("width", StyleValue::Px(100.0)),
            ("height", StyleValue::Px(100.0)),
        ]),
    );
    state.style_stores.insert(
        "sb/group/c1".to_owned(),
        style_store(&[("left", StyleValue::Px(0.0)), ("top", StyleValue::Px(0.0))]),
    );
    state.style_stores.insert(
        "sb/group/c2".to_owned(),
        style_store(&[("left", StyleValue::Px(40.0)), ("top", StyleValue::Px(40.0))]),
    );

    // c1 is dragged/resized so its frame now starts at the canvas origin.
    let command = push_intended_bounds_and_update_groups(
        vec![FrameAndTarget {
            target: path("sb/group/c1"),
            frame: CanvasRect::new(0.0, 0.0, 50.0, 50.0),
        }],
        MetadataSource::StartingMetadata,
    );
    let outcome =
        fold_and_apply_commands(&state, &[command], InteractionLifecycle::EndInteraction);
    let updated = &outcome.updated_state;

    let group = path("sb/group");
    // union of c2 (50,50,60,60) and the new c1 (0,0,50,50)
    assert_eq!(updated.style_value(&group, "left"), Some(&StyleValue::Px(0.0)));
    assert_eq!(updated.style_value(&group, "top"), Some(&StyleValue::Px(0.0)));
    assert_eq!(updated.style_value(&group, "width"), Some(&StyleValue::Px(110.0)));
    assert_eq!(updated.style_value(&group, "height"), Some(&StyleValue::Px(110.0)));

    // the measured frame is patched predictively
    assert_eq!(
        updated.metadata.get(&group).unwrap().global_frame,
        Some(maquette_geometry::MaybeInfinite::Finite(CanvasRect::new(
            0.0, 0.0, 110.0, 110.0
        )))
    );

    // children re-anchor by the inverse origin delta, staying visually put
    assert_eq!(
        updated.style_value(&path("sb/group/c2"), "left"),
        Some(&StyleValue::Px(50.0))
    );
    assert_eq!(
        updated.style_value(&path("sb/group/c2"), "top"),
        Some(&StyleValue::Px(50.0))
    );
}
