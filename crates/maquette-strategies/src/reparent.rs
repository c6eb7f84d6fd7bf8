//! Flex→absolute reparent strategy
//!
//! Dragging a flex child into a new parent converts it to absolute
//! positioning and defers the actual reparent to run against the
//! already-patched state. When the new parent is a descendant of the current
//! parent, a hidden placeholder duplicate is left behind first so the new
//! parent's layout does not shift as the original is removed.

use maquette_commands::{
    delete_properties, duplicate_element, fold_and_apply_commands, generate_consistent_uid,
    set_cursor_command, set_css_length_property, set_property, update_function_command,
    wildcard_patch, CanvasCommand, CreateIfNotExistent, CssCursor, InteractionLifecycle,
    StatePatch, StyleValue, UpdateFunction, WhenToRun,
};
use maquette_model::{DetectedLayoutSystem, ElementInstanceMetadataMap, ElementPath};
use rustc_hash::FxHashMap;

use crate::{
    CanvasState, ControlDescriptor, ControlKind, ControlVisibility, CustomStrategyState,
    CustomStrategyStatePatch, InteractionSession, StrategyApplicationResult, StrategyCandidate,
    StrategyKind, StrategyStatus,
};

pub fn flex_reparent_candidate(
    canvas_state: &CanvasState<'_>,
    session: &InteractionSession,
) -> Option<StrategyCandidate> {
    session.drag_data()?;
    let reparent_target = session.active_reparent_target.as_ref()?;
    let target = canvas_state.interaction_targets.first()?;
    let entry = canvas_state.starting_metadata.get(target)?;
    if entry.special_size_measurements.parent_layout_system != DetectedLayoutSystem::Flex {
        return None;
    }
    Some(StrategyCandidate {
        kind: StrategyKind::FlexReparentToAbsolute,
        id: "FLEX_REPARENT_TO_ABSOLUTE",
        name: "Reparent (Abs)",
        fitness: 3.0,
        controls_to_render: vec![
            ControlDescriptor {
                key: "ghost-outline-control",
                kind: ControlKind::DragOutline,
                targets: canvas_state.interaction_targets.to_vec(),
                visibility: ControlVisibility::VisibleOnlyWhileActive,
            },
            ControlDescriptor {
                key: "parent-outlines-control",
                kind: ControlKind::ParentOutlines,
                targets: vec![reparent_target.new_parent.clone()],
                visibility: ControlVisibility::VisibleOnlyWhileActive,
            },
            ControlDescriptor {
                key: "parent-bounds-control",
                kind: ControlKind::ParentBounds,
                targets: vec![reparent_target.new_parent.clone()],
                visibility: ControlVisibility::VisibleOnlyWhileActive,
            },
            ControlDescriptor {
                key: "zero-size-control",
                kind: ControlKind::ZeroSizedElements,
                targets: vec![],
                visibility: ControlVisibility::VisibleOnlyWhileActive,
            },
        ],
    })
}

/// Drops selected elements whose ancestor is also selected; dragging the
/// ancestor already moves them.
pub fn drag_targets(selection: &[ElementPath]) -> Vec<ElementPath> {
    selection
        .iter()
        .filter(|path| {
            !selection
                .iter()
                .any(|other| *path != other && path.is_descendant_of(other))
        })
        .cloned()
        .collect()
}

fn allowed_to_reparent(targets: &[ElementPath]) -> bool {
    targets
        .iter()
        .all(|target| !target.is_root_of_generated_element() && !target.parent().is_empty())
}

pub fn apply_flex_reparent(
    canvas_state: &CanvasState<'_>,
    session: &InteractionSession,
    custom_state: &CustomStrategyState,
    _lifecycle: InteractionLifecycle,
) -> StrategyApplicationResult {
    let Some(reparent_target) = session.active_reparent_target.clone() else {
        return StrategyApplicationResult::empty();
    };
    let Some(drag_data) = session.drag_data() else {
        return StrategyApplicationResult::empty();
    };
    if drag_data.drag.is_none() {
        return StrategyApplicationResult::empty();
    }

    let targets = drag_targets(canvas_state.interaction_targets);
    if !allowed_to_reparent(&targets) {
        return StrategyApplicationResult::new(
            vec![set_cursor_command(CssCursor::NotPermitted)],
            CustomStrategyStatePatch::default(),
            StrategyStatus::Failure,
        );
    }

    let new_parent = reparent_target.new_parent.clone();
    let mut duplicated_element_new_uids = custom_state.duplicated_element_new_uids.clone();

    let placeholder_commands = placeholder_clone_commands(
        canvas_state,
        &targets,
        &new_parent,
        &mut duplicated_element_new_uids,
    );

    let escape_hatch_commands =
        escape_hatch_commands(&targets, canvas_state.starting_metadata);

    // The reparent must see the placeholder patches, so it is computed at
    // fold time against the post-patch state rather than the state captured
    // here.
    let deferred_targets = targets.clone();
    let deferred_parent = new_parent.clone();
    let deferred = update_function_command(
        WhenToRun::Always,
        UpdateFunction::new(move |editor, lifecycle| {
            let commands =
                absolute_reparent_commands(editor, &deferred_targets, &deferred_parent);
            fold_and_apply_commands(editor, &commands, lifecycle).state_patches
        }),
    );

    let mut commands = placeholder_commands;
    commands.extend(escape_hatch_commands);
    commands.push(deferred);

    StrategyApplicationResult::new(
        commands,
        CustomStrategyStatePatch {
            duplicated_element_new_uids: Some(duplicated_element_new_uids),
            ..Default::default()
        },
        StrategyStatus::Success,
    )
}

fn placeholder_clone_commands(
    canvas_state: &CanvasState<'_>,
    targets: &[ElementPath],
    new_parent: &ElementPath,
    duplicated_element_new_uids: &mut FxHashMap<String, String>,
) -> Vec<CanvasCommand> {
    let mut commands = Vec::new();
    for element in targets {
        let new_parent_is_descendant_of_current =
            new_parent.is_descendant_of(&element.parent());
        if !new_parent_is_descendant_of_current {
            continue;
        }

        let element_string = element.to_path_string();
        let new_uid = match duplicated_element_new_uids.get(&element_string) {
            Some(uid) => uid.clone(),
            None => {
                let mut existing = canvas_state.editor.existing_uids();
                existing.extend(duplicated_element_new_uids.values().cloned());
                let uid = generate_consistent_uid(&existing);
                duplicated_element_new_uids.insert(element_string, uid.clone());
                uid
            }
        };
        let new_path = element.parent().append(&new_uid);

        commands.push(duplicate_element(
            WhenToRun::MidInteraction,
            element,
            &new_uid,
        ));
        commands.push(wildcard_patch(
            WhenToRun::MidInteraction,
            StatePatch::AddHiddenInstance(new_path),
        ));
    }
    commands
}

/// Converts layout-governed position/size into explicit absolute pins.
pub fn escape_hatch_commands(
    targets: &[ElementPath],
    metadata: &ElementInstanceMetadataMap,
) -> Vec<CanvasCommand> {
    let mut commands = Vec::new();
    for target in targets {
        let Some(entry) = metadata.get(target) else {
            continue;
        };
        let Some(local_frame) = entry.local_frame() else {
            continue;
        };
        let parent_bounds = entry.special_size_measurements.coordinate_system_bounds;

        commands.push(set_property(
            WhenToRun::Always,
            target,
            "position",
            StyleValue::keyword("absolute"),
        ));
        commands.push(set_css_length_property(
            WhenToRun::Always,
            target,
            "left",
            local_frame.x,
            parent_bounds.map(|bounds| bounds.width),
            CreateIfNotExistent::CreateIfNotExisting,
        ));
        commands.push(set_css_length_property(
            WhenToRun::Always,
            target,
            "top",
            local_frame.y,
            parent_bounds.map(|bounds| bounds.height),
            CreateIfNotExistent::CreateIfNotExisting,
        ));
        commands.push(set_css_length_property(
            WhenToRun::Always,
            target,
            "width",
            local_frame.width,
            parent_bounds.map(|bounds| bounds.width),
            CreateIfNotExistent::CreateIfNotExisting,
        ));
        commands.push(set_css_length_property(
            WhenToRun::Always,
            target,
            "height",
            local_frame.height,
            parent_bounds.map(|bounds| bounds.height),
            CreateIfNotExistent::CreateIfNotExisting,
        ));
        commands.push(delete_properties(
            WhenToRun::Always,
            target,
            &["flexGrow", "flexShrink", "flexBasis", "alignSelf"],
        ));
    }
    commands
}

/// The reparent itself, computed against the current (post-patch) state.
fn absolute_reparent_commands(
    editor: &maquette_commands::EditorState,
    targets: &[ElementPath],
    new_parent: &ElementPath,
) -> Vec<CanvasCommand> {
    let mut commands = Vec::new();
    let new_parent_origin = editor
        .metadata
        .get(new_parent)
        .and_then(|entry| entry.global_frame)
        .and_then(|frame| frame.into_finite())
        .map(|frame| frame.origin());

    for target in targets {
        let Some(uid) = target.uid().map(str::to_owned) else {
            continue;
        };
        let new_path = new_parent.append(&uid);

        commands.push(wildcard_patch(
            WhenToRun::Always,
            StatePatch::ReparentElement {
                target: target.clone(),
                new_parent: new_parent.clone(),
            },
        ));

        let global_origin = editor
            .metadata
            .get(target)
            .and_then(|entry| entry.global_frame)
            .and_then(|frame| frame.into_finite())
            .map(|frame| frame.origin());
        if let (Some(global), Some(parent_origin)) = (global_origin, new_parent_origin) {
            commands.push(set_css_length_property(
                WhenToRun::Always,
                &new_path,
                "left",
                global.x - parent_origin.x,
                None,
                CreateIfNotExistent::CreateIfNotExisting,
            ));
            commands.push(set_css_length_property(
                WhenToRun::Always,
                &new_path,
                "top",
                global.y - parent_origin.y,
                None,
                CreateIfNotExistent::CreateIfNotExisting,
            ));
        }
    }
    commands
}

#[cfg(test)]
#[path = "tests/reparent_tests.rs"]
mod tests;
