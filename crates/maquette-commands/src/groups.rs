//! Group bounds propagation: resize children, true up ancestors

use log::debug;
use maquette_geometry::{
    bounding_rectangle_array, transform_constrained_frame, CanvasRect, FramePoint, FramePoints,
    MaybeInfinite, Size,
};
use maquette_model::ElementPath;

use crate::{
    adjust_css_length_properties, fold_and_apply_commands_simple, set_css_length_property,
    CanvasCommand, CommandResult, CreateIfNotExistent, EditorState, FrameAndTarget,
    InteractionLifecycle, LengthPropertyToAdjust, MetadataSource, StatePatch, WhenToRun,
};

/// Interpreter for `PUSH_INTENDED_BOUNDS_AND_UPDATE_GROUPS`.
///
/// 1. Group targets have their children's six-point frames rescaled into the
///    group's new bounding box.
/// 2. Ancestor chains are walked upward: every group parent is refitted to
///    the union of its children's frames.
/// 3. Refitted ancestors keep their children visually stationary by
///    re-anchoring them with the inverse of the ancestor's frame delta.
pub fn run_push_intended_bounds(
    state: &EditorState,
    value: &[FrameAndTarget],
    source: MetadataSource,
    lifecycle: InteractionLifecycle,
) -> CommandResult {
    let is_queued_true_up = source == MetadataSource::LiveMetadata;

    let (state_after_children, mut patches, resized_children) =
        update_resized_group_children(state, value, source);

    let (ancestor_patches, ancestor_intended_bounds) =
        resize_ancestor_groups(&state_after_children, value, is_queued_true_up);
    patches.extend(ancestor_patches);

    if lifecycle == InteractionLifecycle::MidInteraction {
        let mut intended = value.to_vec();
        intended.extend(ancestor_intended_bounds);
        patches.push(StatePatch::PushIntendedBounds(intended));
    }

    // The follow-up true-up re-runs this command with live metadata once the
    // walker has re-measured; queuing it again would loop.
    if lifecycle == InteractionLifecycle::EndInteraction
        && !is_queued_true_up
        && !resized_children.is_empty()
    {
        patches.push(StatePatch::QueueGroupTrueUps(resized_children));
    }

    let description = format!(
        "Set Intended Bounds for {}",
        value
            .iter()
            .map(|ft| ft.target.to_path_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    CommandResult {
        patches,
        description,
    }
}

/// Elements that render no node of their own are retargeted to their
/// rendered descendants.
pub fn replace_fragment_like_paths_with_children(
    state: &EditorState,
    paths: &[ElementPath],
) -> Vec<ElementPath> {
    let mut result = Vec::new();
    for path in paths {
        if is_fragment_like(state, path) {
            let children = state.children_of(path);
            if children.is_empty() {
                continue;
            }
            result.extend(replace_fragment_like_paths_with_children(state, &children));
        } else {
            result.push(path.clone());
        }
    }
    result
}

fn is_fragment_like(state: &EditorState, path: &ElementPath) -> bool {
    match state.metadata.get(path) {
        Some(entry) => entry.global_frame.is_none(),
        None => true,
    }
}

/// Walks up from `path` until an element with a rendered frame is found.
pub fn first_rendered_ancestor(state: &EditorState, path: &ElementPath) -> Option<ElementPath> {
    let mut current = path.clone();
    while !current.is_empty() {
        if !is_fragment_like(state, &current) {
            return Some(current);
        }
        current = current.parent();
    }
    None
}

fn finite_global_frame(state: &EditorState, path: &ElementPath) -> Option<CanvasRect> {
    state
        .metadata
        .get(path)
        .and_then(|entry| entry.global_frame)
        .and_then(MaybeInfinite::into_finite)
}

fn update_resized_group_children(
    state: &EditorState,
    value: &[FrameAndTarget],
    source: MetadataSource,
) -> (EditorState, Vec<StatePatch>, Vec<ElementPath>) {
    struct ResizedChild {
        target: ElementPath,
        frame: FramePoints,
        parent_size: Size,
    }

    let mut queue: Vec<(ElementPath, Size)> = value
        .iter()
        .map(|ft| (ft.target.clone(), ft.frame.size()))
        .collect();
    let mut resized: Vec<ResizedChild> = Vec::new();

    let mut index = 0;
    while index < queue.len() {
        let (target, updated_size) = queue[index].clone();
        index += 1;

        if !state.is_group(&target) {
            continue;
        }
        let children = state.children_of(&target);

        let original_size: Option<Size> = match source {
            // The starting metadata still holds the pre-gesture measurement.
            MetadataSource::StartingMetadata => state
                .metadata
                .get(&target)
                .and_then(|entry| entry.local_frame())
                .map(|frame| frame.size()),
            // Live metadata already reflects the resized group, so the
            // original extent is the children's not-yet-updated AABB.
            MetadataSource::LiveMetadata => {
                let frames: Vec<CanvasRect> = children
                    .iter()
                    .filter_map(|child| finite_global_frame(state, child))
                    .collect();
                bounding_rectangle_array(&frames).map(|rect| rect.size())
            }
        };
        let Some(original_size) = original_size else {
            debug!("group true-up: no original size for {target}, skipping");
            continue;
        };

        let retargeted = replace_fragment_like_paths_with_children(state, &children);
        for child in retargeted {
            let Some(local_frame) = state.metadata.get(&child).and_then(|m| m.local_frame())
            else {
                continue;
            };

            let mut constrained: Vec<FramePoint> = state.constraints_for(&child);
            if state.is_hug_from_style(&child, "width") {
                constrained.push(FramePoint::Width);
            }
            if state.is_hug_from_style(&child, "height") {
                constrained.push(FramePoint::Height);
            }

            let frame_points = FramePoints::from_local_rect(local_frame, original_size);
            let resized_frame = transform_constrained_frame(
                updated_size,
                original_size,
                frame_points,
                &constrained,
            )
            .round_to_nearest_whole();

            queue.push((child.clone(), resized_frame.size()));
            resized.push(ResizedChild {
                target: child,
                frame: resized_frame,
                parent_size: updated_size,
            });
        }
    }

    let mut commands: Vec<CanvasCommand> = Vec::new();
    let mut resized_paths: Vec<ElementPath> = Vec::new();
    for child in &resized {
        resized_paths.push(child.target.clone());
        commands.extend(set_element_pins(state, child.target.clone(), child.frame, child.parent_size));
    }

    let (updated_state, patches) = fold_and_apply_commands_simple(state, &commands);
    (updated_state, patches, resized_paths)
}

fn set_element_pins(
    state: &EditorState,
    target: ElementPath,
    frame: FramePoints,
    parent_size: Size,
) -> Vec<CanvasCommand> {
    let do_not_create = CreateIfNotExistent::DoNotCreateIfNotExisting;
    let mut commands = vec![
        set_css_length_property(
            WhenToRun::Always,
            &target,
            "left",
            frame.left,
            Some(parent_size.width),
            do_not_create,
        ),
        set_css_length_property(
            WhenToRun::Always,
            &target,
            "top",
            frame.top,
            Some(parent_size.height),
            do_not_create,
        ),
        set_css_length_property(
            WhenToRun::Always,
            &target,
            "right",
            frame.right,
            Some(parent_size.width),
            do_not_create,
        ),
        set_css_length_property(
            WhenToRun::Always,
            &target,
            "bottom",
            frame.bottom,
            Some(parent_size.height),
            do_not_create,
        ),
    ];
    if !state.is_hug_from_style(&target, "width") {
        commands.push(set_css_length_property(
            WhenToRun::Always,
            &target,
            "width",
            frame.width,
            Some(parent_size.width),
            do_not_create,
        ));
    }
    if !state.is_hug_from_style(&target, "height") {
        commands.push(set_css_length_property(
            WhenToRun::Always,
            &target,
            "height",
            frame.height,
            Some(parent_size.height),
            do_not_create,
        ));
    }
    commands
}

fn resize_ancestor_groups(
    state: &EditorState,
    value: &[FrameAndTarget],
    is_queued_true_up: bool,
) -> (Vec<StatePatch>, Vec<FrameAndTarget>) {
    let mut targets: Vec<FrameAndTarget> = value.to_vec();
    let mut updated_global_frames: Vec<FrameAndTarget> = Vec::new();

    let frame_of = |updated: &[FrameAndTarget], path: &ElementPath| -> Option<CanvasRect> {
        updated
            .iter()
            .find(|ft| ft.target == *path)
            .map(|ft| ft.frame)
            .or_else(|| finite_global_frame(state, path))
    };

    // Whenever a target's parent is itself a group, refit the parent to the
    // union of sibling frames plus the new target frame, and keep going up.
    let mut index = 0;
    while index < targets.len() {
        let frame_and_target = targets[index].clone();
        index += 1;

        let Some(parent) =
            first_rendered_ancestor(state, &frame_and_target.target.parent())
        else {
            continue;
        };
        if parent.is_empty() || !state.is_group(&parent) {
            continue;
        }

        let sibling_frames: Vec<CanvasRect> = state
            .children_of(&parent)
            .into_iter()
            .filter(|child| *child != frame_and_target.target)
            .filter_map(|child| frame_of(&updated_global_frames, &child))
            .collect();

        let mut all_frames = sibling_frames;
        all_frames.push(frame_and_target.frame);
        let Some(new_global_frame) = bounding_rectangle_array(&all_frames) else {
            continue;
        };

        updated_global_frames.retain(|ft| ft.target != parent);
        updated_global_frames.push(FrameAndTarget {
            target: parent.clone(),
            frame: new_global_frame,
        });
        targets.push(FrameAndTarget {
            target: parent,
            frame: new_global_frame,
        });
    }

    let create_size = if is_queued_true_up {
        CreateIfNotExistent::DoNotCreateIfNotExisting
    } else {
        CreateIfNotExistent::CreateIfNotExisting
    };

    let mut commands: Vec<CanvasCommand> = Vec::new();
    for frame_and_target in &updated_global_frames {
        let Some(current_frame) = finite_global_frame(state, &frame_and_target.target) else {
            continue;
        };
        let updated_frame = frame_and_target.frame;

        commands.extend(set_group_pins(
            state,
            &frame_and_target.target,
            current_frame,
            updated_frame,
            create_size,
        ));
        // Predictively patch the measured frame so later commands in the
        // same batch see the refitted group before the next walk.
        commands.push(crate::wildcard_patch(
            WhenToRun::Always,
            StatePatch::PatchMetadataGlobalFrame {
                target: frame_and_target.target.clone(),
                frame: updated_frame,
            },
        ));

        let delta = current_frame.difference(&updated_frame);
        if !delta.is_zero_delta() {
            for child in state.children_of(&frame_and_target.target) {
                commands.extend(keep_element_put_in_parent(
                    state,
                    &child,
                    current_frame,
                    updated_frame,
                ));
            }
        }
    }

    let (_, patches) = fold_and_apply_commands_simple(state, &commands);
    (patches, updated_global_frames)
}

fn coordinate_system_size(state: &EditorState, target: &ElementPath) -> (Option<f64>, Option<f64>) {
    let bounds = state
        .metadata
        .get(target)
        .and_then(|entry| entry.special_size_measurements.coordinate_system_bounds);
    (
        bounds.map(|rect| rect.width),
        bounds.map(|rect| rect.height),
    )
}

fn set_group_pins(
    state: &EditorState,
    target: &ElementPath,
    current: CanvasRect,
    updated: CanvasRect,
    create_size: CreateIfNotExistent,
) -> Vec<CanvasCommand> {
    let (parent_width, parent_height) = coordinate_system_size(state, target);
    vec![
        adjust_css_length_properties(
            WhenToRun::Always,
            target,
            vec![
                LengthPropertyToAdjust::new("top", updated.y - current.y, parent_height),
                LengthPropertyToAdjust::new("left", updated.x - current.x, parent_width),
                LengthPropertyToAdjust::new("right", current.right() - updated.right(), parent_width),
                LengthPropertyToAdjust::new(
                    "bottom",
                    current.bottom() - updated.bottom(),
                    parent_height,
                ),
            ],
        ),
        set_css_length_property(
            WhenToRun::Always,
            target,
            "width",
            updated.width,
            parent_width,
            create_size,
        ),
        set_css_length_property(
            WhenToRun::Always,
            target,
            "height",
            updated.height,
            parent_height,
            create_size,
        ),
    ]
}

/// The inverse-delta adjustment keeping a child visually stationary while
/// its parent's frame moves.
fn keep_element_put_in_parent(
    state: &EditorState,
    target_maybe_fragment: &ElementPath,
    current: CanvasRect,
    updated: CanvasRect,
) -> Vec<CanvasCommand> {
    let targets =
        replace_fragment_like_paths_with_children(state, &[target_maybe_fragment.clone()]);
    targets
        .into_iter()
        .map(|target| {
            let (parent_width, parent_height) = coordinate_system_size(state, &target);
            adjust_css_length_properties(
                WhenToRun::Always,
                &target,
                vec![
                    LengthPropertyToAdjust::new("top", current.y - updated.y, parent_height),
                    LengthPropertyToAdjust::new("left", current.x - updated.x, parent_width),
                    LengthPropertyToAdjust::new(
                        "right",
                        updated.right() - current.right(),
                        parent_width,
                    ),
                    LengthPropertyToAdjust::new(
                        "bottom",
                        updated.bottom() - current.bottom(),
                        parent_height,
                    ),
                ],
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/groups_tests.rs"]
mod tests;
