//! Reorder strategy: drag an element to a new index among its siblings

use maquette_commands::{
    reorder_element, set_cursor_command, set_elements_to_rerender_command,
    update_highlighted_views, CssCursor, WhenToRun,
};
use maquette_geometry::{CanvasPoint, CanvasRect, MaybeInfinite};
use maquette_model::{DetectedLayoutSystem, ElementInstanceMetadataMap, ElementPath};

use crate::{
    CanvasState, ControlDescriptor, ControlKind, ControlVisibility, CustomStrategyState,
    CustomStrategyStatePatch, InteractionSession, StrategyApplicationResult, StrategyCandidate,
    StrategyKind, StrategyStatus,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReorderDirection {
    Horizontal,
    Vertical,
}

/// Manual reordering is refused when any sibling is the root of a generated
/// (repeated/duplicated) element. The lockout deliberately covers the whole
/// sibling set, not just the dragged element.
pub fn is_reorder_allowed(siblings: &[ElementPath]) -> bool {
    siblings
        .iter()
        .all(|sibling| !sibling.is_root_of_generated_element())
}

fn reorder_direction(
    metadata: &ElementInstanceMetadataMap,
    target: &ElementPath,
) -> Option<ReorderDirection> {
    let entry = metadata.get(target)?;
    let measurements = &entry.special_size_measurements;
    match measurements.parent_layout_system {
        DetectedLayoutSystem::Flex => Some(
            match measurements.parent_flex_direction {
                Some(direction) if direction.is_horizontal() => ReorderDirection::Horizontal,
                Some(_) => ReorderDirection::Vertical,
                None => ReorderDirection::Horizontal,
            },
        ),
        DetectedLayoutSystem::Flow => Some(ReorderDirection::Vertical),
        DetectedLayoutSystem::Grid | DetectedLayoutSystem::None => None,
    }
}

pub fn reorder_candidate(
    canvas_state: &CanvasState<'_>,
    session: &InteractionSession,
) -> Option<StrategyCandidate> {
    session.drag_data()?;
    let target = canvas_state.interaction_targets.first()?;
    reorder_direction(canvas_state.starting_metadata, target)?;
    if canvas_state.starting_metadata.siblings_ordered(target).len() < 2 {
        return None;
    }
    Some(StrategyCandidate {
        kind: StrategyKind::Reorder,
        id: "REORDER",
        name: "Reorder",
        fitness: 1.0,
        controls_to_render: vec![ControlDescriptor {
            key: "drag-outline-control",
            kind: ControlKind::DragOutline,
            targets: canvas_state.interaction_targets.to_vec(),
            visibility: ControlVisibility::VisibleOnlyWhileActive,
        }],
    })
}

pub fn apply_reorder(
    canvas_state: &CanvasState<'_>,
    session: &InteractionSession,
    custom_state: &CustomStrategyState,
) -> StrategyApplicationResult {
    let Some(drag_data) = session.drag_data() else {
        return StrategyApplicationResult::empty();
    };
    let Some(target) = canvas_state.interaction_targets.first() else {
        return StrategyApplicationResult::empty();
    };
    let Some(point_on_canvas) = drag_data.point_on_canvas() else {
        // Below the drag threshold there is nothing to do but show intent.
        return StrategyApplicationResult::new(
            vec![set_cursor_command(CssCursor::Move)],
            CustomStrategyStatePatch::default(),
            StrategyStatus::Success,
        );
    };

    let metadata = canvas_state.starting_metadata;
    let siblings = metadata.siblings_ordered(target);

    if !is_reorder_allowed(&siblings) {
        return StrategyApplicationResult::new(
            vec![set_cursor_command(CssCursor::NotPermitted)],
            CustomStrategyStatePatch::default(),
            StrategyStatus::Failure,
        );
    }

    let direction = reorder_direction(metadata, target).unwrap_or(ReorderDirection::Vertical);

    let Some(unpatched_index) = siblings.iter().position(|sibling| sibling == target) else {
        return StrategyApplicationResult::empty();
    };
    let last_reorder_idx = custom_state.last_reorder_idx.unwrap_or(unpatched_index);

    let new_index =
        find_sibling_index_under_point(metadata, &siblings, point_on_canvas, direction);

    // A momentary miss between siblings keeps the last resolved index, so
    // the target does not flicker back and forth.
    let new_result_or_last_index = new_index.unwrap_or(last_reorder_idx);

    let mut commands = Vec::new();
    if new_result_or_last_index != unpatched_index {
        commands.push(reorder_element(
            WhenToRun::Always,
            target,
            new_result_or_last_index,
        ));
    }
    commands.push(set_elements_to_rerender_command(siblings));
    commands.push(update_highlighted_views(WhenToRun::MidInteraction, vec![]));
    commands.push(set_cursor_command(CssCursor::Move));

    StrategyApplicationResult::new(
        commands,
        CustomStrategyStatePatch {
            last_reorder_idx: Some(new_result_or_last_index),
            ..Default::default()
        },
        StrategyStatus::Success,
    )
}

/// The index of the sibling whose bounding strip contains the point.
///
/// The strip extends to infinity along the non-drag axis and is clamped to
/// the immediate parent's extent along the drag axis' cross direction.
fn find_sibling_index_under_point(
    metadata: &ElementInstanceMetadataMap,
    siblings: &[ElementPath],
    point: CanvasPoint,
    direction: ReorderDirection,
) -> Option<usize> {
    siblings.iter().position(|sibling| {
        let Some(entry) = metadata.get(sibling) else {
            return false;
        };
        let Some(parent_frame) = entry.special_size_measurements.immediate_parent_bounds else {
            return false;
        };
        let Some(frame) = entry.global_frame else {
            return false;
        };

        let sibling_area = match direction {
            ReorderDirection::Horizontal => match frame {
                MaybeInfinite::Finite(frame) => CanvasRect {
                    x: frame.x,
                    y: parent_frame.y,
                    width: frame.width,
                    height: parent_frame.height,
                },
                MaybeInfinite::Infinity => CanvasRect {
                    x: f64::NEG_INFINITY,
                    y: parent_frame.y,
                    width: f64::INFINITY,
                    height: parent_frame.height,
                },
            },
            ReorderDirection::Vertical => match frame {
                MaybeInfinite::Finite(frame) => CanvasRect {
                    x: parent_frame.x,
                    y: frame.y,
                    width: parent_frame.width,
                    height: frame.height,
                },
                MaybeInfinite::Infinity => CanvasRect {
                    x: parent_frame.x,
                    y: f64::NEG_INFINITY,
                    width: parent_frame.width,
                    height: f64::INFINITY,
                },
            },
        };

        sibling_area.contains(point)
    })
}

#[cfg(test)]
#[path = "tests/reorder_tests.rs"]
mod tests;
