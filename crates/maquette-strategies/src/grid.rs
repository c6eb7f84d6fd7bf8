//! Grid cell placement strategy

use maquette_commands::{
    delete_properties, set_property, CanvasCommand, StyleValue, WhenToRun,
};
use maquette_geometry::{CanvasPoint, CanvasVector};
use maquette_model::{
    DetectedLayoutSystem, ElementInstanceMetadata, ElementPath, GridCellCoordinates,
    GridElementProperties, GridPosition,
};
use maquette_surface::{NodeId, RenderSurface};

use crate::{
    CanvasState, ControlDescriptor, ControlKind, ControlVisibility, CustomStrategyState,
    CustomStrategyStatePatch, GridCustomState, InteractionSession, StrategyApplicationResult,
    StrategyCandidate, StrategyKind, StrategyStatus,
};

pub fn grid_candidate(
    canvas_state: &CanvasState<'_>,
    session: &InteractionSession,
) -> Option<StrategyCandidate> {
    session.drag_data()?;
    let target = canvas_state.interaction_targets.first()?;
    let entry = canvas_state.starting_metadata.get(target)?;
    if entry.special_size_measurements.parent_layout_system != DetectedLayoutSystem::Grid {
        return None;
    }
    Some(StrategyCandidate {
        kind: StrategyKind::GridRearrangeMove,
        id: "GRID_REARRANGE_MOVE",
        name: "Rearrange (Grid)",
        fitness: 2.0,
        controls_to_render: vec![ControlDescriptor {
            key: "grid-cell-targets-control",
            kind: ControlKind::GridCellTargets,
            targets: vec![target.parent()],
            visibility: ControlVisibility::VisibleOnlyWhileActive,
        }],
    })
}

/// Canvas → viewport transform: apply the pan offset, then the zoom.
pub fn canvas_point_to_window_point(
    point: CanvasPoint,
    canvas_scale: f64,
    canvas_offset: CanvasVector,
) -> CanvasPoint {
    CanvasPoint {
        x: (point.x + canvas_offset.x) * canvas_scale,
        y: (point.y + canvas_offset.y) * canvas_scale,
    }
}

/// The grid cell marker under the pointer.
///
/// When duplicating, the canvas controls overlay sits above the grid, so the
/// hit test also recurses into each hit node's descendants to reach the
/// occluded cells.
pub fn grid_cell_at_point(
    surface: &dyn RenderSurface,
    window_point: CanvasPoint,
    canvas_scale: f64,
    duplicating: bool,
) -> Option<GridCellCoordinates> {
    fn marker_matches(
        surface: &dyn RenderSurface,
        node: NodeId,
        window_point: CanvasPoint,
        canvas_scale: f64,
    ) -> Option<GridCellCoordinates> {
        let marker = surface.grid_cell_marker(node)?;
        let rect = if canvas_scale > 1.0 {
            marker.rect.scale(canvas_scale)
        } else {
            marker.rect
        };
        rect.contains(window_point).then_some(marker.coordinates)
    }

    fn find_recursive(
        surface: &dyn RenderSurface,
        nodes: &[NodeId],
        window_point: CanvasPoint,
        canvas_scale: f64,
        duplicating: bool,
    ) -> Option<GridCellCoordinates> {
        for node in nodes {
            if let Some(coordinates) = marker_matches(surface, *node, window_point, canvas_scale) {
                return Some(coordinates);
            }
            if duplicating {
                let children = surface.children(*node);
                if let Some(coordinates) =
                    find_recursive(surface, &children, window_point, canvas_scale, duplicating)
                {
                    return Some(coordinates);
                }
            }
        }
        None
    }

    let hits = surface.elements_at_point(window_point);
    find_recursive(surface, &hits, window_point, canvas_scale, duplicating)
}

fn get_target_cell(
    previous: Option<GridCellCoordinates>,
    surface: &dyn RenderSurface,
    window_point: CanvasPoint,
    canvas_scale: f64,
    duplicating: bool,
) -> Option<GridCellCoordinates> {
    let cell = grid_cell_at_point(surface, window_point, canvas_scale, duplicating).or(previous)?;
    if cell.row < 1 || cell.column < 1 {
        return None;
    }
    Some(cell)
}

struct OccupiedSpan {
    row_start: i64,
    row_size: i64,
    column_start: i64,
    column_size: i64,
}

/// The span the element currently occupies, from its measured grid
/// properties. Auto ends occupy a single track.
fn occupied_span(entry: &ElementInstanceMetadata) -> OccupiedSpan {
    let props = &entry.special_size_measurements.element_grid_properties;
    let start_of = |position: Option<GridPosition>| match position {
        Some(GridPosition::Numeric(line)) => line,
        _ => 0,
    };
    let size_of = |start: Option<GridPosition>, end: Option<GridPosition>| match (start, end) {
        (Some(GridPosition::Numeric(from)), Some(GridPosition::Numeric(to))) => (to - from).max(1),
        _ => 1,
    };
    OccupiedSpan {
        row_start: start_of(props.grid_row_start),
        row_size: size_of(props.grid_row_start, props.grid_row_end),
        column_start: start_of(props.grid_column_start),
        column_size: size_of(props.grid_column_start, props.grid_column_end),
    }
}

/// Start/end lines for one axis, clamped so `start >= 1` and
/// `end = max(1, start + size)`.
fn coord_bounds(cell_coord: i64, size: i64, adjust_offset: i64) -> (i64, i64) {
    let start = (cell_coord - adjust_offset).max(1);
    let end = (start + size).max(1);
    (start, end)
}

pub fn apply_grid_rearrange(
    canvas_state: &CanvasState<'_>,
    session: &InteractionSession,
    custom_state: &CustomStrategyState,
    surface: &dyn RenderSurface,
) -> StrategyApplicationResult {
    let Some(drag_data) = session.drag_data() else {
        return StrategyApplicationResult::empty();
    };
    let Some(point_on_canvas) = drag_data.point_on_canvas() else {
        return StrategyApplicationResult::empty();
    };
    let Some(target) = canvas_state.interaction_targets.first() else {
        return StrategyApplicationResult::empty();
    };

    let duplicating = drag_data.modifiers.alt;
    let window_point = canvas_point_to_window_point(
        point_on_canvas,
        canvas_state.scale,
        canvas_state.canvas_offset,
    );

    let Some(new_target_cell) = get_target_cell(
        custom_state.grid.target_cell,
        surface,
        window_point,
        canvas_state.scale,
        duplicating,
    ) else {
        return StrategyApplicationResult::empty();
    };

    let Some(entry) = canvas_state
        .editor
        .metadata
        .get(target)
        .or_else(|| canvas_state.starting_metadata.get(target))
    else {
        return StrategyApplicationResult::empty();
    };
    let span = occupied_span(entry);

    // The offset between the cell first grabbed and the element's top-left
    // occupied cell keeps the element anchored under the pointer.
    let dragging_from_cell = custom_state.grid.dragging_from_cell.unwrap_or(new_target_cell);
    let original_root_cell = custom_state
        .grid
        .original_root_cell
        .unwrap_or(GridCellCoordinates::new(span.row_start, span.column_start));
    let row_offset = dragging_from_cell.row - original_root_cell.row;
    let column_offset = dragging_from_cell.column - original_root_cell.column;

    let (row_start, row_end) = coord_bounds(new_target_cell.row, span.row_size, row_offset);
    let (column_start, column_end) =
        coord_bounds(new_target_cell.column, span.column_size, column_offset);

    let commands = vec![
        set_property(
            WhenToRun::Always,
            target,
            "gridColumnStart",
            StyleValue::Number(column_start as f64),
        ),
        set_property(
            WhenToRun::Always,
            target,
            "gridColumnEnd",
            StyleValue::Number(column_end as f64),
        ),
        set_property(
            WhenToRun::Always,
            target,
            "gridRowStart",
            StyleValue::Number(row_start as f64),
        ),
        set_property(
            WhenToRun::Always,
            target,
            "gridRowEnd",
            StyleValue::Number(row_end as f64),
        ),
    ];

    StrategyApplicationResult::new(
        commands,
        CustomStrategyStatePatch {
            grid: Some(GridCustomState {
                target_cell: Some(new_target_cell),
                dragging_from_cell: Some(dragging_from_cell),
                original_root_cell: Some(original_root_cell),
                target_root_cell: Some(GridCellCoordinates::new(row_start, column_start)),
            }),
            ..Default::default()
        },
        StrategyStatus::Success,
    )
}

/// Deletes the `gridColumn`/`gridRow` shorthands and sets one longhand per
/// supplied numeric position; `auto` ends emit nothing.
pub fn set_grid_props_commands(
    target: &ElementPath,
    props: &GridElementProperties,
) -> Vec<CanvasCommand> {
    let mut commands = vec![delete_properties(
        WhenToRun::Always,
        target,
        &["gridColumn", "gridRow"],
    )];
    let longhands = [
        ("gridColumnStart", props.grid_column_start),
        ("gridColumnEnd", props.grid_column_end),
        ("gridRowStart", props.grid_row_start),
        ("gridRowEnd", props.grid_row_end),
    ];
    for (property, position) in longhands {
        if let Some(GridPosition::Numeric(line)) = position {
            commands.push(set_property(
                WhenToRun::Always,
                target,
                property,
                StyleValue::Number(line as f64),
            ));
        }
    }
    commands
}

#[cfg(test)]
#[path = "tests/grid_tests.rs"]
mod tests;
