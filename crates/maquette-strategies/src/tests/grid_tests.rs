use super::*;
use maquette_commands::EditorState;
use maquette_geometry::CanvasRect;
use maquette_model::ElementInstanceMetadataMap;
use maquette_testing::{metadata_entry, NodeSpec, TestSurface};

use crate::{InteractionSession, Modifiers};

fn path(value: &str) -> ElementPath {
    ElementPath::from_string(value)
}

/// A 2x3 grid of 100x100 cell markers starting at the viewport origin.
fn grid_surface() -> TestSurface {
    let (mut surface, container) = TestSurface::with_container("sb", &["sb/grid/item"]);
    let grid = surface.add_node(
        container,
        NodeSpec::new("div")
            .path("sb/grid")
            .rect(0.0, 0.0, 300.0, 200.0)
            .style("display", "grid"),
    );
    for row in 1..=2i64 {
        for column in 1..=3i64 {
            let x = (column - 1) as f64 * 100.0;
            let y = (row - 1) as f64 * 100.0;
            surface.add_node(
                grid,
                NodeSpec::new("div")
                    .rect(x, y, 100.0, 100.0)
                    .grid_cell("sb/grid", row, column),
            );
        }
    }
    surface
}

fn item_metadata(
    column_start: i64,
    column_end: i64,
    row_start: i64,
    row_end: i64,
) -> ElementInstanceMetadataMap {
    let mut map = ElementInstanceMetadataMap::new();
    map.insert(metadata_entry("sb/grid", CanvasRect::new(0.0, 0.0, 300.0, 200.0)));
    let mut item = metadata_entry("sb/grid/item", CanvasRect::new(0.0, 0.0, 100.0, 100.0));
    item.special_size_measurements.parent_layout_system = DetectedLayoutSystem::Grid;
    item.special_size_measurements.element_grid_properties = GridElementProperties::new(
        Some(GridPosition::Numeric(column_start)),
        Some(GridPosition::Numeric(column_end)),
        Some(GridPosition::Numeric(row_start)),
        Some(GridPosition::Numeric(row_end)),
    );
    map.insert(item);
    map
}

fn grid_set_props(result: &StrategyApplicationResult) -> Vec<(String, f64)> {
    result
        .commands
        .iter()
        .filter_map(|command| match command {
            maquette_commands::CanvasCommand::SetProperty {
                property, value, ..
            } => value.as_number().map(|number| (property.clone(), number)),
            _ => None,
        })
        .collect()
}

fn drag_to(point: (f64, f64)) -> InteractionSession {
    InteractionSession::drag(
        CanvasPoint::new(50.0, 50.0),
        Some(CanvasVector::new(point.0 - 50.0, point.1 - 50.0)),
        Modifiers::NONE,
    )
}

#[test]
fn dragging_into_a_cell_emits_clamped_grid_placement() {
    let surface = grid_surface();
    let metadata = item_metadata(1, 2, 1, 2);
    let mut editor = EditorState::new();
    editor.metadata = metadata.clone();
    let targets = [path("sb/grid/item")];
    let canvas_state = CanvasState {
        editor: &editor,
        starting_metadata: &metadata,
        interaction_targets: &targets,
        scale: 1.0,
        canvas_offset: CanvasVector::ZERO,
    };
    // first tick: the pointer is still over the grab cell (1,1)
    let mut custom = CustomStrategyState::default();
    let first = apply_grid_rearrange(&canvas_state, &drag_to((55.0, 55.0)), &custom, &surface);
    first.custom_state_patch.apply_to(&mut custom);
    assert_eq!(custom.grid.dragging_from_cell, Some(GridCellCoordinates::new(1, 1)));

    // second tick: pointer over row 2, column 3
    let session = drag_to((250.0, 150.0));
    let result = apply_grid_rearrange(&canvas_state, &session, &custom, &surface);
    let props = grid_set_props(&result);
    assert_eq!(
        props,
        vec![
            ("gridColumnStart".to_owned(), 3.0),
            ("gridColumnEnd".to_owned(), 4.0),
            ("gridRowStart".to_owned(), 2.0),
            ("gridRowEnd".to_owned(), 3.0),
        ]
    );

    let grid_state = result.custom_state_patch.grid.unwrap();
    assert_eq!(grid_state.target_cell, Some(GridCellCoordinates::new(2, 3)));
    assert_eq!(grid_state.target_root_cell, Some(GridCellCoordinates::new(2, 3)));

    // invariant: start >= 1 and end >= start on both axes
    for chunk in props.chunks(2) {
        let (start, end) = (chunk[0].1, chunk[1].1);
        assert!(start >= 1.0);
        assert!(end >= start);
    }
}

#[test]
fn grab_offset_keeps_the_element_anchored_under_the_pointer() {
    let surface = grid_surface();
    let metadata = item_metadata(1, 3, 1, 2);
    let mut editor = EditorState::new();
    editor.metadata = metadata.clone();
    let targets = [path("sb/grid/item")];
    let canvas_state = CanvasState {
        editor: &editor,
        starting_metadata: &metadata,
        interaction_targets: &targets,
        scale: 1.0,
        canvas_offset: CanvasVector::ZERO,
    };
    // the drag grabbed cell (1,2) of an element rooted at (1,1)
    let custom = CustomStrategyState {
        grid: GridCustomState {
            target_cell: None,
            dragging_from_cell: Some(GridCellCoordinates::new(1, 2)),
            original_root_cell: Some(GridCellCoordinates::new(1, 1)),
            target_root_cell: None,
        },
        ..Default::default()
    };
    // pointer over (2,3): root lands at column 3 - offset 1 = 2
    let session = drag_to((250.0, 150.0));

    let result = apply_grid_rearrange(&canvas_state, &session, &custom, &surface);
    let props = grid_set_props(&result);
    assert_eq!(
        props,
        vec![
            ("gridColumnStart".to_owned(), 2.0),
            ("gridColumnEnd".to_owned(), 4.0),
            ("gridRowStart".to_owned(), 2.0),
            ("gridRowEnd".to_owned(), 3.0),
        ]
    );
}

#[test]
fn placement_clamps_to_the_first_line() {
    let surface = grid_surface();
    let metadata = item_metadata(2, 3, 2, 3);
    let mut editor = EditorState::new();
    editor.metadata = metadata.clone();
    let targets = [path("sb/grid/item")];
    let canvas_state = CanvasState {
        editor: &editor,
        starting_metadata: &metadata,
        interaction_targets: &targets,
        scale: 1.0,
        canvas_offset: CanvasVector::ZERO,
    };
    // grabbed at (2,2); pointer over (1,1); offsets push the root below 1
    let custom = CustomStrategyState {
        grid: GridCustomState {
            target_cell: None,
            dragging_from_cell: Some(GridCellCoordinates::new(2, 2)),
            original_root_cell: Some(GridCellCoordinates::new(1, 1)),
            target_root_cell: None,
        },
        ..Default::default()
    };
    let session = drag_to((50.0, 50.0));

    let result = apply_grid_rearrange(&canvas_state, &session, &custom, &surface);
    let props = grid_set_props(&result);
    for chunk in props.chunks(2) {
        let (start, end) = (chunk[0].1, chunk[1].1);
        assert!(start >= 1.0, "start clamped to the first line");
        assert!(end >= start);
    }
}

#[test]
fn pointer_outside_every_cell_is_a_no_op() {
    let surface = grid_surface();
    let metadata = item_metadata(1, 2, 1, 2);
    let mut editor = EditorState::new();
    editor.metadata = metadata.clone();
    let targets = [path("sb/grid/item")];
    let canvas_state = CanvasState {
        editor: &editor,
        starting_metadata: &metadata,
        interaction_targets: &targets,
        scale: 1.0,
        canvas_offset: CanvasVector::ZERO,
    };
    let session = drag_to((900.0, 900.0));
    let custom = CustomStrategyState::default();

    let result = apply_grid_rearrange(&canvas_state, &session, &custom, &surface);
    assert!(result.commands.is_empty());
}

/// Scenario: `{gridColumnStart: 2, gridColumnEnd: auto}` deletes the
/// shorthands and emits exactly one set-property.
#[test]
fn set_grid_props_commands_skips_auto_positions() {
    let props = GridElementProperties::new(
        Some(GridPosition::Numeric(2)),
        Some(GridPosition::Auto),
        None,
        None,
    );
    let commands = set_grid_props_commands(&path("sb/grid/item"), &props);

    assert_eq!(commands.len(), 2);
    assert!(matches!(
        &commands[0],
        maquette_commands::CanvasCommand::DeleteProperties { properties, .. }
            if properties == &vec!["gridColumn".to_owned(), "gridRow".to_owned()]
    ));
    assert!(matches!(
        &commands[1],
        maquette_commands::CanvasCommand::SetProperty { property, value, .. }
            if property == "gridColumnStart" && value.as_number() == Some(2.0)
    ));
}

#[test]
fn candidate_requires_a_grid_parent() {
    let surface = grid_surface();
    let _ = surface;
    let metadata = item_metadata(1, 2, 1, 2);
    let editor = EditorState::new();
    let targets = [path("sb/grid/item")];
    let canvas_state = CanvasState {
        editor: &editor,
        starting_metadata: &metadata,
        interaction_targets: &targets,
        scale: 1.0,
        canvas_offset: CanvasVector::ZERO,
    };
    let session = drag_to((150.0, 50.0));
    assert!(grid_candidate(&canvas_state, &session).is_some());

    let flow_metadata = {
        let mut map = ElementInstanceMetadataMap::new();
        map.insert(metadata_entry("sb/grid/item", CanvasRect::new(0.0, 0.0, 10.0, 10.0)));
        map
    };
    let flow_state = CanvasState {
        starting_metadata: &flow_metadata,
        ..canvas_state
    };
    assert!(grid_candidate(&flow_state, &session).is_none());
}
