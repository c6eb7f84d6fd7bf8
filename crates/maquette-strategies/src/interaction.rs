//! Per-gesture interaction session state

use maquette_geometry::{CanvasPoint, CanvasVector};
use maquette_model::{ElementPath, GridCellCoordinates};
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub alt: bool,
    pub cmd: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        alt: false,
        cmd: false,
        ctrl: false,
        shift: false,
    };
}

/// Drag gesture data: where the pointer went down and how far it has moved.
/// `drag` is `None` until the pointer travels past the drag threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragInteractionData {
    pub drag_start: CanvasPoint,
    pub drag: Option<CanvasVector>,
    pub modifiers: Modifiers,
}

impl DragInteractionData {
    /// The pointer's current canvas position, start plus delta.
    pub fn point_on_canvas(&self) -> Option<CanvasPoint> {
        self.drag.map(|delta| self.drag_start.offset(delta))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InteractionData {
    Drag(DragInteractionData),
}

/// The reparent destination resolved by the host's hit testing.
#[derive(Clone, Debug, PartialEq)]
pub struct ReparentTarget {
    pub new_parent: ElementPath,
}

/// Transient state for one gesture; created on pointer-down, destroyed on
/// commit or abort.
#[derive(Clone, Debug)]
pub struct InteractionSession {
    pub interaction_data: InteractionData,
    pub active_reparent_target: Option<ReparentTarget>,
}

impl InteractionSession {
    pub fn drag(drag_start: CanvasPoint, drag: Option<CanvasVector>, modifiers: Modifiers) -> Self {
        Self {
            interaction_data: InteractionData::Drag(DragInteractionData {
                drag_start,
                drag,
                modifiers,
            }),
            active_reparent_target: None,
        }
    }

    pub fn drag_data(&self) -> Option<&DragInteractionData> {
        match &self.interaction_data {
            InteractionData::Drag(data) => Some(data),
        }
    }
}

/// Grid-strategy cell caches, scoped to the active gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GridCustomState {
    pub target_cell: Option<GridCellCoordinates>,
    /// The cell the pointer grabbed when the drag started.
    pub dragging_from_cell: Option<GridCellCoordinates>,
    /// The element's top-left occupied cell at drag start.
    pub original_root_cell: Option<GridCellCoordinates>,
    pub target_root_cell: Option<GridCellCoordinates>,
}

/// Strategy-local state slots, kept across ticks of one gesture.
#[derive(Clone, Debug, Default)]
pub struct CustomStrategyState {
    /// Placeholder uids reserved per dragged element, keyed by path string,
    /// so repeated applies reuse the same duplicate.
    pub duplicated_element_new_uids: FxHashMap<String, String>,
    pub last_reorder_idx: Option<usize>,
    pub grid: GridCustomState,
}

/// Partial update to [`CustomStrategyState`] returned from a strategy apply.
#[derive(Clone, Debug, Default)]
pub struct CustomStrategyStatePatch {
    pub duplicated_element_new_uids: Option<FxHashMap<String, String>>,
    pub last_reorder_idx: Option<usize>,
    pub grid: Option<GridCustomState>,
}

impl CustomStrategyStatePatch {
    pub fn apply_to(&self, state: &mut CustomStrategyState) {
        if let Some(uids) = &self.duplicated_element_new_uids {
            state.duplicated_element_new_uids = uids.clone();
        }
        if let Some(idx) = self.last_reorder_idx {
            state.last_reorder_idx = Some(idx);
        }
        if let Some(grid) = self.grid {
            state.grid = grid;
        }
    }
}
