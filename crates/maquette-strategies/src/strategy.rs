//! Strategy registry: candidates, fitness selection, dispatch

use indexmap::IndexMap;
use log::trace;
use maquette_commands::{CanvasCommand, EditorState, InteractionLifecycle};
use maquette_geometry::CanvasVector;
use maquette_model::{ElementInstanceMetadataMap, ElementPath};
use maquette_surface::RenderSurface;

use crate::{
    apply_flex_reparent, apply_grid_rearrange, apply_reorder, flex_reparent_candidate,
    grid_candidate, reorder_candidate, CustomStrategyState, CustomStrategyStatePatch,
    InteractionSession,
};

/// Overlay control visibility policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlVisibility {
    Always,
    VisibleOnlyWhileActive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKind {
    DragOutline,
    ParentOutlines,
    ParentBounds,
    ZeroSizedElements,
    GridCellTargets,
}

/// Declarative overlay descriptor; rendering belongs to the controls layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ControlDescriptor {
    pub key: &'static str,
    pub kind: ControlKind,
    pub targets: Vec<ElementPath>,
    pub visibility: ControlVisibility,
}

/// The read-only snapshot strategies evaluate against.
#[derive(Clone, Copy)]
pub struct CanvasState<'a> {
    pub editor: &'a EditorState,
    /// Metadata captured when the gesture started; the stable baseline for
    /// the whole interaction.
    pub starting_metadata: &'a ElementInstanceMetadataMap,
    pub interaction_targets: &'a [ElementPath],
    pub scale: f64,
    pub canvas_offset: CanvasVector,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrategyStatus {
    Success,
    Failure,
}

/// Commands plus custom-state updates from one strategy apply.
#[derive(Debug, Default)]
pub struct StrategyApplicationResult {
    pub commands: Vec<CanvasCommand>,
    pub custom_state_patch: CustomStrategyStatePatch,
    pub status: StrategyStatus,
}

impl Default for StrategyStatus {
    fn default() -> Self {
        StrategyStatus::Success
    }
}

impl StrategyApplicationResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(
        commands: Vec<CanvasCommand>,
        custom_state_patch: CustomStrategyStatePatch,
        status: StrategyStatus,
    ) -> Self {
        Self {
            commands,
            custom_state_patch,
            status,
        }
    }
}

/// The closed set of strategy kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Reorder,
    FlexReparentToAbsolute,
    GridRearrangeMove,
}

/// An applicable strategy for the current tick.
#[derive(Clone, Debug)]
pub struct StrategyCandidate {
    pub kind: StrategyKind,
    pub id: &'static str,
    pub name: &'static str,
    pub fitness: f64,
    pub controls_to_render: Vec<ControlDescriptor>,
}

/// Registry of strategy kinds in registration order.
///
/// Registration order is the tie-break: among equal-fitness candidates the
/// first registered wins. Explicit and testable, not incidental.
pub struct StrategyRegistry {
    kinds: IndexMap<&'static str, StrategyKind>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut kinds = IndexMap::new();
        kinds.insert("REORDER", StrategyKind::Reorder);
        kinds.insert("FLEX_REPARENT_TO_ABSOLUTE", StrategyKind::FlexReparentToAbsolute);
        kinds.insert("GRID_REARRANGE_MOVE", StrategyKind::GridRearrangeMove);
        Self { kinds }
    }
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kinds(&self) -> impl Iterator<Item = StrategyKind> + '_ {
        self.kinds.values().copied()
    }

    /// Evaluates every registered kind against the current tick.
    pub fn candidates(
        &self,
        canvas_state: &CanvasState<'_>,
        session: &InteractionSession,
        custom_state: &CustomStrategyState,
    ) -> Vec<StrategyCandidate> {
        self.kinds()
            .filter_map(|kind| candidate_for(kind, canvas_state, session, custom_state))
            .collect()
    }

    /// The single active strategy: max fitness, first registered on ties.
    pub fn pick_strategy<'c>(
        &self,
        candidates: &'c [StrategyCandidate],
    ) -> Option<&'c StrategyCandidate> {
        let picked = candidates.iter().fold(None::<&StrategyCandidate>, |best, candidate| {
            match best {
                Some(current) if current.fitness >= candidate.fitness => Some(current),
                _ => Some(candidate),
            }
        });
        if let Some(candidate) = picked {
            trace!(
                "strategy pick: {} (fitness {}) among {}",
                candidate.id,
                candidate.fitness,
                candidates.len()
            );
        }
        picked
    }
}

fn candidate_for(
    kind: StrategyKind,
    canvas_state: &CanvasState<'_>,
    session: &InteractionSession,
    _custom_state: &CustomStrategyState,
) -> Option<StrategyCandidate> {
    match kind {
        StrategyKind::Reorder => reorder_candidate(canvas_state, session),
        StrategyKind::FlexReparentToAbsolute => flex_reparent_candidate(canvas_state, session),
        StrategyKind::GridRearrangeMove => grid_candidate(canvas_state, session),
    }
}

/// Dispatches one apply of the given strategy kind.
pub fn apply_strategy(
    kind: StrategyKind,
    canvas_state: &CanvasState<'_>,
    session: &InteractionSession,
    custom_state: &CustomStrategyState,
    surface: &dyn RenderSurface,
    lifecycle: InteractionLifecycle,
) -> StrategyApplicationResult {
    match kind {
        StrategyKind::Reorder => apply_reorder(canvas_state, session, custom_state),
        StrategyKind::FlexReparentToAbsolute => {
            apply_flex_reparent(canvas_state, session, custom_state, lifecycle)
        }
        StrategyKind::GridRearrangeMove => {
            apply_grid_rearrange(canvas_state, session, custom_state, surface)
        }
    }
}

#[cfg(test)]
#[path = "tests/strategy_tests.rs"]
mod tests;
