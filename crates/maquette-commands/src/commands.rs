//! The canvas command sum type, per-variant interpreters, and the fold

use std::fmt;
use std::rc::Rc;

use maquette_model::ElementPath;

use crate::{
    apply_patch, run_push_intended_bounds, CssCursor, EditorState, FrameAndTarget, StatePatch,
    StyleValue,
};

/// The lifecycle phase a command batch is folded for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionLifecycle {
    /// Live preview while the gesture is in flight.
    MidInteraction,
    /// Final commit when the gesture ends.
    EndInteraction,
}

/// When a command is allowed to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WhenToRun {
    Always,
    MidInteraction,
    OnComplete,
}

/// Pure phase predicate applied before interpretation.
pub fn command_runs_in(when: WhenToRun, lifecycle: InteractionLifecycle) -> bool {
    match when {
        WhenToRun::Always => true,
        WhenToRun::MidInteraction => lifecycle == InteractionLifecycle::MidInteraction,
        WhenToRun::OnComplete => lifecycle == InteractionLifecycle::EndInteraction,
    }
}

/// Whether a missing property is created by a length edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreateIfNotExistent {
    CreateIfNotExisting,
    DoNotCreateIfNotExisting,
}

/// One length property adjustment inside an
/// [`CanvasCommand::AdjustCssLengthProperties`] batch.
#[derive(Clone, Debug, PartialEq)]
pub struct LengthPropertyToAdjust {
    pub property: String,
    pub delta: f64,
    pub parent_extent: Option<f64>,
    pub create: CreateIfNotExistent,
}

impl LengthPropertyToAdjust {
    pub fn new(property: &str, delta: f64, parent_extent: Option<f64>) -> Self {
        Self {
            property: property.to_owned(),
            delta,
            parent_extent,
            create: CreateIfNotExistent::DoNotCreateIfNotExisting,
        }
    }
}

/// Which metadata generation a group true-up scales from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetadataSource {
    /// The gesture's initial measurement drives the resize.
    StartingMetadata,
    /// Freshly re-measured state drives a queued follow-up.
    LiveMetadata,
}

/// Deferred command computation, run against the already-patched state at
/// fold time so strategies can compose with other strategies' output within
/// a single tick.
#[derive(Clone)]
pub struct UpdateFunction(
    pub Rc<dyn Fn(&EditorState, InteractionLifecycle) -> Vec<StatePatch>>,
);

impl UpdateFunction {
    pub fn new(f: impl Fn(&EditorState, InteractionLifecycle) -> Vec<StatePatch> + 'static) -> Self {
        Self(Rc::new(f))
    }
}

impl fmt::Debug for UpdateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UpdateFunction(..)")
    }
}

/// A canvas command: data describing one editor-state mutation.
///
/// Each variant has exactly one interpreter in [`run_canvas_command`];
/// commands carry no side effects themselves.
#[derive(Clone, Debug)]
pub enum CanvasCommand {
    SetProperty {
        when: WhenToRun,
        target: ElementPath,
        property: String,
        value: StyleValue,
    },
    DeleteProperties {
        when: WhenToRun,
        target: ElementPath,
        properties: Vec<String>,
    },
    SetCssLengthProperty {
        when: WhenToRun,
        target: ElementPath,
        property: String,
        value_px: f64,
        parent_extent: Option<f64>,
        create: CreateIfNotExistent,
    },
    AdjustCssLengthProperties {
        when: WhenToRun,
        target: ElementPath,
        properties: Vec<LengthPropertyToAdjust>,
    },
    ReorderElement {
        when: WhenToRun,
        target: ElementPath,
        index: usize,
    },
    DuplicateElement {
        when: WhenToRun,
        target: ElementPath,
        new_uid: String,
    },
    SetCursor {
        when: WhenToRun,
        cursor: Option<CssCursor>,
    },
    UpdateHighlightedViews {
        when: WhenToRun,
        views: Vec<ElementPath>,
    },
    SetElementsToRerender {
        when: WhenToRun,
        targets: Vec<ElementPath>,
    },
    /// Raw patch escape hatch for state the other variants do not cover.
    WildcardPatch {
        when: WhenToRun,
        patch: StatePatch,
    },
    PushIntendedBoundsAndUpdateGroups {
        when: WhenToRun,
        value: Vec<FrameAndTarget>,
        source: MetadataSource,
    },
    UpdateFunction {
        when: WhenToRun,
        func: UpdateFunction,
    },
}

impl CanvasCommand {
    pub fn when_to_run(&self) -> WhenToRun {
        match self {
            CanvasCommand::SetProperty { when, .. }
            | CanvasCommand::DeleteProperties { when, .. }
            | CanvasCommand::SetCssLengthProperty { when, .. }
            | CanvasCommand::AdjustCssLengthProperties { when, .. }
            | CanvasCommand::ReorderElement { when, .. }
            | CanvasCommand::DuplicateElement { when, .. }
            | CanvasCommand::SetCursor { when, .. }
            | CanvasCommand::UpdateHighlightedViews { when, .. }
            | CanvasCommand::SetElementsToRerender { when, .. }
            | CanvasCommand::WildcardPatch { when, .. }
            | CanvasCommand::PushIntendedBoundsAndUpdateGroups { when, .. }
            | CanvasCommand::UpdateFunction { when, .. } => *when,
        }
    }
}

// Constructors mirroring how strategies build commands.

pub fn set_property(
    when: WhenToRun,
    target: &ElementPath,
    property: &str,
    value: StyleValue,
) -> CanvasCommand {
    CanvasCommand::SetProperty {
        when,
        target: target.clone(),
        property: property.to_owned(),
        value,
    }
}

pub fn delete_properties(
    when: WhenToRun,
    target: &ElementPath,
    properties: &[&str],
) -> CanvasCommand {
    CanvasCommand::DeleteProperties {
        when,
        target: target.clone(),
        properties: properties.iter().map(|p| (*p).to_owned()).collect(),
    }
}

pub fn set_css_length_property(
    when: WhenToRun,
    target: &ElementPath,
    property: &str,
    value_px: f64,
    parent_extent: Option<f64>,
    create: CreateIfNotExistent,
) -> CanvasCommand {
    CanvasCommand::SetCssLengthProperty {
        when,
        target: target.clone(),
        property: property.to_owned(),
        value_px,
        parent_extent,
        create,
    }
}

pub fn adjust_css_length_properties(
    when: WhenToRun,
    target: &ElementPath,
    properties: Vec<LengthPropertyToAdjust>,
) -> CanvasCommand {
    CanvasCommand::AdjustCssLengthProperties {
        when,
        target: target.clone(),
        properties,
    }
}

pub fn reorder_element(when: WhenToRun, target: &ElementPath, index: usize) -> CanvasCommand {
    CanvasCommand::ReorderElement {
        when,
        target: target.clone(),
        index,
    }
}

pub fn duplicate_element(when: WhenToRun, target: &ElementPath, new_uid: &str) -> CanvasCommand {
    CanvasCommand::DuplicateElement {
        when,
        target: target.clone(),
        new_uid: new_uid.to_owned(),
    }
}

/// Cursor feedback runs mid-interaction only; the cursor resets itself when
/// the session ends.
pub fn set_cursor_command(cursor: CssCursor) -> CanvasCommand {
    CanvasCommand::SetCursor {
        when: WhenToRun::MidInteraction,
        cursor: Some(cursor),
    }
}

pub fn update_highlighted_views(when: WhenToRun, views: Vec<ElementPath>) -> CanvasCommand {
    CanvasCommand::UpdateHighlightedViews { when, views }
}

pub fn set_elements_to_rerender_command(targets: Vec<ElementPath>) -> CanvasCommand {
    CanvasCommand::SetElementsToRerender {
        when: WhenToRun::Always,
        targets,
    }
}

pub fn wildcard_patch(when: WhenToRun, patch: StatePatch) -> CanvasCommand {
    CanvasCommand::WildcardPatch { when, patch }
}

pub fn push_intended_bounds_and_update_groups(
    value: Vec<FrameAndTarget>,
    source: MetadataSource,
) -> CanvasCommand {
    CanvasCommand::PushIntendedBoundsAndUpdateGroups {
        when: WhenToRun::Always,
        value,
        source,
    }
}

pub fn update_function_command(when: WhenToRun, func: UpdateFunction) -> CanvasCommand {
    CanvasCommand::UpdateFunction { when, func }
}

/// Patches plus the human-readable description of one interpreted command.
#[derive(Clone, Debug, Default)]
pub struct CommandResult {
    pub patches: Vec<StatePatch>,
    pub description: String,
}

/// Interprets a single command against the given state. Does not apply
/// anything.
pub fn run_canvas_command(
    state: &EditorState,
    command: &CanvasCommand,
    lifecycle: InteractionLifecycle,
) -> CommandResult {
    match command {
        CanvasCommand::SetProperty {
            target,
            property,
            value,
            ..
        } => run_set_property(target, property, value),
        CanvasCommand::DeleteProperties {
            target, properties, ..
        } => run_delete_properties(target, properties),
        CanvasCommand::SetCssLengthProperty {
            target,
            property,
            value_px,
            parent_extent,
            create,
            ..
        } => run_set_css_length_property(state, target, property, *value_px, *parent_extent, *create),
        CanvasCommand::AdjustCssLengthProperties {
            target, properties, ..
        } => run_adjust_css_length_properties(state, target, properties),
        CanvasCommand::ReorderElement { target, index, .. } => run_reorder_element(target, *index),
        CanvasCommand::DuplicateElement {
            target, new_uid, ..
        } => run_duplicate_element(target, new_uid),
        CanvasCommand::SetCursor { cursor, .. } => run_set_cursor(*cursor),
        CanvasCommand::UpdateHighlightedViews { views, .. } => run_update_highlighted_views(views),
        CanvasCommand::SetElementsToRerender { targets, .. } => {
            run_set_elements_to_rerender(targets)
        }
        CanvasCommand::WildcardPatch { patch, .. } => run_wildcard_patch(patch),
        CanvasCommand::PushIntendedBoundsAndUpdateGroups { value, source, .. } => {
            run_push_intended_bounds(state, value, *source, lifecycle)
        }
        CanvasCommand::UpdateFunction { func, .. } => run_update_function(state, func, lifecycle),
    }
}

fn run_set_property(target: &ElementPath, property: &str, value: &StyleValue) -> CommandResult {
    CommandResult {
        patches: vec![StatePatch::SetStyleProperty {
            target: target.clone(),
            property: property.to_owned(),
            value: value.clone(),
        }],
        description: format!("Set Property {property}={value} on {target}"),
    }
}

fn run_delete_properties(target: &ElementPath, properties: &[String]) -> CommandResult {
    CommandResult {
        patches: vec![StatePatch::DeleteStyleProperties {
            target: target.clone(),
            properties: properties.to_vec(),
        }],
        description: format!("Delete Properties {} on {target}", properties.join(", ")),
    }
}

fn run_set_css_length_property(
    state: &EditorState,
    target: &ElementPath,
    property: &str,
    value_px: f64,
    parent_extent: Option<f64>,
    create: CreateIfNotExistent,
) -> CommandResult {
    let existing = state.style_value(target, property);
    let value = match (existing, parent_extent) {
        // Percent values stay percent, re-expressed against the parent.
        (Some(StyleValue::Percent(_)), Some(extent)) if extent != 0.0 => {
            StyleValue::Percent(value_px / extent * 100.0)
        }
        (None, _) if create == CreateIfNotExistent::DoNotCreateIfNotExisting => {
            return CommandResult {
                patches: Vec::new(),
                description: format!("Skipped setting {property} on {target} (not authored)"),
            };
        }
        _ => StyleValue::Px(value_px),
    };
    CommandResult {
        patches: vec![StatePatch::SetStyleProperty {
            target: target.clone(),
            property: property.to_owned(),
            value: value.clone(),
        }],
        description: format!("Set {property}={value} on {target}"),
    }
}

fn run_adjust_css_length_properties(
    state: &EditorState,
    target: &ElementPath,
    properties: &[LengthPropertyToAdjust],
) -> CommandResult {
    let mut patches = Vec::new();
    let mut adjusted = Vec::new();
    for adjustment in properties {
        if adjustment.delta == 0.0 {
            continue;
        }
        let existing = state.style_value(target, &adjustment.property);
        let new_value = match existing {
            Some(StyleValue::Px(value)) | Some(StyleValue::Number(value)) => {
                Some(StyleValue::Px(value + adjustment.delta))
            }
            Some(StyleValue::Percent(percent)) => adjustment
                .parent_extent
                .filter(|extent| *extent != 0.0)
                .map(|extent| StyleValue::Percent(percent + adjustment.delta / extent * 100.0)),
            Some(StyleValue::Keyword(_)) => None,
            None => match adjustment.create {
                CreateIfNotExistent::CreateIfNotExisting => Some(StyleValue::Px(adjustment.delta)),
                CreateIfNotExistent::DoNotCreateIfNotExisting => None,
            },
        };
        if let Some(value) = new_value {
            adjusted.push(adjustment.property.clone());
            patches.push(StatePatch::SetStyleProperty {
                target: target.clone(),
                property: adjustment.property.clone(),
                value,
            });
        }
    }
    CommandResult {
        patches,
        description: format!("Adjust {} on {target}", adjusted.join(", ")),
    }
}

fn run_reorder_element(target: &ElementPath, index: usize) -> CommandResult {
    CommandResult {
        patches: vec![StatePatch::ReorderElement {
            target: target.clone(),
            index,
        }],
        description: format!("Reorder {target} to index {index}"),
    }
}

fn run_duplicate_element(target: &ElementPath, new_uid: &str) -> CommandResult {
    CommandResult {
        patches: vec![StatePatch::DuplicateElement {
            target: target.clone(),
            new_uid: new_uid.to_owned(),
        }],
        description: format!("Duplicate {target} as {new_uid}"),
    }
}

fn run_set_cursor(cursor: Option<CssCursor>) -> CommandResult {
    CommandResult {
        patches: vec![StatePatch::SetCursor(cursor)],
        description: format!(
            "Update Canvas Cursor: {}",
            cursor.map(|c| c.as_str()).unwrap_or("none")
        ),
    }
}

fn run_update_highlighted_views(views: &[ElementPath]) -> CommandResult {
    CommandResult {
        patches: vec![StatePatch::SetHighlightedViews(views.to_vec())],
        description: format!("Update {} highlighted views", views.len()),
    }
}

fn run_set_elements_to_rerender(targets: &[ElementPath]) -> CommandResult {
    CommandResult {
        patches: vec![StatePatch::SetElementsToRerender(targets.to_vec())],
        description: format!("Rerender {} elements", targets.len()),
    }
}

fn run_wildcard_patch(patch: &StatePatch) -> CommandResult {
    CommandResult {
        patches: vec![patch.clone()],
        description: "Wildcard Patch".to_owned(),
    }
}

fn run_update_function(
    state: &EditorState,
    func: &UpdateFunction,
    lifecycle: InteractionLifecycle,
) -> CommandResult {
    CommandResult {
        patches: (func.0)(state, lifecycle),
        description: "Update Function".to_owned(),
    }
}

/// Output of folding a command batch.
#[derive(Clone, Debug)]
pub struct CommandOutcome {
    /// Every patch the batch produced, in application order.
    pub state_patches: Vec<StatePatch>,
    /// The working state after all patches; transient for mid-interaction
    /// folds, the new committed state for end-interaction folds.
    pub updated_state: EditorState,
    /// One line per command, for undo-history labeling. Required output,
    /// not telemetry.
    pub description: String,
}

/// Folds a command batch into patches, phase-filtered and applied against a
/// progressively patched working copy. The input state is never mutated.
pub fn fold_and_apply_commands(
    editor: &EditorState,
    commands: &[CanvasCommand],
    lifecycle: InteractionLifecycle,
) -> CommandOutcome {
    let mut working = editor.clone();
    let mut state_patches = Vec::new();
    let mut descriptions = Vec::new();

    for command in commands {
        if !command_runs_in(command.when_to_run(), lifecycle) {
            continue;
        }
        let result = run_canvas_command(&working, command, lifecycle);
        for patch in &result.patches {
            apply_patch(&mut working, patch);
        }
        state_patches.extend(result.patches);
        descriptions.push(result.description);
    }

    CommandOutcome {
        state_patches,
        updated_state: working,
        description: descriptions.join("\n"),
    }
}

/// Applies a batch unconditionally (no phase filter), returning only the
/// resulting state. Used by interpreters that stage intermediate edits.
pub fn fold_and_apply_commands_simple(
    editor: &EditorState,
    commands: &[CanvasCommand],
) -> (EditorState, Vec<StatePatch>) {
    let mut working = editor.clone();
    let mut patches = Vec::new();
    for command in commands {
        let result = run_canvas_command(&working, command, InteractionLifecycle::EndInteraction);
        for patch in &result.patches {
            apply_patch(&mut working, patch);
        }
        patches.extend(result.patches);
    }
    (working, patches)
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
