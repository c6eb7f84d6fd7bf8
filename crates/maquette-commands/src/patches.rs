//! Pure diff descriptors and the single mutation point that applies them

use maquette_geometry::CanvasRect;
use maquette_model::ElementPath;

use crate::{CssCursor, EditorState, FrameAndTarget, StyleValue};

/// A pure diff descriptor against [`EditorState`].
///
/// Patches carry no behavior; they can be replayed, combined, and — for the
/// mid-interaction phase — discarded wholesale when a gesture is aborted.
#[derive(Clone, Debug, PartialEq)]
pub enum StatePatch {
    SetCursor(Option<CssCursor>),
    SetHighlightedViews(Vec<ElementPath>),
    SetElementsToRerender(Vec<ElementPath>),
    PushIntendedBounds(Vec<FrameAndTarget>),
    SetStyleProperty {
        target: ElementPath,
        property: String,
        value: StyleValue,
    },
    DeleteStyleProperties {
        target: ElementPath,
        properties: Vec<String>,
    },
    ReorderElement {
        target: ElementPath,
        index: usize,
    },
    DuplicateElement {
        target: ElementPath,
        new_uid: String,
    },
    ReparentElement {
        target: ElementPath,
        new_parent: ElementPath,
    },
    AddHiddenInstance(ElementPath),
    PatchMetadataGlobalFrame {
        target: ElementPath,
        frame: CanvasRect,
    },
    QueueGroupTrueUps(Vec<ElementPath>),
    UpdateSelectedViews(Vec<ElementPath>),
}

/// Applies one patch. The only place editor state is mutated.
pub fn apply_patch(state: &mut EditorState, patch: &StatePatch) {
    match patch {
        StatePatch::SetCursor(cursor) => {
            state.cursor = *cursor;
        }
        StatePatch::SetHighlightedViews(views) => {
            state.highlighted_views = views.clone();
        }
        StatePatch::SetElementsToRerender(targets) => {
            state.elements_to_rerender = targets.clone();
        }
        StatePatch::PushIntendedBounds(bounds) => {
            state.strategy_intended_bounds.extend(bounds.iter().cloned());
        }
        StatePatch::SetStyleProperty {
            target,
            property,
            value,
        } => {
            state
                .style_stores
                .entry(target.to_path_string())
                .or_default()
                .insert(property.clone(), value.clone());
        }
        StatePatch::DeleteStyleProperties { target, properties } => {
            if let Some(store) = state.style_stores.get_mut(&target.to_path_string()) {
                for property in properties {
                    store.shift_remove(property);
                }
            }
        }
        StatePatch::ReorderElement { target, index } => {
            apply_reorder(state, target, *index);
        }
        StatePatch::DuplicateElement { target, new_uid } => {
            apply_duplicate(state, target, new_uid);
        }
        StatePatch::ReparentElement { target, new_parent } => {
            apply_reparent(state, target, new_parent);
        }
        StatePatch::AddHiddenInstance(path) => {
            if !state.hidden_instances.contains(path) {
                state.hidden_instances.push(path.clone());
            }
        }
        StatePatch::PatchMetadataGlobalFrame { target, frame } => {
            if let Some(entry) = state.metadata.get_mut(target) {
                entry.patch_global_frame(*frame);
            }
        }
        StatePatch::QueueGroupTrueUps(targets) => {
            state.queued_true_ups.extend(targets.iter().cloned());
        }
        StatePatch::UpdateSelectedViews(views) => {
            state.selected_views = views.clone();
        }
    }
}

fn ordered_children_entry<'a>(
    state: &'a mut EditorState,
    parent: &ElementPath,
) -> &'a mut Vec<ElementPath> {
    let key = parent.to_path_string();
    let metadata = &state.metadata;
    state
        .child_order
        .entry(key)
        .or_insert_with(|| metadata.children_paths_ordered(parent))
}

fn apply_reorder(state: &mut EditorState, target: &ElementPath, index: usize) {
    let parent = target.parent();
    let children = ordered_children_entry(state, &parent);
    if let Some(current) = children.iter().position(|child| child == target) {
        let element = children.remove(current);
        let clamped = index.min(children.len());
        children.insert(clamped, element);
    }
}

fn apply_duplicate(state: &mut EditorState, target: &ElementPath, new_uid: &str) {
    let parent = target.parent();
    let duplicate = parent.append(new_uid);

    let children = ordered_children_entry(state, &parent);
    if children.iter().any(|child| child == &duplicate) {
        return;
    }
    let insert_at = children
        .iter()
        .position(|child| child == target)
        .map(|idx| idx + 1)
        .unwrap_or(children.len());
    children.insert(insert_at, duplicate.clone());

    if let Some(store) = state.style_stores.get(&target.to_path_string()).cloned() {
        state.style_stores.insert(duplicate.to_path_string(), store);
    }
}

fn apply_reparent(state: &mut EditorState, target: &ElementPath, new_parent: &ElementPath) {
    let Some(uid) = target.uid().map(str::to_owned) else {
        return;
    };
    let old_parent = target.parent();
    let old_children = ordered_children_entry(state, &old_parent);
    old_children.retain(|child| child != target);

    let new_path = new_parent.append(&uid);
    let new_children = ordered_children_entry(state, new_parent);
    if !new_children.iter().any(|child| child == &new_path) {
        new_children.push(new_path.clone());
    }

    if let Some(store) = state.style_stores.remove(&target.to_path_string()) {
        state.style_stores.insert(new_path.to_path_string(), store);
    }
}

#[cfg(test)]
#[path = "tests/patches_tests.rs"]
mod tests;
