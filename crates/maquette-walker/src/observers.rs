//! Translation of external mutation/resize notifications into invalidations
//!
//! The core owns no scheduler: entry points record invalidations in the
//! session and tell the host whether a walk should be scheduled. A second
//! request while one is pending is absorbed by the sets being idempotent.

use maquette_model::ElementPath;
use maquette_surface::{NodeId, RenderSurface};

use crate::WalkerSession;

/// Whether the host should schedule a walk after an observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkRequest {
    Walk,
    NoWalk,
}

/// A structural mutation reported by the host's observer.
#[derive(Clone, Debug)]
pub struct MutationRecord {
    pub target: NodeId,
    /// Style attribute changed, or child nodes were added/removed.
    pub affects_layout: bool,
}

/// The scene an observed node belongs to, resolved the way invalidation
/// wants it: the nearest scene annotation above the node, or the node's own
/// shallowest path once the storyboard is reached.
pub fn find_parent_scene(surface: &dyn RenderSurface, node: NodeId) -> Option<String> {
    if let Some(scene_id) = surface.scene_id(node) {
        return Some(scene_id);
    }
    let parent = surface.parent(node)?;
    let parent_paths = surface.path_annotations(parent);
    let parent_is_storyboard = parent_paths.is_empty() && surface.scene_id(parent).is_none();
    if parent_is_storyboard {
        let mut own_paths: Vec<ElementPath> = surface.path_annotations(node).into_vec();
        own_paths.sort_by_key(ElementPath::depth);
        own_paths.first().map(ElementPath::to_path_string)
    } else {
        find_parent_scene(surface, parent)
    }
}

/// Resize observation. During an interaction only the selected views are
/// invalidated and no walk is requested; otherwise the owning scene of each
/// resized node is invalidated.
pub fn on_resize_observed(
    session: &mut WalkerSession,
    surface: &dyn RenderSurface,
    resized: &[NodeId],
    interaction_active: bool,
    selected_views: &[ElementPath],
) -> WalkRequest {
    if interaction_active {
        for view in selected_views {
            session.invalidate_path(view);
        }
        return WalkRequest::NoWalk;
    }
    let mut should_walk = false;
    for node in resized {
        if let Some(scene_id) = find_parent_scene(surface, *node) {
            session.invalidate_path_string(scene_id);
            should_walk = true;
        }
    }
    if should_walk {
        WalkRequest::Walk
    } else {
        WalkRequest::NoWalk
    }
}

/// Structural mutation observation, same policy as resize but filtered to
/// mutations that can move or resize elements.
pub fn on_mutation_observed(
    session: &mut WalkerSession,
    surface: &dyn RenderSurface,
    mutations: &[MutationRecord],
    interaction_active: bool,
    selected_views: &[ElementPath],
) -> WalkRequest {
    if interaction_active {
        for view in selected_views {
            session.invalidate_path(view);
        }
        return WalkRequest::NoWalk;
    }
    let mut should_walk = false;
    for mutation in mutations {
        if !mutation.affects_layout {
            continue;
        }
        if let Some(scene_id) = find_parent_scene(surface, mutation.target) {
            session.invalidate_path_string(scene_id);
            should_walk = true;
        }
    }
    if should_walk {
        WalkRequest::Walk
    } else {
        WalkRequest::NoWalk
    }
}

#[cfg(test)]
#[path = "tests/observers_tests.rs"]
mod tests;
