//! The metadata walker: full, cached, and selective traversal modes

use log::debug;
use maquette_geometry::{CanvasPoint, MaybeInfinite};
use maquette_model::{
    ElementInstanceMetadata, ElementInstanceMetadataMap, ElementPath, PathWithString,
};
use maquette_surface::measure::{
    collect_computed_style, collect_metadata_for_element, is_containing_block_for_absolute,
    viewport_to_canvas, Rounding,
};
use maquette_surface::{NodeId, RenderSurface, TextContentInclusion};
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::{backfill_metadata, WalkerSession};

/// Contract violations that abort a walk immediately.
///
/// Continuing without the container or its annotations would silently
/// mismeasure, so these are surfaced as hard errors and never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalkError {
    #[error("no canvas container is mounted")]
    MissingContainer,
    #[error("canvas container carries no valid-paths annotation")]
    MissingValidPaths,
    #[error("canvas container carries no root element path annotation")]
    MissingRootPath,
}

/// Which elements a walk covers.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum RefocusTarget {
    /// Traverse the whole tree, with per-node cache reuse.
    #[default]
    AllElements,
    /// Measure only the subtrees rooted at these paths, merging on top of
    /// the previous map.
    Specific(Vec<ElementPath>),
}

#[derive(Clone, Debug)]
pub struct WalkerOptions {
    /// Collect computed-style snapshots only for the current selection.
    /// Collecting for everything is prohibitively expensive on large trees.
    pub computed_style_for_selection_only: bool,
}

impl Default for WalkerOptions {
    fn default() -> Self {
        Self {
            computed_style_for_selection_only: true,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct WalkParams {
    pub selected_views: Vec<ElementPath>,
    pub scale: f64,
    pub elements_to_focus_on: RefocusTarget,
    pub additional_elements_to_update: Vec<ElementPath>,
    pub options: WalkerOptions,
}

impl WalkParams {
    pub fn full(selected_views: Vec<ElementPath>, scale: f64) -> Self {
        Self {
            selected_views,
            scale,
            elements_to_focus_on: RefocusTarget::AllElements,
            additional_elements_to_update: Vec::new(),
            options: WalkerOptions::default(),
        }
    }
}

/// Output of a successful, non-short-circuited walk.
#[derive(Clone, Debug)]
pub struct WalkResult {
    /// Measured (and refined) entries.
    pub metadata: ElementInstanceMetadataMap,
    /// Entries synthesized by backfill for ancestors with no live node,
    /// returned separately so callers can tell measured from synthesized
    /// data.
    pub reconstructed_metadata: ElementInstanceMetadataMap,
    /// Paths served from the previous map without re-measurement.
    pub cached_paths: Vec<ElementPath>,
    /// The invalidated paths this walk resolved.
    pub touched_invalidated_paths: Vec<String>,
}

struct WalkContext<'a> {
    valid_paths: Vec<ElementPath>,
    selected_views: &'a [ElementPath],
    additional_elements_to_update: Vec<ElementPath>,
    scale: f64,
    container_origin: CanvasPoint,
    options: &'a WalkerOptions,
    paths_collected: Vec<ElementPath>,
}

/// Runs the walker.
///
/// Returns `Ok(None)` when nothing is invalidated and a full walk has
/// already completed — success with no change, not an error.
pub fn run_walk(
    surface: &dyn RenderSurface,
    params: &WalkParams,
    session: &mut WalkerSession,
    previous_metadata: &ElementInstanceMetadataMap,
) -> Result<Option<WalkResult>, WalkError> {
    let needs_walk = !session.init_complete || !session.invalidated_paths.is_empty();
    if !needs_walk {
        return Ok(None);
    }

    let container = surface.container().ok_or(WalkError::MissingContainer)?;

    let mut touched_invalidated_paths: Vec<String> =
        session.invalidated_paths.iter().cloned().collect();
    touched_invalidated_paths.sort();

    let valid_paths = parse_valid_paths(surface, container)?;

    let container_origin = viewport_to_canvas(
        surface.bounding_rect(container, TextContentInclusion::WithoutTextContent),
        params.scale,
        CanvasPoint::ZERO,
        Rounding::NearestHalf,
    )
    .origin();

    let mut ctx = WalkContext {
        valid_paths,
        selected_views: &params.selected_views,
        additional_elements_to_update: params
            .additional_elements_to_update
            .iter()
            .chain(params.selected_views.iter())
            .cloned()
            .collect(),
        scale: params.scale,
        container_origin,
        options: &params.options,
        paths_collected: Vec::new(),
    };

    let (metadata, cached_paths) = match &params.elements_to_focus_on {
        RefocusTarget::Specific(focus) => {
            debug!("walker: selective walk over {} paths", focus.len());
            selective_walk(surface, focus, &mut ctx, session, previous_metadata)
        }
        RefocusTarget::AllElements => {
            debug!(
                "walker: full walk (forced: {}, invalidated: {})",
                !session.init_complete,
                session.invalidated_paths.len()
            );
            full_walk(surface, container, &mut ctx, session, previous_metadata)?
        }
    };

    session.init_complete = true;

    let backfilled = backfill_metadata(&metadata);
    debug!(
        "walker: {} entries, {} cached, {} reconstructed",
        backfilled.updated_metadata.len(),
        cached_paths.len(),
        backfilled.reconstructed_metadata.len()
    );

    Ok(Some(WalkResult {
        metadata: backfilled.updated_metadata,
        reconstructed_metadata: backfilled.reconstructed_metadata,
        cached_paths,
        touched_invalidated_paths,
    }))
}

fn parse_valid_paths(
    surface: &dyn RenderSurface,
    container: NodeId,
) -> Result<Vec<ElementPath>, WalkError> {
    let annotation = surface
        .valid_paths_annotation(container)
        .ok_or(WalkError::MissingValidPaths)?;
    Ok(annotation
        .split_whitespace()
        .map(ElementPath::from_string)
        .collect())
}

// ---------------------------------------------------------------------------
// Full walk (worklist traversal with per-node cache decisions)
// ---------------------------------------------------------------------------

struct NodeCtx {
    closest_offset_parent: ElementPath,
    force_invalidated: bool,
    parent_acc: usize,
}

enum Visit {
    Enter(NodeId, NodeCtx),
    ExitElement {
        node: NodeId,
        annotations: Vec<PathWithString>,
        valid: Vec<PathWithString>,
        invalidated: bool,
        closest_offset_parent: ElementPath,
        own_acc: usize,
        parent_acc: usize,
    },
    ExitScene {
        node: NodeId,
        instance: PathWithString,
        invalidated: bool,
        own_acc: usize,
        parent_acc: usize,
    },
}

fn full_walk(
    surface: &dyn RenderSurface,
    container: NodeId,
    ctx: &mut WalkContext<'_>,
    session: &mut WalkerSession,
    previous_metadata: &ElementInstanceMetadataMap,
) -> Result<(ElementInstanceMetadataMap, Vec<ElementPath>), WalkError> {
    let root_path_string = surface
        .root_element_path(container)
        .ok_or(WalkError::MissingRootPath)?;
    let root_path = ElementPath::from_string(&root_path_string);

    session.invalidated_paths.remove(&root_path_string);
    ctx.paths_collected.push(root_path.clone());

    let force_invalidated = !session.init_complete;

    if session.invalidated_paths.is_empty()
        && !previous_metadata.is_empty()
        && ctx.additional_elements_to_update.is_empty()
        && !force_invalidated
    {
        // No mutation anywhere on the canvas: serve the previous map whole.
        return Ok((previous_metadata.clone(), vec![root_path]));
    }

    let mut working = ElementInstanceMetadataMap::new();
    let mut cached_paths: Vec<ElementPath> = Vec::new();
    let mut accumulators: Vec<Vec<ElementPath>> = vec![Vec::new()];
    let root_acc = 0;

    let mut stack: Vec<Visit> = Vec::new();
    for child in surface.children(container).into_iter().rev() {
        stack.push(Visit::Enter(
            child,
            NodeCtx {
                closest_offset_parent: root_path.clone(),
                force_invalidated,
                parent_acc: root_acc,
            },
        ));
    }

    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(node, node_ctx) => {
                enter_node(surface, node, node_ctx, ctx, session, &mut accumulators, &mut stack);
            }
            Visit::ExitElement {
                node,
                annotations,
                valid,
                invalidated,
                closest_offset_parent,
                own_acc,
                parent_acc,
            } => {
                let children = unique_paths(accumulators[own_acc].clone());
                let collected = collect_metadata(
                    surface,
                    node,
                    &annotations,
                    &valid,
                    invalidated,
                    &closest_offset_parent,
                    &children,
                    ctx,
                    session,
                    previous_metadata,
                    &mut working,
                    &mut cached_paths,
                );
                accumulators[parent_acc].extend(collected);
            }
            Visit::ExitScene {
                node,
                instance,
                invalidated,
                own_acc,
                parent_acc,
            } => {
                let children = unique_paths(accumulators[own_acc].clone());
                let annotations = vec![instance.clone()];
                let collected = collect_metadata(
                    surface,
                    node,
                    &annotations,
                    &annotations,
                    invalidated,
                    &instance.path,
                    &children,
                    ctx,
                    session,
                    previous_metadata,
                    &mut working,
                    &mut cached_paths,
                );
                ctx.paths_collected.push(instance.path.clone());
                accumulators[parent_acc].extend(collected);
            }
        }
    }

    // The canvas root renders as a fragment and is invisible to the walk, so
    // a synthetic storyboard entry hosts the top-level child metadata.
    let mut root_entry = ElementInstanceMetadata::synthesized(root_path.clone());
    root_entry.tag_name = "storyboard".to_owned();
    root_entry.global_frame = Some(MaybeInfinite::Infinity);
    root_entry.non_rounded_global_frame = Some(MaybeInfinite::Infinity);
    root_entry.children_paths = Some(unique_paths(accumulators[root_acc].clone()));
    working.insert(root_entry);

    Ok((working, cached_paths))
}

#[allow(clippy::too_many_arguments)]
fn enter_node(
    surface: &dyn RenderSurface,
    node: NodeId,
    node_ctx: NodeCtx,
    ctx: &mut WalkContext<'_>,
    session: &mut WalkerSession,
    accumulators: &mut Vec<Vec<ElementPath>>,
    stack: &mut Vec<Visit>,
) {
    // Nested scenes restart path resolution with a fresh containing-block
    // context; the scene's own frame is derived after its subtree.
    if let Some(scene_id) = surface.scene_id(node) {
        let instance = PathWithString::new(ElementPath::from_string(&scene_id));
        let invalidated_scene =
            node_ctx.force_invalidated || session.invalidated_paths.contains(&scene_id);
        session.invalidated_paths.remove(&scene_id);

        let own_acc = accumulators.len();
        accumulators.push(Vec::new());

        stack.push(Visit::ExitScene {
            node,
            instance: instance.clone(),
            invalidated: invalidated_scene,
            own_acc,
            parent_acc: node_ctx.parent_acc,
        });
        for child in surface.children(node).into_iter().rev() {
            stack.push(Visit::Enter(
                child,
                NodeCtx {
                    closest_offset_parent: instance.path.clone(),
                    force_invalidated: invalidated_scene,
                    parent_acc: own_acc,
                },
            ));
        }
        return;
    }

    let annotations: Vec<PathWithString> = surface
        .path_annotations(node)
        .into_iter()
        .map(PathWithString::new)
        .collect();

    let mut invalidated = node_ctx.force_invalidated;
    for annotation in &annotations {
        if session.invalidated_paths.contains(&annotation.as_string) {
            invalidated = true;
        }
        session.invalidated_paths.remove(&annotation.as_string);
    }

    // A containing block resets the coordinate origin for its absolute
    // descendants.
    let closest_offset_parent = if is_containing_block_for_absolute(surface, node) {
        deepest_annotation(&annotations)
            .cloned()
            .unwrap_or_else(|| node_ctx.closest_offset_parent.clone())
    } else {
        node_ctx.closest_offset_parent.clone()
    };

    let valid: Vec<PathWithString> = annotations
        .iter()
        .filter(|annotation| {
            let static_path = annotation.path.make_last_part_static();
            ctx.valid_paths.iter().any(|vp| static_path == *vp)
        })
        .cloned()
        .collect();
    ctx.paths_collected
        .extend(valid.iter().map(|p| p.path.clone()));

    let own_acc = accumulators.len();
    accumulators.push(Vec::new());

    stack.push(Visit::ExitElement {
        node,
        annotations,
        valid,
        invalidated,
        closest_offset_parent: node_ctx.closest_offset_parent,
        own_acc,
        parent_acc: node_ctx.parent_acc,
    });

    if !surface.do_not_traverse(node) {
        for child in surface.children(node).into_iter().rev() {
            stack.push(Visit::Enter(
                child,
                NodeCtx {
                    closest_offset_parent: closest_offset_parent.clone(),
                    force_invalidated: node_ctx.force_invalidated,
                    parent_acc: own_acc,
                },
            ));
        }
    }
}

fn deepest_annotation(annotations: &[PathWithString]) -> Option<&ElementPath> {
    annotations
        .iter()
        .map(|annotation| &annotation.path)
        .max_by_key(|path| path.depth())
}

/// Per-node decision: recompute, or serve every attached path from cache.
#[allow(clippy::too_many_arguments)]
fn collect_metadata(
    surface: &dyn RenderSurface,
    node: NodeId,
    annotations: &[PathWithString],
    valid: &[PathWithString],
    invalidated: bool,
    closest_offset_parent: &ElementPath,
    children: &[ElementPath],
    ctx: &mut WalkContext<'_>,
    session: &mut WalkerSession,
    previous_metadata: &ElementInstanceMetadataMap,
    working: &mut ElementInstanceMetadataMap,
    cached_paths: &mut Vec<ElementPath>,
) -> Vec<ElementPath> {
    let parent_visited = annotations.iter().any(|annotation| {
        let parent = annotation.path.parent();
        ctx.paths_collected.contains(&parent)
    });

    if valid.is_empty() && parent_visited {
        return Vec::new();
    }

    let forced_by_selection = valid.iter().any(|p| {
        ctx.additional_elements_to_update
            .iter()
            .any(|additional| *additional == p.path)
    });

    let should_collect = !parent_visited || invalidated || forced_by_selection;

    if !should_collect {
        let cached: Vec<&ElementInstanceMetadata> = valid
            .iter()
            .filter_map(|p| previous_metadata.get_by_string(&p.as_string))
            .collect();
        if cached.len() == valid.len() {
            for entry in cached {
                working.insert(entry.clone());
            }
            cached_paths.extend(valid.iter().map(|p| p.path.clone()));
            return valid.iter().map(|p| p.path.clone()).collect();
        }
        // A path with no cached entry cannot be served partially; escalate
        // this one node to a forced recompute.
        debug!(
            "walker: incomplete cache for node, forcing recompute of {} paths",
            valid.len()
        );
    }

    let paths_to_create: Vec<PathWithString> = if parent_visited {
        valid.to_vec()
    } else {
        annotations.to_vec()
    };
    collect_and_create(
        surface,
        node,
        &paths_to_create,
        closest_offset_parent,
        children,
        ctx,
        session,
        working,
    );
    paths_to_create.iter().map(|p| p.path.clone()).collect()
}

#[allow(clippy::too_many_arguments)]
fn collect_and_create(
    surface: &dyn RenderSurface,
    node: NodeId,
    paths: &[PathWithString],
    closest_offset_parent: &ElementPath,
    children: &[ElementPath],
    ctx: &mut WalkContext<'_>,
    session: &mut WalkerSession,
    working: &mut ElementInstanceMetadataMap,
) {
    if paths.is_empty() {
        return;
    }

    let measured = collect_metadata_for_element(
        surface,
        node,
        Some(closest_offset_parent.clone()),
        ctx.scale,
        ctx.container_origin,
    );

    let is_selected = ctx
        .selected_views
        .iter()
        .any(|sv| paths.iter().any(|p| p.path == *sv));
    let collect_style = is_selected || !ctx.options.computed_style_for_selection_only;
    let (computed_style, attribute_metadata) = if collect_style {
        let attribution = session.cached_style_attribution(surface, node, &paths[0].as_string);
        collect_computed_style(surface, node, true, &attribution)
    } else {
        (None, None)
    };

    for path in paths {
        session.invalidated_paths.remove(&path.as_string);
        let mut entry = ElementInstanceMetadata::measured(
            path.path.clone(),
            measured.tag_name.clone(),
            measured.global_frame,
            measured.non_rounded_global_frame,
            measured.special_size_measurements.clone(),
            computed_style.clone(),
            attribute_metadata.clone(),
            measured.text_content.clone(),
        );
        if !children.is_empty() {
            entry.children_paths = Some(children.to_vec());
        }
        working.insert(entry);
    }
}

fn unique_paths(paths: Vec<ElementPath>) -> Vec<ElementPath> {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    paths
        .into_iter()
        .filter(|path| seen.insert(path.to_path_string()))
        .collect()
}

// ---------------------------------------------------------------------------
// Selective walk
// ---------------------------------------------------------------------------

fn selective_walk(
    surface: &dyn RenderSurface,
    focus: &[ElementPath],
    ctx: &mut WalkContext<'_>,
    session: &mut WalkerSession,
    previous_metadata: &ElementInstanceMetadataMap,
) -> (ElementInstanceMetadataMap, Vec<ElementPath>) {
    let mut working = ElementInstanceMetadataMap::new();

    for focus_path in focus {
        // The live tree may only contain deeper elements of a component
        // instance, so the focused root is found by path prefix, not
        // equality.
        let Some(root) = surface.find_by_path_prefix(focus_path) else {
            debug!("walker: no live node for focused path {focus_path}");
            continue;
        };

        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            let annotations: Vec<PathWithString> = surface
                .path_annotations(node)
                .into_iter()
                .map(PathWithString::new)
                .collect();

            if !annotations.is_empty() {
                let valid: Vec<PathWithString> = annotations
                    .iter()
                    .filter(|annotation| {
                        let static_path = annotation.path.make_last_part_static();
                        ctx.valid_paths
                            .iter()
                            .any(|vp| static_path.is_descendant_of_or_equal_to(vp))
                    })
                    .cloned()
                    .collect();
                ctx.paths_collected
                    .extend(valid.iter().map(|p| p.path.clone()));
                collect_and_create(
                    surface,
                    node,
                    &valid,
                    focus_path,
                    &[],
                    ctx,
                    session,
                    &mut working,
                );
            }
            stack.extend(surface.children(node));
        }
    }

    // Untouched entries are the ones not under any re-measured path; prefix
    // containment, not equality, decides that.
    let updated_paths: Vec<ElementPath> = working
        .keys()
        .map(|key| ElementPath::from_string(key))
        .collect();
    let mut merged = ElementInstanceMetadataMap::new();
    let mut cached_paths: Vec<ElementPath> = Vec::new();
    for (key, entry) in previous_metadata.iter() {
        let path = ElementPath::from_string(key);
        let touched = updated_paths
            .iter()
            .any(|updated| path.is_descendant_of_or_equal_to(updated));
        if !touched {
            cached_paths.push(path);
            merged.insert(entry.clone());
        }
    }
    merged.merge_from(&working);

    (merged, cached_paths)
}

#[cfg(test)]
#[path = "tests/walk_tests.rs"]
mod tests;
