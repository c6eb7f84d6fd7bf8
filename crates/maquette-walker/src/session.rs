//! Walker session: invalidation sets and caches with single-writer discipline

use maquette_model::ElementPath;
use maquette_surface::{NodeId, RenderSurface};
use rustc_hash::{FxHashMap, FxHashSet};

/// Mutable walker state, owned by the host and passed by reference into
/// every walk.
///
/// Two writers alternate on this data: observers record invalidations
/// between walks, and the walker resolves them during a walk. The walker
/// never runs concurrently with itself, so no further synchronization is
/// needed.
#[derive(Default)]
pub struct WalkerSession {
    /// Paths requiring re-measurement. By convention of callers the entire
    /// subtree under each invalidated path is treated as invalidated.
    pub invalidated_paths: FxHashSet<String>,
    /// Paths whose stylesheet-attribution cache entry must be refreshed.
    pub invalidated_paths_for_stylesheet_cache: FxHashSet<String>,
    /// Stylesheet attribution keyed by live-node identity, invalidated by
    /// path string.
    stylesheet_attribution_cache: FxHashMap<NodeId, FxHashSet<String>>,
    /// Set once the first full walk has completed; cleared to force the next
    /// walk to re-measure everything.
    pub init_complete: bool,
}

impl WalkerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a path (and by convention its subtree) for re-measurement.
    pub fn invalidate_path(&mut self, path: &ElementPath) {
        self.invalidated_paths.insert(path.to_path_string());
    }

    pub fn invalidate_path_string(&mut self, path: impl Into<String>) {
        self.invalidated_paths.insert(path.into());
    }

    pub fn invalidate_stylesheet_cache_for(&mut self, path: &ElementPath) {
        self.invalidated_paths_for_stylesheet_cache
            .insert(path.to_path_string());
    }

    /// Forces the next walk to run in forced-full mode, e.g. after a remount
    /// or an explicit invalidation-count bump.
    pub fn invalidate_all(&mut self) {
        self.init_complete = false;
        self.invalidated_paths.clear();
    }

    /// Records the scene of each newly selected view for re-measurement and
    /// refreshes the selection's stylesheet attribution.
    pub fn invalidate_for_selection_change(&mut self, selected_views: &[ElementPath]) {
        for view in selected_views {
            if let Some(scene_path) = scene_path_of(view) {
                self.invalidated_paths.insert(scene_path.to_path_string());
            }
            self.invalidated_paths_for_stylesheet_cache
                .insert(view.to_path_string());
        }
    }

    /// Cached stylesheet attribution for a node, recomputed when the path
    /// was invalidated or never seen.
    pub fn cached_style_attribution(
        &mut self,
        surface: &dyn RenderSurface,
        node: NodeId,
        path_string: &str,
    ) -> FxHashSet<String> {
        let invalidated = self
            .invalidated_paths_for_stylesheet_cache
            .contains(path_string);
        if !invalidated {
            if let Some(cached) = self.stylesheet_attribution_cache.get(&node) {
                return cached.clone();
            }
        }
        self.invalidated_paths_for_stylesheet_cache
            .remove(path_string);
        let value = surface.style_attribution(node);
        self.stylesheet_attribution_cache.insert(node, value.clone());
        value
    }
}

/// The scene a view belongs to: the first two segments of its first part
/// (storyboard + scene root).
pub fn scene_path_of(path: &ElementPath) -> Option<ElementPath> {
    let first_part = path.parts().first()?;
    let segments = first_part.segments();
    if segments.is_empty() {
        return None;
    }
    let take = segments.len().min(2);
    Some(ElementPath::from_segments(segments[..take].iter().cloned()))
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
