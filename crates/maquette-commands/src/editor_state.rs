//! Versioned editor state the command pipeline patches

use indexmap::IndexMap;
use maquette_geometry::{CanvasRect, FramePoint};
use maquette_model::{ElementInstanceMetadataMap, ElementPath};
use rustc_hash::{FxHashMap, FxHashSet};
use std::fmt;

/// A declarative style value as authored, unit preserved.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    Number(f64),
    Px(f64),
    Percent(f64),
    Keyword(String),
}

impl StyleValue {
    pub fn keyword(value: &str) -> Self {
        StyleValue::Keyword(value.to_owned())
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(value) | StyleValue::Px(value) => Some(*value),
            StyleValue::Percent(_) | StyleValue::Keyword(_) => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(value) => write!(f, "{value}"),
            StyleValue::Px(value) => write!(f, "{value}px"),
            StyleValue::Percent(value) => write!(f, "{value}%"),
            StyleValue::Keyword(value) => f.write_str(value),
        }
    }
}

/// Authored style properties of one element, in authoring order.
pub type StyleStore = IndexMap<String, StyleValue>;

/// Cursor feedback shown over the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CssCursor {
    Default,
    Move,
    NotPermitted,
    Duplicate,
    ResizeNESW,
    ResizeNWSE,
}

impl CssCursor {
    pub fn as_str(&self) -> &'static str {
        match self {
            CssCursor::Default => "default",
            CssCursor::Move => "move",
            CssCursor::NotPermitted => "not-allowed",
            CssCursor::Duplicate => "copy",
            CssCursor::ResizeNESW => "nesw-resize",
            CssCursor::ResizeNWSE => "nwse-resize",
        }
    }
}

/// An intended frame for a target, accumulated while a gesture previews.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameAndTarget {
    pub target: ElementPath,
    pub frame: CanvasRect,
}

/// The editor state the pipeline folds commands into.
///
/// Structural data that would live in source code (child order, authored
/// style, group markers, constraints) is held in explicit stores here; the
/// parser/printer that syncs them to text is an external collaborator.
/// Commands never mutate this directly: every change flows through
/// [`crate::apply_patch`].
#[derive(Clone, Debug, Default)]
pub struct EditorState {
    pub metadata: ElementInstanceMetadataMap,
    pub selected_views: Vec<ElementPath>,
    pub highlighted_views: Vec<ElementPath>,
    pub hidden_instances: Vec<ElementPath>,
    /// Authored style per element, keyed by path string.
    pub style_stores: FxHashMap<String, StyleStore>,
    /// Declarative child order per parent, keyed by path string.
    pub child_order: FxHashMap<String, Vec<ElementPath>>,
    /// Elements whose bounds are derived from their children.
    pub group_containers: FxHashSet<String>,
    /// Resize constraints per element (`data-constraints`).
    pub element_constraints: FxHashMap<String, Vec<FramePoint>>,
    pub cursor: Option<CssCursor>,
    pub strategy_intended_bounds: Vec<FrameAndTarget>,
    pub elements_to_rerender: Vec<ElementPath>,
    /// Group ancestors queued for a true-up after the next walk.
    pub queued_true_ups: Vec<ElementPath>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style_of(&self, target: &ElementPath) -> Option<&StyleStore> {
        self.style_stores.get(&target.to_path_string())
    }

    pub fn style_value(&self, target: &ElementPath, property: &str) -> Option<&StyleValue> {
        self.style_of(target).and_then(|store| store.get(property))
    }

    /// Declarative children of `parent`: the authored order when known,
    /// otherwise the render order recorded in metadata.
    pub fn children_of(&self, parent: &ElementPath) -> Vec<ElementPath> {
        if let Some(children) = self.child_order.get(&parent.to_path_string()) {
            return children.clone();
        }
        self.metadata.children_paths_ordered(parent)
    }

    pub fn is_group(&self, target: &ElementPath) -> bool {
        self.group_containers.contains(&target.to_path_string())
    }

    pub fn constraints_for(&self, target: &ElementPath) -> Vec<FramePoint> {
        self.element_constraints
            .get(&target.to_path_string())
            .cloned()
            .unwrap_or_default()
    }

    /// Whether a dimension is authored to hug its content.
    pub fn is_hug_from_style(&self, target: &ElementPath, dimension: &str) -> bool {
        matches!(
            self.style_value(target, dimension),
            Some(StyleValue::Keyword(keyword)) if keyword == "max-content" || keyword == "min-content"
        )
    }

    /// Every uid in use, for collision-free uid generation.
    pub fn existing_uids(&self) -> FxHashSet<String> {
        let mut uids = FxHashSet::default();
        let mut note_path = |path: &ElementPath| {
            if let Some(uid) = path.uid() {
                uids.insert(uid.to_owned());
            }
        };
        for key in self.style_stores.keys() {
            note_path(&ElementPath::from_string(key));
        }
        for children in self.child_order.values() {
            for child in children {
                note_path(child);
            }
        }
        for path in self.metadata.paths() {
            note_path(&path);
        }
        uids
    }
}

/// Generates a three-letter uid not present in `existing`.
pub fn generate_consistent_uid(existing: &FxHashSet<String>) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
    for a in ALPHABET {
        for b in ALPHABET {
            for c in ALPHABET {
                let candidate = String::from_utf8_lossy(&[*a, *b, *c]).into_owned();
                if !existing.contains(&candidate) {
                    return candidate;
                }
            }
        }
    }
    // 17k uids exhausted; extend with a numeric suffix.
    let mut counter = 0usize;
    loop {
        let candidate = format!("uid{counter}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
#[path = "tests/editor_state_tests.rs"]
mod tests;
