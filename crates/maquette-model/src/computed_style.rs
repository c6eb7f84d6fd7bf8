//! Computed-style snapshots and stylesheet attribution

use rustc_hash::{FxHashMap, FxHashSet};

/// The computed-style keys a snapshot tracks.
///
/// Snapshots are only collected for elements in the current selection; the
/// key list is the subset the inspector surfaces.
pub const COMPUTED_STYLE_KEYS: &[&str] = &[
    "display",
    "position",
    "top",
    "right",
    "bottom",
    "left",
    "width",
    "height",
    "flexDirection",
    "justifyContent",
    "alignItems",
    "flexGrow",
    "flexShrink",
    "flexBasis",
    "gap",
    "margin",
    "padding",
    "opacity",
    "overflow",
    "fontSize",
    "fontWeight",
    "fontStyle",
    "lineHeight",
    "letterSpacing",
    "textAlign",
    "color",
    "backgroundColor",
    "borderRadius",
    "zIndex",
];

/// Raw computed-style values for the tracked keys.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ComputedStyleSnapshot {
    pub properties: FxHashMap<String, String>,
}

impl ComputedStyleSnapshot {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Which of a snapshot's properties were set by a stylesheet rule rather
/// than inline style.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct StyleAttributeMetadata {
    pub from_style_sheet: FxHashSet<String>,
}

impl StyleAttributeMetadata {
    pub fn is_from_style_sheet(&self, key: &str) -> bool {
        self.from_style_sheet.contains(key)
    }
}
