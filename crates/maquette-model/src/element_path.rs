//! Stable hierarchical identifiers for rendered elements
//!
//! An [`ElementPath`] identifies an element across re-renders, independent of
//! its transient node identity in the live tree. A path is a sequence of
//! parts, one part per component instantiation boundary, each part an ordered
//! list of uid segments. The string form joins segments with `/` and parts
//! with `:`, and round-trips through [`ElementPath::from_string`].
//!
//! Elements produced by repetition carry an instance suffix on their uid
//! (`card~~~2`); the "static" uid collapses that suffix, which is how
//! generated elements are detected.

use std::fmt;

const PART_SEPARATOR: char = ':';
const SEGMENT_SEPARATOR: char = '/';
const INSTANCE_SUFFIX: &str = "~~~";

/// One component-instantiation boundary worth of uid segments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct PathPart(pub Vec<String>);

impl PathPart {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    fn to_part_string(&self) -> String {
        self.0.join(&SEGMENT_SEPARATOR.to_string())
    }
}

/// Stable structural identifier for a UI element instance.
///
/// Immutable once constructed; all operations return new paths. Equality is
/// segment-sequence equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ElementPath {
    parts: Vec<PathPart>,
}

impl ElementPath {
    pub fn empty() -> Self {
        Self { parts: Vec::new() }
    }

    pub fn new(parts: Vec<PathPart>) -> Self {
        Self { parts }
    }

    /// Builds a single-part path from uid segments.
    pub fn from_segments<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self {
            parts: vec![PathPart(segments.into_iter().map(Into::into).collect())],
        }
    }

    pub fn parts(&self) -> &[PathPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(|part| part.0.is_empty())
    }

    /// Total number of uid segments across all parts.
    pub fn depth(&self) -> usize {
        self.parts.iter().map(|part| part.0.len()).sum()
    }

    /// The last uid segment, or `None` for the empty path.
    pub fn uid(&self) -> Option<&str> {
        self.parts
            .iter()
            .rev()
            .find_map(|part| part.0.last().map(String::as_str))
    }

    /// The last uid with any instance suffix collapsed.
    pub fn static_uid(&self) -> Option<String> {
        self.uid().map(strip_instance_suffix)
    }

    /// True when the element was generated by repetition or duplication:
    /// its uid carries an instance suffix the static uid does not.
    pub fn is_root_of_generated_element(&self) -> bool {
        match (self.uid(), self.static_uid()) {
            (Some(uid), Some(static_uid)) => uid != static_uid,
            _ => false,
        }
    }

    /// The path with the last segment removed. The empty path is its own
    /// parent.
    pub fn parent(&self) -> ElementPath {
        let mut parts = self.parts.clone();
        while let Some(last) = parts.last_mut() {
            if last.0.pop().is_some() {
                if last.0.is_empty() {
                    parts.pop();
                }
                return ElementPath { parts };
            }
            parts.pop();
        }
        ElementPath { parts }
    }

    /// Appends a uid segment to the last part.
    pub fn append(&self, uid: impl Into<String>) -> ElementPath {
        let mut parts = self.parts.clone();
        match parts.last_mut() {
            Some(last) => last.0.push(uid.into()),
            None => parts.push(PathPart(vec![uid.into()])),
        }
        ElementPath { parts }
    }

    /// Starts a new part, entering a component instantiation boundary.
    pub fn append_part<S: Into<String>>(
        &self,
        segments: impl IntoIterator<Item = S>,
    ) -> ElementPath {
        let mut parts = self.parts.clone();
        parts.push(PathPart(segments.into_iter().map(Into::into).collect()));
        ElementPath { parts }
    }

    /// Strict descendant check: the receiver is below `other` and not equal
    /// to it.
    pub fn is_descendant_of(&self, other: &ElementPath) -> bool {
        self != other && self.is_descendant_of_or_equal_to(other)
    }

    pub fn is_descendant_of_or_equal_to(&self, other: &ElementPath) -> bool {
        if other.is_empty() {
            return true;
        }
        if other.parts.len() > self.parts.len() {
            return false;
        }
        let last_idx = other.parts.len() - 1;
        for idx in 0..last_idx {
            if self.parts[idx] != other.parts[idx] {
                return false;
            }
        }
        let own_last = &self.parts[last_idx].0;
        let other_last = &other.parts[last_idx].0;
        if own_last.len() < other_last.len() {
            return false;
        }
        if own_last[..other_last.len()] != other_last[..] {
            return false;
        }
        // A partial-part match only counts when the receiver continues past
        // the prefix, either within the part or into deeper parts.
        own_last.len() > other_last.len() || self.parts.len() >= other.parts.len()
    }

    /// Collapses instance suffixes in the last part, producing the "static"
    /// variant used to match against valid-path annotations.
    pub fn make_last_part_static(&self) -> ElementPath {
        let mut parts = self.parts.clone();
        if let Some(last) = parts.last_mut() {
            for segment in &mut last.0 {
                *segment = strip_instance_suffix(segment);
            }
        }
        ElementPath { parts }
    }

    /// Membership test against a slice of paths.
    pub fn contained_in(&self, paths: &[ElementPath]) -> bool {
        paths.iter().any(|p| p == self)
    }

    pub fn to_path_string(&self) -> String {
        self.parts
            .iter()
            .map(PathPart::to_part_string)
            .collect::<Vec<_>>()
            .join(&PART_SEPARATOR.to_string())
    }

    /// Parses the string form produced by [`Self::to_path_string`].
    pub fn from_string(value: &str) -> ElementPath {
        if value.is_empty() {
            return ElementPath::empty();
        }
        ElementPath {
            parts: value
                .split(PART_SEPARATOR)
                .map(|part| {
                    PathPart(
                        part.split(SEGMENT_SEPARATOR)
                            .filter(|segment| !segment.is_empty())
                            .map(str::to_owned)
                            .collect(),
                    )
                })
                .filter(|part: &PathPart| !part.0.is_empty())
                .collect(),
        }
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path_string())
    }
}

fn strip_instance_suffix(uid: &str) -> String {
    match uid.find(INSTANCE_SUFFIX) {
        Some(idx) => uid[..idx].to_owned(),
        None => uid.to_owned(),
    }
}

/// A path paired with its string form, avoiding re-serialisation in the hot
/// paths that key maps by path string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathWithString {
    pub path: ElementPath,
    pub as_string: String,
}

impl PathWithString {
    pub fn new(path: ElementPath) -> Self {
        let as_string = path.to_path_string();
        Self { path, as_string }
    }
}

impl From<ElementPath> for PathWithString {
    fn from(path: ElementPath) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
#[path = "tests/element_path_tests.rs"]
mod tests;
