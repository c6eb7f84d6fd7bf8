//! Infinity sentinel for frames of unbounded elements

use crate::CanvasRect;

/// A value that may be the infinity sentinel.
///
/// Storyboard-like roots span unbounded content and report an infinite frame
/// rather than a measured rectangle. Aggregations over children widen to
/// `Infinity` conservatively: a single infinite child makes the parent frame
/// infinite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaybeInfinite<T> {
    Finite(T),
    Infinity,
}

impl<T> MaybeInfinite<T> {
    pub fn is_infinite(&self) -> bool {
        matches!(self, MaybeInfinite::Infinity)
    }

    pub fn is_finite(&self) -> bool {
        matches!(self, MaybeInfinite::Finite(_))
    }

    pub fn as_finite(&self) -> Option<&T> {
        match self {
            MaybeInfinite::Finite(value) => Some(value),
            MaybeInfinite::Infinity => None,
        }
    }

    pub fn into_finite(self) -> Option<T> {
        match self {
            MaybeInfinite::Finite(value) => Some(value),
            MaybeInfinite::Infinity => None,
        }
    }

    pub fn map_finite<U>(self, f: impl FnOnce(T) -> U) -> MaybeInfinite<U> {
        match self {
            MaybeInfinite::Finite(value) => MaybeInfinite::Finite(f(value)),
            MaybeInfinite::Infinity => MaybeInfinite::Infinity,
        }
    }
}

impl<T> From<T> for MaybeInfinite<T> {
    fn from(value: T) -> Self {
        MaybeInfinite::Finite(value)
    }
}

/// Bounding frame of a set of child frames.
///
/// Returns `None` for an empty slice. If every child is finite the result is
/// the finite bounding rectangle; if any child is infinite the result widens
/// to `Infinity` rather than silently shrinking.
pub fn bounding_frame_from_children(
    frames: &[MaybeInfinite<CanvasRect>],
) -> Option<MaybeInfinite<CanvasRect>> {
    if frames.is_empty() {
        return None;
    }
    let finite: Vec<CanvasRect> = frames.iter().filter_map(|f| f.as_finite().copied()).collect();
    if finite.len() == frames.len() {
        crate::bounding_rectangle_array(&finite).map(MaybeInfinite::Finite)
    } else {
        Some(MaybeInfinite::Infinity)
    }
}

#[cfg(test)]
#[path = "tests/infinite_tests.rs"]
mod tests;
