//! Six-point frame representation used by group resizing

use crate::{CanvasRect, Size};

/// Names the six members of a [`FramePoints`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FramePoint {
    Left,
    Top,
    Right,
    Bottom,
    Width,
    Height,
}

/// A local frame expressed through all six pin points.
///
/// `left + width + right` equals the parent width, and likewise for the
/// vertical axis. Carrying the redundant members lets a resize keep
/// "hug"-constrained points fixed while the rest scale.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FramePoints {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl FramePoints {
    /// Expands a local rectangle into six points against the parent size.
    pub fn from_local_rect(rect: CanvasRect, parent_size: Size) -> Self {
        Self {
            left: rect.x,
            top: rect.y,
            right: parent_size.width - (rect.x + rect.width),
            bottom: parent_size.height - (rect.y + rect.height),
            width: rect.width,
            height: rect.height,
        }
    }

    /// The local rectangle described by the left/top/width/height members.
    pub fn to_local_rect(&self) -> CanvasRect {
        CanvasRect {
            x: self.left,
            y: self.top,
            width: self.width,
            height: self.height,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    pub fn get(&self, point: FramePoint) -> f64 {
        match point {
            FramePoint::Left => self.left,
            FramePoint::Top => self.top,
            FramePoint::Right => self.right,
            FramePoint::Bottom => self.bottom,
            FramePoint::Width => self.width,
            FramePoint::Height => self.height,
        }
    }

    pub fn round_to_nearest_whole(&self) -> Self {
        Self {
            left: self.left.round(),
            top: self.top.round(),
            right: self.right.round(),
            bottom: self.bottom.round(),
            width: self.width.round(),
            height: self.height.round(),
        }
    }
}

/// Scales a six-point frame from an old parent size into a new one.
///
/// Constrained points keep their pixel value. The unconstrained points on
/// each axis share the parent space left over after the constrained points
/// are subtracted, scaled by the ratio of the remaining space in the new
/// parent to the remaining space in the old one.
pub fn transform_constrained_frame(
    new_size: Size,
    old_size: Size,
    frame: FramePoints,
    constrained: &[FramePoint],
) -> FramePoints {
    let horizontal = [FramePoint::Left, FramePoint::Width, FramePoint::Right];
    let vertical = [FramePoint::Top, FramePoint::Height, FramePoint::Bottom];

    let scale_axis = |points: [FramePoint; 3], old_total: f64, new_total: f64| -> [f64; 3] {
        let constrained_sum: f64 = points
            .iter()
            .filter(|p| constrained.contains(p))
            .map(|p| frame.get(*p))
            .sum();
        let remaining_old = old_total - constrained_sum;
        let remaining_new = new_total - constrained_sum;
        let ratio = if remaining_old == 0.0 {
            1.0
        } else {
            remaining_new / remaining_old
        };
        points.map(|p| {
            if constrained.contains(&p) {
                frame.get(p)
            } else {
                frame.get(p) * ratio
            }
        })
    };

    let [left, width, right] = scale_axis(horizontal, old_size.width, new_size.width);
    let [top, height, bottom] = scale_axis(vertical, old_size.height, new_size.height);

    FramePoints {
        left,
        top,
        right,
        bottom,
        width,
        height,
    }
}

#[cfg(test)]
#[path = "tests/frame_points_tests.rs"]
mod tests;
