//! Pure math/data for canvas geometry in Maquette
//!
//! This crate contains the geometric primitives shared by the metadata
//! walker, the canvas strategies, and the command pipeline: points and
//! rectangles in canvas coordinates, the infinity sentinel for unbounded
//! frames, per-side values, and the six-point frame representation used by
//! group resizing.

mod frame_points;
mod infinite;
mod primitives;
mod sides;

pub use frame_points::*;
pub use infinite::*;
pub use primitives::*;
pub use sides::*;

pub mod prelude {
    pub use crate::frame_points::{FramePoint, FramePoints};
    pub use crate::infinite::MaybeInfinite;
    pub use crate::primitives::{CanvasPoint, CanvasRect, CanvasVector, Size};
    pub use crate::sides::Sides;
}
