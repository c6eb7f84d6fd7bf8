//! Element paths and metadata types for Maquette
//!
//! The data model shared by the walker, the strategies, and the command
//! pipeline: stable hierarchical element identifiers, per-element measurement
//! records, and the grid placement types.

mod computed_style;
mod element_path;
mod grid;
mod metadata;

pub use computed_style::*;
pub use element_path::*;
pub use grid::*;
pub use metadata::*;

pub mod prelude {
    pub use crate::computed_style::{ComputedStyleSnapshot, StyleAttributeMetadata};
    pub use crate::element_path::{ElementPath, PathWithString};
    pub use crate::grid::{GridCellCoordinates, GridElementProperties, GridPosition};
    pub use crate::metadata::{
        DetectedLayoutSystem, ElementInstanceMetadata, ElementInstanceMetadataMap,
        SpecialSizeMeasurements,
    };
}
