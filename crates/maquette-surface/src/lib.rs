//! Live render surface contract & measurement unit for Maquette
//!
//! The [`RenderSurface`] trait is the data contract against the external
//! rendering layer: a handle onto the live tree that can report structure,
//! annotations, and computed geometry/style for any node synchronously. The
//! `measure` module turns those raw readings into the derived measurements
//! stored in element metadata.

mod contract;
pub mod measure;
pub mod parse;

pub use contract::*;
