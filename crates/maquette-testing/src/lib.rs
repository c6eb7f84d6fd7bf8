//! Testing utilities and fixtures for Maquette
//!
//! An in-memory [`TestSurface`] implementing the render surface contract,
//! plus metadata fixtures, shared by the unit and integration tests of the
//! other workspace crates.

mod fixtures;
mod test_surface;

pub use fixtures::*;
pub use test_surface::*;
