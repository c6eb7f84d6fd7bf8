//! Canvas interaction strategies for Maquette
//!
//! Strategies read the current metadata snapshot and gesture state, score
//! their own applicability, and emit ordered commands. One strategy is
//! active per tick: the highest-fitness candidate, ties broken by
//! registration order.

mod grid;
mod interaction;
mod reorder;
mod reparent;
mod strategy;

pub use grid::*;
pub use interaction::*;
pub use reorder::*;
pub use reparent::*;
pub use strategy::*;
