//! Command pipeline & editor state patches for Maquette
//!
//! Commands are data: a closed sum type with one interpreter per variant,
//! each producing pure diff descriptors ([`StatePatch`]) plus a
//! human-readable description. The fold pipeline filters commands by
//! lifecycle phase and applies them against a progressively patched working
//! state, so mid-interaction previews can be discarded wholesale on abort.

mod commands;
mod editor_state;
mod groups;
mod patches;

pub use commands::*;
pub use editor_state::*;
pub use groups::*;
pub use patches::*;
