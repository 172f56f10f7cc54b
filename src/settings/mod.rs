//! Settings - view parameters, partial updates and per-map presets
//!
//! Uses RON (Rusty Object Notation) for human-readable preset files.

mod view;
mod presets;

pub use view::*;
pub use presets::*;
