//! Camera module - ground-plane camera and its input controller
//!
//! The camera only ever moves across the texture plane and turns about
//! its own origin; there is no pitch or roll.

mod state;
mod controller;

pub use state::*;
pub use controller::*;
