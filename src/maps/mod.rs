//! Maps - discovery of map images and asynchronous loading

mod catalog;
mod loader;

pub use catalog::*;
pub use loader::*;
