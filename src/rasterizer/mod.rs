//! Mode 7 software rasterizer
//!
//! Features:
//! - Per-scanline perspective sampling of a flat map texture
//! - Trapezoidal camera frustum in texture space
//! - Mosaic (resolution) degradation
//! - Texture wrap-around or floor-plane fallback

mod math;
mod types;
mod frustum;
mod render;

pub use math::*;
pub use types::*;
pub use frustum::*;
pub use render::*;

/// Screen dimensions (authentic SNES resolution)
pub const WIDTH: usize = 256;
pub const HEIGHT: usize = 224;

/// Width of the top-down preview
pub const PREVIEW_WIDTH: usize = 250;
