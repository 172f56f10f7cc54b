//! Mode 7 Engine: SNES-style pseudo-3D ground plane renderer
//!
//! Renders a forward-looking view of a flat top-down map the way mode 7
//! hardware did it:
//! - Per-scanline sampling of the map texture (no 3D geometry)
//! - Trapezoidal camera frustum with reciprocal depth interpolation
//! - Mosaic resolution degradation
//! - Low resolution (256x224)

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod rasterizer;
mod camera;
mod settings;
mod engine;
mod maps;
mod app;

use std::path::Path;
use macroquad::prelude::*;
use rasterizer::{HEIGHT, PREVIEW_WIDTH, WIDTH};
use settings::{load_presets, ViewParameters};
use maps::{discover_maps, MAPS_DIR, PRESETS_FILE};
use app::AppState;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Mode 7 Engine v{}", VERSION),
        window_width: (PREVIEW_WIDTH + WIDTH * 3) as i32 + 48,
        window_height: HEIGHT as i32 * 3 + 32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("=== Mode 7 Engine v{} ===", VERSION);

    let presets_path = Path::new(MAPS_DIR).join(PRESETS_FILE);
    let presets = match load_presets(&presets_path) {
        Ok(presets) => {
            log::info!("Loaded {} map presets", presets.len());
            presets
        }
        Err(e) => {
            log::warn!("Ignoring presets in {}: {}", presets_path.display(), e);
            Default::default()
        }
    };

    let maps = discover_maps(MAPS_DIR);
    let mut app = AppState::new(ViewParameters::default(), maps, presets, presets_path);

    // Start on the first real map if there is one, else the debug tiles
    let first = if app.maps.len() > 1 { 1 } else { 0 };
    app.select_map(first);

    loop {
        app.update();
        app.draw();
        next_frame().await;
    }
}
