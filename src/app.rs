//! Application state and host glue
//!
//! Samples the keyboard and mouse, turns them into engine input and setting
//! patches, and blits the engine's framebuffers to the window.

use std::path::PathBuf;
use macroquad::prelude::*;
use crate::camera::{HeldInputs, InputAction};
use crate::engine::RenderEngine;
use crate::maps::{MapEntry, MapLoader};
use crate::rasterizer::{Framebuffer, Vec2 as MapPoint, HEIGHT, PREVIEW_WIDTH, WIDTH};
use crate::settings::{save_presets, Presets, SettingsPatch, ViewParameters, MAX_RESOLUTION};

const PADDING: f32 = 16.0;
const TEXT_SIZE: f32 = 16.0;
const HORIZON_STEP: f32 = 0.1;
const BG_COLOR: Color = Color::new(0.10, 0.10, 0.12, 1.0);
const TEXT_COLOR: Color = Color::new(0.9, 0.9, 0.9, 1.0);
const MUTED_COLOR: Color = Color::new(0.6, 0.6, 0.65, 1.0);

/// Key bindings for held camera actions
const BINDINGS: [(KeyCode, InputAction); 10] = [
    (KeyCode::A, InputAction::RotateLeft),
    (KeyCode::Left, InputAction::RotateLeft),
    (KeyCode::D, InputAction::RotateRight),
    (KeyCode::Right, InputAction::RotateRight),
    (KeyCode::W, InputAction::Forward),
    (KeyCode::Up, InputAction::Forward),
    (KeyCode::S, InputAction::Backward),
    (KeyCode::Down, InputAction::Backward),
    (KeyCode::LeftShift, InputAction::SpeedBoost),
    (KeyCode::RightShift, InputAction::SpeedBoost),
];

const MAP_KEYS: [KeyCode; 9] = [
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
    KeyCode::Key8,
    KeyCode::Key9,
];

/// Main application state
pub struct AppState {
    pub engine: RenderEngine,
    pub maps: Vec<MapEntry>,
    pub current_map: Option<usize>,
    presets: Presets,
    presets_path: PathBuf,
    loader: MapLoader,
    screen_fb: Framebuffer,
    preview_fb: Framebuffer,
    debug_fb: Framebuffer,
    show_debug_map: bool,
    /// True while the left button drags inside the preview
    mouse_navigating: bool,
}

impl AppState {
    pub fn new(view: ViewParameters, maps: Vec<MapEntry>, presets: Presets, presets_path: PathBuf) -> Self {
        Self {
            engine: RenderEngine::new(view),
            maps,
            current_map: None,
            presets,
            presets_path,
            loader: MapLoader::new(),
            screen_fb: Framebuffer::new(WIDTH, HEIGHT),
            preview_fb: Framebuffer::new(PREVIEW_WIDTH, PREVIEW_WIDTH),
            debug_fb: Framebuffer::new(1, 1),
            show_debug_map: false,
            mouse_navigating: false,
        }
    }

    /// Select a map: apply its preset, then request the texture
    pub fn select_map(&mut self, index: usize) {
        let Some(entry) = self.maps.get(index).cloned() else {
            return;
        };

        let preset = self.presets.get(&entry.name).cloned().unwrap_or_default();
        if preset != SettingsPatch::default() {
            log::info!("Applying preset for {}", entry.name);
        }
        // Camera placement waits for the texture to commit
        let view_only = SettingsPatch {
            origin: None,
            rotation: None,
            ..preset.clone()
        };
        self.engine.apply_patch(&view_only);

        let token = self.engine.request_texture(preset.origin_point(), preset.rotation);
        self.loader.load(token, &entry);
        self.current_map = Some(index);
    }

    /// Add an arbitrary image to the catalog and select it
    pub fn open_file(&mut self, path: PathBuf) {
        let entry = MapEntry::from_path(path);
        let index = match self.maps.iter().position(|m| *m == entry) {
            Some(i) => i,
            None => {
                self.maps.push(entry);
                self.maps.len() - 1
            }
        };
        self.select_map(index);
    }

    /// Commit finished loads (stale ones are dropped by the engine)
    fn poll_loads(&mut self) {
        for result in self.loader.poll() {
            match result.texture {
                Ok(texture) => {
                    self.engine.commit_texture(result.token, texture);
                }
                Err(e) => {
                    log::error!("Failed to load map {}: {}", result.name, e);
                }
            }
        }
    }

    /// Store the current view as the preset for the current map
    fn save_current_preset(&mut self) {
        let Some(name) = self.current_map.and_then(|i| self.maps.get(i)).map(|m| m.name.clone()) else {
            return;
        };
        self.presets.insert(name.clone(), self.engine.snapshot());

        match save_presets(&self.presets, &self.presets_path) {
            Ok(()) => log::info!("Saved preset for {} to {}", name, self.presets_path.display()),
            Err(e) => log::error!("Saving presets failed: {}", e),
        }
    }

    fn held_inputs() -> HeldInputs {
        let mut held = HeldInputs::NONE;
        for (key, action) in BINDINGS {
            if is_key_down(key) {
                held.press(action);
            }
        }
        held
    }

    fn handle_hotkeys(&mut self) {
        for (i, key) in MAP_KEYS.iter().enumerate() {
            if is_key_pressed(*key) {
                self.select_map(i);
            }
        }
        if is_key_pressed(KeyCode::Tab) && !self.maps.is_empty() {
            let next = self.current_map.map(|i| (i + 1) % self.maps.len()).unwrap_or(0);
            self.select_map(next);
        }

        let view = self.engine.view().clone();
        let mut patch = SettingsPatch::default();
        if is_key_pressed(KeyCode::LeftBracket) {
            patch.resolution = Some(view.resolution.saturating_sub(1).max(1));
        }
        if is_key_pressed(KeyCode::RightBracket) {
            patch.resolution = Some((view.resolution + 1).min(MAX_RESOLUTION));
        }
        if is_key_pressed(KeyCode::Minus) {
            patch.horizon = Some(view.horizon - HORIZON_STEP);
        }
        if is_key_pressed(KeyCode::Equal) {
            patch.horizon = Some(view.horizon + HORIZON_STEP);
        }
        if is_key_pressed(KeyCode::L) {
            patch.loop_map = Some(!view.loop_map);
        }
        if patch != SettingsPatch::default() {
            self.engine.apply_patch(&patch);
        }

        if is_key_pressed(KeyCode::F1) {
            self.show_debug_map = !self.show_debug_map;
        }
        if is_key_pressed(KeyCode::P) {
            self.save_current_preset();
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            if is_key_pressed(KeyCode::O) {
                let dialog = rfd::FileDialog::new()
                    .add_filter("Map image", &["png", "jpg", "jpeg", "bmp"])
                    .set_directory(crate::maps::MAPS_DIR);
                if let Some(path) = dialog.pick_file() {
                    self.open_file(path);
                }
            }
        }
    }

    fn preview_rect(&self) -> Rect {
        Rect::new(PADDING, PADDING, self.preview_fb.width as f32, self.preview_fb.height as f32)
    }

    /// Dragging in the preview moves the camera there
    fn handle_preview_mouse(&mut self) {
        let (mx, my) = mouse_position();
        let rect = self.preview_rect();
        let inside = rect.contains(vec2(mx, my));

        if is_mouse_button_pressed(MouseButton::Left) && inside {
            self.mouse_navigating = true;
        }
        if !is_mouse_button_down(MouseButton::Left) {
            self.mouse_navigating = false;
        }
        if self.mouse_navigating && inside {
            self.engine.set_origin_from_preview(MapPoint::new(mx - rect.x, my - rect.y));
        }
    }

    /// Per-frame update: input, loads, camera, rendering
    pub fn update(&mut self) {
        self.poll_loads();
        self.handle_hotkeys();
        self.handle_preview_mouse();

        let now_ms = get_time() * 1000.0;
        let held = Self::held_inputs();
        self.engine.tick(now_ms, held, &mut self.preview_fb, &mut self.screen_fb);

        if self.show_debug_map {
            self.engine.render_debug_map(&mut self.debug_fb);
        }
    }

    /// Draw everything to the window
    pub fn draw(&self) {
        clear_background(BG_COLOR);

        let preview_rect = self.preview_rect();
        let has_map = self.engine.texture().is_some();
        if has_map {
            draw_framebuffer(&self.preview_fb, preview_rect);
        }
        draw_rectangle_lines(preview_rect.x, preview_rect.y, preview_rect.w, preview_rect.h, 1.0, MUTED_COLOR);

        // Perspective view fills the space right of the preview
        let area = Rect::new(
            preview_rect.right() + PADDING,
            PADDING,
            screen_width() - preview_rect.right() - PADDING * 2.0,
            screen_height() - PADDING * 2.0,
        );
        let fb = if self.show_debug_map { &self.debug_fb } else { &self.screen_fb };
        if has_map && area.w > 0.0 && area.h > 0.0 {
            draw_framebuffer(fb, fit_rect(fb.width, fb.height, area));
        } else {
            draw_text("Loading map...", area.x, area.y + TEXT_SIZE, TEXT_SIZE, MUTED_COLOR);
        }

        self.draw_info(PADDING, preview_rect.bottom() + PADDING);
    }

    fn draw_info(&self, x: f32, mut y: f32) {
        let view = self.engine.view();
        let origin = self.engine.origin();
        let preview = self.engine.preview_origin();
        let far_left = self.engine.last_frustum().far_left();
        let far_right = self.engine.last_frustum().far_right();
        let map_name = self
            .current_map
            .and_then(|i| self.maps.get(i))
            .map(|m| m.name.as_str())
            .unwrap_or("-");

        let lines = [
            format!("Map: {}", map_name),
            format!("Origin: {:.2}, {:.2}", origin.x, origin.y),
            format!("Origin (p): {:.2}, {:.2}", preview.x, preview.y),
            format!("Rotation: {:.1}", self.engine.rotation()),
            format!(
                "Far edge: {:.0}, {:.0} / {:.0}, {:.0}",
                far_left.x, far_left.y, far_right.x, far_right.y
            ),
            format!("Resolution: {}  Horizon: {:.1}", view.resolution, view.horizon),
            format!("Loop map: {}", if view.loop_map { "on" } else { "off" }),
            format!("FPS: {}", get_fps()),
        ];
        for line in &lines {
            draw_text(line, x, y + TEXT_SIZE, TEXT_SIZE, TEXT_COLOR);
            y += TEXT_SIZE + 4.0;
        }

        y += TEXT_SIZE;
        let help = [
            "W/S move, A/D turn, Shift faster",
            "Drag in preview to move camera",
            "Tab / 1-9 map, O open file",
            "[ ] resolution, - = horizon",
            "L loop, F1 debug map, P save preset",
        ];
        for line in help {
            draw_text(line, x, y + TEXT_SIZE, TEXT_SIZE, MUTED_COLOR);
            y += TEXT_SIZE + 4.0;
        }
    }
}

/// Largest rect with the framebuffer's aspect ratio centered in `area`
fn fit_rect(width: usize, height: usize, area: Rect) -> Rect {
    let fb_aspect = width as f32 / height.max(1) as f32;
    let area_aspect = area.w / area.h;
    if fb_aspect > area_aspect {
        let h = area.w / fb_aspect;
        Rect::new(area.x, area.y + (area.h - h) * 0.5, area.w, h)
    } else {
        let w = area.h * fb_aspect;
        Rect::new(area.x + (area.w - w) * 0.5, area.y, w, area.h)
    }
}

/// Convert a framebuffer to a texture and draw it (nearest filtering)
fn draw_framebuffer(fb: &Framebuffer, dest: Rect) {
    if fb.width == 0 || fb.height == 0 {
        return;
    }
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Nearest);

    draw_texture_ex(
        &texture,
        dest.x,
        dest.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(dest.w, dest.h)),
            ..Default::default()
        },
    );
}
