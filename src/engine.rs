//! Render engine and frame driver
//!
//! Owns everything one mode 7 session needs: the camera, the view
//! parameters, and the current map texture. Map loads are tokenized so a
//! slow load that finishes after a newer selection is discarded.

use crate::camera::{advance_camera, CameraState, HeldInputs};
use crate::rasterizer::{
    render_debug_map, render_frame, render_preview, preview_origin, preview_scale,
    Color, Framebuffer, Frustum, RenderSettings, Texture, Vec2,
};
use crate::settings::{SettingsPatch, ViewParameters};

/// Frustum outline color in the preview and debug views
const OUTLINE_COLOR: Color = Color::RED;

/// Identifies one texture load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken(u64);

/// Camera placement to apply when a requested texture commits
#[derive(Debug, Clone, Copy, Default)]
struct Spawn {
    origin: Option<Vec2>,
    rotation: Option<f32>,
}

/// Longest step a single tick may take, in deciseconds
pub const MAX_TICK_DS: f32 = 10.0;

/// Convert a wall-clock gap in milliseconds to deciseconds.
///
/// Capped at [`MAX_TICK_DS`]: one tick never turns more than a single wrap.
pub fn delta_deciseconds(last_ms: Option<f64>, now_ms: f64) -> f32 {
    match last_ms {
        Some(last) if now_ms > last => (((now_ms - last) / 100.0) as f32).min(MAX_TICK_DS),
        _ => 0.0,
    }
}

pub struct RenderEngine {
    pub camera: CameraState,
    view: ViewParameters,
    render_settings: RenderSettings,
    texture: Option<Texture>,
    latest_request: u64,
    spawn: Spawn,
    last_tick_ms: Option<f64>,
    last_frustum: Frustum,
}

impl RenderEngine {
    pub fn new(view: ViewParameters) -> Self {
        let render_settings = view.to_render_settings();
        Self {
            camera: CameraState::default(),
            view,
            render_settings,
            texture: None,
            latest_request: 0,
            spawn: Spawn::default(),
            last_tick_ms: None,
            last_frustum: Frustum::default(),
        }
    }

    pub fn view(&self) -> &ViewParameters {
        &self.view
    }

    pub fn texture(&self) -> Option<&Texture> {
        self.texture.as_ref()
    }

    pub fn origin(&self) -> Vec2 {
        self.camera.origin
    }

    pub fn rotation(&self) -> f32 {
        self.camera.rotation
    }

    /// Merge a partial update into the view parameters and camera
    pub fn apply_patch(&mut self, patch: &SettingsPatch) {
        if patch.apply_to(&mut self.view) {
            self.render_settings = self.view.to_render_settings();
            log::debug!("View parameters updated: {:?}", self.view);
        }
        if let Some(origin) = patch.origin_point() {
            self.camera.origin = origin;
        }
        if let Some(rotation) = patch.rotation {
            self.camera.set_rotation(rotation);
        }
    }

    /// Capture the current view and camera as a full patch (for presets)
    pub fn snapshot(&self) -> SettingsPatch {
        let v = &self.view;
        SettingsPatch {
            origin: Some((self.camera.origin.x, self.camera.origin.y)),
            rotation: Some(self.camera.rotation),
            frustum_scale: Some(v.frustum_scale),
            near_width: Some(v.near_width),
            far_width: Some(v.far_width),
            frustum_depth: Some(v.frustum_depth),
            horizon: Some(v.horizon),
            resolution: Some(v.resolution),
            loop_map: Some(v.loop_map),
            background_color: Some(v.background_color.clone()),
            floor_plane_color: Some(v.floor_plane_color.clone()),
        }
    }

    /// Start a texture load; only the newest token may commit.
    ///
    /// The spawn origin/rotation are applied when that load commits; without
    /// an origin the camera is centered on the new map.
    pub fn request_texture(&mut self, origin: Option<Vec2>, rotation: Option<f32>) -> LoadToken {
        self.latest_request += 1;
        self.spawn = Spawn { origin, rotation };
        LoadToken(self.latest_request)
    }

    pub fn is_current(&self, token: LoadToken) -> bool {
        token.0 == self.latest_request
    }

    /// Install a loaded texture if `token` is still the latest request
    pub fn commit_texture(&mut self, token: LoadToken, texture: Texture) -> bool {
        if !self.is_current(token) {
            log::debug!("Discarding stale load of {} (token {:?})", texture.name, token);
            return false;
        }

        let spawn = std::mem::take(&mut self.spawn);
        self.camera.reset_for_texture(texture.size(), spawn.origin, spawn.rotation);
        log::info!(
            "Map {} ready ({}x{}), camera at ({:.2}, {:.2})",
            texture.name,
            texture.width,
            texture.height,
            self.camera.origin.x,
            self.camera.origin.y
        );
        self.texture = Some(texture);
        true
    }

    /// Frustum used by the most recent full frame (texture space)
    pub fn last_frustum(&self) -> &Frustum {
        &self.last_frustum
    }

    /// One frame: advance the camera from held inputs, then redraw both views.
    ///
    /// Returns false (leaving the buffers untouched) while no map is loaded.
    pub fn tick(
        &mut self,
        now_ms: f64,
        held: HeldInputs,
        preview: &mut Framebuffer,
        screen: &mut Framebuffer,
    ) -> bool {
        let dt = delta_deciseconds(self.last_tick_ms, now_ms);
        advance_camera(&mut self.camera, held, dt);

        let rendered = self.render_preview(preview) && self.render_frame(screen);
        self.last_tick_ms = Some(now_ms);
        rendered
    }

    /// Render the perspective view; no-op without a texture
    pub fn render_frame(&mut self, fb: &mut Framebuffer) -> bool {
        let Some(texture) = &self.texture else {
            return false;
        };
        self.last_frustum = render_frame(
            fb,
            texture,
            self.camera.origin,
            self.camera.rotation,
            &self.render_settings,
        );
        true
    }

    /// Render the top-down preview; no-op without a texture
    pub fn render_preview(&self, fb: &mut Framebuffer) -> bool {
        let Some(texture) = &self.texture else {
            return false;
        };
        render_preview(
            fb,
            texture,
            self.camera.origin,
            self.camera.rotation,
            &self.render_settings.shape,
            OUTLINE_COLOR,
        );
        true
    }

    /// Render the full-size map with the sampling frustum; no-op without a texture
    pub fn render_debug_map(&self, fb: &mut Framebuffer) -> bool {
        let Some(texture) = &self.texture else {
            return false;
        };
        render_debug_map(fb, texture, &self.last_frustum, OUTLINE_COLOR);
        true
    }

    /// Camera origin in preview pixels
    pub fn preview_origin(&self) -> Vec2 {
        match &self.texture {
            Some(texture) => preview_origin(self.camera.origin, preview_scale(texture)),
            None => Vec2::ZERO,
        }
    }

    /// Move the camera to a point picked in the preview
    pub fn set_origin_from_preview(&mut self, point: Vec2) {
        if let Some(texture) = &self.texture {
            let scale = preview_scale(texture);
            self.camera.origin = point / scale;
        }
    }
}
