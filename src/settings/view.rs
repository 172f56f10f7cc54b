//! View parameters and settings patches

use serde::{Deserialize, Serialize};
use crate::rasterizer::{Color, FrustumShape, RenderSettings, Vec2};

/// Upper bound for the mosaic slider
pub const MAX_RESOLUTION: usize = 10;

/// User-facing view configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewParameters {
    pub frustum_scale: f32,
    pub near_width: f32,
    pub far_width: f32,
    pub frustum_depth: f32,
    /// Skyline as a fraction (0-1) of the frame height
    pub horizon: f32,
    /// Mosaic block size, at least 1
    pub resolution: usize,
    pub loop_map: bool,
    /// Hex color (`#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`)
    pub background_color: String,
    pub floor_plane_color: String,
}

impl Default for ViewParameters {
    fn default() -> Self {
        Self {
            frustum_scale: 0.085,
            near_width: 0.09,
            far_width: 0.4,
            frustum_depth: 0.66,
            horizon: 0.5,
            resolution: 1,
            loop_map: true,
            background_color: "#000".to_string(),
            floor_plane_color: "#000".to_string(),
        }
    }
}

impl ViewParameters {
    pub fn shape(&self) -> FrustumShape {
        FrustumShape {
            scale: self.frustum_scale,
            near_width: self.near_width,
            far_width: self.far_width,
            depth: self.frustum_depth,
        }
    }

    /// Resolve hex colors and clamp ranges for the renderer
    pub fn to_render_settings(&self) -> RenderSettings {
        RenderSettings {
            shape: self.shape(),
            horizon: self.horizon.clamp(0.0, 1.0),
            resolution: self.resolution.max(1),
            loop_map: self.loop_map,
            background: Color::from_hex(&self.background_color),
            floor: Color::from_hex(&self.floor_plane_color),
        }
    }
}

/// Partial update: every `Some` field replaces the current value.
///
/// `origin` and `rotation` target the camera.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsPatch {
    pub origin: Option<(f32, f32)>,
    pub rotation: Option<f32>,
    pub frustum_scale: Option<f32>,
    pub near_width: Option<f32>,
    pub far_width: Option<f32>,
    pub frustum_depth: Option<f32>,
    pub horizon: Option<f32>,
    pub resolution: Option<usize>,
    pub loop_map: Option<bool>,
    pub background_color: Option<String>,
    pub floor_plane_color: Option<String>,
}

impl SettingsPatch {
    /// Merge view fields into `view`, returning true if anything changed
    pub fn apply_to(&self, view: &mut ViewParameters) -> bool {
        let before = view.clone();

        let finite = |field: &str, value: Option<f32>| match value {
            Some(v) if !v.is_finite() => {
                log::warn!("Ignoring non-finite {}: {}", field, v);
                None
            }
            other => other,
        };

        if let Some(v) = finite("frustum_scale", self.frustum_scale) {
            view.frustum_scale = v;
        }
        if let Some(v) = finite("near_width", self.near_width) {
            view.near_width = v;
        }
        if let Some(v) = finite("far_width", self.far_width) {
            view.far_width = v;
        }
        if let Some(v) = finite("frustum_depth", self.frustum_depth) {
            view.frustum_depth = v;
        }
        if let Some(v) = finite("horizon", self.horizon) {
            view.horizon = v.clamp(0.0, 1.0);
        }
        if let Some(v) = self.resolution {
            view.resolution = v.clamp(1, MAX_RESOLUTION);
        }
        if let Some(v) = self.loop_map {
            view.loop_map = v;
        }
        if let Some(v) = &self.background_color {
            view.background_color = v.clone();
        }
        if let Some(v) = &self.floor_plane_color {
            view.floor_plane_color = v.clone();
        }

        *view != before
    }

    pub fn origin_point(&self) -> Option<Vec2> {
        self.origin.map(|(x, y)| Vec2::new(x, y))
    }
}
