//! Core rendering functions
//! Scanline mode 7 sampling with SNES-style mosaic

use super::frustum::{compute_frustum, rotate_frustum, Frustum, FrustumShape};
use super::math::{interpolate, wrap_coord, Vec2};
use super::types::{Color, Texture};
use super::PREVIEW_WIDTH;

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    /// Resize the buffer, discarding its contents when the size changes
    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            let p = &self.pixels[idx..idx + 4];
            Some(Color::with_alpha(p[0], p[1], p[2], p[3]))
        } else {
            None
        }
    }

    /// Fill a `size` x `size` block with its top-left corner at (x, y), clipped to the buffer
    pub fn fill_block(&mut self, x: usize, y: usize, size: usize, color: Color) {
        let x_end = (x + size).min(self.width);
        let y_end = (y + size).min(self.height);
        for py in y..y_end {
            for px in x..x_end {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Filled dot around a texture-space point (camera marker)
    pub fn draw_dot(&mut self, center: Vec2, radius: f32, color: Color) {
        if !center.is_finite() {
            return;
        }
        let min_x = (center.x - radius).floor().max(0.0) as usize;
        let min_y = (center.y - radius).floor().max(0.0) as usize;
        let max_x = (center.x + radius).ceil().max(0.0) as usize;
        let max_y = (center.y + radius).ceil().max(0.0) as usize;
        for y in min_y..=max_y.min(self.height.saturating_sub(1)) {
            for x in min_x..=max_x.min(self.width.saturating_sub(1)) {
                let d = Vec2::new(x as f32, y as f32) - center;
                if d.x * d.x + d.y * d.y <= radius * radius {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }

    /// Straight segment between two points, stepped one pixel at a time
    /// along the longer axis. Pixels left of or above the buffer are dropped.
    pub fn draw_segment(&mut self, a: Vec2, b: Vec2, color: Color) {
        let delta = b - a;
        let steps = delta.x.abs().max(delta.y.abs()).ceil() as usize;
        for step in 0..=steps {
            let t = if steps == 0 { 0.0 } else { step as f32 / steps as f32 };
            let p = a + delta * t;
            let (x, y) = (p.x.round(), p.y.round());
            if x >= 0.0 && y >= 0.0 {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
    }

    /// Stroke the outline of a frustum
    pub fn draw_frustum(&mut self, frustum: &Frustum, color: Color) {
        // Far-off corners would make the segment walk forever
        let limit = (self.width.max(self.height) * 4) as f32;
        let clamp = |p: Vec2| Vec2::new(p.x.clamp(-limit, limit), p.y.clamp(-limit, limit));

        for (a, b) in frustum.edges() {
            if !a.is_finite() || !b.is_finite() {
                continue;
            }
            self.draw_segment(clamp(a), clamp(b), color);
        }
    }

    /// Draw a texture stretched over the whole buffer (nearest neighbour)
    pub fn blit_texture(&mut self, texture: &Texture) {
        if texture.width == 0 || texture.height == 0 {
            return;
        }
        for y in 0..self.height {
            let ty = y * texture.height / self.height;
            for x in 0..self.width {
                let tx = x * texture.width / self.width;
                if let Some(color) = texture.get_pixel(tx, ty) {
                    self.set_pixel(x, y, color);
                }
            }
        }
    }
}

/// Resolved per-frame render settings
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub shape: FrustumShape,
    /// Skyline as a fraction (0-1) of the frame height
    pub horizon: f32,
    /// Mosaic block size in destination pixels (1 = native)
    pub resolution: usize,
    /// Wrap out-of-range samples instead of falling back to the floor plane
    pub loop_map: bool,
    pub background: Color,
    pub floor: Color,
}

/// Sample the texel under a texture-space point, wrapping if requested
fn sample_texel(texture: &Texture, point: Vec2, loop_map: bool) -> Option<Color> {
    if !point.is_finite() {
        return None;
    }

    let (map_w, map_h) = texture.size();
    let mut p = point;
    if loop_map {
        if p.x < 0.0 || p.x >= map_w {
            p.x = wrap_coord(p.x, map_w);
        }
        if p.y < 0.0 || p.y >= map_h {
            p.y = wrap_coord(p.y, map_h);
        }
    }
    texture.texel_at(p.x, p.y)
}

/// Render the mode 7 view into `fb`, returning the rotated frustum used.
///
/// The frame is cleared to the background color, then every destination
/// row from the horizon down samples one scanline of the ground plane. Rows
/// and columns advance `resolution` destination pixels at a time and each
/// sample is replicated over a `resolution` x `resolution` block.
pub fn render_frame(
    fb: &mut Framebuffer,
    texture: &Texture,
    origin: Vec2,
    rotation: f32,
    settings: &RenderSettings,
) -> Frustum {
    fb.clear(settings.background);

    let frustum = compute_frustum(origin, Some(texture.size()), 1.0, &settings.shape);
    let frustum = rotate_frustum(&frustum, origin, rotation);
    if texture.width == 0 || texture.height == 0 || fb.width == 0 || fb.height == 0 {
        return frustum;
    }

    let (map_w, map_h) = texture.size();
    // A NaN horizon would never let the row loop reach its bound
    let horizon = if settings.horizon.is_finite() { settings.horizon.clamp(0.0, 1.0) } else { 0.5 };
    let horizon_row = (map_h * horizon).ceil();
    let below_horizon = map_h - horizon_row;

    let scale_x = fb.width as f32 / map_w;
    let scale_y = fb.height as f32 / map_h;
    let res = settings.resolution.max(1);
    let dest_top = (horizon_row * scale_y).floor() as usize;

    let mut row = 0usize;
    loop {
        // Depth below the horizon in texture rows
        let i = row as f32 / scale_y;
        if i > below_horizon {
            break;
        }

        let perc = if below_horizon > 0.0 { i / below_horizon } else { 0.0 };
        let left = interpolate(frustum.far_left(), frustum.near_left(), perc, true);
        let right = interpolate(frustum.far_right(), frustum.near_right(), perc, true);
        let dest_y = dest_top + row;
        let at_horizon = row == 0;

        let mut col = 0usize;
        loop {
            let x = col as f32 / scale_x;
            if x > map_w {
                break;
            }

            let sample = interpolate(left, right, x / map_w, false);
            let color = match sample_texel(texture, sample, settings.loop_map) {
                Some(texel) if !at_horizon && texel.a != 0 => texel,
                _ => settings.floor,
            };
            fb.fill_block(col, dest_y, res, color);

            col += res;
        }

        row += res;
    }

    frustum
}

/// Scale of the preview relative to the texture (never enlarges)
pub fn preview_scale(texture: &Texture) -> f32 {
    if texture.width == 0 {
        return 1.0;
    }
    (PREVIEW_WIDTH as f32 / texture.width as f32).min(1.0)
}

/// Camera origin expressed in preview pixels
pub fn preview_origin(origin: Vec2, scale: f32) -> Vec2 {
    origin * scale
}

/// Render the top-down preview: the scaled map plus the frustum outline
pub fn render_preview(
    fb: &mut Framebuffer,
    texture: &Texture,
    origin: Vec2,
    rotation: f32,
    shape: &FrustumShape,
    outline: Color,
) -> Frustum {
    let scale = preview_scale(texture);
    let width = ((texture.width as f32 * scale).round() as usize).max(1);
    let height = ((texture.height as f32 * scale).round() as usize).max(1);
    fb.resize(width, height);
    fb.clear(Color::TRANSPARENT);
    fb.blit_texture(texture);

    let center = preview_origin(origin, scale);
    let frustum = compute_frustum(origin, Some(texture.size()), scale, shape);
    let frustum = rotate_frustum(&frustum, center, rotation);
    fb.draw_frustum(&frustum, outline);
    fb.draw_dot(center, 2.0, outline);
    frustum
}

/// Full-resolution debug view: the raw map with the sampling frustum on top
pub fn render_debug_map(fb: &mut Framebuffer, texture: &Texture, frustum: &Frustum, outline: Color) {
    fb.resize(texture.width, texture.height);
    fb.blit_texture(texture);
    fb.draw_frustum(frustum, outline);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKY: Color = Color { r: 10, g: 20, b: 200, a: 255 };
    const FLOOR: Color = Color { r: 0, g: 160, b: 0, a: 255 };

    fn quad_texture() -> Texture {
        let a = Color::new(255, 0, 0);
        let b = Color::new(0, 0, 255);
        let c = Color::new(255, 255, 0);
        let d = Color::new(255, 0, 255);
        Texture::from_rows(&[&[a, b], &[c, d]], "quad")
    }

    /// Frustum spanning the whole texture width, with zero depth
    fn spanning_settings(resolution: usize, loop_map: bool) -> RenderSettings {
        RenderSettings {
            shape: FrustumShape {
                scale: 1.0,
                near_width: 1.0,
                far_width: 0.5,
                depth: 0.0,
            },
            horizon: 0.5,
            resolution,
            loop_map,
            background: SKY,
            floor: FLOOR,
        }
    }

    #[test]
    fn test_clear_and_block_clipping() {
        let mut fb = Framebuffer::new(3, 3);
        fb.clear(SKY);
        fb.fill_block(2, 2, 4, FLOOR);
        assert_eq!(fb.get_pixel(2, 2), Some(FLOOR));
        assert_eq!(fb.get_pixel(1, 2), Some(SKY));
        assert_eq!(fb.get_pixel(3, 3), None);
    }

    #[test]
    fn test_end_to_end_quad_texture() {
        let tex = quad_texture();
        let mut fb = Framebuffer::new(4, 4);
        render_frame(&mut fb, &tex, Vec2::new(1.0, 1.0), 0.0, &spanning_settings(1, false));

        // Top half is sky
        for y in 0..2 {
            for x in 0..4 {
                assert_eq!(fb.get_pixel(x, y), Some(SKY), "({}, {})", x, y);
            }
        }
        // The horizon scanline is the floor plane
        for x in 0..4 {
            assert_eq!(fb.get_pixel(x, 2), Some(FLOOR));
        }
        // Below it the bottom texture row, scaled 2x
        let c = tex.get_pixel(0, 1).unwrap();
        let d = tex.get_pixel(1, 1).unwrap();
        let row: Vec<_> = (0..4).map(|x| fb.get_pixel(x, 3).unwrap()).collect();
        assert_eq!(row, vec![c, c, d, d]);
    }

    #[test]
    fn test_no_texture_rows_above_horizon_are_written() {
        let tex = Texture::checkerboard(16, 16, 2, Color::WHITE, Color::BLACK);
        let mut settings = spanning_settings(1, true);
        settings.horizon = 0.25;
        let mut fb = Framebuffer::new(32, 32);
        render_frame(&mut fb, &tex, Vec2::new(8.0, 8.0), 45.0, &settings);
        for y in 0..8 {
            for x in 0..32 {
                assert_eq!(fb.get_pixel(x, y), Some(SKY));
            }
        }
    }

    #[test]
    fn test_transparent_texels_show_floor() {
        let t = Color::TRANSPARENT;
        let tex = Texture::from_rows(&[&[t, t], &[t, t]], "clear");
        let mut fb = Framebuffer::new(4, 4);
        render_frame(&mut fb, &tex, Vec2::new(1.0, 1.0), 0.0, &spanning_settings(1, false));
        for x in 0..4 {
            assert_eq!(fb.get_pixel(x, 3), Some(FLOOR));
        }
    }

    #[test]
    fn test_out_of_range_without_loop_is_floor() {
        let tex = quad_texture();
        let mut fb = Framebuffer::new(4, 4);
        // Camera shifted right: the right half samples past the map edge
        render_frame(&mut fb, &tex, Vec2::new(2.0, 1.0), 0.0, &spanning_settings(1, false));
        assert_eq!(fb.get_pixel(0, 3), tex.get_pixel(1, 1));
        assert_eq!(fb.get_pixel(2, 3), Some(FLOOR));
        assert_eq!(fb.get_pixel(3, 3), Some(FLOOR));
    }

    #[test]
    fn test_out_of_range_with_loop_wraps() {
        let tex = quad_texture();
        let mut fb = Framebuffer::new(4, 4);
        render_frame(&mut fb, &tex, Vec2::new(2.0, 1.0), 0.0, &spanning_settings(1, true));
        // Sample x in [2, 3) wraps to column 0
        assert_eq!(fb.get_pixel(2, 3), tex.get_pixel(0, 1));
        assert_eq!(fb.get_pixel(3, 3), tex.get_pixel(0, 1));
    }

    #[test]
    fn test_wrap_one_pixel_past_right_edge() {
        let mut rows: Vec<Vec<Color>> = Vec::new();
        rows.push((0..10).map(|x| Color::new(x as u8 * 20, 0, 0)).collect());
        let row_refs: Vec<&[Color]> = rows.iter().map(|r| r.as_slice()).collect();
        let tex = Texture::from_rows(&row_refs, "strip");

        let wrapped = sample_texel(&tex, Vec2::new(11.0, 0.0), true);
        assert_eq!(wrapped, tex.get_pixel(1, 0));
        assert_eq!(sample_texel(&tex, Vec2::new(11.0, 0.0), false), None);
        assert_eq!(sample_texel(&tex, Vec2::new(-1.0, 0.0), true), tex.get_pixel(9, 0));
    }

    #[test]
    fn test_wrap_on_y_and_far_out_of_range() {
        let colors: Vec<Vec<Color>> = (0..4)
            .map(|y| (0..10).map(|x| Color::new(x as u8 * 20, y as u8 * 50, 0)).collect())
            .collect();
        let row_refs: Vec<&[Color]> = colors.iter().map(|r| r.as_slice()).collect();
        let tex = Texture::from_rows(&row_refs, "grid");

        assert_eq!(sample_texel(&tex, Vec2::new(2.0, 5.0), true), tex.get_pixel(2, 1));
        assert_eq!(sample_texel(&tex, Vec2::new(2.0, -1.0), true), tex.get_pixel(2, 3));
        assert_eq!(sample_texel(&tex, Vec2::new(2.0, 5.0), false), None);
        // Many periods away, both directions
        assert_eq!(sample_texel(&tex, Vec2::new(123.0, 0.0), true), tex.get_pixel(3, 0));
        assert_eq!(sample_texel(&tex, Vec2::new(-117.0, 0.0), true), tex.get_pixel(3, 0));
        assert_eq!(sample_texel(&tex, Vec2::new(-117.0, -42.0), true), tex.get_pixel(3, 2));
    }

    #[test]
    fn test_nan_horizon_still_finishes_frame() {
        let tex = Texture::checkerboard(8, 8, 2, Color::WHITE, Color::BLACK);
        let mut settings = spanning_settings(1, false);
        settings.horizon = f32::NAN;
        let mut fb = Framebuffer::new(8, 8);
        render_frame(&mut fb, &tex, Vec2::new(4.0, 4.0), 0.0, &settings);
        // Falls back to the middle of the frame
        assert_eq!(fb.get_pixel(0, 0), Some(SKY));
        assert_eq!(fb.get_pixel(0, 4), Some(FLOOR));
    }

    #[test]
    fn test_native_resolution_samples_every_pixel() {
        // 4x4 texture rendered 1:1, every column of the bottom row differs
        let colors: Vec<Color> = (0..4).map(|x| Color::new(x * 60, 0, 0)).collect();
        let row: &[Color] = &colors;
        let tex = Texture::from_rows(&[row, row, row, row], "ramp");
        let mut settings = spanning_settings(1, false);
        settings.shape.near_width = 1.0;
        settings.shape.far_width = 0.5;
        let mut fb = Framebuffer::new(4, 4);
        render_frame(&mut fb, &tex, Vec2::new(2.0, 2.0), 0.0, &settings);
        let bottom: Vec<_> = (0..4).map(|x| fb.get_pixel(x, 3).unwrap()).collect();
        assert_eq!(bottom, colors);
    }

    #[test]
    fn test_mosaic_blocks_are_uniform() {
        let tex = Texture::checkerboard(8, 8, 1, Color::WHITE, Color::BLACK);
        let settings = spanning_settings(2, true);
        let mut fb = Framebuffer::new(16, 16);
        render_frame(&mut fb, &tex, Vec2::new(4.0, 4.0), 30.0, &settings);

        // Horizon at dest row 8; blocks start on even rows/columns from there
        for by in (8..16).step_by(2) {
            for bx in (0..16).step_by(2) {
                let first = fb.get_pixel(bx, by).unwrap();
                for dy in 0..2 {
                    for dx in 0..2 {
                        assert_eq!(fb.get_pixel(bx + dx, by + dy), Some(first));
                    }
                }
            }
        }
    }

    #[test]
    fn test_preview_scales_down_large_maps() {
        let tex = Texture::checkerboard(500, 300, 10, Color::WHITE, Color::BLACK);
        assert_eq!(preview_scale(&tex), 0.5);
        let mut fb = Framebuffer::new(1, 1);
        let shape = spanning_settings(1, false).shape;
        let frustum = render_preview(&mut fb, &tex, Vec2::new(250.0, 150.0), 0.0, &shape, Color::RED);
        assert_eq!((fb.width, fb.height), (250, 150));
        assert_eq!(fb.get_pixel(125, 75), Some(Color::RED));
        assert_eq!(frustum.near_left().y, 75.0);
    }

    #[test]
    fn test_draw_frustum_survives_huge_corners() {
        let mut fb = Framebuffer::new(8, 8);
        let frustum = Frustum {
            corners: [
                Vec2::new(-1e30, 0.0),
                Vec2::new(f32::INFINITY, 0.0),
                Vec2::new(7.0, 7.0),
                Vec2::new(0.0, 7.0),
            ],
        };
        fb.draw_frustum(&frustum, Color::RED);
        assert_eq!(fb.get_pixel(3, 7), Some(Color::RED));
    }

    #[test]
    fn test_segment_and_dot() {
        let mut fb = Framebuffer::new(8, 8);
        fb.draw_segment(Vec2::new(-2.0, -2.0), Vec2::new(3.0, 3.0), Color::RED);
        for i in 0..=3 {
            assert_eq!(fb.get_pixel(i, i), Some(Color::RED));
        }
        assert_eq!(fb.get_pixel(4, 4), Some(Color::default()));

        fb.draw_dot(Vec2::new(6.0, 1.0), 1.0, Color::WHITE);
        assert_eq!(fb.get_pixel(6, 1), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(7, 1), Some(Color::WHITE));
        assert_eq!(fb.get_pixel(7, 2), Some(Color::default()));
    }
}
