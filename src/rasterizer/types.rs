//! Core types for the rasterizer

use std::path::Path;
use image::GenericImageView;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`; malformed input is opaque black
    pub fn from_hex(hex: &str) -> Self {
        parse_hex_color(hex).into()
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Color with alpha normalized to [0, 1], as written in hex settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const OPAQUE_BLACK: Rgba = Rgba { r: 0, g: 0, b: 0, a: 1.0 };
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color {
            r: c.r,
            g: c.g,
            b: c.b,
            a: (c.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        }
    }
}

/// Parse a compact hex color (3, 4, 6 or 8 digits after `#`).
///
/// Short forms duplicate each digit, missing alpha is opaque. Anything
/// else falls back to opaque black instead of failing.
pub fn parse_hex_color(hex: &str) -> Rgba {
    let Some(digits) = hex.strip_prefix('#') else {
        return Rgba::OPAQUE_BLACK;
    };
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Rgba::OPAQUE_BLACK;
    }

    let expanded: String = match digits.len() {
        3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => digits.to_string(),
        _ => return Rgba::OPAQUE_BLACK,
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).unwrap_or(0);
    let alpha = if expanded.len() == 8 { channel(6) } else { 255 };

    Rgba {
        r: channel(0),
        g: channel(2),
        b: channel(4),
        a: alpha as f32 / 255.0,
    }
}

/// Error type for texture loading
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("image {0} has no pixels")]
    Empty(String),
}

/// Immutable map texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    /// Build a texture from explicit rows of colors (all rows must be equally long)
    pub fn from_rows(rows: &[&[Color]], name: &str) -> Self {
        let height = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let pixels = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self {
            width,
            height,
            pixels,
            name: name.to_string(),
        }
    }

    /// Load texture from an image file (PNG, JPEG or BMP)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| TextureError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Self::from_bytes(&bytes, name)
    }

    /// Load texture from raw encoded image bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?;

        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty(name));
        }
        let rgba = img.to_rgba8();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        })
    }

    /// Create a checkerboard test map
    pub fn checkerboard(width: usize, height: usize, cell: usize, color1: Color, color2: Color) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / cell) + (y / cell)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "tiles".to_string() }
    }

    /// Texture dimensions as a texture-space point
    pub fn size(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    /// Get pixel at x,y coordinates (None outside the texture)
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Fetch the texel under a texture-space sample point (truncating)
    pub fn texel_at(&self, x: f32, y: f32) -> Option<Color> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        self.get_pixel(x as usize, y as usize)
    }
}
