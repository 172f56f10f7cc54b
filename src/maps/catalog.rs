//! Map catalog
//!
//! Scans assets/maps/ for images. A generated checkerboard is always
//! available first so the viewer works without any assets.

use std::path::{Path, PathBuf};
use crate::rasterizer::{Color, Texture};

/// Default directory scanned for maps
pub const MAPS_DIR: &str = "assets/maps";
/// Preset file inside the maps directory
pub const PRESETS_FILE: &str = "presets.ron";

const MAP_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];
const TILES_SIZE: usize = 1024;
const TILES_CELL: usize = 32;

/// Where a map's pixels come from
#[derive(Debug, Clone, PartialEq)]
pub enum MapSource {
    /// Generated debug checkerboard
    Tiles,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    /// Display name and preset key (file stem)
    pub name: String,
    pub source: MapSource,
}

impl MapEntry {
    pub fn tiles() -> Self {
        Self {
            name: "tiles".to_string(),
            source: MapSource::Tiles,
        }
    }

    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            source: MapSource::File(path),
        }
    }
}

/// Generate the debug checkerboard map
pub fn tiles_texture() -> Texture {
    Texture::checkerboard(
        TILES_SIZE,
        TILES_SIZE,
        TILES_CELL,
        Color::new(230, 230, 230),
        Color::new(40, 90, 160),
    )
}

fn is_map_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_ascii_lowercase();
                MAP_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
}

/// List the built-in tiles followed by every image in `dir`, sorted by file name
pub fn discover_maps<P: AsRef<Path>>(dir: P) -> Vec<MapEntry> {
    let mut maps = vec![MapEntry::tiles()];

    match std::fs::read_dir(dir.as_ref()) {
        Ok(entries) => {
            let mut paths: Vec<PathBuf> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| is_map_file(p))
                .collect();
            paths.sort();
            maps.extend(paths.into_iter().map(MapEntry::from_path));
        }
        Err(e) => {
            log::warn!("Cannot scan {}: {}", dir.as_ref().display(), e);
        }
    }

    log::info!("Found {} maps", maps.len());
    maps
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dir_still_has_tiles() {
        let maps = discover_maps("no/such/maps/dir");
        assert_eq!(maps, vec![MapEntry::tiles()]);
    }

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = std::env::temp_dir().join(format!("mode7-maps-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["b.PNG", "a.jpg", "notes.txt", "c.bmp"] {
            std::fs::write(dir.join(name), b"x").unwrap();
        }

        let names: Vec<String> = discover_maps(&dir).into_iter().map(|m| m.name).collect();
        let _ = std::fs::remove_dir_all(&dir);
        assert_eq!(names, vec!["tiles", "a", "b", "c"]);
    }

    #[test]
    fn test_tiles_texture() {
        let tex = tiles_texture();
        assert_eq!((tex.width, tex.height), (TILES_SIZE, TILES_SIZE));
        assert_ne!(tex.get_pixel(0, 0), tex.get_pixel(TILES_CELL, 0));
    }
}
