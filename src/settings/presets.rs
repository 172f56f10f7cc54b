//! Per-map preset loading and saving

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use super::SettingsPatch;

/// Error type for preset files
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Presets keyed by map name (file stem)
pub type Presets = BTreeMap<String, SettingsPatch>;

/// Load presets from a RON file; a missing file yields no presets
pub fn load_presets<P: AsRef<Path>>(path: P) -> Result<Presets, SettingsError> {
    let path = path.as_ref();
    if !path.exists() {
        log::info!("No preset file at {}", path.display());
        return Ok(Presets::new());
    }
    let contents = fs::read_to_string(path)?;
    load_presets_from_str(&contents)
}

/// Parse presets from a RON string
pub fn load_presets_from_str(s: &str) -> Result<Presets, SettingsError> {
    Ok(ron::from_str(s)?)
}

/// Save presets to a RON file
pub fn save_presets<P: AsRef<Path>>(presets: &Presets, path: P) -> Result<(), SettingsError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(3)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(presets, config)?;
    fs::write(path, contents)?;
    Ok(())
}
