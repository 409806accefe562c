use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lux_renderer::RenderSettings;

/// Load render settings from a JSON file, or the defaults when no file is
/// given. Missing fields keep their default values.
pub fn load_settings(path: Option<&Path>) -> Result<RenderSettings> {
    let Some(path) = path else {
        return Ok(RenderSettings::default());
    };

    let text = fs::read_to_string(path).with_context(|| format!("failed to read settings file {}", path.display()))?;
    let settings: RenderSettings =
        serde_json::from_str(&text).with_context(|| format!("failed to parse settings file {}", path.display()))?;

    log::info!("Loaded render settings from {}", path.display());
    Ok(settings)
}
