use std::fs;
use std::path::Path;

use crate::errors::DashboardError;
use crate::models::settings::Settings;

/// Reads and writes the settings file.
///
/// Plain JSON on disk — the file holds display preferences, nothing
/// secret. A missing file is not an error: first launch starts from
/// defaults and the file appears on the first save.
pub struct SettingsStore;

impl SettingsStore {
    /// Load settings from disk, or defaults when no file exists yet.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Settings, DashboardError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Settings::default());
        }

        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Save settings to disk, overwriting any previous file.
    pub fn save_to_file(settings: &Settings, path: impl AsRef<Path>) -> Result<(), DashboardError> {
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| DashboardError::Serialization(format!("Failed to serialize settings: {e}")))?;
        fs::write(path, json)?;
        Ok(())
    }
}
