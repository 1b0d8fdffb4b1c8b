use crate::config::ModelViewerConfig;
use crate::error::{EditorError, Result};
use crate::model::THUMBNAIL_SIZE;
use crate::snippet::RelativeFilePaths;
use ron::ser::PrettyConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

pub const SETTINGS_PATH: &str = "config/viewer_studio.ron";
pub const PRESETS_PATH: &str = "assets/viewer_studio/presets.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioSettings {
    pub window_width: u32,
    pub window_height: u32,
    pub side_panel_width: f32,
    pub thumbnail_size: u32,
    pub show_grid: bool,
    /// Loaded on startup when set. Relative paths resolve against `assets/`.
    pub initial_model: Option<String>,
    pub relative_file_paths: RelativeFilePaths,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            window_width: 1400,
            window_height: 900,
            side_panel_width: 380.0,
            thumbnail_size: THUMBNAIL_SIZE,
            show_grid: true,
            initial_model: None,
            relative_file_paths: RelativeFilePaths::default(),
        }
    }
}

fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)?;
    ron::de::from_str::<T>(&text).map_err(|err| EditorError::Ron {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn write_ron<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content =
        ron::ser::to_string_pretty(value, PrettyConfig::new()).map_err(|err| EditorError::Ron {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    fs::write(path, content)?;
    Ok(())
}

impl StudioSettings {
    /// Missing file means defaults; an unreadable one is reported and also
    /// falls back to defaults.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match read_ron(path) {
            Ok(settings) => settings,
            Err(err) => {
                warn!("using default settings: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        write_ron(path, self)
    }
}

/// Camera configs saved per model url.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetLibrary {
    pub presets: BTreeMap<String, ModelViewerConfig>,
}

impl PresetLibrary {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let library: Self = read_ron(path)?;
        library.validate()?;
        Ok(library)
    }

    fn validate(&self) -> Result<()> {
        for (model_url, config) in &self.presets {
            config
                .validate()
                .map_err(|err| EditorError::InvalidPreset {
                    model_url: model_url.clone(),
                    source: Box::new(err),
                })?;
        }
        Ok(())
    }

    pub fn get(&self, model_url: &str) -> Option<&ModelViewerConfig> {
        self.presets.get(model_url)
    }

    pub fn contains(&self, model_url: &str) -> bool {
        self.presets.contains_key(model_url)
    }
}

/// The preset file plus where it lives. Every save also writes a timestamped
/// copy of the preset under `history/<model>/`.
#[derive(Debug, Clone)]
pub struct PresetStore {
    pub path: PathBuf,
    pub library: PresetLibrary,
}

impl PresetStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let library = PresetLibrary::load(&path).unwrap_or_else(|err| {
            warn!("ignoring saved presets: {err}");
            PresetLibrary::default()
        });
        Self { path, library }
    }

    pub fn reload(&mut self) -> Result<()> {
        self.library = PresetLibrary::load(&self.path)?;
        Ok(())
    }

    pub fn save_preset(&mut self, model_url: &str, config: &ModelViewerConfig) -> Result<()> {
        self.library
            .presets
            .insert(model_url.to_string(), config.clone());
        write_ron(&self.path, &self.library)?;
        self.save_snapshot_to_history(model_url, config)?;
        info!("saved camera preset for {model_url}");
        Ok(())
    }

    fn save_snapshot_to_history(&self, model_url: &str, config: &ModelViewerConfig) -> Result<()> {
        let Some(root) = self.path.parent() else {
            return Ok(());
        };
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let path = root
            .join("history")
            .join(history_dir_name(model_url))
            .join(format!("{timestamp_ms}.ron"));
        write_ron(&path, config)
    }
}

/// Model urls may contain separators and scheme colons.
fn history_dir_name(model_url: &str) -> String {
    model_url
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SphericalPositionDeg;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_settings_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = StudioSettings::load(&dir.path().join("nope.ron"));
        assert_eq!(settings, StudioSettings::default());
        assert_eq!(settings.thumbnail_size, 256);
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        fs::write(&path, "(show_grid: false, initial_model: Some(\"models/duck.glb\"))").unwrap();

        let settings = StudioSettings::load(&path);
        assert!(!settings.show_grid);
        assert_eq!(settings.initial_model.as_deref(), Some("models/duck.glb"));
        assert_eq!(settings.window_width, 1400);
    }

    #[test]
    fn malformed_settings_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        fs::write(&path, "(show_grid: maybe").unwrap();
        assert_eq!(StudioSettings::load(&path), StudioSettings::default());
    }

    #[test]
    fn presets_survive_reopen_and_keep_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.ron");
        let config = ModelViewerConfig {
            auto_rotate: Some(true),
            camera_orbit: Some(SphericalPositionDeg {
                theta_deg: 90.0,
                phi_deg: 45.0,
                radius: 2.0,
            }),
            ..Default::default()
        };

        let mut store = PresetStore::open(&path);
        store.save_preset("models/duck.glb", &config).unwrap();

        let reopened = PresetStore::open(&path);
        assert_eq!(reopened.library.get("models/duck.glb"), Some(&config));
        assert!(!reopened.library.contains("other.glb"));

        let history = dir.path().join("history").join("models_duck.glb");
        assert_eq!(fs::read_dir(history).unwrap().count(), 1);
    }

    #[test]
    fn presets_with_bad_camera_values_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.ron");

        fs::write(
            &path,
            r#"(presets: {"duck.glb": (camera_orbit: Some((theta_deg: 0.0, phi_deg: 90.0, radius: 0.0)))})"#,
        )
        .unwrap();
        assert!(matches!(
            PresetLibrary::load(&path),
            Err(EditorError::Ron { .. })
        ));

        fs::write(
            &path,
            r#"(presets: {"duck.glb": (radius_limits: Some((enabled: true, min: -2.0, max: 5.0)))})"#,
        )
        .unwrap();
        match PresetLibrary::load(&path) {
            Err(EditorError::InvalidPreset { model_url, source }) => {
                assert_eq!(model_url, "duck.glb");
                assert!(matches!(*source, EditorError::NonPositiveRadius { .. }));
            }
            other => panic!("expected an invalid preset, got {other:?}"),
        }
    }

    #[test]
    fn broken_preset_file_is_an_error_on_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.ron");
        fs::write(&path, "not ron at all {").unwrap();

        let mut store = PresetStore::open(&path);
        assert!(store.library.presets.is_empty());
        assert!(matches!(store.reload(), Err(EditorError::Ron { .. })));
    }
}
