//! Desktop host: a bevy preview standing in for the embedded viewer, with the
//! editor panels drawn by egui.

pub mod app;
pub mod camera;
pub mod jobs;
pub mod preview;
pub mod ui;

pub use app::run;

use crate::camera_settings::CameraSettings;
use crate::config::ModelViewerConfig;
use crate::settings::{PRESETS_PATH, PresetStore, SETTINGS_PATH, StudioSettings};
use crate::snippet::dispatch_relative_file_paths;
use crate::store::{State, Store, Subscription};
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

pub const ASSETS_ROOT: &str = "assets";
pub const GRID_EXTENT_METERS: i32 = 10;
pub const GRID_MAJOR_STEP_METERS: i32 = 5;
pub const DEFAULT_THETA_DEG: f64 = 0.0;
pub const DEFAULT_PHI_DEG: f64 = 75.0;
pub const DEFAULT_RADIUS: f64 = 4.0;
pub const DEFAULT_FIELD_OF_VIEW_DEG: f64 = 30.0;
pub const AUTO_ROTATE_DEG_PER_SEC: f64 = 30.0;

/// Text fields that only reach the store once committed, so they need to
/// outlive the frame they are typed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drafts {
    pub model_name: String,
    pub environment_image: String,
    pub poster: String,
    pub extra_attributes: String,
}

/// Everything on the editor side of the preview. Holds `Rc`s, so it lives in
/// a non-send resource.
pub struct StudioState {
    pub store: Store,
    pub panel: CameraSettings,
    pub presets: PresetStore,
    pub settings: StudioSettings,
    pub model_input: String,
    pub status: String,
    pub drafts: Drafts,
    /// Config last pushed into the preview.
    pub synced_config: Option<Rc<ModelViewerConfig>>,
    changed: Rc<Cell<bool>>,
    _subscription: Subscription,
}

impl StudioState {
    pub fn new(settings: StudioSettings, presets: PresetStore) -> Self {
        let store = Store::new(State::default());
        store.dispatch(dispatch_relative_file_paths(
            settings.relative_file_paths.clone(),
        ));

        let changed = Rc::new(Cell::new(true));
        let flag = Rc::clone(&changed);
        let subscription = store.subscribe(move |_| flag.set(true));

        let drafts = Drafts {
            model_name: settings
                .relative_file_paths
                .model_name
                .clone()
                .unwrap_or_default(),
            extra_attributes: "{}".to_string(),
            ..Default::default()
        };

        Self {
            store,
            panel: CameraSettings::default(),
            presets,
            model_input: settings.initial_model.clone().unwrap_or_default(),
            settings,
            status: "Ready".to_string(),
            drafts,
            synced_config: None,
            changed,
            _subscription: subscription,
        }
    }

    /// True once per batch of store changes.
    pub fn take_changed(&self) -> bool {
        self.changed.replace(false)
    }
}

pub fn load_studio_state() -> StudioState {
    let settings = StudioSettings::load(Path::new(SETTINGS_PATH));
    StudioState::new(settings, PresetStore::open(PRESETS_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::dispatch_auto_rotate;

    #[test]
    fn studio_state_tracks_store_changes() {
        let dir = tempfile::tempdir().unwrap();
        let studio = StudioState::new(
            StudioSettings::default(),
            PresetStore::open(dir.path().join("presets.ron")),
        );
        assert!(studio.take_changed());
        assert!(!studio.take_changed());

        studio.store.dispatch(dispatch_auto_rotate(true));
        assert!(studio.take_changed());
        assert!(!studio.take_changed());
    }

    #[test]
    fn settings_seed_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = StudioSettings::default();
        settings.relative_file_paths.model_name = Some("chair.glb".to_string());
        let studio = StudioState::new(settings, PresetStore::open(dir.path().join("p.ron")));

        let state = studio.store.get_state();
        assert_eq!(
            state.relative_file_paths.model_name.as_deref(),
            Some("chair.glb")
        );
        assert_eq!(studio.drafts.model_name, "chair.glb");
    }
}
