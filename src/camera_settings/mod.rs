//! The camera settings panel: initial orbit, target point, auto-rotate and
//! the camera limits. Rendering lives in the editor; this is the state the
//! widgets edit and the handlers they call.

pub mod editors;
pub mod limits;

pub use editors::{CameraOrbitEditor, CameraTargetInput};
pub use limits::{LimitsEditor, LimitsKind};

use crate::config::{
    ModelViewerConfig, dispatch_auto_rotate, dispatch_camera_target, dispatch_save_camera_orbit,
    get_config,
};
use crate::error::Result;
use crate::model::{ModelState, get_camera_state, get_model};
use crate::store::{State, Store};
use crate::viewer::ModelViewer;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPhase {
    /// No camera snapshot has been loaded yet.
    #[default]
    Uninitialized,
    Displaying,
}

#[derive(Debug)]
pub struct CameraSettings {
    config: Rc<ModelViewerConfig>,
    model: Option<Rc<ModelState>>,
    phase: PanelPhase,
    needs_camera: bool,
    pub orbit_editor: CameraOrbitEditor,
    pub target_input: CameraTargetInput,
    pub limits: Vec<LimitsEditor>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let config = Rc::new(ModelViewerConfig::default());
        let limits = LimitsKind::ALL
            .iter()
            .map(|kind| LimitsEditor::new(*kind, &config))
            .collect();
        Self {
            config,
            model: None,
            phase: PanelPhase::Uninitialized,
            needs_camera: false,
            orbit_editor: CameraOrbitEditor::default(),
            target_input: CameraTargetInput::default(),
            limits,
        }
    }
}

fn same_model(a: Option<&Rc<ModelState>>, b: Option<&Rc<ModelState>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

impl CameraSettings {
    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn config(&self) -> &Rc<ModelViewerConfig> {
        &self.config
    }

    pub fn auto_rotate(&self) -> bool {
        self.config.auto_rotate.unwrap_or(false)
    }

    /// Whether a camera refresh was requested by the last state change and
    /// has not been served yet.
    pub fn needs_camera(&self) -> bool {
        self.needs_camera
    }

    /// Tracks the config and model slices. When either reference moved and a
    /// model is loaded, the panel asks for a fresh camera snapshot.
    pub fn state_changed(&mut self, state: &State) {
        let config = get_config(state);
        let model = get_model(state);
        let config_changed = !Rc::ptr_eq(config, &self.config);
        let model_changed = !same_model(model, self.model.as_ref());
        if !config_changed && !model_changed {
            return;
        }

        self.config = Rc::clone(config);
        self.model = model.cloned();
        if config_changed {
            for editor in &mut self.limits {
                editor.sync(config);
            }
        }
        if self.model.is_some() {
            self.needs_camera = true;
        }
    }

    pub async fn update_initial_camera<V: ModelViewer>(&mut self, viewer: Option<&V>) -> Result<()> {
        self.needs_camera = false;
        let camera = get_camera_state(viewer).await?;

        self.target_input.set_target(camera.target);
        if self.config.camera_orbit.is_none() {
            self.orbit_editor.hide();
        } else {
            self.orbit_editor.show_orbit(camera.orbit);
        }
        self.phase = PanelPhase::Displaying;
        debug!("camera panel showing {:?}", camera.orbit);
        Ok(())
    }

    pub async fn on_save_camera_orbit<V: ModelViewer>(
        &self,
        viewer: Option<&V>,
        store: &Store,
    ) -> Result<()> {
        let camera = get_camera_state(viewer).await?;
        store.dispatch(dispatch_save_camera_orbit(Some(camera.orbit)));
        Ok(())
    }

    pub fn reset_initial_camera(&mut self, store: &Store) {
        self.orbit_editor.hide();
        store.dispatch(dispatch_save_camera_orbit(None));
    }

    /// Saves the typed yaw and pitch, keeping the live camera's radius.
    pub async fn on_camera_orbit_editor_change<V: ModelViewer>(
        &self,
        viewer: Option<&V>,
        store: &Store,
    ) -> Result<()> {
        let camera = get_camera_state(viewer).await?;
        let orbit = self.orbit_editor.current_orbit(camera.orbit.radius)?;
        store.dispatch(dispatch_save_camera_orbit(Some(orbit)));
        Ok(())
    }

    pub fn on_camera_target_change(&self, store: &Store) -> Result<()> {
        let target = self.target_input.read()?;
        store.dispatch(dispatch_camera_target(Some(target)));
        Ok(())
    }

    pub fn on_auto_rotate_change(&self, checked: bool, store: &Store) {
        store.dispatch(dispatch_auto_rotate(checked));
    }
}
