//! The application state tree and the store that owns it.
//!
//! Every slice sits behind an `Rc` so that "did this slice change" is a
//! pointer comparison. Reducers hand back the same `Rc` when an action does
//! not concern them.

use crate::best_practices::{BestPracticesState, best_practices_reducer};
use crate::config::{
    Limits, ModelViewerConfig, SphericalPositionDeg, Vector3D, config_reducer,
};
use crate::model::{ModelDirtyPayload, ModelPayload, ModelState, model_reducer};
use crate::snippet::{
    ExtraAttributes, ModelViewerSnippetState, RelativeFilePaths, model_viewer_snippet_reducer,
    relative_file_paths_reducer,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    SaveCameraOrbit(Option<SphericalPositionDeg>),
    SetCameraTarget(Option<Vector3D>),
    SetAutoRotate(bool),
    SetCameraControls(bool),
    SetFieldOfView(Option<f64>),
    SetYawLimits(Limits),
    SetPitchLimits(Limits),
    SetRadiusLimits(Limits),
    SetFovLimits(Limits),
    SetEnvironmentImage(Option<String>),
    SetPoster(Option<String>),
    SetExposure(Option<f64>),
    SetShadowIntensity(Option<f64>),
    SetConfig(ModelViewerConfig),
    SetGltfUrl(Option<String>),
    SetModel(ModelPayload),
    SetModelDirty(ModelDirtyPayload),
    SetExtraAttributes(ExtraAttributes),
    SetRelativeFilePaths(RelativeFilePaths),
    SetProgressBar(bool),
    SetArButton(bool),
    SetArPrompt(bool),
}

impl Action {
    /// The wire name of the action, as used in the serialized `type` field.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::SaveCameraOrbit(_) => "SAVE_CAMERA_ORBIT",
            Self::SetCameraTarget(_) => "SET_CAMERA_TARGET",
            Self::SetAutoRotate(_) => "SET_AUTO_ROTATE",
            Self::SetCameraControls(_) => "SET_CAMERA_CONTROLS",
            Self::SetFieldOfView(_) => "SET_FIELD_OF_VIEW",
            Self::SetYawLimits(_) => "SET_YAW_LIMITS",
            Self::SetPitchLimits(_) => "SET_PITCH_LIMITS",
            Self::SetRadiusLimits(_) => "SET_RADIUS_LIMITS",
            Self::SetFovLimits(_) => "SET_FOV_LIMITS",
            Self::SetEnvironmentImage(_) => "SET_ENVIRONMENT_IMAGE",
            Self::SetPoster(_) => "SET_POSTER",
            Self::SetExposure(_) => "SET_EXPOSURE",
            Self::SetShadowIntensity(_) => "SET_SHADOW_INTENSITY",
            Self::SetConfig(_) => "SET_CONFIG",
            Self::SetGltfUrl(_) => "SET_GLTF_URL",
            Self::SetModel(_) => "SET_MODEL",
            Self::SetModelDirty(_) => "SET_MODEL_DIRTY",
            Self::SetExtraAttributes(_) => "SET_EXTRA_ATTRIBUTES",
            Self::SetRelativeFilePaths(_) => "SET_RELATIVE_FILE_PATHS",
            Self::SetProgressBar(_) => "SET_PROGRESS_BAR",
            Self::SetArButton(_) => "SET_AR_BUTTON",
            Self::SetArPrompt(_) => "SET_AR_PROMPT",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entities {
    pub model: Option<Rc<ModelState>>,
    pub model_viewer_snippet: Rc<ModelViewerSnippetState>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub entities: Rc<Entities>,
    pub config: Rc<ModelViewerConfig>,
    pub best_practices: Rc<BestPracticesState>,
    pub relative_file_paths: Rc<RelativeFilePaths>,
}

fn same_model(a: Option<&Rc<ModelState>>, b: Option<&Rc<ModelState>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Rc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

pub fn entities_reducer(state: &Rc<Entities>, action: &Action) -> Rc<Entities> {
    let model = model_reducer(state.model.as_ref(), action);
    let model_viewer_snippet = model_viewer_snippet_reducer(&state.model_viewer_snippet, action);

    if same_model(model.as_ref(), state.model.as_ref())
        && Rc::ptr_eq(&model_viewer_snippet, &state.model_viewer_snippet)
    {
        return Rc::clone(state);
    }
    Rc::new(Entities {
        model,
        model_viewer_snippet,
    })
}

pub fn root_reducer(state: &State, action: &Action) -> State {
    State {
        entities: entities_reducer(&state.entities, action),
        config: config_reducer(&state.config, action),
        best_practices: best_practices_reducer(&state.best_practices, action),
        relative_file_paths: relative_file_paths_reducer(&state.relative_file_paths, action),
    }
}

impl State {
    /// True when every slice is the same allocation as in `other`.
    pub fn same_as(&self, other: &State) -> bool {
        Rc::ptr_eq(&self.entities, &other.entities)
            && Rc::ptr_eq(&self.config, &other.config)
            && Rc::ptr_eq(&self.best_practices, &other.best_practices)
            && Rc::ptr_eq(&self.relative_file_paths, &other.relative_file_paths)
    }
}

pub type Subscriber = Rc<dyn Fn(&State)>;

pub struct Store {
    state: RefCell<State>,
    subscribers: Rc<RefCell<Vec<Subscriber>>>,
}

impl Store {
    pub fn new(initial: State) -> Self {
        Self {
            state: RefCell::new(initial),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// A cheap snapshot: cloning the tree only bumps the slice counts.
    pub fn get_state(&self) -> State {
        self.state.borrow().clone()
    }

    pub fn dispatch(&self, action: Action) {
        debug!("dispatch {}", action.type_tag());
        let next = {
            let current = self.state.borrow();
            let next = root_reducer(&current, &action);
            if next.same_as(&current) {
                return;
            }
            next
        };
        *self.state.borrow_mut() = next.clone();
        self.notify(&next);
    }

    pub fn subscribe(&self, subscriber: impl Fn(&State) + 'static) -> Subscription {
        let subscriber: Subscriber = Rc::new(subscriber);
        self.subscribers.borrow_mut().push(Rc::clone(&subscriber));
        Subscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    fn notify(&self, state: &State) {
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)(state);
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(State::default())
    }
}

/// Keeps a subscriber registered until dropped.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    subscriber: Subscriber,
    subscribers: Rc<RefCell<Vec<Subscriber>>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}
