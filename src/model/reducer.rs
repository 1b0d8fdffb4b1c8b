use crate::model::types::{ModelDirtyPayload, ModelPayload, ModelState};
use crate::store::{Action, State};
use std::rc::Rc;

pub fn dispatch_gltf_url(gltf_url: Option<String>) -> Action {
    Action::SetGltfUrl(gltf_url)
}

pub fn dispatch_model_payload(payload: ModelPayload) -> Action {
    Action::SetModel(payload)
}

pub fn dispatch_model_dirty(is_dirty: bool) -> Action {
    Action::SetModelDirty(ModelDirtyPayload { is_dirty })
}

pub fn get_gltf_url(state: &State) -> Option<&str> {
    state.entities.model.as_ref()?.gltf_url.as_deref()
}

pub fn get_model(state: &State) -> Option<&Rc<ModelState>> {
    state.entities.model.as_ref()
}

pub fn model_reducer(state: Option<&Rc<ModelState>>, action: &Action) -> Option<Rc<ModelState>> {
    let mut next = state.map(|model| ModelState::clone(model)).unwrap_or_default();
    match action {
        Action::SetGltfUrl(gltf_url) => next.gltf_url = gltf_url.clone(),
        Action::SetModel(payload) => {
            next.thumbnails_by_id = Rc::clone(&payload.thumbnails_by_id);
            next.original_gltf = payload.original_gltf.clone().map(Rc::new);
            next.original_gltf_json = payload.original_gltf_json.clone();
        }
        Action::SetModelDirty(payload) => next.is_dirty = payload.is_dirty,
        _ => return state.cloned(),
    }
    Some(Rc::new(next))
}
