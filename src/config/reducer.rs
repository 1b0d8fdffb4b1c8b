use crate::config::types::{Limits, ModelViewerConfig, SphericalPositionDeg, Vector3D};
use crate::store::{Action, State};
use std::rc::Rc;

pub fn dispatch_save_camera_orbit(orbit: Option<SphericalPositionDeg>) -> Action {
    Action::SaveCameraOrbit(orbit)
}

pub fn dispatch_camera_target(target: Option<Vector3D>) -> Action {
    Action::SetCameraTarget(target)
}

pub fn dispatch_auto_rotate(auto_rotate: bool) -> Action {
    Action::SetAutoRotate(auto_rotate)
}

pub fn dispatch_camera_controls(enabled: bool) -> Action {
    Action::SetCameraControls(enabled)
}

pub fn dispatch_field_of_view(field_of_view_deg: Option<f64>) -> Action {
    Action::SetFieldOfView(field_of_view_deg)
}

pub fn dispatch_yaw_limits(limits: Limits) -> Action {
    Action::SetYawLimits(limits)
}

pub fn dispatch_pitch_limits(limits: Limits) -> Action {
    Action::SetPitchLimits(limits)
}

pub fn dispatch_radius_limits(limits: Limits) -> Action {
    Action::SetRadiusLimits(limits)
}

pub fn dispatch_fov_limits(limits: Limits) -> Action {
    Action::SetFovLimits(limits)
}

pub fn dispatch_environment_image(url: Option<String>) -> Action {
    Action::SetEnvironmentImage(url)
}

pub fn dispatch_poster(url: Option<String>) -> Action {
    Action::SetPoster(url)
}

pub fn dispatch_exposure(exposure: Option<f64>) -> Action {
    Action::SetExposure(exposure)
}

pub fn dispatch_shadow_intensity(intensity: Option<f64>) -> Action {
    Action::SetShadowIntensity(intensity)
}

/// Replaces the whole config, e.g. when a saved preset is loaded.
pub fn dispatch_config(config: ModelViewerConfig) -> Action {
    Action::SetConfig(config)
}

pub fn get_config(state: &State) -> &Rc<ModelViewerConfig> {
    &state.config
}

pub fn get_camera_orbit(state: &State) -> Option<SphericalPositionDeg> {
    state.config.camera_orbit
}

pub fn get_camera_target(state: &State) -> Option<Vector3D> {
    state.config.camera_target
}

pub fn get_auto_rotate(state: &State) -> bool {
    state.config.auto_rotate.unwrap_or(false)
}

pub fn config_reducer(state: &Rc<ModelViewerConfig>, action: &Action) -> Rc<ModelViewerConfig> {
    let mut next = ModelViewerConfig::clone(state);
    match action {
        Action::SaveCameraOrbit(orbit) => next.camera_orbit = *orbit,
        Action::SetCameraTarget(target) => next.camera_target = *target,
        Action::SetAutoRotate(auto_rotate) => next.auto_rotate = Some(*auto_rotate),
        Action::SetCameraControls(enabled) => next.camera_controls = Some(*enabled),
        Action::SetFieldOfView(fov) => next.field_of_view_deg = *fov,
        Action::SetYawLimits(limits) => next.yaw_limits = Some(*limits),
        Action::SetPitchLimits(limits) => next.pitch_limits = Some(*limits),
        Action::SetRadiusLimits(limits) => next.radius_limits = Some(*limits),
        Action::SetFovLimits(limits) => next.fov_limits = Some(*limits),
        Action::SetEnvironmentImage(url) => next.environment_image = url.clone(),
        Action::SetPoster(url) => next.poster = url.clone(),
        Action::SetExposure(exposure) => next.exposure = *exposure,
        Action::SetShadowIntensity(intensity) => next.shadow_intensity = *intensity,
        Action::SetConfig(config) => next = config.clone(),
        _ => return Rc::clone(state),
    }
    Rc::new(next)
}
