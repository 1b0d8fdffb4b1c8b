use crate::config::{
    DEFAULT_FOV_LIMITS, DEFAULT_PITCH_LIMITS, DEFAULT_RADIUS_LIMITS, DEFAULT_YAW_LIMITS, Limits,
    ModelViewerConfig, dispatch_fov_limits, dispatch_pitch_limits, dispatch_radius_limits,
    dispatch_yaw_limits,
};
use crate::error::Result;
use crate::model::CameraState;
use crate::store::{Action, Store};
use crate::utils::{check_finite, parse_number};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitsKind {
    Yaw,
    Pitch,
    Radius,
    FieldOfView,
}

impl LimitsKind {
    pub const ALL: [LimitsKind; 4] = [Self::Yaw, Self::Pitch, Self::Radius, Self::FieldOfView];

    pub fn label(self) -> &'static str {
        match self {
            Self::Yaw => "Yaw",
            Self::Pitch => "Pitch",
            Self::Radius => "Zoom",
            Self::FieldOfView => "Field of view",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Radius => "m",
            _ => "deg",
        }
    }

    fn defaults(self) -> Limits {
        match self {
            Self::Yaw => DEFAULT_YAW_LIMITS,
            Self::Pitch => DEFAULT_PITCH_LIMITS,
            Self::Radius => DEFAULT_RADIUS_LIMITS,
            Self::FieldOfView => DEFAULT_FOV_LIMITS,
        }
    }

    fn saved(self, config: &ModelViewerConfig) -> Option<Limits> {
        match self {
            Self::Yaw => config.yaw_limits,
            Self::Pitch => config.pitch_limits,
            Self::Radius => config.radius_limits,
            Self::FieldOfView => config.fov_limits,
        }
    }

    fn action(self, limits: Limits) -> Action {
        match self {
            Self::Yaw => dispatch_yaw_limits(limits),
            Self::Pitch => dispatch_pitch_limits(limits),
            Self::Radius => dispatch_radius_limits(limits),
            Self::FieldOfView => dispatch_fov_limits(limits),
        }
    }

    fn current(self, camera: &CameraState) -> f64 {
        match self {
            Self::Yaw => camera.orbit.theta_deg,
            Self::Pitch => camera.orbit.phi_deg,
            Self::Radius => camera.orbit.radius,
            Self::FieldOfView => camera.field_of_view_deg,
        }
    }
}

/// Enable checkbox plus min/max inputs for one kind of camera limit.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitsEditor {
    pub kind: LimitsKind,
    pub enabled: bool,
    pub min_input: String,
    pub max_input: String,
}

impl LimitsEditor {
    pub fn new(kind: LimitsKind, config: &ModelViewerConfig) -> Self {
        let mut editor = Self {
            kind,
            enabled: false,
            min_input: String::new(),
            max_input: String::new(),
        };
        editor.sync(config);
        editor
    }

    /// Reloads the inputs from the config, falling back to the defaults.
    pub fn sync(&mut self, config: &ModelViewerConfig) {
        let limits = self.kind.saved(config).unwrap_or_else(|| self.kind.defaults());
        self.enabled = limits.enabled;
        self.min_input = limits.min.to_string();
        self.max_input = limits.max.to_string();
    }

    pub fn read(&self) -> Result<Limits> {
        let limits = Limits::new(
            self.enabled,
            check_finite(parse_number(&self.min_input))?,
            check_finite(parse_number(&self.max_input))?,
        )?;
        match self.kind {
            LimitsKind::Radius => limits.checked_radius(),
            _ => Ok(limits),
        }
    }

    pub fn commit(&self, store: &Store) -> Result<()> {
        let limits = self.read()?;
        store.dispatch(self.kind.action(limits));
        Ok(())
    }

    pub fn set_min_from_camera(&mut self, camera: &CameraState) {
        self.min_input = self.kind.current(camera).to_string();
    }

    pub fn set_max_from_camera(&mut self, camera: &CameraState) {
        self.max_input = self.kind.current(camera).to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SphericalPositionDeg, Vector3D};
    use crate::error::EditorError;
    use rstest::rstest;

    #[rstest]
    #[case(LimitsKind::Yaw, "-180", "180")]
    #[case(LimitsKind::Pitch, "22.5", "157.5")]
    #[case(LimitsKind::Radius, "0.1", "20")]
    #[case(LimitsKind::FieldOfView, "10", "45")]
    fn unset_limits_show_defaults(#[case] kind: LimitsKind, #[case] min: &str, #[case] max: &str) {
        let editor = LimitsEditor::new(kind, &ModelViewerConfig::default());
        assert!(!editor.enabled);
        assert_eq!(editor.min_input, min);
        assert_eq!(editor.max_input, max);
    }

    #[test]
    fn commit_dispatches_matching_action() {
        let store = Store::default();
        let mut editor = LimitsEditor::new(LimitsKind::Pitch, &store.get_state().config);
        editor.enabled = true;
        editor.min_input = "30".to_string();
        editor.commit(&store).unwrap();

        let state = store.get_state();
        assert_eq!(
            state.config.pitch_limits,
            Some(Limits::new(true, 30.0, 157.5).unwrap())
        );
        assert_eq!(state.config.yaw_limits, None);
    }

    #[test]
    fn inverted_limits_are_not_dispatched() {
        let store = Store::default();
        let mut editor = LimitsEditor::new(LimitsKind::Radius, &store.get_state().config);
        editor.min_input = "50".to_string();

        assert!(matches!(
            editor.commit(&store),
            Err(EditorError::InvertedLimits { .. })
        ));
        assert_eq!(store.get_state().config.radius_limits, None);
    }

    #[test]
    fn zoom_floor_must_stay_positive() {
        let store = Store::default();
        let mut editor = LimitsEditor::new(LimitsKind::Radius, &store.get_state().config);
        editor.min_input = "-1".to_string();
        assert!(matches!(
            editor.commit(&store),
            Err(EditorError::NonPositiveRadius { .. })
        ));
        assert_eq!(store.get_state().config.radius_limits, None);

        let mut yaw = LimitsEditor::new(LimitsKind::Yaw, &store.get_state().config);
        yaw.min_input = "-1".to_string();
        assert!(yaw.commit(&store).is_ok());
    }

    #[test]
    fn disabling_keeps_values() {
        let config = ModelViewerConfig {
            yaw_limits: Some(Limits::new(true, -45.0, 45.0).unwrap()),
            ..Default::default()
        };
        let mut editor = LimitsEditor::new(LimitsKind::Yaw, &config);
        editor.enabled = false;
        assert_eq!(editor.read().unwrap(), Limits::new(false, -45.0, 45.0).unwrap());
    }

    #[test]
    fn camera_values_fill_bounds() {
        let camera = CameraState {
            orbit: SphericalPositionDeg {
                theta_deg: 12.0,
                phi_deg: 60.0,
                radius: 3.0,
            },
            target: Vector3D::default(),
            field_of_view_deg: 25.0,
        };
        let mut zoom = LimitsEditor::new(LimitsKind::Radius, &ModelViewerConfig::default());
        zoom.set_max_from_camera(&camera);
        assert_eq!(zoom.max_input, "3");

        let mut fov = LimitsEditor::new(LimitsKind::FieldOfView, &ModelViewerConfig::default());
        fov.set_min_from_camera(&camera);
        assert_eq!(fov.min_input, "25");
    }
}
