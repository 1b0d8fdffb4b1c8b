use crate::config::{SphericalPositionDeg, Vector3D};
use crate::error::Result;
use crate::utils::parse_number;

/// Yaw/pitch inputs for the saved initial orbit. Hidden while the config has
/// no saved orbit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraOrbitEditor {
    pub yaw_input: String,
    pub pitch_input: String,
    pub visible: bool,
}

impl CameraOrbitEditor {
    pub fn show_orbit(&mut self, orbit: SphericalPositionDeg) {
        self.yaw_input = orbit.theta_deg.to_string();
        self.pitch_input = orbit.phi_deg.to_string();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Typed yaw and pitch in degrees, with the given radius.
    pub fn current_orbit(&self, radius: f64) -> Result<SphericalPositionDeg> {
        SphericalPositionDeg::checked(
            parse_number(&self.yaw_input),
            parse_number(&self.pitch_input),
            radius,
        )
    }
}

/// X/Y/Z inputs for the camera target. Shows a waiting note until the first
/// camera snapshot arrives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraTargetInput {
    pub target: Option<Vector3D>,
    pub x_input: String,
    pub y_input: String,
    pub z_input: String,
}

impl CameraTargetInput {
    pub const WAITING_NOTE: &'static str = "Waiting for camera target...";

    pub fn set_target(&mut self, target: Vector3D) {
        self.target = Some(target);
        self.x_input = target.x.to_string();
        self.y_input = target.y.to_string();
        self.z_input = target.z.to_string();
    }

    pub fn read(&self) -> Result<Vector3D> {
        Vector3D::checked(
            parse_number(&self.x_input),
            parse_number(&self.y_input),
            parse_number(&self.z_input),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use pretty_assertions::assert_eq;

    #[test]
    fn orbit_editor_round_trips_degrees() {
        let mut editor = CameraOrbitEditor::default();
        editor.show_orbit(SphericalPositionDeg {
            theta_deg: 30.0,
            phi_deg: 75.5,
            radius: 4.0,
        });
        assert!(editor.visible);
        assert_eq!(editor.yaw_input, "30");

        let orbit = editor.current_orbit(2.5).unwrap();
        assert_eq!(
            orbit,
            SphericalPositionDeg {
                theta_deg: 30.0,
                phi_deg: 75.5,
                radius: 2.5,
            }
        );
    }

    #[test]
    fn orbit_editor_rejects_garbage() {
        let editor = CameraOrbitEditor {
            yaw_input: "north".to_string(),
            pitch_input: "10".to_string(),
            visible: true,
        };
        assert!(matches!(
            editor.current_orbit(1.0),
            Err(EditorError::Validation { .. })
        ));
    }

    #[test]
    fn target_input_blank_reads_as_zero() {
        let mut input = CameraTargetInput::default();
        input.set_target(Vector3D::new(1.0, 2.0, 3.0));
        input.y_input.clear();
        assert_eq!(input.read().unwrap(), Vector3D::new(1.0, 0.0, 3.0));

        input.z_input = "inf".to_string();
        assert!(input.read().is_err());
    }
}
