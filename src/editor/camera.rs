use crate::editor::AUTO_ROTATE_DEG_PER_SEC;
use crate::editor::preview::{PreviewCamera, PreviewViewer};
use crate::utils::deg_to_rad;
use crate::viewer::SphericalPosition;
use bevy::camera::Viewport;
use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, Window};

const ROTATE_SPEED: f64 = 0.006;
const PAN_SPEED: f32 = 0.0018;
const ZOOM_STEP: f64 = 0.10;

#[derive(Resource, Default)]
pub struct UiInteractionState {
    pub wants_pointer_input: bool,
    pub wants_keyboard_input: bool,
    pub side_panel_width: f32,
}

/// Camera position relative to its target. Theta turns around +Y starting
/// at +Z, phi is measured down from +Y.
pub fn orbit_offset(orbit: SphericalPosition) -> Vec3 {
    let (sin_theta, cos_theta) = orbit.theta.sin_cos();
    let (sin_phi, cos_phi) = orbit.phi.sin_cos();
    Vec3::new(
        (orbit.radius * sin_phi * sin_theta) as f32,
        (orbit.radius * cos_phi) as f32,
        (orbit.radius * sin_phi * cos_theta) as f32,
    )
}

fn target_vec(viewer: &PreviewViewer) -> Vec3 {
    Vec3::new(
        viewer.target.x as f32,
        viewer.target.y as f32,
        viewer.target.z as f32,
    )
}

pub fn update_camera_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    mut camera_query: Query<&mut Camera, With<PreviewCamera>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let physical_width = window.physical_width();
    let physical_height = window.physical_height().max(1);
    if physical_width == 0 {
        return;
    }

    let panel_px = (ui_state.side_panel_width.max(0.0) * window.scale_factor() as f32) as u32;
    let viewport_x = panel_px.min(physical_width.saturating_sub(1));
    let viewport = Some(Viewport {
        physical_position: UVec2::new(viewport_x, 0),
        physical_size: UVec2::new(
            physical_width.saturating_sub(viewport_x).max(1),
            physical_height,
        ),
        depth: 0.0..1.0,
    });

    for mut camera in &mut camera_query {
        camera.viewport = viewport.clone();
    }
}

pub fn orbit_camera_system(
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    ui_state: Res<UiInteractionState>,
    time: Res<Time>,
    mut viewer: ResMut<PreviewViewer>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<PreviewCamera>>,
) {
    let mouse_delta = mouse_motion.delta;
    let scroll_delta = mouse_scroll.delta.y;

    let pointer_in_window = windows
        .single()
        .ok()
        .and_then(|w| w.cursor_position())
        .is_some();
    let can_use_mouse =
        viewer.camera_controls && pointer_in_window && !ui_state.wants_pointer_input;
    let mut dragging = false;

    if can_use_mouse {
        if mouse_buttons.pressed(MouseButton::Left) && mouse_delta.length_squared() > 0.0 {
            viewer.orbit.theta -= f64::from(mouse_delta.x) * ROTATE_SPEED;
            viewer.orbit.phi -= f64::from(mouse_delta.y) * ROTATE_SPEED;
            dragging = true;
        }

        if (mouse_buttons.pressed(MouseButton::Right) || mouse_buttons.pressed(MouseButton::Middle))
            && mouse_delta.length_squared() > 0.0
        {
            let forward = -orbit_offset(viewer.orbit).normalize_or_zero();
            let mut right = forward.cross(Vec3::Y);
            if right.length_squared() < 1e-6 {
                right = Vec3::X;
            }
            right = right.normalize();
            let up = right.cross(forward).normalize_or_zero();

            let pan = (-mouse_delta.x * right + mouse_delta.y * up)
                * viewer.orbit.radius as f32
                * PAN_SPEED;
            viewer.target.x += f64::from(pan.x);
            viewer.target.y += f64::from(pan.y);
            viewer.target.z += f64::from(pan.z);
            dragging = true;
        }

        if scroll_delta.abs() > f32::EPSILON {
            let zoom_factor = (1.0 - f64::from(scroll_delta) * ZOOM_STEP).clamp(0.2, 5.0);
            viewer.orbit.radius *= zoom_factor;
        }
    }

    if viewer.auto_rotate && !dragging {
        viewer.orbit.theta += deg_to_rad(AUTO_ROTATE_DEG_PER_SEC) * f64::from(time.delta_secs());
    }
    viewer.clamp_to_limits();

    let target = target_vec(&viewer);
    let position = target + orbit_offset(viewer.orbit);
    let fov = deg_to_rad(viewer.field_of_view_deg) as f32;

    for (mut transform, mut projection) in &mut camera_query {
        *transform = Transform::from_translation(position).looking_at(target, Vec3::Y);
        if let Projection::Perspective(perspective) = &mut *projection {
            perspective.fov = fov;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn orbit(theta: f64, phi: f64, radius: f64) -> SphericalPosition {
        SphericalPosition { theta, phi, radius }
    }

    #[test]
    fn zero_theta_on_the_equator_looks_from_front() {
        let offset = orbit_offset(orbit(0.0, FRAC_PI_2, 2.0));
        assert_relative_eq!(offset.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(offset.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(offset.z, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn quarter_turn_moves_to_positive_x() {
        let offset = orbit_offset(orbit(FRAC_PI_2, FRAC_PI_2, 3.0));
        assert_relative_eq!(offset.x, 3.0, epsilon = 1e-6);
        assert_relative_eq!(offset.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn phi_zero_is_straight_above() {
        let offset = orbit_offset(orbit(1.0, 0.0, 1.5));
        assert_relative_eq!(offset.y, 1.5, epsilon = 1e-6);
        assert_relative_eq!(offset.length(), 1.5, epsilon = 1e-6);

        let below = orbit_offset(orbit(0.0, PI, 1.0));
        assert_relative_eq!(below.y, -1.0, epsilon = 1e-6);
    }
}
