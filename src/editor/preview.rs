use crate::config::{Limits, ModelViewerConfig, Vector3D};
use crate::editor::{
    DEFAULT_FIELD_OF_VIEW_DEG, DEFAULT_PHI_DEG, DEFAULT_RADIUS, DEFAULT_THETA_DEG,
    GRID_EXTENT_METERS, GRID_MAJOR_STEP_METERS, StudioState,
};
use crate::utils::{deg_to_rad, rad_to_deg};
use crate::viewer::{GltfModel, GltfTexture, Material, ModelViewer, SphericalPosition};
use bevy::camera::ClearColorConfig;
use bevy::camera::visibility::RenderLayers;
use bevy::prelude::*;
use bevy::tasks::block_on;
use bevy_egui::PrimaryEguiContext;
use std::rc::Rc;
use tracing::warn;

/// Keeps the camera from flipping over the poles.
const PHI_EPSILON_DEG: f64 = 0.5;
const MIN_RADIUS: f64 = 0.05;
const DEFAULT_TARGET: Vector3D = Vector3D {
    x: 0.0,
    y: 0.5,
    z: 0.0,
};

#[derive(Component)]
pub struct PreviewCamera;

/// Root of the spawned glTF scene.
#[derive(Component)]
pub struct PreviewModel;

/// The live preview as the editor sees it: camera state plus the parsed model.
#[derive(Resource, Debug, Clone)]
pub struct PreviewViewer {
    pub orbit: SphericalPosition,
    pub target: Vector3D,
    pub field_of_view_deg: f64,
    pub auto_rotate: bool,
    pub camera_controls: bool,
    pub yaw_limits: Option<Limits>,
    pub pitch_limits: Option<Limits>,
    pub radius_limits: Option<Limits>,
    pub fov_limits: Option<Limits>,
    pub show_grid: bool,
    pub model: Option<GltfModel>,
}

impl Default for PreviewViewer {
    fn default() -> Self {
        Self {
            orbit: default_orbit(),
            target: DEFAULT_TARGET,
            field_of_view_deg: DEFAULT_FIELD_OF_VIEW_DEG,
            auto_rotate: false,
            camera_controls: true,
            yaw_limits: None,
            pitch_limits: None,
            radius_limits: None,
            fov_limits: None,
            show_grid: true,
            model: None,
        }
    }
}

fn field_changed<T: PartialEq>(
    previous: Option<&ModelViewerConfig>,
    config: &ModelViewerConfig,
    field: impl Fn(&ModelViewerConfig) -> T,
) -> bool {
    previous.is_none_or(|previous| field(previous) != field(config))
}

fn default_orbit() -> SphericalPosition {
    SphericalPosition {
        theta: deg_to_rad(DEFAULT_THETA_DEG),
        phi: deg_to_rad(DEFAULT_PHI_DEG),
        radius: DEFAULT_RADIUS,
    }
}

impl PreviewViewer {
    /// Pushes the saved settings into the live camera. Orbit, target and
    /// field of view only move when their saved value differs from
    /// `previous`, so unrelated edits keep the user's navigation. A cleared
    /// value puts the preview back on its default.
    pub fn apply_config(
        &mut self,
        previous: Option<&ModelViewerConfig>,
        config: &ModelViewerConfig,
    ) {
        if field_changed(previous, config, |config| config.camera_orbit) {
            self.orbit = match config.camera_orbit {
                Some(orbit) => SphericalPosition {
                    theta: deg_to_rad(orbit.theta_deg),
                    phi: deg_to_rad(orbit.phi_deg),
                    radius: orbit.radius,
                },
                None => default_orbit(),
            };
        }
        if field_changed(previous, config, |config| config.camera_target) {
            self.target = config.camera_target.unwrap_or(DEFAULT_TARGET);
        }
        if field_changed(previous, config, |config| config.field_of_view_deg) {
            self.field_of_view_deg = config
                .field_of_view_deg
                .unwrap_or(DEFAULT_FIELD_OF_VIEW_DEG);
        }

        self.auto_rotate = config.auto_rotate.unwrap_or(false);
        self.camera_controls = config.camera_controls.unwrap_or(true);
        self.yaw_limits = config.yaw_limits;
        self.pitch_limits = config.pitch_limits;
        self.radius_limits = config.radius_limits;
        self.fov_limits = config.fov_limits;
        self.clamp_to_limits();
    }

    pub fn clamp_to_limits(&mut self) {
        let apply = |limits: Option<Limits>, value: f64| match limits {
            Some(limits) => limits.apply(value),
            None => value,
        };

        let theta_deg = apply(self.yaw_limits, rad_to_deg(self.orbit.theta));
        let phi_deg = apply(self.pitch_limits, rad_to_deg(self.orbit.phi))
            .clamp(PHI_EPSILON_DEG, 180.0 - PHI_EPSILON_DEG);
        self.orbit.theta = deg_to_rad(theta_deg);
        self.orbit.phi = deg_to_rad(phi_deg);
        self.orbit.radius = apply(self.radius_limits, self.orbit.radius).max(MIN_RADIUS);
        self.field_of_view_deg = apply(self.fov_limits, self.field_of_view_deg).clamp(1.0, 170.0);
    }
}

impl ModelViewer for PreviewViewer {
    type Source = GltfTexture;

    /// Config changes are applied synchronously in `sync_config_system`, so by
    /// the time anything reads the viewer there is nothing left pending.
    async fn update_complete(&self) {}

    fn camera_orbit(&self) -> SphericalPosition {
        self.orbit
    }

    fn camera_target(&self) -> Vector3D {
        self.target
    }

    fn field_of_view(&self) -> f64 {
        self.field_of_view_deg
    }

    fn materials(&self) -> Vec<Material<GltfTexture>> {
        self.model
            .as_ref()
            .map(GltfModel::materials)
            .unwrap_or_default()
    }

    fn original_gltf_json(&self) -> Option<serde_json::Value> {
        let model = self.model.as_ref()?;
        match model.original_json() {
            Ok(json) => Some(json),
            Err(err) => {
                warn!("could not serialize glTF json: {err}");
                None
            }
        }
    }
}

pub fn setup_preview_scene(mut commands: Commands) {
    commands.spawn((Camera3d::default(), Transform::default(), PreviewCamera));
    commands.spawn((
        Camera2d,
        Camera {
            order: 1,
            clear_color: ClearColorConfig::None,
            ..default()
        },
        RenderLayers::layer(31),
        PrimaryEguiContext,
    ));

    commands.spawn((
        DirectionalLight {
            color: Color::srgb(1.0, 0.97, 0.92),
            shadows_enabled: true,
            illuminance: 12_000.0,
            ..default()
        },
        Transform::from_xyz(3.0, 6.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Applies the config slice to the preview whenever it moved, then lets the
/// camera panel pull a fresh snapshot if it asked for one.
pub fn sync_preview(studio: &mut StudioState, viewer: &mut PreviewViewer) {
    if !studio.take_changed() {
        return;
    }
    let state = studio.store.get_state();

    let previous = studio.synced_config.take();
    if previous
        .as_ref()
        .is_none_or(|last| !Rc::ptr_eq(last, &state.config))
    {
        viewer.apply_config(previous.as_deref(), &state.config);
    }
    studio.synced_config = Some(Rc::clone(&state.config));

    studio.panel.state_changed(&state);
    if studio.panel.needs_camera() {
        if let Err(err) = block_on(studio.panel.update_initial_camera(Some(&*viewer))) {
            studio.status = format!("Camera refresh failed: {err}");
        }
    }
}

pub fn sync_config_system(
    mut studio: NonSendMut<StudioState>,
    mut viewer: ResMut<PreviewViewer>,
) {
    sync_preview(&mut studio, &mut viewer);
}

pub fn spawn_model_scene(
    commands: &mut Commands,
    asset_server: &AssetServer,
    existing: impl IntoIterator<Item = Entity>,
    asset_path: &str,
) {
    for entity in existing {
        commands.entity(entity).despawn();
    }
    commands.spawn((
        SceneRoot(asset_server.load(format!("{asset_path}#Scene0"))),
        Transform::default(),
        PreviewModel,
    ));
}

pub fn draw_grid_system(mut gizmos: Gizmos, viewer: Res<PreviewViewer>) {
    if !viewer.show_grid {
        return;
    }

    let extent = GRID_EXTENT_METERS as f32;
    let y = 0.001;

    for i in -GRID_EXTENT_METERS..=GRID_EXTENT_METERS {
        let f = i as f32;
        let color = if i % GRID_MAJOR_STEP_METERS == 0 {
            Color::srgba(0.55, 0.55, 0.55, 0.55)
        } else {
            Color::srgba(0.32, 0.32, 0.32, 0.35)
        };

        gizmos.line(Vec3::new(-extent, y, f), Vec3::new(extent, y, f), color);
        gizmos.line(Vec3::new(f, y, -extent), Vec3::new(f, y, extent), color);
    }

    gizmos.line(
        Vec3::new(-extent, y + 0.0005, 0.0),
        Vec3::new(extent, y + 0.0005, 0.0),
        Color::srgb(0.85, 0.25, 0.25),
    );
    gizmos.line(
        Vec3::new(0.0, y + 0.0005, -extent),
        Vec3::new(0.0, y + 0.0005, extent),
        Color::srgb(0.25, 0.35, 0.85),
    );
}
