use crate::editor::camera::{UiInteractionState, orbit_camera_system, update_camera_viewport};
use crate::editor::jobs::{DownloadQueue, poll_finished_downloads, spawn_model_download};
use crate::editor::load_studio_state;
use crate::editor::preview::{
    PreviewViewer, draw_grid_system, setup_preview_scene, sync_config_system,
};
use crate::editor::ui::ui_system;
use bevy::prelude::*;
use bevy::window::{PresentMode, Window, WindowPlugin};
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};
use tracing::warn;

pub fn run() {
    let studio = load_studio_state();
    let settings = studio.settings.clone();

    let mut queue = DownloadQueue::default();
    if let Some(model) = &settings.initial_model {
        if let Err(err) = spawn_model_download(&mut queue, model) {
            warn!("not loading initial model: {err}");
        }
    }

    App::new()
        .insert_resource(PreviewViewer {
            show_grid: settings.show_grid,
            ..Default::default()
        })
        .insert_resource(UiInteractionState::default())
        .insert_non_send_resource(studio)
        .insert_non_send_resource(queue)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Viewer Studio".to_string(),
                resolution: (settings.window_width, settings.window_height).into(),
                present_mode: PresentMode::AutoVsync,
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_plugins(EguiPlugin::default())
        .add_systems(Startup, setup_preview_scene)
        .add_systems(Update, poll_finished_downloads)
        .add_systems(Update, sync_config_system.after(poll_finished_downloads))
        .add_systems(Update, update_camera_viewport)
        .add_systems(Update, orbit_camera_system.after(sync_config_system))
        .add_systems(Update, draw_grid_system)
        .add_systems(EguiPrimaryContextPass, ui_system)
        .run();
}
