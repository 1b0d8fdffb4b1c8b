use crate::best_practices::{dispatch_ar_button, dispatch_ar_prompt, dispatch_progress_bar};
use crate::camera_settings::{CameraSettings, CameraTargetInput, LimitsEditor};
use crate::config::{
    ModelViewerConfig, dispatch_camera_controls, dispatch_config, dispatch_environment_image,
    dispatch_exposure, dispatch_field_of_view, dispatch_poster, dispatch_shadow_intensity,
};
use crate::editor::{Drafts, StudioState};
use crate::editor::camera::UiInteractionState;
use crate::editor::jobs::{DownloadQueue, spawn_model_download};
use crate::editor::preview::PreviewViewer;
use crate::error::{EditorError, Result};
use crate::model::{get_camera_state, get_gltf_url, get_model};
use crate::settings::SETTINGS_PATH;
use crate::snippet::{
    ExtraAttributes, dispatch_extra_attributes, dispatch_relative_file_paths, export_snippet,
};
use crate::store::Store;
use bevy::prelude::{NonSendMut, ResMut};
use bevy::tasks::block_on;
use bevy_egui::{EguiContexts, egui};
use std::ops::RangeInclusive;
use std::path::Path;

pub fn ui_system(
    mut contexts: EguiContexts,
    mut studio: NonSendMut<StudioState>,
    mut queue: NonSendMut<DownloadQueue>,
    mut ui_state: ResMut<UiInteractionState>,
    mut viewer: ResMut<PreviewViewer>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let studio = &mut *studio;

    egui::TopBottomPanel::top("viewer_studio_top_bar").show(ctx, |ui| {
        ui.horizontal_wrapped(|ui| {
            ui.heading("Viewer Studio");
            ui.separator();
            ui.label(format!("Status: {}", studio.status));
            if queue.running {
                ui.label("(loading)");
            }
            ui.separator();
            ui.small("Viewport controls: LMB orbit, RMB/MMB pan, wheel zoom.");
        });
    });

    let side_panel_response = egui::SidePanel::left("viewer_studio_controls")
        .resizable(true)
        .default_width(studio.settings.side_panel_width)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                model_section(ui, studio, &mut queue, &mut viewer);
                ui.separator();
                camera_section(ui, studio, &viewer);
                ui.separator();
                limits_section(ui, studio, &viewer);
                ui.separator();
                scene_section(ui, studio);
                ui.separator();
                presets_section(ui, studio);
                ui.separator();
                export_section(ui, studio);
            });
        });

    ui_state.wants_pointer_input = ctx.wants_pointer_input();
    ui_state.wants_keyboard_input = ctx.wants_keyboard_input();
    ui_state.side_panel_width = side_panel_response.response.rect.width();
}

fn report(status: &mut String, result: Result<()>) {
    if let Err(err) = result {
        *status = err.to_string();
    }
}

/// A field commits when focus leaves it after an edit, or on enter.
fn should_commit(lost_focus: bool, edited: bool, enter_pressed: bool) -> bool {
    lost_focus && (edited || enter_pressed)
}

/// Remembers in egui's temp memory whether the text changed since the field
/// took focus, and hands that back once focus leaves.
fn take_edited(ui: &egui::Ui, response: &egui::Response) -> bool {
    let id = response.id.with("edited");
    if response.changed() {
        ui.data_mut(|data| data.insert_temp(id, true));
    }
    if !response.lost_focus() {
        return false;
    }
    ui.data_mut(|data| {
        let edited = data.get_temp::<bool>(id).unwrap_or(false);
        data.remove::<bool>(id);
        edited
    })
}

/// Text field that reports a commit when the user presses enter, or leaves
/// it after typing.
fn committed_text(ui: &mut egui::Ui, label: &str, value: &mut String) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        let response = ui.add(egui::TextEdit::singleline(value).desired_width(70.0));
        let edited = take_edited(ui, &response);
        let enter_pressed = ui.input(|input| input.key_pressed(egui::Key::Enter));
        should_commit(response.lost_focus(), edited, enter_pressed)
    })
    .inner
}

/// Number input that can be switched back to the viewer default. Returns the
/// new value when the user touched either control.
fn optional_number(
    ui: &mut egui::Ui,
    label: &str,
    current: Option<f64>,
    fallback: f64,
    range: RangeInclusive<f64>,
) -> Option<Option<f64>> {
    let mut enabled = current.is_some();
    let mut value = current.unwrap_or(fallback);
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui.checkbox(&mut enabled, label).changed();
        changed |= ui
            .add_enabled(
                enabled,
                egui::DragValue::new(&mut value).speed(0.05).range(range),
            )
            .changed();
    });
    changed.then(|| enabled.then_some(value))
}

fn non_blank(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn reset_config_drafts(drafts: &mut Drafts, config: &ModelViewerConfig) {
    drafts.environment_image = config.environment_image.clone().unwrap_or_default();
    drafts.poster = config.poster.clone().unwrap_or_default();
}

fn model_section(
    ui: &mut egui::Ui,
    studio: &mut StudioState,
    queue: &mut DownloadQueue,
    viewer: &mut PreviewViewer,
) {
    ui.heading("Model");
    ui.horizontal(|ui| {
        ui.text_edit_singleline(&mut studio.model_input);
        if ui
            .add_enabled(!queue.running, egui::Button::new("Load"))
            .clicked()
        {
            match spawn_model_download(queue, &studio.model_input) {
                Ok(()) => studio.status = format!("Loading {}", studio.model_input.trim()),
                Err(err) => studio.status = err,
            }
        }
    });
    ui.small("Asset path under assets/ or an http(s) url to a .glb file.");

    let state = studio.store.get_state();
    match get_model(&state) {
        Some(model) => {
            ui.label(format!(
                "{} ({} thumbnails{})",
                model.gltf_url.as_deref().unwrap_or("-"),
                model.thumbnails_by_id.len(),
                if model.is_dirty { ", unsaved" } else { "" }
            ));
            egui::CollapsingHeader::new("Textures").show(ui, |ui| {
                for (id, thumbnail) in model.thumbnails_by_id.iter() {
                    ui.small(format!("{id} -> {}", thumbnail.object_url));
                }
            });
        }
        None => {
            ui.label("No model loaded.");
        }
    }

    if ui.checkbox(&mut viewer.show_grid, "Show grid").changed() {
        studio.settings.show_grid = viewer.show_grid;
        if let Err(err) = studio.settings.save(Path::new(SETTINGS_PATH)) {
            studio.status = format!("Could not save settings: {err}");
        }
    }
}

fn camera_section(ui: &mut egui::Ui, studio: &mut StudioState, viewer: &PreviewViewer) {
    let StudioState {
        store,
        panel,
        status,
        ..
    } = studio;

    egui::CollapsingHeader::new("Camera Setup")
        .default_open(true)
        .show(ui, |ui| {
            let mut auto_rotate = panel.auto_rotate();
            if ui.checkbox(&mut auto_rotate, "Auto-rotate").changed() {
                panel.on_auto_rotate_change(auto_rotate, store);
            }

            ui.label(egui::RichText::new("Initial Camera Position:").strong());
            orbit_editor(ui, panel, store, viewer, status);
            ui.horizontal(|ui| {
                if ui.button("Save current as initial").clicked() {
                    report(
                        status,
                        block_on(panel.on_save_camera_orbit(Some(viewer), store)),
                    );
                }
                if ui
                    .button("Reset")
                    .on_hover_text("Reset initial camera")
                    .clicked()
                {
                    panel.reset_initial_camera(store);
                }
            });

            ui.label(egui::RichText::new("Target Point:").strong());
            target_input(ui, panel, store, status);
        });
}

fn orbit_editor(
    ui: &mut egui::Ui,
    panel: &mut CameraSettings,
    store: &Store,
    viewer: &PreviewViewer,
    status: &mut String,
) {
    if !panel.orbit_editor.visible {
        return;
    }
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= committed_text(ui, "yaw", &mut panel.orbit_editor.yaw_input);
        changed |= committed_text(ui, "pitch", &mut panel.orbit_editor.pitch_input);
    });
    if changed {
        report(
            status,
            block_on(panel.on_camera_orbit_editor_change(Some(viewer), store)),
        );
    }
}

fn target_input(ui: &mut egui::Ui, panel: &mut CameraSettings, store: &Store, status: &mut String) {
    if panel.target_input.target.is_none() {
        ui.small(CameraTargetInput::WAITING_NOTE);
        return;
    }
    let mut changed = false;
    ui.horizontal(|ui| {
        let input = &mut panel.target_input;
        changed |= committed_text(ui, "X", &mut input.x_input);
        changed |= committed_text(ui, "Y", &mut input.y_input);
        changed |= committed_text(ui, "Z", &mut input.z_input);
    });
    if changed {
        report(status, panel.on_camera_target_change(store));
    }
}

fn limits_section(ui: &mut egui::Ui, studio: &mut StudioState, viewer: &PreviewViewer) {
    let StudioState {
        store,
        panel,
        status,
        ..
    } = studio;

    egui::CollapsingHeader::new("Customize Limits").show(ui, |ui| {
        for editor in &mut panel.limits {
            if limits_row(ui, editor, viewer) {
                report(status, editor.commit(store));
            }
        }
    });
}

fn limits_row(ui: &mut egui::Ui, editor: &mut LimitsEditor, viewer: &PreviewViewer) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        changed |= ui.checkbox(&mut editor.enabled, editor.kind.label()).changed();
        let unit = editor.kind.unit();
        changed |= committed_text(ui, &format!("min ({unit})"), &mut editor.min_input);
        changed |= committed_text(ui, &format!("max ({unit})"), &mut editor.max_input);
    });
    ui.horizontal(|ui| {
        if let Ok(camera) = block_on(get_camera_state(Some(viewer))) {
            if ui.small_button("Use current as min").clicked() {
                editor.set_min_from_camera(&camera);
                changed = true;
            }
            if ui.small_button("Use current as max").clicked() {
                editor.set_max_from_camera(&camera);
                changed = true;
            }
        }
    });
    changed
}

fn scene_section(ui: &mut egui::Ui, studio: &mut StudioState) {
    let StudioState {
        store,
        drafts,
        status,
        ..
    } = studio;
    let state = store.get_state();
    let config = &state.config;

    egui::CollapsingHeader::new("Scene").show(ui, |ui| {
        let mut controls = config.camera_controls.unwrap_or(true);
        if ui.checkbox(&mut controls, "Camera controls").changed() {
            store.dispatch(dispatch_camera_controls(controls));
        }
        if let Some(fov) = optional_number(
            ui,
            "Field of view (deg)",
            config.field_of_view_deg,
            30.0,
            1.0..=170.0,
        ) {
            store.dispatch(dispatch_field_of_view(fov));
        }
        if let Some(exposure) = optional_number(ui, "Exposure", config.exposure, 1.0, 0.0..=4.0) {
            store.dispatch(dispatch_exposure(exposure));
        }
        if let Some(intensity) = optional_number(
            ui,
            "Shadow intensity",
            config.shadow_intensity,
            1.0,
            0.0..=1.0,
        ) {
            store.dispatch(dispatch_shadow_intensity(intensity));
        }

        if committed_text(ui, "Environment", &mut drafts.environment_image) {
            store.dispatch(dispatch_environment_image(non_blank(
                &drafts.environment_image,
            )));
        }
        if committed_text(ui, "Poster", &mut drafts.poster) {
            store.dispatch(dispatch_poster(non_blank(&drafts.poster)));
        }

        ui.label("Extra attributes (JSON object):");
        let response = ui.add(
            egui::TextEdit::multiline(&mut drafts.extra_attributes)
                .code_editor()
                .desired_rows(3),
        );
        let edited = take_edited(ui, &response);
        if should_commit(response.lost_focus(), edited, false) {
            let parsed = serde_json::from_str::<serde_json::Value>(&drafts.extra_attributes)
                .map_err(EditorError::from)
                .and_then(ExtraAttributes::from_json);
            match parsed {
                Ok(attributes) => store.dispatch(dispatch_extra_attributes(attributes)),
                Err(err) => *status = format!("Extra attributes rejected: {err}"),
            }
        }
    });
}

fn presets_section(ui: &mut egui::Ui, studio: &mut StudioState) {
    ui.heading("Presets");
    let state = studio.store.get_state();
    let Some(model_url) = get_gltf_url(&state).map(str::to_string) else {
        ui.small("Load a model to save camera presets.");
        return;
    };

    ui.horizontal(|ui| {
        if ui.button("Save Preset").clicked() {
            match studio.presets.save_preset(&model_url, &state.config) {
                Ok(()) => {
                    studio.status = format!("Preset saved to {}", studio.presets.path.display())
                }
                Err(err) => studio.status = format!("Save failed: {err}"),
            }
        }

        if ui.button("Load Preset").clicked() {
            match studio.presets.reload() {
                Ok(()) => match studio.presets.library.get(&model_url).cloned() {
                    Some(config) => {
                        reset_config_drafts(&mut studio.drafts, &config);
                        studio.store.dispatch(dispatch_config(config));
                        studio.status = "Preset loaded".to_string();
                    }
                    None => studio.status = "No saved preset for this model".to_string(),
                },
                Err(err) => studio.status = format!("Load failed: {err}"),
            }
        }
    });
}

fn export_section(ui: &mut egui::Ui, studio: &mut StudioState) {
    ui.heading("Export");
    let state = studio.store.get_state();

    let mut practices = *state.best_practices;
    ui.horizontal(|ui| {
        if ui.checkbox(&mut practices.progress_bar, "Progress bar").changed() {
            studio.store.dispatch(dispatch_progress_bar(practices.progress_bar));
        }
        if ui.checkbox(&mut practices.ar_button, "AR button").changed() {
            studio.store.dispatch(dispatch_ar_button(practices.ar_button));
        }
        if ui.checkbox(&mut practices.ar_prompt, "AR prompt").changed() {
            studio.store.dispatch(dispatch_ar_prompt(practices.ar_prompt));
        }
    });

    if committed_text(ui, "Model file", &mut studio.drafts.model_name) {
        let mut paths = (*state.relative_file_paths).clone();
        paths.model_name = non_blank(&studio.drafts.model_name);
        studio.store.dispatch(dispatch_relative_file_paths(paths));
    }

    let snippet = export_snippet(&studio.store.get_state(), false);
    ui.horizontal(|ui| {
        if ui.button("Copy snippet").clicked() {
            ui.ctx().copy_text(snippet.clone());
            studio.status = "Snippet copied".to_string();
        }
    });
    egui::ScrollArea::vertical()
        .id_salt("snippet")
        .max_height(220.0)
        .show(ui, |ui| {
            ui.code(snippet);
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::still_typing(false, true, false, false)]
    #[case::tabbed_through(true, false, false, false)]
    #[case::left_after_typing(true, true, false, true)]
    #[case::enter_without_typing(true, false, true, true)]
    #[case::enter_after_typing(true, true, true, true)]
    fn fields_commit_only_after_edits_or_enter(
        #[case] lost_focus: bool,
        #[case] edited: bool,
        #[case] enter_pressed: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(should_commit(lost_focus, edited, enter_pressed), expected);
    }

    #[test]
    fn blank_text_clears_the_value() {
        assert_eq!(non_blank("  "), None);
        assert_eq!(non_blank(" hall.hdr "), Some("hall.hdr".to_string()));
    }
}
