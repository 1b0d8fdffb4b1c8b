use crate::best_practices::{BestPracticesState, common_child_elements};
use crate::config::{Limits, ModelViewerConfig};
use crate::model::get_gltf_url;
use crate::snippet::reducer::{
    AttributeValue, ExtraAttributes, apply_relative_file_paths, get_extra_attributes,
    get_relative_file_paths,
};
use crate::store::State;
use tracing::info;

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `min-camera-orbit`/`max-camera-orbit` value, or `None` when no component
/// is limited.
fn orbit_bound(
    yaw: Option<Limits>,
    pitch: Option<Limits>,
    radius: Option<Limits>,
    pick: fn(&Limits) -> f64,
) -> Option<String> {
    let active = |limits: Option<Limits>| limits.filter(|limits| limits.enabled);
    let (yaw, pitch, radius) = (active(yaw), active(pitch), active(radius));
    if yaw.is_none() && pitch.is_none() && radius.is_none() {
        return None;
    }

    let component = |limits: Option<Limits>, unit: &str| match limits {
        Some(limits) => format!("{}{unit}", pick(&limits)),
        None => "auto".to_string(),
    };
    Some(format!(
        "{} {} {}",
        component(yaw, "deg"),
        component(pitch, "deg"),
        component(radius, "m")
    ))
}

fn config_attributes(config: &ModelViewerConfig) -> Vec<(&'static str, Option<String>)> {
    let mut attributes = Vec::new();
    let mut text = |name: &'static str, value: &Option<String>| {
        if let Some(value) = value {
            attributes.push((name, Some(value.clone())));
        }
    };
    text("src", &config.src);
    text("alt", &config.alt);
    text("poster", &config.poster);
    text("environment-image", &config.environment_image);

    if let Some(exposure) = config.exposure {
        attributes.push(("exposure", Some(exposure.to_string())));
    }
    if let Some(intensity) = config.shadow_intensity {
        attributes.push(("shadow-intensity", Some(intensity.to_string())));
    }
    if config.camera_controls == Some(true) {
        attributes.push(("camera-controls", None));
    }
    if config.auto_rotate == Some(true) {
        attributes.push(("auto-rotate", None));
    }
    if let Some(orbit) = config.camera_orbit {
        attributes.push((
            "camera-orbit",
            Some(format!(
                "{}deg {}deg {}m",
                orbit.theta_deg, orbit.phi_deg, orbit.radius
            )),
        ));
    }
    if let Some(target) = config.camera_target {
        attributes.push((
            "camera-target",
            Some(format!("{}m {}m {}m", target.x, target.y, target.z)),
        ));
    }
    if let Some(fov) = config.field_of_view_deg {
        attributes.push(("field-of-view", Some(format!("{fov}deg"))));
    }

    let (yaw, pitch, radius) = (config.yaw_limits, config.pitch_limits, config.radius_limits);
    if let Some(min) = orbit_bound(yaw, pitch, radius, |limits| limits.min) {
        attributes.push(("min-camera-orbit", Some(min)));
    }
    if let Some(max) = orbit_bound(yaw, pitch, radius, |limits| limits.max) {
        attributes.push(("max-camera-orbit", Some(max)));
    }
    if let Some(fov) = config.fov_limits.filter(|limits| limits.enabled) {
        attributes.push(("min-field-of-view", Some(format!("{}deg", fov.min))));
        attributes.push(("max-field-of-view", Some(format!("{}deg", fov.max))));
    }
    attributes
}

/// Renders the `<model-viewer>` element for `config`. Extra attributes come
/// after the ones derived from the config; `false` flags are left out.
pub fn render_snippet(
    config: &ModelViewerConfig,
    extra_attributes: &ExtraAttributes,
    best_practices: &BestPracticesState,
    is_editor: bool,
) -> String {
    let config_parts = config_attributes(config)
        .into_iter()
        .map(|(name, value)| match value {
            Some(value) => format!("{name}=\"{}\"", escape_attribute(&value)),
            None => name.to_string(),
        });
    let extra_parts = extra_attributes
        .iter()
        .filter_map(|(name, value)| match value {
            AttributeValue::Bool(true) => Some(name.to_string()),
            AttributeValue::Bool(false) => None,
            other => Some(format!("{name}=\"{}\"", escape_attribute(&other.to_string()))),
        });

    let mut html = std::iter::once("<model-viewer".to_string())
        .chain(config_parts)
        .chain(extra_parts)
        .collect::<Vec<_>>()
        .join(" ");
    html.push('>');

    for child in common_child_elements(best_practices, is_editor) {
        html.push_str("\n  ");
        html.push_str(child.to_html());
    }
    html.push_str("\n</model-viewer>");
    html
}

/// The snippet for the current state with local urls swapped for the
/// relative file names. The edit snippet is the one shown inside the editor.
pub fn export_snippet(state: &State, is_edit_snippet: bool) -> String {
    let mut config = ModelViewerConfig::clone(&state.config);
    apply_relative_file_paths(
        &mut config,
        get_gltf_url(state),
        get_relative_file_paths(state),
        is_edit_snippet,
    );

    let snippet = render_snippet(
        &config,
        get_extra_attributes(state),
        &state.best_practices,
        is_edit_snippet,
    );
    if !is_edit_snippet {
        info!("exported snippet for {:?}", config.src);
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SphericalPositionDeg, Vector3D};
    use crate::model::ModelState;
    use crate::store::Entities;
    use crate::snippet::{ModelViewerSnippetState, UPLOAD_MODEL_PLACEHOLDER};
    use std::rc::Rc;

    fn loaded_state() -> State {
        let config = ModelViewerConfig {
            src: Some("blob:1234".to_string()),
            camera_controls: Some(true),
            camera_orbit: Some(SphericalPositionDeg {
                theta_deg: 90.0,
                phi_deg: 45.0,
                radius: 2.0,
            }),
            camera_target: Some(Vector3D::new(0.0, 1.5, 0.0)),
            field_of_view_deg: Some(30.0),
            yaw_limits: Some(Limits::new(true, -90.0, 90.0).unwrap()),
            pitch_limits: Some(Limits::new(false, 10.0, 80.0).unwrap()),
            ..Default::default()
        };
        let extra_attributes = ExtraAttributes::new()
            .with("ar", AttributeValue::Bool(true))
            .unwrap()
            .with("loading", AttributeValue::Text("eager".into()))
            .unwrap()
            .with("reveal", AttributeValue::Bool(false))
            .unwrap();

        State {
            entities: Rc::new(Entities {
                model: Some(Rc::new(ModelState {
                    gltf_url: Some("blob:1234".to_string()),
                    ..Default::default()
                })),
                model_viewer_snippet: Rc::new(ModelViewerSnippetState {
                    extra_attributes: Rc::new(extra_attributes),
                }),
            }),
            config: Rc::new(config),
            ..Default::default()
        }
    }

    #[test]
    fn exported_snippet() {
        insta::assert_snapshot!(export_snippet(&loaded_state(), false), @r#"
        <model-viewer src="model.glb" camera-controls camera-orbit="90deg 45deg 2m" camera-target="0m 1.5m 0m" field-of-view="30deg" min-camera-orbit="-90deg auto auto" max-camera-orbit="90deg auto auto" ar loading="eager">
          <div class="progress-bar" slot="progress-bar"><div class="update-bar"></div></div>
          <button slot="ar-button" id="ar-button">View in your space</button>
          <div id="ar-prompt"><img src="https://modelviewer.dev/shared-assets/icons/hand.png"></div>
        </model-viewer>
        "#);
    }

    #[test]
    fn edit_snippet_hides_ar_children() {
        let snippet = export_snippet(&loaded_state(), true);
        assert!(snippet.contains(r#"<div class="progress-bar hide""#));
        assert!(!snippet.contains("ar-button"));
        assert!(!snippet.contains("ar-prompt"));
    }

    #[test]
    fn empty_state_points_at_upload_placeholder() {
        let snippet = export_snippet(&State::default(), false);
        assert!(snippet.starts_with(&format!(
            "<model-viewer src=\"{UPLOAD_MODEL_PLACEHOLDER}\">"
        )));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let config = ModelViewerConfig {
            alt: Some(r#"a "quoted" <model> & more"#.to_string()),
            ..Default::default()
        };
        let none = BestPracticesState {
            progress_bar: false,
            ar_button: false,
            ar_prompt: false,
        };
        let snippet = render_snippet(&config, &ExtraAttributes::new(), &none, false);
        assert_eq!(
            snippet,
            "<model-viewer alt=\"a &quot;quoted&quot; &lt;model&gt; &amp; more\">\n</model-viewer>"
        );
    }

    #[test]
    fn each_attribute_is_written_once() {
        let snippet = export_snippet(&loaded_state(), false);
        let tag = snippet.lines().next().unwrap();
        for name in ["src", "camera-orbit", "camera-controls", "ar", "loading"] {
            let count = tag
                .split(' ')
                .filter(|part| part.split('=').next() == Some(name))
                .count();
            assert_eq!(count, 1, "{name} in {tag}");
        }
    }

    #[test]
    fn fov_limits_render_only_when_enabled() {
        let mut config = ModelViewerConfig {
            fov_limits: Some(Limits::new(false, 10.0, 45.0).unwrap()),
            ..Default::default()
        };
        let practices = BestPracticesState::default();
        let off = render_snippet(&config, &ExtraAttributes::new(), &practices, true);
        assert!(!off.contains("field-of-view"));

        config.fov_limits = config.fov_limits.map(|limits| limits.with_enabled(true));
        let on = render_snippet(&config, &ExtraAttributes::new(), &practices, true);
        assert!(on.contains(r#"min-field-of-view="10deg" max-field-of-view="45deg""#));
    }
}
