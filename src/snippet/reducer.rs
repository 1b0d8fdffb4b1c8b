use crate::config::ModelViewerConfig;
use crate::error::{EditorError, Result};
use crate::store::{Action, State};
use crate::utils::is_object_url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub const UPLOAD_MODEL_PLACEHOLDER: &str = "Upload model...";

/// Attributes the snippet derives from the config. Extra attributes may not
/// reuse them.
pub const CONFIG_ATTRIBUTE_NAMES: [&str; 15] = [
    "src",
    "alt",
    "poster",
    "environment-image",
    "exposure",
    "shadow-intensity",
    "camera-controls",
    "auto-rotate",
    "camera-orbit",
    "camera-target",
    "field-of-view",
    "min-camera-orbit",
    "max-camera-orbit",
    "min-field-of-view",
    "max-field-of-view",
];

/// A value an extra `<model-viewer>` attribute may carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// Attributes the user typed into the snippet that the editor does not model
/// itself. Names and values are checked on the way in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, AttributeValue>",
    into = "BTreeMap<String, AttributeValue>"
)]
pub struct ExtraAttributes(BTreeMap<String, AttributeValue>);

impl ExtraAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: AttributeValue) -> Result<()> {
        validate_attribute(name, &value)?;
        self.0.insert(name.to_string(), value);
        Ok(())
    }

    pub fn with(mut self, name: &str, value: AttributeValue) -> Result<Self> {
        self.insert(name, value)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Accepts a JSON object of attribute name to string, number or bool.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(map) = value else {
            return Err(EditorError::InvalidAttribute {
                name: String::new(),
                reason: "extra attributes must be a JSON object".to_string(),
            });
        };

        let mut attributes = Self::new();
        for (name, raw) in map {
            let value = match raw {
                serde_json::Value::Bool(flag) => AttributeValue::Bool(flag),
                serde_json::Value::Number(number) => {
                    AttributeValue::Number(number.as_f64().unwrap_or(f64::NAN))
                }
                serde_json::Value::String(text) => AttributeValue::Text(text),
                other => {
                    return Err(EditorError::InvalidAttribute {
                        name,
                        reason: format!("unsupported value {other}"),
                    });
                }
            };
            attributes.insert(&name, value)?;
        }
        Ok(attributes)
    }
}

impl TryFrom<BTreeMap<String, AttributeValue>> for ExtraAttributes {
    type Error = EditorError;

    fn try_from(map: BTreeMap<String, AttributeValue>) -> Result<Self> {
        let mut attributes = Self::new();
        for (name, value) in map {
            attributes.insert(&name, value)?;
        }
        Ok(attributes)
    }
}

impl From<ExtraAttributes> for BTreeMap<String, AttributeValue> {
    fn from(attributes: ExtraAttributes) -> Self {
        attributes.0
    }
}

fn validate_attribute(name: &str, value: &AttributeValue) -> Result<()> {
    let invalid = |reason: &str| EditorError::InvalidAttribute {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() => {}
        _ => return Err(invalid("name must start with a lowercase letter")),
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(invalid("name may only contain a-z, 0-9 and '-'"));
    }
    if CONFIG_ATTRIBUTE_NAMES.contains(&name) {
        return Err(invalid("set from the editor's own settings"));
    }
    if let AttributeValue::Number(number) = value {
        if !number.is_finite() {
            return Err(invalid("number must be finite"));
        }
    }
    Ok(())
}

/// File names the exported snippet should reference instead of the editor's
/// local urls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelativeFilePaths {
    pub model_name: Option<String>,
    pub environment_name: Option<String>,
    pub poster_name: Option<String>,
}

impl Default for RelativeFilePaths {
    fn default() -> Self {
        Self {
            model_name: Some("model.glb".to_string()),
            environment_name: None,
            poster_name: Some("poster.webp".to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelViewerSnippetState {
    pub extra_attributes: Rc<ExtraAttributes>,
}

pub fn get_model_viewer_snippet(state: &State) -> &Rc<ModelViewerSnippetState> {
    &state.entities.model_viewer_snippet
}

pub fn get_extra_attributes(state: &State) -> &Rc<ExtraAttributes> {
    &state.entities.model_viewer_snippet.extra_attributes
}

pub fn get_relative_file_paths(state: &State) -> &Rc<RelativeFilePaths> {
    &state.relative_file_paths
}

/// Rewrites the file references of a copy of the config for display and
/// export. The live viewer keeps using the original urls.
pub fn apply_relative_file_paths(
    edited_config: &mut ModelViewerConfig,
    gltf_url: Option<&str>,
    relative_file_paths: &RelativeFilePaths,
    is_edit_snippet: bool,
) {
    edited_config.src = if gltf_url.is_some_and(|url| !url.is_empty()) {
        relative_file_paths.model_name.clone()
    } else {
        Some(UPLOAD_MODEL_PLACEHOLDER.to_string())
    };

    if edited_config.environment_image.is_some() {
        edited_config.environment_image = relative_file_paths.environment_name.clone();
    }

    if is_edit_snippet {
        edited_config.poster = None;
    } else if edited_config
        .poster
        .as_deref()
        .is_some_and(is_object_url)
    {
        edited_config.poster = relative_file_paths.poster_name.clone();
    }
}

pub fn dispatch_extra_attributes(attributes: ExtraAttributes) -> Action {
    Action::SetExtraAttributes(attributes)
}

pub fn dispatch_relative_file_paths(paths: RelativeFilePaths) -> Action {
    Action::SetRelativeFilePaths(paths)
}

pub fn extra_attributes_reducer(
    state: &Rc<ExtraAttributes>,
    action: &Action,
) -> Rc<ExtraAttributes> {
    match action {
        Action::SetExtraAttributes(attributes) => Rc::new(attributes.clone()),
        _ => Rc::clone(state),
    }
}

pub fn model_viewer_snippet_reducer(
    state: &Rc<ModelViewerSnippetState>,
    action: &Action,
) -> Rc<ModelViewerSnippetState> {
    let extra_attributes = extra_attributes_reducer(&state.extra_attributes, action);
    if Rc::ptr_eq(&extra_attributes, &state.extra_attributes) {
        return Rc::clone(state);
    }
    Rc::new(ModelViewerSnippetState {
        extra_attributes,
    })
}

pub fn relative_file_paths_reducer(
    state: &Rc<RelativeFilePaths>,
    action: &Action,
) -> Rc<RelativeFilePaths> {
    match action {
        Action::SetRelativeFilePaths(paths) => Rc::new(paths.clone()),
        _ => Rc::clone(state),
    }
}
