use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("value {value} is not a finite number")]
    Validation { value: f64 },

    #[error("radius {radius} must be greater than zero")]
    NonPositiveRadius { radius: f64 },

    #[error("limits are inverted: min {min} is greater than max {max}")]
    InvertedLimits { min: f64, max: f64 },

    #[error("no model viewer is mounted")]
    NotMounted,

    #[error("failed to fetch url {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("invalid extra attribute `{name}`: {reason}")]
    InvalidAttribute { name: String, reason: String },

    #[error("failed to create thumbnail for texture {id}: {reason}")]
    Thumbnail { id: String, reason: String },

    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse {}: {message}", path.display())]
    Ron { path: PathBuf, message: String },

    #[error("saved preset for {model_url} is invalid: {source}")]
    InvalidPreset {
        model_url: String,
        source: Box<EditorError>,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EditorError {
    pub fn fetch(url: &str, reason: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
