use crate::config::{SphericalPositionDeg, Vector3D};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::rc::Rc;

pub const THUMBNAIL_SIZE: u32 = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub object_url: String,
    pub image: Rc<RgbaImage>,
    /// Uri of the image the thumbnail was made from, if it had one.
    pub source_uri: Option<String>,
}

pub type ThumbnailsById = BTreeMap<String, Thumbnail>;

/// Data derived from the loaded model. The whole slice is `None` until a model
/// url has been set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelState {
    pub gltf_url: Option<String>,
    pub thumbnails_by_id: Rc<ThumbnailsById>,
    pub original_gltf: Option<Rc<serde_json::Value>>,
    pub original_gltf_json: Option<String>,
    pub is_dirty: bool,
}

/// Payload of `SET_MODEL`. Thumbnails hold decoded pixels and are left out of
/// the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPayload {
    #[serde(skip)]
    pub thumbnails_by_id: Rc<ThumbnailsById>,
    pub original_gltf: Option<serde_json::Value>,
    pub original_gltf_json: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDirtyPayload {
    pub is_dirty: bool,
}

/// Snapshot of the live viewer camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub orbit: SphericalPositionDeg,
    pub target: Vector3D,
    pub field_of_view_deg: f64,
}
