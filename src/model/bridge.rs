//! Reads camera and material data out of a live viewer and turns it into
//! store actions.

use crate::config::SphericalPositionDeg;
use crate::error::{EditorError, Result};
use crate::model::types::{CameraState, ModelPayload, Thumbnail, ThumbnailsById};
use crate::store::Action;
use crate::utils::{create_object_url, rad_to_deg};
use crate::viewer::{ModelViewer, TextureInfo, TextureSource};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::{debug, info, warn};

pub async fn get_camera_state<V: ModelViewer>(viewer: Option<&V>) -> Result<CameraState> {
    let viewer = viewer.ok_or(EditorError::NotMounted)?;
    viewer.update_complete().await;

    let orbit = viewer.camera_orbit();
    Ok(CameraState {
        orbit: SphericalPositionDeg {
            theta_deg: rad_to_deg(orbit.theta),
            phi_deg: rad_to_deg(orbit.phi),
            radius: orbit.radius,
        },
        target: viewer.camera_target(),
        field_of_view_deg: viewer.field_of_view(),
    })
}

/// Content uri of the image, or its buffer-view index for embedded images.
pub fn get_texture_id(source: &impl TextureSource) -> Option<String> {
    source
        .uri()
        .map(str::to_string)
        .or_else(|| source.buffer_view().map(|view| view.to_string()))
}

#[derive(Debug)]
enum Slot {
    Pending,
    Ready(Thumbnail),
}

/// Thumbnails generated so far, keyed by texture id. An id is reserved before
/// its thumbnail is generated, so each id is generated at most once even when
/// several requests for it are in flight.
#[derive(Debug, Default)]
pub struct ThumbnailCache {
    slots: RefCell<BTreeMap<String, Slot>>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.slots.borrow().contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<Thumbnail> {
        match self.slots.borrow().get(id) {
            Some(Slot::Ready(thumbnail)) => Some(thumbnail.clone()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Finished thumbnails. Reservations still pending are left out.
    pub fn into_thumbnails(self) -> ThumbnailsById {
        self.slots
            .into_inner()
            .into_iter()
            .filter_map(|(id, slot)| match slot {
                Slot::Ready(thumbnail) => Some((id, thumbnail)),
                Slot::Pending => None,
            })
            .collect()
    }

    fn reserve(&self, id: &str) -> bool {
        let mut slots = self.slots.borrow_mut();
        if slots.contains_key(id) {
            return false;
        }
        slots.insert(id.to_string(), Slot::Pending);
        true
    }
}

pub async fn push_thumbnail<S: TextureSource>(
    cache: &ThumbnailCache,
    texture_info: &TextureInfo<S>,
    size: u32,
) -> Result<Option<String>> {
    let Some(texture) = &texture_info.texture else {
        return Ok(None);
    };
    let Some(id) = get_texture_id(&texture.source) else {
        warn!("texture {:?} has neither uri nor buffer view", texture.name);
        return Ok(None);
    };

    if !cache.reserve(&id) {
        return Ok(Some(id));
    }

    match texture.source.create_thumbnail(size, size).await {
        Ok(image) => {
            let thumbnail = Thumbnail {
                object_url: create_object_url(),
                image: Rc::new(image),
                source_uri: texture.source.uri().map(str::to_string),
            };
            debug!("thumbnail {} -> {}", id, thumbnail.object_url);
            cache.slots.borrow_mut().insert(id.clone(), Slot::Ready(thumbnail));
            Ok(Some(id))
        }
        Err(err) => {
            cache.slots.borrow_mut().remove(&id);
            Err(err)
        }
    }
}

/// Thumbnails for every texture slot of every material. Textures that fail
/// to decode are skipped.
pub async fn create_thumbnails<V: ModelViewer>(viewer: &V, size: u32) -> ThumbnailsById {
    let cache = ThumbnailCache::new();
    for material in viewer.materials() {
        for slot in material.texture_slots() {
            if let Err(err) = push_thumbnail(&cache, slot, size).await {
                warn!("skipping texture of material {:?}: {err}", material.name);
            }
        }
    }
    cache.into_thumbnails()
}

pub async fn dispatch_model<V: ModelViewer>(viewer: &V, size: u32) -> Result<Action> {
    viewer.update_complete().await;

    let thumbnails_by_id = create_thumbnails(viewer, size).await;
    let original_gltf = viewer.original_gltf_json();
    let original_gltf_json = original_gltf
        .as_ref()
        .map(serde_json::to_string_pretty)
        .transpose()?;

    info!("model ready with {} thumbnails", thumbnails_by_id.len());
    Ok(Action::SetModel(ModelPayload {
        thumbnails_by_id: Rc::new(thumbnails_by_id),
        original_gltf,
        original_gltf_json,
    }))
}
