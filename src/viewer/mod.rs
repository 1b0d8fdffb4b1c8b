//! The contract with the embedded 3D viewer. The editor only reads from it
//! through these traits; the viewer itself lives elsewhere (see `editor` for
//! the bevy preview that implements it).

pub mod fetch;
pub mod gltf_model;

use crate::config::Vector3D;
use crate::error::Result;
use image::RgbaImage;
use std::future::Future;

pub use fetch::{FetchResponse, FileFetcher, HttpFetcher, ResourceFetcher, download_contents};
pub use gltf_model::{GltfModel, GltfTexture};

/// Camera orbit as the viewer reports it, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalPosition {
    pub theta: f64,
    pub phi: f64,
    pub radius: f64,
}

/// The image behind a texture slot.
pub trait TextureSource {
    fn uri(&self) -> Option<&str>;

    fn buffer_view(&self) -> Option<usize>;

    fn create_thumbnail(&self, width: u32, height: u32) -> impl Future<Output = Result<RgbaImage>>;
}

#[derive(Debug, Clone)]
pub struct Texture<S> {
    pub name: Option<String>,
    pub source: S,
}

/// A material's texture slot, which may be empty.
#[derive(Debug, Clone)]
pub struct TextureInfo<S> {
    pub texture: Option<Texture<S>>,
}

impl<S> TextureInfo<S> {
    pub fn empty() -> Self {
        Self { texture: None }
    }

    pub fn with_source(source: S) -> Self {
        Self {
            texture: Some(Texture { name: None, source }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PbrMetallicRoughness<S> {
    pub base_color_texture: TextureInfo<S>,
    pub metallic_roughness_texture: TextureInfo<S>,
}

#[derive(Debug, Clone)]
pub struct Material<S> {
    pub name: Option<String>,
    pub pbr_metallic_roughness: PbrMetallicRoughness<S>,
    pub normal_texture: TextureInfo<S>,
    pub emissive_texture: TextureInfo<S>,
    pub occlusion_texture: TextureInfo<S>,
}

impl<S> Material<S> {
    /// Texture slots in the order thumbnails are generated.
    pub fn texture_slots(&self) -> [&TextureInfo<S>; 5] {
        [
            &self.normal_texture,
            &self.emissive_texture,
            &self.occlusion_texture,
            &self.pbr_metallic_roughness.base_color_texture,
            &self.pbr_metallic_roughness.metallic_roughness_texture,
        ]
    }
}

pub trait ModelViewer {
    type Source: TextureSource;

    /// Resolves once pending property changes have been rendered.
    fn update_complete(&self) -> impl Future<Output = ()>;

    fn camera_orbit(&self) -> SphericalPosition;

    fn camera_target(&self) -> Vector3D;

    /// Vertical field of view in degrees.
    fn field_of_view(&self) -> f64;

    fn materials(&self) -> Vec<Material<Self::Source>>;

    fn original_gltf_json(&self) -> Option<serde_json::Value>;
}
