use crate::error::{EditorError, Result};
use crate::viewer::{Material, PbrMetallicRoughness, Texture, TextureInfo, TextureSource};
use gltf::image::{Data as ImageData, Format, Source};
use image::imageops::FilterType;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use std::sync::Arc;
use tracing::info;

/// A decoded image of a loaded glTF together with where it came from.
#[derive(Debug, Clone)]
pub struct GltfTexture {
    pub uri: Option<String>,
    pub buffer_view: Option<usize>,
    pub image: Arc<ImageData>,
}

impl GltfTexture {
    fn describe(&self) -> String {
        match (&self.uri, self.buffer_view) {
            (Some(uri), _) => uri.clone(),
            (None, Some(view)) => format!("buffer view {view}"),
            (None, None) => "embedded image".to_string(),
        }
    }

    fn to_rgba(&self) -> Result<RgbaImage> {
        let ImageData {
            pixels,
            format,
            width,
            height,
        } = self.image.as_ref();
        let (width, height) = (*width, *height);
        let pixels = pixels.clone();

        let dynamic = match format {
            Format::R8G8B8A8 => RgbaImage::from_raw(width, height, pixels).map(DynamicImage::from),
            Format::R8G8B8 => RgbImage::from_raw(width, height, pixels).map(DynamicImage::from),
            Format::R8G8 => GrayAlphaImage::from_raw(width, height, pixels).map(DynamicImage::from),
            Format::R8 => GrayImage::from_raw(width, height, pixels).map(DynamicImage::from),
            other => {
                return Err(EditorError::Thumbnail {
                    id: self.describe(),
                    reason: format!("unsupported pixel format {other:?}"),
                });
            }
        };

        dynamic
            .map(|image| image.to_rgba8())
            .ok_or_else(|| EditorError::Thumbnail {
                id: self.describe(),
                reason: "pixel buffer does not match image size".to_string(),
            })
    }
}

impl TextureSource for GltfTexture {
    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    fn buffer_view(&self) -> Option<usize> {
        self.buffer_view
    }

    async fn create_thumbnail(&self, width: u32, height: u32) -> Result<RgbaImage> {
        let rgba = self.to_rgba()?;
        Ok(image::imageops::resize(
            &rgba,
            width,
            height,
            FilterType::Triangle,
        ))
    }
}

/// A binary glTF parsed with all buffers and images resolved in memory.
#[derive(Debug, Clone)]
pub struct GltfModel {
    document: gltf::Document,
    textures: Vec<GltfTexture>,
}

impl GltfModel {
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let (document, _buffers, images) = gltf::import_slice(bytes)?;

        let textures = document
            .images()
            .zip(images)
            .map(|(image, data)| {
                let (uri, buffer_view) = match image.source() {
                    Source::Uri { uri, .. } => (Some(uri.to_string()), None),
                    Source::View { view, .. } => (None, Some(view.index())),
                };
                GltfTexture {
                    uri,
                    buffer_view,
                    image: Arc::new(data),
                }
            })
            .collect::<Vec<_>>();

        info!(
            "parsed glTF with {} materials and {} images",
            document.materials().len(),
            textures.len()
        );
        Ok(Self { document, textures })
    }

    pub fn original_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self.document.as_json())?)
    }

    pub fn textures(&self) -> &[GltfTexture] {
        &self.textures
    }

    fn texture_info(&self, texture: Option<gltf::Texture<'_>>) -> TextureInfo<GltfTexture> {
        let Some(texture) = texture else {
            return TextureInfo::empty();
        };
        match self.textures.get(texture.source().index()) {
            Some(source) => TextureInfo {
                texture: Some(Texture {
                    name: texture.name().map(str::to_string),
                    source: source.clone(),
                }),
            },
            None => TextureInfo::empty(),
        }
    }

    pub fn materials(&self) -> Vec<Material<GltfTexture>> {
        self.document
            .materials()
            .map(|material| {
                let pbr = material.pbr_metallic_roughness();
                Material {
                    name: material.name().map(str::to_string),
                    pbr_metallic_roughness: PbrMetallicRoughness {
                        base_color_texture: self
                            .texture_info(pbr.base_color_texture().map(|info| info.texture())),
                        metallic_roughness_texture: self.texture_info(
                            pbr.metallic_roughness_texture().map(|info| info.texture()),
                        ),
                    },
                    normal_texture: self
                        .texture_info(material.normal_texture().map(|info| info.texture())),
                    emissive_texture: self
                        .texture_info(material.emissive_texture().map(|info| info.texture())),
                    occlusion_texture: self
                        .texture_info(material.occlusion_texture().map(|info| info.texture())),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::tasks::block_on;

    fn texture(format: Format, width: u32, height: u32, pixels: Vec<u8>) -> GltfTexture {
        GltfTexture {
            uri: Some("albedo.png".to_string()),
            buffer_view: None,
            image: Arc::new(ImageData {
                pixels,
                format,
                width,
                height,
            }),
        }
    }

    #[test]
    fn thumbnail_is_resized_to_requested_size() {
        let source = texture(Format::R8G8B8A8, 4, 2, vec![255; 4 * 2 * 4]);
        let thumb = block_on(source.create_thumbnail(256, 256)).unwrap();
        assert_eq!(thumb.dimensions(), (256, 256));
        assert_eq!(thumb.get_pixel(10, 10).0, [255, 255, 255, 255]);
    }

    #[test]
    fn rgb_images_gain_an_opaque_alpha() {
        let source = texture(Format::R8G8B8, 1, 1, vec![10, 20, 30]);
        let thumb = block_on(source.create_thumbnail(2, 2)).unwrap();
        assert_eq!(thumb.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn short_pixel_buffers_are_reported() {
        let source = texture(Format::R8G8B8A8, 4, 4, vec![0; 3]);
        let err = block_on(source.create_thumbnail(8, 8)).unwrap_err();
        assert!(matches!(err, EditorError::Thumbnail { id, .. } if id == "albedo.png"));
    }

    #[test]
    fn garbage_is_not_a_gltf() {
        assert!(matches!(
            GltfModel::from_slice(b"definitely not binary gltf"),
            Err(EditorError::Gltf(_))
        ));
    }
}
