pub mod bridge;
pub mod reducer;
pub mod types;

pub use bridge::{
    ThumbnailCache, create_thumbnails, dispatch_model, get_camera_state, get_texture_id,
    push_thumbnail,
};
pub use reducer::*;
pub use types::{
    CameraState, ModelDirtyPayload, ModelPayload, ModelState, THUMBNAIL_SIZE, Thumbnail,
    ThumbnailsById,
};
