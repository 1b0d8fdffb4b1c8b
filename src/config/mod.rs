pub mod reducer;
pub mod types;

pub use reducer::*;
pub use types::{
    DEFAULT_FOV_LIMITS, DEFAULT_PITCH_LIMITS, DEFAULT_RADIUS_LIMITS, DEFAULT_YAW_LIMITS, Limits,
    ModelViewerConfig, SphericalPositionDeg, Vector3D,
};
