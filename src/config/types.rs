// These mirror the viewer's own camera shapes but stay read-only values here:
// the viewer owns its live camera, the store owns the saved one.

use crate::error::{EditorError, Result};
use crate::utils::check_finite;
use serde::{Deserialize, Serialize};

/// Spherical coordinate in the viewer's theta/phi convention, in degrees.
/// The radius is always positive once deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OrbitFields")]
pub struct SphericalPositionDeg {
    pub theta_deg: f64,
    pub phi_deg: f64,
    pub radius: f64,
}

#[derive(Deserialize)]
struct OrbitFields {
    theta_deg: f64,
    phi_deg: f64,
    radius: f64,
}

impl TryFrom<OrbitFields> for SphericalPositionDeg {
    type Error = EditorError;

    fn try_from(fields: OrbitFields) -> Result<Self> {
        Self::checked(fields.theta_deg, fields.phi_deg, fields.radius)
    }
}

impl SphericalPositionDeg {
    pub fn checked(theta_deg: f64, phi_deg: f64, radius: f64) -> Result<Self> {
        Ok(Self {
            theta_deg: check_finite(theta_deg)?,
            phi_deg: check_finite(phi_deg)?,
            radius: check_radius(radius)?,
        })
    }
}

fn check_radius(radius: f64) -> Result<f64> {
    let radius = check_finite(radius)?;
    if radius <= 0.0 {
        return Err(EditorError::NonPositiveRadius { radius });
    }
    Ok(radius)
}

/// A 3D Cartesian coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "VectorFields")]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn checked(x: f64, y: f64, z: f64) -> Result<Self> {
        Ok(Self {
            x: check_finite(x)?,
            y: check_finite(y)?,
            z: check_finite(z)?,
        })
    }
}

#[derive(Deserialize)]
struct VectorFields {
    x: f64,
    y: f64,
    z: f64,
}

impl TryFrom<VectorFields> for Vector3D {
    type Error = EditorError;

    fn try_from(fields: VectorFields) -> Result<Self> {
        Self::checked(fields.x, fields.y, fields.z)
    }
}

/// Min/max limits. `enabled` lets the user switch a limit off without losing
/// the values. Single-sided limits are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LimitsFields")]
pub struct Limits {
    pub enabled: bool,
    pub min: f64,
    pub max: f64,
}

#[derive(Deserialize)]
struct LimitsFields {
    enabled: bool,
    min: f64,
    max: f64,
}

impl TryFrom<LimitsFields> for Limits {
    type Error = EditorError;

    fn try_from(fields: LimitsFields) -> Result<Self> {
        Self::new(fields.enabled, fields.min, fields.max)
    }
}

impl Limits {
    pub fn new(enabled: bool, min: f64, max: f64) -> Result<Self> {
        let min = check_finite(min)?;
        let max = check_finite(max)?;
        if min > max {
            return Err(EditorError::InvertedLimits { min, max });
        }
        Ok(Self { enabled, min, max })
    }

    pub fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }

    /// Zoom limits additionally need a positive lower bound.
    pub fn checked_radius(self) -> Result<Self> {
        check_radius(self.min)?;
        Ok(self)
    }

    /// Clamps `value` when the limit is active, otherwise returns it untouched.
    pub fn apply(&self, value: f64) -> f64 {
        if self.enabled {
            value.clamp(self.min, self.max)
        } else {
            value
        }
    }
}

pub const DEFAULT_YAW_LIMITS: Limits = Limits {
    enabled: false,
    min: -180.0,
    max: 180.0,
};

pub const DEFAULT_PITCH_LIMITS: Limits = Limits {
    enabled: false,
    min: 22.5,
    max: 157.5,
};

pub const DEFAULT_RADIUS_LIMITS: Limits = Limits {
    enabled: false,
    min: 0.1,
    max: 20.0,
};

pub const DEFAULT_FOV_LIMITS: Limits = Limits {
    enabled: false,
    min: 10.0,
    max: 45.0,
};

/// Every setting that affects how the viewer renders. `None` leaves the
/// viewer on its own default instead of writing an explicit override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelViewerConfig {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub poster: Option<String>,
    pub environment_image: Option<String>,
    pub exposure: Option<f64>,
    pub shadow_intensity: Option<f64>,
    pub camera_controls: Option<bool>,
    pub auto_rotate: Option<bool>,
    pub camera_orbit: Option<SphericalPositionDeg>,
    pub camera_target: Option<Vector3D>,
    pub field_of_view_deg: Option<f64>,
    pub yaw_limits: Option<Limits>,
    pub pitch_limits: Option<Limits>,
    pub radius_limits: Option<Limits>,
    pub fov_limits: Option<Limits>,
}

impl ModelViewerConfig {
    /// Checks what the field types alone cannot: finite scalars and a
    /// positive zoom floor. Orbits, targets and limits are checked when they
    /// are built or deserialized.
    pub fn validate(&self) -> Result<()> {
        for value in [self.exposure, self.shadow_intensity, self.field_of_view_deg]
            .into_iter()
            .flatten()
        {
            check_finite(value)?;
        }
        if let Some(limits) = self.radius_limits {
            limits.checked_radius()?;
        }
        Ok(())
    }
}
