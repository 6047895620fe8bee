use glam::{Mat4, Vec3};

use crate::transform::look_at;

/// Rasterizer camera: a position and a unit view direction.
///
/// The view matrix is derived on demand; nothing is cached between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub direction: Vec3,
}

impl Camera {
    /// Create a new camera. `direction` is normalized here.
    pub fn new(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction: direction.normalize(),
        }
    }

    /// Camera whose direction is given by yaw and pitch in degrees.
    ///
    /// Yaw is measured in the XZ plane from +X, pitch up from that plane, so
    /// yaw -90 with pitch 0 looks down -Z.
    pub fn from_yaw_pitch(position: Vec3, yaw_degrees: f32, pitch_degrees: f32) -> Self {
        let (yaw, pitch) = (yaw_degrees.to_radians(), pitch_degrees.to_radians());
        let direction = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        Self::new(position, direction)
    }

    /// Get the view matrix (world → camera space)
    pub fn view_matrix(&self) -> Mat4 {
        look_at(self.position, self.position + self.direction, Vec3::Y)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        }
    }
}
