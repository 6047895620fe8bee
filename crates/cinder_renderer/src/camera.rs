//! Ray tracer camera and the per-frame viewport derived from it.

use cinder_core::scene::TraceCameraDescription;
use cinder_math::{Ray, Vec3};

/// Camera for the ray tracer.
///
/// Right-handed: +x right, +y up. `direction` points backwards, from the
/// scene to the eye, and the image plane sits `focal_length` in front of
/// the eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceCamera {
    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub focal_length: f32,
}

impl Default for TraceCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 3.0),
            direction: Vec3::Z,
            up: Vec3::Y,
            focal_length: 3.0,
        }
    }
}

impl From<&TraceCameraDescription> for TraceCamera {
    fn from(desc: &TraceCameraDescription) -> Self {
        Self {
            position: Vec3::from_array(desc.position),
            direction: Vec3::from_array(desc.direction),
            up: Vec3::from_array(desc.up),
            focal_length: desc.focal_length,
        }
    }
}

impl TraceCamera {
    /// Build the viewport for an image of `width` x `height` pixels.
    ///
    /// The viewport is 2 units tall and `2 * aspect` wide; rows run top to
    /// bottom.
    pub fn viewport(&self, width: u32, height: u32) -> Viewport {
        let viewport_height = 2.0;
        let viewport_width = viewport_height * (width as f32 / height as f32);

        // Camera basis
        let w = self.direction.normalize();
        let u = self.up.cross(w).normalize();
        let v = w.cross(u);

        // Vectors across and down the viewport edges
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        let pixel_delta_u = viewport_u / width as f32;
        let pixel_delta_v = viewport_v / height as f32;

        let upper_left =
            self.position - self.focal_length * w - viewport_u / 2.0 - viewport_v / 2.0;

        Viewport {
            origin: self.position,
            pixel00_loc: upper_left + 0.5 * (pixel_delta_u + pixel_delta_v),
            pixel_delta_u,
            pixel_delta_v,
        }
    }
}

/// Pixel grid in world space for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    origin: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl Viewport {
    /// Ray from the eye through pixel (x, y), shifted by `offset` pixels
    /// along both axes.
    pub fn ray(&self, x: u32, y: u32, offset: f32) -> Ray {
        let pixel_sample = self.pixel00_loc
            + (x as f32 + offset) * self.pixel_delta_u
            + (y as f32 + offset) * self.pixel_delta_v;
        Ray::new(self.origin, pixel_sample - self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_pixel_looks_forward() {
        let viewport = TraceCamera::default().viewport(3, 3);
        let ray = viewport.ray(1, 1, 0.0);

        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, 3.0));
        assert!((ray.direction - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn test_rows_run_top_to_bottom() {
        let viewport = TraceCamera::default().viewport(4, 2);
        let top_left = viewport.ray(0, 0, 0.0).direction;
        let bottom_right = viewport.ray(3, 1, 0.0).direction;

        assert!(top_left.x < 0.0 && top_left.y > 0.0);
        assert!(bottom_right.x > 0.0 && bottom_right.y < 0.0);
    }

    #[test]
    fn test_viewport_aspect() {
        // 2:1 image: viewport is 4 wide, 2 tall
        let viewport = TraceCamera::default().viewport(4, 2);
        let left_edge = viewport.ray(0, 0, -0.5).direction;
        let right_edge = viewport.ray(3, 0, 0.5).direction;

        assert!((left_edge.x + 2.0).abs() < 1e-5);
        assert!((right_edge.x - 2.0).abs() < 1e-5);
        assert!((left_edge.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_from_description() {
        let camera = TraceCamera::from(&TraceCameraDescription::default());
        assert_eq!(camera, TraceCamera::default());
    }
}
