//! Cinder math - shared geometry for the rasterizer and the ray tracer.
//!
//! Vector and matrix arithmetic comes from glam. This crate adds the pieces
//! both pipelines agree on: row-major matrix construction, the 8-bit
//! [`Color`], [`Ray`] and [`Interval`], and the view/projection builders.

// Re-export glam for convenience
pub use glam::*;

mod camera;
mod color;
mod interval;
mod ray;
mod transform;

pub use camera::Camera;
pub use color::Color;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{
    look_at, perspective_projection, translate, Mat4Ext, DEFAULT_FAR, DEFAULT_FOV_DEGREES,
    DEFAULT_NEAR,
};
