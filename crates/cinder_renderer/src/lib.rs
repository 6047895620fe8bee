//! Cinder renderer - the two CPU pipelines.
//!
//! - [`Rasterizer`]: projects mesh models through a perspective camera and
//!   fills flat-shaded triangles with a depth test
//! - [`tracer::render`]: diffuse ray tracer over spheres with a sky gradient
//!
//! Both write into a caller-owned [`FrameBuffer`]. Camera, scene and
//! settings are passed to every render call, and the ray tracer draws all
//! its randomness from the generator it is handed.

mod camera;
mod framebuffer;
mod object;
pub mod raster;
mod sampling;
mod sphere;
pub mod tracer;

pub use camera::{TraceCamera, Viewport};
pub use framebuffer::{DepthBuffer, FrameBuffer};
pub use object::{build_objects, hit_scene, HitRecord, Hittable, Object, T_MIN};
pub use raster::{RasterConfig, RasterStats, Rasterizer, ScreenVertex};
pub use sampling::{gen_f32, random_unit_vector};
pub use sphere::Sphere;
pub use tracer::{ray_color, sky_gradient, trace, TraceConfig, TraceResult};

/// Re-export common math types from cinder_math
pub use cinder_math::{Color, Interval, Ray, Vec3};
