//! Depth-buffered triangle rasterizer.
//!
//! Each frame: clear, project every model's triangles to pixel space, drop
//! the ones facing away from the fixed light, and fill the rest with a flat
//! grayscale shade wherever they are nearer than what is already drawn.

use std::time::Instant;

use cinder_core::scene::RasterDescription;
use cinder_core::Model;
use cinder_math::{
    perspective_projection, Camera, Color, Mat4, Vec2, Vec3, DEFAULT_FAR, DEFAULT_FOV_DEGREES,
    DEFAULT_NEAR,
};

use crate::framebuffer::{DepthBuffer, FrameBuffer};

/// The fixed directional light, pointing into the screen.
pub const LIGHT_DIRECTION: Vec3 = Vec3::new(0.0, 0.0, -1.0);

/// Twice the screen-space area (in pixels) below which a triangle is
/// treated as degenerate.
const DEGENERATE_AREA: f32 = 1e-4;

/// Projection and clear settings for the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Color the frame is cleared to
    pub background: Color,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            fov_degrees: DEFAULT_FOV_DEGREES,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            background: Color::BLACK,
        }
    }
}

impl From<&RasterDescription> for RasterConfig {
    fn from(desc: &RasterDescription) -> Self {
        Self {
            fov_degrees: desc.fov_degrees,
            near: desc.near,
            far: desc.far,
            background: desc.background(),
        }
    }
}

/// What happened to the triangles of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterStats {
    /// Triangles considered (first three indices of each face)
    pub triangles: usize,
    /// Facing away from the light, or edge-on
    pub culled: usize,
    /// At least one vertex at or behind the eye plane
    pub behind_camera: usize,
    /// Too small in screen space to produce pixels
    pub degenerate: usize,
    /// Sent to the fill stage
    pub drawn: usize,
    /// Pixels that passed the depth test
    pub pixels_written: usize,
}

/// A vertex in pixel space with its post-divide depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

impl ScreenVertex {
    pub fn new(x: f32, y: f32, depth: f32) -> Self {
        Self { x, y, depth }
    }
}

/// Project an object-space vertex through `mvp` to pixel space.
///
/// NDC x maps [-1, 1] to [0, width]; y is flipped so that NDC +1 lands on
/// row 0. Returns `None` when the vertex is at or behind the eye (w <= 0),
/// where the perspective divide is meaningless.
pub fn project_vertex(mvp: &Mat4, vertex: Vec3, width: u32, height: u32) -> Option<ScreenVertex> {
    let clip = *mvp * vertex.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }

    let ndc = clip.truncate() / clip.w;
    Some(ScreenVertex::new(
        (ndc.x + 1.0) * width as f32 / 2.0,
        (-ndc.y + 1.0) * height as f32 / 2.0,
        ndc.z,
    ))
}

/// Twice the signed area of the triangle in pixel space.
#[inline]
fn doubled_area(v: &[ScreenVertex; 3]) -> f32 {
    (v[2].x - v[0].x) * (v[1].y - v[0].y) - (v[1].x - v[0].x) * (v[2].y - v[0].y)
}

/// Barycentric weights of `p` with respect to `v`, one per vertex.
///
/// Computed as the cross product of the x and y edge rows. Any negative
/// weight means `p` is outside. Returns `None` for a degenerate triangle.
pub fn barycentric(v: &[ScreenVertex; 3], p: Vec2) -> Option<Vec3> {
    let edge_x = Vec3::new(v[2].x - v[0].x, v[1].x - v[0].x, v[0].x - p.x);
    let edge_y = Vec3::new(v[2].y - v[0].y, v[1].y - v[0].y, v[0].y - p.y);
    let u = edge_x.cross(edge_y);

    if u.z.abs() < DEGENERATE_AREA {
        return None;
    }

    Some(Vec3::new(1.0 - (u.x + u.y) / u.z, u.y / u.z, u.x / u.z))
}

/// Fill one projected triangle with a flat color, depth tested.
///
/// Pixels are sampled at their centers within the triangle's bounding box
/// clamped to the frame. Returns the number of pixels written, or `None`
/// if the triangle is degenerate.
pub fn fill_triangle(
    frame: &mut FrameBuffer,
    depth: &mut DepthBuffer,
    v: [ScreenVertex; 3],
    color: Color,
) -> Option<usize> {
    if doubled_area(&v).abs() < DEGENERATE_AREA {
        return None;
    }
    if frame.width() == 0 || frame.height() == 0 {
        return Some(0);
    }

    let min_x = v.iter().map(|p| p.x).fold(f32::INFINITY, f32::min).floor().max(0.0);
    let min_y = v.iter().map(|p| p.y).fold(f32::INFINITY, f32::min).floor().max(0.0);
    let max_x = v
        .iter()
        .map(|p| p.x)
        .fold(f32::NEG_INFINITY, f32::max)
        .ceil()
        .min((frame.width() - 1) as f32);
    let max_y = v
        .iter()
        .map(|p| p.y)
        .fold(f32::NEG_INFINITY, f32::max)
        .ceil()
        .min((frame.height() - 1) as f32);

    // Entirely off screen
    if min_x > max_x || min_y > max_y {
        return Some(0);
    }

    let mut written = 0;
    for y in min_y as u32..=max_y as u32 {
        for x in min_x as u32..=max_x as u32 {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let Some(bary) = barycentric(&v, center) else {
                continue;
            };
            if bary.x < 0.0 || bary.y < 0.0 || bary.z < 0.0 {
                continue;
            }

            let z = bary.x * v[0].depth + bary.y * v[1].depth + bary.z * v[2].depth;
            if depth.test_and_set(x, y, z) {
                frame.set(x, y, color);
                written += 1;
            }
        }
    }

    Some(written)
}

/// Rasterizer state that lives across frames: only the depth buffer, which
/// is cleared at the start of every render.
pub struct Rasterizer {
    depth: DepthBuffer,
}

impl Rasterizer {
    /// Create a rasterizer for frames of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            depth: DepthBuffer::new(width, height),
        }
    }

    /// Depth buffer left by the last render.
    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Render `models` seen from `camera` into `frame`.
    pub fn render(
        &mut self,
        frame: &mut FrameBuffer,
        camera: &Camera,
        models: &[Model],
        config: &RasterConfig,
    ) -> RasterStats {
        let start = Instant::now();
        let (width, height) = (frame.width(), frame.height());

        if self.depth.width() != width || self.depth.height() != height {
            log::debug!("Resizing depth buffer to {}x{}", width, height);
            self.depth = DepthBuffer::new(width, height);
        } else {
            self.depth.clear();
        }
        frame.fill(config.background);

        let projection =
            perspective_projection(config.fov_degrees, config.near, config.far, frame.aspect_ratio());
        let view_projection = projection * camera.view_matrix();

        let mut stats = RasterStats::default();
        for model in models {
            let mvp = view_projection * model.model_matrix();

            for [v0, v1, v2] in model.mesh.triangles() {
                stats.triangles += 1;

                // Object-space face normal against the fixed light. NaN from
                // a zero-area triangle fails the comparison too.
                let normal = (v2 - v0).cross(v1 - v0).normalize();
                let intensity = normal.dot(LIGHT_DIRECTION);
                if !(intensity > 0.0) {
                    stats.culled += 1;
                    continue;
                }

                let projected = [v0, v1, v2].map(|v| project_vertex(&mvp, v, width, height));
                let [Some(s0), Some(s1), Some(s2)] = projected else {
                    stats.behind_camera += 1;
                    continue;
                };

                match fill_triangle(
                    frame,
                    &mut self.depth,
                    [s0, s1, s2],
                    Color::from_intensity(intensity),
                ) {
                    Some(pixels) => {
                        stats.drawn += 1;
                        stats.pixels_written += pixels;
                    }
                    None => stats.degenerate += 1,
                }
            }
        }

        log::debug!(
            "Rasterized {} triangles ({} culled, {} degenerate) in {:?}",
            stats.triangles,
            stats.culled,
            stats.degenerate,
            start.elapsed()
        );
        stats
    }
}
