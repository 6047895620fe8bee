//! Diffuse ray tracer.
//!
//! Every ray bounces off solid-colored objects until it escapes or runs out
//! of bounces:
//! - the color starts as the sky gradient seen along the primary ray
//! - the bounce loop is iterative ([`trace`]), bounded by `max_bounces`
//! - each hit multiplies the carried color by the object's color
//! - pixels average `samples_per_pixel` jittered rays

use std::time::Instant;

use cinder_core::scene::TraceDescription;
use cinder_math::{Color, Ray, Vec3};
use rand::RngCore;

use crate::camera::TraceCamera;
use crate::framebuffer::FrameBuffer;
use crate::object::{hit_scene, Object};
use crate::sampling::{random_unit_vector, sample_offset};

/// Sample and bounce settings for the ray tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceConfig {
    /// Rays averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of surface hits per ray
    pub max_bounces: u32,
    /// Apply gamma 2 before quantizing to 8 bits
    pub gamma_correct: bool,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 1,
            max_bounces: 5,
            gamma_correct: false,
        }
    }
}

impl From<&TraceDescription> for TraceConfig {
    fn from(desc: &TraceDescription) -> Self {
        Self {
            samples_per_pixel: desc.samples_per_pixel(),
            max_bounces: desc.max_bounces(),
            gamma_correct: desc.gamma_correct,
        }
    }
}

/// Outcome of tracing one ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceResult {
    /// Linear color carried back to the eye
    pub color: Vec3,
    /// Number of surface hits (attenuation steps) taken
    pub bounces: u32,
}

/// Trace `ray` through `objects`, bouncing at most `max_bounces` times.
///
/// The scatter direction is `random_unit_vector + normal` without
/// normalizing. That is close to, but not exactly, a cosine-weighted
/// Lambertian scatter.
///
/// The sky term comes from the primary ray's direction only; bounces just
/// attenuate it.
pub fn trace(
    mut ray: Ray,
    objects: &[Object],
    max_bounces: u32,
    rng: &mut dyn RngCore,
) -> TraceResult {
    let sky = sky_gradient(ray.direction);
    let mut attenuation = Vec3::ONE;
    let mut bounces = 0;

    while bounces < max_bounces {
        let Some(rec) = hit_scene(&ray, objects, f32::INFINITY) else {
            break;
        };

        let mut scatter_direction = random_unit_vector(rng) + rec.normal;
        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        attenuation *= rec.color;
        ray = Ray::new(rec.point, scatter_direction);
        bounces += 1;
    }

    TraceResult {
        color: attenuation * sky,
        bounces,
    }
}

/// Compute the color seen by a ray.
pub fn ray_color(ray: Ray, objects: &[Object], max_bounces: u32, rng: &mut dyn RngCore) -> Vec3 {
    trace(ray, objects, max_bounces, rng).color
}

/// Vertical sky gradient: white at the bottom, light blue at the top.
pub fn sky_gradient(direction: Vec3) -> Vec3 {
    let unit_direction = direction.normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Vec3::new(1.0, 1.0, 1.0);
    let blue = Vec3::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Render `objects` seen from `camera` into `frame`.
///
/// All pixels draw from `rng` in scanline order, so a seeded generator
/// reproduces the frame and successive calls continue its sequence.
pub fn render(
    frame: &mut FrameBuffer,
    camera: &TraceCamera,
    objects: &[Object],
    config: &TraceConfig,
    rng: &mut dyn RngCore,
) {
    let start = Instant::now();
    let samples = config.samples_per_pixel.max(1);
    let max_bounces = config.max_bounces.max(1);
    let viewport = camera.viewport(frame.width(), frame.height());

    for y in 0..frame.height() {
        for x in 0..frame.width() {
            let mut pixel_color = Vec3::ZERO;
            for _ in 0..samples {
                // One offset jitters both axes
                let ray = viewport.ray(x, y, sample_offset(rng));
                pixel_color += ray_color(ray, objects, max_bounces, rng);
            }
            pixel_color /= samples as f32;

            if config.gamma_correct {
                pixel_color = Vec3::new(
                    linear_to_gamma(pixel_color.x),
                    linear_to_gamma(pixel_color.y),
                    linear_to_gamma(pixel_color.z),
                );
            }
            frame.set(x, y, Color::from_unit(pixel_color));
        }
    }

    log::debug!(
        "Traced {}x{} at {} spp, {} bounces in {:?}",
        frame.width(),
        frame.height(),
        samples,
        max_bounces,
        start.elapsed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sphere::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TOP: Vec3 = Vec3::new(0.5, 0.7, 1.0);

    #[test]
    fn test_sky_gradient_endpoints() {
        assert!((sky_gradient(Vec3::Y) - TOP).length() < 1e-6);
        assert!((sky_gradient(Vec3::NEG_Y) - Vec3::ONE).length() < 1e-6);
        // Direction need not be unit length
        assert!((sky_gradient(Vec3::new(0.0, 5.0, 0.0)) - TOP).length() < 1e-6);

        let horizon = sky_gradient(Vec3::X);
        assert!((horizon - Vec3::new(0.75, 0.85, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.25), 0.5);
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
    }

    #[test]
    fn test_miss_returns_sky() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = trace(Ray::new(Vec3::ZERO, Vec3::Y), &[], 5, &mut rng);

        assert_eq!(result.bounces, 0);
        assert!((result.color - TOP).length() < 1e-6);
    }

    #[test]
    fn test_single_bounce_attenuates() {
        let mut rng = StdRng::seed_from_u64(0);
        let gray = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Vec3::splat(0.5));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        let result = trace(ray, &[Object::from(gray)], 1, &mut rng);

        assert_eq!(result.bounces, 1);
        // Half the sky seen along -Z
        let expected = 0.5 * sky_gradient(Vec3::NEG_Z);
        assert!((result.color - expected).length() < 1e-6);
    }

    #[test]
    fn test_sky_from_primary_ray() {
        // Looking straight down sees the white end of the gradient, and a
        // white sphere leaves it unchanged whatever the bounces do
        let white = Sphere::new(Vec3::new(0.0, -2.0, 0.0), 0.5, Vec3::ONE);
        let objects = [Object::from(white)];

        for seed in 0..5 {
            let mut rng = StdRng::seed_from_u64(seed);
            let result = trace(Ray::new(Vec3::ZERO, Vec3::NEG_Y), &objects, 5, &mut rng);

            assert!(result.bounces >= 1);
            assert!((result.color - Vec3::ONE).length() < 1e-6, "seed {seed}");
        }
    }

    #[test]
    fn test_budget_bounds_bounces() {
        // Inside a closed sphere every ray hits again
        let shell = Sphere::new(Vec3::ZERO, 10.0, Vec3::splat(0.5));
        let objects = [Object::from(shell)];

        for max_bounces in [1, 3, 7] {
            let mut rng = StdRng::seed_from_u64(11);
            let result = trace(Ray::new(Vec3::ZERO, Vec3::X), &objects, max_bounces, &mut rng);

            assert_eq!(result.bounces, max_bounces);
            let expected = 0.5_f32.powi(max_bounces as i32) * sky_gradient(Vec3::X);
            assert!((result.color - expected).length() < 1e-6);
        }
    }

    #[test]
    fn test_more_budget_never_fewer_bounces() {
        let objects: Vec<Object> = build_default_objects();
        let camera = TraceCamera::default();
        let viewport = camera.viewport(16, 9);

        for seed in 0..8 {
            let ray = viewport.ray(8, 5, 0.0);
            let mut previous = 0;
            for max_bounces in 1..=8 {
                let mut rng = StdRng::seed_from_u64(seed);
                let result = trace(ray, &objects, max_bounces, &mut rng);
                assert!(result.bounces >= previous);
                assert!(result.bounces <= max_bounces);
                previous = result.bounces;
            }
        }
    }

    fn build_default_objects() -> Vec<Object> {
        crate::object::build_objects(&TraceDescription::default())
    }

    #[test]
    fn test_render_empty_scene_is_sky() {
        let mut frame = FrameBuffer::new(8, 6);
        let mut rng = StdRng::seed_from_u64(5);
        render(
            &mut frame,
            &TraceCamera::default(),
            &[],
            &TraceConfig::default(),
            &mut rng,
        );

        for x in 0..8 {
            let top = frame.get(x, 0);
            let bottom = frame.get(x, 5);
            // Bluer towards the top
            assert!(top.r < bottom.r);
            assert!(top.b >= 254);
        }
    }

    #[test]
    fn test_render_red_sphere() {
        let red = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Vec3::new(1.0, 0.0, 0.0));
        let mut frame = FrameBuffer::new(9, 9);
        let mut rng = StdRng::seed_from_u64(5);
        let config = TraceConfig {
            samples_per_pixel: 4,
            ..Default::default()
        };

        render(&mut frame, &TraceCamera::default(), &[Object::from(red)], &config, &mut rng);

        let center = frame.get(4, 4);
        assert!(center.r >= 127);
        assert_eq!((center.g, center.b), (0, 0));
        // Corners see the sky
        assert!(frame.get(0, 0).b >= 254);
    }

    #[test]
    fn test_render_is_reproducible() {
        let objects = build_default_objects();
        let camera = TraceCamera::default();
        let config = TraceConfig::default();

        let render_with_seed = |seed| {
            let mut frame = FrameBuffer::new(16, 9);
            let mut rng = StdRng::seed_from_u64(seed);
            render(&mut frame, &camera, &objects, &config, &mut rng);
            frame
        };

        assert_eq!(render_with_seed(3), render_with_seed(3));
    }

    #[test]
    fn test_config_from_description_clamps() {
        let desc = TraceDescription {
            samples_per_pixel: 0,
            max_bounces: -2,
            ..Default::default()
        };
        let config = TraceConfig::from(&desc);

        assert_eq!(config.samples_per_pixel, 1);
        assert_eq!(config.max_bounces, 1);
    }
}
