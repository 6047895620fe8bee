//! Random sampling helpers. All randomness flows through the caller's
//! generator so renders are reproducible when it is seeded.

use cinder_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform float in [-0.5, 0.5).
#[inline]
pub fn sample_offset(rng: &mut dyn RngCore) -> f32 {
    gen_f32(rng) - 0.5
}

/// Uniformly distributed unit vector, by rejection sampling the unit ball.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let v = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}
