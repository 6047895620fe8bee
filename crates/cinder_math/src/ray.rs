use crate::Vec3;

/// A ray in 3D space.
///
/// The direction is not required to be unit length; points along the ray
/// are `origin + t * direction`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_direction_not_normalized() {
        let ray = Ray::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(0.0, 0.0, -2.0));

        // t is measured in multiples of the direction, not in world units
        assert_eq!(ray.at(0.5), Vec3::new(1.0, 1.0, 0.0));
    }
}
