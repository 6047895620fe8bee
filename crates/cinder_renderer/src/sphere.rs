//! Sphere primitive for ray tracing.

use cinder_core::scene::SphereDescription;
use cinder_math::{Color, Interval, Ray, Vec3};

use crate::object::{HitRecord, Hittable};

/// A solid-colored sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    /// Linear color in [0, 1]
    pub color: Vec3,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, color: Vec3) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            color,
        }
    }
}

impl From<&SphereDescription> for Sphere {
    fn from(desc: &SphereDescription) -> Self {
        Self::new(
            Vec3::from_array(desc.center),
            desc.radius,
            Color::from(desc.color).to_unit(),
        )
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let point = ray.at(root);
        let outward_normal = (point - self.center) / self.radius;
        Some(HitRecord::new(ray, point, outward_normal, root, self.color))
    }
}
