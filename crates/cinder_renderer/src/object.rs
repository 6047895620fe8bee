//! Hit records, the Hittable trait and the scene object sum type.

use cinder_core::scene::TraceDescription;
use cinder_math::{Interval, Ray, Vec3};

use crate::sphere::Sphere;

/// Rays start this far along their direction to avoid re-hitting the
/// surface they left.
pub const T_MIN: f32 = 0.001;

/// Record of a ray-object intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub point: Vec3,
    /// Unit surface normal, always pointing against the ray
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the outside of the surface
    pub front_face: bool,
    /// Color of the object that was hit
    pub color: Vec3,
}

impl HitRecord {
    /// Build a record, orienting `outward_normal` against the ray.
    pub fn new(ray: &Ray, point: Vec3, outward_normal: Vec3, t: f32, color: Vec3) -> Self {
        let mut rec = Self {
            point,
            normal: outward_normal,
            t,
            front_face: true,
            color,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can hit.
pub trait Hittable {
    /// Nearest intersection with parameter strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;
}

/// A scene object. New shapes become new variants with their own
/// `Hittable` impl.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Sphere(Sphere),
}

impl Object {
    /// Surface color in [0, 1].
    pub fn color(&self) -> Vec3 {
        match self {
            Object::Sphere(sphere) => sphere.color,
        }
    }
}

impl From<Sphere> for Object {
    fn from(sphere: Sphere) -> Self {
        Object::Sphere(sphere)
    }
}

impl Hittable for Object {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            Object::Sphere(sphere) => sphere.hit(ray, ray_t),
        }
    }
}

/// Build the object list of a trace scene.
pub fn build_objects(desc: &TraceDescription) -> Vec<Object> {
    desc.spheres
        .iter()
        .map(|sphere| Object::Sphere(Sphere::from(sphere)))
        .collect()
}

/// Find the closest object along `ray` with `T_MIN < t < t_max`.
///
/// Each hit tightens the search range, so later objects only win when
/// strictly nearer; on a tie the earlier object is kept.
pub fn hit_scene(ray: &Ray, objects: &[Object], t_max: f32) -> Option<HitRecord> {
    let mut ray_t = Interval::new(T_MIN, t_max);
    let mut closest = None;

    for object in objects {
        if let Some(rec) = object.hit(ray, ray_t) {
            ray_t = ray_t.with_max(rec.t);
            closest = Some(HitRecord {
                color: object.color(),
                ..rec
            });
        }
    }

    closest
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    const BLUE: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    fn spheres() -> (Object, Object) {
        (
            Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, RED).into(),
            Sphere::new(Vec3::new(0.0, 0.0, -5.0), 0.5, BLUE).into(),
        )
    }

    #[test]
    fn test_nearer_sphere_wins_in_either_order() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let (red, blue) = spheres();

        let rec = hit_scene(&ray, &[red, blue], f32::INFINITY).unwrap();
        assert_eq!(rec.color, RED);
        assert!((rec.t - 0.5).abs() < 1e-6);

        let rec = hit_scene(&ray, &[blue, red], f32::INFINITY).unwrap();
        assert_eq!(rec.color, RED);
        assert!((rec.t - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tie_keeps_earlier_object() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let first: Object = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, RED).into();
        let second: Object = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, BLUE).into();

        let rec = hit_scene(&ray, &[first, second], f32::INFINITY).unwrap();
        assert_eq!(rec.color, RED);
    }

    #[test]
    fn test_t_max_limits_search() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let (_, blue) = spheres();

        assert!(hit_scene(&ray, &[blue], 4.0).is_none());
        assert!(hit_scene(&ray, &[blue], 5.0).is_some());
    }

    #[test]
    fn test_empty_scene_misses() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        assert!(hit_scene(&ray, &[], f32::INFINITY).is_none());
    }

    #[test]
    fn test_set_face_normal() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let front = HitRecord::new(&ray, Vec3::ZERO, Vec3::Z, 1.0, RED);
        assert!(front.front_face);
        assert_eq!(front.normal, Vec3::Z);

        let back = HitRecord::new(&ray, Vec3::ZERO, Vec3::NEG_Z, 1.0, RED);
        assert!(!back.front_face);
        assert_eq!(back.normal, Vec3::Z);
    }

    #[test]
    fn test_build_objects_from_defaults() {
        let objects = build_objects(&TraceDescription::default());
        assert_eq!(objects.len(), 2);
        assert!(matches!(objects[0], Object::Sphere(s) if s.radius == 0.5));
    }
}
